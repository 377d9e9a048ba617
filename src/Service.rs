/// Contracts of the remote computation service: request/response types for the
/// four endpoints, the `ComputeService` trait the rest of the crate is generic over,
/// and the error type of a round trip.
///
///  # Examples
/// ```
/// use ChemCalc::Service::service_api::{LivePreviewResponse, display_value};
/// let json = r#"{"mode": "equation", "syntax": true, "reactants": ["H_2", "O_2"],
///     "products": ["H_2O"], "coefficients": [2, 1, 2], "mr": [2.016, 31.998, 18.015]}"#;
/// let response: LivePreviewResponse = serde_json::from_str(json).unwrap();
/// assert!(response.syntax());
/// assert_eq!(display_value(&serde_json::json!(2)), "2");
/// ```
pub mod service_api;
/// `ComputeService` over HTTP with reqwest
pub mod http_service;
#[cfg(test)]
pub mod mock_service;
