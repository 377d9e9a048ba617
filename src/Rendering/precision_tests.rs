#[cfg(test)]
mod tests {
    use crate::Rendering::precision::{
        DEFAULT_PRECISION, MAX_PRECISION, PrecisionController, PrecisionStore, RoundOutcome,
        format_fixed, selectors,
    };
    use crate::Service::mock_service::MockService;
    use crate::Service::service_api::{RoundResponse, ServiceError};
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn test_new_binding_uses_default_precision() {
        let mut store = PrecisionStore::default();
        let binding = store.bind(selectors::MOLAR_MASS, "mr", 18.01528);
        assert_eq!(binding.precision(), DEFAULT_PRECISION);
        assert_eq!(binding.display(), "18.02");
        assert_eq!(format_fixed(2.5, 0), "2");
        assert_eq!(format_fixed(0.125, 1), "0.1");
    }

    #[test]
    fn test_selected_precision_survives_rerender() {
        let mut store = PrecisionStore::new(2);
        store.bind(selectors::MOLAR_MASS, "mr", 18.01528);
        let _jobs = store.begin_precision_change(selectors::MOLAR_MASS, 4);
        store.clear_bindings();
        assert!(store.binding("mr").is_none());
        let binding = store.bind(selectors::MOLAR_MASS, "mr", 44.0095);
        assert_eq!(binding.precision(), 4);
        assert_eq!(binding.display(), "44.0095");
    }

    #[test]
    fn test_group_selector_yields_one_job_per_binding() {
        let mut store = PrecisionStore::default();
        store.bind(selectors::PERCENTAGES, "percentage:O", 88.81);
        store.bind(selectors::PERCENTAGES, "percentage:H", 11.19);
        store.bind(selectors::MOLAR_MASS, "mr", 18.015);
        let jobs = store.begin_precision_change(selectors::PERCENTAGES, 1);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].field_id, "percentage:O");
        assert_eq!(jobs[0].request.num_array, vec![88.81]);
        assert_eq!(jobs[1].request.precision, 1);
        assert_ne!(jobs[0].token, jobs[1].token);
        // other selectors untouched
        assert!(!store.binding("mr").unwrap().is_pending());
    }

    #[test]
    fn test_rounding_never_mutates_full_value() {
        let mut store = PrecisionStore::default();
        store.bind(selectors::MOLAR_MASS, "mr", 98.07848);
        let jobs = store.begin_precision_change(selectors::MOLAR_MASS, 1);
        let job = &jobs[0];
        let outcome = store.apply_round(job, Ok(RoundResponse { result: vec![json!("98.1")] }));
        assert_eq!(outcome, RoundOutcome::Applied);
        let binding = store.binding("mr").unwrap();
        assert_eq!(binding.display(), "98.1");
        assert_relative_eq!(binding.full_value(), 98.07848);

        let jobs = store.begin_precision_change(selectors::MOLAR_MASS, 3);
        assert_eq!(jobs[0].request.num_array, vec![98.07848]);
    }

    #[test]
    fn test_stale_round_is_dropped() {
        let mut store = PrecisionStore::default();
        store.bind(selectors::MOLAR_MASS, "mr", 1.23456);
        let first = store.begin_precision_change(selectors::MOLAR_MASS, 1);
        let second = store.begin_precision_change(selectors::MOLAR_MASS, 3);
        let outcome = store.apply_round(
            &second[0],
            Ok(RoundResponse { result: vec![json!("1.235")] }),
        );
        assert_eq!(outcome, RoundOutcome::Applied);
        let outcome = store.apply_round(
            &first[0],
            Ok(RoundResponse { result: vec![json!("1.2")] }),
        );
        assert_eq!(outcome, RoundOutcome::Stale);
        assert_eq!(store.display("mr"), Some("1.235"));
    }

    #[test]
    fn test_round_for_replaced_binding_is_dropped() {
        let mut store = PrecisionStore::default();
        store.bind(selectors::MOLAR_MASS, "mr", 1.0);
        let jobs = store.begin_precision_change(selectors::MOLAR_MASS, 3);
        store.bind(selectors::MOLAR_MASS, "mr", 2.0);
        let outcome = store.apply_round(
            &jobs[0],
            Ok(RoundResponse { result: vec![json!("1.000")] }),
        );
        assert_eq!(outcome, RoundOutcome::Stale);
        assert_eq!(store.display("mr"), Some("2.000"));
    }

    #[test]
    fn test_failed_round_keeps_display() {
        let mut store = PrecisionStore::default();
        store.bind(selectors::MOLAR_MASS, "mr", 3.14159);
        let jobs = store.begin_precision_change(selectors::MOLAR_MASS, 4);
        let outcome = store.apply_round(
            &jobs[0],
            Err(ServiceError::UnexpectedShape("down".to_string())),
        );
        assert_eq!(outcome, RoundOutcome::Failed);
        assert_eq!(store.display("mr"), Some("3.14"));
        assert!(!store.binding("mr").unwrap().is_pending());

        let jobs = store.begin_precision_change(selectors::MOLAR_MASS, 4);
        let outcome = store.apply_round(&jobs[0], Ok(RoundResponse { result: vec![] }));
        assert_eq!(outcome, RoundOutcome::Failed);
    }

    #[test]
    fn test_precision_above_limit_is_rejected() {
        let mut store = PrecisionStore::default();
        store.bind(selectors::MOLAR_MASS, "mr", 18.01528);
        let jobs = store.begin_precision_change(selectors::MOLAR_MASS, 70_000);
        assert!(jobs.is_empty());
        assert_eq!(store.precision_of(selectors::MOLAR_MASS), DEFAULT_PRECISION);
        // the next render binds at the previous precision
        let binding = store.bind(selectors::MOLAR_MASS, "mr", 18.01528);
        assert_eq!(binding.display(), "18.02");

        let jobs = store.begin_precision_change(selectors::MOLAR_MASS, MAX_PRECISION);
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn test_default_precision_is_clamped() {
        let mut store = PrecisionStore::new(u32::MAX);
        assert_eq!(store.precision_of(selectors::MOLAR_MASS), MAX_PRECISION);
        let binding = store.bind(selectors::MOLAR_MASS, "mr", 0.5);
        assert_eq!(binding.display(), "0.500000000000000");
    }

    #[tokio::test]
    async fn test_controller_rounds_each_binding_once() {
        let service = MockService::new();
        let mut store = PrecisionStore::default();
        store.bind(selectors::EQUATION_MR, "mr:0", 2.01588);
        store.bind(selectors::EQUATION_MR, "mr:1", 31.9988);
        store.bind(selectors::EQUATION_MR, "mr:2", 18.01528);
        let controller = PrecisionController::new(&service);
        let applied = controller
            .set_precision(&mut store, selectors::EQUATION_MR, 3)
            .await;
        assert_eq!(applied, 3);
        assert_eq!(service.calls_to("round"), 3);
        assert_eq!(store.display("mr:0"), Some("2.016"));
        assert_eq!(store.display("mr:2"), Some("18.015"));
        assert_eq!(store.precision_of(selectors::EQUATION_MR), 3);
        assert_relative_eq!(store.binding("mr:1").unwrap().full_value(), 31.9988);
    }
}
