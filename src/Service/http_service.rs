use crate::Preview::mode_classifier::Mode;
use crate::Service::service_api::{
    ComputeService, LivePreviewResponse, MassMoleEquationRequest, MassMoleEquationResponse,
    MassMoleRequest, MassMoleResponse, RoundRequest, RoundResponse, ServiceError,
};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

/// The real computation service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpService {
    client: Client,
    base_url: Url,
}

impl HttpService {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ServiceError> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        Ok(self.base_url.join(path)?)
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<T, ServiceError> {
        let url = self.endpoint(path)?;
        debug!("POST {} {:?}", url, form);
        let body = self
            .client
            .post(url)
            .form(form)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ComputeService for HttpService {
    async fn live_preview(
        &self,
        latex: &str,
        mode: Mode,
    ) -> Result<LivePreviewResponse, ServiceError> {
        let form = vec![
            ("latex".to_string(), latex.to_string()),
            ("mode".to_string(), mode.as_str().to_string()),
        ];
        self.post_form("live_preview", &form).await
    }

    async fn round(&self, request: &RoundRequest) -> Result<RoundResponse, ServiceError> {
        self.post_form("round", &request.form_pairs()).await
    }

    async fn mass_mole(
        &self,
        request: &MassMoleRequest,
    ) -> Result<MassMoleResponse, ServiceError> {
        self.post_form("mass_mole", &request.form_pairs()).await
    }

    async fn mass_mole_equation(
        &self,
        request: &MassMoleEquationRequest,
    ) -> Result<MassMoleEquationResponse, ServiceError> {
        let url = self.endpoint("mass_mole_equation")?;
        debug!("POST {} {:?}", url, request);
        let body = self
            .client
            .post(url)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}
