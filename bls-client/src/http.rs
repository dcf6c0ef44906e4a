//! HTTP client for the appointment Gateway REST API

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use shared::models::{
    Applicant, ApplicantCreate, AutomationAck, Booking, BookingDraft, BookingReceipt,
    CaptchaRequest, CaptchaSolution, CategoryCheck, Credential, CredentialCreate,
    CredentialTestReport, MessageAck, SystemStatus, ValidationVerdict, VisaInfo,
};

use crate::{GatewayConfig, GatewayError, GatewayResult};

/// HTTP client for making requests to the appointment Gateway
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a new Gateway client from configuration
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request without body
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.post(&url).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.put(&url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.delete(&url).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> GatewayResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(GatewayError::Unauthorized),
                StatusCode::FORBIDDEN => Err(GatewayError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(GatewayError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(GatewayError::Validation(text)),
                _ => Err(GatewayError::Internal(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    // ========== Applicant API ==========

    /// List all applicants
    pub async fn list_applicants(&self) -> GatewayResult<Vec<Applicant>> {
        self.get("api/applicants").await
    }

    /// Fetch one applicant by id
    pub async fn get_applicant(&self, id: &str) -> GatewayResult<Applicant> {
        self.get(&format!("api/applicants/{id}")).await
    }

    /// Create a new applicant
    pub async fn create_applicant(&self, applicant: &ApplicantCreate) -> GatewayResult<Applicant> {
        self.post("api/applicants", applicant).await
    }

    /// Update an existing applicant
    pub async fn update_applicant(
        &self,
        id: &str,
        applicant: &ApplicantCreate,
    ) -> GatewayResult<Applicant> {
        self.put(&format!("api/applicants/{id}"), applicant).await
    }

    /// Delete an applicant
    pub async fn delete_applicant(&self, id: &str) -> GatewayResult<MessageAck> {
        self.delete(&format!("api/applicants/{id}")).await
    }

    /// Fetch the applicant currently marked primary
    pub async fn primary_applicant(&self) -> GatewayResult<Applicant> {
        self.get("api/applicants/primary/info").await
    }

    // ========== Credential API ==========

    /// List all portal credentials
    pub async fn list_credentials(&self) -> GatewayResult<Vec<Credential>> {
        self.get("api/credentials").await
    }

    /// Fetch one credential by id
    pub async fn get_credential(&self, id: &str) -> GatewayResult<Credential> {
        self.get(&format!("api/credentials/{id}")).await
    }

    /// Create a new credential
    pub async fn create_credential(
        &self,
        credential: &CredentialCreate,
    ) -> GatewayResult<Credential> {
        self.post("api/credentials", credential).await
    }

    /// Update an existing credential
    pub async fn update_credential(
        &self,
        id: &str,
        credential: &CredentialCreate,
    ) -> GatewayResult<Credential> {
        self.put(&format!("api/credentials/{id}"), credential).await
    }

    /// Delete a credential
    pub async fn delete_credential(&self, id: &str) -> GatewayResult<MessageAck> {
        self.delete(&format!("api/credentials/{id}")).await
    }

    /// Mark a credential as the one the automation logs in with
    pub async fn set_primary_credential(&self, id: &str) -> GatewayResult<MessageAck> {
        self.post_empty(&format!("api/credentials/{id}/set-primary"))
            .await
    }

    /// Probe a credential against the booking portal
    pub async fn test_credential(&self, id: &str) -> GatewayResult<CredentialTestReport> {
        self.post_empty(&format!("api/credentials/{id}/test")).await
    }

    /// Fetch the credential currently marked primary
    pub async fn primary_credential(&self) -> GatewayResult<Credential> {
        self.get("api/credentials/primary/info").await
    }

    // ========== Automation API ==========

    /// Current automation status
    pub async fn system_status(&self) -> GatewayResult<SystemStatus> {
        self.get("api/bls/status").await
    }

    /// Start the Gateway-side automation loop
    pub async fn start_automation(&self) -> GatewayResult<AutomationAck> {
        self.post_empty("api/bls/start").await
    }

    /// Stop the Gateway-side automation loop
    pub async fn stop_automation(&self) -> GatewayResult<AutomationAck> {
        self.post_empty("api/bls/stop").await
    }

    /// Fetch the booking catalog (locations, categories, history options)
    pub async fn visa_info(&self) -> GatewayResult<VisaInfo> {
        self.get("api/bls/visa-info").await
    }

    /// Ask the Gateway for an eligibility verdict
    pub async fn validate_category(
        &self,
        check: &CategoryCheck,
    ) -> GatewayResult<ValidationVerdict> {
        self.post("api/bls/validate-category", check).await
    }

    /// Submit a booking request
    pub async fn book_appointment(&self, draft: &BookingDraft) -> GatewayResult<BookingReceipt> {
        self.post("api/bls/book-appointment", draft).await
    }

    /// Forward a captcha puzzle to the Gateway solver
    pub async fn solve_captcha(&self, captcha: &CaptchaRequest) -> GatewayResult<CaptchaSolution> {
        self.post("api/bls/solve-captcha", captcha).await
    }

    /// Booking history, newest first
    pub async fn list_bookings(&self) -> GatewayResult<Vec<Booking>> {
        self.get("api/bls/bookings").await
    }
}
