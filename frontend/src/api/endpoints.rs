use serde_json::Value;

use super::ApiClient;
use crate::config::SUMMARY_PAGE_SIZE;
use crate::error::ApiError;
use crate::models::{
    AdminUser, Currency, ForecastGenerateResponse, ForecastPoint, ForecastRequest,
    LiquidityRatioRecord, LoginResponse, NewUser, SummaryPoint, UploadResponse,
    UploadedFileRecord, UsdExposureRecord, UserProfile,
};
use crate::pagination::collect_all;

impl ApiClient {
    /// Exchanges credentials for a bearer token. Does not start the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let resp: LoginResponse = self
            .post_form_anonymous("/auth/login", &[("username", email), ("password", password)])
            .await?;
        Ok(resp.access_token)
    }

    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.get_json("/auth/users/me").await
    }

    /// Profile lookup right after [`login`](Self::login). A rejected token
    /// here is an ordinary error and leaves the new session in place.
    pub async fn profile_after_login(&self) -> Result<UserProfile, ApiError> {
        self.get_json_fresh("/auth/users/me").await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<AdminUser, ApiError> {
        self.post_json("/admin/create-user", user).await
    }

    pub async fn list_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.get_json("/admin/users").await
    }

    pub async fn upload_file(
        &self,
        file: &web_sys::File,
        currency: Currency,
    ) -> Result<UploadResponse, ApiError> {
        let form = web_sys::FormData::new()
            .map_err(|e| ApiError::Decode(format!("could not create form data: {:?}", e)))?;
        form.append_with_blob_and_filename("file", file, &file.name())
            .and_then(|_| form.append_with_str("file_type", currency.summary_file_type()))
            .and_then(|_| form.append_with_str("currency", currency.code()))
            .map_err(|e| ApiError::Decode(format!("could not fill form data: {:?}", e)))?;
        self.post_multipart("/files/upload", form).await
    }

    pub async fn file_history(&self) -> Result<Vec<UploadedFileRecord>, ApiError> {
        self.get_json("/files/history").await
    }

    pub async fn generate_forecast(
        &self,
        currency: Currency,
        anchor_date: &str,
    ) -> Result<ForecastGenerateResponse, ApiError> {
        let body = ForecastRequest {
            currency: currency.code().to_string(),
            forecast_anchor_date: anchor_date.to_string(),
        };
        self.post_json("/files/forecast/generate", &body).await
    }

    pub async fn latest_forecast(&self, currency: Currency) -> Result<Vec<ForecastPoint>, ApiError> {
        let path = format!(
            "/files/forecast/latest?currency={}",
            currency.code().to_lowercase()
        );
        self.get_json(&path).await
    }

    pub async fn save_liquidity_ratios(
        &self,
        payload: &Value,
    ) -> Result<LiquidityRatioRecord, ApiError> {
        self.post_json("/liquidity-ratios/", payload).await
    }

    pub async fn latest_liquidity_ratios(&self) -> Result<Option<LiquidityRatioRecord>, ApiError> {
        self.get_optional_json("/liquidity-ratios/latest").await
    }

    pub async fn save_usd_exposure(&self, payload: &Value) -> Result<UsdExposureRecord, ApiError> {
        self.post_json("/usd-exposure/", payload).await
    }

    pub async fn latest_usd_exposure(&self) -> Result<Option<UsdExposureRecord>, ApiError> {
        self.get_optional_json("/usd-exposure/latest").await
    }

    pub async fn usd_summary_page(
        &self,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<SummaryPoint>, ApiError> {
        let path = format!("/summary-output/usd?skip={}&limit={}", skip, limit);
        self.get_json(&path).await
    }

    /// Every USD summary row, collected page by page.
    pub async fn usd_summary_all(&self) -> Result<Vec<SummaryPoint>, ApiError> {
        let rows = collect_all(SUMMARY_PAGE_SIZE, |skip, limit| {
            self.usd_summary_page(skip, limit)
        })
        .await?;
        log::info!("collected {} USD summary rows", rows.len());
        Ok(rows)
    }
}
