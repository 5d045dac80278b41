use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("admin") => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub role: Option<String>,
}

/// Body of `GET /auth/users/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub user_metadata: Option<UserMetadata>,
}

impl UserProfile {
    pub fn role(&self) -> Role {
        Role::parse(
            self.user_metadata
                .as_ref()
                .and_then(|m| m.role.as_deref()),
        )
    }
}

/// Row of `GET /admin/users`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_sign_in_at: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<UserMetadata>,
}

impl AdminUser {
    pub fn role(&self) -> Role {
        Role::parse(
            self.user_metadata
                .as_ref()
                .and_then(|m| m.role.as_deref()),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub user_metadata: UserMetadata,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Currency {
    Cad,
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Cad, Currency::Usd];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Cad => "CAD",
            Currency::Usd => "USD",
        }
    }

    /// `file_type` sent with daily/bulk uploads of raw `.041` files.
    pub fn summary_file_type(&self) -> &'static str {
        match self {
            Currency::Cad => "CAD_SUMMARY_RAW",
            Currency::Usd => "USD_SUMMARY_RAW",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CAD" => Some(Currency::Cad),
            "USD" => Some(Currency::Usd),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Unknown,
}

impl ProcessingStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("pending") => ProcessingStatus::Pending,
            Some("processing") => ProcessingStatus::Processing,
            Some("completed") => ProcessingStatus::Completed,
            Some("failed") => ProcessingStatus::Failed,
            _ => ProcessingStatus::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "Pending",
            ProcessingStatus::Processing => "Processing",
            ProcessingStatus::Completed => "Completed",
            ProcessingStatus::Failed => "Failed",
            ProcessingStatus::Unknown => "Unknown",
        }
    }
}

/// Row of `GET /files/history`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UploadedFileRecord {
    pub id: String,
    pub original_filename: String,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub file_size_bytes: Option<u64>,
    pub upload_timestamp: String,
    #[serde(default)]
    pub processing_status: Option<String>,
    #[serde(default)]
    pub processing_message: Option<String>,
    #[serde(default)]
    pub forecast_date: Option<String>,
}

impl UploadedFileRecord {
    pub fn status(&self) -> ProcessingStatus {
        ProcessingStatus::parse(self.processing_status.as_deref())
    }

    pub fn currency(&self) -> Option<Currency> {
        self.currency.as_deref().and_then(Currency::parse)
    }
}

fn parse_timestamp(raw: &str) -> Option<chrono::NaiveDateTime> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|t| t.naive_utc())
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Newest upload first; rows with unparsable timestamps sink to the bottom.
pub fn sort_newest_first(records: &mut [UploadedFileRecord]) {
    records.sort_by(|a, b| {
        let ta = parse_timestamp(&a.upload_timestamp);
        let tb = parse_timestamp(&b.upload_timestamp);
        match (ta, tb) {
            (Some(ta), Some(tb)) => tb.cmp(&ta),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.upload_timestamp.cmp(&a.upload_timestamp),
        }
    });
}

#[derive(Clone, Debug, Deserialize)]
pub struct UploadResponse {
    pub file_id: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ForecastRequest {
    pub currency: String,
    pub forecast_anchor_date: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ForecastGenerateResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Row of `GET /files/forecast/latest`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ForecastPoint {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Forecasted Amount")]
    pub forecasted_amount: f64,
    #[serde(rename = "Forecasted Cash Balance")]
    pub forecasted_balance: f64,
    #[serde(rename = "Actual Cash Balance", default)]
    pub actual_balance: Option<f64>,
}

/// Row of `GET /summary-output/usd`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SummaryPoint {
    pub id: i64,
    #[serde(rename = "Reporting Date", default)]
    pub reporting_date: Option<String>,
    #[serde(rename = "Previous Balance", default)]
    pub previous_balance: Option<f64>,
    #[serde(rename = "Opening Balance", default)]
    pub opening_balance: Option<f64>,
    #[serde(rename = "Net Activity", default)]
    pub net_activity: Option<f64>,
    #[serde(rename = "Closing Balance", default)]
    pub closing_balance: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Saved liquidity ratios, already expressed in percent.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LiquidityRatioRecord {
    pub id: String,
    pub reporting_date: String,
    pub statutory_ratio: Option<f64>,
    pub core_ratio: Option<f64>,
    pub total_ratio: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UsdExposureRecord {
    pub id: String,
    pub reporting_date: String,
    pub usd_exposure: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}
