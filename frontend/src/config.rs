//! Client configuration.
//!
//! The backend host is picked at build time from `API_BASE_URL`
//! (e.g. `API_BASE_URL=https://forecast.example.com trunk build`).

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

pub const API_BASE_URL: &str = match option_env!("API_BASE_URL") {
    Some(url) => url,
    None => DEFAULT_API_BASE_URL,
};

/// `localStorage` key holding the bearer token.
pub const TOKEN_STORAGE_KEY: &str = "accessToken";

/// Page size used when collecting `/summary-output/usd`.
pub const SUMMARY_PAGE_SIZE: usize = 100;

/// Rows revealed per "Load more" click on the USD summary table.
pub const SUMMARY_ROWS_PER_LOAD: usize = 10;

/// Joins the base URL and an API path without doubling the slash.
pub fn api_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path() {
        assert_eq!(
            api_url("http://127.0.0.1:8000", "/auth/login"),
            "http://127.0.0.1:8000/auth/login"
        );
        assert_eq!(
            api_url("https://api.example.com/", "/files/history"),
            "https://api.example.com/files/history"
        );
    }
}
