//! Backend gateway.
//!
//! Every call goes through [`ApiClient`], which attaches the bearer token,
//! turns non-2xx answers into [`ApiError`] and tears the session down on 401.

mod endpoints;
mod scope;

pub use scope::{use_request_scope, RequestScope};

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::AbortSignal;

use crate::config::api_url;
use crate::error::ApiError;
use crate::session::SessionContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Auth {
    Bearer,
    /// Login: no token yet, and a 401 means bad credentials rather than an
    /// expired session.
    Anonymous,
    /// Token issued moments ago by login. A 401 here means the profile is
    /// unavailable; it does not end the session that was just started.
    Fresh,
}

/// How a status code is handled before the body is looked at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Success,
    /// 404 where "nothing yet" is a valid answer.
    Missing,
    SessionExpired,
    Failed,
}

fn classify(status: u16, auth: Auth, missing_ok: bool) -> Status {
    match status {
        200..=299 => Status::Success,
        404 if missing_ok => Status::Missing,
        401 if auth == Auth::Bearer => Status::SessionExpired,
        _ => Status::Failed,
    }
}

#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    session: SessionContext,
    signal: Option<AbortSignal>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Self {
        Self {
            base_url: base_url.into(),
            session,
            signal: None,
        }
    }

    /// Copy of this client whose requests are aborted when `scope` is
    /// cancelled.
    pub fn scoped(&self, scope: &RequestScope) -> Self {
        Self {
            signal: scope.signal(),
            ..self.clone()
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn builder(&self, method: &str, path: &str, auth: Auth) -> RequestBuilder {
        let url = api_url(&self.base_url, path);
        let mut builder = match method {
            "POST" => Request::post(&url),
            _ => Request::get(&url),
        };
        if auth != Auth::Anonymous {
            if let Some(token) = self.session.token() {
                builder = builder.header("Authorization", &format!("Bearer {}", token));
            }
        }
        builder.abort_signal(self.signal.as_ref())
    }

    fn aborted(&self) -> bool {
        self.signal.as_ref().map(|s| s.aborted()).unwrap_or(false)
    }

    async fn dispatch(
        &self,
        method: &str,
        path: &str,
        request: Result<Request, gloo_net::Error>,
    ) -> Result<Response, ApiError> {
        let request = request.map_err(|e| {
            log::error!("{} {}: could not build request: {}", method, path, e);
            ApiError::Decode(e.to_string())
        })?;
        log::debug!("{} {}", method, path);
        match request.send().await {
            Ok(resp) if self.aborted() => {
                log::debug!("{} {} answered {} after cancellation", method, path, resp.status());
                Err(ApiError::Cancelled)
            }
            Ok(resp) => Ok(resp),
            Err(_) if self.aborted() => Err(ApiError::Cancelled),
            Err(e) => {
                log::warn!("{} {}: {}", method, path, e);
                Err(ApiError::Network)
            }
        }
    }

    /// Classifies `status` and ends the session on an expired bearer token.
    fn triage(
        &self,
        method: &str,
        path: &str,
        status: u16,
        auth: Auth,
        missing_ok: bool,
    ) -> Result<Status, ApiError> {
        match classify(status, auth, missing_ok) {
            Status::SessionExpired => {
                log::warn!("{} {}: session rejected, signing out", method, path);
                self.session.invalidate();
                Err(ApiError::AuthExpired)
            }
            other => Ok(other),
        }
    }

    /// Passes 2xx responses through (and 404 as `None` when `missing_ok`),
    /// converts everything else.
    async fn check(
        &self,
        method: &str,
        path: &str,
        auth: Auth,
        missing_ok: bool,
        resp: Response,
    ) -> Result<Option<Response>, ApiError> {
        let status = resp.status();
        match self.triage(method, path, status, auth, missing_ok)? {
            Status::Success => Ok(Some(resp)),
            Status::Missing => Ok(None),
            Status::SessionExpired | Status::Failed => {
                let body = resp.text().await.unwrap_or_default();
                let err = rejection(method, path, status, &resp.status_text(), &body);
                log::warn!("{} {} -> {}: {}", method, path, status, err);
                Err(err)
            }
        }
    }

    async fn decode<T: DeserializeOwned>(path: &str, resp: Response) -> Result<T, ApiError> {
        resp.json::<T>().await.map_err(|e| {
            log::error!("{}: unexpected response body: {}", path, e);
            ApiError::from(e)
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        auth: Auth,
        request: Result<Request, gloo_net::Error>,
    ) -> Result<T, ApiError> {
        let resp = self.dispatch(method, path, request).await?;
        match self.check(method, path, auth, false, resp).await? {
            Some(resp) => Self::decode(path, resp).await,
            None => Err(ApiError::Decode(format!("{}: empty answer", path))),
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.builder("GET", path, Auth::Bearer).build();
        self.send("GET", path, Auth::Bearer, request).await
    }

    /// GET with the token login just returned; see [`Auth::Fresh`].
    async fn get_json_fresh<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.builder("GET", path, Auth::Fresh).build();
        self.send("GET", path, Auth::Fresh, request).await
    }

    /// Like [`get_json`](Self::get_json) but a 404 means "nothing yet".
    pub async fn get_optional_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        let request = self.builder("GET", path, Auth::Bearer).build();
        let resp = self.dispatch("GET", path, request).await?;
        match self.check("GET", path, Auth::Bearer, true, resp).await? {
            Some(resp) => Self::decode(path, resp).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.builder("POST", path, Auth::Bearer).json(body);
        self.send("POST", path, Auth::Bearer, request).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: web_sys::FormData,
    ) -> Result<T, ApiError> {
        let request = self.builder("POST", path, Auth::Bearer).body(form);
        self.send("POST", path, Auth::Bearer, request).await
    }

    async fn post_form_anonymous<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let request = self
            .builder("POST", path, Auth::Anonymous)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(form_urlencode(fields));
        self.send("POST", path, Auth::Anonymous, request).await
    }
}

/// Error for a non-2xx answer: the backend's `detail` string when there is
/// one, otherwise a description of the failed call.
pub(crate) fn rejection(
    method: &str,
    path: &str,
    status: u16,
    status_text: &str,
    body: &str,
) -> ApiError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .filter(|d| !d.trim().is_empty());
    match detail {
        Some(detail) => ApiError::Rejected(detail),
        None => ApiError::Rejected(
            format!("{} {} failed: {} {}", method, path, status, status_text)
                .trim_end()
                .to_string(),
        ),
    }
}

pub(crate) fn form_urlencode(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::session_with;

    fn client_with_token() -> (ApiClient, SessionContext, std::rc::Rc<std::cell::Cell<u32>>) {
        let (session, _, expired) = session_with(Some("abc"));
        (ApiClient::new("http://localhost:8000", session.clone()), session, expired)
    }

    #[test]
    fn expired_bearer_token_ends_the_session() {
        let (client, session, expired) = client_with_token();
        let result = client.triage("GET", "/files/history", 401, Auth::Bearer, false);
        assert_eq!(result, Err(ApiError::AuthExpired));
        assert!(!session.is_active());
        assert_eq!(expired.get(), 1);
    }

    #[test]
    fn unauthorized_login_is_a_rejection() {
        let (client, session, expired) = client_with_token();
        let result = client.triage("POST", "/auth/login", 401, Auth::Anonymous, false);
        assert_eq!(result, Ok(Status::Failed));
        assert!(session.is_active());
        assert_eq!(expired.get(), 0);
    }

    #[test]
    fn profile_right_after_login_keeps_the_new_session() {
        let (client, session, expired) = client_with_token();
        let result = client.triage("GET", "/auth/users/me", 401, Auth::Fresh, false);
        assert_eq!(result, Ok(Status::Failed));
        assert!(session.is_active());
        assert_eq!(expired.get(), 0);
    }

    #[test]
    fn not_found_means_nothing_yet_only_where_allowed() {
        let (client, session, _) = client_with_token();
        assert_eq!(
            client.triage("GET", "/usd-exposure/latest", 404, Auth::Bearer, true),
            Ok(Status::Missing)
        );
        assert_eq!(
            client.triage("GET", "/files/history", 404, Auth::Bearer, false),
            Ok(Status::Failed)
        );
        assert_eq!(
            client.triage("GET", "/usd-exposure/latest", 200, Auth::Bearer, true),
            Ok(Status::Success)
        );
        assert!(session.is_active());
    }

    #[test]
    fn server_errors_never_touch_the_session() {
        assert_eq!(classify(500, Auth::Bearer, true), Status::Failed);
        assert_eq!(classify(403, Auth::Bearer, false), Status::Failed);
        assert_eq!(classify(204, Auth::Anonymous, false), Status::Success);
    }

    #[test]
    fn detail_field_wins() {
        let err = rejection(
            "POST",
            "/auth/login",
            400,
            "Bad Request",
            r#"{"detail":"Incorrect email or password"}"#,
        );
        assert_eq!(err, ApiError::Rejected("Incorrect email or password".to_string()));
    }

    #[test]
    fn falls_back_to_method_path_and_status() {
        let err = rejection("GET", "/files/history", 500, "Internal Server Error", "<html>");
        assert_eq!(
            err,
            ApiError::Rejected(
                "GET /files/history failed: 500 Internal Server Error".to_string()
            )
        );
    }

    #[test]
    fn structured_detail_is_not_used_verbatim() {
        // Validation errors carry a list, which is not a user-facing message.
        let err = rejection(
            "POST",
            "/liquidity-ratios/",
            422,
            "Unprocessable Entity",
            r#"{"detail":[{"loc":["body","1010"],"msg":"value is not a valid float"}]}"#,
        );
        assert_eq!(
            err,
            ApiError::Rejected(
                "POST /liquidity-ratios/ failed: 422 Unprocessable Entity".to_string()
            )
        );
    }

    #[test]
    fn empty_status_text_does_not_leave_trailing_space() {
        let err = rejection("GET", "/admin/users", 502, "", "");
        assert_eq!(err, ApiError::Rejected("GET /admin/users failed: 502".to_string()));
    }

    #[test]
    fn login_form_is_url_encoded() {
        assert_eq!(
            form_urlencode(&[("username", "a+b@example.com"), ("password", "p&ss word")]),
            "username=a%2Bb%40example.com&password=p%26ss%20word"
        );
    }
}
