//! REST client for the finance backend.
//!
//! Every authenticated request carries the stored access token as a bearer token. A `401` triggers
//! exactly one refresh through `/token/refresh/` followed by one retry of the original request. If
//! the refresh itself fails the stored session is cleared and the caller gets
//! [`Error::SessionExpired`], which the presentation layer treats as "go to the login screen".

use super::{
    FinanceDataSource,
    session::{Session, SessionStore, UserProfile},
};
use crate::{
    config::settings::ApiSettings,
    entities::{
        ChangePasswordRequest, LoginRequest, NewBudget, NewTransaction, PaymentCheckout,
        RawBudget, RawCategory, RawTransaction, RefreshRequest, ResetPasswordConfirmRequest,
        ResetPasswordRequest, SignUpRequest, TokenPair,
    },
    errors::{Error, Result},
    models::TransactionId,
};
use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Refresh responses sometimes omit the rotated refresh token.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// Whether a request carries the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Bearer,
    Anonymous,
}

/// Finance backend over HTTP, with tokens kept in a [`SessionStore`].
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Builds a client for `settings.base_url`, keeping tokens in `session`.
    pub fn new(settings: &ApiSettings, session: Arc<dyn SessionStore>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| Error::Config {
            message: format!("Failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            session,
            timeout: settings.timeout(),
        })
    }

    /// True when a session is stored.
    pub fn is_logged_in(&self) -> bool {
        matches!(self.session.load(), Ok(Some(_)))
    }

    /// The stored session, if any.
    pub fn session(&self) -> Result<Option<Session>> {
        self.session.load()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                after: self.timeout.unwrap_or_default(),
            }
        } else {
            Error::from(err)
        }
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        token: Option<&str>,
    ) -> Result<Response> {
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await.map_err(|e| self.transport_error(e))
    }

    #[instrument(skip(self, body), fields(status))]
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        auth: Auth,
    ) -> Result<Response> {
        let session = match auth {
            Auth::Bearer => self.session.load()?,
            Auth::Anonymous => None,
        };
        let token = session.as_ref().map(|s| s.access.as_str());
        let response = self
            .send_once(method.clone(), path, body.as_ref(), token)
            .await?;
        tracing::Span::current().record("status", response.status().as_u16());

        if response.status() != StatusCode::UNAUTHORIZED || auth == Auth::Anonymous {
            return check_status(response).await;
        }
        let Some(session) = session else {
            return check_status(response).await;
        };

        debug!("Access token rejected for {}, refreshing once", path);
        let refreshed = match self.refresh_session(&session).await {
            Ok(refreshed) => refreshed,
            Err(e) => {
                warn!("Token refresh failed, clearing session: {}", e);
                self.session.clear()?;
                return Err(Error::SessionExpired);
            }
        };

        let retry = self
            .send_once(method, path, body.as_ref(), Some(&refreshed.access))
            .await?;
        check_status(retry).await
    }

    async fn refresh_session(&self, session: &Session) -> Result<Session> {
        let body = serde_json::to_value(RefreshRequest {
            refresh: session.refresh.clone(),
        })?;
        let response = self
            .send_once(Method::POST, "/token/refresh/", Some(&body), None)
            .await?;
        let refreshed: RefreshResponse = check_status(response).await?.json().await?;

        let tokens = TokenPair {
            access: refreshed.access,
            refresh: refreshed.refresh.unwrap_or_else(|| session.refresh.clone()),
        };
        let updated = session.with_tokens(tokens);
        self.session.save(&updated)?;
        info!("Access token refreshed");
        Ok(updated)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path, None, Auth::Bearer).await?;
        Ok(response.json().await?)
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B, auth: Auth) -> Result<Response> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(body), auth).await
    }

    /// `POST /login/`. Stores the returned tokens and a minimal profile.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let tokens: TokenPair = match self.post("/login/", &request, Auth::Anonymous).await {
            Ok(response) => response.json().await?,
            Err(Error::Api { status, message }) if status < 500 => {
                return Err(Error::Auth { message });
            }
            Err(e) => return Err(e),
        };

        let session = Session::new(tokens, Some(UserProfile::from_login(username)));
        self.session.save(&session)?;
        info!("Logged in as {}", username);
        Ok(session)
    }

    /// Forgets the stored session.
    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// `POST /token/refresh/` for the stored session.
    pub async fn refresh(&self) -> Result<Session> {
        let session = self.session.load()?.ok_or_else(|| Error::Auth {
            message: "Not logged in".to_string(),
        })?;
        self.refresh_session(&session).await
    }

    /// `POST /sign-up/`. The account still needs activating afterwards.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<()> {
        self.post("/sign-up/", request, Auth::Anonymous).await?;
        info!("Account created, awaiting activation");
        Ok(())
    }

    /// `POST /activate/{uid}/{token}`
    pub async fn activate_account(&self, uid: &str, token: &str) -> Result<()> {
        let path = format!("/activate/{uid}/{token}");
        self.request(Method::POST, &path, None, Auth::Anonymous)
            .await?;
        Ok(())
    }

    /// `POST /change-password/`
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<()> {
        self.post("/change-password/", request, Auth::Bearer).await?;
        Ok(())
    }

    /// `POST /reset-password/`
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<()> {
        self.post("/reset-password/", request, Auth::Anonymous).await?;
        Ok(())
    }

    /// `POST /reset-password/confirm/{uid}/{token}/`
    pub async fn reset_password_confirm(
        &self,
        uid: &str,
        token: &str,
        request: &ResetPasswordConfirmRequest,
    ) -> Result<()> {
        let path = format!("/reset-password/confirm/{uid}/{token}/");
        self.post(&path, request, Auth::Anonymous).await?;
        Ok(())
    }

    /// `POST /pay/`. Returns the hosted checkout URL.
    pub async fn make_payment(&self) -> Result<String> {
        let response = self.request(Method::POST, "/pay/", None, Auth::Bearer).await?;
        let checkout: PaymentCheckout = response.json().await?;
        checkout
            .checkout_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::UnexpectedResponse {
                message: "payment response had no checkout URL".to_string(),
            })
    }
}

#[async_trait]
impl FinanceDataSource for HttpClient {
    async fn fetch_categories(&self) -> Result<Vec<RawCategory>> {
        self.get_json("/view-categories/").await
    }

    async fn fetch_transactions(&self) -> Result<Vec<RawTransaction>> {
        self.get_json("/transactions/").await
    }

    async fn fetch_budgets(&self) -> Result<Vec<RawBudget>> {
        self.get_json("/budgets/").await
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<()> {
        self.post("/create-transaction/", transaction, Auth::Bearer)
            .await?;
        Ok(())
    }

    async fn create_budget(&self, budget: &NewBudget) -> Result<()> {
        self.post("/create-budget/", budget, Auth::Bearer).await?;
        Ok(())
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<()> {
        let path = format!("/transactions/{id}/");
        self.request(Method::DELETE, &path, None, Auth::Bearer)
            .await?;
        Ok(())
    }
}

/// Passes successful responses through and turns the rest into errors.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_detail(&body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.clone()
        }
    });

    if status == StatusCode::UNAUTHORIZED {
        Err(Error::Auth { message })
    } else {
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pulls a readable message out of an error body.
///
/// Looks at `detail`, then `message`, then the first message listed under any field (the shape
/// form errors come back in, e.g. `{"username": ["already taken"]}`).
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    for key in ["detail", "message"] {
        if let Some(text) = object.get(key).and_then(serde_json::Value::as_str) {
            return Some(text.to_string());
        }
    }
    object.values().find_map(|v| match v {
        serde_json::Value::Array(items) => items
            .first()
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        serde_json::Value::String(s) => Some(s.clone()),
        _ => None,
    })
}
