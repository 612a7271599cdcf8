use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context as _;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ServiceConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Failures reported by the hosted auth API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailInUse,

    #[error("Auth service rejected the request ({status}): {message}")]
    Service { status: u16, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: u64,
    pub user: AuthUser,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

/// Result of registering a new auth user.
#[derive(Clone, Debug)]
pub enum SignUp {
    /// The service signed the user in immediately.
    Session(Session),
    /// The service requires email confirmation before a session is issued.
    ConfirmationRequired(AuthUser),
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: u64,
    user: AuthUser,
}

#[derive(Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<Uuid>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the hosted service. Every request carries the anon key.
#[derive(Clone, Debug)]
pub struct ServiceClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: ServiceConfig,
}

impl ServiceClient {
    pub fn new(config: ServiceConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build service http client")?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub(crate) fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", self.config.anon_key())
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> anyhow::Result<SignUp> {
        let response = self
            .with_key(self.http.post(self.config.endpoint("auth/v1/signup")))
            .json(&json!({ "email": email.trim(), "password": password }))
            .send()
            .await
            .context("sign-up request failed")?;

        let body: SignUpResponse = parse_auth_response(response).await?;

        if let (Some(access_token), Some(refresh_token), Some(user)) =
            (body.access_token, body.refresh_token, body.user.clone())
        {
            let session = Session {
                access_token,
                refresh_token,
                expires_at: expires_at(body.expires_in.unwrap_or(3_600)),
                user,
            };
            info!(user_id = %session.user_id(), "signed up with immediate session");
            return Ok(SignUp::Session(session));
        }

        let user = body
            .user
            .or(body.id.map(|id| AuthUser {
                id,
                email: body.email,
            }))
            .context("sign-up response did not include a user")?;
        info!(user_id = %user.id, "signed up; email confirmation required");
        Ok(SignUp::ConfirmationRequired(user))
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> anyhow::Result<Session> {
        let response = self
            .with_key(
                self.http
                    .post(self.config.endpoint("auth/v1/token?grant_type=password")),
            )
            .json(&json!({ "email": email.trim(), "password": password }))
            .send()
            .await
            .context("sign-in request failed")?;

        let session = parse_auth_response::<TokenResponse>(response)
            .await
            .map(into_session)?;
        info!(user_id = %session.user_id(), "signed in");
        Ok(session)
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> anyhow::Result<Session> {
        let response = self
            .with_key(
                self.http
                    .post(self.config.endpoint("auth/v1/token?grant_type=refresh_token")),
            )
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .context("session refresh request failed")?;

        let session = parse_auth_response::<TokenResponse>(response)
            .await
            .map(into_session)?;
        debug!(user_id = %session.user_id(), "session refreshed");
        Ok(session)
    }

    pub async fn sign_out(&self, session: &Session) -> anyhow::Result<()> {
        let response = self
            .with_key(self.http.post(self.config.endpoint("auth/v1/logout")))
            .bearer_auth(&session.access_token)
            .send()
            .await
            .context("sign-out request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(service_error(status, response).await.into());
        }

        info!(user_id = %session.user_id(), "signed out");
        Ok(())
    }
}

fn into_session(token: TokenResponse) -> Session {
    Session {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at: expires_at(token.expires_in),
        user: token.user,
    }
}

fn expires_at(expires_in: u64) -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
        .saturating_add(expires_in)
}

async fn parse_auth_response<T>(response: Response) -> anyhow::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let status = response.status();
    if !status.is_success() {
        return Err(service_error(status, response).await.into());
    }

    response
        .json::<T>()
        .await
        .context("failed to decode auth service response")
}

pub(crate) async fn service_error(status: StatusCode, response: Response) -> AuthError {
    let text = response.text().await.unwrap_or_default();
    classify_error(status, &text)
}

/// Map an error status and body from the auth API onto `AuthError`.
pub(crate) fn classify_error(status: StatusCode, body: &str) -> AuthError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed
        .error_code
        .as_deref()
        .or(parsed.error.as_deref())
        .unwrap_or_default();

    match code {
        "invalid_grant" | "invalid_credentials" => return AuthError::InvalidCredentials,
        "user_already_exists" | "email_exists" => return AuthError::EmailInUse,
        _ => {}
    }

    let message = parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| body.trim().chars().take(200).collect());

    if status == StatusCode::UNPROCESSABLE_ENTITY && message.contains("already registered") {
        return AuthError::EmailInUse;
    }

    AuthError::Service {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{AuthError, ServiceClient, classify_error};
    use crate::ServiceConfig;

    #[test]
    fn bad_credentials_are_recognised() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(
            classify_error(StatusCode::BAD_REQUEST, body),
            AuthError::InvalidCredentials
        );

        let body = r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        assert_eq!(
            classify_error(StatusCode::BAD_REQUEST, body),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn duplicate_emails_are_recognised() {
        let body = r#"{"code":422,"msg":"User already registered"}"#;
        assert_eq!(
            classify_error(StatusCode::UNPROCESSABLE_ENTITY, body),
            AuthError::EmailInUse
        );
    }

    #[test]
    fn other_errors_keep_the_service_message() {
        assert_eq!(
            classify_error(StatusCode::TOO_MANY_REQUESTS, r#"{"msg":"slow down"}"#),
            AuthError::Service {
                status: 429,
                message: "slow down".to_owned()
            }
        );
        assert_eq!(
            classify_error(StatusCode::BAD_GATEWAY, "upstream down"),
            AuthError::Service {
                status: 502,
                message: "upstream down".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let client =
            ServiceClient::new(ServiceConfig::new("http://127.0.0.1:1", "anon").unwrap()).unwrap();

        let err = client
            .sign_in_with_password("nova@example.test", "hunter22")
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<AuthError>().is_none());
        assert_eq!(err.to_string(), "sign-in request failed");
    }
}
