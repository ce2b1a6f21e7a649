use std::fmt;
use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::header::COOKIE;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use anyhow::Context;

use crate::provider::{construct_logout_url, LogoutUrlParams};
use crate::root_path::RootPath;
use crate::session::{
    join_cookies, parse_cookie_header, ClaimSet, TokenVerifier, LOCAL_ISSUER, SESSION_COOKIE_NAME,
};
use crate::settings_store::{AppSettings, SettingsStore};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_chain_fmt, see_other};

/// Logout error type
#[derive(thiserror::Error)]
pub enum LogoutError {
    #[error("Failed to retrieve application settings")]
    SettingsUnavailable(#[source] anyhow::Error),
    #[error("Failed to retrieve session token: no session cookie")]
    MissingSession,
}

impl fmt::Debug for LogoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for LogoutError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::SettingsUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingSession => StatusCode::BAD_REQUEST,
        }
    }
}

/// Collaborators of the logout handler
pub struct LogoutHandler {
    settings: Arc<dyn SettingsStore>,
    verifier: Arc<dyn TokenVerifier>,
    root_path: RootPath,
}

impl LogoutHandler {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        verifier: Arc<dyn TokenVerifier>,
        root_path: RootPath,
    ) -> Self {
        Self {
            settings,
            verifier,
            root_path,
        }
    }

    /// Fetch the current settings off the async executor
    async fn current_settings(&self) -> Result<AppSettings, LogoutError> {
        let store = Arc::clone(&self.settings);
        spawn_blocking_with_tracing(move || store.get_settings())
            .await
            .context("Failed to spawn blocking task")
            .map_err(LogoutError::SettingsUnavailable)?
            .map_err(|e| LogoutError::SettingsUnavailable(e.into()))
    }

    /// Cookie that makes the client drop the named session cookie
    fn removal_cookie(&self, name: &str) -> Cookie<'static> {
        let mut cookie = Cookie::build(name.to_string(), "")
            .path(self.root_path.cookie_path())
            .finish();
        cookie.make_removal();
        cookie
    }

    /// Decide where to send the client once its cookies are cleared
    fn destination(&self, cookies: &str, settings: &AppSettings, local_redirect: String) -> String {
        let span = tracing::Span::current();

        let token = match join_cookies(SESSION_COOKIE_NAME, cookies) {
            Ok(token) => token,
            Err(e) => {
                span.record("session_kind", "invalid");
                tracing::warn!(error.cause_chain = ?e, "Malformed session cookies");
                return local_redirect;
            }
        };

        let claims = match self.verifier.verify(&token) {
            Ok(claims) => claims,
            Err(e) => {
                span.record("session_kind", "invalid");
                tracing::info!(error.cause_chain = ?e, "Session token failed verification");
                return local_redirect;
            }
        };

        let claims = match ClaimSet::from_claims(claims) {
            Ok(claims) => claims,
            Err(e) => {
                span.record("session_kind", "invalid");
                tracing::warn!(error.cause_chain = ?e, "Session token carries malformed claims");
                return local_redirect;
            }
        };

        let issuer = claims.issuer().unwrap_or_default();
        span.record("issuer", issuer);
        if let Some(subject) = claims.subject() {
            span.record("subject", subject);
        }

        match settings.provider_logout_url() {
            Some(template) if issuer != LOCAL_ISSUER => {
                span.record("session_kind", "external");
                construct_logout_url(
                    template,
                    &LogoutUrlParams {
                        token: &token,
                        logout_redirect_url: &local_redirect,
                    },
                )
            }
            _ => {
                span.record("session_kind", "local");
                local_redirect
            }
        }
    }
}

/// Logout handler: clear session cookies and redirect to the local landing page,
/// or to the identity provider logout endpoint for externally issued sessions
#[allow(clippy::future_not_send)]
#[tracing::instrument(
    name = "Logout",
    skip(req, handler),
    fields(
        session_kind = tracing::field::Empty,
        issuer = tracing::field::Empty,
        subject = tracing::field::Empty
    )
)]
pub async fn logout(
    req: HttpRequest,
    handler: web::Data<LogoutHandler>,
) -> Result<HttpResponse, LogoutError> {
    let settings = handler.current_settings().await?;
    let local_redirect = handler.root_path.local_redirect(&settings.url);

    // Read raw header values: the token must reach the verifier and the provider exactly as sent
    let session_cookies: Vec<(String, String)> = req
        .headers()
        .get_all(COOKIE)
        .filter_map(|header| header.to_str().ok())
        .flat_map(parse_cookie_header)
        .filter(|(name, _)| name.starts_with(SESSION_COOKIE_NAME))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    if session_cookies.is_empty() {
        return Err(LogoutError::MissingSession);
    }

    let removals: Vec<_> = session_cookies
        .iter()
        .map(|(name, _)| handler.removal_cookie(name))
        .collect();

    let joined = session_cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ");
    let destination = handler.destination(&joined, &settings, local_redirect);

    let mut response = see_other(&destination);
    for cookie in removals {
        response.cookie(cookie);
    }
    Ok(response.finish())
}
