use std::sync::Arc;

use chrono::Duration;
use reqwest::header::SET_COOKIE;
use serde_json::{json, Value};

use signoff::session::{split_cookie, TokenVerifier, VerifyError, SESSION_COOKIE_NAME};
use signoff::settings_store::StaticSettingsStore;

use crate::helpers::{
    assert_cookies_cleared, assert_is_redirect_to, local_settings, provider_settings, TestApp,
    UnavailableSettings, PROVIDER_LOGOUT_URL,
};

const APP_URL: &str = "https://cd.example.com/";
const ROOT_PATH: &str = "/argocd/";
const LOGOUT_PATH: &str = "/argocd/api/logout";
const LOCAL_REDIRECT: &str = "https://cd.example.comargocd";

fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE_NAME}={token}")
}

fn provider_logout_url(token: &str) -> String {
    PROVIDER_LOGOUT_URL
        .replace("{{token}}", token)
        .replace("{{logoutRedirectURL}}", LOCAL_REDIRECT)
}

/// Verifier that accepts any token and returns fixed claims
struct FixedClaims(Value);

impl TokenVerifier for FixedClaims {
    fn verify(&self, _token: &str) -> Result<Value, VerifyError> {
        Ok(self.0.clone())
    }
}

/// Verifier that only accepts one exact token string
struct ExactToken(&'static str);

impl TokenVerifier for ExactToken {
    fn verify(&self, token: &str) -> Result<Value, VerifyError> {
        if token == self.0 {
            Ok(json!({ "iss": "https://idp.example.com" }))
        } else {
            Err(VerifyError::Expired)
        }
    }
}

#[tokio::test]
async fn a_request_without_session_cookies_is_rejected() {
    let app = TestApp::spawn(ROOT_PATH, local_settings(APP_URL)).await;

    for cookies in [None, Some("theme=dark; lang=en")] {
        let response = app.get_logout(LOGOUT_PATH, cookies).await;

        assert_eq!(response.status(), 400);
        assert_eq!(response.headers().get_all(SET_COOKIE).iter().count(), 0);
    }
}

#[tokio::test]
async fn settings_retrieval_failure_returns_a_500() {
    let app = TestApp::spawn_with_store(ROOT_PATH, Arc::new(UnavailableSettings), None).await;
    let token = app.mint_token("signoff", Duration::hours(1));

    let response = app.get_logout(LOGOUT_PATH, Some(&session_cookie(&token))).await;

    assert_eq!(response.status(), 500);
    let body = response.text().await.unwrap();
    assert_eq!(body, "Failed to retrieve application settings");
}

#[tokio::test]
async fn a_local_session_redirects_to_the_local_landing_page() {
    let app = TestApp::spawn(ROOT_PATH, provider_settings(APP_URL)).await;
    let token = app.mint_token("signoff", Duration::hours(1));

    let response = app.get_logout(LOGOUT_PATH, Some(&session_cookie(&token))).await;

    assert_is_redirect_to(&response, LOCAL_REDIRECT);
    assert_cookies_cleared(&response, &[SESSION_COOKIE_NAME], "/argocd");
}

#[tokio::test]
async fn an_external_session_without_a_provider_redirects_locally() {
    let app = TestApp::spawn(ROOT_PATH, local_settings(APP_URL)).await;
    let token = app.mint_token("https://idp.example.com", Duration::hours(1));

    let response = app.get_logout(LOGOUT_PATH, Some(&session_cookie(&token))).await;

    assert_is_redirect_to(&response, LOCAL_REDIRECT);
    assert_cookies_cleared(&response, &[SESSION_COOKIE_NAME], "/argocd");
}

#[tokio::test]
async fn an_external_session_redirects_to_the_provider_logout_endpoint() {
    let app = TestApp::spawn(ROOT_PATH, provider_settings(APP_URL)).await;
    let token = app.mint_token("https://idp.example.com", Duration::hours(1));

    let response = app.get_logout(LOGOUT_PATH, Some(&session_cookie(&token))).await;

    assert_is_redirect_to(&response, &provider_logout_url(&token));
    let location = response.headers().get("Location").unwrap().to_str().unwrap();
    assert!(!location.contains("{{token}}"));
    assert!(!location.contains("{{logoutRedirectURL}}"));
    assert!(location.contains(&token));
    assert!(location.contains(LOCAL_REDIRECT));
    assert_cookies_cleared(&response, &[SESSION_COOKIE_NAME], "/argocd");
}

#[tokio::test]
async fn an_expired_session_redirects_locally_and_clears_cookies() {
    let app = TestApp::spawn(ROOT_PATH, provider_settings(APP_URL)).await;
    let token = app.mint_token("https://idp.example.com", -Duration::hours(1));

    let response = app.get_logout(LOGOUT_PATH, Some(&session_cookie(&token))).await;

    assert_is_redirect_to(&response, LOCAL_REDIRECT);
    assert_cookies_cleared(&response, &[SESSION_COOKIE_NAME], "/argocd");
}

#[tokio::test]
async fn a_garbage_token_redirects_locally_and_clears_cookies() {
    let app = TestApp::spawn(ROOT_PATH, provider_settings(APP_URL)).await;

    let response = app
        .get_logout(LOGOUT_PATH, Some(&session_cookie("not-a-token")))
        .await;

    assert_is_redirect_to(&response, LOCAL_REDIRECT);
    assert_cookies_cleared(&response, &[SESSION_COOKIE_NAME], "/argocd");
}

#[tokio::test]
async fn non_map_claims_redirect_locally() {
    let verifier: Arc<dyn TokenVerifier> = Arc::new(FixedClaims(json!(["signoff"])));
    let app = TestApp::spawn_with_store(
        ROOT_PATH,
        Arc::new(StaticSettingsStore(provider_settings(APP_URL))),
        Some(verifier),
    )
    .await;

    let response = app
        .get_logout(LOGOUT_PATH, Some(&session_cookie("anything")))
        .await;

    assert_is_redirect_to(&response, LOCAL_REDIRECT);
    assert_cookies_cleared(&response, &[SESSION_COOKIE_NAME], "/argocd");
}

#[tokio::test]
async fn a_chunked_session_is_reassembled_before_verification() {
    let app = TestApp::spawn(ROOT_PATH, provider_settings(APP_URL)).await;
    let token = app.mint_token("https://idp.example.com", Duration::hours(1));

    // Send chunks in reverse order to show that reassembly follows the suffixes
    let chunks = split_cookie(SESSION_COOKIE_NAME, &token, 40);
    assert!(chunks.len() > 2);
    let cookies = chunks
        .iter()
        .rev()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ");

    let response = app.get_logout(LOGOUT_PATH, Some(&cookies)).await;

    assert_is_redirect_to(&response, &provider_logout_url(&token));
    let names: Vec<_> = chunks.iter().map(|(name, _)| name.as_str()).collect();
    assert_cookies_cleared(&response, &names, "/argocd");
}

#[tokio::test]
async fn an_incomplete_chunk_set_redirects_locally_and_clears_cookies() {
    let app = TestApp::spawn(ROOT_PATH, provider_settings(APP_URL)).await;
    let token = app.mint_token("https://idp.example.com", Duration::hours(1));

    let chunks = split_cookie(SESSION_COOKIE_NAME, &token, 40);
    let cookies = chunks
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 1)
        .map(|(_, (name, value))| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ");

    let response = app.get_logout(LOGOUT_PATH, Some(&cookies)).await;

    assert_is_redirect_to(&response, LOCAL_REDIRECT);
    let names: Vec<_> = chunks
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 1)
        .map(|(_, (name, _))| name.as_str())
        .collect();
    assert_cookies_cleared(&response, &names, "/argocd");
}

#[tokio::test]
async fn logout_works_for_any_method() {
    let app = TestApp::spawn(ROOT_PATH, local_settings(APP_URL)).await;
    let token = app.mint_token("signoff", Duration::hours(1));

    let response = app.post_logout(LOGOUT_PATH, &session_cookie(&token)).await;

    assert_is_redirect_to(&response, LOCAL_REDIRECT);
}

#[tokio::test]
async fn repeating_a_logout_yields_the_same_outcome() {
    let app = TestApp::spawn(ROOT_PATH, provider_settings(APP_URL)).await;

    for cookies in [session_cookie("already-invalid"), session_cookie("")] {
        let first = app.get_logout(LOGOUT_PATH, Some(&cookies)).await;
        let second = app.get_logout(LOGOUT_PATH, Some(&cookies)).await;

        assert_is_redirect_to(&first, LOCAL_REDIRECT);
        assert_is_redirect_to(&second, LOCAL_REDIRECT);
    }
}

#[tokio::test]
async fn an_empty_root_path_serves_logout_at_the_top_level() {
    let app = TestApp::spawn("/", local_settings(APP_URL)).await;
    let token = app.mint_token("signoff", Duration::hours(1));

    let response = app
        .get_logout("/api/logout", Some(&session_cookie(&token)))
        .await;

    assert_is_redirect_to(&response, "https://cd.example.com");
    assert_cookies_cleared(&response, &[SESSION_COOKIE_NAME], "/");
}

#[tokio::test]
async fn percent_encoded_cookie_values_are_forwarded_as_sent() {
    let verifier: Arc<dyn TokenVerifier> = Arc::new(ExactToken("a%41b"));
    let app = TestApp::spawn_with_store(
        ROOT_PATH,
        Arc::new(StaticSettingsStore(provider_settings(APP_URL))),
        Some(verifier),
    )
    .await;

    let response = app
        .get_logout(LOGOUT_PATH, Some(&session_cookie("a%41b")))
        .await;

    assert_is_redirect_to(&response, &provider_logout_url("a%41b"));
    assert_cookies_cleared(&response, &[SESSION_COOKIE_NAME], "/argocd");
}
