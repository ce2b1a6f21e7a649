/// Placeholder replaced with the raw session token
pub const TOKEN_PLACEHOLDER: &str = "{{token}}";
/// Placeholder replaced with the local post-logout destination
pub const LOGOUT_REDIRECT_PLACEHOLDER: &str = "{{logoutRedirectURL}}";

/// Values substituted into a provider logout URL template
#[derive(Debug, Clone, Copy)]
pub struct LogoutUrlParams<'a> {
    pub token: &'a str,
    pub logout_redirect_url: &'a str,
}

/// Build the identity provider logout URL from its template.
///
/// Substitution is literal: values are not URL-encoded and the result is not validated.
pub fn construct_logout_url(template: &str, params: &LogoutUrlParams<'_>) -> String {
    template
        .replace(TOKEN_PLACEHOLDER, params.token)
        .replace(LOGOUT_REDIRECT_PLACEHOLDER, params.logout_redirect_url)
}
