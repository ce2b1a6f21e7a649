/// URL path prefix the application is served under, stored without leading or trailing slashes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootPath(String);

impl RootPath {
    /// Normalize a configured root path
    pub fn parse(path: &str) -> Self {
        Self(path.trim_matches('/').to_string())
    }

    /// Path to scope cookies to
    pub fn cookie_path(&self) -> String {
        format!("/{}", self.0)
    }

    /// Scope to mount routes under, empty when served at the top level
    pub fn scope(&self) -> String {
        if self.0.is_empty() {
            String::new()
        } else {
            self.cookie_path()
        }
    }

    /// Local post-logout destination.
    ///
    /// Both parts are trimmed of slashes and concatenated as they are: no
    /// separator is inserted between the application URL and the root path.
    pub fn local_redirect(&self, app_url: &str) -> String {
        format!("{}{}", app_url.trim_matches('/'), self.0)
    }
}

impl AsRef<str> for RootPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
