//! Fetch and table configuration

use crate::auth::DEFAULT_STORAGE_KEY;
use crate::client::Method;
use crate::navigation::DEFAULT_LOGIN_PATH;
use crate::table::PageSize;

/// Configuration shared by fetch lifecycles.
///
/// # Example
///
/// ```
/// use schoolboard_lib::config::FetchConfig;
///
/// let config = FetchConfig::default()
///     .with_storage_key("session")
///     .with_login_path("/auth/login");
/// ```
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Local storage key holding the credential record.
    ///
    /// Default: `userKogGame`
    pub storage_key: String,

    /// Redirect target when the session is unauthorized.
    ///
    /// Default: `/login`
    pub login_path: String,

    /// Method used when a request does not name one.
    ///
    /// Default: `POST`
    pub default_method: Method,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            default_method: Method::POST,
        }
    }
}

impl FetchConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the credential storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the login redirect path.
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Sets the fallback HTTP method.
    pub fn with_default_method(mut self, method: Method) -> Self {
        self.default_method = method;
        self
    }
}

/// Initial settings for a table engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableConfig {
    /// Rows per page. Default: 10
    pub page_size: PageSize,

    /// Append sort keys instead of replacing them. Default: off
    pub multi_sort: bool,
}

impl TableConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Enables or disables multi-column sorting.
    pub fn with_multi_sort(mut self, enabled: bool) -> Self {
        self.multi_sort = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.storage_key, "userKogGame");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.default_method, Method::POST);
    }

    #[test]
    fn test_table_defaults() {
        let config = TableConfig::new().with_multi_sort(true);
        assert_eq!(config.page_size, PageSize::Ten);
        assert!(config.multi_sort);
    }
}
