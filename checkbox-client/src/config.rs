//! Client configuration

use std::time::Duration;

use crate::request::Headers;

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.checkbox.ua";
/// API version segment used in request URLs
pub const DEFAULT_API_VERSION: &str = "1";
/// Per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// Delay between two polls of a status wait
pub const DEFAULT_RELAX: Duration = Duration::from_millis(500);

pub const CLIENT_NAME_HEADER: &str = "x-client-name";
pub const CLIENT_VERSION_HEADER: &str = "x-client-version";
pub const ACCESS_KEY_HEADER: &str = "x-access-key";

/// Client configuration for connecting to the fiscal API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://api.checkbox.ua")
    pub base_url: String,

    /// API version, rendered as `/api/v{api_version}/`
    pub api_version: String,

    /// Request timeout
    pub timeout: Duration,

    /// Default delay between status polls
    pub relax: Duration,

    /// Reported to the server as `X-Client-Name`
    pub client_name: String,

    /// Reported to the server as `X-Client-Version`
    pub client_version: String,

    /// Integration key, sent as `X-Access-Key` when present
    pub integration_key: Option<String>,

    /// Proxy URL applied to every request
    pub proxy: Option<String>,

    /// Skip TLS certificate validation (test stands only)
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Create a new client configuration for the given server
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            relax: DEFAULT_RELAX,
            client_name: env!("CARGO_PKG_NAME").to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            integration_key: None,
            proxy: None,
            accept_invalid_certs: false,
        }
    }

    /// Reads `CHECKBOX_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(
            lookup("CHECKBOX_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        );
        if let Some(version) = lookup("CHECKBOX_API_VERSION") {
            config.api_version = version;
        }
        if let Some(secs) = lookup("CHECKBOX_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = lookup("CHECKBOX_RELAX_MS").and_then(|v| v.parse().ok()) {
            config.relax = Duration::from_millis(ms);
        }
        if let Some(name) = lookup("CHECKBOX_CLIENT_NAME") {
            config.client_name = name;
        }
        if let Some(version) = lookup("CHECKBOX_CLIENT_VERSION") {
            config.client_version = version;
        }
        config.integration_key = lookup("CHECKBOX_INTEGRATION_KEY");
        config.proxy = lookup("CHECKBOX_PROXY");
        config.accept_invalid_certs = lookup("CHECKBOX_ACCEPT_INVALID_CERTS")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        config
    }

    /// Set the API version
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the default delay between status polls
    pub fn with_relax(mut self, relax: Duration) -> Self {
        self.relax = relax;
        self
    }

    /// Set the client name and version reported to the server
    pub fn with_client(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.client_name = name.into();
        self.client_version = version.into();
        self
    }

    /// Set the integration key
    pub fn with_integration_key(mut self, key: impl Into<String>) -> Self {
        self.integration_key = Some(key.into());
        self
    }

    /// Route requests through a proxy
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Accept invalid TLS certificates
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Root every descriptor path is joined onto
    pub fn api_root(&self) -> String {
        format!(
            "{}/api/v{}",
            self.base_url.trim_end_matches('/'),
            self.api_version
        )
    }

    /// Headers sent with every request, before session headers
    pub fn client_headers(&self) -> Headers {
        let mut headers = Headers::new()
            .with(CLIENT_NAME_HEADER, &self.client_name)
            .with(CLIENT_VERSION_HEADER, &self.client_version);
        if let Some(key) = &self.integration_key {
            headers.insert(ACCESS_KEY_HEADER, key);
        }
        headers
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
