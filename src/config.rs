use std::time::Duration;

const DEFAULT_PRODUCT: &str = "remote-fetch";

/// Runtime configuration for remote fetches. The host application supplies
/// its product name and version string at construction; both end up in the
/// User-Agent header of every request.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Product name embedded in the User-Agent header
    pub product: String,
    /// Version string supplied by the host application
    pub version: String,
    /// Transfer timeout applied when a request does not set one of its own.
    /// `None` means such requests run without a timeout.
    pub default_timeout: Option<Duration>,
}

impl FetchConfig {
    pub fn new(product: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            version: version.into(),
            default_timeout: None,
        }
    }

    /// Full User-Agent header value. The header name is repeated inside the
    /// value; existing update-server endpoints match on this exact form.
    pub fn user_agent(&self) -> String {
        format!("User-Agent: {} {}", self.product, self.version)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            product: DEFAULT_PRODUCT.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            default_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_repeats_header_name_in_value() {
        let config = FetchConfig::new("deskapp", "29.1.2");
        assert_eq!(config.user_agent(), "User-Agent: deskapp 29.1.2");
    }

    #[test]
    fn default_config_has_no_timeout_floor() {
        assert!(FetchConfig::default().default_timeout.is_none());
    }
}
