use std::time::Duration;

use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use url::Url;

use crate::config::FetchConfig;
use crate::errors::FetchError;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Descriptor for a single remote fetch.
///
/// A request with a non-empty post body (or with [`method_post`] forced) goes
/// out as a POST, everything else as a GET. Extra headers are raw
/// `"Name: Value"` lines as they would appear on the wire.
///
/// [`method_post`]: RemoteRequest::method_post
#[derive(Debug, Clone, Default)]
pub struct RemoteRequest {
    url: String,
    content_type: Option<String>,
    post_data: Option<Vec<u8>>,
    force_post: bool,
    extra_headers: Vec<String>,
    timeout_sec: u64,
}

impl RemoteRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Explicit content type. Without one, POST requests with a body default
    /// to `application/x-www-form-urlencoded`.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// UTF-8 text payload. Implies POST when non-empty.
    pub fn post_text(mut self, data: impl Into<String>) -> Self {
        self.post_data = Some(data.into().into_bytes());
        self
    }

    /// Raw byte payload, for bodies that are not valid text. Implies POST
    /// when non-empty.
    pub fn post_bytes(mut self, data: Vec<u8>) -> Self {
        self.post_data = Some(data);
        self
    }

    /// Force POST even without a body.
    pub fn method_post(mut self) -> Self {
        self.force_post = true;
        self
    }

    /// One raw header line, `"Name: Value"`. Lines that do not contain the
    /// `": "` separator are dropped silently when the request is built.
    pub fn header_line(mut self, line: impl Into<String>) -> Self {
        self.extra_headers.push(line.into());
        self
    }

    pub fn header_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_headers.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Transfer timeout in seconds; 0 leaves the request without one (the
    /// configured default, if any, applies instead).
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_sec = secs;
        self
    }

    /// Resolves the descriptor into everything the transport needs: the
    /// prepared request (URL, headers, timeout) and the body, whose presence
    /// decides between POST and GET.
    pub(crate) fn prepare(
        &self,
        config: &FetchConfig,
    ) -> Result<(Prepared, Option<Vec<u8>>), FetchError> {
        let url = Url::parse(&self.url)?;

        let mut headers = HeaderMap::new();

        let agent = config.user_agent();
        let value = HeaderValue::from_str(&agent)
            .map_err(|_| FetchError::InvalidHeader(agent.clone()))?;
        headers.insert(USER_AGENT, value);

        if let Some(content_type) = &self.content_type {
            let value = HeaderValue::from_str(content_type)
                .map_err(|_| FetchError::InvalidHeader(content_type.clone()))?;
            headers.insert(CONTENT_TYPE, value);
        }

        for line in &self.extra_headers {
            // Split on the first ": "; lines without it are not header lines.
            let Some((name, value)) = line.split_once(": ") else {
                continue;
            };
            let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) else {
                continue;
            };
            headers.insert(name, value);
        }

        let has_body = self.post_data.as_ref().is_some_and(|data| !data.is_empty());
        if has_body && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        }

        let body = if self.force_post || has_body {
            Some(self.post_data.clone().unwrap_or_default())
        } else {
            None
        };

        let timeout = if self.timeout_sec > 0 {
            Some(Duration::from_millis(self.timeout_sec * 1000))
        } else {
            config.default_timeout
        };

        Ok((Prepared { url, headers, timeout }, body))
    }
}

/// A fully resolved outgoing request, minus the body. The transport turns
/// this into a wire request via its GET or POST dispatch.
#[derive(Debug)]
pub(crate) struct Prepared {
    pub url: Url,
    pub headers: HeaderMap,
    pub timeout: Option<Duration>,
}
