//! Client configuration.

use crate::status::DEFAULT_ALLOWED_STATUSES;

/// Everything a `PmsClient` needs to address the vendor API.
///
/// Neither `base_url` nor `api_key` is validated here; a bad value shows up as
/// a transport failure or a 401 on the first call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub allowed_statuses: Vec<u16>,
    /// Headers merged into every request before the fixed auth/accept set.
    pub default_headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            allowed_statuses: DEFAULT_ALLOWED_STATUSES.to_vec(),
            default_headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_allowed_statuses(mut self, statuses: &[u16]) -> Self {
        self.allowed_statuses = statuses.to_vec();
        self
    }

    /// Same endpoint, different key.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..self.clone()
        }
    }
}
