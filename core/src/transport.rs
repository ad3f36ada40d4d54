//! Executes `HttpRequest`s over the network.
//!
//! The client never retries: a timeout or connection failure is returned to
//! the caller as `ApiError::Transport` on the first attempt.

use std::io::Read;
use std::time::Duration;

use flate2::read::ZlibDecoder;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Global timeout applied to every call, connect through body read.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Performs one HTTP round-trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses come back as data for the status rules to classify.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &REQUEST_TIMEOUT)
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                for (key, value) in &request.query {
                    builder = builder.query(key, value);
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                for (key, value) in &request.query {
                    builder = builder.query(key, value);
                }
                builder.send(request.body.as_deref().unwrap_or("").as_bytes())
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let raw = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = decode_body(raw, content_encoding(&headers))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn content_encoding(headers: &[(String, String)]) -> Option<&str> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-encoding"))
        .map(|(_, value)| value.trim())
}

/// ureq decodes gzip itself; `deflate` (zlib-wrapped) bodies arrive raw.
fn decode_body(raw: Vec<u8>, encoding: Option<&str>) -> Result<String, ApiError> {
    let bytes = match encoding {
        Some(encoding) if encoding.eq_ignore_ascii_case("deflate") => {
            let mut inflated = Vec::new();
            ZlibDecoder::new(raw.as_slice())
                .read_to_end(&mut inflated)
                .map_err(|e| ApiError::Transport(format!("deflate: {e}")))?;
            inflated
        }
        _ => raw,
    };
    String::from_utf8(bytes).map_err(|e| ApiError::Transport(format!("io: {e}")))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    use super::*;

    fn zlib(body: &str) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(body.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn deflate_body_is_inflated() {
        let body = decode_body(zlib(r#"{"id":"acc_1"}"#), Some("deflate")).unwrap();
        assert_eq!(body, r#"{"id":"acc_1"}"#);
    }

    #[test]
    fn identity_body_passes_through() {
        let body = decode_body(b"plain".to_vec(), None).unwrap();
        assert_eq!(body, "plain");
    }

    #[test]
    fn corrupt_deflate_body_is_transport_error() {
        let err = decode_body(b"not zlib".to_vec(), Some("Deflate")).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn content_encoding_lookup_ignores_case() {
        let headers = vec![("Content-Encoding".to_string(), "deflate ".to_string())];
        assert_eq!(content_encoding(&headers), Some("deflate"));
    }
}
