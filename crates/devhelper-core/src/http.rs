//! One-shot HTTP client for poking at APIs.
//!
//! A request is sent once: no retries, and non-2xx statuses come back as
//! ordinary [`HttpResponse`]s rather than errors.

use crate::error::{Error, Result};
use crate::highlight::Language;
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::{Method, Url};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Client-wide behaviour, usually filled from the config file and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    pub user_agent: String,
    /// Sent with every request unless the request sets the same header.
    pub default_headers: Vec<(String, String)>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            follow_redirects: true,
            max_redirects: 10,
            insecure: false,
            user_agent: format!("DevHelper/{}", env!("CARGO_PKG_VERSION")),
            default_headers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: Option<String>,
}

impl BasicAuth {
    /// Build credentials from `user` or `user:password`; an explicit
    /// `password` wins over one embedded in `user`.
    pub fn parse(user: &str, password: Option<&str>) -> Self {
        match (user.split_once(':'), password) {
            (_, Some(password)) => Self {
                username: user.to_string(),
                password: Some(password.to_string()),
            },
            (Some((name, embedded)), None) => Self {
                username: name.to_string(),
                password: Some(embedded.to_string()),
            },
            (None, None) => Self {
                username: user.to_string(),
                password: None,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub basic_auth: Option<BasicAuth>,
}

impl RequestSpec {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    /// e.g. `HTTP/1.1`
    pub version: String,
    /// Lowercase header names, sorted; repeated headers joined with `, `.
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    pub elapsed: Duration,
}

impl HttpResponse {
    /// `200 OK`
    pub fn status_line(&self) -> String {
        format!("{} {}", self.status, self.reason).trim_end().to_string()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }

    /// Lexer for the body, from the content type or by sniffing.
    pub fn language(&self) -> Language {
        let text = String::from_utf8_lossy(&self.body);
        self.content_type()
            .and_then(Language::from_content_type)
            .unwrap_or_else(|| Language::detect(&text))
    }

    /// Body text with JSON re-indented; other bodies are returned as-is.
    pub fn pretty_body(&self) -> String {
        let text = String::from_utf8_lossy(&self.body).into_owned();
        if self.language() == Language::Json {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
                if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                    return pretty;
                }
            }
        }
        text
    }
}

pub struct HttpClient {
    client: Client,
    default_headers: Vec<(String, String)>,
}

impl HttpClient {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let redirect = if settings.follow_redirects {
            Policy::limited(settings.max_redirects)
        } else {
            Policy::none()
        };
        let client = Client::builder()
            .timeout(settings.timeout)
            .redirect(redirect)
            .user_agent(settings.user_agent.clone())
            .danger_accept_invalid_certs(settings.insecure)
            .build()?;
        Ok(Self {
            client,
            default_headers: settings.default_headers.clone(),
        })
    }

    pub fn send(&self, request: &RequestSpec) -> Result<HttpResponse> {
        let method = Method::from_bytes(request.method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|_| Error::InvalidArgument(format!("invalid HTTP method: '{}'", request.method)))?;
        let url = normalize_url(&request.url)?;
        info!("{method} {url}");

        let mut builder = self.client.request(method, url);
        for (name, value) in merge_headers(&self.default_headers, &request.headers) {
            builder = builder.header(name, value);
        }
        if let Some(auth) = &request.basic_auth {
            builder = builder.basic_auth(&auth.username, auth.password.as_ref());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let started = Instant::now();
        let response = builder.send()?;
        let status = response.status();
        let version = format!("{:?}", response.version());

        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers
                .entry(name.as_str().to_string())
                .and_modify(|joined| {
                    joined.push_str(", ");
                    joined.push_str(&value);
                })
                .or_insert_with(|| value.clone());
        }
        let body = response.bytes()?.to_vec();
        let elapsed = started.elapsed();
        debug!("{} in {:?}, {} body bytes", status, elapsed, body.len());

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            version,
            headers,
            body,
            elapsed,
        })
    }
}

/// Split `Name: value` into its trimmed parts.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(Error::InvalidArgument(format!(
            "invalid header '{raw}' (expected 'Name: value')"
        ))),
    }
}

/// Accept bare `host/path` by assuming `http://`.
fn normalize_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    Url::parse(&candidate).map_err(|err| Error::InvalidArgument(format!("invalid URL '{raw}': {err}")))
}

/// Request headers override defaults with the same (case-insensitive) name.
fn merge_headers<'a>(
    defaults: &'a [(String, String)],
    explicit: &'a [(String, String)],
) -> Vec<(&'a str, &'a str)> {
    defaults
        .iter()
        .filter(|(name, _)| !explicit.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)))
        .chain(explicit)
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_headers_override_defaults() {
        let defaults = vec![
            ("Accept".to_string(), "*/*".to_string()),
            ("X-Team".to_string(), "core".to_string()),
        ];
        let explicit = vec![("accept".to_string(), "application/json".to_string())];
        let merged = merge_headers(&defaults, &explicit);
        assert_eq!(merged, vec![("X-Team", "core"), ("accept", "application/json")]);
    }

    #[test]
    fn bare_hosts_get_a_scheme() {
        assert_eq!(
            normalize_url("example.com/api").unwrap().as_str(),
            "http://example.com/api"
        );
        assert_eq!(
            normalize_url("https://example.com").unwrap().as_str(),
            "https://example.com/"
        );
        assert!(normalize_url("http://").is_err());
    }
}
