//! Blocking HTTP transport for the graph backend.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use serde_json::Value;
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

use super::{extract_error_message, Endpoint, Gateway, Method, RequestError};
use crate::persistence::settings::AppSettings;

fn ensure_dir(p: &Path) {
    if let Some(parent) = p.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}

fn log_line(dir: &Path, line: &str) {
    use std::io::Write;
    let now = OffsetDateTime::now_utc();
    let date = time::macros::format_description!("[year][month][day]");
    let ts = time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let fname = match now.format(&date) { Ok(s) => format!("requests_{}.log", s), Err(_) => "requests.log".to_string() };
    let path = dir.join(fname);
    ensure_dir(&path);
    let ts_s = now.format(&ts).unwrap_or_else(|_| String::new());
    let msg = format!("{} | {}\n", ts_s, line);
    if let Ok(mut f) = std::fs::OpenOptions::new().create(true).append(true).open(&path) {
        let _ = f.write_all(msg.as_bytes());
    }
}

/// Appends a trailing slash so relative endpoint paths join under the base
/// instead of replacing its last segment.
pub fn normalize_base_url(raw: &str) -> anyhow::Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') { trimmed.to_string() } else { format!("{}/", trimmed) };
    Url::parse(&with_slash).with_context(|| format!("invalid API base url '{}'", trimmed))
}

pub struct HttpGateway {
    client: reqwest::blocking::Client,
    base: Url,
    // None disables the traffic file
    log_dir: Option<PathBuf>,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            // Calls wait for the server; there is no client-side deadline
            .timeout(None::<Duration>)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, base: normalize_base_url(base_url)?, log_dir: None })
    }

    pub fn from_settings(settings: &AppSettings) -> anyhow::Result<Self> {
        let mut gw = Self::new(&settings.api_base_url)?;
        if settings.request_log_enabled {
            gw.log_dir = Some(settings.request_log_dir());
        }
        Ok(gw)
    }

    pub fn with_request_log(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn base_url(&self) -> &Url { &self.base }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, RequestError> {
        self.base
            .join(endpoint.path())
            .map_err(|e| RequestError::Network(format!("invalid endpoint url: {}", e)))
    }

    fn record(&self, rid: &Uuid, endpoint: Endpoint, outcome: &str, started: Instant) {
        let line = format!(
            "RID={} {} {} -> {} dt_ms={}",
            rid,
            endpoint.method().as_str(),
            endpoint.path(),
            outcome,
            started.elapsed().as_millis()
        );
        log::debug!("{}", line);
        if let Some(dir) = &self.log_dir {
            log_line(dir, &line);
        }
    }
}

impl Gateway for HttpGateway {
    fn call(&self, endpoint: Endpoint, payload: Option<&Value>) -> Result<Value, RequestError> {
        let url = self.endpoint_url(endpoint)?;
        let rid = Uuid::now_v7();
        let started = Instant::now();
        let method = match endpoint.method() {
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, url);
        if let Some(body) = payload {
            builder = builder.json(body);
        }

        let response = match builder.send() {
            Ok(r) => r,
            Err(e) => {
                let err = RequestError::Network(e.to_string());
                self.record(&rid, endpoint, &format!("ERR {}", err), started);
                log::warn!("{} {} failed: {}", endpoint.method().as_str(), endpoint.path(), err);
                return Err(err);
            }
        };

        let status = response.status();
        // An unreadable or non-JSON body is treated as "no body"
        let text = response.text().unwrap_or_default();
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);

        if status.is_success() {
            self.record(&rid, endpoint, status.as_str(), started);
            Ok(body)
        } else {
            let status_text = status.canonical_reason().unwrap_or(status.as_str());
            let err = RequestError::Backend(extract_error_message(&body, status_text));
            self.record(&rid, endpoint, &format!("{} ERR {}", status.as_str(), err), started);
            Err(err)
        }
    }
}
