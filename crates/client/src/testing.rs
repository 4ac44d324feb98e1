//! Scripted transport for resolver tests.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::StatusCode;
use url::Url;

use beacon_core::Error;

use crate::fetch::{FetchResponse, Transport};

/// One canned answer.
#[derive(Debug, Clone)]
pub enum Reply {
    Body { content_type: Option<String>, body: Vec<u8> },
    Timeout,
    Refused,
}

impl Reply {
    pub fn image(content_type: &str, body: &[u8]) -> Self {
        Reply::Body { content_type: Some(content_type.to_string()), body: body.to_vec() }
    }

    pub fn html(body: &str) -> Self {
        Reply::Body { content_type: Some("text/html; charset=utf-8".to_string()), body: body.as_bytes().to_vec() }
    }

    pub fn json(value: serde_json::Value) -> Self {
        Reply::Body { content_type: Some("application/json".to_string()), body: value.to_string().into_bytes() }
    }
}

/// Transport answering from per-URL queues.
///
/// Routes are keyed by URL with any `apikey` query parameter stripped, so
/// token rotation does not change which route answers. The last reply in a
/// queue repeats; unrouted URLs are refused.
#[derive(Debug, Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<Url>>,
    delay: Option<Duration>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering each fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn route(self, url: &str, reply: Reply) -> Self {
        self.push(url, reply);
        self
    }

    pub fn push(&self, url: &str, reply: Reply) {
        let key = route_key(&Url::parse(url).expect("test route must be a URL"));
        self.routes.lock().entry(key).or_default().push_back(reply);
    }

    pub fn calls(&self) -> Vec<Url> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// `apikey` values sent, in call order.
    pub fn api_keys(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|u| u.query_pairs().find(|(k, _)| k == "apikey").map(|(_, v)| v.into_owned()))
            .collect()
    }

    fn next_reply(&self, url: &Url) -> Reply {
        let mut routes = self.routes.lock();
        match routes.get_mut(&route_key(url)) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Reply::Refused),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::Refused),
            None => Reply::Refused,
        }
    }
}

fn route_key(url: &Url) -> String {
    let mut stripped = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "apikey")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(pairs);
    }
    stripped.to_string()
}

#[async_trait]
impl Transport for StubTransport {
    async fn fetch(&self, url: &Url, _timeout: Duration) -> Result<FetchResponse, Error> {
        self.calls.lock().push(url.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_reply(url) {
            Reply::Body { content_type, body } => Ok(FetchResponse {
                url: url.clone(),
                final_url: url.clone(),
                status: StatusCode::OK,
                content_type,
                bytes: Bytes::from(body),
                fetch_ms: 0,
            }),
            Reply::Timeout => Err(Error::Timeout(url.to_string())),
            Reply::Refused => Err(Error::Transport(format!("{url}: connection refused"))),
        }
    }
}
