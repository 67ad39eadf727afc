//! Scripted transport and recording clock for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{self, HeaderName, HeaderValue};
use tokio_util::sync::CancellationToken;
use url::Url;
use webcrawler_core::Credentials;

use crate::clock::Clock;
use crate::error::ConnectionError;
use crate::transport::{RawResponse, Transport};

/// One recorded transport call.
#[derive(Debug, Clone)]
pub struct Call {
    pub target: Url,
    pub username: Option<String>,
}

/// Replays queued responses in order. An empty queue yields a connection
/// error unless a repeating response is set.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<RawResponse>>,
    repeat: Option<RawResponse>,
    calls: Mutex<Vec<Call>>,
    cancel_on_send: Option<CancellationToken>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<RawResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn repeating(response: RawResponse) -> Self {
        Self {
            repeat: Some(response),
            ..Self::default()
        }
    }

    /// Cancels `token` as a side effect of every send.
    pub fn cancelling(mut self, token: CancellationToken) -> Self {
        self.cancel_on_send = Some(token);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn targets(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.target.to_string())
            .collect()
    }

    pub fn usernames(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.username.clone())
            .collect()
    }

    pub fn auth_flags(&self) -> Vec<bool> {
        self.usernames().iter().map(Option::is_some).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        target: &Url,
        credentials: Option<&Credentials>,
    ) -> Result<RawResponse, ConnectionError> {
        self.calls.lock().unwrap().push(Call {
            target: target.clone(),
            username: credentials.map(|c| c.username().to_string()),
        });
        if let Some(token) = &self.cancel_on_send {
            token.cancel();
        }

        let next = self.script.lock().unwrap().pop_front();
        next.or_else(|| self.repeat.clone())
            .ok_or_else(|| ConnectionError::new("connection refused"))
    }
}

/// Records requested sleeps instead of waiting.
#[derive(Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub fn status(status: StatusCode) -> RawResponse {
    RawResponse::new(status)
}

pub fn with_header(response: RawResponse, name: HeaderName, value: &'static str) -> RawResponse {
    response.with_header(name, HeaderValue::from_static(value))
}

pub fn ok(content_type: &'static str, body: &str) -> RawResponse {
    with_header(status(StatusCode::OK), header::CONTENT_TYPE, content_type).with_body(body)
}

pub fn redirect(code: StatusCode, location: &'static str) -> RawResponse {
    with_header(status(code), header::LOCATION, location)
}
