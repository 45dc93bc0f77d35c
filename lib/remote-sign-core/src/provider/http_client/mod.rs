//! Small HTTP abstraction the gateway and the token provider talk through

pub mod reqwest_client;

use std::collections::HashMap;
use std::fmt::Display;
use std::panic::Location;
use std::sync::Arc;

use ct_codecs::{Base64, Encoder};
use itertools::Itertools;
use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::Display;
use thiserror::Error;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> RequestBuilder;
    fn post(&self, url: &str) -> RequestBuilder;
    fn put(&self, url: &str) -> RequestBuilder;

    async fn send(
        &self,
        url: &str,
        body: Option<Vec<u8>>,
        headers: Option<Headers>,
        method: Method,
    ) -> Result<Response, Error>;
}

pub type Headers = HashMap<String, String>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Client or server error class
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.0)
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum Method {
    #[strum(serialize = "GET")]
    Get,
    #[strum(serialize = "POST")]
    Post,
    #[strum(serialize = "PUT")]
    Put,
}

#[derive(Clone, Debug)]
pub struct Request {
    pub body: Option<Vec<u8>>,
    pub headers: Headers,
    pub method: Method,
    pub url: String,
}

#[derive(Debug)]
pub struct Response {
    pub body: Vec<u8>,
    pub headers: Headers,
    pub status: StatusCode,

    pub request: Request,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Unexpected HTTP status: {0}")]
    Status(StatusCode),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Form encoding error: {0}")]
    Form(#[from] serde_urlencoded::ser::Error),
    #[error("HTTP client error: {0}")]
    Other(String),
}

const CONTENT_TYPE: &str = "Content-Type";
const AUTHORIZATION: &str = "Authorization";

impl Request {
    fn reject(&self, error: Error, location: &Location<'_>) -> Error {
        tracing::error!(%location, "{} {} failed: {error}", self.method, self.url);
        tracing::trace!(
            %location,
            "Request headers:\n{}\nRequest body:\n{}",
            format_headers(&self.headers),
            format_body(self.body.as_deref())
        );
        error
    }
}

impl Response {
    #[track_caller]
    pub fn error_for_status(self) -> Result<Self, Error> {
        if !self.status.is_error() {
            return Ok(self);
        }

        Err(self
            .request
            .reject(Error::Status(self.status), Location::caller()))
    }

    #[track_caller]
    pub fn json<T: DeserializeOwned>(self) -> Result<T, Error> {
        let location = Location::caller();

        serde_json::from_slice(&self.body)
            .map_err(|error| self.request.reject(Error::Json(error), location))
    }

    fn trace(&self, location: &Location<'_>) {
        tracing::debug!(
            %location,
            "{} {} - {}",
            self.request.method,
            self.request.url,
            self.status
        );
        tracing::trace!(
            %location,
            "Request headers:\n{}\nRequest body:\n{}\nResponse headers:\n{}\nResponse body:\n{}",
            format_headers(&self.request.headers),
            format_body(self.request.body.as_deref()),
            format_headers(&self.headers),
            format_body(Some(self.body.as_slice()))
        );
    }
}

pub struct RequestBuilder {
    client: Arc<dyn HttpClient>,
    request: Request,
}

impl RequestBuilder {
    pub fn new(client: Arc<dyn HttpClient>, method: Method, url: &str) -> Self {
        Self {
            client,
            request: Request {
                body: None,
                headers: Headers::new(),
                method,
                url: url.to_owned(),
            },
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.request
            .headers
            .insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn bearer_auth(self, token: &str) -> Self {
        self.header(AUTHORIZATION, &format!("Bearer {token}"))
    }

    /// HTTP Basic authentication, RFC 7617
    #[track_caller]
    pub fn basic_auth(self, username: &str, password: &str) -> Result<Self, Error> {
        let location = Location::caller();

        match Base64::encode_to_string(format!("{username}:{password}")) {
            Ok(credentials) => Ok(self.header(AUTHORIZATION, &format!("Basic {credentials}"))),
            Err(error) => Err(self
                .request
                .reject(Error::Other(error.to_string()), location)),
        }
    }

    #[track_caller]
    pub fn form<T: Serialize>(self, value: T) -> Result<Self, Error> {
        let location = Location::caller();

        match serde_urlencoded::to_string(value) {
            Ok(encoded) => Ok(self.with_body("application/x-www-form-urlencoded", encoded.into())),
            Err(error) => Err(self.request.reject(Error::Form(error), location)),
        }
    }

    #[track_caller]
    pub fn json<T: Serialize>(self, value: T) -> Result<Self, Error> {
        let location = Location::caller();

        match serde_json::to_vec(&value) {
            Ok(encoded) => Ok(self.with_body("application/json", encoded)),
            Err(error) => Err(self.request.reject(Error::Json(error), location)),
        }
    }

    pub fn octet_stream(self, body: Vec<u8>) -> Self {
        self.with_body("application/octet-stream", body)
    }

    fn with_body(mut self, content_type: &str, body: Vec<u8>) -> Self {
        self.request.body = Some(body);
        self.header(CONTENT_TYPE, content_type)
    }

    pub async fn send(self) -> Result<Response, Error> {
        let location = Location::caller();
        let Self { client, request } = self;

        let headers = (!request.headers.is_empty()).then(|| request.headers.clone());
        match client
            .send(&request.url, request.body.clone(), headers, request.method)
            .await
        {
            Ok(response) => {
                response.trace(location);
                Ok(response)
            }
            Err(error) => Err(request.reject(error, location)),
        }
    }
}

fn format_headers(headers: &Headers) -> String {
    if headers.is_empty() {
        return "<none>".to_owned();
    }

    headers
        .iter()
        .sorted()
        .map(|(key, value)| {
            if key.eq_ignore_ascii_case(AUTHORIZATION) {
                format!("{key}: <redacted>")
            } else {
                format!("{key}: {value}")
            }
        })
        .join("\n")
}

fn format_body(body: Option<&[u8]>) -> String {
    match body.map(std::str::from_utf8) {
        None => "<none>".to_owned(),
        Some(Ok(text)) => text.to_owned(),
        Some(Err(_)) => format!("<{} bytes>", body.map_or(0, <[u8]>::len)),
    }
}

#[cfg(test)]
mod test;
