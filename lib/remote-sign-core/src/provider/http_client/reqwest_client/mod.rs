use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::{Error, Headers, HttpClient, Method, Request, RequestBuilder, Response, StatusCode};

#[derive(Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Client with a per-request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(3))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map(Self::new)
            .map_err(|e| Error::Other(e.to_string()))
    }

    fn builder(&self, method: Method, url: &str) -> RequestBuilder {
        RequestBuilder::new(Arc::new(self.clone()), method, url)
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> RequestBuilder {
        self.builder(Method::Get, url)
    }

    fn post(&self, url: &str) -> RequestBuilder {
        self.builder(Method::Post, url)
    }

    fn put(&self, url: &str) -> RequestBuilder {
        self.builder(Method::Put, url)
    }

    async fn send(
        &self,
        url: &str,
        body: Option<Vec<u8>>,
        headers: Option<Headers>,
        method: Method,
    ) -> Result<Response, Error> {
        let request = Request {
            body,
            headers: headers.unwrap_or_default(),
            method,
            url: url.to_owned(),
        };

        let reqwest_method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };
        let mut outgoing = self
            .client
            .request(reqwest_method, url)
            .headers(header_map(&request.headers)?);
        if let Some(body) = &request.body {
            outgoing = outgoing.body(body.to_owned());
        }

        let incoming = outgoing
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = StatusCode(incoming.status().as_u16());
        let headers = incoming
            .headers()
            .iter()
            .map(|(name, value)| {
                let value = value.to_str().map_err(|e| Error::Other(e.to_string()))?;
                Ok((name.to_string(), value.to_owned()))
            })
            .collect::<Result<Headers, Error>>()?;
        let body = incoming
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?
            .to_vec();

        Ok(Response {
            body,
            headers,
            status,
            request,
        })
    }
}

fn header_map(headers: &Headers) -> Result<HeaderMap, Error> {
    headers
        .iter()
        .map(|(name, value)| {
            let name = HeaderName::try_from(name.as_str()).map_err(|e| Error::Other(e.to_string()))?;
            let value = HeaderValue::try_from(value.as_str()).map_err(|e| Error::Other(e.to_string()))?;
            Ok((name, value))
        })
        .collect()
}
