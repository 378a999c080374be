use crate::domain::{Method, OutboundRequest, RawResponse, Transport, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

// Thin wrapper around reqwest; status handling belongs to the gateway.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    // Without a timeout the transport default applies.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .http
            .request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let res = builder
            .send()
            .await
            .map_err(|err| TransportError(err.to_string()))?;
        let status = res.status().as_u16();

        // Keep the raw body; decoding depends on the status.
        let body = res
            .bytes()
            .await
            .map_err(|err| TransportError(err.to_string()))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
