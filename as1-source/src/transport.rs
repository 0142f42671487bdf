use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::SourceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Empty,
    Form(Vec<(String, String)>),
    Json(Value),
    /// Multipart upload of one file plus plain fields.
    File {
        field: String,
        file_name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
        fields: Vec<(String, String)>,
    },
}

impl RequestBody {
    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RequestBody::Form(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: Vec::new(),
        }
    }

    pub fn from_json(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_modified(&self) -> bool {
        self.status == 304
    }

    /// Passes 2xx and 304 through, turns everything else into
    /// `SourceError::Http`.
    pub fn error_for_status(self) -> Result<Self, SourceError> {
        if self.is_success() || self.is_not_modified() {
            Ok(self)
        } else {
            Err(SourceError::Http {
                status: self.status,
                body: self.text(),
            })
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, SourceError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The only way adapters reach the network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        params: &[(String, String)],
    ) -> Result<HttpResponse, SourceError>;

    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: RequestBody,
    ) -> Result<HttpResponse, SourceError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(transport_error)?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<HttpResponse, SourceError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();
        debug!("HTTP {} ({} bytes)", status, body.len());
        Ok(HttpResponse {
            status,
            body,
            headers,
        })
    }
}

fn transport_error(err: reqwest::Error) -> SourceError {
    SourceError::Transport(Box::new(err))
}

fn with_headers(
    mut request: reqwest::RequestBuilder,
    headers: &[(String, String)],
) -> reqwest::RequestBuilder {
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }
    request
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        params: &[(String, String)],
    ) -> Result<HttpResponse, SourceError> {
        debug!("GET {}", url);
        let request = with_headers(self.client.get(url), headers).query(params);
        self.send(request).await
    }

    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: RequestBody,
    ) -> Result<HttpResponse, SourceError> {
        debug!("POST {}", url);
        let request = with_headers(self.client.post(url), headers);
        let request = match body {
            RequestBody::Empty => request,
            RequestBody::Form(pairs) => request.form(&pairs),
            RequestBody::Json(value) => request.json(&value),
            RequestBody::File {
                field,
                file_name,
                content_type,
                bytes,
                fields,
            } => {
                let mut part = Part::bytes(bytes).file_name(file_name);
                if let Some(content_type) = content_type {
                    part = part.mime_str(&content_type).map_err(transport_error)?;
                }
                let form = fields
                    .into_iter()
                    .fold(Form::new().part(field, part), |form, (key, value)| {
                        form.text(key, value)
                    });
                request.multipart(form)
            }
        };
        self.send(request).await
    }
}
