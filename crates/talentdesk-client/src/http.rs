//! `reqwest` implementation of [`Transport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::{Value, json};
use talentdesk_api_models::ApiErrorBody;
use talentdesk_core::RecordId;
use tracing::{debug, instrument};
use url::Url;

use crate::error::ClientError;
use crate::transport::{Transport, UploadRequest};

const HEADER_REQUEST_ID: &str = "x-request-id";

/// REST transport over HTTP.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpTransport {
    /// Build a transport rooted at `base_url`.
    ///
    /// Every request carries `x-request-id: <trace_id>` and, when a token is
    /// given, `Authorization: Bearer <token>`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Request`] when the HTTP client cannot be built
    /// and [`ClientError::InvalidHeader`] when the trace id is not a valid header.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        token: Option<String>,
        trace_id: &str,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| ClientError::InvalidHeader {
            name: HEADER_REQUEST_ID,
        })?;
        headers.insert(HEADER_REQUEST_ID, request_id);
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| ClientError::Request {
                operation: "build client",
                source,
            })?;
        Ok(Self::with_client(client, base_url, token))
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn with_client(client: Client, base_url: Url, token: Option<String>) -> Self {
        Self {
            client,
            base_url,
            token: token.filter(|token| !token.trim().is_empty()),
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let relative = path.trim_start_matches('/');
        self.base_url
            .join(relative)
            .map_err(|_| ClientError::InvalidUrl {
                path: path.to_string(),
            })
    }

    fn record_url(&self, resource: &str, id: &RecordId) -> Result<Url, ClientError> {
        let mut url = self.url(resource)?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                path: resource.to_string(),
            })?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<Response, ClientError> {
        let response = builder
            .send()
            .await
            .map_err(|source| ClientError::Request { operation, source })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        let message = ApiErrorBody::from_bytes(&body)
            .most_specific()
            .map(str::to_string);
        debug!(operation, status = status.as_u16(), ?message, "request rejected");
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

async fn json_body(response: Response) -> Result<Value, ClientError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ClientError::Request {
            operation: "read body",
            source,
        })?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|err| ClientError::InvalidBody {
        detail: err.to_string(),
    })
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(name = "http.list", skip(self))]
    async fn list(&self, resource: &str) -> Result<Value, ClientError> {
        let url = self.url(resource)?;
        let response = self.send("list", self.request(Method::GET, url)).await?;
        json_body(response).await
    }

    #[instrument(name = "http.create", skip(self, body))]
    async fn create(&self, resource: &str, body: &Value) -> Result<Value, ClientError> {
        let url = self.url(resource)?;
        let response = self
            .send("create", self.request(Method::POST, url).json(body))
            .await?;
        json_body(response).await
    }

    #[instrument(name = "http.update", skip(self, id, body), fields(id = %id))]
    async fn update(
        &self,
        resource: &str,
        id: &RecordId,
        body: &Value,
    ) -> Result<Value, ClientError> {
        let url = self.record_url(resource, id)?;
        let response = self
            .send("update", self.request(Method::PUT, url).json(body))
            .await?;
        json_body(response).await
    }

    #[instrument(name = "http.delete", skip(self, id), fields(id = %id))]
    async fn delete(&self, resource: &str, id: &RecordId) -> Result<(), ClientError> {
        let url = self.record_url(resource, id)?;
        self.send("delete", self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    #[instrument(name = "http.bulk_delete", skip(self, ids), fields(count = ids.len()))]
    async fn bulk_delete(&self, resource: &str, ids: &[RecordId]) -> Result<(), ClientError> {
        let url = self.url(&format!("{}/bulk-delete", resource.trim_end_matches('/')))?;
        self.send(
            "bulk delete",
            self.request(Method::POST, url).json(&json!({ "ids": ids })),
        )
        .await?;
        Ok(())
    }

    #[instrument(name = "http.upload", skip(self, request), fields(files = request.files.len()))]
    async fn upload(&self, endpoint: &str, request: &UploadRequest) -> Result<Value, ClientError> {
        let url = self.url(endpoint)?;
        let mut form = Form::new();
        for file in &request.files {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            if let Some(content_type) = &file.content_type {
                part = part
                    .mime_str(content_type)
                    .map_err(|source| ClientError::Request {
                        operation: "upload",
                        source,
                    })?;
            }
            form = form.part("file", part);
        }
        for (name, value) in request.metadata.form_fields() {
            form = form.text(name, value);
        }
        let response = self
            .send("upload", self.request(Method::POST, url).multipart(form))
            .await?;
        json_body(response).await
    }
}
