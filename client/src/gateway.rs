//! Transport seam between the dashboard and the REST server

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use shared::{
    AuthToken, ExportRequest, FilterOptions, ImportReport, InventoryInput, InventoryPatch,
    InventoryRecord, VariantBatch,
};

/// A downloaded export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Every call the dashboard makes against the backend
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    /// Full unfiltered record list
    async fn list_inventory(&self) -> ClientResult<Vec<InventoryRecord>>;

    async fn list_filter_options(&self) -> ClientResult<FilterOptions>;

    async fn create_record(&self, input: &InventoryInput) -> ClientResult<InventoryRecord>;

    async fn create_variants(&self, batch: &VariantBatch) -> ClientResult<Vec<InventoryRecord>>;

    async fn update_record(&self, id: Uuid, patch: &InventoryPatch) -> ClientResult<InventoryRecord>;

    async fn delete_record(&self, id: Uuid) -> ClientResult<()>;

    async fn import_records(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<ImportReport>;

    async fn export_records(&self, request: &ExportRequest) -> ClientResult<ExportedFile>;
}

/// [`InventoryGateway`] over HTTP with a bearer token
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    config: ClientConfig,
    token: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

fn build_client(config: &ClientConfig) -> ClientResult<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// Filename from `attachment; filename="..."`
fn attachment_name(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let error = ClientError::from_response(status.as_u16(), &body);
    tracing::warn!(status = status.as_u16(), error = %error, "Request rejected");
    Err(error)
}

impl HttpGateway {
    pub fn new(config: ClientConfig, token: impl Into<String>) -> ClientResult<Self> {
        Ok(Self {
            client: build_client(&config)?,
            config,
            token: token.into(),
        })
    }

    /// Log in and keep the issued token
    pub async fn login(config: ClientConfig, email: &str, password: &str) -> ClientResult<Self> {
        let client = build_client(&config)?;
        let response = client
            .post(config.endpoint("auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let token: AuthToken = check(response).await?.json().await?;
        tracing::info!(email = %token.user.email, "Logged in");

        Ok(Self {
            client,
            config,
            token: token.access_token,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.endpoint(path))
            .bearer_auth(&self.token)
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request failed");
            ClientError::from(e)
        })?;
        check(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("Unreadable response: {}", e)))
    }
}

#[async_trait]
impl InventoryGateway for HttpGateway {
    async fn list_inventory(&self) -> ClientResult<Vec<InventoryRecord>> {
        self.send_json(self.request(reqwest::Method::GET, "inventory")).await
    }

    async fn list_filter_options(&self) -> ClientResult<FilterOptions> {
        self.send_json(self.request(reqwest::Method::GET, "inventory/filter-options"))
            .await
    }

    async fn create_record(&self, input: &InventoryInput) -> ClientResult<InventoryRecord> {
        self.send_json(self.request(reqwest::Method::POST, "inventory").json(input))
            .await
    }

    async fn create_variants(&self, batch: &VariantBatch) -> ClientResult<Vec<InventoryRecord>> {
        self.send_json(self.request(reqwest::Method::POST, "inventory/variants").json(batch))
            .await
    }

    async fn update_record(&self, id: Uuid, patch: &InventoryPatch) -> ClientResult<InventoryRecord> {
        let path = format!("inventory/{}", id);
        self.send_json(self.request(reqwest::Method::PUT, &path).json(patch))
            .await
    }

    async fn delete_record(&self, id: Uuid) -> ClientResult<()> {
        let path = format!("inventory/{}", id);
        self.send(self.request(reqwest::Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn import_records(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<ImportReport> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);
        self.send_json(self.request(reqwest::Method::POST, "inventory/import").multipart(form))
            .await
    }

    async fn export_records(&self, request: &ExportRequest) -> ClientResult<ExportedFile> {
        let response = self
            .send(self.request(reqwest::Method::POST, "inventory/export").json(request))
            .await?;

        let header_text = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let filename = header_text(header::CONTENT_DISPOSITION)
            .as_deref()
            .and_then(attachment_name)
            .unwrap_or_else(|| "inventory_export.csv".to_string());
        let content_type = header_text(header::CONTENT_TYPE).unwrap_or_else(|| "text/csv".to_string());

        let bytes = response.bytes().await?.to_vec();
        Ok(ExportedFile {
            filename,
            content_type,
            bytes,
        })
    }
}
