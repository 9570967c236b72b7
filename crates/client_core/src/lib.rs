use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_DISPOSITION, Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{CampusName, CourseName},
    error::ErrorBody,
    protocol::{CampusesRequest, CoursesRequest, GenerateRequest, GenerateResponse},
};
use tracing::{debug, info};
use url::Url;

pub mod artifact;
pub mod config;
pub mod effects;
pub mod error;
pub mod loaders;
pub mod planner;
pub mod selection;
pub mod sequence;
pub mod session;
pub mod submit;

pub use artifact::{Artifact, ArtifactSink, DirectoryArtifactSink};
pub use config::{load_settings, ClientSettings};
pub use effects::execute;
pub use error::CatalogError;
pub use planner::Planner;
pub use sequence::Ticket;
pub use session::{Completion, Effect, PlannerSession, SessionView};
pub use submit::{ProgressIndicator, SubmissionStatus};

const CAMPUSES_ENDPOINT: &str = "get_campuses";
const COURSES_ENDPOINT: &str = "get_courses";
const GENERATE_ENDPOINT: &str = "generate";
const DOWNLOAD_ENDPOINT: &str = "download_zip";

/// The remote catalog and generator. One request per call, no batching.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn resolve_campuses(
        &self,
        request: &CampusesRequest,
    ) -> Result<Vec<CampusName>, CatalogError>;
    async fn resolve_courses(
        &self,
        request: &CoursesRequest,
    ) -> Result<Vec<CourseName>, CatalogError>;
    async fn generate(&self, request: &GenerateRequest)
        -> Result<GenerateResponse, CatalogError>;
    async fn fetch_artifact(&self) -> Result<Artifact, CatalogError>;
}

pub struct HttpCatalogClient {
    http: Client,
    base_url: Url,
}

impl HttpCatalogClient {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        // `join` drops the last path segment unless the base ends with a slash.
        let mut base_url = Url::parse(server_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        // The artifact endpoint reads the generation result from the server-side session.
        let http = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(CatalogError::Client)?;
        Ok(Self { http, base_url })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, CatalogError> {
        Self::new(&settings.server_url, settings.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<Response, CatalogError> {
        let url = self.base_url.join(endpoint)?;
        debug!(endpoint, %url, "catalog request");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| CatalogError::Transport { endpoint, source })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        Err(CatalogError::Status {
            endpoint,
            status: status.as_u16(),
            message,
        })
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<R, CatalogError> {
        let bytes = self
            .post(endpoint, body)
            .await?
            .bytes()
            .await
            .map_err(|source| CatalogError::Transport { endpoint, source })?;
        serde_json::from_slice(&bytes).map_err(|source| CatalogError::Decode { endpoint, source })
    }
}

#[async_trait]
impl CatalogService for HttpCatalogClient {
    async fn resolve_campuses(
        &self,
        request: &CampusesRequest,
    ) -> Result<Vec<CampusName>, CatalogError> {
        self.post_json(CAMPUSES_ENDPOINT, request).await
    }

    async fn resolve_courses(
        &self,
        request: &CoursesRequest,
    ) -> Result<Vec<CourseName>, CatalogError> {
        self.post_json(COURSES_ENDPOINT, request).await
    }

    async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, CatalogError> {
        let response: GenerateResponse = self.post_json(GENERATE_ENDPOINT, request).await?;
        info!(
            produced = response.artifact_produced(),
            "generation response received"
        );
        Ok(response)
    }

    async fn fetch_artifact(&self) -> Result<Artifact, CatalogError> {
        let response = self
            .post(DOWNLOAD_ENDPOINT, &serde_json::json!({}))
            .await?;
        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(artifact::filename_from_content_disposition)
            .unwrap_or_else(|| artifact::DEFAULT_ARTIFACT_NAME.to_string());
        let bytes = response
            .bytes()
            .await
            .map_err(|source| CatalogError::Transport {
                endpoint: DOWNLOAD_ENDPOINT,
                source,
            })?;
        info!(%filename, size = bytes.len(), "artifact fetched");
        Ok(Artifact {
            filename,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
