use crate::config::NetworkConfig;
use crate::internal::models::{Joke, Photo};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use strum_macros::Display;
use thiserror::Error;

/// The two listing endpoints the app reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    Photos,
    Jokes,
}

/// Why a listing or image fetch failed. The display string is what the
/// views show in their error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Failed to fetch {resource}: {status}")]
    Status { resource: Resource, status: u16 },
    #[error("{detail}")]
    Transport { resource: Resource, detail: String },
    #[error("Failed to parse {resource} response: {detail}")]
    Malformed { resource: Resource, detail: String },
}

impl FetchError {
    fn transport(resource: Resource, err: &reqwest::Error) -> Self {
        Self::transport_detail(resource, &err.to_string())
    }

    /// Transport failure with `detail`, or a generic message when it is blank.
    fn transport_detail(resource: Resource, detail: &str) -> Self {
        let detail = match detail.trim() {
            "" => format!("An error occurred while fetching {}", resource),
            _ => detail.to_string(),
        };
        Self::Transport { resource, detail }
    }

    pub fn resource(&self) -> Resource {
        match self {
            Self::Status { resource, .. }
            | Self::Transport { resource, .. }
            | Self::Malformed { resource, .. } => *resource,
        }
    }

    /// HTTP status that caused the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// HTTP client for the photo and joke APIs.
///
/// One request per call: no retries and no caching, every activation of a
/// view goes back to the network.
#[derive(Clone)]
pub struct ApiService {
    client: Client,
    network: NetworkConfig,
    enable_performance_metrics: bool,
}

impl ApiService {
    pub fn new(network: NetworkConfig, enable_performance_metrics: bool) -> Self {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = network.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            Client::new()
        });

        Self {
            client,
            network,
            enable_performance_metrics,
        }
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// URL of the photo listing, page 1 with the configured limit.
    pub fn photo_list_url(&self) -> String {
        format!(
            "{}/v2/list?page=1&limit={}",
            self.network.photos_base_url.trim_end_matches('/'),
            self.network.photo_limit
        )
    }

    pub fn joke_list_url(&self) -> String {
        format!(
            "{}/jokes/ten",
            self.network.jokes_base_url.trim_end_matches('/')
        )
    }

    /// Image URL for a photo rendered at `width` x `height` pixels.
    pub fn photo_image_url(&self, photo_id: &str, width: u32, height: u32) -> String {
        format!(
            "{}/id/{}/{}/{}",
            self.network.photos_base_url.trim_end_matches('/'),
            photo_id,
            width,
            height
        )
    }

    /// GET a URL and deserialize the JSON body into a list of `T`.
    ///
    /// Non-success statuses, transport failures and bodies that are not a list
    /// of `T` each map to their own `FetchError` variant.
    #[tracing::instrument(skip(self))]
    async fn get_list<T>(&self, resource: Resource, url: &str) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let start = std::time::Instant::now();
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(resource, &e))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "listing request failed");
            return Err(FetchError::Status {
                resource,
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::transport(resource, &e))?;

        let items: Vec<T> =
            serde_json::from_slice(&body).map_err(|e| FetchError::Malformed {
                resource,
                detail: e.to_string(),
            })?;

        if self.enable_performance_metrics {
            tracing::debug!(elapsed = ?start.elapsed(), count = items.len(), "api.get_list");
        }
        Ok(items)
    }

    pub async fn fetch_photos(&self) -> Result<Vec<Photo>, FetchError> {
        let url = self.photo_list_url();
        self.get_list(Resource::Photos, &url).await
    }

    pub async fn fetch_jokes(&self) -> Result<Vec<Joke>, FetchError> {
        let url = self.joke_list_url();
        self.get_list(Resource::Jokes, &url).await
    }

    /// Download the raw bytes of one photo image.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(Resource::Photos, &e))?;

        let status: StatusCode = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                resource: Resource::Photos,
                status: status.as_u16(),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FetchError::transport(Resource::Photos, &e))?;
        Ok(bytes.to_vec())
    }
}

impl Default for ApiService {
    fn default() -> Self {
        Self::new(NetworkConfig::default(), false)
    }
}
