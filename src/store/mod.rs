//! HTTP client for the remote JSON store.

mod normalize;

use crate::error::StoreError;
use crate::model::{Movie, NewMovie, ResponseShape, StoreConfig};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    url: String,
    shape: ResponseShape,
}

impl StoreClient {
    pub fn new(cfg: &StoreConfig) -> Result<Self, StoreError> {
        let mut builder = reqwest::Client::builder().user_agent(cfg.user_agent.clone());
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            url: cfg.movies_url(),
            shape: cfg.shape,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the full movie list, normalized for the configured shape.
    pub async fn fetch_movies(&self) -> Result<Vec<Movie>, StoreError> {
        let resp = self.http.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::status(status, &body));
        }

        let bytes = resp.bytes().await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Malformed(format!("invalid JSON body: {e}")))?;
        let movies = normalize::normalize(self.shape, body)?;
        debug!(count = movies.len(), shape = self.shape.as_str(), "normalized movies");
        Ok(movies)
    }

    /// POST a new movie. The acknowledgement body is logged and otherwise ignored.
    pub async fn add_movie(&self, movie: &NewMovie) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(movie)?;
        let resp = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(StoreError::status(status, &body));
        }
        debug!(ack = %body, "store acknowledged create");
        Ok(())
    }
}
