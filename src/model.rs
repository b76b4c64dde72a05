use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint path appended to the store base URL for both list and create.
pub const MOVIES_PATH: &str = "movies.json";

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub shape: ResponseShape,
    pub user_agent: String,
    /// Per-request timeout. `None` lets a hung request keep the UI loading.
    pub timeout: Option<Duration>,
}

impl StoreConfig {
    pub fn movies_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), MOVIES_PATH)
    }
}

/// The single upstream response contract a deployment is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ResponseShape {
    /// `{ "<store key>": { title, openingText, releaseDate }, ... }`
    #[default]
    Keyed,
    /// `{ "results": [ { episode_id, title, opening_crawl, release_date }, ... ] }`
    Enveloped,
}

impl ResponseShape {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseShape::Keyed => "keyed",
            ResponseShape::Enveloped => "enveloped",
        }
    }
}

/// A normalized movie as shown in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub opening_text: String,
    pub release_date: String,
}

/// Body of a create request. The store assigns the key, so there is no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub title: String,
    pub opening_text: String,
    pub release_date: String,
}

/// Events emitted by the controller and consumed by UI/CLI layers.
#[derive(Debug, Clone)]
pub enum AppEvent {
    LoadStarted,
    LoadSucceeded { movies: Vec<Movie> },
    LoadFailed { message: String },
    SubmitStarted { title: String },
    SubmitSucceeded { title: String },
    SubmitFailed { title: String, message: String },
    Info(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movies_url_tolerates_trailing_slash() {
        let cfg = StoreConfig {
            base_url: "https://example.test/db/".into(),
            shape: ResponseShape::Keyed,
            user_agent: "t".into(),
            timeout: None,
        };
        assert_eq!(cfg.movies_url(), "https://example.test/db/movies.json");
    }

    #[test]
    fn new_movie_serializes_camel_case_fields_only() {
        let m = NewMovie {
            title: "A".into(),
            opening_text: "txt".into(),
            release_date: "2020-01-01".into(),
        };
        let v = serde_json::to_value(&m).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["openingText"], "txt");
        assert_eq!(obj["releaseDate"], "2020-01-01");
    }
}
