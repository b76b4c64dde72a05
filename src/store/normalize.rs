//! Response normalization.
//!
//! Each deployment is configured for exactly one upstream shape; a body that
//! does not match that shape is rejected rather than reinterpreted.

use crate::error::StoreError;
use crate::model::{Movie, ResponseShape};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyedRecord {
    title: String,
    opening_text: String,
    release_date: String,
}

#[derive(Debug, Deserialize)]
struct EnvelopedRecord {
    episode_id: EpisodeId,
    title: String,
    opening_crawl: String,
    release_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EpisodeId {
    Number(serde_json::Number),
    Text(String),
}

impl EpisodeId {
    fn into_string(self) -> String {
        match self {
            EpisodeId::Number(n) => n.to_string(),
            EpisodeId::Text(s) => s,
        }
    }
}

pub(crate) fn normalize(shape: ResponseShape, body: Value) -> Result<Vec<Movie>, StoreError> {
    match shape {
        ResponseShape::Keyed => normalize_keyed(body),
        ResponseShape::Enveloped => normalize_enveloped(body),
    }
}

fn normalize_keyed(body: Value) -> Result<Vec<Movie>, StoreError> {
    let map = match body {
        // An empty collection comes back as `null`.
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(StoreError::Malformed(format!(
                "expected an object keyed by id, got {}",
                json_type(&other)
            )))
        }
    };

    let mut movies = map
        .into_iter()
        .map(|(key, value)| {
            let rec: KeyedRecord = serde_json::from_value(value)
                .map_err(|e| StoreError::Malformed(format!("record {key}: {e}")))?;
            Ok(Movie {
                id: key,
                title: rec.title,
                opening_text: rec.opening_text,
                release_date: rec.release_date,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;
    // Push keys sort in creation order.
    movies.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(movies)
}

fn normalize_enveloped(body: Value) -> Result<Vec<Movie>, StoreError> {
    let mut map = match body {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(StoreError::Malformed(format!(
                "expected an object with a `results` field, got {}",
                json_type(&other)
            )))
        }
    };

    let results = match map.remove("results") {
        None if map.is_empty() => return Ok(Vec::new()),
        None => {
            let keys: Vec<&str> = map.keys().map(String::as_str).take(5).collect();
            return Err(StoreError::Malformed(format!(
                "expected a `results` field, found keys: {}",
                keys.join(", ")
            )));
        }
        Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(StoreError::Malformed(format!(
                "`results` must be an array, got {}",
                json_type(&other)
            )))
        }
    };

    results
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let rec: EnvelopedRecord = serde_json::from_value(value)
                .map_err(|e| StoreError::Malformed(format!("results[{i}]: {e}")))?;
            Ok(Movie {
                id: rec.episode_id.into_string(),
                title: rec.title,
                opening_text: rec.opening_crawl,
                release_date: rec.release_date,
            })
        })
        .collect()
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
