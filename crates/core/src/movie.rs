// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Movie records as served by the catalog API.
//!
//! [`Movie`] is the full record. Fields the client does not model are kept in
//! [`Movie::extra`] so a cached snapshot round-trips whatever the server sent.
//! [`MovieFields`] is the partial form carried by create/update mutations.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A movie entry in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Server-assigned document id.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Id from the metadata service, when the entry was imported.
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub metadata_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_year", skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Everything else the server returned (credits, genres, videos, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Movie {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Movie { key: Some(key.into()), title: title.into(), ..Default::default() }
    }

    /// Returns the server id, if the record has been persisted remotely.
    pub fn server_id(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }
}

/// The mutable subset of a movie, every field optional.
///
/// Absent fields are omitted on the wire so a PATCH only touches what changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_year", skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl MovieFields {
    pub fn titled(title: impl Into<String>) -> Self {
        MovieFields { title: Some(title.into()), ..Default::default() }
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == MovieFields::default()
    }
}

/// Stored records carry `year` as either a number or a numeric string.
fn lenient_year<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<Year>::deserialize(deserializer)? {
        Some(Year::Number(n)) => i32::try_from(n).ok(),
        Some(Year::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
#[path = "movie_tests.rs"]
mod tests;
