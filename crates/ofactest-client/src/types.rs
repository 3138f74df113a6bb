//! Request and response types for the OFAC client.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// One refresh of the service's sanctions data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Download {
    /// Number of SDN records loaded.
    #[serde(rename = "SDNs", default)]
    pub sdns: u64,
    /// Number of alternate names loaded.
    #[serde(rename = "altNames", default)]
    pub alt_names: u64,
    /// Number of addresses loaded.
    #[serde(default)]
    pub addresses: u64,
    /// Number of denied persons loaded.
    #[serde(rename = "deniedPersons", default)]
    pub denied_persons: u64,
    /// When the refresh happened. Missing is treated like a zero time.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Download {
    /// Returns the timestamp unless it is absent or a zero value.
    ///
    /// Both the Unix epoch and `0001-01-01T00:00:00Z` count as zero; the
    /// latter is what the service serializes for an unset time.
    #[must_use]
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .filter(|ts| ts.timestamp() != 0 && ts.year() > 1)
    }
}

/// Query parameters for a search request.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOptions {
    /// Name to fuzzy-match against SDN and alternate names.
    pub name: String,
    /// Maximum number of results per list.
    pub limit: u32,
}

impl SearchOptions {
    /// Search for `name`, returning at most `limit` results per list.
    #[must_use]
    pub fn new(name: impl Into<String>, limit: u32) -> Self {
        Self {
            name: name.into(),
            limit,
        }
    }
}

/// Search response with ranked candidates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Matching SDN entries, best first.
    #[serde(rename = "SDNs", default, deserialize_with = "null_as_empty")]
    pub sdns: Vec<SdnMatch>,
    /// Matching alternate names, best first.
    #[serde(rename = "altNames", default, deserialize_with = "null_as_empty")]
    pub alt_names: Vec<AltNameMatch>,
    /// When the service last refreshed its data.
    #[serde(rename = "refreshedAt", default)]
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl SearchResponse {
    /// All candidates as `(entity_id, score)`, SDNs first then alternate names.
    pub fn candidates(&self) -> impl Iterator<Item = (&str, f64)> {
        self.sdns
            .iter()
            .map(|s| (s.entity_id.as_str(), s.score))
            .chain(
                self.alt_names
                    .iter()
                    .map(|a| (a.entity_id.as_str(), a.score)),
            )
    }

    /// Highest scoring candidate across both lists.
    #[must_use]
    pub fn top_candidate(&self) -> Option<(&str, f64)> {
        self.candidates()
            .fold(None, |best: Option<(&str, f64)>, c| match best {
                Some(b) if b.1 >= c.1 => Some(b),
                _ => Some(c),
            })
    }
}

/// A matching SDN entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SdnMatch {
    /// OFAC entity number.
    #[serde(rename = "entityID")]
    pub entity_id: String,
    /// Listed name.
    #[serde(rename = "sdnName", default)]
    pub sdn_name: String,
    /// Entry type (individual, vessel, aircraft or empty for entities).
    #[serde(rename = "sdnType", default)]
    pub sdn_type: String,
    /// Sanctions programs.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub programs: Vec<String>,
    /// Similarity score in `0.0..=1.0`.
    #[serde(rename = "match", default)]
    pub score: f64,
}

/// A matching alternate name.
#[derive(Debug, Clone, Deserialize)]
pub struct AltNameMatch {
    /// Entity number of the SDN this name belongs to.
    #[serde(rename = "entityID")]
    pub entity_id: String,
    /// Alternate name.
    #[serde(rename = "alternateName", default)]
    pub alternate_name: String,
    /// Similarity score in `0.0..=1.0`.
    #[serde(rename = "match", default)]
    pub score: f64,
}

/// API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error message.
    pub error: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
