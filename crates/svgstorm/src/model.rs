//! Wire types for the icon catalog API.
//!
//! Every endpoint answers with an [`ApiEnvelope`] around its payload. Field
//! names are camelCase on the wire, except for the SVG markup of a detail
//! record which the server sends as `svg_code`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CatalogError;

/// An icon's catalog metadata.
///
/// `name` is unique and is the key used to fetch the icon's detail record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    /// Server-assigned identifier.
    pub id: i64,
    /// Unique, slug-like name.
    pub name: String,
    /// Optional category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Free-form tags. Missing or `null` on the wire means no tags.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation timestamp. Missing or unparseable values read as `None`.
    #[serde(default, alias = "created_at", deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp. Missing or unparseable values read as `None`.
    #[serde(default, alias = "updated_at", deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Icon {
    /// The category, treating an empty string as absent.
    pub fn category_label(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

/// An icon together with its SVG markup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IconDetail {
    /// The icon's metadata.
    #[serde(flatten)]
    pub icon: Icon,
    /// The raw SVG document.
    #[serde(rename = "svg_code", alias = "svgMarkup")]
    pub svg_markup: String,
}

impl IconDetail {
    /// The icon's name.
    pub fn name(&self) -> &str {
        &self.icon.name
    }
}

/// The response wrapper used by every catalog endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the server handled the request.
    pub success: bool,
    /// The payload; usually absent when `success` is false.
    pub data: Option<T>,
    /// Error or informational message.
    #[serde(default)]
    pub message: Option<String>,
    /// Number of items, for list endpoints.
    #[serde(default)]
    pub count: Option<u64>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload.
    ///
    /// `success: false` becomes [`CatalogError::Api`] carrying the server's
    /// message (or `Unknown error`); a successful envelope without data
    /// becomes [`CatalogError::MissingData`].
    pub fn into_result(self) -> Result<T, CatalogError> {
        if !self.success {
            return Err(CatalogError::api(
                self.message.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        self.data.ok_or(CatalogError::MissingData)
    }
}

/// Body of the health endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Whether the server handled the request.
    #[serde(default)]
    pub success: bool,
    /// Reported service status, `healthy` when all is well.
    #[serde(default)]
    pub status: String,
    /// Server time of the check, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl HealthReport {
    /// True iff the server reported success with status `healthy`.
    pub fn is_healthy(&self) -> bool {
        self.success && self.status == "healthy"
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Timestamps are informational only, so a malformed one must not sink the
/// whole record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc)))
}
