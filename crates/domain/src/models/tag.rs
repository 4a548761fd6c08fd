//! Tag domain models for the boards platform.
//!
//! Tags are tenant-scoped labels attached to generations for categorization.
//! Their storage is owned by the boards GraphQL backend; these types describe
//! the wire shape the client SDK exchanges with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A tenant-scoped label attachable to a generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    /// URL-friendly identifier, unique within the tenant.
    pub slug: String,
    pub description: Option<String>,
    /// Free-form metadata object.
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a tag. Slug is derived from the name when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagInput {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Input for updating a tag. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagInput {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

lazy_static::lazy_static! {
    static ref SEPARATORS: regex::Regex = regex::Regex::new(r"[\s_]+").unwrap();
    static ref INVALID_CHARS: regex::Regex = regex::Regex::new(r"[^a-z0-9\-]").unwrap();
    static ref HYPHEN_RUNS: regex::Regex = regex::Regex::new(r"-+").unwrap();
}

/// Converts a tag name to a URL-friendly slug.
pub fn slugify(text: &str) -> String {
    let slug = text.to_lowercase();
    let slug = SEPARATORS.replace_all(&slug, "-");
    let slug = INVALID_CHARS.replace_all(&slug, "");
    let slug = HYPHEN_RUNS.replace_all(&slug, "-");
    slug.trim_matches('-').to_string()
}
