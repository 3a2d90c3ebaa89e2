use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domains::request::types::{AccessRequest, RequestStatus};
use crate::errors::{ValidationError, ValidationResult};
use crate::validation::{Validate, ValidationBuilder};

use super::relations::{ApprovalRow, CommentRow, RejectionRow};
use super::statistics::ExportSummary;

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Desc
    }
}

/// Inclusive submission-date window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Filter/sort/limit parameters applied to a record snapshot.
///
/// All fields are optional and combine with AND semantics. The limit is
/// applied last, after filtering and sorting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    /// External field name; metadata fields shadow request fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Validate for QueryCriteria {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(range) = &self.date_range {
            if range.start > range.end {
                return Err(ValidationError::invalid_value(
                    "dateRange",
                    "start must not be after end",
                ));
            }
        }
        ValidationBuilder::new("limit", self.limit)
            .at_least(1)
            .validate()
    }
}

/// Output category selecting a template or sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportCategory {
    Requests,
    Approvals,
    Rejections,
    Comments,
}

impl FromStr for ExportCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "requests" => Ok(Self::Requests),
            "approvals" => Ok(Self::Approvals),
            "rejections" => Ok(Self::Rejections),
            "comments" => Ok(Self::Comments),
            _ => Err(format!("Unknown export category: {}", s)),
        }
    }
}

impl fmt::Display for ExportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requests => write!(f, "requests"),
            Self::Approvals => write!(f, "approvals"),
            Self::Rejections => write!(f, "rejections"),
            Self::Comments => write!(f, "comments"),
        }
    }
}

/// Projection modes offered by the structured-data renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonExportMode {
    /// All four collections plus statistics.
    Full,
    /// Statistics only.
    Summary,
    /// Per-request projection plus the summary.
    Minimal,
}

impl Default for JsonExportMode {
    fn default() -> Self {
        Self::Full
    }
}

impl FromStr for JsonExportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "summary" => Ok(Self::Summary),
            "minimal" => Ok(Self::Minimal),
            _ => Err(format!("Unknown JSON export mode: {}", s)),
        }
    }
}

impl fmt::Display for JsonExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Summary => write!(f, "summary"),
            Self::Minimal => write!(f, "minimal"),
        }
    }
}

/// Options accompanying a single export call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(default)]
    pub filters: QueryCriteria,
    /// Category rendered by sheet-oriented formats. Defaults to requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<ExportCategory>,
    /// Projection mode for the structured-data renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<JsonExportMode>,
}

/// Point-in-time view handed to renderers: filtered requests, flattened
/// relations and computed statistics. Immutable once built; later store
/// mutations never reach a rendered payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub requests: Vec<AccessRequest>,
    pub approvals: Vec<ApprovalRow>,
    pub rejections: Vec<RejectionRow>,
    pub comments: Vec<CommentRow>,
    pub statistics: ExportSummary,
}

/// Rendered payload body.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportContent {
    Text(String),
    Binary(Vec<u8>),
}

impl ExportContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    /// Byte length of the payload.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }
}

/// Raw renderer product, before the orchestrator attaches its envelope.
#[derive(Debug, Clone)]
pub struct RenderedPayload {
    pub content: ExportContent,
    pub filename: String,
    pub media_type: &'static str,
}

/// Metadata envelope attached to every completed export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub exported_at: DateTime<Utc>,
    pub format: String,
    /// Requests matched by the effective filters.
    pub record_count: usize,
    pub filters: QueryCriteria,
    pub generated_by: String,
    /// SHA-256 of the payload bytes, hex encoded.
    pub checksum: String,
}

/// Completed export: payload plus descriptive metadata.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub content: ExportContent,
    pub filename: String,
    pub media_type: String,
    /// Byte length of `content`.
    pub size: usize,
    pub metadata: ExportMetadata,
}
