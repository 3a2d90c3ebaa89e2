use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domains::request::types::AccessRequest;
use crate::errors::{ExportError, ExportResult};

use super::relations::{ApprovalRow, CommentRow, RejectionRow};
use super::types::{ExportCategory, ExportSnapshot};

/// Trait for record shapes that render into tabular rows.
pub trait TableRecord {
    /// Column headers for this shape.
    fn headers() -> Vec<&'static str>;

    /// One row of cells, in header order.
    fn to_row(&self) -> Vec<String>;
}

// Helper for optional values
pub fn cell_optional<T: std::fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

// Helper for datetime formatting
pub fn cell_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub fn cell_optional_datetime(value: &Option<DateTime<Utc>>) -> String {
    value.as_ref().map(cell_datetime).unwrap_or_default()
}

impl TableRecord for AccessRequest {
    fn headers() -> Vec<&'static str> {
        vec![
            "Request ID",
            "Requester",
            "Subject",
            "Status",
            "Submitted Date",
            "Completed Date",
            "Current Level",
            "Workflow",
        ]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.requester.clone(),
            self.subject.clone(),
            self.metadata.status.to_string(),
            cell_datetime(&self.metadata.submitted_at),
            cell_optional_datetime(&self.metadata.completed_at),
            self.metadata.current_level.to_string(),
            self.workflow_id.clone(),
        ]
    }
}

impl TableRecord for ApprovalRow {
    fn headers() -> Vec<&'static str> {
        vec!["Request ID", "Approver", "Level", "Action", "Date", "Comment"]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.request_id.clone(),
            self.event.approver_id.clone(),
            self.event.level.to_string(),
            "approved".to_string(),
            cell_datetime(&self.event.approved_at),
            cell_optional(&self.event.comment),
        ]
    }
}

impl TableRecord for RejectionRow {
    fn headers() -> Vec<&'static str> {
        vec!["Request ID", "Rejector", "Level", "Action", "Date", "Reason"]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.request_id.clone(),
            self.event.approver_id.clone(),
            self.event.level.to_string(),
            "rejected".to_string(),
            cell_datetime(&self.event.rejected_at),
            cell_optional(&self.event.reason),
        ]
    }
}

impl TableRecord for CommentRow {
    fn headers() -> Vec<&'static str> {
        vec!["Request ID", "User", "Type", "Date", "Text"]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.request_id.clone(),
            self.event.user.clone(),
            self.event.kind.clone(),
            cell_datetime(&self.event.timestamp),
            self.event.text.clone(),
        ]
    }
}

/// Ordered headers plus a row mapper for one output category.
///
/// Templates are format-agnostic: cells are plain strings and any
/// escaping (CSV quoting, markup entities) is applied by the renderer
/// that consumes them.
#[derive(Clone, Debug)]
pub struct Template {
    headers: Vec<&'static str>,
    mapper: fn(&ExportSnapshot) -> Vec<Vec<String>>,
}

impl Template {
    pub fn new(headers: Vec<&'static str>, mapper: fn(&ExportSnapshot) -> Vec<Vec<String>>) -> Self {
        Self { headers, mapper }
    }

    pub fn headers(&self) -> &[&'static str] {
        &self.headers
    }

    pub fn rows(&self, snapshot: &ExportSnapshot) -> Vec<Vec<String>> {
        (self.mapper)(snapshot)
    }
}

/// Per-category templates shared by the delimited-text, spreadsheet and
/// document renderers.
#[derive(Clone)]
pub struct TemplateRegistry {
    templates: HashMap<ExportCategory, Template>,
}

impl TemplateRegistry {
    /// Registry with no templates; custom formats start from here.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Registry carrying the four standard categories.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.insert(
            ExportCategory::Requests,
            Template::new(AccessRequest::headers(), |snapshot| {
                snapshot.requests.iter().map(|r| r.to_row()).collect()
            }),
        );
        registry.insert(
            ExportCategory::Approvals,
            Template::new(ApprovalRow::headers(), |snapshot| {
                snapshot.approvals.iter().map(|r| r.to_row()).collect()
            }),
        );
        registry.insert(
            ExportCategory::Rejections,
            Template::new(RejectionRow::headers(), |snapshot| {
                snapshot.rejections.iter().map(|r| r.to_row()).collect()
            }),
        );
        registry.insert(
            ExportCategory::Comments,
            Template::new(CommentRow::headers(), |snapshot| {
                snapshot.comments.iter().map(|r| r.to_row()).collect()
            }),
        );
        registry
    }

    pub fn insert(&mut self, category: ExportCategory, template: Template) {
        self.templates.insert(category, template);
    }

    pub fn get(&self, category: ExportCategory) -> ExportResult<&Template> {
        self.templates
            .get(&category)
            .ok_or_else(|| ExportError::MissingTemplate(category.to_string()))
    }

    pub fn contains(&self, category: ExportCategory) -> bool {
        self.templates.contains_key(&category)
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
