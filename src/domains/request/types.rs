use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Unknown request status: {}", s)),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Sign-off recorded when an approver accepts a request at some level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalEvent {
    pub approver_id: String,
    pub level: u32,
    pub approved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Recorded when an approver declines a request at some level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionEvent {
    pub approver_id: String,
    pub level: u32,
    pub rejected_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Discussion entry attached to a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEvent {
    pub user: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// Workflow state attached to a request. Event sequences are owned
/// exclusively by their request and are never shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    pub status: RequestStatus,
    pub submitted_at: DateTime<Utc>,
    /// Set once the request reaches a terminal status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Approval-ladder position; non-decreasing over the request's life.
    pub current_level: u32,
    #[serde(default)]
    pub approvals: Vec<ApprovalEvent>,
    #[serde(default)]
    pub rejections: Vec<RejectionEvent>,
    #[serde(default)]
    pub comments: Vec<CommentEvent>,
}

/// Access request entity - one approval-workflow instance in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    pub id: String,
    pub requester: String,
    pub subject: String,
    pub workflow_id: String,
    pub metadata: RequestMetadata,
    /// Free-form payload attached by the request-management layer, e.g.
    /// an embedded `workflow` object or a `data` blob. Carried through
    /// exports untouched except for transient-field stripping in the
    /// full JSON projection.
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl AccessRequest {
    /// New pending request submitted at `submitted_at`.
    pub fn new(
        id: impl Into<String>,
        requester: impl Into<String>,
        subject: impl Into<String>,
        workflow_id: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            requester: requester.into(),
            subject: subject.into(),
            workflow_id: workflow_id.into(),
            metadata: RequestMetadata {
                status: RequestStatus::Pending,
                submitted_at,
                completed_at: None,
                current_level: 0,
                approvals: Vec::new(),
                rejections: Vec::new(),
                comments: Vec::new(),
            },
            extra: Map::new(),
        }
    }

    /// True once the request has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.metadata.status,
            RequestStatus::Approved | RequestStatus::Rejected
        )
    }

    /// Wall-clock time from submission to completion, when finished.
    pub fn completion_time(&self) -> Option<Duration> {
        self.metadata
            .completed_at
            .map(|done| done - self.metadata.submitted_at)
    }
}
