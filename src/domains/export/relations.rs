use serde::Serialize;

use crate::domains::request::types::{AccessRequest, ApprovalEvent, CommentEvent, RejectionEvent};

/// Approval event tagged with its owning request id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRow {
    pub request_id: String,
    #[serde(flatten)]
    pub event: ApprovalEvent,
}

/// Rejection event tagged with its owning request id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionRow {
    pub request_id: String,
    #[serde(flatten)]
    pub event: RejectionEvent,
}

/// Comment event tagged with its owning request id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRow {
    pub request_id: String,
    #[serde(flatten)]
    pub event: CommentEvent,
}

/// Flat event collections derived from a filtered request sequence.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelatedEvents {
    pub approvals: Vec<ApprovalRow>,
    pub rejections: Vec<RejectionRow>,
    pub comments: Vec<CommentRow>,
}

/// Flattens per-request event sequences into three tagged collections,
/// preserving request order and then intra-request event order. Pure;
/// applies no filtering of its own.
pub fn extract_relations(requests: &[AccessRequest]) -> RelatedEvents {
    let mut related = RelatedEvents::default();
    for request in requests {
        for event in &request.metadata.approvals {
            related.approvals.push(ApprovalRow {
                request_id: request.id.clone(),
                event: event.clone(),
            });
        }
        for event in &request.metadata.rejections {
            related.rejections.push(RejectionRow {
                request_id: request.id.clone(),
                event: event.clone(),
            });
        }
        for event in &request.metadata.comments {
            related.comments.push(CommentRow {
                request_id: request.id.clone(),
                event: event.clone(),
            });
        }
    }
    related
}
