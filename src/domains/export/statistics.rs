use std::collections::HashMap;

use chrono::Duration;
use serde::Serialize;

use crate::domains::request::types::{AccessRequest, RequestStatus};

/// Aggregate counts and derived metrics over a filtered record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total_requests: usize,
    pub pending_requests: usize,
    pub approved_requests: usize,
    pub rejected_requests: usize,
    pub total_approvals: usize,
    pub total_rejections: usize,
    pub total_comments: usize,
    /// Human-readable mean completion time, or "N/A" when no approved
    /// request has completed.
    pub avg_approval_time: String,
    pub most_active_requester: Option<String>,
    pub most_common_workflow: Option<String>,
}

/// Computes the summary over a request set. Ties for the most-active /
/// most-common metrics resolve to the first-seen value so the result is
/// deterministic for a given input order.
pub fn summarize(requests: &[AccessRequest]) -> ExportSummary {
    let mut pending = 0;
    let mut approved = 0;
    let mut rejected = 0;
    for request in requests {
        match request.metadata.status {
            RequestStatus::Pending => pending += 1,
            RequestStatus::Approved => approved += 1,
            RequestStatus::Rejected => rejected += 1,
        }
    }

    ExportSummary {
        total_requests: requests.len(),
        pending_requests: pending,
        approved_requests: approved,
        rejected_requests: rejected,
        total_approvals: requests.iter().map(|r| r.metadata.approvals.len()).sum(),
        total_rejections: requests.iter().map(|r| r.metadata.rejections.len()).sum(),
        total_comments: requests.iter().map(|r| r.metadata.comments.len()).sum(),
        avg_approval_time: average_approval_time(requests),
        most_active_requester: most_frequent(requests.iter().map(|r| r.requester.as_str())),
        most_common_workflow: most_frequent(requests.iter().map(|r| r.workflow_id.as_str())),
    }
}

/// Mean of `completed_at - submitted_at` over approved requests that
/// carry a completion timestamp.
fn average_approval_time(requests: &[AccessRequest]) -> String {
    let durations: Vec<Duration> = requests
        .iter()
        .filter(|r| r.metadata.status == RequestStatus::Approved)
        .filter_map(|r| r.completion_time())
        .collect();

    if durations.is_empty() {
        return "N/A".to_string();
    }

    let total_seconds: i64 = durations.iter().map(|d| d.num_seconds()).sum();
    format_duration(total_seconds / durations.len() as i64)
}

/// Formats a duration as its two coarsest applicable units, truncating
/// finer units once a coarser one is non-zero: "2d 3h", "3h 0m",
/// "45m 12s", "12s".
pub fn format_duration(total_seconds: i64) -> String {
    let seconds = total_seconds.max(0);
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Most frequent value; first-seen wins ties.
fn most_frequent<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for value in order {
        let count = counts[value];
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn approved(id: &str, requester: &str, workflow: &str, hours: i64) -> AccessRequest {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut request = AccessRequest::new(id, requester, "access", workflow, base);
        request.metadata.status = RequestStatus::Approved;
        request.metadata.completed_at = Some(base + Duration::hours(hours));
        request
    }

    #[test]
    fn test_counts_and_average_over_mixed_statuses() {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let requests = vec![
            approved("R1", "alice", "WF1", 2),
            approved("R2", "alice", "WF1", 4),
            AccessRequest::new("R3", "bob", "access", "WF2", base),
        ];

        let summary = summarize(&requests);
        assert_eq!(summary.total_requests, 3);
        assert_eq!(summary.pending_requests, 1);
        assert_eq!(summary.approved_requests, 2);
        assert_eq!(summary.rejected_requests, 0);
        assert_eq!(summary.avg_approval_time, "3h 0m");
        assert_eq!(summary.most_active_requester.as_deref(), Some("alice"));
        assert_eq!(summary.most_common_workflow.as_deref(), Some("WF1"));
    }

    #[test]
    fn test_average_is_na_without_completed_approvals() {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let requests = vec![AccessRequest::new("R1", "alice", "access", "WF1", base)];
        assert_eq!(summarize(&requests).avg_approval_time, "N/A");
        assert_eq!(summarize(&[]).avg_approval_time, "N/A");
    }

    #[test]
    fn test_event_totals() {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut request = AccessRequest::new("R1", "alice", "access", "WF1", base);
        request.metadata.approvals.push(crate::domains::request::types::ApprovalEvent {
            approver_id: "mgr-1".to_string(),
            level: 1,
            approved_at: base,
            comment: None,
        });
        request.metadata.comments.push(crate::domains::request::types::CommentEvent {
            user: "alice".to_string(),
            kind: "note".to_string(),
            timestamp: base,
            text: "ping".to_string(),
        });

        let summary = summarize(&[request]);
        assert_eq!(summary.total_approvals, 1);
        assert_eq!(summary.total_rejections, 0);
        assert_eq!(summary.total_comments, 1);
    }

    #[test]
    fn test_tie_break_is_first_seen() {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let requests = vec![
            AccessRequest::new("R1", "bob", "access", "WF2", base),
            AccessRequest::new("R2", "alice", "access", "WF1", base),
            AccessRequest::new("R3", "alice", "access", "WF2", base),
            AccessRequest::new("R4", "bob", "access", "WF1", base),
        ];
        let summary = summarize(&requests);
        assert_eq!(summary.most_active_requester.as_deref(), Some("bob"));
        assert_eq!(summary.most_common_workflow.as_deref(), Some("WF2"));
    }

    #[test]
    fn test_empty_set_has_no_leaders() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_requests, 0);
        assert!(summary.most_active_requester.is_none());
        assert!(summary.most_common_workflow.is_none());
    }

    #[test]
    fn test_format_duration_unit_boundaries() {
        assert_eq!(format_duration(12), "12s");
        assert_eq!(format_duration(45 * 60 + 12), "45m 12s");
        assert_eq!(format_duration(3 * 3_600), "3h 0m");
        assert_eq!(format_duration(2 * 86_400 + 3 * 3_600 + 59 * 60), "2d 3h");
        assert_eq!(format_duration(0), "0s");
    }
}
