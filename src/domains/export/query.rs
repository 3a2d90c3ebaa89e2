use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domains::request::types::AccessRequest;

use super::types::{QueryCriteria, SortOrder};

/// Sort field used when none is supplied.
const DEFAULT_SORT_FIELD: &str = "submittedAt";

/// Applies filter predicates, sort order and result limiting to a record
/// snapshot. Criteria combine with AND semantics; no matches yields an
/// empty sequence, never an error.
pub fn filter_requests(records: &[AccessRequest], criteria: &QueryCriteria) -> Vec<AccessRequest> {
    let mut matched: Vec<AccessRequest> = records
        .iter()
        .filter(|request| matches_criteria(request, criteria))
        .cloned()
        .collect();

    let sort_field = criteria.sort_by.as_deref().unwrap_or(DEFAULT_SORT_FIELD);
    let sort_order = criteria.sort_order.unwrap_or_default();
    sort_requests(&mut matched, sort_field, sort_order);

    if let Some(limit) = criteria.limit {
        matched.truncate(limit);
    }

    matched
}

fn matches_criteria(request: &AccessRequest, criteria: &QueryCriteria) -> bool {
    if let Some(range) = &criteria.date_range {
        let submitted = request.metadata.submitted_at;
        if submitted < range.start || submitted > range.end {
            return false;
        }
    }
    if let Some(status) = criteria.status {
        if request.metadata.status != status {
            return false;
        }
    }
    if let Some(requester) = &criteria.requester {
        if &request.requester != requester {
            return false;
        }
    }
    if let Some(workflow_id) = &criteria.workflow_id {
        if &request.workflow_id != workflow_id {
            return false;
        }
    }
    true
}

/// Comparable value resolved from an external field name. Date-valued
/// fields (names ending in `At`) compare as timestamps, everything else
/// as its raw value.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Time(DateTime<Utc>),
    Text(String),
    Level(u32),
}

/// Resolves the named field against the metadata block first, then the
/// request's own fields. Unknown names yield no key.
fn sort_key(request: &AccessRequest, field: &str) -> Option<SortKey> {
    match field {
        "status" => Some(SortKey::Text(request.metadata.status.to_string())),
        "submittedAt" => Some(SortKey::Time(request.metadata.submitted_at)),
        "completedAt" => request.metadata.completed_at.map(SortKey::Time),
        "currentLevel" => Some(SortKey::Level(request.metadata.current_level)),
        "id" => Some(SortKey::Text(request.id.clone())),
        "requester" => Some(SortKey::Text(request.requester.clone())),
        "subject" => Some(SortKey::Text(request.subject.clone())),
        "workflowId" => Some(SortKey::Text(request.workflow_id.clone())),
        _ => None,
    }
}

fn compare_keys(left: &Option<SortKey>, right: &Option<SortKey>) -> Ordering {
    match (left, right) {
        (Some(SortKey::Time(a)), Some(SortKey::Time(b))) => a.cmp(b),
        (Some(SortKey::Text(a)), Some(SortKey::Text(b))) => a.cmp(b),
        (Some(SortKey::Level(a)), Some(SortKey::Level(b))) => a.cmp(b),
        // Missing keys compare equal; the stable sort keeps input order.
        _ => Ordering::Equal,
    }
}

fn sort_requests(requests: &mut [AccessRequest], field: &str, order: SortOrder) {
    requests.sort_by(|left, right| {
        let ordering = compare_keys(&sort_key(left, field), &sort_key(right, field));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
