use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use approval_export_core::domains::export::{
    ExportCategory, ExportQueryBuilder, ExportService, ExportServiceImpl, JsonExportMode,
    LocalFileStorage, SortOrder,
};
use approval_export_core::domains::request::{
    AccessRequest, ApprovalEvent, CommentEvent, InMemoryRequestStore, RequestStatus,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Access Request Export Demo");
    println!("==========================");

    let store = Arc::new(InMemoryRequestStore::with_records(sample_requests()));
    let storage = Arc::new(LocalFileStorage::new("./exports"));
    let service = Arc::new(ExportServiceImpl::new(store, storage, None, None));

    println!("Supported formats: {}", service.supported_formats().join(", "));

    let (output, path) = ExportQueryBuilder::new(Arc::clone(&service))
        .format("csv")
        .sheet(ExportCategory::Requests)
        .sort("submittedAt", SortOrder::Desc)
        .download()
        .await?;
    println!(
        "Wrote {} ({} bytes, {} records) to {}",
        output.filename,
        output.size,
        output.metadata.record_count,
        path.display()
    );

    let summary = ExportQueryBuilder::new(Arc::clone(&service))
        .format("json")
        .mode(JsonExportMode::Summary)
        .execute()
        .await?;
    println!("Summary payload:");
    println!("{}", summary.content.as_text().unwrap_or_default());

    Ok(())
}

fn sample_requests() -> Vec<AccessRequest> {
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    let mut vpn = AccessRequest::new("REQ-001", "alice", "VPN access", "standard", base);
    vpn.metadata.status = RequestStatus::Approved;
    vpn.metadata.completed_at = Some(base + Duration::hours(6));
    vpn.metadata.current_level = 2;
    vpn.metadata.approvals.push(ApprovalEvent {
        approver_id: "mgr-1".to_string(),
        level: 1,
        approved_at: base + Duration::hours(2),
        comment: Some("ok by me".to_string()),
    });
    vpn.metadata.approvals.push(ApprovalEvent {
        approver_id: "sec-1".to_string(),
        level: 2,
        approved_at: base + Duration::hours(6),
        comment: None,
    });

    let mut repo = AccessRequest::new(
        "REQ-002",
        "bob",
        "Production repo write access",
        "elevated",
        base + Duration::days(1),
    );
    repo.metadata.comments.push(CommentEvent {
        user: "bob".to_string(),
        kind: "note".to_string(),
        timestamp: base + Duration::days(1) + Duration::hours(1),
        text: "needed for the release on Friday".to_string(),
    });

    vec![vpn, repo]
}
