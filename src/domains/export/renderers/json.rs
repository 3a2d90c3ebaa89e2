use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::domains::export::types::{
    ExportContent, ExportOptions, ExportSnapshot, JsonExportMode, RenderedPayload,
};
use crate::errors::ExportResult;

use super::{export_filename, FormatRenderer, MEDIA_TYPE_JSON};

/// Transient sub-fields never carried into exports when present on a
/// request's free-form payload.
const STRIPPED_FIELDS: [(&str, &str); 2] = [("workflow", "approvers"), ("data", "sensitiveInfo")];

/// Structured-data renderer with full / summary / minimal projections.
#[derive(Debug, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    fn full(snapshot: &ExportSnapshot) -> ExportResult<Value> {
        let mut requests = Vec::with_capacity(snapshot.requests.len());
        for request in &snapshot.requests {
            let mut value = serde_json::to_value(request)?;
            strip_transient_fields(&mut value);
            requests.push(value);
        }
        Ok(json!({
            "exportDate": Utc::now().to_rfc3339(),
            "requests": requests,
            "approvals": snapshot.approvals,
            "rejections": snapshot.rejections,
            "comments": snapshot.comments,
            "statistics": snapshot.statistics,
        }))
    }

    fn summary(snapshot: &ExportSnapshot) -> ExportResult<Value> {
        Ok(serde_json::to_value(&snapshot.statistics)?)
    }

    fn minimal(snapshot: &ExportSnapshot) -> ExportResult<Value> {
        let requests: Vec<Value> = snapshot
            .requests
            .iter()
            .map(|request| {
                json!({
                    "id": request.id,
                    "requester": request.requester,
                    "subject": request.subject,
                    "status": request.metadata.status,
                    "submittedAt": request.metadata.submitted_at,
                    "workflow": request.workflow_id,
                })
            })
            .collect();
        Ok(json!({
            "requests": requests,
            "summary": snapshot.statistics,
        }))
    }
}

/// Drops transient/sensitive sub-fields from a serialized request.
fn strip_transient_fields(value: &mut Value) {
    if let Value::Object(map) = value {
        for (parent, child) in STRIPPED_FIELDS {
            if let Some(Value::Object(inner)) = map.get_mut(parent) {
                inner.remove(child);
            }
        }
    }
}

#[async_trait]
impl FormatRenderer for JsonRenderer {
    fn name(&self) -> &str {
        "json"
    }

    fn media_type(&self) -> &str {
        MEDIA_TYPE_JSON
    }

    async fn render(
        &self,
        snapshot: &ExportSnapshot,
        options: &ExportOptions,
    ) -> ExportResult<RenderedPayload> {
        let mode = options.mode.unwrap_or_default();
        let value = match mode {
            JsonExportMode::Full => Self::full(snapshot)?,
            JsonExportMode::Summary => Self::summary(snapshot)?,
            JsonExportMode::Minimal => Self::minimal(snapshot)?,
        };

        let text = serde_json::to_string_pretty(&value)?;
        Ok(RenderedPayload {
            content: ExportContent::Text(text),
            filename: export_filename(&mode.to_string(), "json"),
            media_type: MEDIA_TYPE_JSON,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::export::relations::extract_relations;
    use crate::domains::export::statistics::summarize;
    use crate::domains::request::types::AccessRequest;
    use chrono::TimeZone;

    fn snapshot() -> ExportSnapshot {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut request = AccessRequest::new("R1", "A", "S", "W1", base);
        request.extra.insert(
            "workflow".to_string(),
            json!({"name": "Standard", "approvers": ["mgr-1", "mgr-2"]}),
        );
        request.extra.insert(
            "data".to_string(),
            json!({"ticket": "T-9", "sensitiveInfo": "secret"}),
        );

        let requests = vec![request];
        let related = extract_relations(&requests);
        let statistics = summarize(&requests);
        ExportSnapshot {
            requests,
            approvals: related.approvals,
            rejections: related.rejections,
            comments: related.comments,
            statistics,
        }
    }

    #[tokio::test]
    async fn test_minimal_projection_shape() {
        let renderer = JsonRenderer;
        let options = ExportOptions {
            mode: Some(JsonExportMode::Minimal),
            ..Default::default()
        };
        let payload = renderer.render(&snapshot(), &options).await.unwrap();
        let value: Value = serde_json::from_str(payload.content.as_text().unwrap()).unwrap();

        let request = &value["requests"][0];
        assert_eq!(request["id"], "R1");
        assert_eq!(request["requester"], "A");
        assert_eq!(request["subject"], "S");
        assert_eq!(request["status"], "pending");
        assert!(request["submittedAt"].is_string());
        assert_eq!(request["workflow"], "W1");
        // Minimal rows carry exactly the six projected fields.
        assert_eq!(request.as_object().unwrap().len(), 6);
        assert_eq!(value["summary"]["totalRequests"], 1);
        assert!(payload.filename.contains("_minimal_"));
    }

    #[tokio::test]
    async fn test_summary_mode_is_statistics_only() {
        let renderer = JsonRenderer;
        let options = ExportOptions {
            mode: Some(JsonExportMode::Summary),
            ..Default::default()
        };
        let payload = renderer.render(&snapshot(), &options).await.unwrap();
        let value: Value = serde_json::from_str(payload.content.as_text().unwrap()).unwrap();

        assert_eq!(value["totalRequests"], 1);
        assert_eq!(value["pendingRequests"], 1);
        assert!(value.get("requests").is_none());
    }

    #[tokio::test]
    async fn test_full_mode_strips_transient_fields() {
        let renderer = JsonRenderer;
        let payload = renderer
            .render(&snapshot(), &ExportOptions::default())
            .await
            .unwrap();
        let value: Value = serde_json::from_str(payload.content.as_text().unwrap()).unwrap();

        let request = &value["requests"][0];
        assert_eq!(request["workflow"]["name"], "Standard");
        assert!(request["workflow"].get("approvers").is_none());
        assert_eq!(request["data"]["ticket"], "T-9");
        assert!(request["data"].get("sensitiveInfo").is_none());

        assert!(value["exportDate"].is_string());
        assert_eq!(value["statistics"]["totalRequests"], 1);
        assert!(value["approvals"].is_array());
        assert!(payload.filename.contains("_full_"));
    }
}
