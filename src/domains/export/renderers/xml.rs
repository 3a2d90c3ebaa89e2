use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::domains::export::types::{
    ExportContent, ExportOptions, ExportSnapshot, RenderedPayload,
};
use crate::errors::ExportResult;

use super::{export_filename, FormatRenderer, MEDIA_TYPE_XML};

/// Structured-markup renderer. Serializes the snapshot into nested tags
/// through an explicit scalar / sequence / mapping walk, wrapping the
/// request sequence and statistics in an export envelope.
#[derive(Debug, Default)]
pub struct XmlRenderer;

/// Entity-escapes text content.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Writes one serialized value under `tag`, recursing through mappings
/// and sequences. Sequence elements render as `<item>` children so
/// nested sequences of mappings stay well-formed.
pub fn write_value(out: &mut String, tag: &str, value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Null => {
            out.push_str(&format!("{}<{}/>\n", pad, tag));
        }
        Value::Object(map) => {
            out.push_str(&format!("{}<{}>\n", pad, tag));
            for (key, child) in map {
                write_value(out, key, child, indent + 1);
            }
            out.push_str(&format!("{}</{}>\n", pad, tag));
        }
        Value::Array(items) => {
            out.push_str(&format!("{}<{}>\n", pad, tag));
            for item in items {
                write_value(out, "item", item, indent + 1);
            }
            out.push_str(&format!("{}</{}>\n", pad, tag));
        }
        Value::String(text) => {
            out.push_str(&format!("{}<{}>{}</{}>\n", pad, tag, escape_xml(text), tag));
        }
        scalar => {
            out.push_str(&format!("{}<{}>{}</{}>\n", pad, tag, scalar, tag));
        }
    }
}

#[async_trait]
impl FormatRenderer for XmlRenderer {
    fn name(&self) -> &str {
        "xml"
    }

    fn media_type(&self) -> &str {
        MEDIA_TYPE_XML
    }

    async fn render(
        &self,
        snapshot: &ExportSnapshot,
        _options: &ExportOptions,
    ) -> ExportResult<RenderedPayload> {
        let mut body = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        body.push_str("<export>\n");
        write_value(
            &mut body,
            "exportDate",
            &Value::String(Utc::now().to_rfc3339()),
            1,
        );
        write_value(
            &mut body,
            "recordCount",
            &Value::from(snapshot.requests.len()),
            1,
        );
        write_value(&mut body, "requests", &serde_json::to_value(&snapshot.requests)?, 1);
        write_value(
            &mut body,
            "statistics",
            &serde_json::to_value(&snapshot.statistics)?,
            1,
        );
        body.push_str("</export>\n");

        Ok(RenderedPayload {
            content: ExportContent::Text(body),
            filename: export_filename("full", "xml"),
            media_type: MEDIA_TYPE_XML,
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
    use serde_json::json;

    #[test]
    fn test_text_is_entity_escaped() {
        let mut out = String::new();
        write_value(&mut out, "subject", &json!("A & B < C"), 0);
        assert_eq!(out, "<subject>A &amp; B &lt; C</subject>\n");

        assert_eq!(escape_xml("\"it's\""), "&quot;it&apos;s&quot;");
        assert_eq!(escape_xml("a > b"), "a &gt; b");
    }

    #[test]
    fn test_sequences_wrap_items() {
        let mut out = String::new();
        write_value(&mut out, "levels", &json!([1, 2]), 0);
        assert_eq!(out, "<levels>\n  <item>1</item>\n  <item>2</item>\n</levels>\n");
    }

    #[test]
    fn test_nested_sequence_of_mappings() {
        let mut out = String::new();
        write_value(&mut out, "rows", &json!([{"id": "R1"}, {"id": null}]), 0);
        assert!(out.contains("<item>\n    <id>R1</id>\n  </item>"));
        assert!(out.contains("<id/>"));
    }

    #[tokio::test]
    async fn test_envelope_wraps_requests_and_statistics() {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let requests = vec![AccessRequest::new(
            "R1",
            "alice",
            "VPN & more",
            "WF1",
            base,
        )];
        let related = extract_relations(&requests);
        let statistics = summarize(&requests);
        let snapshot = ExportSnapshot {
            requests,
            approvals: related.approvals,
            rejections: related.rejections,
            comments: related.comments,
            statistics,
        };

        let renderer = XmlRenderer;
        let payload = renderer
            .render(&snapshot, &ExportOptions::default())
            .await
            .unwrap();
        let text = payload.content.as_text().unwrap();

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<recordCount>1</recordCount>"));
        assert!(text.contains("<subject>VPN &amp; more</subject>"));
        assert!(text.contains("<totalRequests>1</totalRequests>"));
        assert!(text.ends_with("</export>\n"));
        assert_eq!(payload.media_type, MEDIA_TYPE_XML);
    }
}
