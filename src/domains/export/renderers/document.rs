use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domains::export::capability::{DocumentCapability, DocumentSurface};
use crate::domains::export::statistics::ExportSummary;
use crate::domains::export::types::{
    ExportContent, ExportOptions, ExportSnapshot, RenderedPayload,
};
use crate::errors::{ExportError, ExportResult};

use super::{export_filename, FormatRenderer, MEDIA_TYPE_PDF};

// Page layout, in points (origin top-left).
const LEFT_MARGIN: f32 = 40.0;
const PAGE_TOP: f32 = 40.0;
const PAGE_BOTTOM: f32 = 780.0;
const LINE_HEIGHT: f32 = 16.0;

/// Requests shown in the report table.
const MAX_TABLE_ROWS: usize = 15;
/// Character cap before a table cell is elided.
const MAX_CELL_CHARS: usize = 28;

/// Table columns: label and x offset.
const TABLE_COLUMNS: [(&str, f32); 5] = [
    ("ID", 40.0),
    ("Requester", 120.0),
    ("Subject", 230.0),
    ("Status", 400.0),
    ("Submitted", 470.0),
];

/// Paginated-document renderer. Lays the report out against an injected
/// document surface; the surface owns the encoding.
pub struct DocumentRenderer {
    capability: Option<Arc<dyn DocumentCapability>>,
}

impl DocumentRenderer {
    pub fn new(capability: Option<Arc<dyn DocumentCapability>>) -> Self {
        Self { capability }
    }
}

/// Truncates long text with a trailing ellipsis past the character cap.
fn elide(text: &str, cap: usize) -> String {
    if text.chars().count() <= cap {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(cap).collect();
        format!("{}...", truncated)
    }
}

/// Moves to a fresh page when the cursor has passed the page threshold.
fn page_break(surface: &mut dyn DocumentSurface, cursor: &mut f32) {
    if *cursor > PAGE_BOTTOM {
        surface.add_page();
        *cursor = PAGE_TOP;
    }
}

fn summary_lines(statistics: &ExportSummary) -> Vec<(&'static str, String)> {
    vec![
        ("Total Requests", statistics.total_requests.to_string()),
        ("Pending", statistics.pending_requests.to_string()),
        ("Approved", statistics.approved_requests.to_string()),
        ("Rejected", statistics.rejected_requests.to_string()),
        (
            "Average Approval Time",
            statistics.avg_approval_time.clone(),
        ),
        (
            "Most Active Requester",
            statistics
                .most_active_requester
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        (
            "Most Common Workflow",
            statistics
                .most_common_workflow
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
        ),
    ]
}

#[async_trait]
impl FormatRenderer for DocumentRenderer {
    fn name(&self) -> &str {
        "pdf"
    }

    fn media_type(&self) -> &str {
        MEDIA_TYPE_PDF
    }

    async fn render(
        &self,
        snapshot: &ExportSnapshot,
        _options: &ExportOptions,
    ) -> ExportResult<RenderedPayload> {
        // Fail before any work when no backend was injected.
        let capability = self
            .capability
            .as_ref()
            .ok_or(ExportError::MissingCapability("document layout builder"))?;

        let mut surface = capability.new_document();
        let mut cursor = PAGE_TOP;

        surface.set_font_size(18.0);
        surface.draw_text(LEFT_MARGIN, cursor, "Access Request Report");
        cursor += LINE_HEIGHT * 2.0;

        surface.set_font_size(9.0);
        surface.draw_text(
            LEFT_MARGIN,
            cursor,
            &format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
        );
        cursor += LINE_HEIGHT * 2.0;

        surface.set_font_size(12.0);
        surface.draw_text(LEFT_MARGIN, cursor, "Summary");
        cursor += LINE_HEIGHT;
        surface.set_font_size(10.0);
        for (label, value) in summary_lines(&snapshot.statistics) {
            page_break(&mut *surface, &mut cursor);
            surface.draw_text(LEFT_MARGIN, cursor, &format!("{}: {}", label, value));
            cursor += LINE_HEIGHT;
        }
        cursor += LINE_HEIGHT;

        page_break(&mut *surface, &mut cursor);
        surface.set_font_size(12.0);
        surface.draw_text(LEFT_MARGIN, cursor, "Requests");
        cursor += LINE_HEIGHT;

        surface.set_font_size(10.0);
        for (label, x) in TABLE_COLUMNS {
            surface.draw_text(x, cursor, label);
        }
        cursor += LINE_HEIGHT;

        surface.set_font_size(9.0);
        for request in snapshot.requests.iter().take(MAX_TABLE_ROWS) {
            page_break(&mut *surface, &mut cursor);
            let cells = [
                elide(&request.id, MAX_CELL_CHARS),
                elide(&request.requester, MAX_CELL_CHARS),
                elide(&request.subject, MAX_CELL_CHARS),
                request.metadata.status.to_string(),
                request.metadata.submitted_at.format("%Y-%m-%d").to_string(),
            ];
            for ((_, x), cell) in TABLE_COLUMNS.iter().zip(cells.iter()) {
                surface.draw_text(*x, cursor, cell);
            }
            cursor += LINE_HEIGHT;
        }

        let bytes = surface.finish().await?;
        Ok(RenderedPayload {
            content: ExportContent::Binary(bytes),
            filename: export_filename("report", "pdf"),
            media_type: MEDIA_TYPE_PDF,
        })
    }
}
