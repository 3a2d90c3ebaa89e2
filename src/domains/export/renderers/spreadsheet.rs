use std::sync::Arc;

use async_trait::async_trait;

use crate::domains::export::capability::{RowStyle, SpreadsheetCapability, SpreadsheetWorkbook};
use crate::domains::export::statistics::ExportSummary;
use crate::domains::export::templates::TemplateRegistry;
use crate::domains::export::types::{
    ExportCategory, ExportContent, ExportOptions, ExportSnapshot, RenderedPayload,
};
use crate::errors::{ExportError, ExportResult};

use super::{export_filename, FormatRenderer, MEDIA_TYPE_XLSX};

/// Column width cap, in character units.
const MAX_COLUMN_WIDTH: f64 = 50.0;
/// Padding added on top of the longest cell when sizing a column.
const COLUMN_PADDING: f64 = 2.0;

/// Binary spreadsheet renderer. Feeds the row/column/style model into an
/// injected workbook capability; the capability owns the encoding.
pub struct SpreadsheetRenderer {
    templates: TemplateRegistry,
    capability: Option<Arc<dyn SpreadsheetCapability>>,
}

impl SpreadsheetRenderer {
    pub fn new(
        templates: TemplateRegistry,
        capability: Option<Arc<dyn SpreadsheetCapability>>,
    ) -> Self {
        Self {
            templates,
            capability,
        }
    }
}

/// Sheet tabs rendered from the category templates.
const TEMPLATE_SHEETS: [(ExportCategory, &str); 3] = [
    (ExportCategory::Requests, "Requests"),
    (ExportCategory::Approvals, "Approvals"),
    (ExportCategory::Rejections, "Rejections"),
];

fn write_table(
    workbook: &mut dyn SpreadsheetWorkbook,
    name: &str,
    headers: &[&'static str],
    rows: &[Vec<String>],
) -> ExportResult<()> {
    let sheet = workbook.add_sheet(name)?;

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    workbook.append_row(sheet, &header_cells, RowStyle::Header)?;
    for row in rows {
        workbook.append_row(sheet, row, RowStyle::Body)?;
    }

    for (column, header) in headers.iter().enumerate() {
        let longest = rows
            .iter()
            .map(|row| row.get(column).map(|cell| cell.chars().count()).unwrap_or(0))
            .chain(std::iter::once(header.chars().count()))
            .max()
            .unwrap_or(0);
        let width = (longest as f64 + COLUMN_PADDING).min(MAX_COLUMN_WIDTH);
        workbook.set_column_width(sheet, column, width)?;
    }

    // Header row included in the filter region.
    workbook.set_auto_filter(sheet, rows.len() + 1, headers.len())?;
    Ok(())
}

fn write_key_values(
    workbook: &mut dyn SpreadsheetWorkbook,
    name: &str,
    pairs: &[(&str, String)],
) -> ExportResult<()> {
    let rows: Vec<Vec<String>> = pairs
        .iter()
        .map(|(label, value)| vec![label.to_string(), value.clone()])
        .collect();
    write_table(workbook, name, &["Metric", "Value"], &rows)
}

fn count_pairs(statistics: &ExportSummary) -> Vec<(&'static str, String)> {
    vec![
        ("Total Requests", statistics.total_requests.to_string()),
        ("Pending Requests", statistics.pending_requests.to_string()),
        ("Approved Requests", statistics.approved_requests.to_string()),
        ("Rejected Requests", statistics.rejected_requests.to_string()),
        ("Total Approvals", statistics.total_approvals.to_string()),
        ("Total Rejections", statistics.total_rejections.to_string()),
        ("Total Comments", statistics.total_comments.to_string()),
    ]
}

fn metric_pairs(statistics: &ExportSummary) -> Vec<(&'static str, String)> {
    vec![
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
impl FormatRenderer for SpreadsheetRenderer {
    fn name(&self) -> &str {
        "xlsx"
    }

    fn media_type(&self) -> &str {
        MEDIA_TYPE_XLSX
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
            .ok_or(ExportError::MissingCapability("spreadsheet workbook builder"))?;

        let mut workbook = capability.new_workbook();
        for (category, sheet_name) in TEMPLATE_SHEETS {
            let template = self.templates.get(category)?;
            let rows = template.rows(snapshot);
            write_table(&mut *workbook, sheet_name, template.headers(), &rows)?;
        }
        write_key_values(&mut *workbook, "Summary", &count_pairs(&snapshot.statistics))?;
        write_key_values(
            &mut *workbook,
            "Statistics",
            &metric_pairs(&snapshot.statistics),
        )?;

        let bytes = workbook.finish().await?;
        Ok(RenderedPayload {
            content: ExportContent::Binary(bytes),
            filename: export_filename("workbook", "xlsx"),
            media_type: MEDIA_TYPE_XLSX,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::export::capability::SheetId;
    use crate::domains::export::relations::extract_relations;
    use crate::domains::export::statistics::summarize;
    use crate::domains::request::types::AccessRequest;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Sheet(String),
        Row(SheetId, usize, RowStyle),
        Width(SheetId, usize, f64),
        Filter(SheetId, usize, usize),
    }

    #[derive(Default)]
    struct RecordingWorkbook {
        ops: Arc<Mutex<Vec<Op>>>,
        sheets: usize,
    }

    #[async_trait]
    impl SpreadsheetWorkbook for RecordingWorkbook {
        fn add_sheet(&mut self, name: &str) -> ExportResult<SheetId> {
            self.ops.lock().unwrap().push(Op::Sheet(name.to_string()));
            let id = self.sheets;
            self.sheets += 1;
            Ok(id)
        }

        fn append_row(
            &mut self,
            sheet: SheetId,
            cells: &[String],
            style: RowStyle,
        ) -> ExportResult<()> {
            self.ops
                .lock()
                .unwrap()
                .push(Op::Row(sheet, cells.len(), style));
            Ok(())
        }

        fn set_column_width(
            &mut self,
            sheet: SheetId,
            column: usize,
            width: f64,
        ) -> ExportResult<()> {
            self.ops.lock().unwrap().push(Op::Width(sheet, column, width));
            Ok(())
        }

        fn set_auto_filter(
            &mut self,
            sheet: SheetId,
            rows: usize,
            columns: usize,
        ) -> ExportResult<()> {
            self.ops.lock().unwrap().push(Op::Filter(sheet, rows, columns));
            Ok(())
        }

        async fn finish(self: Box<Self>) -> ExportResult<Vec<u8>> {
            Ok(b"workbook-bytes".to_vec())
        }
    }

    struct RecordingCapability {
        ops: Arc<Mutex<Vec<Op>>>,
    }

    impl SpreadsheetCapability for RecordingCapability {
        fn new_workbook(&self) -> Box<dyn SpreadsheetWorkbook> {
            Box::new(RecordingWorkbook {
                ops: Arc::clone(&self.ops),
                sheets: 0,
            })
        }
    }

    fn snapshot() -> ExportSnapshot {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let long_subject = "a subject long enough to run past the column width cap \
                            so sizing has something to clamp";
        let requests = vec![AccessRequest::new("R1", "alice", long_subject, "WF1", base)];
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
    async fn test_missing_capability_fails_fast() {
        let renderer = SpreadsheetRenderer::new(TemplateRegistry::standard(), None);
        let err = renderer
            .render(&snapshot(), &ExportOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::MissingCapability(_)));
    }

    #[tokio::test]
    async fn test_renders_five_sheets_with_styles_and_filters() {
        let ops = Arc::new(Mutex::new(Vec::new()));
        let capability = Arc::new(RecordingCapability {
            ops: Arc::clone(&ops),
        });
        let renderer = SpreadsheetRenderer::new(TemplateRegistry::standard(), Some(capability));

        let payload = renderer
            .render(&snapshot(), &ExportOptions::default())
            .await
            .unwrap();
        assert_eq!(payload.content, ExportContent::Binary(b"workbook-bytes".to_vec()));
        assert!(payload.filename.ends_with(".xlsx"));

        let ops = ops.lock().unwrap();
        let sheet_names: Vec<&str> = ops
            .iter()
            .filter_map(|op| match op {
                Op::Sheet(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            sheet_names,
            vec!["Requests", "Approvals", "Rejections", "Summary", "Statistics"]
        );

        // Every sheet leads with a styled header row of the right width.
        assert!(ops.contains(&Op::Row(0, 8, RowStyle::Header)));
        assert!(ops.contains(&Op::Row(0, 8, RowStyle::Body)));
        assert!(ops.contains(&Op::Row(1, 6, RowStyle::Header)));

        // Requests sheet: header row plus one body row, eight columns.
        assert!(ops.contains(&Op::Filter(0, 2, 8)));

        // Long subject cell is clamped to the width cap.
        let widths: Vec<f64> = ops
            .iter()
            .filter_map(|op| match op {
                Op::Width(0, _, width) => Some(*width),
                _ => None,
            })
            .collect();
        assert_eq!(widths.len(), 8);
        assert!(widths.iter().all(|w| *w <= MAX_COLUMN_WIDTH));
        assert!(widths.iter().any(|w| (*w - MAX_COLUMN_WIDTH).abs() < f64::EPSILON));
    }
}
