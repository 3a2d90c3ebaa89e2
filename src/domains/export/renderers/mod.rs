pub mod csv;
pub mod document;
pub mod json;
pub mod spreadsheet;
pub mod xml;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::ExportResult;

use super::types::{ExportOptions, ExportSnapshot, RenderedPayload};

/// Fixed filename prefix shared by every export family.
pub const FILE_PREFIX: &str = "access_requests";

/// Media types, one per supported format.
pub const MEDIA_TYPE_CSV: &str = "text/csv";
pub const MEDIA_TYPE_JSON: &str = "application/json";
pub const MEDIA_TYPE_XML: &str = "application/xml";
pub const MEDIA_TYPE_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MEDIA_TYPE_PDF: &str = "application/pdf";

/// One renderer per output format.
///
/// Renderers consume the prepared snapshot and produce a complete
/// payload, or fail before any partial output escapes.
#[async_trait]
pub trait FormatRenderer: Send + Sync {
    /// Registry key for this renderer.
    fn name(&self) -> &str;

    /// Media type of the rendered payload.
    fn media_type(&self) -> &str;

    async fn render(
        &self,
        snapshot: &ExportSnapshot,
        options: &ExportOptions,
    ) -> ExportResult<RenderedPayload>;
}

/// Builds `<prefix>_<discriminator>_<YYYY-MM-DD>.<ext>`.
pub(crate) fn export_filename(discriminator: &str, extension: &str) -> String {
    format!(
        "{}_{}_{}.{}",
        FILE_PREFIX,
        discriminator,
        Utc::now().format("%Y-%m-%d"),
        extension
    )
}

pub use self::csv::CsvRenderer;
pub use self::document::DocumentRenderer;
pub use self::json::JsonRenderer;
pub use self::spreadsheet::SpreadsheetRenderer;
pub use self::xml::XmlRenderer;
