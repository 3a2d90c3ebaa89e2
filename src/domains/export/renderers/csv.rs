use async_trait::async_trait;
use csv::WriterBuilder;

use crate::domains::export::templates::TemplateRegistry;
use crate::domains::export::types::{
    ExportCategory, ExportContent, ExportOptions, ExportSnapshot, RenderedPayload,
};
use crate::errors::{ExportError, ExportResult};

use super::{export_filename, FormatRenderer, MEDIA_TYPE_CSV};

// UTF-8 BOM for spreadsheet-app compatibility
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Delimited-text renderer. One category per file, selected via
/// `options.sheet`; fields containing the delimiter, a quote or a
/// newline are quoted with internal quotes doubled.
pub struct CsvRenderer {
    name: String,
    templates: TemplateRegistry,
}

impl CsvRenderer {
    pub fn new(templates: TemplateRegistry) -> Self {
        Self::named("csv", templates)
    }

    /// Renderer registered under a custom format name, carrying its own
    /// template set. This is how additional delimited formats are added
    /// at runtime.
    pub fn named(name: &str, templates: TemplateRegistry) -> Self {
        Self {
            name: name.to_string(),
            templates,
        }
    }
}

impl Default for CsvRenderer {
    fn default() -> Self {
        Self::new(TemplateRegistry::standard())
    }
}

#[async_trait]
impl FormatRenderer for CsvRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn media_type(&self) -> &str {
        MEDIA_TYPE_CSV
    }

    async fn render(
        &self,
        snapshot: &ExportSnapshot,
        options: &ExportOptions,
    ) -> ExportResult<RenderedPayload> {
        let category = options.sheet.unwrap_or(ExportCategory::Requests);
        let template = self.templates.get(category)?;

        let mut buffer = UTF8_BOM.to_vec();
        {
            let mut writer = WriterBuilder::new().from_writer(&mut buffer);
            writer
                .write_record(template.headers())
                .map_err(|e| ExportError::Serialization(e.to_string()))?;
            for row in template.rows(snapshot) {
                writer
                    .write_record(&row)
                    .map_err(|e| ExportError::Serialization(e.to_string()))?;
            }
            writer
                .flush()
                .map_err(|e| ExportError::Io(e.to_string()))?;
        }

        let text =
            String::from_utf8(buffer).map_err(|e| ExportError::Serialization(e.to_string()))?;
        Ok(RenderedPayload {
            content: ExportContent::Text(text),
            filename: export_filename(&category.to_string(), "csv"),
            media_type: MEDIA_TYPE_CSV,
        })
    }
}
