use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::domains::request::repository::RequestStore;
use crate::errors::{ExportError, ExportResult};

use super::capability::{DocumentCapability, SpreadsheetCapability};
use super::query::filter_requests;
use super::relations::extract_relations;
use super::renderers::{
    CsvRenderer, DocumentRenderer, FormatRenderer, JsonRenderer, SpreadsheetRenderer, XmlRenderer,
};
use super::statistics::summarize;
use super::storage::FileStorage;
use super::templates::TemplateRegistry;
use super::types::{ExportMetadata, ExportOptions, ExportOutput, ExportSnapshot};

/// Generator tag stamped into every export envelope.
const GENERATED_BY: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Export orchestrator: validates the requested format, drives the
/// query → extraction → statistics → rendering pipeline and attaches
/// the metadata envelope.
#[async_trait]
pub trait ExportService: Send + Sync {
    async fn export_data(&self, format: &str, options: ExportOptions)
        -> ExportResult<ExportOutput>;

    /// Formats currently registered, sorted by name.
    fn supported_formats(&self) -> Vec<String>;
}

pub struct ExportServiceImpl {
    store: Arc<dyn RequestStore>,
    storage: Arc<dyn FileStorage>,
    renderers: HashMap<String, Arc<dyn FormatRenderer>>,
}

impl ExportServiceImpl {
    /// Service with the five standard formats registered. Capabilities
    /// are optional; formats that need an absent one fail at render
    /// time with `MissingCapability`.
    pub fn new(
        store: Arc<dyn RequestStore>,
        storage: Arc<dyn FileStorage>,
        spreadsheet: Option<Arc<dyn SpreadsheetCapability>>,
        document: Option<Arc<dyn DocumentCapability>>,
    ) -> Self {
        let templates = TemplateRegistry::standard();
        let builtin: Vec<Arc<dyn FormatRenderer>> = vec![
            Arc::new(CsvRenderer::new(templates.clone())),
            Arc::new(JsonRenderer),
            Arc::new(XmlRenderer),
            Arc::new(SpreadsheetRenderer::new(templates, spreadsheet)),
            Arc::new(DocumentRenderer::new(document)),
        ];

        let mut renderers: HashMap<String, Arc<dyn FormatRenderer>> = HashMap::new();
        for renderer in builtin {
            renderers.insert(renderer.name().to_string(), renderer);
        }
        Self {
            store,
            storage,
            renderers,
        }
    }

    /// Register an additional format at runtime. Names are unique across
    /// built-in and registered formats.
    pub fn register_format(&mut self, renderer: Arc<dyn FormatRenderer>) -> ExportResult<()> {
        let name = renderer.name().to_string();
        if self.renderers.contains_key(&name) {
            return Err(ExportError::DuplicateFormat(name));
        }
        log::info!("registered export format '{}'", name);
        self.renderers.insert(name, renderer);
        Ok(())
    }

    pub(crate) fn storage(&self) -> Arc<dyn FileStorage> {
        Arc::clone(&self.storage)
    }

    fn renderer(&self, format: &str) -> ExportResult<&Arc<dyn FormatRenderer>> {
        self.renderers
            .get(format)
            .ok_or_else(|| ExportError::UnsupportedFormat {
                requested: format.to_string(),
                supported: self.supported_formats(),
            })
    }
}

#[async_trait]
impl ExportService for ExportServiceImpl {
    async fn export_data(
        &self,
        format: &str,
        options: ExportOptions,
    ) -> ExportResult<ExportOutput> {
        // Resolve the renderer before touching the record store.
        let renderer = self.renderer(format)?;
        log::info!("starting '{}' export", format);

        let records = self.store.snapshot();
        let requests = filter_requests(&records, &options.filters);
        log::debug!(
            "{} of {} records matched the export filters",
            requests.len(),
            records.len()
        );

        let related = extract_relations(&requests);
        let statistics = summarize(&requests);
        let record_count = requests.len();
        let snapshot = ExportSnapshot {
            requests,
            approvals: related.approvals,
            rejections: related.rejections,
            comments: related.comments,
            statistics,
        };

        let payload = renderer.render(&snapshot, &options).await?;

        let mut hasher = Sha256::new();
        hasher.update(payload.content.as_bytes());
        let checksum = hex::encode(hasher.finalize());

        let size = payload.content.len();
        log::info!(
            "'{}' export complete: {} records, {} bytes",
            format,
            record_count,
            size
        );
        Ok(ExportOutput {
            content: payload.content,
            filename: payload.filename,
            media_type: payload.media_type.to_string(),
            size,
            metadata: ExportMetadata {
                exported_at: Utc::now(),
                format: format.to_string(),
                record_count,
                filters: options.filters,
                generated_by: GENERATED_BY.to_string(),
                checksum,
            },
        })
    }

    fn supported_formats(&self) -> Vec<String> {
        let mut formats: Vec<String> = self.renderers.keys().cloned().collect();
        formats.sort();
        formats
    }
}
