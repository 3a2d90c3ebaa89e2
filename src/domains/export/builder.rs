use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domains::request::types::RequestStatus;
use crate::errors::ExportResult;
use crate::validation::Validate;

use super::service::{ExportService, ExportServiceImpl};
use super::types::{
    DateRange, ExportCategory, ExportOptions, ExportOutput, JsonExportMode, SortOrder,
};

/// Accumulates filter and format options across chained calls, then
/// hands off to the orchestrator.
///
/// `execute` returns the payload; `download` additionally persists it
/// under its own filename through the service's file storage.
pub struct ExportQueryBuilder {
    service: Arc<ExportServiceImpl>,
    format: String,
    options: ExportOptions,
}

impl ExportQueryBuilder {
    pub fn new(service: Arc<ExportServiceImpl>) -> Self {
        Self {
            service,
            format: "json".to_string(),
            options: ExportOptions::default(),
        }
    }

    pub fn format(mut self, format: &str) -> Self {
        self.format = format.to_string();
        self
    }

    pub fn date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.options.filters.date_range = Some(DateRange { start, end });
        self
    }

    pub fn status(mut self, status: RequestStatus) -> Self {
        self.options.filters.status = Some(status);
        self
    }

    pub fn requester(mut self, requester: &str) -> Self {
        self.options.filters.requester = Some(requester.to_string());
        self
    }

    pub fn workflow(mut self, workflow_id: &str) -> Self {
        self.options.filters.workflow_id = Some(workflow_id.to_string());
        self
    }

    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        self.options.filters.sort_by = Some(field.to_string());
        self.options.filters.sort_order = Some(order);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.options.filters.limit = Some(limit);
        self
    }

    pub fn sheet(mut self, category: ExportCategory) -> Self {
        self.options.sheet = Some(category);
        self
    }

    pub fn mode(mut self, mode: JsonExportMode) -> Self {
        self.options.mode = Some(mode);
        self
    }

    /// Validate the accumulated criteria and run the export.
    pub async fn execute(self) -> ExportResult<ExportOutput> {
        self.options.filters.validate()?;
        self.service.export_data(&self.format, self.options).await
    }

    /// Run the export and persist the payload under its own filename.
    /// Returns the payload together with the written path.
    pub async fn download(self) -> ExportResult<(ExportOutput, PathBuf)> {
        let storage = self.service.storage();
        let output = self.execute().await?;
        let path = storage.save(&output.filename, output.content.as_bytes()).await?;
        Ok((output, path))
    }
}
