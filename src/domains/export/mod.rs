pub mod builder;
pub mod capability;
pub mod query;
pub mod relations;
pub mod renderers;
pub mod service;
pub mod statistics;
pub mod storage;
pub mod templates;
pub mod types;

pub use builder::ExportQueryBuilder;
pub use capability::{
    DocumentCapability, DocumentSurface, RowStyle, SheetId, SpreadsheetCapability,
    SpreadsheetWorkbook,
};
pub use renderers::FormatRenderer;
pub use service::{ExportService, ExportServiceImpl};
pub use statistics::ExportSummary;
pub use storage::{FileStorage, LocalFileStorage};
pub use templates::{TableRecord, Template, TemplateRegistry};
pub use types::{
    DateRange, ExportCategory, ExportContent, ExportMetadata, ExportOptions, ExportOutput,
    ExportSnapshot, JsonExportMode, QueryCriteria, RenderedPayload, SortOrder,
};
