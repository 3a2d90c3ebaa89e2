// Public modules
pub mod domains;
pub mod errors;
pub mod validation;

pub use domains::export::{
    ExportCategory, ExportContent, ExportOptions, ExportOutput, ExportQueryBuilder, ExportService,
    ExportServiceImpl, ExportSummary, FileStorage, FormatRenderer, JsonExportMode, LocalFileStorage,
    QueryCriteria, SortOrder,
};
pub use domains::request::{AccessRequest, InMemoryRequestStore, RequestStatus, RequestStore};
pub use errors::{ExportError, ExportResult};
