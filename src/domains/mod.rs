pub mod export;
pub mod request;

pub use export::{ExportQueryBuilder, ExportService, ExportServiceImpl};
pub use request::{AccessRequest, InMemoryRequestStore, RequestStore};
