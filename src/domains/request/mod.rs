pub mod repository;
pub mod types;

pub use repository::{InMemoryRequestStore, RequestStore};
pub use types::{
    AccessRequest, ApprovalEvent, CommentEvent, RejectionEvent, RequestMetadata, RequestStatus,
};
