//! Record access service: create, read, search, and delete student records.

mod service;
pub mod types;
pub mod validate;

pub use service::{RecordApi, RecordService};
pub use types::{NotFound, RecordError, StoreHealthSnapshot, Student};
