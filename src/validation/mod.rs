//! Batch validation of API declarations before local deployment

mod api;
mod batch;
mod duplicates;
mod error;
mod report;


pub use api::{ApiValidator, DEFAULT_IMAGE_REGISTRY, SpecValidator};
pub use batch::{LocalBatchValidator, validate_local_apis};
pub use duplicates::find_duplicate_names;
pub use error::ValidationError;
pub use report::{Advisory, ValidationReport};
