//! Application layer: the document facade
//!
//! This layer connects the domain algorithms to line sources, files and
//! the configured tag vocabulary.

pub mod document;
pub mod error;
pub mod error_ext;

pub use document::Document;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
