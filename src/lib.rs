//! domtree: build, edit and serialize line-oriented markup documents.
//!
//! Layers, innermost first:
//! - `domain`: arena tree, builder, editors, serializer
//! - `application`: the [`Document`] facade and its errors
//! - `config`: layered tag vocabulary
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use application::{ApplicationError, ApplicationResult, Document};
pub use config::{MarkupSettings, Settings};
pub use domain::{DomTree, DomainError, DomainResult, ErrorKind, TreeBuilder};
