//! Domain layer: the markup tree and its algorithms
//!
//! This layer is independent of external concerns (no file I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod edit;
pub mod error;
pub mod render;

pub use arena::{DomTree, Node, PostOrderIterator, TreeIterator};
pub use builder::{Line, TreeBuilder};
pub use edit::{Segment, UnwrapPolicy, WordMatcher};
pub use error::{DomainError, DomainResult, ErrorKind};
pub use render::TreeNodeConvert;
