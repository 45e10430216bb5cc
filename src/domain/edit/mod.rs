//! In-place structural edits on a [`DomTree`].
//!
//! Every editor validates its arguments (and, where needed, the document)
//! before the first mutation, so a failed call leaves the tree untouched.

mod bold_row;
mod replace;
mod unwrap;
mod word_tag;

pub use unwrap::UnwrapPolicy;
pub use word_tag::{Segment, WordMatcher};

use generational_arena::Index;

use crate::domain::arena::DomTree;
use crate::domain::error::{DomainError, DomainResult};

impl DomTree {
    /// Root of a built tree, or `TreeNotBuilt`.
    pub(crate) fn built_root(&self) -> DomainResult<Index> {
        self.root().ok_or(DomainError::TreeNotBuilt)
    }
}
