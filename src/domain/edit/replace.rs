use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::DomTree;
use crate::domain::error::{require_non_empty, DomainResult};

impl DomTree {
    /// Renames every element labeled `old_tag` to `new_tag`.
    ///
    /// Text leaves are never touched, even when their content equals
    /// `old_tag`. Returns the number of renamed elements; zero matches is
    /// not an error.
    #[instrument(level = "debug", skip(self))]
    pub fn replace_tag(&mut self, old_tag: &str, new_tag: &str) -> DomainResult<usize> {
        require_non_empty("old_tag", old_tag)?;
        require_non_empty("new_tag", new_tag)?;
        self.built_root()?;

        let targets: Vec<Index> = self
            .iter()
            .filter(|(_, node)| node.is_element() && node.label == old_tag)
            .map(|(idx, _)| idx)
            .collect();

        for &idx in &targets {
            if let Some(node) = self.get_node_mut(idx) {
                node.label = new_tag.to_string();
            }
        }

        debug!(renamed = targets.len(), "replace done");
        Ok(targets.len())
    }
}
