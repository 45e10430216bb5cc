use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{DomTree, Slot};
use crate::domain::error::{require_non_empty, DomainResult};

/// How an unwrapped element's children are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnwrapPolicy<'a> {
    /// Children take the element's place unchanged.
    Inline,
    /// Element children are relabeled to `paragraph_tag` before they take
    /// the list's place. Text children keep their content.
    List { paragraph_tag: &'a str },
}

impl DomTree {
    /// Removes every element labeled `tag`, splicing its children into its
    /// position.
    ///
    /// After a splice the same position is examined again, so wrappers that
    /// become exposed (nested occurrences) are removed too. The root element
    /// is never unwrapped. Returns the number of removed elements.
    #[instrument(level = "debug", skip(self))]
    pub fn unwrap_tag(&mut self, tag: &str, policy: UnwrapPolicy<'_>) -> DomainResult<usize> {
        require_non_empty("tag", tag)?;
        if let UnwrapPolicy::List { paragraph_tag } = policy {
            require_non_empty("paragraph_tag", paragraph_tag)?;
        }
        let root = self.built_root()?;

        let mut removed = 0;
        let mut stack = vec![Slot::FirstChildOf(root)];

        while let Some(slot) = stack.pop() {
            let Some(idx) = self.slot_target(slot) else {
                continue;
            };
            let Some(node) = self.get_node(idx) else {
                continue;
            };

            if node.is_element() && node.label == tag {
                if let UnwrapPolicy::List { paragraph_tag } = policy {
                    self.relabel_element_children(idx, paragraph_tag);
                }
                if self.splice_children(slot).is_some() {
                    trace!(tag, "unwrapped");
                    removed += 1;
                }
                stack.push(slot);
                continue;
            }

            let has_children = node.is_element();
            stack.push(Slot::NextSiblingOf(idx));
            if has_children {
                stack.push(Slot::FirstChildOf(idx));
            }
        }

        debug!(removed, "unwrap done");
        Ok(removed)
    }

    fn relabel_element_children(&mut self, parent: Index, label: &str) {
        let items: Vec<Index> = self
            .children(parent)
            .filter(|&child| self.is_element(child))
            .collect();
        for item in items {
            if let Some(node) = self.get_node_mut(item) {
                node.label = label.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::TreeBuilder;

    #[test]
    fn given_nested_wrappers_when_unwrapping_inline_then_all_levels_removed() {
        let mut tree = TreeBuilder::new()
            .build_from_str("<html>\n<b>\n<b>\nx\n</b>\ny\n</b>\n</html>\n")
            .unwrap();

        let removed = tree.unwrap_tag("b", UnwrapPolicy::Inline).unwrap();

        assert_eq!(removed, 2);
        assert_eq!(tree.render(), "<html>\nx\ny\n</html>\n");
    }

    #[test]
    fn given_root_with_matching_label_when_unwrapping_then_root_kept() {
        let mut tree = TreeBuilder::new()
            .build_from_str("<p>\n<p>\nx\n</p>\n</p>\n")
            .unwrap();

        let removed = tree.unwrap_tag("p", UnwrapPolicy::Inline).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(tree.render(), "<p>\nx\n</p>\n");
    }

    #[test]
    fn given_single_item_list_when_unwrapping_then_item_becomes_paragraph() {
        let mut tree = TreeBuilder::new()
            .build_from_str("<html>\n<ul>\n<li>\nonly\n</li>\n</ul>\n</html>\n")
            .unwrap();

        tree.unwrap_tag("ul", UnwrapPolicy::List { paragraph_tag: "p" })
            .unwrap();

        assert_eq!(tree.render(), "<html>\n<p>\nonly\n</p>\n</html>\n");
    }

    #[test]
    fn given_list_inside_list_item_when_unwrapping_then_both_lists_removed() {
        let mut tree = TreeBuilder::new()
            .build_from_str(
                "<html>\n<ul>\n<li>\na\n<ul>\n<li>\nb\n</li>\n</ul>\n</li>\n\
                 <li>\nc\n</li>\n</ul>\n</html>\n",
            )
            .unwrap();

        let removed = tree
            .unwrap_tag("ul", UnwrapPolicy::List { paragraph_tag: "p" })
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(
            tree.render(),
            "<html>\n<p>\na\n<p>\nb\n</p>\n</p>\n<p>\nc\n</p>\n</html>\n"
        );
    }
}
