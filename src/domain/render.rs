//! Markup serialization and the diagnostic outline view.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::DomTree;

enum Step {
    Open(Index),
    Close(Index),
}

impl DomTree {
    /// Serializes the tree back to the line format it was built from: one
    /// line per leaf, an opening and a closing tag line per element.
    #[instrument(level = "debug", skip(self))]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<Step> = self.root().map(Step::Open).into_iter().collect();

        while let Some(step) = stack.pop() {
            match step {
                Step::Open(idx) => {
                    let Some(node) = self.get_node(idx) else {
                        continue;
                    };
                    if let Some(sibling) = node.next_sibling {
                        stack.push(Step::Open(sibling));
                    }
                    match node.first_child {
                        None => {
                            out.push_str(&node.label);
                            out.push('\n');
                        }
                        Some(child) => {
                            out.push('<');
                            out.push_str(&node.label);
                            out.push_str(">\n");
                            stack.push(Step::Close(idx));
                            stack.push(Step::Open(child));
                        }
                    }
                }
                Step::Close(idx) => {
                    if let Some(label) = self.label(idx) {
                        out.push_str("</");
                        out.push_str(label);
                        out.push_str(">\n");
                    }
                }
            }
        }
        out
    }

    /// Indented outline of the tree, for diagnostics only.
    pub fn debug_print(&self) -> String {
        self.to_term_tree().to_string()
    }
}

pub trait TreeNodeConvert {
    fn to_term_tree(&self) -> Tree<String>;
}

impl TreeNodeConvert for DomTree {
    /// Assembles the outline bottom-up from a post-order walk: when a node
    /// is reached, its children's subtrees are the topmost entries of
    /// `built`.
    fn to_term_tree(&self) -> Tree<String> {
        let mut built: Vec<Tree<String>> = Vec::new();

        for (idx, node) in self.iter_postorder() {
            let child_count = self.children(idx).count();
            let leaves = built.split_off(built.len().saturating_sub(child_count));
            built.push(Tree::new(node.label.clone()).with_leaves(leaves));
        }

        built
            .pop()
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}
