//! Arena-backed markup tree in first-child / next-sibling form.

use generational_arena::{Arena, Index};
use tracing::instrument;

/// A node is an element when it has a first child, a text leaf otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Tag name for elements, literal text for leaves
    pub label: String,
    /// Index of the first child, None for text leaves
    pub first_child: Option<Index>,
    /// Index of the next node at the same level, None for the last one
    pub next_sibling: Option<Index>,
}

impl Node {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            first_child: None,
            next_sibling: None,
        }
    }

    /// An element whose sole child is `child`.
    pub fn with_child(label: impl Into<String>, child: Index) -> Self {
        Self {
            label: label.into(),
            first_child: Some(child),
            next_sibling: None,
        }
    }

    pub fn is_element(&self) -> bool {
        self.first_child.is_some()
    }

    pub fn is_text(&self) -> bool {
        self.first_child.is_none()
    }
}

/// The single link that refers to a node: its parent's first-child field or
/// its predecessor's next-sibling field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    FirstChildOf(Index),
    NextSiblingOf(Index),
}

/// Arena-based markup tree.
///
/// Nodes only refer to each other through arena indices, so splicing is a
/// matter of rewriting `first_child` / `next_sibling` fields. Nodes that an
/// edit detaches are removed from the arena in the same call.
#[derive(Debug)]
pub struct DomTree {
    /// Arena storage for all tree nodes
    arena: Arena<Node>,
    /// Index of the root element, None until the builder sets it
    root: Option<Index>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Allocates a detached node.
    #[instrument(level = "trace", skip(self, node))]
    pub fn insert_node(&mut self, node: Node) -> Index {
        self.arena.insert(node)
    }

    pub(crate) fn set_root(&mut self, idx: Index) {
        self.root = Some(idx);
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&Node> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut Node> {
        self.arena.get_mut(idx)
    }

    pub fn label(&self, idx: Index) -> Option<&str> {
        self.get_node(idx).map(|n| n.label.as_str())
    }

    pub fn is_element(&self, idx: Index) -> bool {
        self.get_node(idx).is_some_and(Node::is_element)
    }

    pub fn first_child(&self, idx: Index) -> Option<Index> {
        self.get_node(idx).and_then(|n| n.first_child)
    }

    pub fn next_sibling(&self, idx: Index) -> Option<Index> {
        self.get_node(idx).and_then(|n| n.next_sibling)
    }

    /// Iterates the sibling chain of `idx`'s children.
    pub fn children(&self, idx: Index) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(idx),
        }
    }

    /// Appends `child` as the last child of `parent` by walking the existing
    /// sibling chain. Meant for trees assembled by hand; the builder keeps
    /// tail pointers instead.
    #[instrument(level = "trace", skip(self))]
    pub fn append_child(&mut self, parent: Index, child: Index) {
        let last = self.children(parent).last();
        match last {
            Some(last) => self.arena[last].next_sibling = Some(child),
            None => self.arena[parent].first_child = Some(child),
        }
    }

    /// Links `child` after `tail`, or as first child of `parent` when there
    /// is no tail yet.
    pub(crate) fn attach(&mut self, parent: Index, tail: Option<Index>, child: Index) {
        match tail {
            Some(last) => self.arena[last].next_sibling = Some(child),
            None => self.arena[parent].first_child = Some(child),
        }
    }

    pub(crate) fn slot_target(&self, slot: Slot) -> Option<Index> {
        match slot {
            Slot::FirstChildOf(parent) => self.first_child(parent),
            Slot::NextSiblingOf(prev) => self.next_sibling(prev),
        }
    }

    pub(crate) fn set_slot(&mut self, slot: Slot, target: Option<Index>) {
        match slot {
            Slot::FirstChildOf(parent) => self.arena[parent].first_child = target,
            Slot::NextSiblingOf(prev) => self.arena[prev].next_sibling = target,
        }
    }

    /// Replaces the element at `slot` by its children, in order, and frees
    /// it. Returns the freed index, or None when the slot holds no element.
    pub(crate) fn splice_children(&mut self, slot: Slot) -> Option<Index> {
        let idx = self.slot_target(slot)?;
        let last = self.children(idx).last()?;
        let node = self.arena.remove(idx)?;
        self.arena[last].next_sibling = node.next_sibling;
        self.set_slot(slot, node.first_child);
        Some(idx)
    }

    /// Inserts a new `label` element between `parent` and its current
    /// children.
    pub(crate) fn wrap_children(&mut self, parent: Index, label: &str) -> Option<Index> {
        let content = self.first_child(parent)?;
        let wrapper = self.arena.insert(Node::with_child(label, content));
        self.arena[parent].first_child = Some(wrapper);
        Some(wrapper)
    }

    pub(crate) fn set_next_sibling(&mut self, idx: Index, next: Option<Index>) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.next_sibling = next;
        }
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels, counting the root as 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(idx) {
                if let Some(sibling) = node.next_sibling {
                    stack.push((sibling, depth));
                }
                if let Some(child) = node.first_child {
                    stack.push((child, depth + 1));
                }
            }
        }
        max_depth
    }

    pub fn leaf_count(&self) -> usize {
        self.iter().filter(|(_, node)| node.is_text()).count()
    }

    /// Text of all leaves in document order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_labels(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_text())
            .map(|(_, node)| node.label.clone())
            .collect()
    }

    /// Number of elements (not leaves) labeled `label`.
    pub fn count_elements(&self, label: &str) -> usize {
        self.iter()
            .filter(|(_, node)| node.is_element() && node.label == label)
            .count()
    }
}

/// Iterator over a node's children.
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<Index>,
}

impl Iterator for Children<'_> {
    type Item = Index;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Depth-first pre-order traversal with an explicit stack.
pub struct TreeIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a DomTree) -> Self {
        Self {
            tree,
            stack: tree.root().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.tree.get_node(current_idx)?;
        // sibling below child: the whole subtree comes first
        if let Some(sibling) = node.next_sibling {
            self.stack.push(sibling);
        }
        if let Some(child) = node.first_child {
            self.stack.push(child);
        }
        Some((current_idx, node))
    }
}

/// Children-before-parent traversal with an explicit stack.
pub struct PostOrderIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a DomTree) -> Self {
        Self {
            tree,
            stack: tree.root().map(|r| (r, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            let Some(node) = self.tree.get_node(current_idx) else {
                continue;
            };
            if visited {
                return Some((current_idx, node));
            }
            if let Some(sibling) = node.next_sibling {
                self.stack.push((sibling, false));
            }
            self.stack.push((current_idx, true));
            if let Some(child) = node.first_child {
                self.stack.push((child, false));
            }
        }
        None
    }
}
