//! Tree builder for line-oriented markup documents.

use std::io::{self, BufRead};

use generational_arena::Index;
use regex::Regex;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{DomTree, Node};
use crate::domain::error::{DomainError, DomainResult};

/// One input line, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Open(&'a str),
    Close(&'a str),
    Text(&'a str),
}

/// An element whose closing tag has not been seen yet.
#[derive(Debug)]
struct OpenElement {
    index: Index,
    label: String,
    /// Last child appended so far
    tail: Option<Index>,
}

impl OpenElement {
    fn new(index: Index, label: &str) -> Self {
        Self {
            index,
            label: label.to_string(),
            tail: None,
        }
    }
}

/// Constructs a [`DomTree`] from markup lines.
///
/// The first line must open the document root. Every following line is an
/// opening tag, a closing tag or literal text. The builder is strict: any
/// imbalance is reported as a structure error with its line number.
pub struct TreeBuilder {
    tag_regex: Regex,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            tag_regex: Regex::new(r"^<(/?)([^<>/\s]+)>$").expect("tag pattern is valid"),
        }
    }

    pub fn classify<'a>(&self, line: &'a str) -> Line<'a> {
        let Some(caps) = self.tag_regex.captures(line) else {
            return Line::Text(line);
        };
        let name = caps.get(2).map_or("", |m| m.as_str());
        if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
            Line::Close(name)
        } else {
            Line::Open(name)
        }
    }

    pub fn build_from_str(&self, text: &str) -> DomainResult<DomTree> {
        self.build_from_lines(text.lines())
    }

    pub fn build_from_lines<I, S>(&self, lines: I) -> DomainResult<DomTree>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build(lines.into_iter().map(|l| -> io::Result<String> { Ok(l.into()) }))
    }

    pub fn build_from_reader<R: BufRead>(&self, reader: R) -> DomainResult<DomTree> {
        self.build(reader.lines())
    }

    /// Builds a tree from a fallible line source.
    #[instrument(level = "debug", skip_all)]
    pub fn build<I>(&self, lines: I) -> DomainResult<DomTree>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let mut numbered = lines.into_iter().enumerate().map(|(i, l)| (i + 1, l));

        let Some((first_no, first)) = numbered.next() else {
            return Err(DomainError::EmptyDocument);
        };
        let first = first.map_err(|source| DomainError::Read {
            line: first_no,
            source,
        })?;
        let Line::Open(root_label) = self.classify(&first) else {
            return Err(DomainError::MissingRootTag {
                line: first_no,
                found: first,
            });
        };

        let mut tree = DomTree::new();
        let root = tree.insert_node(Node::new(root_label));
        tree.set_root(root);
        let mut stack = vec![OpenElement::new(root, root_label)];

        for (line_no, line) in numbered {
            let line = line.map_err(|source| DomainError::Read {
                line: line_no,
                source,
            })?;
            let kind = self.classify(&line);

            let Some(parent) = stack.last_mut() else {
                match kind {
                    Line::Close(tag) => {
                        return Err(DomainError::UnexpectedClose {
                            line: line_no,
                            tag: tag.to_string(),
                        })
                    }
                    Line::Text(text) if text.trim().is_empty() => continue,
                    _ => return Err(DomainError::TrailingContent { line: line_no }),
                }
            };

            match kind {
                Line::Close(tag) => {
                    if parent.label != tag {
                        return Err(DomainError::MismatchedClose {
                            line: line_no,
                            expected: parent.label.clone(),
                            found: tag.to_string(),
                        });
                    }
                    if parent.tail.is_none() {
                        return Err(DomainError::EmptyElement {
                            line: line_no,
                            tag: tag.to_string(),
                        });
                    }
                    trace!(line = line_no, tag, "close");
                    stack.pop();
                }
                Line::Open(tag) => {
                    let idx = tree.insert_node(Node::new(tag));
                    tree.attach(parent.index, parent.tail, idx);
                    parent.tail = Some(idx);
                    trace!(line = line_no, tag, "open");
                    stack.push(OpenElement::new(idx, tag));
                }
                Line::Text(text) => {
                    let idx = tree.insert_node(Node::new(text));
                    tree.attach(parent.index, parent.tail, idx);
                    parent.tail = Some(idx);
                }
            }
        }

        if let Some(open) = stack.pop() {
            return Err(DomainError::UnclosedElement { tag: open.label });
        }

        debug!(nodes = tree.node_count(), depth = tree.depth(), "built tree");
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case("<html>", Line::Open("html"))]
    #[case("</html>", Line::Close("html"))]
    #[case("<ordered-list>", Line::Open("ordered-list"))]
    #[case("Hello world", Line::Text("Hello world"))]
    #[case("", Line::Text(""))]
    #[case("<br/>", Line::Text("<br/>"))]
    #[case("<a b>", Line::Text("<a b>"))]
    #[case("<3 you", Line::Text("<3 you"))]
    #[case("<>", Line::Text("<>"))]
    fn given_line_when_classifying_then_returns_kind(#[case] line: &str, #[case] expected: Line) {
        let builder = TreeBuilder::new();
        assert_eq!(builder.classify(line), expected);
    }

    #[test]
    fn given_nested_document_when_building_then_links_children_in_order() {
        let builder = TreeBuilder::new();
        let tree = builder
            .build_from_str("<html>\n<body>\none\n<p>\ntwo\n</p>\nthree\n</body>\n</html>\n")
            .unwrap();

        let root = tree.root().unwrap();
        assert_eq!(tree.label(root), Some("html"));
        let body = tree.first_child(root).unwrap();
        assert_eq!(tree.label(body), Some("body"));
        let labels: Vec<&str> = tree
            .children(body)
            .filter_map(|idx| tree.label(idx))
            .collect();
        assert_eq!(labels, vec!["one", "p", "three"]);
        assert_eq!(tree.depth(), 4);
    }

    #[rstest]
    #[case("", ErrorKind::Structure)]
    #[case("text first\n", ErrorKind::Structure)]
    #[case("<html>\n<p>\nx\n</b>\n</html>\n", ErrorKind::Structure)]
    #[case("<html>\n<p>\n</p>\n</html>\n", ErrorKind::Structure)]
    #[case("<html>\n<p>\nx\n", ErrorKind::Structure)]
    #[case("<html>\nx\n</html>\n</html>\n", ErrorKind::Structure)]
    #[case("<html>\nx\n</html>\nafter\n", ErrorKind::Structure)]
    fn given_malformed_document_when_building_then_structure_error(
        #[case] text: &str,
        #[case] kind: ErrorKind,
    ) {
        let builder = TreeBuilder::new();
        let err = builder.build_from_str(text).unwrap_err();
        assert_eq!(err.kind(), kind, "{err}");
    }

    #[test]
    fn given_mismatched_close_when_building_then_reports_line_and_tags() {
        let builder = TreeBuilder::new();
        let err = builder
            .build_from_str("<html>\n<p>\nx\n</b>\n</html>\n")
            .unwrap_err();
        match err {
            DomainError::MismatchedClose {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 4);
                assert_eq!(expected, "p");
                assert_eq!(found, "b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn given_trailing_blank_lines_when_building_then_ignored() {
        let builder = TreeBuilder::new();
        let tree = builder.build_from_str("<html>\nx\n</html>\n\n  \n").unwrap();
        assert_eq!(tree.leaf_labels(), vec!["x".to_string()]);
    }

    #[test]
    fn given_blank_line_inside_document_when_building_then_kept_as_text() {
        let builder = TreeBuilder::new();
        let tree = builder.build_from_str("<html>\nx\n\ny\n</html>\n").unwrap();
        assert_eq!(tree.leaf_count(), 3);
    }
}
