use generational_arena::Index;
use itertools::Itertools;
use regex::Regex;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{DomTree, Node};
use crate::domain::error::{require_non_empty, DomainError, DomainResult};

/// Piece of a text leaf after splitting around matched words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Consecutive non-matching tokens joined by single spaces
    Text(String),
    /// A matched token, punctuation included
    Word(String),
}

impl Segment {
    pub fn is_word(&self) -> bool {
        matches!(self, Segment::Word(_))
    }
}

/// Case-insensitive matcher for a word optionally followed by one of
/// `.` `?` `!` `,`.
#[derive(Debug, Clone)]
pub struct WordMatcher {
    regex: Regex,
}

impl WordMatcher {
    pub fn new(word: &str) -> DomainResult<Self> {
        require_non_empty("word", word)?;
        if word.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidWord(word.to_string()));
        }
        let pattern = format!(r"(?i)^{}[.?!,]?$", regex::escape(word));
        let regex = Regex::new(&pattern).map_err(|_| DomainError::InvalidWord(word.to_string()))?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }

    /// Splits `text` on whitespace into text runs and matched words.
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        for (matched, mut tokens) in &text.split_whitespace().chunk_by(|token| self.is_match(token)) {
            if matched {
                segments.extend(tokens.map(|t| Segment::Word(t.to_string())));
            } else {
                segments.push(Segment::Text(tokens.join(" ")));
            }
        }
        segments
    }
}

impl DomTree {
    /// Wraps every standalone occurrence of `word` in text leaves in a new
    /// `tag` element.
    ///
    /// Only leaves present before the call are scanned; the leaves created
    /// for matched words are not scanned again. A leaf without matches is
    /// left exactly as it was. Returns the number of wrappers created.
    #[instrument(level = "debug", skip(self))]
    pub fn tag_word(&mut self, word: &str, tag: &str) -> DomainResult<usize> {
        require_non_empty("tag", tag)?;
        let matcher = WordMatcher::new(word)?;
        self.built_root()?;

        let leaves: Vec<Index> = self
            .iter()
            .filter(|(_, node)| node.is_text())
            .map(|(idx, _)| idx)
            .collect();

        let mut wrapped = 0;
        for leaf in leaves {
            let Some(label) = self.label(leaf) else {
                continue;
            };
            let segments = matcher.segments(label);
            if !segments.iter().any(Segment::is_word) {
                continue;
            }
            wrapped += self.expand_leaf(leaf, segments, tag);
        }

        debug!(wrapped, "tag word done");
        Ok(wrapped)
    }

    /// Replaces `leaf` by the nodes for `segments`, reusing the leaf itself
    /// as the first of them.
    fn expand_leaf(&mut self, leaf: Index, segments: Vec<Segment>, tag: &str) -> usize {
        let after = self.next_sibling(leaf);
        let mut words = 0;
        let mut prev: Option<Index> = None;

        for segment in segments {
            let node = match segment {
                Segment::Text(text) => Node::new(text),
                Segment::Word(token) => {
                    words += 1;
                    let inner = self.insert_node(Node::new(token));
                    Node::with_child(tag, inner)
                }
            };
            match prev {
                None => {
                    if let Some(target) = self.get_node_mut(leaf) {
                        target.label = node.label;
                        target.first_child = node.first_child;
                    }
                    prev = Some(leaf);
                }
                Some(p) => {
                    let idx = self.insert_node(node);
                    self.set_next_sibling(p, Some(idx));
                    prev = Some(idx);
                }
            }
        }

        if let Some(last) = prev {
            self.set_next_sibling(last, after);
        }
        trace!(words, "expanded leaf");
        words
    }
}
