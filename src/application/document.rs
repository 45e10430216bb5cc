//! Document facade: one line source, one tree, the configured editors.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::config::MarkupSettings;
use crate::domain::error::require_non_empty;
use crate::domain::{DomTree, DomainError, DomainResult, TreeBuilder, UnwrapPolicy};

type LineSource = Box<dyn Iterator<Item = io::Result<String>>>;

/// A markup document: constructed from a line source, built once, then
/// edited and rendered any number of times.
///
/// Editors and renderers fail with [`DomainError::TreeNotBuilt`] until
/// [`Document::build`] has succeeded.
pub struct Document {
    source: Option<LineSource>,
    tree: Option<DomTree>,
    markup: MarkupSettings,
    builder: TreeBuilder,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("pending_source", &self.source.is_some())
            .field("tree", &self.tree)
            .field("markup", &self.markup)
            .finish()
    }
}

impl Document {
    /// Document over an in-memory sequence of lines, read lazily by `build`.
    pub fn new<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: 'static,
    {
        Self::from_source(Box::new(lines.into_iter().map(Ok::<String, io::Error>)))
    }

    pub fn from_reader<R: BufRead + 'static>(reader: R) -> Self {
        Self::from_source(Box::new(reader.lines()))
    }

    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        let file = File::open(path).with_path_context("open document", path)?;
        debug!("reading {}", path.display());
        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Builds a document from markup text in one step.
    pub fn parse(text: &str) -> DomainResult<Self> {
        let lines: Vec<String> = text.lines().map(String::from).collect();
        let mut document = Self::new(lines);
        document.build()?;
        Ok(document)
    }

    fn from_source(source: LineSource) -> Self {
        Self {
            source: Some(source),
            tree: None,
            markup: MarkupSettings::default(),
            builder: TreeBuilder::new(),
        }
    }

    pub fn with_settings(mut self, markup: MarkupSettings) -> Self {
        self.markup = markup;
        self
    }

    pub fn settings(&self) -> &MarkupSettings {
        &self.markup
    }

    pub fn is_built(&self) -> bool {
        self.tree.is_some()
    }

    pub fn tree(&self) -> Option<&DomTree> {
        self.tree.as_ref()
    }

    /// Consumes the line source and builds the tree. On failure no tree is
    /// kept and the source is gone.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&mut self) -> DomainResult<()> {
        let source = self.source.take().ok_or(DomainError::SourceConsumed)?;
        let tree = self.builder.build(source)?;
        self.tree = Some(tree);
        Ok(())
    }

    pub fn replace(&mut self, old_tag: &str, new_tag: &str) -> DomainResult<usize> {
        let tree = self.tree.as_mut().ok_or(DomainError::TreeNotBuilt)?;
        tree.replace_tag(old_tag, new_tag)
    }

    /// Bolds row `row` (1-based) of every table.
    pub fn bold_row(&mut self, row: usize) -> DomainResult<usize> {
        let tree = self.tree.as_mut().ok_or(DomainError::TreeNotBuilt)?;
        tree.bold_row(row, &self.markup.table_tag, &self.markup.bold_tag)
    }

    /// Removes every `tag` element. Inline tags are spliced out, list tags
    /// turn their items into paragraphs; any other tag is rejected.
    pub fn remove(&mut self, tag: &str) -> DomainResult<usize> {
        require_non_empty("tag", tag)?;
        let policy = if contains(&self.markup.inline_tags, tag) {
            UnwrapPolicy::Inline
        } else if contains(&self.markup.list_tags, tag) {
            UnwrapPolicy::List {
                paragraph_tag: &self.markup.paragraph_tag,
            }
        } else {
            return Err(DomainError::UnsupportedTag {
                operation: "remove",
                tag: tag.to_string(),
            });
        };
        let tree = self.tree.as_mut().ok_or(DomainError::TreeNotBuilt)?;
        tree.unwrap_tag(tag, policy)
    }

    /// Wraps every occurrence of `word` in a `tag` element.
    pub fn tag_word(&mut self, word: &str, tag: &str) -> DomainResult<usize> {
        require_non_empty("tag", tag)?;
        if !contains(&self.markup.word_tags, tag) {
            return Err(DomainError::UnsupportedTag {
                operation: "tag_word",
                tag: tag.to_string(),
            });
        }
        let tree = self.tree.as_mut().ok_or(DomainError::TreeNotBuilt)?;
        tree.tag_word(word, tag)
    }

    pub fn render(&self) -> DomainResult<String> {
        self.tree
            .as_ref()
            .map(DomTree::render)
            .ok_or(DomainError::TreeNotBuilt)
    }

    pub fn debug_print(&self) -> DomainResult<String> {
        self.tree
            .as_ref()
            .map(DomTree::debug_print)
            .ok_or(DomainError::TreeNotBuilt)
    }
}

fn contains(tags: &[String], tag: &str) -> bool {
    tags.iter().any(|t| t == tag)
}
