use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::DomTree;
use crate::domain::error::{require_non_empty, DomainError, DomainResult};

impl DomTree {
    /// Wraps the content of every cell in row `row` (1-based) of every
    /// `table_tag` element in a new `bold_tag` element.
    ///
    /// Tables are visited children-first. All tables are checked before the
    /// first wrapper is inserted: a missing row or a row without element
    /// cells fails the whole call. Returns the number of bolded cells.
    #[instrument(level = "debug", skip(self))]
    pub fn bold_row(&mut self, row: usize, table_tag: &str, bold_tag: &str) -> DomainResult<usize> {
        require_non_empty("table_tag", table_tag)?;
        require_non_empty("bold_tag", bold_tag)?;
        if row == 0 {
            return Err(DomainError::InvalidRowIndex(row));
        }
        self.built_root()?;

        let tables: Vec<Index> = self
            .iter_postorder()
            .filter(|(_, node)| node.is_element() && node.label == table_tag)
            .map(|(idx, _)| idx)
            .collect();

        let mut cells = Vec::new();
        for table in tables {
            let Some(row_idx) = self.children(table).nth(row - 1) else {
                return Err(DomainError::RowNotFound {
                    row,
                    rows: self.children(table).count(),
                });
            };
            let before = cells.len();
            cells.extend(self.children(row_idx).filter(|&cell| self.is_element(cell)));
            if cells.len() == before {
                return Err(DomainError::EmptyRow { row });
            }
        }

        for &cell in &cells {
            self.wrap_children(cell, bold_tag);
        }

        debug!(cells = cells.len(), "bold row done");
        Ok(cells.len())
    }
}
