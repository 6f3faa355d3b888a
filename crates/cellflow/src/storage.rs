//! Sparse cell storage
//!
//! Only materialized cells are stored, using a row-based BTreeMap structure.
//! The grid "grows" simply by inserting at higher indices; nothing is
//! preallocated.

use std::collections::BTreeMap;

use cellflow_core::{Position, Size};

use crate::cell::Cell;

/// Sparse row-based storage for sheet cells
///
/// Structure: `BTreeMap<row_index, BTreeMap<col_index, Cell>>`
#[derive(Debug, Default)]
pub(crate) struct CellStorage {
    rows: BTreeMap<u32, BTreeMap<u32, Cell>>,
}

impl CellStorage {
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.rows.get(&pos.row).and_then(|r| r.get(&pos.col))
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.rows.get_mut(&pos.row).and_then(|r| r.get_mut(&pos.col))
    }

    /// Get the cell at `pos`, materializing an empty one if the slot is vacant
    pub fn get_or_insert(&mut self, pos: Position) -> &mut Cell {
        self.rows
            .entry(pos.row)
            .or_default()
            .entry(pos.col)
            .or_default()
    }

    /// Remove a cell, dropping the row map once it is empty
    pub fn remove(&mut self, pos: Position) -> Option<Cell> {
        let row_map = self.rows.get_mut(&pos.row)?;
        let removed = row_map.remove(&pos.col);
        if row_map.is_empty() {
            self.rows.remove(&pos.row);
        }
        removed
    }

    /// Number of materialized cells, placeholders included
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Iterate over all cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.rows.iter().flat_map(|(&row, cols)| {
            cols.iter()
                .map(move |(&col, cell)| (Position::new(row, col), cell))
        })
    }

    /// Smallest 1-based bounding box holding every cell with content
    ///
    /// Empty placeholders do not count.
    pub fn content_bounds(&self) -> Size {
        self.iter()
            .filter(|(_, cell)| !cell.is_empty())
            .fold(Size::default(), |size, (pos, _)| {
                Size::new(size.rows.max(pos.row + 1), size.cols.max(pos.col + 1))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellContent;
    use pretty_assertions::assert_eq;

    fn text_cell(text: &str) -> Cell {
        let mut cell = Cell::default();
        cell.content = CellContent::Text(text.to_string());
        cell
    }

    #[test]
    fn test_basic_operations() {
        let mut storage = CellStorage::default();
        let pos = Position::new(3, 7);
        assert!(storage.get(pos).is_none());

        *storage.get_or_insert(pos) = text_cell("x");
        assert_eq!(storage.get(pos).map(Cell::text), Some("x".to_string()));
        assert_eq!(storage.cell_count(), 1);

        assert!(storage.remove(pos).is_some());
        assert!(storage.remove(pos).is_none());
        assert_eq!(storage.cell_count(), 0);
    }

    #[test]
    fn test_get_or_insert_materializes_empty_cell() {
        let mut storage = CellStorage::default();
        let cell = storage.get_or_insert(Position::new(0, 0));
        assert!(cell.is_empty());
        assert_eq!(storage.cell_count(), 1);
    }

    #[test]
    fn test_content_bounds() {
        let mut storage = CellStorage::default();
        assert_eq!(storage.content_bounds(), Size::new(0, 0));

        *storage.get_or_insert(Position::new(2, 2)) = text_cell("c3");
        assert_eq!(storage.content_bounds(), Size::new(3, 3));

        // Placeholders do not widen the box
        storage.get_or_insert(Position::new(10, 10));
        assert_eq!(storage.content_bounds(), Size::new(3, 3));

        *storage.get_or_insert(Position::new(0, 5)) = text_cell("f1");
        assert_eq!(storage.content_bounds(), Size::new(3, 6));
    }

    #[test]
    fn test_iteration_is_row_major() {
        let mut storage = CellStorage::default();
        for pos in [Position::new(1, 0), Position::new(0, 2), Position::new(0, 1)] {
            storage.get_or_insert(pos);
        }
        let order: Vec<_> = storage.iter().map(|(pos, _)| pos).collect();
        assert_eq!(
            order,
            vec![Position::new(0, 1), Position::new(0, 2), Position::new(1, 0)]
        );
    }
}
