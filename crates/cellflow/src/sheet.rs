//! Sheet type

use std::io::{self, Write};

use cellflow_core::{Error, Position, Result, Size, Value};
use cellflow_formula::CellLookup;

use crate::cell::{Cell, CellContent};
use crate::storage::CellStorage;

/// A grid of cells that keeps formula results consistent with their inputs
///
/// Every write runs to completion before returning: the new content is
/// validated (parse, cycle check) against the live graph first and only then
/// committed, so a failed write leaves the sheet untouched. Formula results
/// are computed lazily on read and cached until an upstream cell changes.
#[derive(Debug, Default)]
pub struct Sheet {
    pub(crate) cells: CellStorage,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    // === Mutation ===

    /// Set the text of the cell at `pos`
    ///
    /// Empty text makes an empty cell, `=` followed by an expression makes a
    /// formula, anything else is literal text.
    ///
    /// # Errors
    /// - [`Error::InvalidPosition`] if `pos` is outside the sheet
    /// - [`Error::FormulaParse`] if the formula is malformed
    /// - [`Error::CircularDependency`] if the formula would read itself,
    ///   directly or through other cells
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        let pos = pos.validate()?;

        if self
            .cells
            .get(pos)
            .map_or(false, |cell| cell.written && cell.text() == text)
        {
            return Ok(());
        }

        let content = CellContent::from_text(text)?;
        let references = content.referenced_cells().to_vec();
        if self.would_create_cycle(pos, &references) {
            tracing::debug!(%pos, text, "rejected circular formula");
            return Err(Error::CircularDependency(pos.to_string()));
        }

        // Validated: commit
        self.detach_references(pos);
        self.invalidate_dependents(pos);
        let cell = self.cells.get_or_insert(pos);
        cell.content = content;
        cell.written = true;
        self.attach_references(pos, &references);

        tracing::debug!(%pos, references = references.len(), "cell set");
        Ok(())
    }

    /// Remove the cell at `pos`
    ///
    /// Afterwards [`Sheet::cell`] reports no cell at `pos` and cells that
    /// read `pos` see it as empty. While any such reader exists a hidden
    /// placeholder keeps the slot, so a later write to `pos` still reaches
    /// them.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        let pos = pos.validate()?;

        let Some(cell) = self.cells.get(pos) else {
            return Ok(());
        };
        if !cell.written {
            return Ok(());
        }
        let still_referenced = !cell.dependents.is_empty();

        self.detach_references(pos);
        self.invalidate_dependents(pos);
        if still_referenced {
            let cell = self.cells.get_or_insert(pos);
            cell.content = CellContent::Empty;
            cell.written = false;
        } else {
            self.cells.remove(pos);
        }

        tracing::debug!(%pos, still_referenced, "cell cleared");
        Ok(())
    }

    // === Cell Access ===

    /// Get the cell at `pos`, if one was set there and not cleared since
    ///
    /// Placeholders that exist only because formulas read `pos` are not
    /// reported.
    pub fn cell(&self, pos: Position) -> Result<Option<CellHandle<'_>>> {
        let pos = pos.validate()?;
        Ok(self.cell_at(pos).filter(|handle| handle.cell.written))
    }

    /// Cells the formula at `pos` reads, row-major
    pub fn referenced_cells(&self, pos: Position) -> Result<Vec<Position>> {
        let pos = pos.validate()?;
        Ok(self
            .cells
            .get(pos)
            .map(|cell| cell.references.iter().copied().collect())
            .unwrap_or_default())
    }

    /// Cells whose formulas read `pos`, row-major
    ///
    /// Unlike [`Sheet::cell`] this also answers for positions that are only
    /// read, never set.
    pub fn dependent_cells(&self, pos: Position) -> Result<Vec<Position>> {
        let pos = pos.validate()?;
        Ok(self
            .cells
            .get(pos)
            .map(|cell| cell.dependents.iter().copied().collect())
            .unwrap_or_default())
    }

    /// Get the value at `pos`; positions without a cell read as empty text
    pub fn value(&self, pos: Position) -> Result<Value> {
        let pos = pos.validate()?;
        Ok(self.value_at(pos))
    }

    fn cell_at(&self, pos: Position) -> Option<CellHandle<'_>> {
        self.cells.get(pos).map(|cell| CellHandle {
            sheet: self,
            pos,
            cell,
        })
    }

    /// Number of materialized cells, empty placeholders included
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    // === Printing ===

    /// Smallest area, anchored at A1, that holds every non-empty cell
    pub fn printable_size(&self) -> Size {
        self.cells.content_bounds()
    }

    /// Write the values of the printable area, tab-separated, one line per row
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_with(out, |cell| cell.value().to_string())
    }

    /// Write the texts of the printable area, tab-separated, one line per row
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_with(out, |cell| cell.text())
    }

    pub fn values_to_string(&self) -> String {
        render_to_string(|out| self.print_values(out))
    }

    pub fn texts_to_string(&self) -> String {
        render_to_string(|out| self.print_texts(out))
    }

    fn print_with<W, F>(&self, out: &mut W, render: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&CellHandle<'_>) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.write_all(b"\t")?;
                }
                if let Some(cell) = self.cell_at(Position::new(row, col)) {
                    out.write_all(render(&cell).as_bytes())?;
                }
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}

fn render_to_string<F>(print: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let mut out = Vec::new();
    // Writing into a Vec cannot fail
    let _ = print(&mut out);
    String::from_utf8_lossy(&out).into_owned()
}

impl CellLookup for Sheet {
    fn value_at(&self, pos: Position) -> Value {
        self.evaluate_precedents(pos);
        self.cells
            .get(pos)
            .map(|cell| cell.value(self))
            .unwrap_or_default()
    }
}

/// Read access to one cell of a [`Sheet`]
#[derive(Debug, Clone, Copy)]
pub struct CellHandle<'a> {
    sheet: &'a Sheet,
    pos: Position,
    cell: &'a Cell,
}

impl<'a> CellHandle<'a> {
    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn content(&self) -> &'a CellContent {
        self.cell.content()
    }

    /// Text as entered; formulas are re-rendered canonically
    pub fn text(&self) -> String {
        self.cell.text()
    }

    /// Current value, evaluating the formula (and what it reads) if needed
    pub fn value(&self) -> Value {
        self.sheet.value_at(self.pos)
    }

    /// Cells this cell's formula reads, row-major
    pub fn referenced_cells(&self) -> Vec<Position> {
        self.cell.references.iter().copied().collect()
    }

    /// Cells whose formulas read this cell, row-major
    pub fn dependent_cells(&self) -> Vec<Position> {
        self.cell.dependents.iter().copied().collect()
    }

    /// Whether any formula reads this cell
    pub fn is_referenced(&self) -> bool {
        !self.cell.dependents.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.is_empty()
    }

    /// Whether a formula result is currently cached
    pub fn has_cache(&self) -> bool {
        self.cell.has_cache()
    }
}
