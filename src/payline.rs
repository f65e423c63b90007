//! Paylines and the extraction of the symbols lying on them.
//!
//! A payline marks a fixed set of grid cells with a flat boolean mask of
//! length `rows × columns`, stored row-major: bit `i` covers the cell at
//! `(i / columns, i - (i / columns) × columns)`. Paylines are scoped to a
//! `(rows, columns)` pair and only apply to grids of the same shape.

use serde::Serialize;

use crate::error::EngineError;
use crate::symbols::{Grid, Symbol};

/// A fixed set of grid cells checked for winning symbol runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payline {
    name: String,
    rows: usize,
    columns: usize,
    bitmap: Vec<bool>,
}

impl Payline {
    /// Builds a payline from a `'0'`/`'1'` mask string.
    ///
    /// The mask must hold exactly `rows × columns` characters; any other
    /// length or character is a configuration error, caught here rather
    /// than at evaluation time.
    pub fn from_mask(
        name: impl Into<String>,
        rows: usize,
        columns: usize,
        mask: &str,
    ) -> Result<Payline, EngineError> {
        if rows == 0 || columns == 0 {
            return Err(EngineError::InvalidDimensions { rows, columns });
        }
        let expected = rows * columns;
        let actual = mask.chars().count();
        if actual != expected {
            return Err(EngineError::BitmapLengthMismatch { expected, actual });
        }
        let bitmap = mask
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(EngineError::BitmapInvalidChar { found }),
            })
            .collect::<Result<Vec<bool>, EngineError>>()?;
        Ok(Payline {
            name: name.into(),
            rows,
            columns,
            bitmap,
        })
    }

    /// Configured name of the line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rows of the `(rows, columns)` pair this line is scoped to.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns of the `(rows, columns)` pair this line is scoped to.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The row-major cell mask.
    pub fn bitmap(&self) -> &[bool] {
        &self.bitmap
    }

    /// Returns the grid symbols covered by this line, in bitmap scan order.
    ///
    /// Fails fast with [`EngineError::LineScopeMismatch`] when the grid's
    /// shape differs from the line's scope. The returned order is row-major
    /// and only matters as the iteration order of the subsequent grouping;
    /// win resolution itself is order-independent.
    pub fn symbols_on<'g>(&self, grid: &'g Grid) -> Result<Vec<&'g Symbol>, EngineError> {
        if self.rows != grid.rows() || self.columns != grid.columns() {
            return Err(EngineError::LineScopeMismatch {
                line_rows: self.rows,
                line_columns: self.columns,
                grid_rows: grid.rows(),
                grid_columns: grid.columns(),
            });
        }

        let mut output = Vec::new();
        for (i, set) in self.bitmap.iter().enumerate() {
            if !set {
                continue;
            }
            let row = i / self.columns;
            let column = i - row * self.columns;
            output.push(grid.cell(row, column).ok_or(EngineError::MalformedGrid)?);
        }
        Ok(output)
    }
}
