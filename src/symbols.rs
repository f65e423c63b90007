//! Symbols, the pool they are drawn from, and the spin grid.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A single reel symbol.
///
/// Identity is carried by [`id`](Symbol::id): two grid cells hold the same
/// symbol if and only if their ids match, whatever their display names.
/// Equality, hashing and ordering all follow the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    /// Stable identifier of the symbol.
    pub id: u64,
    /// Display name shown in tables and reports.
    pub name: String,
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// The full set of symbols eligible to appear on a machine's grid.
#[derive(Debug, Clone, Default)]
pub struct SymbolPool {
    symbols: Vec<Symbol>,
}

impl SymbolPool {
    /// Builds a pool, rejecting duplicate symbol ids.
    pub fn new(symbols: Vec<Symbol>) -> Result<SymbolPool, EngineError> {
        for (i, symbol) in symbols.iter().enumerate() {
            if symbols[..i].iter().any(|s| s.id == symbol.id) {
                return Err(EngineError::DuplicateSymbol { id: symbol.id });
            }
        }
        Ok(SymbolPool { symbols })
    }

    /// Number of symbols in the pool.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the pool holds no symbols at all.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Looks a symbol up by id.
    pub fn find(&self, id: u64) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    /// Whether the pool holds a symbol with the given id.
    pub fn contains(&self, id: u64) -> bool {
        self.find(id).is_some()
    }

    /// Iterates the pool in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Picks one symbol uniformly at random, with replacement across calls.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Result<&Symbol, EngineError> {
        if self.symbols.is_empty() {
            return Err(EngineError::EmptySymbolPool);
        }
        Ok(&self.symbols[rng.gen_range(0..self.symbols.len())])
    }
}

/// A spin result: `rows` ordered rows of `columns` symbols each, row-major.
///
/// Grids are created fresh per spin and owned by the caller of a single
/// payout computation; the engine never stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: Vec<Vec<Symbol>>,
}

impl Grid {
    /// Builds a grid from explicit rows.
    ///
    /// Empty input and ragged rows are rejected, so every constructed grid
    /// is a well-formed rectangular matrix.
    pub fn from_rows(rows: Vec<Vec<Symbol>>) -> Result<Grid, EngineError> {
        let columns = match rows.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(EngineError::MalformedGrid),
        };
        if rows.iter().any(|row| row.len() != columns) {
            return Err(EngineError::MalformedGrid);
        }
        Ok(Grid { rows })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.rows[0].len()
    }

    /// Symbol at `(row, column)`, or `None` outside the grid.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Symbol> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Iterates the rows top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Symbol]> {
        self.rows.iter().map(|row| row.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn symbol(id: u64) -> Symbol {
        Symbol {
            id,
            name: format!("S{}", id),
        }
    }

    #[test]
    fn symbol_identity_is_the_id() {
        let a = Symbol {
            id: 3,
            name: "Bell".to_string(),
        };
        let b = Symbol {
            id: 3,
            name: "Cloche".to_string(),
        };
        assert_eq!(a, b);
    }

    #[test]
    fn pool_rejects_duplicate_ids() {
        let result = SymbolPool::new(vec![symbol(1), symbol(2), symbol(1)]);
        assert_eq!(result.unwrap_err(), EngineError::DuplicateSymbol { id: 1 });
    }

    #[test]
    fn empty_pool_cannot_be_sampled() {
        let pool = SymbolPool::new(vec![]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(pool.sample(&mut rng).unwrap_err(), EngineError::EmptySymbolPool);
    }

    #[test]
    fn sampling_only_returns_pool_members() {
        let pool = SymbolPool::new(vec![symbol(1), symbol(2), symbol(3)]).unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let drawn = pool.sample(&mut rng).unwrap();
            assert!(pool.contains(drawn.id));
        }
    }

    #[test]
    fn grid_rejects_ragged_rows() {
        let rows = vec![vec![symbol(1), symbol(2)], vec![symbol(1)]];
        assert_eq!(Grid::from_rows(rows).unwrap_err(), EngineError::MalformedGrid);
    }

    #[test]
    fn grid_rejects_empty_input() {
        assert_eq!(Grid::from_rows(vec![]).unwrap_err(), EngineError::MalformedGrid);
        assert_eq!(
            Grid::from_rows(vec![vec![]]).unwrap_err(),
            EngineError::MalformedGrid
        );
    }

    #[test]
    fn grid_exposes_cells_row_major() {
        let grid = Grid::from_rows(vec![
            vec![symbol(1), symbol(2)],
            vec![symbol(3), symbol(4)],
        ])
        .unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 2);
        assert_eq!(grid.cell(1, 0).unwrap().id, 3);
        assert!(grid.cell(2, 0).is_none());
    }
}
