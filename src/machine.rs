//! Machine configuration: the immutable snapshot a game session spins against.
//!
//! A [`Machine`] aggregates everything a single payout computation needs:
//! the grid dimensions, the symbol pool, the payline set scoped to those
//! dimensions, and the paytable. It is read-only once built, so independent
//! spins can share one machine freely; a configuration update means loading
//! a fresh snapshot, never mutating a live one.
//!
//! Machines are either assembled in code ([`Machine::new`]) or loaded from
//! a game file pack: a `machine.json` definition next to `symbols.csv`,
//! `paylines.csv` and `paytable.csv`, conventionally one directory per game
//! under [`GAMES_FOLDER`](crate::GAMES_FOLDER).

use std::fmt::{self, Display};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{debug, info};
use rand::Rng;
use serde::Deserialize;

use crate::error::EngineError;
use crate::payline::Payline;
use crate::paytable::{Paytable, PaytableEntry};
use crate::payout::{self, Win};
use crate::symbols::{Grid, Symbol, SymbolPool};
use crate::utils::format_bitmap;

/// Helper structure referencing the files needed to load a game's data.
pub struct MachineFiles {
    machine_file: String,
    symbols_file: String,
    paylines_file: String,
    paytable_file: String,
}

impl TryFrom<Vec<String>> for MachineFiles {
    type Error = EngineError;

    fn try_from(paths: Vec<String>) -> Result<MachineFiles, EngineError> {
        let mut files = MachineFiles {
            machine_file: String::new(),
            symbols_file: String::new(),
            paylines_file: String::new(),
            paytable_file: String::new(),
        };

        for path in paths {
            let name = Path::new(&path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string();

            if name.contains("machine") {
                files.machine_file = path;
            } else if name.contains("symbols") {
                files.symbols_file = path;
            } else if name.contains("paylines") {
                files.paylines_file = path;
            } else if name.contains("paytable") {
                files.paytable_file = path;
            }
        }

        for (file, name) in [
            (&files.machine_file, "machine"),
            (&files.symbols_file, "symbols"),
            (&files.paylines_file, "paylines"),
            (&files.paytable_file, "paytable"),
        ] {
            if file.is_empty() {
                return Err(EngineError::MissingGameFile { name });
            }
        }

        Ok(files)
    }
}

impl MachineFiles {
    /// Collects the game files from a directory listing.
    pub fn discover(game_dir: impl AsRef<Path>) -> Result<MachineFiles> {
        let game_dir = game_dir.as_ref();
        let paths = fs::read_dir(game_dir)
            .with_context(|| format!("Could not list game folder {}", game_dir.display()))?
            .map(|entry| -> Result<String> { Ok(entry?.path().display().to_string()) })
            .collect::<Result<Vec<String>>>()?;

        Ok(MachineFiles::try_from(paths)?)
    }
}

/// On-disk machine definition (`machine.json`).
#[derive(Debug, Deserialize)]
struct MachineDef {
    name: String,
    rows: usize,
    columns: usize,
}

/// A configured slot machine.
///
/// Holds the machine's dimensions together with read-only snapshots of its
/// symbol pool, paylines and paytable, and exposes the two operations a
/// game session needs: [`random_grid`](Machine::random_grid) and
/// [`calculate_payout`](Machine::calculate_payout).
#[derive(Debug, Clone)]
pub struct Machine {
    name: String,
    rows: usize,
    columns: usize,
    symbols: SymbolPool,
    paylines: Vec<Payline>,
    paytable: Paytable,
}

impl Machine {
    /// Assembles a machine from its parts.
    ///
    /// Dimensions must be positive and every payline must be scoped to
    /// exactly `(rows, columns)`; anything else is a configuration error.
    pub fn new(
        name: impl Into<String>,
        rows: usize,
        columns: usize,
        symbols: SymbolPool,
        paylines: Vec<Payline>,
        paytable: Paytable,
    ) -> Result<Machine, EngineError> {
        if rows == 0 || columns == 0 {
            return Err(EngineError::InvalidDimensions { rows, columns });
        }
        for line in &paylines {
            if line.rows() != rows || line.columns() != columns {
                return Err(EngineError::LineScopeMismatch {
                    line_rows: line.rows(),
                    line_columns: line.columns(),
                    grid_rows: rows,
                    grid_columns: columns,
                });
            }
        }

        Ok(Machine {
            name: name.into(),
            rows,
            columns,
            symbols,
            paylines,
            paytable,
        })
    }

    /// Machine name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grid rows produced by this machine.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grid columns produced by this machine.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The machine's symbol pool.
    pub fn symbols(&self) -> &SymbolPool {
        &self.symbols
    }

    /// The paylines evaluated on every spin.
    pub fn paylines(&self) -> &[Payline] {
        &self.paylines
    }

    /// The machine's paytable.
    pub fn paytable(&self) -> &Paytable {
        &self.paytable
    }

    /// Draws a fresh random grid of `rows × columns` symbols.
    ///
    /// Every cell is sampled independently and uniformly from the symbol
    /// pool, with replacement; duplicates within a row or across rows are
    /// expected. The generator is caller-supplied so a seeded [`rand::rngs::StdRng`]
    /// reproduces any grid exactly. An empty pool fails before any sampling.
    pub fn random_grid<R: Rng>(&self, rng: &mut R) -> Result<Grid, EngineError> {
        if self.symbols.is_empty() {
            return Err(EngineError::EmptySymbolPool);
        }

        let mut grid_rows = Vec::with_capacity(self.rows);
        for _ in 0..self.rows {
            let mut row = Vec::with_capacity(self.columns);
            for _ in 0..self.columns {
                row.push(self.symbols.sample(rng)?.clone());
            }
            grid_rows.push(row);
        }

        Grid::from_rows(grid_rows)
    }

    /// Resolves every payline win on the grid.
    ///
    /// The grid must have this machine's shape and only hold pool symbols,
    /// and the machine must have at least one payline configured.
    pub fn resolve_wins(&self, grid: &Grid) -> Result<Vec<Win>, EngineError> {
        self.validate_grid(grid)?;
        if self.paylines.is_empty() {
            return Err(EngineError::NoPaylines);
        }
        payout::resolve_wins(grid, &self.paylines, &self.paytable)
    }

    /// Total payout for the grid at the given bet.
    ///
    /// Validates the grid like [`resolve_wins`](Machine::resolve_wins), then
    /// applies the `bet / BET_UNIT` multiplier to every resolved win. A valid
    /// grid with no wins pays exactly zero.
    pub fn calculate_payout(&self, grid: &Grid, bet: u64) -> Result<u64, EngineError> {
        self.validate_grid(grid)?;
        if self.paylines.is_empty() {
            return Err(EngineError::NoPaylines);
        }
        payout::calculate_payout(grid, &self.paylines, &self.paytable, bet)
    }

    fn validate_grid(&self, grid: &Grid) -> Result<(), EngineError> {
        if grid.rows() != self.rows || grid.columns() != self.columns {
            return Err(EngineError::GridShapeMismatch {
                expected_rows: self.rows,
                expected_columns: self.columns,
                rows: grid.rows(),
                columns: grid.columns(),
            });
        }
        for row in grid.iter_rows() {
            for symbol in row {
                if !self.symbols.contains(symbol.id) {
                    return Err(EngineError::UnknownSymbol { id: symbol.id });
                }
            }
        }
        Ok(())
    }

    /// Loads a machine from the required game files.
    pub fn parse_from_files(files: MachineFiles) -> Result<Machine> {
        let def = Self::parse_def(&files.machine_file)?;
        let symbols = Self::parse_symbols(&files.symbols_file)?;
        let paylines = Self::parse_paylines(&files.paylines_file, def.rows, def.columns)?;
        let paytable = Self::parse_paytable(&files.paytable_file, &symbols)?;

        let machine = Machine::new(def.name, def.rows, def.columns, symbols, paylines, paytable)?;
        info!(
            "loaded machine \"{}\": {}x{}, {} symbols, {} paylines, {} paytable entries",
            machine.name,
            machine.rows,
            machine.columns,
            machine.symbols.len(),
            machine.paylines.len(),
            machine.paytable.len()
        );
        Ok(machine)
    }

    fn parse_def(file: &str) -> Result<MachineDef> {
        let raw = fs::read_to_string(file)
            .with_context(|| format!("Could not read machine definition {}", file))?;
        let def: MachineDef = serde_json::from_str(&raw)
            .with_context(|| format!("Could not parse machine definition {}", file))?;
        Ok(def)
    }

    fn parse_symbols(file: &str) -> Result<SymbolPool> {
        let mut rdr = csv::Reader::from_path(file)?;
        let mut symbols = Vec::new();

        for result in rdr.deserialize() {
            let (id, name): (u64, String) = result?;
            symbols.push(Symbol { id, name });
        }

        Ok(SymbolPool::new(symbols)?)
    }

    /// Reads the payline file, keeping only lines scoped to `(rows, columns)`.
    ///
    /// The file may describe lines for several machine shapes; lines of a
    /// different scope are skipped, a malformed bitmap on a kept line is an
    /// error.
    fn parse_paylines(file: &str, rows: usize, columns: usize) -> Result<Vec<Payline>> {
        let mut rdr = csv::Reader::from_path(file)?;
        let mut paylines = Vec::new();

        for result in rdr.deserialize() {
            let (name, line_rows, line_columns, mask): (String, usize, usize, String) = result?;
            if line_rows != rows || line_columns != columns {
                debug!(
                    "skipping payline \"{}\" scoped to {}x{}",
                    name, line_rows, line_columns
                );
                continue;
            }
            paylines.push(Payline::from_mask(name, line_rows, line_columns, &mask)?);
        }

        Ok(paylines)
    }

    fn parse_paytable(file: &str, symbols: &SymbolPool) -> Result<Paytable> {
        let mut rdr = csv::Reader::from_path(file)?;
        let mut entries = Vec::new();

        for result in rdr.deserialize() {
            let (symbol, occurrences, pay): (u64, u32, u64) = result?;
            if !symbols.contains(symbol) {
                return Err(EngineError::UnknownSymbolReference { id: symbol }.into());
            }
            entries.push(PaytableEntry {
                symbol,
                occurrences,
                pay,
            });
        }

        Ok(Paytable::from_entries(entries)?)
    }
}

impl Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Machine \"{}\" ({}x{})", self.name, self.rows, self.columns)?;

        writeln!(f, "{:<6} {:<12}", "Id", "Symbol")?;
        writeln!(f, "{:-<6} {:-<12}", "", "")?;
        for symbol in self.symbols.iter() {
            writeln!(f, "{:<6} {:<12}", symbol.id, symbol.name)?;
        }

        writeln!(f, "{:=<40}", "")?;

        writeln!(f, "{:<14} {:<24}", "Payline", "Bitmap")?;
        writeln!(f, "{:-<14} {:-<24}", "", "")?;
        for line in &self.paylines {
            writeln!(
                f,
                "{:<14} {:<24}",
                line.name(),
                format_bitmap(line.bitmap(), line.columns())
            )?;
        }

        writeln!(f, "{:=<40}", "")?;

        writeln!(f, "{:<12} {:<12} {:<6}", "Symbol", "Occurrences", "Pays")?;
        writeln!(f, "{:-<12} {:-<12} {:-<6}", "", "", "")?;
        let sorted = self
            .paytable
            .entries()
            .sorted_by_key(|entry| (entry.symbol, entry.occurrences));
        for entry in sorted {
            let name = self
                .symbols
                .find(entry.symbol)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| entry.symbol.to_string());
            writeln!(f, "{:<12} {:<12} {:<6}", name, entry.occurrences, entry.pay)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn symbol(id: u64, name: &str) -> Symbol {
        Symbol {
            id,
            name: name.to_string(),
        }
    }

    fn pool() -> SymbolPool {
        SymbolPool::new(vec![
            symbol(1, "Cherry"),
            symbol(2, "Lemon"),
            symbol(3, "Seven"),
        ])
        .unwrap()
    }

    fn lines_3x3() -> Vec<Payline> {
        vec![
            Payline::from_mask("top", 3, 3, "111000000").unwrap(),
            Payline::from_mask("middle", 3, 3, "000111000").unwrap(),
        ]
    }

    fn paytable() -> Paytable {
        Paytable::from_entries([PaytableEntry {
            symbol: 1,
            occurrences: 3,
            pay: 40,
        }])
        .unwrap()
    }

    fn machine() -> Machine {
        Machine::new("test", 3, 3, pool(), lines_3x3(), paytable()).unwrap()
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let result = Machine::new("bad", 0, 3, pool(), vec![], paytable());
        assert_eq!(
            result.unwrap_err(),
            EngineError::InvalidDimensions { rows: 0, columns: 3 }
        );
    }

    #[test]
    fn paylines_of_foreign_scope_are_rejected() {
        let wide = Payline::from_mask("wide", 3, 5, "111110000000000").unwrap();
        let result = Machine::new("bad", 3, 3, pool(), vec![wide], paytable());
        assert!(matches!(
            result.unwrap_err(),
            EngineError::LineScopeMismatch { .. }
        ));
    }

    #[test]
    fn random_grid_matches_the_configured_shape() {
        let machine = machine();
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..20 {
            let grid = machine.random_grid(&mut rng).unwrap();
            assert_eq!(grid.rows(), 3);
            assert_eq!(grid.columns(), 3);
            for row in grid.iter_rows() {
                for cell in row {
                    assert!(machine.symbols().contains(cell.id));
                }
            }
        }
    }

    #[test]
    fn seeded_generators_reproduce_the_same_grid() {
        let machine = machine();
        let grid_a = machine.random_grid(&mut StdRng::seed_from_u64(7)).unwrap();
        let grid_b = machine.random_grid(&mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(grid_a, grid_b);
    }

    #[test]
    fn empty_pool_fails_grid_generation() {
        let empty = SymbolPool::new(vec![]).unwrap();
        let machine = Machine::new("empty", 3, 3, empty, lines_3x3(), paytable()).unwrap();
        let result = machine.random_grid(&mut StdRng::seed_from_u64(0));
        assert_eq!(result.unwrap_err(), EngineError::EmptySymbolPool);
    }

    #[test]
    fn foreign_grid_shape_is_a_validation_error() {
        let machine = machine();
        let grid = Grid::from_rows(vec![
            vec![symbol(1, "Cherry"), symbol(2, "Lemon")],
            vec![symbol(1, "Cherry"), symbol(2, "Lemon")],
        ])
        .unwrap();

        assert!(matches!(
            machine.calculate_payout(&grid, 100),
            Err(EngineError::GridShapeMismatch { .. })
        ));
    }

    #[test]
    fn grid_with_unknown_symbols_is_rejected() {
        let machine = machine();
        let grid = Grid::from_rows(vec![
            vec![symbol(1, "Cherry"), symbol(1, "Cherry"), symbol(9, "Alien")],
            vec![symbol(2, "Lemon"), symbol(2, "Lemon"), symbol(2, "Lemon")],
            vec![symbol(3, "Seven"), symbol(3, "Seven"), symbol(3, "Seven")],
        ])
        .unwrap();

        assert_eq!(
            machine.calculate_payout(&grid, 100).unwrap_err(),
            EngineError::UnknownSymbol { id: 9 }
        );
    }

    #[test]
    fn machine_without_paylines_cannot_evaluate() {
        let machine = Machine::new("bare", 3, 3, pool(), vec![], paytable()).unwrap();
        let grid = machine.random_grid(&mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(
            machine.resolve_wins(&grid).unwrap_err(),
            EngineError::NoPaylines
        );
    }

    #[test]
    fn winning_spin_pays_through_the_machine_api() {
        let machine = machine();
        let grid = Grid::from_rows(vec![
            vec![symbol(1, "Cherry"), symbol(1, "Cherry"), symbol(1, "Cherry")],
            vec![symbol(2, "Lemon"), symbol(3, "Seven"), symbol(2, "Lemon")],
            vec![symbol(3, "Seven"), symbol(2, "Lemon"), symbol(3, "Seven")],
        ])
        .unwrap();

        let wins = machine.resolve_wins(&grid).unwrap();
        assert_eq!(wins.len(), 1);
        assert_eq!(wins[0].pay, 40);
        assert_eq!(machine.calculate_payout(&grid, 100).unwrap(), 80);
    }

    #[test]
    fn incomplete_file_set_is_detected() {
        let paths = vec![
            "data/games/classic/machine.json".to_string(),
            "data/games/classic/symbols.csv".to_string(),
            "data/games/classic/paytable.csv".to_string(),
        ];
        let result = MachineFiles::try_from(paths);
        assert!(matches!(
            result,
            Err(EngineError::MissingGameFile { name: "paylines" })
        ));
    }
}
