//! Errors raised by grid generation, payline evaluation and payout calculation.

use std::error::Error;
use std::fmt;

/// The single error type of the engine.
///
/// Invalid caller input (a malformed grid) and inconsistent machine
/// configuration (empty symbol pool, bad bitmap, missing game file) both
/// surface here; an absent paytable entry is never an error, it just pays
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Raised when a machine or payline is defined with zero rows or columns.
    InvalidDimensions {
        /// Configured row count.
        rows: usize,
        /// Configured column count.
        columns: usize,
    },
    /// Raised when a grid is requested from a machine whose symbol pool is empty.
    EmptySymbolPool,
    /// Raised when a symbol pool contains two symbols with the same id.
    DuplicateSymbol {
        /// The id appearing more than once.
        id: u64,
    },
    /// Raised when a payline mask's length differs from `rows × columns`.
    BitmapLengthMismatch {
        /// `rows × columns` of the payline's scope.
        expected: usize,
        /// Length of the given mask.
        actual: usize,
    },
    /// Raised when a payline mask contains a character other than `0` or `1`.
    BitmapInvalidChar {
        /// The offending character.
        found: char,
    },
    /// Raised when a payline is evaluated against a grid of a different
    /// `(rows, columns)` scope.
    LineScopeMismatch {
        /// Payline scope rows.
        line_rows: usize,
        /// Payline scope columns.
        line_columns: usize,
        /// Grid rows.
        grid_rows: usize,
        /// Grid columns.
        grid_columns: usize,
    },
    /// Raised when grid rows are empty or of unequal lengths.
    MalformedGrid,
    /// Raised when a grid's dimensions differ from the machine's configuration.
    GridShapeMismatch {
        /// Rows the machine is configured with.
        expected_rows: usize,
        /// Columns the machine is configured with.
        expected_columns: usize,
        /// Rows of the given grid.
        rows: usize,
        /// Columns of the given grid.
        columns: usize,
    },
    /// Raised when a grid cell holds a symbol id absent from the machine's pool.
    UnknownSymbol {
        /// The unrecognized symbol id.
        id: u64,
    },
    /// Raised when wins are resolved on a machine with no paylines configured.
    NoPaylines,
    /// Raised when a paytable defines two entries for the same
    /// (symbol, occurrences) pair.
    DuplicatePayEntry {
        /// Symbol id of the duplicated entry.
        symbol: u64,
        /// Occurrence count of the duplicated entry.
        occurrences: u32,
    },
    /// Raised when a paytable entry requires zero occurrences.
    ZeroOccurrenceEntry {
        /// Symbol id of the offending entry.
        symbol: u64,
    },
    /// Raised when a paytable references a symbol id absent from the pool.
    UnknownSymbolReference {
        /// The unresolved symbol id.
        id: u64,
    },
    /// Raised when a game file pack is missing one of its required files.
    MissingGameFile {
        /// Name fragment of the file that could not be found.
        name: &'static str,
    },
}

impl Error for EngineError {}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineError::InvalidDimensions { rows, columns } => {
                write!(f, "Invalid grid dimensions {}x{}", rows, columns)
            }
            EngineError::EmptySymbolPool => write!(f, "Symbol pool is empty"),
            EngineError::DuplicateSymbol { id } => {
                write!(f, "Symbol id {} defined more than once", id)
            }
            EngineError::BitmapLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "Payline bitmap has {} cells, expected {}",
                    actual, expected
                )
            }
            EngineError::BitmapInvalidChar { found } => {
                write!(f, "Payline bitmap contains invalid character '{}'", found)
            }
            EngineError::LineScopeMismatch {
                line_rows,
                line_columns,
                grid_rows,
                grid_columns,
            } => {
                write!(
                    f,
                    "Payline scoped to {}x{} evaluated against a {}x{} grid",
                    line_rows, line_columns, grid_rows, grid_columns
                )
            }
            EngineError::MalformedGrid => write!(f, "Grid is not a rectangular matrix"),
            EngineError::GridShapeMismatch {
                expected_rows,
                expected_columns,
                rows,
                columns,
            } => {
                write!(
                    f,
                    "Grid is {}x{}, machine expects {}x{}",
                    rows, columns, expected_rows, expected_columns
                )
            }
            EngineError::UnknownSymbol { id } => {
                write!(f, "Grid contains symbol id {} not in the pool", id)
            }
            EngineError::NoPaylines => write!(f, "Machine has no paylines configured"),
            EngineError::DuplicatePayEntry { symbol, occurrences } => {
                write!(
                    f,
                    "Duplicate paytable entry for symbol {} x{}",
                    symbol, occurrences
                )
            }
            EngineError::ZeroOccurrenceEntry { symbol } => {
                write!(f, "Paytable entry for symbol {} requires zero occurrences", symbol)
            }
            EngineError::UnknownSymbolReference { id } => {
                write!(f, "Paytable references unknown symbol id {}", id)
            }
            EngineError::MissingGameFile { name } => {
                write!(f, "Game file pack is missing a \"{}\" file", name)
            }
        }
    }
}
