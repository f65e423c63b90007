//! Win resolution and payout calculation.
//!
//! Everything here is a pure function of its inputs: the same grid, lines,
//! paytable and bet always produce the same wins and payout. Only grid
//! generation consumes randomness, and it lives on the machine side.

use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::error::EngineError;
use crate::payline::Payline;
use crate::paytable::Paytable;
use crate::symbols::{Grid, Symbol};
use crate::BET_UNIT;

/// One matched (payline, symbol) combination with its resolved pay rate.
///
/// Wins are per line: a combination matched by two paylines on the same
/// grid yields two records, both counted in the payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Win {
    /// The matched symbol.
    pub symbol: Symbol,
    /// How many times the symbol occurred on the line.
    pub occurrences: u32,
    /// Pay rate looked up for the exact occurrence count.
    pub pay: u64,
}

/// Resolves every (payline, symbol) win on the grid.
///
/// Per line, the covered symbols are counted by identity in one aggregation
/// pass; each distinct symbol is then matched against the paytable for its
/// exact count. Symbols without a matching entry are dropped silently, which
/// is the expected case for most counts. Within a line, wins come out in
/// ascending symbol-id order, so the result is deterministic.
pub fn resolve_wins(
    grid: &Grid,
    lines: &[Payline],
    paytable: &Paytable,
) -> Result<Vec<Win>, EngineError> {
    let mut wins = Vec::new();

    for line in lines {
        let on_line = line.symbols_on(grid)?;
        let counts = on_line.iter().copied().counts();

        for (symbol, count) in counts.into_iter().sorted_by_key(|(symbol, _)| symbol.id) {
            let occurrences = count as u32;
            if let Some(pay) = paytable.pay(symbol.id, occurrences) {
                debug!(
                    "line {}: {} x{} pays {}",
                    line.name(),
                    symbol.name,
                    occurrences,
                    pay
                );
                wins.push(Win {
                    symbol: symbol.clone(),
                    occurrences,
                    pay,
                });
            }
        }
    }

    Ok(wins)
}

/// Total payout for the grid at the given bet.
///
/// The bet multiplier is `bet / BET_UNIT` with integer division; the
/// remainder of a bet not divisible by [`BET_UNIT`](crate::BET_UNIT) is
/// discarded, so bets below one unit always pay zero.
pub fn calculate_payout(
    grid: &Grid,
    lines: &[Payline],
    paytable: &Paytable,
    bet: u64,
) -> Result<u64, EngineError> {
    let bet_multiplier = bet / BET_UNIT;
    let payout = resolve_wins(grid, lines, paytable)?
        .iter()
        .map(|win| win.pay * bet_multiplier)
        .sum();
    Ok(payout)
}
