#![warn(missing_docs)]
#![doc = include_str!("../docs/slot_engine.md")]

pub mod error;
pub mod machine;
pub mod payline;
pub mod paytable;
pub mod payout;
pub mod symbols;
pub mod utils;

/// Games folder path.
pub const GAMES_FOLDER: &str = "./data/games/";
/// Wager amount buying one unit of the bet multiplier.
///
/// The multiplier is `bet / BET_UNIT` with the remainder discarded, so any
/// bet below this value pays zero no matter how many lines match.
pub const BET_UNIT: u64 = 50;
