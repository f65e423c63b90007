//! Execute simulations for ensuring that the payout engine is accurate.
//!
//! The objective is to make sure that the observed win frequency per payline
//! and the resulting return to player are as close as possible (within some
//! error boundary) to the theoretical values.
//!
//! It is however currently hard-coded to work only for the bundled `classic`
//! game: with 5 equally likely symbols and 3-cell lines, a line pays with
//! probability 29/125 and the expected payout per one-unit bet is 42.4/50.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use itertools::Itertools;
use log::info;

use slot_engine::machine::{Machine, MachineFiles};
use slot_engine::BET_UNIT;

const GAME: &str = "classic";
const N_SIMULATIONS: u64 = 1_000_000;
/// One bet unit, so every resolved pay rate counts once.
const BET: u64 = BET_UNIT;

const EXPECTED_LINE_WIN_RATIO: f64 = 0.232; // 29 / 125
const EXPECTED_PAYOUT_RATIO: f64 = 0.848; // (5 lines x 1060 / 125) / 50

/// Runs the spin loop and prints observed-vs-expected tables.
///
/// For each spin it draws a random grid, resolves the wins and accumulates
/// the payout, the number of winning lines and the per-combo draw counts.
fn run_simulation(machine: &Machine, n_simulations: u64) -> Result<()> {
    let mut rng = rand::thread_rng();
    let n_lines = machine.paylines().len() as u64;
    let bet_multiplier = BET / BET_UNIT;

    let mut total_payout = 0u64;
    let mut total_line_wins = 0u64;
    let mut draws = HashMap::<String, u64>::new();

    println!("[*] Starting {} spin simulations", n_simulations);

    let now = Instant::now();
    for _ in 0..n_simulations {
        let grid = machine.random_grid(&mut rng)?;
        let wins = machine.resolve_wins(&grid)?;

        total_line_wins += wins.len() as u64;
        for win in &wins {
            total_payout += win.pay * bet_multiplier;
            *draws
                .entry(format!("{} x{}", win.symbol.name, win.occurrences))
                .or_insert(0) += 1;
        }
    }

    info!("simulated {} spins of \"{}\"", n_simulations, machine.name());
    println!(
        "[+] {} spin simulations finished ({:.2?})",
        n_simulations,
        now.elapsed()
    );

    let observed_line_win_ratio = total_line_wins as f64 / (n_simulations * n_lines) as f64;
    let observed_payout_ratio = total_payout as f64 / (n_simulations * BET) as f64;

    println!(
        "{:<9} {:<12} {:<12} {:<12}",
        "Ratio", "Observed", "Expected", "Difference"
    );
    println!("{:-<9} {:-<12} {:-<12} {:-<12}", "", "", "", "");
    println!(
        "{:<9} {:<12.6} {:<12.6} {:<+12.6}",
        "Line win",
        observed_line_win_ratio,
        EXPECTED_LINE_WIN_RATIO,
        observed_line_win_ratio - EXPECTED_LINE_WIN_RATIO
    );
    println!(
        "{:<9} {:<12.6} {:<12.6} {:<+12.6}",
        "Payout",
        observed_payout_ratio,
        EXPECTED_PAYOUT_RATIO,
        observed_payout_ratio - EXPECTED_PAYOUT_RATIO
    );

    println!();

    // Per-line draw probabilities of the classic game: 1/125 for any
    // three-of-a-kind, 12/125 for exactly two Cherries or two Sevens.
    let expected_prob: Vec<(String, f64)> = vec![
        ("Cherry x2".to_string(), 0.096),
        ("Seven x2".to_string(), 0.096),
        ("Cherry x3".to_string(), 0.008),
        ("Lemon x3".to_string(), 0.008),
        ("Orange x3".to_string(), 0.008),
        ("Bell x3".to_string(), 0.008),
        ("Seven x3".to_string(), 0.008),
    ];

    println!(
        "{:<12} {:<12} {:<12} {:<12}",
        "Combo", "Observed", "Expected", "Difference"
    );
    println!("{:-<12} {:-<12} {:-<12} {:-<12}", "", "", "", "");

    for (combo, expected) in &expected_prob {
        let observed =
            *draws.get(combo).unwrap_or(&0) as f64 / (n_simulations * n_lines) as f64;
        println!(
            "{:<12} {:<12.6} {:<12.6} {:<+12.6}",
            combo,
            observed,
            expected,
            observed - expected
        );
    }

    let unexpected: Vec<&String> = draws
        .keys()
        .filter(|combo| expected_prob.iter().all(|(known, _)| known != *combo))
        .sorted()
        .collect();
    if !unexpected.is_empty() {
        println!();
        println!("[!] Unexpected paying combos drawn: {}", unexpected.iter().join(", "));
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let game_dir = Path::new(slot_engine::GAMES_FOLDER).join(GAME);
    println!("[x] Loading game files from {:?}...", game_dir);

    let machine = Machine::parse_from_files(MachineFiles::discover(&game_dir)?)?;
    println!("{}", machine);

    run_simulation(&machine, N_SIMULATIONS)
}
