//! Terminal rendering: banner, panels, spinners and the cycle summary.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use super::types::{AccountInfo, GameInfo};
use super::{CycleReport, RunTotals};

const XP_BAR_WIDTH: usize = 30;

pub fn print_banner() {
    println!("{}", "==============================".cyan());
    println!("{}", "        YesCoin AFK Bot       ".cyan().bold());
    println!("{}", "==============================".cyan());
    println!();
}

/// `[=====     ] current/max`, clamped to the bar width
pub fn progress_bar(current: u64, max: u64, width: usize) -> String {
    let filled = if max == 0 {
        width
    } else {
        ((current as f64 / max as f64) * width as f64).round() as usize
    }
    .min(width);

    format!(
        "[{}{}] {}/{}",
        "=".repeat(filled),
        " ".repeat(width - filled),
        current,
        max
    )
}

/// Spinner shown while a fetch is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn account_panel(info: &AccountInfo) {
    println!("{}", "\n======== Account Information ========".yellow());
    println!("{}", format!("Balance: {} YesCoins", info.balance).green());
    println!("{}", format!("Level: {}", info.level).green());
    println!(
        "{}",
        format!(
            "XP: {}",
            progress_bar(info.xp, info.next_level_xp, XP_BAR_WIDTH)
        )
        .green()
    );
}

pub fn game_panel(info: &GameInfo) {
    println!("{}", "\n======== Game Information ========".yellow());
    println!(
        "{}",
        format!("Coin Pool Left: {}", info.coin_pool_left_count).green()
    );
    println!(
        "{}",
        format!("Single Coin Value: {}", info.single_coin_value).green()
    );
}

pub fn level_up_panel(old_level: u64, new_level: u64) {
    println!("{}", "\n======== Level Up! ========".yellow());
    println!(
        "{}",
        format!("{} -> {}", old_level, new_level).magenta().bold()
    );
    println!("{}", "Congratulations! You've reached a new level!".green());
}

pub fn account_header(index: usize, total: usize) {
    println!(
        "{}",
        format!("\n---------- Account {}/{} ----------", index, total)
            .cyan()
            .bold()
    );
}

pub fn cycle_summary(report: &CycleReport, totals: &RunTotals) {
    println!("{}", "\n======== Cycle Summary ========".yellow());
    println!(
        "{}",
        format!(
            "Accounts processed: {} ({} skipped)",
            report.accounts_processed, report.accounts_skipped
        )
        .green()
    );
    println!(
        "{}",
        format!("Coins collected this cycle: {}", report.coins_collected).green()
    );
    println!(
        "{}",
        format!(
            "Coins collected since start: {} over {} cycles",
            totals.coins_collected, totals.cycles
        )
        .green()
    );
    if report.level_ups > 0 {
        println!(
            "{}",
            format!("Level ups this cycle: {}", report.level_ups).magenta()
        );
    }
    println!("{}", balance_line(report, totals).green());
}

/// Falls back to the last cycle that saw a balance
fn balance_line(report: &CycleReport, totals: &RunTotals) -> String {
    match (report.total_balance, totals.last_balance) {
        (Some(balance), _) => format!("Total balance: {} YesCoins", balance),
        (None, Some(balance)) => format!("Total balance: {} YesCoins (last known)", balance),
        (None, None) => "Total balance: unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(5, 10, 10), "[=====     ] 5/10");
        assert_eq!(progress_bar(0, 10, 4), "[    ] 0/10");
    }

    #[test]
    fn progress_bar_clamps_overflow_and_zero_max() {
        assert_eq!(progress_bar(15, 10, 4), "[====] 15/10");
        assert_eq!(progress_bar(3, 0, 4), "[====] 3/0");
    }

    #[test]
    fn summary_keeps_last_known_balance() {
        let seen = CycleReport {
            total_balance: Some(250.0),
            ..CycleReport::default()
        };
        let blind = CycleReport::default();
        let totals = RunTotals::default().record(&seen).record(&blind);

        assert_eq!(balance_line(&seen, &totals), "Total balance: 250 YesCoins");
        assert_eq!(
            balance_line(&blind, &totals),
            "Total balance: 250 YesCoins (last known)"
        );
        assert_eq!(
            balance_line(&blind, &RunTotals::default()),
            "Total balance: unknown"
        );
    }
}
