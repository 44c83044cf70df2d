//! Plain-ANSI rendering of the depth ladder.

use std::io::{self, Write};

use orderbook::{DepthSnapshot, MarkPriceSnapshot, PriceDirection, PriceLevel};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const CLEAR_AND_HOME: &str = "\x1b[2J\x1b[H";

const ARROW_UP: char = '\u{2191}';
const ARROW_DOWN: char = '\u{2193}';

fn level_row(level: &PriceLevel, price_color: &str) -> String {
    format!(
        "  {}{:>12}{}  {}{:>10}{}\n",
        price_color,
        level.price.round_dp(2),
        RESET,
        CYAN,
        level.volume.round_dp(3),
        RESET
    )
}

/// Builds one display frame: asks above the mark price line (best ask
/// nearest to it), bids below, best first. Sides shorter than the
/// requested depth simply render fewer rows.
pub fn render_frame(symbol: &str, depth: &DepthSnapshot, mark: &MarkPriceSnapshot) -> String {
    let mut out = String::new();

    out.push_str(&format!(" {} | Binance futures depth\n", symbol));
    out.push_str(&format!(
        " {}{:>13}  {:>10}{}\n",
        DIM, "price", "volume", RESET
    ));
    out.push_str(&format!(" {}{}{}\n", DIM, "-".repeat(27), RESET));

    // Asks arrive best-first; print worst-first so the best ask sits
    // right above the mark price line.
    for ask in depth.asks.iter().rev() {
        out.push_str(&level_row(ask, RED));
    }

    out.push_str(&mark_row(mark));

    for bid in depth.bids.iter() {
        out.push_str(&level_row(bid, GREEN));
    }

    out
}

fn mark_row(mark: &MarkPriceSnapshot) -> String {
    let Some(current) = mark.current else {
        return format!(" {}mark            --{}\n", DIM, RESET);
    };

    let (arrow, color) = match mark.direction() {
        PriceDirection::Up => (ARROW_UP, GREEN),
        PriceDirection::Down => (ARROW_DOWN, RED),
        PriceDirection::Flat => (' ', DIM),
    };

    let mut row = format!(
        " mark {}{:>9} {}{}",
        color,
        current.round_dp(2),
        arrow,
        RESET
    );
    if let Some(rate) = mark.funding_rate {
        row.push_str(&format!("  {}funding {}{}", DIM, rate, RESET));
    }
    row.push('\n');
    row
}

/// Repaints the terminal with the given frame.
pub fn paint(frame: &str) {
    let mut stdout = io::stdout().lock();
    let _ = write!(stdout, "{}{}", CLEAR_AND_HOME, frame);
    let _ = stdout.flush();
}
