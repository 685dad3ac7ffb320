//! Display formatting for amounts and stat cards.

use serde::{Deserialize, Serialize};

use crate::ledger::UserStats;

/// Group separator used between thousands.
pub const GROUP_SEPARATOR: char = ' ';

/// `93500` -> `"93 500 FCFA"`.
pub fn format_amount(value: u64, currency: &str) -> String {
    format!("{} {}", group_thousands(value), currency)
}

/// Amount with a direction sign, as in the transaction history.
pub fn format_signed(value: u64, outgoing: bool, currency: &str) -> String {
    let sign = if outgoing { '-' } else { '+' };
    format!("{sign}{}", format_amount(value, currency))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Mask a secret, keeping the last four characters.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "•".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "•".repeat(count - 4), tail)
}

/// A labeled numeric point for chart collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Axis label.
    pub label: String,
    /// Value.
    pub amount: u64,
}

impl ChartPoint {
    /// Create a point.
    pub fn new(label: impl Into<String>, amount: u64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// One dashboard stat card.
#[derive(Clone, Debug, PartialEq)]
pub struct StatCard {
    /// Card title.
    pub label: &'static str,
    /// Formatted value.
    pub value: String,
    /// Optional trend badge, e.g. `"+12.5%"`.
    pub trend: Option<String>,
    /// Whether the trend is upward.
    pub trend_up: bool,
}

/// The four headline cards.
pub fn stat_cards(stats: &UserStats, currency: &str) -> Vec<StatCard> {
    let trend = stats.earnings_trend();
    vec![
        StatCard {
            label: "Total Balance",
            value: format_amount(stats.balance, currency),
            trend: None,
            trend_up: false,
        },
        StatCard {
            label: "Today's Earnings",
            value: format_amount(stats.earnings_today, currency),
            trend: trend.map(|t| format!("{t:+.1}%")),
            trend_up: trend.is_some_and(|t| t >= 0.0),
        },
        StatCard {
            label: "Available Balance",
            value: format_amount(stats.available_balance, currency),
            trend: None,
            trend_up: false,
        },
        StatCard {
            label: "Total Withdrawn",
            value: format_amount(stats.total_withdrawn, currency),
            trend: None,
            trend_up: false,
        },
    ]
}
