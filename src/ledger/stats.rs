//! Aggregate balances shown on the dashboard.

use serde::{Deserialize, Serialize};

/// The user's reward aggregates, in the currency of record.
///
/// `balance >= available_balance` is not enforced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Total balance.
    pub balance: u64,
    /// Earned since midnight.
    pub earnings_today: u64,
    /// Earned the previous day.
    pub earnings_yesterday: u64,
    /// Balance that can be withdrawn.
    pub available_balance: u64,
    /// Lifetime withdrawals.
    pub total_withdrawn: u64,
}

impl UserStats {
    /// Mock account used by the demo backend.
    pub fn demo() -> Self {
        Self {
            balance: 93_500,
            earnings_today: 5_500,
            earnings_yesterday: 8_200,
            available_balance: 85_000,
            total_withdrawn: 295_000,
        }
    }

    /// Stats after crediting `amount`, or `None` on overflow.
    pub(crate) fn credited(&self, amount: u64) -> Option<Self> {
        Some(Self {
            balance: self.balance.checked_add(amount)?,
            earnings_today: self.earnings_today.checked_add(amount)?,
            available_balance: self.available_balance.checked_add(amount)?,
            ..*self
        })
    }

    /// Percent change of today's earnings against yesterday's.
    ///
    /// `None` when there were no earnings yesterday.
    pub fn earnings_trend(&self) -> Option<f64> {
        if self.earnings_yesterday == 0 {
            return None;
        }
        let today = self.earnings_today as f64;
        let yesterday = self.earnings_yesterday as f64;
        Some((today - yesterday) * 100.0 / yesterday)
    }
}
