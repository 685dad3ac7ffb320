//! Reward Ledger
//!
//! Sole writer of [`UserStats`]. Rewards are credited exactly once per
//! settlement: a [`Settlement`] is moved into [`LedgerStore::settle`] and
//! cannot be presented again.

use thiserror::Error;
use tracing::{debug, info};

use crate::game::catalog::GameId;
use crate::game::controller::Settlement;
use crate::game::state::SessionId;
use crate::ledger::stats::UserStats;
use crate::ledger::transaction::{
    Transaction, TransactionKind, TransactionStatus, WithdrawalProvider,
};

/// Smallest withdrawal the form accepts.
pub const DEFAULT_MIN_WITHDRAWAL: u64 = 2_000;

/// Ledger errors. Every check runs before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Rewards are never negative.
    #[error("Negative amount: {0}")]
    NegativeAmount(i64),

    /// An aggregate would exceed `u64::MAX`.
    #[error("Balance overflow crediting {0}")]
    Overflow(u64),

    /// Withdrawal below the minimum.
    #[error("Withdrawal of {amount} is below the minimum of {minimum}")]
    BelowMinimumWithdrawal {
        /// Requested amount.
        amount: u64,
        /// Configured minimum.
        minimum: u64,
    },

    /// Withdrawal larger than what is available after pending requests.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Requested amount.
        requested: u64,
        /// Available balance minus pending withdrawals.
        available: u64,
    },
}

/// Proof that a settlement was credited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReceipt {
    /// Settled session.
    pub session_id: SessionId,
    /// Source game.
    pub game_id: GameId,
    /// Amount credited.
    pub amount: u64,
    /// History entry recorded for the credit.
    pub transaction_id: uuid::Uuid,
    /// Aggregates after the credit.
    pub stats: UserStats,
}

/// Write interface of a rewards ledger.
///
/// Only credits exist today; a `debit` counterpart for processed
/// withdrawals belongs here when payouts are implemented.
pub trait LedgerStore {
    /// Credit `amount` to balance, today's earnings and available balance.
    fn apply_reward(&mut self, amount: i64) -> Result<UserStats, LedgerError>;

    /// Credit a completed session's reward and record it in history.
    fn settle(&mut self, settlement: Settlement) -> Result<SettlementReceipt, LedgerError>;

    /// Current aggregates.
    fn stats(&self) -> UserStats;
}

/// In-memory ledger.
#[derive(Debug, Clone)]
pub struct RewardLedger {
    stats: UserStats,
    transactions: Vec<Transaction>,
    min_withdrawal: u64,
}

impl Default for RewardLedger {
    fn default() -> Self {
        Self::new(UserStats::default())
    }
}

impl RewardLedger {
    /// Create a ledger seeded with `stats`.
    pub fn new(stats: UserStats) -> Self {
        Self {
            stats,
            transactions: Vec::new(),
            min_withdrawal: DEFAULT_MIN_WITHDRAWAL,
        }
    }

    /// Override the withdrawal minimum.
    pub fn with_min_withdrawal(mut self, minimum: u64) -> Self {
        self.min_withdrawal = minimum;
        self
    }

    /// Configured withdrawal minimum.
    pub fn min_withdrawal(&self) -> u64 {
        self.min_withdrawal
    }

    /// History, newest first.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().rev()
    }

    /// Sum of withdrawal requests still pending.
    pub fn pending_withdrawals(&self) -> u64 {
        self.transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Withdrawal && t.status == TransactionStatus::Pending)
            .map(|t| t.amount)
            .sum()
    }

    /// Record a payout request.
    ///
    /// Aggregates are not debited; the request stays pending until a payout
    /// backend processes it.
    pub fn request_withdrawal(
        &mut self,
        amount: u64,
        provider: WithdrawalProvider,
    ) -> Result<&Transaction, LedgerError> {
        if amount < self.min_withdrawal {
            return Err(LedgerError::BelowMinimumWithdrawal {
                amount,
                minimum: self.min_withdrawal,
            });
        }

        let available = self
            .stats
            .available_balance
            .saturating_sub(self.pending_withdrawals());
        if amount > available {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available,
            });
        }

        info!("Withdrawal of {} requested via {}", amount, provider);
        self.transactions.push(Transaction::withdrawal(amount, provider));
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    fn credit(&mut self, amount: u64) -> Result<UserStats, LedgerError> {
        let next = self
            .stats
            .credited(amount)
            .ok_or(LedgerError::Overflow(amount))?;
        self.stats = next;
        debug!("Credited {}, balance now {}", amount, next.balance);
        Ok(next)
    }
}

impl LedgerStore for RewardLedger {
    fn apply_reward(&mut self, amount: i64) -> Result<UserStats, LedgerError> {
        let amount = u64::try_from(amount).map_err(|_| LedgerError::NegativeAmount(amount))?;
        self.credit(amount)
    }

    fn settle(&mut self, settlement: Settlement) -> Result<SettlementReceipt, LedgerError> {
        let stats = self.credit(settlement.amount())?;
        let tx = Transaction::game_reward(settlement.game_id().clone(), settlement.amount());
        let transaction_id = tx.id;
        self.transactions.push(tx);

        info!(
            "Settled session {} ({}): +{}",
            settlement.session_id().short(),
            settlement.game_id(),
            settlement.amount()
        );

        Ok(SettlementReceipt {
            session_id: settlement.session_id(),
            game_id: settlement.game_id().clone(),
            amount: settlement.amount(),
            transaction_id,
            stats,
        })
    }

    fn stats(&self) -> UserStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_reward_increments_three_fields() {
        let mut ledger = RewardLedger::new(UserStats::demo());
        let stats = ledger.apply_reward(100).unwrap();

        assert_eq!(stats.balance, 93_600);
        assert_eq!(stats.earnings_today, 5_600);
        assert_eq!(stats.available_balance, 85_100);
        assert_eq!(stats.earnings_yesterday, 8_200);
        assert_eq!(stats.total_withdrawn, 295_000);
        assert_eq!(ledger.stats(), stats);
    }

    #[test]
    fn test_zero_reward_is_noop() {
        let mut ledger = RewardLedger::new(UserStats::demo());
        ledger.apply_reward(0).unwrap();
        assert_eq!(ledger.stats(), UserStats::demo());
    }

    #[test]
    fn test_negative_reward_rejected() {
        let mut ledger = RewardLedger::new(UserStats::demo());
        assert_eq!(ledger.apply_reward(-5), Err(LedgerError::NegativeAmount(-5)));
        assert_eq!(ledger.stats(), UserStats::demo());
    }

    #[test]
    fn test_overflow_leaves_stats_untouched() {
        let start = UserStats {
            balance: 10,
            earnings_today: u64::MAX,
            ..UserStats::default()
        };
        let mut ledger = RewardLedger::new(start);
        assert_eq!(ledger.apply_reward(1), Err(LedgerError::Overflow(1)));
        assert_eq!(ledger.stats(), start);
    }

    #[test]
    fn test_withdrawal_below_minimum() {
        let mut ledger = RewardLedger::new(UserStats::demo());
        let err = ledger
            .request_withdrawal(1_999, WithdrawalProvider::Wave)
            .unwrap_err();
        assert!(matches!(err, LedgerError::BelowMinimumWithdrawal { minimum: 2_000, .. }));
        assert_eq!(ledger.transactions().count(), 0);
    }

    #[test]
    fn test_withdrawal_is_pending_and_not_debited() {
        let mut ledger = RewardLedger::new(UserStats::demo());
        let tx = ledger
            .request_withdrawal(5_000, WithdrawalProvider::Orange)
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Pending);

        assert_eq!(ledger.pending_withdrawals(), 5_000);
        assert_eq!(ledger.stats(), UserStats::demo());
    }

    #[test]
    fn test_pending_withdrawals_count_against_available() {
        let stats = UserStats {
            available_balance: 6_000,
            ..UserStats::default()
        };
        let mut ledger = RewardLedger::new(stats);
        ledger.request_withdrawal(4_000, WithdrawalProvider::Mtn).unwrap();

        let err = ledger
            .request_withdrawal(3_000, WithdrawalProvider::Mtn)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                requested: 3_000,
                available: 2_000
            }
        );
    }

    #[test]
    fn test_custom_minimum() {
        let mut ledger = RewardLedger::new(UserStats::demo()).with_min_withdrawal(500);
        assert_eq!(ledger.min_withdrawal(), 500);
        assert!(ledger.request_withdrawal(500, WithdrawalProvider::Wave).is_ok());
    }
}
