//! Transaction history entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::catalog::GameId;

/// What moved the money.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Payout request to a mobile-money provider.
    Withdrawal,
    /// External top-up.
    Deposit,
    /// Settled game session.
    GameReward,
}

/// Processing status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Waiting on the provider.
    Pending,
    /// Done.
    Completed,
    /// Rejected by the provider.
    Failed,
}

/// Mobile-money payout providers offered by the withdrawal form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WithdrawalProvider {
    /// Orange Money.
    Orange,
    /// MTN Mobile Money.
    #[serde(rename = "MTN")]
    Mtn,
    /// Wave.
    Wave,
}

impl WithdrawalProvider {
    /// Every provider, in form order.
    pub const ALL: [WithdrawalProvider; 3] = [
        WithdrawalProvider::Orange,
        WithdrawalProvider::Mtn,
        WithdrawalProvider::Wave,
    ];
}

impl fmt::Display for WithdrawalProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WithdrawalProvider::Orange => "Orange",
            WithdrawalProvider::Mtn => "MTN",
            WithdrawalProvider::Wave => "Wave",
        };
        f.write_str(name)
    }
}

/// A transaction history entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: uuid::Uuid,
    /// Kind of movement.
    pub kind: TransactionKind,
    /// Amount in the currency of record.
    pub amount: u64,
    /// When it was recorded.
    pub date: DateTime<Utc>,
    /// Processing status.
    pub status: TransactionStatus,
    /// Payout provider (withdrawals only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<WithdrawalProvider>,
    /// Source game (rewards only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<GameId>,
}

impl Transaction {
    /// Completed reward for a settled session.
    pub fn game_reward(game_id: GameId, amount: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            kind: TransactionKind::GameReward,
            amount,
            date: Utc::now(),
            status: TransactionStatus::Completed,
            provider: None,
            game_id: Some(game_id),
        }
    }

    /// Pending payout request.
    pub fn withdrawal(amount: u64, provider: WithdrawalProvider) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            kind: TransactionKind::Withdrawal,
            amount,
            date: Utc::now(),
            status: TransactionStatus::Pending,
            provider: Some(provider),
            game_id: None,
        }
    }

    /// True when the entry reduces the balance once processed.
    pub fn is_outgoing(&self) -> bool {
        self.kind == TransactionKind::Withdrawal
    }

    /// History line label.
    pub fn label(&self) -> String {
        match (self.kind, self.provider) {
            (TransactionKind::Withdrawal, Some(p)) => format!("Withdrawal {p}"),
            (TransactionKind::Withdrawal, None) => "Withdrawal".to_string(),
            (TransactionKind::Deposit, _) => "Deposit".to_string(),
            (TransactionKind::GameReward, _) => "Game reward".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_entry() {
        let tx = Transaction::game_reward(GameId::from("quiz-capitals"), 150);
        assert_eq!(tx.kind, TransactionKind::GameReward);
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert!(!tx.is_outgoing());
        assert_eq!(tx.label(), "Game reward");
    }

    #[test]
    fn test_withdrawal_entry() {
        let tx = Transaction::withdrawal(5_000, WithdrawalProvider::Mtn);
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert!(tx.is_outgoing());
        assert_eq!(tx.label(), "Withdrawal MTN");

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["provider"], "MTN");
        assert_eq!(json["kind"], "withdrawal");
        assert!(json.get("game_id").is_none());
    }
}
