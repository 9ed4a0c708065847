use platform_host::DAY_MS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display exchange rate for the dollar estimate under the balance.
pub const USD_PER_CREDIT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Direction of a transaction.
pub enum TransactionKind {
    /// Money in.
    Credit,
    /// Money out.
    Debit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Settlement state shown next to the amount.
pub enum TransactionStatus {
    #[default]
    /// Settled.
    Completed,
    /// Awaiting settlement.
    Pending,
    /// Rejected.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One history line.
pub struct Transaction {
    /// Sequence identifier.
    pub id: String,
    /// Credit or debit.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Always positive; [`Transaction::kind`] carries the sign.
    pub amount: i64,
    /// History label.
    pub description: String,
    /// Counterparty.
    pub from: String,
    /// Unix ms.
    pub timestamp: u64,
    /// Mission that paid this credit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_id: Option<String>,
    /// Settlement state.
    #[serde(default)]
    pub status: TransactionStatus,
}

impl Transaction {
    /// Completed transaction without a mission reference.
    pub fn new(
        id: impl Into<String>,
        kind: TransactionKind,
        amount: i64,
        description: impl Into<String>,
        from: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            description: description.into(),
            from: from.into(),
            timestamp,
            mission_id: None,
            status: TransactionStatus::Completed,
        }
    }

    /// Links the transaction to the mission that paid it.
    pub fn for_mission(mut self, mission_id: impl Into<String>) -> Self {
        self.mission_id = Some(mission_id.into());
        self
    }

    /// Icon category, derived from the description first and the direction second.
    pub fn icon(&self) -> TransactionIcon {
        let text = self.description.as_str();
        if text.contains("Mission") || text.contains("Ransomware") {
            TransactionIcon::Mission
        } else if text.contains("Achat") {
            TransactionIcon::Purchase
        } else if text.contains("Bitcoin") || text.contains("Crypto") {
            TransactionIcon::Crypto
        } else if self.kind == TransactionKind::Credit {
            TransactionIcon::Income
        } else {
            TransactionIcon::Expense
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// History row icon.
pub enum TransactionIcon {
    /// Mission payout.
    Mission,
    /// Shop purchase.
    Purchase,
    /// Crypto transfer.
    Crypto,
    /// Any other credit.
    Income,
    /// Any other debit.
    Expense,
}

impl TransactionIcon {
    /// Emoji drawn in the history row.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Mission => "🎯",
            Self::Purchase => "🛒",
            Self::Crypto => "₿",
            Self::Income => "💰",
            Self::Expense => "💸",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// History window selected in the period tabs.
pub enum Period {
    /// Same UTC calendar day as now.
    Today,
    #[default]
    /// Last seven days.
    Week,
    /// Last thirty days.
    Month,
    /// Whole history.
    All,
}

impl Period {
    /// Returns `true` when a transaction at `timestamp` falls in the window ending at `now`.
    pub fn contains(self, timestamp: u64, now: u64) -> bool {
        match self {
            Self::Today => timestamp / DAY_MS == now / DAY_MS,
            Self::Week => timestamp >= now.saturating_sub(7 * DAY_MS),
            Self::Month => timestamp >= now.saturating_sub(30 * DAY_MS),
            Self::All => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Rejected ledger movement.
pub enum BankError {
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    /// The debit exceeds the balance.
    InsufficientFunds {
        /// Balance at the time of the request.
        balance: i64,
        /// Requested debit.
        requested: i64,
    },
    #[error("amount must be positive, got {0}")]
    /// Zero or negative amount.
    InvalidAmount(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Account balance plus history, newest first.
pub struct Ledger {
    balance: i64,
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Ledger seeded with `transactions`, sorted newest first. The balance is taken as given and
    /// not recomputed from the history.
    pub fn new(balance: i64, mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self {
            balance,
            transactions,
        }
    }

    /// Current balance in credits.
    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Dollar estimate shown under the balance.
    pub fn usd_estimate(&self) -> f64 {
        self.balance as f64 * USD_PER_CREDIT
    }

    /// Full history, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// History rows inside `period`, newest first.
    pub fn filtered(&self, period: Period, now: u64) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions
            .iter()
            .filter(move |t| period.contains(t.timestamp, now))
    }

    /// Sum of credits inside `period`.
    pub fn total_income(&self, period: Period, now: u64) -> i64 {
        self.total(TransactionKind::Credit, period, now)
    }

    /// Sum of debits inside `period`.
    pub fn total_expenses(&self, period: Period, now: u64) -> i64 {
        self.total(TransactionKind::Debit, period, now)
    }

    fn total(&self, kind: TransactionKind, period: Period, now: u64) -> i64 {
        self.filtered(period, now)
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    }

    /// Adds money and records the movement.
    pub fn credit(
        &mut self,
        amount: i64,
        description: impl Into<String>,
        from: impl Into<String>,
        now: u64,
    ) -> Result<&Transaction, BankError> {
        if amount <= 0 {
            return Err(BankError::InvalidAmount(amount));
        }
        self.balance += amount;
        Ok(self.record(TransactionKind::Credit, amount, description.into(), from.into(), now))
    }

    /// Removes money and records the movement. The balance never goes negative.
    pub fn debit(
        &mut self,
        amount: i64,
        description: impl Into<String>,
        to: impl Into<String>,
        now: u64,
    ) -> Result<&Transaction, BankError> {
        if amount <= 0 {
            return Err(BankError::InvalidAmount(amount));
        }
        if amount > self.balance {
            return Err(BankError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        Ok(self.record(TransactionKind::Debit, amount, description.into(), to.into(), now))
    }

    fn record(
        &mut self,
        kind: TransactionKind,
        amount: i64,
        description: String,
        counterparty: String,
        now: u64,
    ) -> &Transaction {
        let next_id = self
            .transactions
            .iter()
            .filter_map(|t| t.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let transaction = Transaction::new(
            next_id.to_string(),
            kind,
            amount,
            description,
            counterparty,
            now,
        );
        let index = self
            .transactions
            .iter()
            .position(|t| t.timestamp <= now)
            .unwrap_or(self.transactions.len());
        self.transactions.insert(index, transaction);
        &self.transactions[index]
    }
}
