//! Synthetic wallet ledger history.

use rand::Rng;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use bidesh::models::{TransactionStatus, TransactionType};

/// Generated ledger entry ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedTransaction {
    pub reference: String,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    /// Wallet balance after this entry. Unchanged by failed entries.
    pub balance_after: Decimal,
    pub status: TransactionStatus,
    pub description: String,
    pub transacted_at: OffsetDateTime,
}

/// Configuration for ledger generation.
#[derive(Debug, Clone)]
pub struct LedgerGenConfig {
    /// Top-up amounts in whole taka (min, max).
    pub credit_range: (i64, i64),
    /// Payment amounts in whole taka (min, max).
    pub debit_range: (i64, i64),
    /// Probability an entry after the first is a payment.
    pub debit_probability: f64,
    /// Probability an entry failed.
    pub failure_probability: f64,
    /// How far back the first entry is placed.
    pub history_days: i64,
}

impl Default for LedgerGenConfig {
    fn default() -> Self {
        Self {
            credit_range: (500, 25_000),
            debit_range: (200, 15_000),
            debit_probability: 0.55,
            failure_probability: 0.08,
            history_days: 120,
        }
    }
}

const CREDIT_DESCRIPTIONS: &[&str] = &[
    "Wallet top-up via bKash",
    "Wallet top-up via Nagad",
    "Wallet top-up via bank transfer",
    "Refund: cancelled service application",
    "Referral bonus",
];

const DEBIT_DESCRIPTIONS: &[&str] = &[
    "Visa processing fee",
    "Document attestation service",
    "Police clearance certificate service",
    "Air ticket booking",
    "IELTS registration assistance",
    "Consultation session",
];

/// Generates a wallet's transaction history with a running balance.
pub struct LedgerGenerator {
    config: LedgerGenConfig,
}

impl LedgerGenerator {
    pub fn new() -> Self {
        Self {
            config: LedgerGenConfig::default(),
        }
    }

    /// Reference for the `seq`-th entry of a wallet. Stable across runs.
    pub fn reference(wallet_id: i64, seq: usize) -> String {
        format!("TXN-{wallet_id:06}-{seq:03}")
    }

    /// Generates `count` entries in chronological order ending before `now`.
    ///
    /// The first entry is always a completed top-up. Payments never take the
    /// balance below zero; one that would is turned into a top-up.
    pub fn generate(
        &self,
        wallet_id: i64,
        count: usize,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedTransaction> {
        // Amounts are tracked in paisa.
        let mut balance: i64 = 0;
        let mut at = now - Duration::days(self.config.history_days);
        let step_hours = (self.config.history_days * 24 / count.max(1) as i64).max(1);

        let mut entries = Vec::with_capacity(count);
        for seq in 1..=count {
            at += Duration::hours(rng.gen_range(1..=step_hours));

            let wants_debit = seq > 1 && rng.r#gen::<f64>() < self.config.debit_probability;
            let debit = rng.gen_range(self.config.debit_range.0..=self.config.debit_range.1) * 100;
            let (transaction_type, amount) = if wants_debit && debit <= balance {
                (TransactionType::Debit, debit)
            } else {
                let credit =
                    rng.gen_range(self.config.credit_range.0..=self.config.credit_range.1) * 100;
                (TransactionType::Credit, credit)
            };

            let status = if seq > 1 && rng.r#gen::<f64>() < self.config.failure_probability {
                TransactionStatus::Failed
            } else {
                TransactionStatus::Completed
            };

            if status == TransactionStatus::Completed {
                match transaction_type {
                    TransactionType::Credit => balance += amount,
                    TransactionType::Debit => balance -= amount,
                }
            }

            let descriptions = match transaction_type {
                TransactionType::Credit => CREDIT_DESCRIPTIONS,
                TransactionType::Debit => DEBIT_DESCRIPTIONS,
            };

            entries.push(GeneratedTransaction {
                reference: Self::reference(wallet_id, seq),
                transaction_type,
                amount: Decimal::new(amount, 2),
                balance_after: Decimal::new(balance, 2),
                status,
                description: descriptions[rng.gen_range(0..descriptions.len())].to_string(),
                transacted_at: at.min(now),
            });
        }

        entries
    }
}

impl Default for LedgerGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Final balance of a ledger, or zero when empty.
pub fn closing_balance(entries: &[GeneratedTransaction]) -> Decimal {
    entries.last().map_or(Decimal::ZERO, |e| e.balance_after)
}
