//! Demo wallet ledgers.

use async_trait::async_trait;
use rand::Rng;

use bidesh::models::RoleSlug;

use super::accounts::{fixed_accounts, sample_accounts};
use super::{Loader, SeedContext};
use crate::config::SeedConfig;
use crate::db::{LoadReport, Row, SeedError, Table};
use crate::generators::LedgerGenerator;
use crate::generators::ledger::closing_balance;

/// Emails of the customer accounts that get a ledger history.
fn ledger_owners(config: &SeedConfig) -> Vec<String> {
    let mut accounts = fixed_accounts();
    if config.include_demo {
        accounts.extend(sample_accounts(config));
    }
    accounts
        .into_iter()
        .filter(|a| a.role == RoleSlug::User)
        .map(|a| a.email)
        .collect()
}

/// Writes a synthetic transaction history for each customer wallet and sets
/// the wallet balance to the ledger's closing balance.
pub struct WalletTransactionsLoader;

#[async_trait]
impl Loader for WalletTransactionsLoader {
    fn name(&self) -> &'static str {
        "wallet_transactions"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Users, Table::Wallets]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::WalletTransactions]
    }

    fn is_demo(&self) -> bool {
        true
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let seeder = ctx.seeder;
        let now = ctx.now;
        let (min, max) = ctx.config.transactions_per_wallet;
        let ledger = LedgerGenerator::new();
        let mut report = LoadReport::default();

        for email in ledger_owners(ctx.config) {
            let Some(user_id) = seeder
                .require_id(self.name(), Table::Users, "email", &email)
                .await?
            else {
                report.skip();
                continue;
            };
            let Some(wallet_id) = seeder.find_id(Table::Wallets, "user_id", user_id).await? else {
                report.skip();
                continue;
            };

            let rng = ctx.rng();
            let count = rng.gen_range(min..=max.max(min));
            let entries = ledger.generate(wallet_id, count, now, rng);

            let rows: Vec<Row> = entries
                .iter()
                .map(|e| {
                    Row::new(Table::WalletTransactions)
                        .set("reference", e.reference.as_str())
                        .set("wallet_id", wallet_id)
                        .set("transaction_type", e.transaction_type.as_str())
                        .set("amount", e.amount)
                        .set("balance_after", e.balance_after)
                        .set("status", e.status.as_str())
                        .set("description", e.description.as_str())
                        .set("transacted_at", e.transacted_at)
                })
                .collect();
            report += seeder.seed_rows(&format!("transactions for {email}"), &rows).await?;

            let balance = Row::new(Table::Wallets)
                .set("user_id", user_id)
                .set("balance", closing_balance(&entries));
            seeder.upsert(&balance).await?;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use rust_decimal::Decimal;

    use crate::db::{Repository, Value};
    use crate::loaders::accounts::{RolesLoader, SampleUsersLoader, UsersLoader};
    use crate::loaders::testing::{fixture_config, memory_seeder, run, run_all};

    #[tokio::test]
    async fn test_wallet_balance_matches_ledger() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));
        run_all(
            &[&RolesLoader, &UsersLoader, &SampleUsersLoader],
            &seeder,
            &config,
        )
        .await;

        run(&WalletTransactionsLoader, &seeder, &config).await;

        let user_id = seeder
            .find_id(Table::Users, "email", "rahim.uddin@example.com")
            .await
            .unwrap()
            .unwrap();
        let wallet_id = seeder
            .find_id(Table::Wallets, "user_id", user_id)
            .await
            .unwrap()
            .unwrap();

        let ledger: Vec<(Value, Value)> = repo
            .column(Table::WalletTransactions, "wallet_id")
            .into_iter()
            .zip(repo.column(Table::WalletTransactions, "balance_after"))
            .filter(|(w, _)| *w == Value::Int(Some(wallet_id)))
            .collect();
        let closing = ledger.last().map(|(_, b)| b.clone()).unwrap();
        assert_eq!(
            repo.value(Table::Wallets, wallet_id, "balance"),
            Some(closing)
        );
        assert!(
            ledger
                .iter()
                .all(|(_, b)| b.as_decimal().is_some_and(|b| b >= Decimal::ZERO))
        );
    }

    #[tokio::test]
    async fn test_rerun_does_not_duplicate_transactions() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));
        run_all(
            &[&RolesLoader, &UsersLoader, &SampleUsersLoader],
            &seeder,
            &config,
        )
        .await;

        run(&WalletTransactionsLoader, &seeder, &config).await;
        let once = repo.count(Table::WalletTransactions).await.unwrap();
        let second = run(&WalletTransactionsLoader, &seeder, &config).await;

        assert!(once > 0);
        assert_eq!(second.created, 0);
        assert_eq!(repo.count(Table::WalletTransactions).await.unwrap(), once);
    }

    #[tokio::test]
    async fn test_no_wallets_no_transactions() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));

        let report = run(&WalletTransactionsLoader, &seeder, &config).await;

        assert_eq!(report.written(), 0);
        assert_eq!(repo.count(Table::WalletTransactions).await.unwrap(), 0);
    }
}
