//! Roles, user accounts, and the profile and wallet every account owns.

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::{Date, Month, OffsetDateTime};
use tracing::info;

use bidesh::auth::{DEMO_PASSWORD, hash_password};
use bidesh::models::{AccountStatus, BASE_CURRENCY, Gender, RoleSlug};

use super::{Loader, SeedContext};
use crate::config::SeedConfig;
use crate::db::{LoadReport, Row, SeedError, Seeder, Table, Upserted};
use crate::generators::demo::loader_rng;
use crate::generators::{GeneratedUser, UserGenerator};

#[rustfmt::skip]
const ROLE_DESCRIPTIONS: [(RoleSlug, &str); 4] = [
    (RoleSlug::Admin, "Full access to platform administration"),
    (RoleSlug::User, "Applicant using platform services"),
    (RoleSlug::Agency, "Licensed agency managing its listings and clients"),
    (RoleSlug::Consultant, "Advisor handling applications and support tickets"),
];

pub struct RolesLoader;

#[async_trait]
impl Loader for RolesLoader {
    fn name(&self) -> &'static str {
        "roles"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Roles]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let rows: Vec<Row> = ROLE_DESCRIPTIONS
            .iter()
            .map(|(role, description)| {
                Row::new(Table::Roles)
                    .set("slug", role.as_str())
                    .set("name", role.display_name())
                    .set("description", *description)
            })
            .collect();

        ctx.seeder.seed_rows("roles", &rows).await
    }
}

/// An account to create, with the profile details to start it with.
#[derive(Debug, Clone)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub role: RoleSlug,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<Date>,
    pub passport_number: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
}

impl Account {
    fn fixed(name: &str, email: &str, role: RoleSlug, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            role,
            phone: Some(phone.to_string()),
            gender: None,
            date_of_birth: None,
            passport_number: None,
            address: None,
            bio: None,
        }
    }

    fn with_profile(mut self, gender: Gender, born: (i32, Month, u8), address: &str) -> Self {
        self.gender = Some(gender);
        self.date_of_birth = Date::from_calendar_date(born.0, born.1, born.2).ok();
        self.address = Some(address.to_string());
        self
    }

    fn with_bio(mut self, bio: &str) -> Self {
        self.bio = Some(bio.to_string());
        self
    }

    /// Share of the tracked profile fields that are filled in, in percent.
    pub fn profile_completion(&self, has_nationality: bool) -> i64 {
        let filled = [
            self.gender.is_some(),
            self.date_of_birth.is_some(),
            has_nationality,
            self.passport_number.is_some(),
            self.address.is_some(),
        ];
        filled.iter().filter(|f| **f).count() as i64 * 20
    }
}

impl From<GeneratedUser> for Account {
    fn from(user: GeneratedUser) -> Self {
        Self {
            name: user.name,
            email: user.email,
            role: user.role,
            phone: Some(user.phone),
            gender: user.gender,
            date_of_birth: user.date_of_birth,
            passport_number: user.passport_number,
            address: user.address,
            bio: None,
        }
    }
}

/// Platform staff and the demo accounts the feature loaders attach data to.
#[rustfmt::skip]
pub fn fixed_accounts() -> Vec<Account> {
    vec![
        Account::fixed("Super Admin", "admin@bgplatform.com", RoleSlug::Admin, "+8801700000001"),
        Account::fixed("Demo User", "user@bgplatform.com", RoleSlug::User, "+8801700000002")
            .with_profile(Gender::Male, (1995, Month::March, 14), "Mirpur 10, Dhaka"),
        Account::fixed("Demo Agency", "agency@bgplatform.com", RoleSlug::Agency, "+8801700000003"),
        Account::fixed(
            "Demo Consultant",
            "consultant@bgplatform.com",
            RoleSlug::Consultant,
            "+8801700000004",
        )
        .with_bio("Study abroad and visa consultant with eight years of experience."),
        Account::fixed("Rahim Uddin", "rahim.uddin@example.com", RoleSlug::User, "+8801811223344")
            .with_profile(Gender::Male, (1992, Month::July, 2), "Sadar, Cumilla"),
        Account::fixed("Fatema Begum", "fatema.begum@example.com", RoleSlug::User, "+8801911556677")
            .with_profile(Gender::Female, (1998, Month::January, 21), "Zindabazar, Sylhet"),
        Account::fixed("Sky Travels Ltd", "skytravels@example.com", RoleSlug::Agency, "+8801555123456"),
        Account::fixed(
            "Global Study Partners",
            "globalstudy@example.com",
            RoleSlug::Agency,
            "+8801666789012",
        ),
        Account::fixed(
            "Nusrat Jahan",
            "nusrat.consult@example.com",
            RoleSlug::Consultant,
            "+8801777345678",
        )
        .with_profile(Gender::Female, (1989, Month::October, 9), "Agrabad, Chattogram")
        .with_bio("Former embassy visa officer, specialises in Schengen and UK visas."),
    ]
}

/// Generated customers, identical for the same seed.
pub fn sample_accounts(config: &SeedConfig) -> Vec<Account> {
    let mut rng = loader_rng(config.rng_seed, "sample_users");
    UserGenerator::new()
        .generate_batch(config.sample_user_count, &mut rng)
        .into_iter()
        .map(Account::from)
        .collect()
}

/// Writes accounts first-or-create, then makes sure each one has a profile
/// and a wallet.
struct AccountWriter<'a> {
    loader: &'static str,
    seeder: &'a Seeder,
    now: OffsetDateTime,
    nationality_id: Option<i64>,
    password_hash: Option<String>,
}

impl<'a> AccountWriter<'a> {
    async fn new(
        loader: &'static str,
        seeder: &'a Seeder,
        now: OffsetDateTime,
    ) -> Result<Self, SeedError> {
        // Nationality is optional; accounts are still created without it.
        let nationality_id = seeder.find_id(Table::Countries, "iso2", "BD").await?;
        Ok(Self {
            loader,
            seeder,
            now,
            nationality_id,
            password_hash: None,
        })
    }

    /// Hashes the demo password once per run, only if an insert needs it.
    fn password_hash(&mut self) -> Result<String, SeedError> {
        if let Some(hash) = &self.password_hash {
            return Ok(hash.clone());
        }
        let hash = hash_password(DEMO_PASSWORD)?;
        self.password_hash = Some(hash.clone());
        Ok(hash)
    }

    async fn write(
        &mut self,
        account: &Account,
        report: &mut LoadReport,
    ) -> Result<Option<i64>, SeedError> {
        let Some(role_id) = self
            .seeder
            .require_id(self.loader, Table::Roles, "slug", account.role.as_str())
            .await?
        else {
            report.skip();
            return Ok(None);
        };

        let user_id = match self
            .seeder
            .find_id(Table::Users, "email", account.email.as_str())
            .await?
        {
            Some(id) => {
                report.record(Upserted { id, created: false });
                id
            }
            None => {
                let row = Row::new(Table::Users)
                    .set("name", account.name.as_str())
                    .set("email", account.email.as_str())
                    .set("password", self.password_hash()?)
                    .set("role_id", role_id)
                    .set("phone", account.phone.clone())
                    .set("status", AccountStatus::Active.as_str())
                    .set("email_verified_at", self.now)
                    .keep_existing();
                let upserted = self.seeder.upsert(&row).await?;
                report.record(upserted);
                upserted.id
            }
        };

        let profile = Row::new(Table::UserProfiles)
            .set("user_id", user_id)
            .set("gender", account.gender.map(|g| g.as_str()))
            .set("date_of_birth", account.date_of_birth)
            .set("nationality_id", self.nationality_id)
            .set("passport_number", account.passport_number.clone())
            .set("address", account.address.clone())
            .set("bio", account.bio.clone())
            .set(
                "profile_completion",
                account.profile_completion(self.nationality_id.is_some()),
            )
            .keep_existing();
        report.record(self.seeder.upsert(&profile).await?);

        let wallet = Row::new(Table::Wallets)
            .set("user_id", user_id)
            .set("currency_code", BASE_CURRENCY)
            .set("balance", Decimal::ZERO)
            .set("status", AccountStatus::Active.as_str())
            .keep_existing();
        report.record(self.seeder.upsert(&wallet).await?);

        Ok(Some(user_id))
    }
}

/// Staff and demo accounts.
///
/// Existing accounts are left untouched, including their password, but a
/// missing profile or wallet is still created.
pub struct UsersLoader;

#[async_trait]
impl Loader for UsersLoader {
    fn name(&self) -> &'static str {
        "users"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Roles]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Users, Table::UserProfiles, Table::Wallets]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let accounts = fixed_accounts();
        info!("Seeding {} accounts...", accounts.len());

        let mut writer = AccountWriter::new(self.name(), ctx.seeder, ctx.now).await?;
        let mut report = LoadReport::default();
        for account in &accounts {
            writer.write(account, &mut report).await?;
        }

        Ok(report)
    }
}

/// Generated customers on top of the fixed demo accounts.
pub struct SampleUsersLoader;

#[async_trait]
impl Loader for SampleUsersLoader {
    fn name(&self) -> &'static str {
        "sample_users"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Roles]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Users, Table::UserProfiles, Table::Wallets]
    }

    fn is_demo(&self) -> bool {
        true
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let accounts = sample_accounts(ctx.config);
        info!("Seeding {} sample customers...", accounts.len());

        let mut writer = AccountWriter::new(self.name(), ctx.seeder, ctx.now).await?;
        let mut report = LoadReport::default();
        for account in &accounts {
            writer.write(account, &mut report).await?;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::db::{Repository, Value};
    use crate::loaders::testing::{fixture_config, memory_seeder, run};

    #[tokio::test]
    async fn test_roles_seeded_twice_yield_four_unique_rows() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));

        run(&RolesLoader, &seeder, &config).await;
        run(&RolesLoader, &seeder, &config).await;

        assert_eq!(repo.count(Table::Roles).await.unwrap(), 4);
        let mut slugs: Vec<String> = repo
            .column(Table::Roles, "slug")
            .iter()
            .filter_map(|v| v.as_text().map(str::to_string))
            .collect();
        slugs.sort();
        assert_eq!(slugs, ["admin", "agency", "consultant", "user"]);
    }

    #[tokio::test]
    async fn test_existing_admin_gets_profile_and_wallet_without_duplicate() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));
        run(&RolesLoader, &seeder, &config).await;

        let role_id = seeder
            .find_id(Table::Roles, "slug", "admin")
            .await
            .unwrap()
            .unwrap();
        let admin = Row::new(Table::Users)
            .set("name", "Existing Admin")
            .set("email", "admin@bgplatform.com")
            .set("password", "already-hashed")
            .set("role_id", role_id);
        let admin_id = seeder.upsert(&admin).await.unwrap().id;

        run(&UsersLoader, &seeder, &config).await;

        let admins = repo
            .column(Table::Users, "email")
            .into_iter()
            .filter(|v| v.as_text() == Some("admin@bgplatform.com"))
            .count();
        assert_eq!(admins, 1);
        assert_eq!(
            repo.value(Table::Users, admin_id, "password"),
            Some(Value::from("already-hashed"))
        );
        assert!(
            seeder
                .find_id(Table::UserProfiles, "user_id", admin_id)
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            seeder
                .find_id(Table::Wallets, "user_id", admin_id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_every_user_has_profile_and_wallet() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));
        run(&RolesLoader, &seeder, &config).await;

        run(&UsersLoader, &seeder, &config).await;
        run(&SampleUsersLoader, &seeder, &config).await;
        run(&UsersLoader, &seeder, &config).await;
        run(&SampleUsersLoader, &seeder, &config).await;

        let users = repo.count(Table::Users).await.unwrap();
        assert_eq!(
            users as usize,
            fixed_accounts().len() + config.sample_user_count
        );
        assert_eq!(repo.count(Table::UserProfiles).await.unwrap(), users);
        assert_eq!(repo.count(Table::Wallets).await.unwrap(), users);
    }

    #[tokio::test]
    async fn test_users_skip_without_roles() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));

        let report = run(&UsersLoader, &seeder, &config).await;

        assert_eq!(report.skipped, fixed_accounts().len());
        assert_eq!(repo.count(Table::Users).await.unwrap(), 0);
        assert_eq!(repo.count(Table::Wallets).await.unwrap(), 0);
    }

    #[test]
    fn test_sample_accounts_are_deterministic() {
        let config = SeedConfig::default();
        let emails = || -> Vec<String> {
            sample_accounts(&config)
                .into_iter()
                .map(|a| a.email)
                .collect()
        };
        let (a, b) = (emails(), emails());
        assert_eq!(a, b);
        assert_eq!(a.len(), config.sample_user_count);
    }

    #[test]
    fn test_profile_completion() {
        let account = Account::fixed("A", "a@example.com", RoleSlug::User, "+8801700000000")
            .with_profile(Gender::Female, (1990, Month::May, 1), "Dhaka");
        assert_eq!(account.profile_completion(true), 80);
        assert_eq!(account.profile_completion(false), 60);
    }
}
