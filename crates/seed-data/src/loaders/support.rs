//! Interface translations and demo support tickets.

use async_trait::async_trait;

use bidesh::models::{TicketPriority, TicketStatus};

use super::{Loader, SeedContext};
use crate::db::{LoadReport, Row, SeedError, Table};
use crate::generators::demo::reference;

/// Account recorded as the last editor of seeded translations.
const TRANSLATION_EDITOR: &str = "admin@bgplatform.com";

/// (group, key, English, Bangla)
#[rustfmt::skip]
const TRANSLATIONS: &[(&str, &str, &str, &str)] = &[
    ("nav", "home", "Home", "হোম"),
    ("nav", "services", "Services", "সেবাসমূহ"),
    ("nav", "agencies", "Agencies", "এজেন্সি"),
    ("nav", "blog", "Blog", "ব্লগ"),
    ("nav", "contact", "Contact", "যোগাযোগ"),
    ("auth", "login", "Log in", "লগ ইন"),
    ("auth", "register", "Create account", "অ্যাকাউন্ট তৈরি করুন"),
    ("auth", "logout", "Log out", "লগ আউট"),
    ("auth", "forgot_password", "Forgot password?", "পাসওয়ার্ড ভুলে গেছেন?"),
    ("dashboard", "my_applications", "My applications", "আমার আবেদনসমূহ"),
    ("dashboard", "wallet_balance", "Wallet balance", "ওয়ালেট ব্যালেন্স"),
    ("dashboard", "profile_completion", "Profile completion", "প্রোফাইল সম্পূর্ণতা"),
    ("visa", "apply_now", "Apply now", "এখনই আবেদন করুন"),
    ("visa", "processing_time", "Processing time", "প্রক্রিয়াকরণের সময়"),
    ("visa", "required_documents", "Required documents", "প্রয়োজনীয় কাগজপত্র"),
    ("visa", "visa_on_arrival", "Visa on arrival", "অন অ্যারাইভাল ভিসা"),
    ("status", "draft", "Draft", "খসড়া"),
    ("status", "submitted", "Submitted", "জমা দেওয়া হয়েছে"),
    ("status", "under_review", "Under review", "পর্যালোচনাধীন"),
    ("status", "approved", "Approved", "অনুমোদিত"),
    ("status", "rejected", "Rejected", "প্রত্যাখ্যাত"),
];

/// English and Bangla interface strings.
pub struct TranslationsLoader;

#[async_trait]
impl Loader for TranslationsLoader {
    fn name(&self) -> &'static str {
        "translations"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Users]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Translations]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        // The editor is informational; strings are seeded without one.
        let editor = ctx
            .seeder
            .find_id(Table::Users, "email", TRANSLATION_EDITOR)
            .await?;

        let mut rows = Vec::with_capacity(TRANSLATIONS.len() * 2);
        for &(group, key, en, bn) in TRANSLATIONS {
            for (locale, value) in [("en", en), ("bn", bn)] {
                rows.push(
                    Row::new(Table::Translations)
                        .set("locale", locale)
                        .set("group_name", group)
                        .set("key", key)
                        .set("value", value)
                        .set("updated_by", editor),
                );
            }
        }

        ctx.seeder.seed_rows("translations", &rows).await
    }
}

struct TicketSeed {
    key: &'static str,
    user_email: &'static str,
    assignee_email: Option<&'static str>,
    subject: &'static str,
    description: &'static str,
    category: &'static str,
    priority: TicketPriority,
    status: TicketStatus,
}

const TICKETS: &[TicketSeed] = &[
    TicketSeed {
        key: "wallet-topup-missing",
        user_email: "rahim.uddin@example.com",
        assignee_email: Some("consultant@bgplatform.com"),
        subject: "bKash top-up not reflected in wallet",
        description: "I sent ৳5,000 via bKash two hours ago but my wallet balance has not changed.",
        category: "payment",
        priority: TicketPriority::High,
        status: TicketStatus::InProgress,
    },
    TicketSeed {
        key: "visa-status-question",
        user_email: "rahim.uddin@example.com",
        assignee_email: Some("nusrat.consult@example.com"),
        subject: "How long does Saudi work visa review take?",
        description: "My application has been under review for ten days. Is anything missing?",
        category: "visa",
        priority: TicketPriority::Medium,
        status: TicketStatus::Open,
    },
    TicketSeed {
        key: "document-upload-error",
        user_email: "fatema.begum@example.com",
        assignee_email: None,
        subject: "Cannot upload CAS letter",
        description: "Uploading a 4 MB PDF fails with an error at 90%.",
        category: "technical",
        priority: TicketPriority::Medium,
        status: TicketStatus::Open,
    },
    TicketSeed {
        key: "refund-request",
        user_email: "user@bgplatform.com",
        assignee_email: Some("admin@bgplatform.com"),
        subject: "Refund for rejected work permit",
        description: "My Malaysia work permit was rejected. Please refund the service fee.",
        category: "payment",
        priority: TicketPriority::Urgent,
        status: TicketStatus::Resolved,
    },
    TicketSeed {
        key: "profile-name-change",
        user_email: "user@bgplatform.com",
        assignee_email: Some("consultant@bgplatform.com"),
        subject: "Name on profile does not match passport",
        description: "Please update my name to match the spelling on my new passport.",
        category: "account",
        priority: TicketPriority::Low,
        status: TicketStatus::Closed,
    },
];

/// Demo support tickets. A ticket whose assignee is missing is left
/// unassigned; one whose requester is missing is skipped.
pub struct SupportTicketsLoader;

#[async_trait]
impl Loader for SupportTicketsLoader {
    fn name(&self) -> &'static str {
        "support_tickets"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Users]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::SupportTickets]
    }

    fn is_demo(&self) -> bool {
        true
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let seeder = ctx.seeder;
        let mut report = LoadReport::default();
        let mut rows = Vec::with_capacity(TICKETS.len());

        for ticket in TICKETS {
            let Some(user_id) = seeder
                .require_id(self.name(), Table::Users, "email", ticket.user_email)
                .await?
            else {
                report.skip();
                continue;
            };
            let assignee = match ticket.assignee_email {
                Some(email) => seeder.find_id(Table::Users, "email", email).await?,
                None => None,
            };

            rows.push(
                Row::new(Table::SupportTickets)
                    .set("ticket_number", reference("TKT", ticket.key))
                    .set("user_id", user_id)
                    .set("assigned_to", assignee)
                    .set("subject", ticket.subject)
                    .set("description", ticket.description)
                    .set("category", ticket.category)
                    .set("priority", ticket.priority.as_str())
                    .set("status", ticket.status.as_str()),
            );
        }

        report += seeder.seed_rows("support tickets", &rows).await?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::db::{Repository, Value};
    use crate::loaders::accounts::{RolesLoader, UsersLoader};
    use crate::loaders::testing::{fixture_config, memory_seeder, run, run_all};

    #[tokio::test]
    async fn test_translations_without_editor() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));

        run(&TranslationsLoader, &seeder, &config).await;
        run(&TranslationsLoader, &seeder, &config).await;

        assert_eq!(
            repo.count(Table::Translations).await.unwrap(),
            TRANSLATIONS.len() as i64 * 2
        );
        assert!(
            repo.column(Table::Translations, "updated_by")
                .iter()
                .all(Value::is_null)
        );
    }

    #[tokio::test]
    async fn test_tickets_idempotent_with_users() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));
        run_all(&[&RolesLoader, &UsersLoader], &seeder, &config).await;

        let first = run(&SupportTicketsLoader, &seeder, &config).await;
        let second = run(&SupportTicketsLoader, &seeder, &config).await;

        assert_eq!(first.created, TICKETS.len());
        assert_eq!(second.updated, TICKETS.len());
        assert_eq!(
            repo.count(Table::SupportTickets).await.unwrap(),
            TICKETS.len() as i64
        );
    }

    #[tokio::test]
    async fn test_tickets_skip_without_users() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));

        let report = run(&SupportTicketsLoader, &seeder, &config).await;

        assert_eq!(report.skipped, TICKETS.len());
        assert_eq!(repo.count(Table::SupportTickets).await.unwrap(), 0);
    }
}
