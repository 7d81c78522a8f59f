//! Site configuration and static content.

use async_trait::async_trait;
use serde_json::json;
use time::Duration;

use bidesh::models::{MenuLocation, SettingType};

use super::{Loader, SeedContext};
use crate::db::{LoadReport, Row, SeedError, Table};
use crate::generators::demo::impressions_and_clicks;

/// (key, value, type, group, description, public)
#[rustfmt::skip]
const SETTINGS: &[(&str, &str, SettingType, &str, &str, bool)] = &[
    ("site_name", "BideshGomon", SettingType::String, "general", "Platform name", true),
    ("site_tagline", "Your trusted partner for going abroad", SettingType::String, "general", "Tagline shown in the header", true),
    ("contact_email", "support@bgplatform.com", SettingType::String, "general", "Public support address", true),
    ("contact_phone", "+8809612345678", SettingType::String, "general", "Public hotline", true),
    ("office_address", "House 12, Road 7, Dhanmondi, Dhaka 1205", SettingType::String, "general", "Head office", true),
    ("default_locale", "en", SettingType::String, "localization", "Fallback interface language", true),
    ("supported_locales", "[\"en\",\"bn\"]", SettingType::Json, "localization", "Interface languages", true),
    ("default_currency", "BDT", SettingType::String, "payments", "Wallet and pricing currency", true),
    ("wallet_min_topup", "100", SettingType::Integer, "payments", "Smallest wallet top-up in taka", false),
    ("wallet_max_balance", "500000", SettingType::Integer, "payments", "Wallet balance ceiling in taka", false),
    ("service_fee_percent", "5", SettingType::Integer, "payments", "Platform fee on service applications", false),
    ("registration_enabled", "true", SettingType::Boolean, "auth", "Allow new sign-ups", false),
    ("email_verification_required", "true", SettingType::Boolean, "auth", "Require verified email before applying", false),
    ("maintenance_mode", "false", SettingType::Boolean, "system", "Show maintenance page to visitors", false),
    ("max_upload_mb", "10", SettingType::Integer, "system", "Document upload size limit", false),
    ("facebook_url", "https://facebook.com/bideshgomon", SettingType::String, "social", "Facebook page", true),
    ("youtube_url", "https://youtube.com/@bideshgomon", SettingType::String, "social", "YouTube channel", true),
];

pub struct SettingsLoader;

#[async_trait]
impl Loader for SettingsLoader {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Settings]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let rows: Vec<Row> = SETTINGS
            .iter()
            .map(|&(key, value, value_type, group, description, is_public)| {
                Row::new(Table::Settings)
                    .set("key", key)
                    .set("value", value)
                    .set("value_type", value_type.as_str())
                    .set("group_name", group)
                    .set("description", description)
                    .set("is_public", is_public)
            })
            .collect();

        ctx.seeder.seed_rows("settings", &rows).await
    }
}

/// (slug, name, subject, body, variables)
#[rustfmt::skip]
const EMAIL_TEMPLATES: &[(&str, &str, &str, &str, &[&str])] = &[
    (
        "welcome",
        "Welcome",
        "Welcome to BideshGomon, {{name}}",
        "Hi {{name}},\n\nYour account is ready. Complete your profile to start applying.\n\nBideshGomon Team",
        &["name"],
    ),
    (
        "verify-email",
        "Verify Email",
        "Confirm your email address",
        "Hi {{name}},\n\nPlease confirm your email by visiting {{verification_url}}.",
        &["name", "verification_url"],
    ),
    (
        "password-reset",
        "Password Reset",
        "Reset your password",
        "Hi {{name}},\n\nUse {{reset_url}} to choose a new password. The link expires in {{expires_minutes}} minutes.",
        &["name", "reset_url", "expires_minutes"],
    ),
    (
        "application-submitted",
        "Application Submitted",
        "Application {{reference}} received",
        "Hi {{name}},\n\nWe received your {{service}} application {{reference}}. We will update you within {{processing_days}} working days.",
        &["name", "service", "reference", "processing_days"],
    ),
    (
        "application-status",
        "Application Status Changed",
        "Application {{reference}} is now {{status}}",
        "Hi {{name}},\n\nThe status of application {{reference}} changed to {{status}}.\n\n{{note}}",
        &["name", "reference", "status", "note"],
    ),
    (
        "wallet-topup",
        "Wallet Top-up",
        "৳{{amount}} added to your wallet",
        "Hi {{name}},\n\n৳{{amount}} was credited to your wallet. New balance: ৳{{balance}}.",
        &["name", "amount", "balance"],
    ),
    (
        "ticket-reply",
        "Support Ticket Reply",
        "[{{ticket_number}}] {{subject}}",
        "Hi {{name}},\n\nOur support team replied to your ticket:\n\n{{reply}}",
        &["name", "ticket_number", "subject", "reply"],
    ),
];

pub struct EmailTemplatesLoader;

#[async_trait]
impl Loader for EmailTemplatesLoader {
    fn name(&self) -> &'static str {
        "email_templates"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::EmailTemplates]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let rows: Vec<Row> = EMAIL_TEMPLATES
            .iter()
            .map(|&(slug, name, subject, body, variables)| {
                Row::new(Table::EmailTemplates)
                    .set("slug", slug)
                    .set("name", name)
                    .set("subject", subject)
                    .set("body", body)
                    .set("variables", json!(variables))
                    .set("is_active", true)
            })
            .collect();

        ctx.seeder.seed_rows("email templates", &rows).await
    }
}

struct MenuSeed {
    slug: &'static str,
    title: &'static str,
    url: &'static str,
    location: MenuLocation,
    parent: Option<&'static str>,
}

const fn menu(
    slug: &'static str,
    title: &'static str,
    url: &'static str,
    location: MenuLocation,
    parent: Option<&'static str>,
) -> MenuSeed {
    MenuSeed {
        slug,
        title,
        url,
        location,
        parent,
    }
}

/// Parents precede their children.
#[rustfmt::skip]
const MENUS: &[MenuSeed] = &[
    menu("home", "Home", "/", MenuLocation::Header, None),
    menu("services", "Services", "/services", MenuLocation::Header, None),
    menu("services-visa", "Visa Processing", "/services/visa", MenuLocation::Header, Some("services")),
    menu("services-study", "Study Abroad", "/services/study-abroad", MenuLocation::Header, Some("services")),
    menu("services-jobs", "Overseas Jobs", "/services/jobs", MenuLocation::Header, Some("services")),
    menu("services-attestation", "Attestation", "/services/attestation", MenuLocation::Header, Some("services")),
    menu("agencies", "Agencies", "/agencies", MenuLocation::Header, None),
    menu("blog", "Blog", "/blog", MenuLocation::Header, None),
    menu("contact", "Contact", "/contact", MenuLocation::Header, None),
    menu("about", "About Us", "/about", MenuLocation::Footer, None),
    menu("privacy", "Privacy Policy", "/privacy", MenuLocation::Footer, None),
    menu("terms", "Terms of Service", "/terms", MenuLocation::Footer, None),
    menu("faq", "FAQ", "/faq", MenuLocation::Footer, None),
    menu("dashboard", "Dashboard", "/dashboard", MenuLocation::Dashboard, None),
    menu("dashboard-applications", "My Applications", "/dashboard/applications", MenuLocation::Dashboard, Some("dashboard")),
    menu("dashboard-wallet", "Wallet", "/dashboard/wallet", MenuLocation::Dashboard, Some("dashboard")),
    menu("dashboard-documents", "Documents", "/dashboard/documents", MenuLocation::Dashboard, Some("dashboard")),
    menu("dashboard-support", "Support", "/dashboard/support", MenuLocation::Dashboard, Some("dashboard")),
];

/// Navigation menus. Each child is written after its parent and points at
/// it by id.
pub struct MenusLoader;

#[async_trait]
impl Loader for MenusLoader {
    fn name(&self) -> &'static str {
        "menus"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Menus]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let mut report = LoadReport::default();

        for (i, item) in MENUS.iter().enumerate() {
            let parent_id = match item.parent {
                Some(parent) => {
                    match ctx
                        .seeder
                        .require_id(self.name(), Table::Menus, "slug", parent)
                        .await?
                    {
                        Some(id) => Some(id),
                        None => {
                            report.skip();
                            continue;
                        }
                    }
                }
                None => None,
            };

            let row = Row::new(Table::Menus)
                .set("slug", item.slug)
                .set("title", item.title)
                .set("url", item.url)
                .set("location", item.location.as_str())
                .set("parent_id", parent_id)
                .set("sort_order", i as i64 + 1)
                .set("is_active", true);
            report.record(ctx.seeder.upsert(&row).await?);
        }

        Ok(report)
    }
}

/// (page key, title, description, keywords)
#[rustfmt::skip]
const SEO_SETTINGS: &[(&str, &str, &str, &str)] = &[
    ("home", "BideshGomon | Visa, Study Abroad & Overseas Jobs", "Apply for visas, find verified agencies and track your applications from Bangladesh.", "visa bangladesh, study abroad, overseas jobs"),
    ("services", "Our Services | BideshGomon", "Visa processing, attestation, air tickets and study abroad support in one place.", "visa processing, attestation, air ticket"),
    ("agencies", "Verified Agencies | BideshGomon", "Compare licensed recruiting, travel and education agencies by rating.", "recruiting agency, travel agency, bmet"),
    ("blog", "Guides & News | BideshGomon", "Step-by-step guides on visas, language tests and working abroad.", "visa guide, ielts, work permit"),
    ("tourist-visa", "Tourist Visa Requirements | BideshGomon", "Fees, processing times and documents for tourist visas from Bangladesh.", "tourist visa, visa on arrival, e-visa"),
    ("contact", "Contact Us | BideshGomon", "Reach our support team by phone, email or ticket.", "contact, support"),
];

pub struct SeoSettingsLoader;

#[async_trait]
impl Loader for SeoSettingsLoader {
    fn name(&self) -> &'static str {
        "seo_settings"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::SeoSettings]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let rows: Vec<Row> = SEO_SETTINGS
            .iter()
            .map(|&(page_key, title, description, keywords)| {
                Row::new(Table::SeoSettings)
                    .set("page_key", page_key)
                    .set("title", title)
                    .set("description", description)
                    .set("keywords", keywords)
                    .set("og_image", format!("/images/og/{page_key}.jpg"))
            })
            .collect();

        ctx.seeder.seed_rows("seo settings", &rows).await
    }
}

/// (slug, title, placement, target url, campaign length in days)
#[rustfmt::skip]
const ADS: &[(&str, &str, &str, &str, i64)] = &[
    ("ielts-prep-banner", "IELTS preparation: 20% off this month", "home_top", "/services/ielts", 30),
    ("malaysia-jobs", "Factory jobs in Malaysia, BMET approved", "sidebar", "/jobs?country=MY", 45),
    ("umrah-package", "Umrah packages from ৳1,45,000", "home_middle", "/packages/umrah", 60),
    ("student-visa-canada", "Canada study permit consultation", "blog_inline", "/services/study-abroad", 30),
    ("air-ticket-deals", "Dhaka to Dubai from ৳38,500", "sidebar", "/air-tickets", 14),
];

/// Banner ads. Impression and click counters are demo values.
pub struct AdsLoader;

#[async_trait]
impl Loader for AdsLoader {
    fn name(&self) -> &'static str {
        "ads"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Ads]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let now = ctx.now;
        let rng = ctx.rng();

        let rows: Vec<Row> = ADS
            .iter()
            .map(|&(slug, title, placement, target_url, days)| {
                let (impressions, clicks) = impressions_and_clicks(rng);
                let starts_at = now - Duration::days(days / 3);
                Row::new(Table::Ads)
                    .set("slug", slug)
                    .set("title", title)
                    .set("placement", placement)
                    .set("image_url", format!("/images/ads/{slug}.jpg"))
                    .set("target_url", target_url)
                    .set("starts_at", starts_at)
                    .set("ends_at", starts_at + Duration::days(days))
                    .set("is_active", true)
                    .set("impressions", impressions)
                    .set("clicks", clicks)
            })
            .collect();

        ctx.seeder.seed_rows("ads", &rows).await
    }
}
