//! Visa catalogue, tourist visa guide, required documents, and demo
//! applications.

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use time::Duration;
use tracing::warn;

use bidesh::models::{ApplicationStatus, VisaCategory};

use super::{Loader, SeedContext};
use crate::db::{LoadReport, Row, SeedError, Table};
use crate::generators::demo::{days_ago, money, rating, reference};

struct VisaTypeSeed {
    country: &'static str,
    slug: &'static str,
    name: &'static str,
    category: VisaCategory,
    processing_days: i64,
    fee: i64,
    currency: &'static str,
    validity_days: i64,
    documents: &'static [&'static str],
}

#[rustfmt::skip]
const VISA_TYPES: &[VisaTypeSeed] = &[
    VisaTypeSeed {
        country: "SA",
        slug: "work-visa",
        name: "Employment Visa",
        category: VisaCategory::Work,
        processing_days: 21,
        fee: 2_000,
        currency: "SAR",
        validity_days: 90,
        documents: &["passport", "visa-slip", "medical-gamca", "police-clearance", "bmet-card"],
    },
    VisaTypeSeed {
        country: "SA",
        slug: "umrah-visa",
        name: "Umrah Visa",
        category: VisaCategory::Tourist,
        processing_days: 5,
        fee: 535,
        currency: "SAR",
        validity_days: 90,
        documents: &["passport", "photo", "vaccination-meningitis"],
    },
    VisaTypeSeed {
        country: "AE",
        slug: "tourist-30-days",
        name: "30-Day Tourist Visa",
        category: VisaCategory::Tourist,
        processing_days: 4,
        fee: 350,
        currency: "AED",
        validity_days: 58,
        documents: &["passport", "photo", "return-ticket", "bank-statement"],
    },
    VisaTypeSeed {
        country: "AE",
        slug: "employment-visa",
        name: "Employment Entry Permit",
        category: VisaCategory::Work,
        processing_days: 14,
        fee: 1_200,
        currency: "AED",
        validity_days: 60,
        documents: &["passport", "photo", "offer-letter", "medical-gamca"],
    },
    VisaTypeSeed {
        country: "MY",
        slug: "work-permit",
        name: "Temporary Employment Visit Pass",
        category: VisaCategory::Work,
        processing_days: 30,
        fee: 1_850,
        currency: "MYR",
        validity_days: 365,
        documents: &["passport", "calling-visa", "medical-fomema", "police-clearance", "bmet-card"],
    },
    VisaTypeSeed {
        country: "MY",
        slug: "student-pass",
        name: "Student Pass",
        category: VisaCategory::Student,
        processing_days: 21,
        fee: 2_500,
        currency: "MYR",
        validity_days: 365,
        documents: &["passport", "offer-letter", "academic-certificates", "medical-report"],
    },
    VisaTypeSeed {
        country: "GB",
        slug: "standard-visitor",
        name: "Standard Visitor Visa",
        category: VisaCategory::Tourist,
        processing_days: 15,
        fee: 115,
        currency: "GBP",
        validity_days: 180,
        documents: &["passport", "bank-statement", "employment-letter", "tax-return"],
    },
    VisaTypeSeed {
        country: "GB",
        slug: "student-visa",
        name: "Student Visa",
        category: VisaCategory::Student,
        processing_days: 21,
        fee: 490,
        currency: "GBP",
        validity_days: 1_095,
        documents: &["passport", "cas-letter", "ielts-certificate", "bank-statement", "tb-test"],
    },
    VisaTypeSeed {
        country: "CA",
        slug: "study-permit",
        name: "Study Permit",
        category: VisaCategory::Student,
        processing_days: 56,
        fee: 150,
        currency: "CAD",
        validity_days: 730,
        documents: &["passport", "letter-of-acceptance", "gic-certificate", "ielts-certificate"],
    },
    VisaTypeSeed {
        country: "CA",
        slug: "visitor-visa",
        name: "Temporary Resident Visa",
        category: VisaCategory::Tourist,
        processing_days: 45,
        fee: 100,
        currency: "CAD",
        validity_days: 180,
        documents: &["passport", "bank-statement", "travel-history", "invitation-letter"],
    },
    VisaTypeSeed {
        country: "JP",
        slug: "student-visa",
        name: "College Student Visa",
        category: VisaCategory::Student,
        processing_days: 10,
        fee: 3_000,
        currency: "JPY",
        validity_days: 730,
        documents: &["passport", "certificate-of-eligibility", "photo"],
    },
    VisaTypeSeed {
        country: "JP",
        slug: "family-visit",
        name: "Family Visit Visa",
        category: VisaCategory::Family,
        processing_days: 7,
        fee: 3_000,
        currency: "JPY",
        validity_days: 90,
        documents: &["passport", "invitation-letter", "guarantee-letter", "relationship-proof"],
    },
];

/// Visa products per destination, keyed by (country, slug).
pub struct VisaTypesLoader;

#[async_trait]
impl Loader for VisaTypesLoader {
    fn name(&self) -> &'static str {
        "visa_types"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Countries]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::VisaTypes]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let mut report = LoadReport::default();
        let mut rows = Vec::with_capacity(VISA_TYPES.len());

        for visa in VISA_TYPES {
            let Some(country_id) = ctx
                .seeder
                .require_id(self.name(), Table::Countries, "iso2", visa.country)
                .await?
            else {
                report.skip();
                continue;
            };

            rows.push(
                Row::new(Table::VisaTypes)
                    .set("country_id", country_id)
                    .set("slug", visa.slug)
                    .set("name", visa.name)
                    .set("category", visa.category.as_str())
                    .set("processing_days", visa.processing_days)
                    .set("fee", money(visa.fee))
                    .set("fee_currency", visa.currency)
                    .set("validity_days", visa.validity_days)
                    .set("required_documents", json!(visa.documents)),
            );
        }

        report += ctx.seeder.seed_rows("visa types", &rows).await?;
        Ok(report)
    }
}

struct TouristVisaSeed {
    country: &'static str,
    stay_days: i64,
    fee: i64,
    currency: &'static str,
    processing_days: i64,
    visa_on_arrival: bool,
    e_visa: bool,
    description: &'static str,
}

#[rustfmt::skip]
const TOURIST_VISAS: &[TouristVisaSeed] = &[
    TouristVisaSeed {
        country: "NP",
        stay_days: 30,
        fee: 0,
        currency: "USD",
        processing_days: 0,
        visa_on_arrival: true,
        e_visa: false,
        description: "Free visa on arrival for SAARC nationals on their first visit in a calendar year.",
    },
    TouristVisaSeed {
        country: "BT",
        stay_days: 14,
        fee: 0,
        currency: "USD",
        processing_days: 0,
        visa_on_arrival: true,
        e_visa: false,
        description: "Entry permit issued at Phuentsholing or Paro. Sustainable development fee applies per night.",
    },
    TouristVisaSeed {
        country: "MV",
        stay_days: 30,
        fee: 0,
        currency: "USD",
        processing_days: 0,
        visa_on_arrival: true,
        e_visa: false,
        description: "Free 30-day visa on arrival with a confirmed resort or hotel booking.",
    },
    TouristVisaSeed {
        country: "LK",
        stay_days: 30,
        fee: 50,
        currency: "USD",
        processing_days: 2,
        visa_on_arrival: false,
        e_visa: true,
        description: "Electronic Travel Authorisation, apply online before departure.",
    },
    TouristVisaSeed {
        country: "TH",
        stay_days: 60,
        fee: 1_000,
        currency: "THB",
        processing_days: 10,
        visa_on_arrival: false,
        e_visa: true,
        description: "Tourist e-visa, apply online with bank statement and hotel booking.",
    },
    TouristVisaSeed {
        country: "MY",
        stay_days: 30,
        fee: 105,
        currency: "MYR",
        processing_days: 3,
        visa_on_arrival: false,
        e_visa: true,
        description: "eVISA single entry for tourism, valid three months from issue.",
    },
    TouristVisaSeed {
        country: "ID",
        stay_days: 30,
        fee: 500_000,
        currency: "IDR",
        processing_days: 0,
        visa_on_arrival: true,
        e_visa: true,
        description: "Visa on arrival at major airports, extendable once for 30 days.",
    },
    TouristVisaSeed {
        country: "AE",
        stay_days: 30,
        fee: 350,
        currency: "AED",
        processing_days: 4,
        visa_on_arrival: false,
        e_visa: true,
        description: "30-day tourist visa through an airline or licensed travel agency.",
    },
    TouristVisaSeed {
        country: "TR",
        stay_days: 30,
        fee: 60,
        currency: "USD",
        processing_days: 15,
        visa_on_arrival: false,
        e_visa: false,
        description: "Sticker visa from the embassy in Dhaka. Holders of valid US, UK or Schengen visas may apply online.",
    },
    TouristVisaSeed {
        country: "JP",
        stay_days: 15,
        fee: 3_000,
        currency: "JPY",
        processing_days: 7,
        visa_on_arrival: false,
        e_visa: false,
        description: "Single-entry temporary visitor visa through the embassy's authorised agencies.",
    },
];

/// Tourist visa guide, one entry per destination country.
pub struct TouristVisasLoader;

#[async_trait]
impl Loader for TouristVisasLoader {
    fn name(&self) -> &'static str {
        "tourist_visas"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Countries]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::TouristVisas]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let seeder = ctx.seeder;
        let mut report = LoadReport::default();
        let mut rows = Vec::with_capacity(TOURIST_VISAS.len());

        for visa in TOURIST_VISAS {
            let Some(country_id) = seeder
                .require_id(self.name(), Table::Countries, "iso2", visa.country)
                .await?
            else {
                report.skip();
                continue;
            };

            let rng = ctx.rng();
            rows.push(
                Row::new(Table::TouristVisas)
                    .set("country_id", country_id)
                    .set("stay_days", visa.stay_days)
                    .set("fee", money(visa.fee))
                    .set("fee_currency", visa.currency)
                    .set("processing_days", visa.processing_days)
                    .set("visa_on_arrival", visa.visa_on_arrival)
                    .set("e_visa", visa.e_visa)
                    .set("description", visa.description)
                    .set("rating", rating(rng))
                    .set("reviews_count", rng.gen_range(12..640_i64)),
            );
        }

        report += seeder.seed_rows("tourist visas", &rows).await?;
        Ok(report)
    }
}

/// (country, slug, name, description, applies to, mandatory)
#[rustfmt::skip]
const REQUIRED_DOCUMENTS: &[(&str, &str, &str, &str, &str, bool)] = &[
    ("SA", "passport", "Passport", "Valid for at least six months with two blank pages", "all", true),
    ("SA", "medical-gamca", "GAMCA Medical Report", "Issued by a GAMCA approved centre", "work", true),
    ("SA", "police-clearance", "Police Clearance Certificate", "From the Special Branch, attested by MoFA", "work", true),
    ("SA", "vaccination-meningitis", "Meningitis Vaccination", "ACYW135 certificate, required for Umrah", "tourist", true),
    ("AE", "passport", "Passport", "Valid for at least six months", "all", true),
    ("AE", "bank-statement", "Bank Statement", "Last six months, bank sealed", "tourist", false),
    ("MY", "passport", "Passport", "Valid for at least eighteen months for work passes", "all", true),
    ("MY", "medical-fomema", "FOMEMA Medical Screening", "Completed within 30 days of arrival", "work", true),
    ("MY", "academic-certificates", "Academic Certificates", "Attested by the Education Board and MoFA", "student", true),
    ("GB", "passport", "Passport", "Current and all previous passports", "all", true),
    ("GB", "tb-test", "TB Test Certificate", "From an IOM clinic, for stays over six months", "student", true),
    ("GB", "bank-statement", "Bank Statement", "Funds held for 28 consecutive days", "all", true),
    ("CA", "passport", "Passport", "Valid for the intended stay", "all", true),
    ("CA", "gic-certificate", "GIC Certificate", "CAD 20,635 Guaranteed Investment Certificate", "student", false),
    ("JP", "passport", "Passport", "Valid for the intended stay", "all", true),
    ("JP", "certificate-of-eligibility", "Certificate of Eligibility", "Issued by the Immigration Services Agency", "student", true),
];

pub struct RequiredDocumentsLoader;

#[async_trait]
impl Loader for RequiredDocumentsLoader {
    fn name(&self) -> &'static str {
        "required_documents"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Countries]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::RequiredDocuments]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let mut report = LoadReport::default();
        let mut rows = Vec::with_capacity(REQUIRED_DOCUMENTS.len());

        for &(country, slug, name, description, applies_to, mandatory) in REQUIRED_DOCUMENTS {
            let Some(country_id) = ctx
                .seeder
                .require_id(self.name(), Table::Countries, "iso2", country)
                .await?
            else {
                report.skip();
                continue;
            };

            rows.push(
                Row::new(Table::RequiredDocuments)
                    .set("country_id", country_id)
                    .set("slug", slug)
                    .set("name", name)
                    .set("description", description)
                    .set("applies_to", applies_to)
                    .set("is_mandatory", mandatory),
            );
        }

        report += ctx.seeder.seed_rows("required documents", &rows).await?;
        Ok(report)
    }
}

/// (applicant email, country, visa slug, status, days until travel)
#[rustfmt::skip]
const VISA_APPLICATIONS: &[(&str, &str, &str, ApplicationStatus, i64)] = &[
    ("rahim.uddin@example.com", "SA", "work-visa", ApplicationStatus::UnderReview, 45),
    ("rahim.uddin@example.com", "AE", "tourist-30-days", ApplicationStatus::Approved, 20),
    ("fatema.begum@example.com", "GB", "student-visa", ApplicationStatus::Submitted, 90),
    ("fatema.begum@example.com", "CA", "study-permit", ApplicationStatus::Draft, 150),
    ("user@bgplatform.com", "MY", "work-permit", ApplicationStatus::Rejected, 30),
    ("user@bgplatform.com", "JP", "student-visa", ApplicationStatus::Approved, 60),
];

/// Demo visa applications for the customer accounts.
pub struct VisaApplicationsLoader;

#[async_trait]
impl Loader for VisaApplicationsLoader {
    fn name(&self) -> &'static str {
        "visa_applications"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Users, Table::VisaTypes, Table::Countries]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::VisaApplications]
    }

    fn is_demo(&self) -> bool {
        true
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let seeder = ctx.seeder;
        let now = ctx.now;
        let mut report = LoadReport::default();
        let mut rows = Vec::with_capacity(VISA_APPLICATIONS.len());

        for &(email, country, slug, status, travel_in) in VISA_APPLICATIONS {
            let Some(user_id) = seeder
                .require_id(self.name(), Table::Users, "email", email)
                .await?
            else {
                report.skip();
                continue;
            };
            let Some(visa) = VISA_TYPES
                .iter()
                .find(|v| v.country == country && v.slug == slug)
            else {
                report.skip();
                continue;
            };
            let Some(country_id) = seeder
                .require_id(self.name(), Table::Countries, "iso2", country)
                .await?
            else {
                report.skip();
                continue;
            };
            // visa_types is keyed on (country_id, slug); the slug alone is not unique.
            let Some(visa_type_id) = seeder
                .find_id_by(
                    Table::VisaTypes,
                    &[("country_id", country_id.into()), ("slug", slug.into())],
                )
                .await?
            else {
                warn!(
                    "{}: visa type {country}/{slug} not seeded, skipping",
                    self.name()
                );
                report.skip();
                continue;
            };

            let rng = ctx.rng();
            let submitted_at = status
                .is_submitted()
                .then(|| days_ago(now, 2, 40, &mut *rng));
            let fee_paid = if status.is_submitted() { visa.fee } else { 0 };
            let key = format!("{email}/{country}/{slug}");

            rows.push(
                Row::new(Table::VisaApplications)
                    .set("reference", reference("VA", &key))
                    .set("user_id", user_id)
                    .set("visa_type_id", visa_type_id)
                    .set("status", status.as_str())
                    .set("travel_date", (now + Duration::days(travel_in)).date())
                    .set("submitted_at", submitted_at)
                    .set("fee_paid", money(fee_paid)),
            );
        }

        report += seeder.seed_rows("visa applications", &rows).await?;
        Ok(report)
    }
}

/// (applicant email, service, status, amount in taka, notes)
#[rustfmt::skip]
const SERVICE_APPLICATIONS: &[(&str, &str, ApplicationStatus, i64, Option<&str>)] = &[
    ("rahim.uddin@example.com", "police-clearance", ApplicationStatus::Approved, 1_500, None),
    ("rahim.uddin@example.com", "document-attestation", ApplicationStatus::UnderReview, 3_200, Some("SSC and HSC certificates")),
    ("fatema.begum@example.com", "ielts-registration", ApplicationStatus::Submitted, 26_500, Some("Academic module, Dhaka centre")),
    ("fatema.begum@example.com", "air-ticket", ApplicationStatus::Draft, 92_000, Some("DAC-LHR one way, September")),
    ("user@bgplatform.com", "passport-renewal", ApplicationStatus::Approved, 5_750, None),
    ("user@bgplatform.com", "translation", ApplicationStatus::Rejected, 800, Some("Birth certificate, unreadable scan")),
];

/// Demo service orders (attestation, tickets, test registration).
pub struct ServiceApplicationsLoader;

#[async_trait]
impl Loader for ServiceApplicationsLoader {
    fn name(&self) -> &'static str {
        "service_applications"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Users]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::ServiceApplications]
    }

    fn is_demo(&self) -> bool {
        true
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let mut report = LoadReport::default();
        let mut rows = Vec::with_capacity(SERVICE_APPLICATIONS.len());

        for &(email, service, status, amount, notes) in SERVICE_APPLICATIONS {
            let Some(user_id) = ctx
                .seeder
                .require_id(self.name(), Table::Users, "email", email)
                .await?
            else {
                report.skip();
                continue;
            };

            rows.push(
                Row::new(Table::ServiceApplications)
                    .set("reference", reference("SA", &format!("{email}/{service}")))
                    .set("user_id", user_id)
                    .set("service_type", service)
                    .set("status", status.as_str())
                    .set("amount", money(amount))
                    .set("notes", notes),
            );
        }

        report += ctx.seeder.seed_rows("service applications", &rows).await?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rust_decimal::Decimal;

    use super::*;
    use crate::db::{Repository, Value};
    use crate::loaders::accounts::{RolesLoader, UsersLoader};
    use crate::loaders::testing::{fixture_config, memory_seeder, run, run_all};

    #[tokio::test]
    async fn test_catalogue_skips_without_countries() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));

        let visas = run(&VisaTypesLoader, &seeder, &config).await;
        let tourist = run(&TouristVisasLoader, &seeder, &config).await;
        let documents = run(&RequiredDocumentsLoader, &seeder, &config).await;

        assert_eq!(visas.skipped, VISA_TYPES.len());
        assert_eq!(tourist.skipped, TOURIST_VISAS.len());
        assert_eq!(documents.skipped, REQUIRED_DOCUMENTS.len());
        assert_eq!(repo.count(Table::VisaTypes).await.unwrap(), 0);
        assert_eq!(repo.count(Table::TouristVisas).await.unwrap(), 0);
        assert_eq!(repo.count(Table::RequiredDocuments).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_applications_skip_without_visa_types() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));
        run_all(&[&RolesLoader, &UsersLoader], &seeder, &config).await;

        let visa = run(&VisaApplicationsLoader, &seeder, &config).await;
        let service = run(&ServiceApplicationsLoader, &seeder, &config).await;

        assert_eq!(visa.skipped, VISA_APPLICATIONS.len());
        assert_eq!(repo.count(Table::VisaApplications).await.unwrap(), 0);
        assert_eq!(service.created, SERVICE_APPLICATIONS.len());
    }

    #[tokio::test]
    async fn test_service_amounts_are_exact() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));
        run_all(&[&RolesLoader, &UsersLoader], &seeder, &config).await;

        run(&ServiceApplicationsLoader, &seeder, &config).await;

        let amounts: Vec<Decimal> = repo
            .column(Table::ServiceApplications, "amount")
            .iter()
            .filter_map(Value::as_decimal)
            .collect();
        assert_eq!(amounts.len(), SERVICE_APPLICATIONS.len());
        assert!(amounts.iter().all(|a| a.scale() == 2));
        assert!(amounts.contains(&Decimal::new(575_000, 2)));
    }

    #[test]
    fn test_demo_applications_reference_catalogue() {
        for &(_, country, slug, ..) in VISA_APPLICATIONS {
            assert!(
                VISA_TYPES.iter().any(|v| v.country == country && v.slug == slug),
                "no visa type {country}/{slug}"
            );
        }
    }
}
