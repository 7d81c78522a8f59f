//! Lookup taxonomies: agency types, relationship types and skills.

use async_trait::async_trait;

use super::{Loader, SeedContext};
use crate::db::{LoadReport, Row, SeedError, Table};

/// (slug, name, description, icon)
#[rustfmt::skip]
const AGENCY_TYPES: &[(&str, &str, &str, &str)] = &[
    ("recruiting-agency", "Recruiting Agency", "BMET licensed overseas employment recruiter", "briefcase"),
    ("travel-agency", "Travel Agency", "Air ticketing, tour packages and hotel booking", "plane"),
    ("education-consultancy", "Education Consultancy", "Student admission and study visa support", "graduation-cap"),
    ("visa-processing", "Visa Processing Centre", "Visa application filing and document handling", "passport"),
    ("hajj-umrah", "Hajj & Umrah Agency", "Government approved Hajj and Umrah operator", "kaaba"),
    ("immigration-consultancy", "Immigration Consultancy", "Permanent residency and skilled migration advice", "globe"),
    ("document-attestation", "Document Attestation", "Certificate attestation and translation services", "stamp"),
];

pub struct AgencyTypesLoader;

#[async_trait]
impl Loader for AgencyTypesLoader {
    fn name(&self) -> &'static str {
        "agency_types"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::AgencyTypes]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let rows: Vec<Row> = AGENCY_TYPES
            .iter()
            .enumerate()
            .map(|(i, &(slug, name, description, icon))| {
                Row::new(Table::AgencyTypes)
                    .set("slug", slug)
                    .set("name", name)
                    .set("description", description)
                    .set("icon", icon)
                    .set("sort_order", i as i64 + 1)
                    .set("is_active", true)
            })
            .collect();

        ctx.seeder.seed_rows("agency types", &rows).await
    }
}

/// (slug, name, name in Bangla, category)
#[rustfmt::skip]
const RELATIONSHIP_TYPES: &[(&str, &str, &str, &str)] = &[
    ("father", "Father", "পিতা", "family"),
    ("mother", "Mother", "মাতা", "family"),
    ("spouse", "Spouse", "স্বামী/স্ত্রী", "family"),
    ("son", "Son", "পুত্র", "family"),
    ("daughter", "Daughter", "কন্যা", "family"),
    ("brother", "Brother", "ভাই", "family"),
    ("sister", "Sister", "বোন", "family"),
    ("uncle", "Uncle", "চাচা/মামা", "extended_family"),
    ("aunt", "Aunt", "চাচী/মামী", "extended_family"),
    ("cousin", "Cousin", "চাচাতো/মামাতো ভাই-বোন", "extended_family"),
    ("guardian", "Legal Guardian", "অভিভাবক", "legal"),
    ("sponsor", "Sponsor", "স্পন্সর", "legal"),
    ("employer", "Employer", "নিয়োগকর্তা", "professional"),
    ("friend", "Friend", "বন্ধু", "other"),
];

pub struct RelationshipTypesLoader;

#[async_trait]
impl Loader for RelationshipTypesLoader {
    fn name(&self) -> &'static str {
        "relationship_types"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::RelationshipTypes]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let rows: Vec<Row> = RELATIONSHIP_TYPES
            .iter()
            .map(|&(slug, name, name_bn, category)| {
                Row::new(Table::RelationshipTypes)
                    .set("slug", slug)
                    .set("name", name)
                    .set("name_bn", name_bn)
                    .set("category", category)
            })
            .collect();

        ctx.seeder.seed_rows("relationship types", &rows).await
    }
}

/// Skill categories with their skills as (slug, name).
const SKILLS: &[((&str, &str), &[(&str, &str)])] = &[
    (
        ("construction", "Construction"),
        &[
            ("masonry", "Masonry"),
            ("steel-fixing", "Steel Fixing"),
            ("carpentry", "Carpentry"),
            ("plumbing", "Plumbing"),
            ("scaffolding", "Scaffolding"),
        ],
    ),
    (
        ("electrical", "Electrical & Mechanical"),
        &[
            ("electrician", "Electrician"),
            ("hvac-technician", "HVAC Technician"),
            ("welding", "Welding"),
            ("auto-mechanic", "Auto Mechanic"),
        ],
    ),
    (
        ("hospitality", "Hospitality"),
        &[
            ("cooking", "Cooking"),
            ("housekeeping", "Housekeeping"),
            ("waiter-service", "Waiter Service"),
            ("front-desk", "Front Desk"),
        ],
    ),
    (
        ("driving", "Driving & Logistics"),
        &[
            ("light-vehicle-driving", "Light Vehicle Driving"),
            ("heavy-vehicle-driving", "Heavy Vehicle Driving"),
            ("forklift-operation", "Forklift Operation"),
        ],
    ),
    (
        ("healthcare", "Healthcare"),
        &[
            ("nursing", "Nursing"),
            ("caregiving", "Caregiving"),
            ("pharmacy-assistant", "Pharmacy Assistant"),
        ],
    ),
    (
        ("it", "Information Technology"),
        &[
            ("web-development", "Web Development"),
            ("mobile-development", "Mobile Development"),
            ("network-administration", "Network Administration"),
            ("graphic-design", "Graphic Design"),
        ],
    ),
    (
        ("languages", "Languages"),
        &[
            ("english-speaking", "Spoken English"),
            ("arabic-speaking", "Spoken Arabic"),
            ("japanese-speaking", "Spoken Japanese"),
        ],
    ),
];

/// Skill categories, then skills attached to their category by slug.
pub struct SkillsLoader;

#[async_trait]
impl Loader for SkillsLoader {
    fn name(&self) -> &'static str {
        "skills"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::SkillCategories, Table::Skills]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let categories: Vec<Row> = SKILLS
            .iter()
            .map(|&((slug, name), _)| {
                Row::new(Table::SkillCategories)
                    .set("slug", slug)
                    .set("name", name)
            })
            .collect();
        let mut report = ctx.seeder.seed_rows("skill categories", &categories).await?;

        let mut skills = Vec::new();
        for &((category, _), entries) in SKILLS {
            let Some(category_id) = ctx
                .seeder
                .require_id(self.name(), Table::SkillCategories, "slug", category)
                .await?
            else {
                report.skipped += entries.len();
                continue;
            };

            skills.extend(entries.iter().map(|&(slug, name)| {
                Row::new(Table::Skills)
                    .set("slug", slug)
                    .set("name", name)
                    .set("category_id", category_id)
            }));
        }

        report += ctx.seeder.seed_rows("skills", &skills).await?;
        Ok(report)
    }
}
