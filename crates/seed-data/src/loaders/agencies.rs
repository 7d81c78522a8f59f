//! Recruiting, travel and education agencies, each owned by a seeded account.

use async_trait::async_trait;
use rand::Rng;

use super::{Loader, SeedContext};
use crate::db::{LoadReport, Row, SeedError, Table};
use crate::generators::demo::rating;

struct AgencySeed {
    license_number: &'static str,
    slug: &'static str,
    name: &'static str,
    owner_email: &'static str,
    agency_type: &'static str,
    country: &'static str,
    email: &'static str,
    phone: &'static str,
    address: &'static str,
    is_verified: bool,
}

const AGENCIES: &[AgencySeed] = &[
    AgencySeed {
        license_number: "RL-1287",
        slug: "bg-overseas",
        name: "BG Overseas Recruiting",
        owner_email: "agency@bgplatform.com",
        agency_type: "recruiting-agency",
        country: "BD",
        email: "info@bgoverseas.com.bd",
        phone: "+8801711000111",
        address: "Purana Paltan, Dhaka 1000",
        is_verified: true,
    },
    AgencySeed {
        license_number: "TA-0456",
        slug: "sky-travels",
        name: "Sky Travels Ltd",
        owner_email: "skytravels@example.com",
        agency_type: "travel-agency",
        country: "BD",
        email: "booking@skytravels.com.bd",
        phone: "+8801555123456",
        address: "Gulshan Avenue, Dhaka 1212",
        is_verified: true,
    },
    AgencySeed {
        license_number: "EC-2210",
        slug: "global-study-partners",
        name: "Global Study Partners",
        owner_email: "globalstudy@example.com",
        agency_type: "education-consultancy",
        country: "BD",
        email: "admissions@globalstudy.com.bd",
        phone: "+8801666789012",
        address: "Dhanmondi 27, Dhaka 1209",
        is_verified: false,
    },
    AgencySeed {
        license_number: "HU-0098",
        slug: "sky-hajj-umrah",
        name: "Sky Hajj & Umrah Services",
        owner_email: "skytravels@example.com",
        agency_type: "hajj-umrah",
        country: "BD",
        email: "umrah@skytravels.com.bd",
        phone: "+8801555123457",
        address: "Naya Paltan, Dhaka 1000",
        is_verified: true,
    },
];

/// Agencies, each owned by an agency account.
pub struct AgenciesLoader;

#[async_trait]
impl Loader for AgenciesLoader {
    fn name(&self) -> &'static str {
        "agencies"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Users, Table::AgencyTypes, Table::Countries]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Agencies]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let seeder = ctx.seeder;
        let mut report = LoadReport::default();
        let mut rows = Vec::with_capacity(AGENCIES.len());

        for agency in AGENCIES {
            let owner_id = seeder
                .require_id(self.name(), Table::Users, "email", agency.owner_email)
                .await?;
            let type_id = seeder
                .require_id(self.name(), Table::AgencyTypes, "slug", agency.agency_type)
                .await?;
            let country_id = seeder
                .require_id(self.name(), Table::Countries, "iso2", agency.country)
                .await?;
            let (Some(owner_id), Some(type_id), Some(country_id)) = (owner_id, type_id, country_id)
            else {
                report.skip();
                continue;
            };

            let rng = ctx.rng();
            rows.push(
                Row::new(Table::Agencies)
                    .set("license_number", agency.license_number)
                    .set("slug", agency.slug)
                    .set("name", agency.name)
                    .set("user_id", owner_id)
                    .set("agency_type_id", type_id)
                    .set("country_id", country_id)
                    .set("email", agency.email)
                    .set("phone", agency.phone)
                    .set("address", agency.address)
                    .set("rating", rating(rng))
                    .set("reviews_count", rng.gen_range(5..420_i64))
                    .set("is_verified", agency.is_verified),
            );
        }

        report += seeder.seed_rows("agencies", &rows).await?;
        Ok(report)
    }
}
