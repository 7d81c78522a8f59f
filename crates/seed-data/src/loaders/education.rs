//! Degrees, languages, language tests, institutions and courses.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use bidesh::models::{DegreeLevel, TextDirection};

use super::{Loader, SeedContext, open_csv};
use crate::db::{LoadReport, Row, SeedError, Table};
use crate::generators::demo::money;

/// (slug, name, name in Bangla, short name, level)
#[rustfmt::skip]
const DEGREES: &[(&str, &str, &str, &str, DegreeLevel)] = &[
    ("ssc", "Secondary School Certificate", "মাধ্যমিক স্কুল সার্টিফিকেট", "SSC", DegreeLevel::Secondary),
    ("dakhil", "Dakhil", "দাখিল", "Dakhil", DegreeLevel::Secondary),
    ("o-level", "GCE Ordinary Level", "ও লেভেল", "O Level", DegreeLevel::Secondary),
    ("hsc", "Higher Secondary Certificate", "উচ্চ মাধ্যমিক সার্টিফিকেট", "HSC", DegreeLevel::HigherSecondary),
    ("alim", "Alim", "আলিম", "Alim", DegreeLevel::HigherSecondary),
    ("a-level", "GCE Advanced Level", "এ লেভেল", "A Level", DegreeLevel::HigherSecondary),
    ("diploma-engineering", "Diploma in Engineering", "ডিপ্লোমা ইন ইঞ্জিনিয়ারিং", "Diploma", DegreeLevel::Diploma),
    ("bsc", "Bachelor of Science", "বিজ্ঞানে স্নাতক", "BSc", DegreeLevel::Bachelor),
    ("ba", "Bachelor of Arts", "কলায় স্নাতক", "BA", DegreeLevel::Bachelor),
    ("bba", "Bachelor of Business Administration", "ব্যবসায় প্রশাসনে স্নাতক", "BBA", DegreeLevel::Bachelor),
    ("mbbs", "Bachelor of Medicine, Bachelor of Surgery", "এমবিবিএস", "MBBS", DegreeLevel::Bachelor),
    ("llb", "Bachelor of Laws", "আইনে স্নাতক", "LLB", DegreeLevel::Bachelor),
    ("msc", "Master of Science", "বিজ্ঞানে স্নাতকোত্তর", "MSc", DegreeLevel::Master),
    ("ma", "Master of Arts", "কলায় স্নাতকোত্তর", "MA", DegreeLevel::Master),
    ("mba", "Master of Business Administration", "ব্যবসায় প্রশাসনে স্নাতকোত্তর", "MBA", DegreeLevel::Master),
    ("phd", "Doctor of Philosophy", "ডক্টর অব ফিলোসফি", "PhD", DegreeLevel::Doctorate),
];

pub struct DegreesLoader;

#[async_trait]
impl Loader for DegreesLoader {
    fn name(&self) -> &'static str {
        "degrees"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Degrees]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let rows: Vec<Row> = DEGREES
            .iter()
            .enumerate()
            .map(|(i, &(slug, name, name_bn, short_name, level))| {
                Row::new(Table::Degrees)
                    .set("slug", slug)
                    .set("name", name)
                    .set("name_bn", name_bn)
                    .set("short_name", short_name)
                    .set("level", level.as_str())
                    .set("sort_order", i as i64 + 1)
            })
            .collect();

        ctx.seeder.seed_rows("degrees", &rows).await
    }
}

/// (ISO 639-1 code, English name, native name, direction)
const LANGUAGES: &[(&str, &str, &str, TextDirection)] = &[
    ("bn", "Bengali", "বাংলা", TextDirection::Ltr),
    ("en", "English", "English", TextDirection::Ltr),
    ("ar", "Arabic", "العربية", TextDirection::Rtl),
    ("hi", "Hindi", "हिन्दी", TextDirection::Ltr),
    ("ur", "Urdu", "اردو", TextDirection::Rtl),
    ("ms", "Malay", "Bahasa Melayu", TextDirection::Ltr),
    ("ja", "Japanese", "日本語", TextDirection::Ltr),
    ("ko", "Korean", "한국어", TextDirection::Ltr),
    ("zh", "Chinese", "中文", TextDirection::Ltr),
    ("de", "German", "Deutsch", TextDirection::Ltr),
    ("fr", "French", "Français", TextDirection::Ltr),
    ("it", "Italian", "Italiano", TextDirection::Ltr),
    ("es", "Spanish", "Español", TextDirection::Ltr),
    ("tr", "Turkish", "Türkçe", TextDirection::Ltr),
];

pub struct LanguagesLoader;

#[async_trait]
impl Loader for LanguagesLoader {
    fn name(&self) -> &'static str {
        "languages"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Languages]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let rows: Vec<Row> = LANGUAGES
            .iter()
            .map(|&(code, name, native_name, direction)| {
                Row::new(Table::Languages)
                    .set("code", code)
                    .set("name", name)
                    .set("native_name", native_name)
                    .set("direction", direction.as_str())
            })
            .collect();

        ctx.seeder.seed_rows("languages", &rows).await
    }
}

const LANGUAGE_TEST_REQUIRED: [&str; 3] = ["code", "name", "language_code"];

/// Proficiency tests (IELTS, JLPT, ...) read from the CSV resource and
/// attached to their language by ISO code.
pub struct LanguageTestsLoader;

#[async_trait]
impl Loader for LanguageTestsLoader {
    fn name(&self) -> &'static str {
        "language_tests"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Languages]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::LanguageTests]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let Some(csv) = open_csv(self.name(), ctx.config.language_tests_csv())? else {
            return Ok(LoadReport::missing_resource());
        };
        csv.require_columns(&LANGUAGE_TEST_REQUIRED)?;

        let mut report = LoadReport::default();
        let mut language_ids: HashMap<String, Option<i64>> = HashMap::new();
        let mut rows = Vec::with_capacity(csv.len());

        for record in csv.rows() {
            let Some([code, name, language_code]) = record.required(LANGUAGE_TEST_REQUIRED) else {
                warn!(
                    "language_tests: line {} is missing code/name/language_code, skipping",
                    record.line()
                );
                report.skip();
                continue;
            };

            let language_code = language_code.to_lowercase();
            let cached = language_ids.get(&language_code).copied();
            let language_id = match cached {
                Some(id) => id,
                None => {
                    let id = ctx
                        .seeder
                        .require_id(self.name(), Table::Languages, "code", &language_code)
                        .await?;
                    language_ids.insert(language_code, id);
                    id
                }
            };
            let Some(language_id) = language_id else {
                report.skip();
                continue;
            };

            rows.push(
                Row::new(Table::LanguageTests)
                    .set("code", code.to_lowercase())
                    .set("name", name)
                    .set("language_id", language_id)
                    .set("min_score", record.parse::<f64>("min_score"))
                    .set("max_score", record.parse::<f64>("max_score"))
                    .set("validity_years", record.parse::<i64>("validity_years"))
                    .set("website", record.get("website")),
            );
        }

        report += ctx.seeder.seed_rows("language tests", &rows).await?;
        Ok(report)
    }
}

#[rustfmt::skip]
const INSTITUTION_TYPES: &[(&str, &str, &str)] = &[
    ("public-university", "Public University", "Government funded degree-awarding university"),
    ("private-university", "Private University", "Independently funded degree-awarding university"),
    ("college", "College", "Undergraduate or pre-university college"),
    ("language-school", "Language School", "Language training and test preparation centre"),
    ("vocational-institute", "Vocational Institute", "Technical and trade skills training"),
    ("polytechnic", "Polytechnic", "Applied science and engineering institute"),
];

pub struct InstitutionTypesLoader;

#[async_trait]
impl Loader for InstitutionTypesLoader {
    fn name(&self) -> &'static str {
        "institution_types"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::InstitutionTypes]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let rows: Vec<Row> = INSTITUTION_TYPES
            .iter()
            .map(|&(slug, name, description)| {
                Row::new(Table::InstitutionTypes)
                    .set("slug", slug)
                    .set("name", name)
                    .set("description", description)
            })
            .collect();

        ctx.seeder.seed_rows("institution types", &rows).await
    }
}

struct UniversitySeed {
    slug: &'static str,
    name: &'static str,
    country_iso2: &'static str,
    institution_type: &'static str,
    city: &'static str,
    world_ranking: Option<i64>,
    website: &'static str,
}

const UNIVERSITIES: &[UniversitySeed] = &[
    UniversitySeed {
        slug: "university-of-toronto",
        name: "University of Toronto",
        country_iso2: "CA",
        institution_type: "public-university",
        city: "Toronto",
        world_ranking: Some(21),
        website: "https://www.utoronto.ca",
    },
    UniversitySeed {
        slug: "university-of-manchester",
        name: "The University of Manchester",
        country_iso2: "GB",
        institution_type: "public-university",
        city: "Manchester",
        world_ranking: Some(32),
        website: "https://www.manchester.ac.uk",
    },
    UniversitySeed {
        slug: "university-of-melbourne",
        name: "The University of Melbourne",
        country_iso2: "AU",
        institution_type: "public-university",
        city: "Melbourne",
        world_ranking: Some(14),
        website: "https://www.unimelb.edu.au",
    },
    UniversitySeed {
        slug: "technical-university-of-munich",
        name: "Technical University of Munich",
        country_iso2: "DE",
        institution_type: "public-university",
        city: "Munich",
        world_ranking: Some(37),
        website: "https://www.tum.de",
    },
    UniversitySeed {
        slug: "universiti-malaya",
        name: "Universiti Malaya",
        country_iso2: "MY",
        institution_type: "public-university",
        city: "Kuala Lumpur",
        world_ranking: Some(65),
        website: "https://www.um.edu.my",
    },
    UniversitySeed {
        slug: "taylors-university",
        name: "Taylor's University",
        country_iso2: "MY",
        institution_type: "private-university",
        city: "Subang Jaya",
        world_ranking: Some(284),
        website: "https://university.taylors.edu.my",
    },
    UniversitySeed {
        slug: "tokyo-kogakuin-japanese-school",
        name: "Tokyo Kogakuin Japanese Language School",
        country_iso2: "JP",
        institution_type: "language-school",
        city: "Tokyo",
        world_ranking: None,
        website: "https://www.technosac.ac.jp",
    },
];

/// (university slug, course slug, name, degree slug, months, tuition, currency, intake)
#[rustfmt::skip]
const COURSES: &[(&str, &str, &str, &str, i64, i64, &str, &str)] = &[
    ("university-of-toronto", "msc-computer-science", "MSc Computer Science", "msc", 20, 62_000, "CAD", "September"),
    ("university-of-toronto", "mba", "Rotman MBA", "mba", 20, 128_000, "CAD", "August"),
    ("university-of-manchester", "msc-data-science", "MSc Data Science", "msc", 12, 33_500, "GBP", "September"),
    ("university-of-manchester", "bsc-accounting", "BSc Accounting and Finance", "bsc", 36, 28_000, "GBP", "September"),
    ("university-of-melbourne", "master-of-engineering", "Master of Engineering (Civil)", "msc", 36, 52_000, "AUD", "February, July"),
    ("university-of-melbourne", "phd-public-health", "PhD in Public Health", "phd", 48, 48_000, "AUD", "Rolling"),
    ("technical-university-of-munich", "msc-informatics", "MSc Informatics", "msc", 24, 6_000, "EUR", "October, April"),
    ("universiti-malaya", "bba-international-business", "BBA International Business", "bba", 36, 9_500, "MYR", "September, February"),
    ("taylors-university", "diploma-hospitality", "Diploma in Hospitality Management", "diploma-engineering", 30, 45_000, "MYR", "January, April, August"),
    ("tokyo-kogakuin-japanese-school", "japanese-two-year", "Two-Year Japanese Language Course", "hsc", 24, 1_560_000, "JPY", "April, October"),
];

pub struct UniversitiesLoader;

#[async_trait]
impl Loader for UniversitiesLoader {
    fn name(&self) -> &'static str {
        "universities"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Countries, Table::InstitutionTypes]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Universities]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let mut report = LoadReport::default();
        let mut rows = Vec::with_capacity(UNIVERSITIES.len());

        for uni in UNIVERSITIES {
            let seeder = ctx.seeder;
            let country_id = seeder
                .require_id(self.name(), Table::Countries, "iso2", uni.country_iso2)
                .await?;
            let type_id = seeder
                .require_id(
                    self.name(),
                    Table::InstitutionTypes,
                    "slug",
                    uni.institution_type,
                )
                .await?;
            let (Some(country_id), Some(type_id)) = (country_id, type_id) else {
                report.skip();
                continue;
            };

            rows.push(
                Row::new(Table::Universities)
                    .set("slug", uni.slug)
                    .set("name", uni.name)
                    .set("country_id", country_id)
                    .set("institution_type_id", type_id)
                    .set("city", uni.city)
                    .set("world_ranking", uni.world_ranking)
                    .set("website", uni.website),
            );
        }

        report += ctx.seeder.seed_rows("universities", &rows).await?;
        Ok(report)
    }
}

pub struct CoursesLoader;

#[async_trait]
impl Loader for CoursesLoader {
    fn name(&self) -> &'static str {
        "courses"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Universities, Table::Degrees]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Courses]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let mut report = LoadReport::default();
        let mut rows = Vec::with_capacity(COURSES.len());

        for &(university, slug, name, degree, months, tuition, currency, intake) in COURSES {
            let seeder = ctx.seeder;
            let university_id = seeder
                .require_id(self.name(), Table::Universities, "slug", university)
                .await?;
            let degree_id = seeder
                .require_id(self.name(), Table::Degrees, "slug", degree)
                .await?;
            let (Some(university_id), Some(degree_id)) = (university_id, degree_id) else {
                report.skip();
                continue;
            };

            rows.push(
                Row::new(Table::Courses)
                    .set("university_id", university_id)
                    .set("slug", slug)
                    .set("name", name)
                    .set("degree_id", degree_id)
                    .set("duration_months", months)
                    .set("tuition_fee", money(tuition))
                    .set("currency_code", currency)
                    .set("intake", intake),
            );
        }

        report += ctx.seeder.seed_rows("courses", &rows).await?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LANGUAGE_TESTS_CSV;
    use crate::db::Repository;
    use crate::loaders::testing::{fixture_config, memory_seeder, run};

    const TESTS_CSV: &str = "\
code,name,language_code,min_score,max_score,validity_years,website
ielts,International English Language Testing System,en,0,9,2,https://www.ielts.org
jlpt,Japanese-Language Proficiency Test,ja,,,,
broken,Missing language,,0,9,2,
klingon,Klingon Proficiency,tlh,0,100,1,
";

    #[tokio::test]
    async fn test_language_tests_skip_incomplete_and_orphan_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LANGUAGE_TESTS_CSV);
        std::fs::write(&path, TESTS_CSV).unwrap();
        let config = fixture_config(dir.path());
        let (repo, seeder) = memory_seeder();

        run(&LanguagesLoader, &seeder, &config).await;
        let report = run(&LanguageTestsLoader, &seeder, &config).await;

        // Four data rows: one lacks a language code, one names an unknown language.
        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(repo.count(Table::LanguageTests).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_language_tests_without_languages_insert_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LANGUAGE_TESTS_CSV);
        std::fs::write(&path, TESTS_CSV).unwrap();
        let config = fixture_config(dir.path());
        let (repo, seeder) = memory_seeder();

        let report = run(&LanguageTestsLoader, &seeder, &config).await;

        assert_eq!(report.written(), 0);
        assert_eq!(repo.count(Table::LanguageTests).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bundled_language_tests_all_resolve() {
        let config = crate::config::SeedConfig::default();
        let (_, seeder) = memory_seeder();

        run(&LanguagesLoader, &seeder, &config).await;
        let report = run(&LanguageTestsLoader, &seeder, &config).await;

        assert!(report.created > 0);
        assert_eq!(report.skipped, 0);
    }

    #[tokio::test]
    async fn test_courses_reference_existing_degrees() {
        let (_, seeder) = memory_seeder();
        let config = fixture_config(std::path::Path::new("."));

        run(&DegreesLoader, &seeder, &config).await;
        for &(_, _, _, degree, ..) in COURSES {
            let id = seeder
                .find_id(Table::Degrees, "slug", degree)
                .await
                .unwrap();
            assert!(id.is_some(), "unknown degree {degree}");
        }
    }

    #[tokio::test]
    async fn test_courses_skip_without_universities() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(std::path::Path::new("."));

        run(&DegreesLoader, &seeder, &config).await;
        let report = run(&CoursesLoader, &seeder, &config).await;

        assert_eq!(report.skipped, COURSES.len());
        assert_eq!(repo.count(Table::Courses).await.unwrap(), 0);
    }
}
