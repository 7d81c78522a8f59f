//! Countries, currencies and cities.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{info, warn};

use bidesh::models::BASE_CURRENCY;

use super::{Loader, SeedContext, open_csv};
use crate::db::{LoadReport, Row, SeedError, Table};
use crate::sources::CsvTable;

/// Columns a country row cannot do without.
const COUNTRY_REQUIRED: [&str; 3] = ["name", "iso2", "iso3"];

/// Reloads `countries` from the CSV resource.
///
/// The table is emptied and refilled in a single transaction, so ids restart
/// at 1 and rows that disappeared from the file are gone. The reload is
/// refused if a row elsewhere still points at a country id that would no
/// longer exist.
pub struct CountriesLoader;

/// Builds country rows from the CSV, returning them with the number of data
/// rows that lacked a required field or repeated an earlier iso2.
pub fn country_rows(csv: &CsvTable) -> Result<(Vec<Row>, usize), SeedError> {
    csv.require_columns(&COUNTRY_REQUIRED)?;

    let mut rows = Vec::with_capacity(csv.len());
    let mut skipped = 0;
    let mut seen = HashSet::new();
    for record in csv.rows() {
        let Some([name, iso2, iso3]) = record.required(COUNTRY_REQUIRED) else {
            warn!(
                "countries: {} line {} is missing name/iso2/iso3, skipping",
                csv.path().display(),
                record.line()
            );
            skipped += 1;
            continue;
        };

        let iso2 = iso2.to_uppercase();
        if !seen.insert(iso2.clone()) {
            warn!(
                "countries: {} line {} repeats iso2 {iso2}, skipping",
                csv.path().display(),
                record.line()
            );
            skipped += 1;
            continue;
        }

        rows.push(
            Row::new(Table::Countries)
                .set("name", name)
                .set("iso2", iso2)
                .set("iso3", iso3.to_uppercase())
                .set("numeric_code", record.get("numeric_code"))
                .set("phone_code", record.get("phone_code"))
                .set("capital", record.get("capital"))
                .set("currency_code", record.get("currency_code"))
                .set("region", record.get("region"))
                .set("subregion", record.get("subregion"))
                .set("nationality", record.get("nationality"))
                .set("flag", record.get("flag")),
        );
    }

    Ok((rows, skipped))
}

#[async_trait]
impl Loader for CountriesLoader {
    fn name(&self) -> &'static str {
        "countries"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Countries]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let Some(csv) = open_csv(self.name(), ctx.config.countries_csv())? else {
            return Ok(LoadReport::missing_resource());
        };

        let (rows, skipped) = country_rows(&csv)?;
        let mut report = ctx
            .seeder
            .replace_rows("countries", Table::Countries, &rows)
            .await?;
        report.skipped = skipped;
        Ok(report)
    }
}

/// (code, name, symbol, taka per unit, decimal places)
const CURRENCIES: &[(&str, &str, &str, f64, i64)] = &[
    ("BDT", "Bangladeshi Taka", "৳", 1.0, 2),
    ("USD", "US Dollar", "$", 110.0, 2),
    ("EUR", "Euro", "€", 119.5, 2),
    ("GBP", "British Pound", "£", 139.8, 2),
    ("SAR", "Saudi Riyal", "﷼", 29.3, 2),
    ("AED", "UAE Dirham", "د.إ", 29.95, 2),
    ("QAR", "Qatari Riyal", "﷼", 30.2, 2),
    ("KWD", "Kuwaiti Dinar", "د.ك", 357.6, 3),
    ("OMR", "Omani Rial", "﷼", 285.7, 3),
    ("BHD", "Bahraini Dinar", ".د.ب", 291.8, 3),
    ("MYR", "Malaysian Ringgit", "RM", 23.4, 2),
    ("SGD", "Singapore Dollar", "S$", 81.6, 2),
    ("JPY", "Japanese Yen", "¥", 0.74, 0),
    ("KRW", "South Korean Won", "₩", 0.082, 0),
    ("CNY", "Chinese Yuan", "¥", 15.2, 2),
    ("INR", "Indian Rupee", "₹", 1.32, 2),
    ("CAD", "Canadian Dollar", "C$", 80.9, 2),
    ("AUD", "Australian Dollar", "A$", 72.3, 2),
    ("NZD", "New Zealand Dollar", "NZ$", 66.4, 2),
    ("CHF", "Swiss Franc", "CHF", 124.1, 2),
    ("SEK", "Swedish Krona", "kr", 10.4, 2),
    ("TRY", "Turkish Lira", "₺", 3.4, 2),
];

/// Fixed exchange-rate snapshot against the base currency.
pub struct CurrenciesLoader;

#[async_trait]
impl Loader for CurrenciesLoader {
    fn name(&self) -> &'static str {
        "currencies"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Currencies]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let rows: Vec<Row> = CURRENCIES
            .iter()
            .map(|&(code, name, symbol, rate, decimals)| {
                Row::new(Table::Currencies)
                    .set("code", code)
                    .set("name", name)
                    .set("symbol", symbol)
                    .set("exchange_rate", rate)
                    .set("decimal_places", decimals)
                    .set("is_active", true)
                    .set("is_default", code == BASE_CURRENCY)
            })
            .collect();

        ctx.seeder.seed_rows("currencies", &rows).await
    }
}

struct CitySeed {
    name: &'static str,
    state: Option<&'static str>,
    latitude: f64,
    longitude: f64,
    timezone: &'static str,
    is_capital: bool,
}

const fn city(
    name: &'static str,
    state: Option<&'static str>,
    latitude: f64,
    longitude: f64,
    timezone: &'static str,
    is_capital: bool,
) -> CitySeed {
    CitySeed {
        name,
        state,
        latitude,
        longitude,
        timezone,
        is_capital,
    }
}

/// Cities grouped by the ISO2 code of their country.
#[rustfmt::skip]
const CITIES: &[(&str, &[CitySeed])] = &[
    (
        "BD",
        &[
            city("Dhaka", Some("Dhaka"), 23.8103, 90.4125, "Asia/Dhaka", true),
            city("Chattogram", Some("Chattogram"), 22.3569, 91.7832, "Asia/Dhaka", false),
            city("Sylhet", Some("Sylhet"), 24.8949, 91.8687, "Asia/Dhaka", false),
            city("Khulna", Some("Khulna"), 22.8456, 89.5403, "Asia/Dhaka", false),
            city("Rajshahi", Some("Rajshahi"), 24.3745, 88.6042, "Asia/Dhaka", false),
            city("Cumilla", Some("Chattogram"), 23.4607, 91.1809, "Asia/Dhaka", false),
        ],
    ),
    (
        "SA",
        &[
            city("Riyadh", Some("Riyadh"), 24.7136, 46.6753, "Asia/Riyadh", true),
            city("Jeddah", Some("Makkah"), 21.4858, 39.1925, "Asia/Riyadh", false),
            city("Dammam", Some("Eastern Province"), 26.4207, 50.0888, "Asia/Riyadh", false),
        ],
    ),
    (
        "AE",
        &[
            city("Abu Dhabi", Some("Abu Dhabi"), 24.4539, 54.3773, "Asia/Dubai", true),
            city("Dubai", Some("Dubai"), 25.2048, 55.2708, "Asia/Dubai", false),
            city("Sharjah", Some("Sharjah"), 25.3463, 55.4209, "Asia/Dubai", false),
        ],
    ),
    (
        "QA",
        &[city("Doha", None, 25.2854, 51.5310, "Asia/Qatar", true)],
    ),
    (
        "KW",
        &[city("Kuwait City", None, 29.3759, 47.9774, "Asia/Kuwait", true)],
    ),
    (
        "OM",
        &[city("Muscat", Some("Muscat"), 23.5880, 58.3829, "Asia/Muscat", true)],
    ),
    (
        "MY",
        &[
            city("Kuala Lumpur", None, 3.1390, 101.6869, "Asia/Kuala_Lumpur", true),
            city("Johor Bahru", Some("Johor"), 1.4927, 103.7414, "Asia/Kuala_Lumpur", false),
        ],
    ),
    (
        "SG",
        &[city("Singapore", None, 1.3521, 103.8198, "Asia/Singapore", true)],
    ),
    (
        "GB",
        &[
            city("London", Some("England"), 51.5074, -0.1278, "Europe/London", true),
            city("Manchester", Some("England"), 53.4808, -2.2426, "Europe/London", false),
            city("Birmingham", Some("England"), 52.4862, -1.8904, "Europe/London", false),
        ],
    ),
    (
        "US",
        &[
            city("Washington", Some("District of Columbia"), 38.9072, -77.0369, "America/New_York", true),
            city("New York", Some("New York"), 40.7128, -74.0060, "America/New_York", false),
        ],
    ),
    (
        "CA",
        &[
            city("Ottawa", Some("Ontario"), 45.4215, -75.6972, "America/Toronto", true),
            city("Toronto", Some("Ontario"), 43.6532, -79.3832, "America/Toronto", false),
        ],
    ),
    (
        "AU",
        &[
            city("Canberra", Some("ACT"), -35.2809, 149.1300, "Australia/Sydney", true),
            city("Sydney", Some("New South Wales"), -33.8688, 151.2093, "Australia/Sydney", false),
            city("Melbourne", Some("Victoria"), -37.8136, 144.9631, "Australia/Melbourne", false),
        ],
    ),
    (
        "JP",
        &[city("Tokyo", Some("Tokyo"), 35.6762, 139.6503, "Asia/Tokyo", true)],
    ),
    (
        "KR",
        &[city("Seoul", None, 37.5665, 126.9780, "Asia/Seoul", true)],
    ),
    (
        "DE",
        &[
            city("Berlin", Some("Berlin"), 52.5200, 13.4050, "Europe/Berlin", true),
            city("Munich", Some("Bavaria"), 48.1351, 11.5820, "Europe/Berlin", false),
        ],
    ),
];

/// Major destination cities, attached to countries by ISO2.
pub struct CitiesLoader;

#[async_trait]
impl Loader for CitiesLoader {
    fn name(&self) -> &'static str {
        "cities"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::Countries]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::Cities]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let mut report = LoadReport::default();
        let mut rows = Vec::new();

        for (iso2, cities) in CITIES {
            let Some(country_id) = ctx
                .seeder
                .require_id(self.name(), Table::Countries, "iso2", iso2)
                .await?
            else {
                report.skipped += cities.len();
                continue;
            };

            rows.extend(cities.iter().map(|c| {
                Row::new(Table::Cities)
                    .set("country_id", country_id)
                    .set("name", c.name)
                    .set("state", c.state)
                    .set("latitude", c.latitude)
                    .set("longitude", c.longitude)
                    .set("timezone", c.timezone)
                    .set("is_capital", c.is_capital)
            }));
        }

        if rows.is_empty() {
            info!("cities: no parent countries found, nothing to seed");
            return Ok(report);
        }

        report += ctx.seeder.seed_rows("cities", &rows).await?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::db::{Repository, Value};
    use crate::loaders::testing::{fixture_config, memory_seeder, run};

    const COUNTRIES: &str = "\
name,iso2,iso3,numeric_code,phone_code,capital,currency_code,region,subregion,nationality,flag
Bangladesh,BD,BGD,050,+880,Dhaka,BDT,Asia,Southern Asia,Bangladeshi,🇧🇩
Saudi Arabia,SA,SAU,682,+966,Riyadh,SAR,Asia,Western Asia,Saudi,🇸🇦
Nowhere,,NWH,,,,,,,,
Malaysia,MY,MYS,458,+60,Kuala Lumpur,MYR,Asia,South-Eastern Asia,Malaysian,🇲🇾
";

    #[test]
    fn test_country_rows_skip_incomplete_records() {
        let csv = CsvTable::from_reader(Path::new("countries.csv"), COUNTRIES.as_bytes()).unwrap();
        let (rows, skipped) = country_rows(&csv).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_country_columns_bound_by_header() {
        let reordered = "iso3,flag,iso2,name\nBGD,🇧🇩,bd,Bangladesh\n";
        let csv = CsvTable::from_reader(Path::new("countries.csv"), reordered.as_bytes()).unwrap();
        let (rows, _) = country_rows(&csv).unwrap();

        assert_eq!(rows[0].get("iso2").and_then(|v| v.as_text()), Some("BD"));
        assert_eq!(
            rows[0].get("name").and_then(|v| v.as_text()),
            Some("Bangladesh")
        );
        assert!(rows[0].get("capital").is_some_and(|v| v.is_null()));
    }

    #[test]
    fn test_country_missing_column_is_fatal() {
        let csv = CsvTable::from_reader(Path::new("countries.csv"), "name,iso2\nX,XX\n".as_bytes())
            .unwrap();
        assert!(matches!(
            country_rows(&csv),
            Err(SeedError::InvalidResource { .. })
        ));
    }

    #[tokio::test]
    async fn test_countries_reseed_truncates_and_restores_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(crate::config::COUNTRIES_CSV);
        std::fs::write(&path, COUNTRIES).unwrap();
        let config = fixture_config(dir.path());
        let (repo, seeder) = memory_seeder();

        let first = run(&CountriesLoader, &seeder, &config).await;
        assert_eq!(first.created, 3);
        assert_eq!(first.skipped, 1);

        let second = run(&CountriesLoader, &seeder, &config).await;
        assert_eq!(second.created, 3);
        assert_eq!(repo.count(Table::Countries).await.unwrap(), 3);

        // Shrink the file: the id of the dropped third country is now stale.
        let shorter: String = COUNTRIES
            .lines()
            .take(3)
            .map(|l| format!("{l}\n"))
            .collect();
        std::fs::write(&path, shorter).unwrap();
        run(&CountriesLoader, &seeder, &config).await;
        assert_eq!(repo.count(Table::Countries).await.unwrap(), 2);

        let stale = Row::new(Table::Cities)
            .set("country_id", 3_i64)
            .set("name", "Kuala Lumpur");
        assert!(matches!(
            seeder.upsert(&stale).await,
            Err(SeedError::Constraint { .. })
        ));
    }

    #[tokio::test]
    async fn test_countries_reseed_refused_while_cities_use_dropped_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(crate::config::COUNTRIES_CSV);
        std::fs::write(&path, COUNTRIES).unwrap();
        let config = fixture_config(dir.path());
        let (repo, seeder) = memory_seeder();
        run(&CountriesLoader, &seeder, &config).await;

        let malaysia = seeder
            .find_id(Table::Countries, "iso2", "MY")
            .await
            .unwrap();
        let city = Row::new(Table::Cities)
            .set("country_id", malaysia)
            .set("name", "Kuala Lumpur");
        seeder.upsert(&city).await.unwrap();

        let shorter: String = COUNTRIES
            .lines()
            .take(3)
            .map(|l| format!("{l}\n"))
            .collect();
        std::fs::write(&path, shorter).unwrap();
        let mut ctx = SeedContext::new(&seeder, &config);
        ctx.enter(CountriesLoader.name());
        let result = CountriesLoader.load(&mut ctx).await;

        assert!(matches!(
            result,
            Err(SeedError::Constraint {
                table: Table::Cities,
                ..
            })
        ));
        assert_eq!(repo.count(Table::Countries).await.unwrap(), 3);
        let still_there = seeder
            .find_id(Table::Countries, "iso2", "MY")
            .await
            .unwrap();
        assert_eq!(still_there, malaysia);
    }

    #[test]
    fn test_country_rows_skip_repeated_iso2() {
        let data = "name,iso2,iso3\nBangladesh,BD,BGD\nBangladesh again,bd,BGX\n";
        let csv = CsvTable::from_reader(Path::new("countries.csv"), data.as_bytes()).unwrap();
        let (rows, skipped) = country_rows(&csv).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(skipped, 1);
        assert_eq!(
            rows[0].get("name").and_then(|v| v.as_text()),
            Some("Bangladesh")
        );
    }

    #[tokio::test]
    async fn test_countries_missing_file_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        let (repo, seeder) = memory_seeder();

        let report = run(&CountriesLoader, &seeder, &config).await;

        assert!(report.missing_resource);
        assert_eq!(repo.count(Table::Countries).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_currencies_have_single_default() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));

        run(&CurrenciesLoader, &seeder, &config).await;
        run(&CurrenciesLoader, &seeder, &config).await;

        assert_eq!(
            repo.count(Table::Currencies).await.unwrap(),
            CURRENCIES.len() as i64
        );
        let defaults = repo
            .column(Table::Currencies, "is_default")
            .into_iter()
            .filter(|v| *v == Value::Bool(true))
            .count();
        assert_eq!(defaults, 1);
    }

    #[tokio::test]
    async fn test_cities_skip_without_countries() {
        let (repo, seeder) = memory_seeder();
        let config = fixture_config(Path::new("."));

        let report = run(&CitiesLoader, &seeder, &config).await;

        assert_eq!(report.written(), 0);
        assert!(report.skipped > 0);
        assert_eq!(repo.count(Table::Cities).await.unwrap(), 0);
    }
}
