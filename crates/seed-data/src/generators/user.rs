//! Sample customer generation with demographics.

use fake::{Fake, faker::name::en::Name};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use time::{Date, Month};

use bidesh::models::{Gender, RoleSlug};

/// A generated account ready to be seeded like a fixed demo account.
#[derive(Debug, Clone)]
pub struct GeneratedUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: RoleSlug,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<Date>,
    pub passport_number: Option<String>,
    pub address: Option<String>,
}

/// Configuration for user generation.
#[derive(Debug, Clone)]
pub struct UserGenConfig {
    /// Distribution of genders (male, female, other).
    pub gender_distribution: [f64; 3],
    /// Mean birth year.
    pub birth_year_mean: i32,
    /// Standard deviation of birth year.
    pub birth_year_std: f64,
    /// Probability that profile details are filled in.
    pub profile_fill_rate: f64,
    /// Probability that the user already holds a passport.
    pub passport_rate: f64,
    /// Districts used for addresses.
    pub districts: Vec<String>,
}

impl Default for UserGenConfig {
    fn default() -> Self {
        Self {
            // Outbound migrant workforce skews male and young
            gender_distribution: [0.68, 0.31, 0.01],
            birth_year_mean: 1994,
            birth_year_std: 7.0,
            profile_fill_rate: 0.8,
            passport_rate: 0.6,
            districts: [
                "Dhaka",
                "Chattogram",
                "Sylhet",
                "Cumilla",
                "Noakhali",
                "Brahmanbaria",
                "Tangail",
                "Khulna",
                "Rajshahi",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Generates realistic sample customers.
pub struct UserGenerator {
    config: UserGenConfig,
}

impl UserGenerator {
    /// Creates a new user generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: UserGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: UserGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single user.
    pub fn generate(&self, rng: &mut impl Rng) -> GeneratedUser {
        let name: String = Name().fake_with_rng(rng);
        let email = self.generate_email(&name, rng);
        let phone = format!(
            "+8801{}{:08}",
            rng.gen_range(3..=9),
            rng.gen_range(0..100_000_000)
        );

        let (gender, date_of_birth, passport_number, address) =
            if rng.r#gen::<f64>() < self.config.profile_fill_rate {
                let passport = (rng.r#gen::<f64>() < self.config.passport_rate)
                    .then(|| format!("A{:08}", rng.gen_range(0..100_000_000)));
                let district =
                    &self.config.districts[rng.gen_range(0..self.config.districts.len())];
                let address = format!(
                    "House {}, Road {}, {district}",
                    rng.gen_range(1..200),
                    rng.gen_range(1..30)
                );
                (
                    Some(self.generate_gender(rng)),
                    self.generate_birth_date(rng),
                    passport,
                    Some(address),
                )
            } else {
                (None, None, None, None)
            };

        GeneratedUser {
            name,
            email,
            phone,
            role: RoleSlug::User,
            gender,
            date_of_birth,
            passport_number,
            address,
        }
    }

    /// Generates multiple users with distinct emails.
    pub fn generate_batch(&self, count: usize, rng: &mut impl Rng) -> Vec<GeneratedUser> {
        let mut users: Vec<GeneratedUser> = Vec::with_capacity(count);
        while users.len() < count {
            let user = self.generate(rng);
            if users.iter().all(|u| u.email != user.email) {
                users.push(user);
            }
        }
        users
    }

    /// Generates an email from a name.
    fn generate_email(&self, name: &str, rng: &mut impl Rng) -> String {
        let normalized: String = name
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ')
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".");

        let suffix: u32 = rng.gen_range(1..9999);
        let domains = ["gmail.com", "yahoo.com", "outlook.com", "example.com"];
        let domain = domains[rng.gen_range(0..domains.len())];

        format!("{normalized}{suffix}@{domain}")
    }

    /// Generates a gender based on configured distribution.
    fn generate_gender(&self, rng: &mut impl Rng) -> Gender {
        let roll: f64 = rng.r#gen();
        let mut cumulative = 0.0;

        for (i, &weight) in self.config.gender_distribution.iter().enumerate() {
            cumulative += weight;
            if roll < cumulative {
                return match i {
                    0 => Gender::Male,
                    1 => Gender::Female,
                    _ => Gender::Other,
                };
            }
        }

        Gender::Other
    }

    /// Generates a birth date based on configured distribution.
    fn generate_birth_date(&self, rng: &mut impl Rng) -> Option<Date> {
        let normal = Normal::new(
            self.config.birth_year_mean as f64,
            self.config.birth_year_std,
        )
        .ok()?;

        // Adults only
        let year = (normal.sample(rng) as i32).clamp(1965, 2006);
        let month = Month::try_from(rng.gen_range(1..=12_u8)).ok()?;
        Date::from_calendar_date(year, month, rng.gen_range(1..=28)).ok()
    }
}

impl Default for UserGenerator {
    fn default() -> Self {
        Self::new()
    }
}
