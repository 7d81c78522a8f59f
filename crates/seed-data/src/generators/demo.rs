//! Presentation-only demo values: ratings, counters, and dates relative to now.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Returns a generator seeded from the run seed and a loader name.
///
/// Each loader draws from its own stream, so adding or reordering loaders
/// does not change another loader's values.
pub fn loader_rng(seed: u64, loader: &str) -> StdRng {
    // FNV-1a keeps the mapping stable across toolchains.
    let hash = loader.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |acc, b| {
        (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    });
    StdRng::seed_from_u64(seed ^ hash)
}

/// A star rating between 3.0 and 5.0, one decimal place, centred around 4.3.
pub fn rating(rng: &mut impl Rng) -> f64 {
    let value: f64 = Normal::new(4.3, 0.4)
        .map(|normal| normal.sample(rng))
        .unwrap_or(4.3);
    (value.clamp(3.0, 5.0) * 10.0).round() / 10.0
}

/// A random instant between `min_days` and `max_days` before `now`.
pub fn days_ago(
    now: OffsetDateTime,
    min_days: i64,
    max_days: i64,
    rng: &mut impl Rng,
) -> OffsetDateTime {
    let days = rng.gen_range(min_days..=max_days.max(min_days));
    now - Duration::days(days) - Duration::minutes(rng.gen_range(0..24 * 60))
}

/// Impressions and clicks with a click-through rate of 0.5% to 4%.
pub fn impressions_and_clicks(rng: &mut impl Rng) -> (i64, i64) {
    let impressions: i64 = rng.gen_range(1_000..50_000);
    let ctr: f64 = rng.gen_range(0.005..0.04);
    let clicks = (impressions as f64 * ctr).round() as i64;
    (impressions, clicks)
}

/// A short business reference such as `VA-3F2A9C01B4`, derived from `key`.
///
/// The same key always yields the same reference, so reruns upsert onto the
/// rows they wrote before.
pub fn reference(prefix: &str, key: &str) -> String {
    let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes());
    let mut suffix = id.simple().to_string();
    suffix.truncate(10);
    format!("{prefix}-{}", suffix.to_uppercase())
}

/// A whole-unit money amount as a two-place decimal.
pub fn money(whole: i64) -> Decimal {
    Decimal::new(whole * 100, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_rng_is_stable_per_name() {
        let a: u64 = loader_rng(1, "agencies").r#gen();
        let b: u64 = loader_rng(1, "agencies").r#gen();
        let c: u64 = loader_rng(1, "tickets").r#gen();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rating_bounds() {
        let mut rng = loader_rng(9, "ratings");
        for _ in 0..500 {
            let r = rating(&mut rng);
            assert!((3.0..=5.0).contains(&r));
            assert!(((r * 10.0).round() - r * 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rating_is_centred() {
        let mut rng = loader_rng(3, "agencies");
        let mean = (0..1_000).map(|_| rating(&mut rng)).sum::<f64>() / 1_000.0;
        assert!((4.1..4.5).contains(&mean), "mean rating {mean}");
    }

    #[test]
    fn test_money_has_two_places() {
        assert_eq!(money(1_500).to_string(), "1500.00");
        assert_eq!(money(0), Decimal::ZERO);
    }

    #[test]
    fn test_days_ago_is_in_the_past() {
        let now = OffsetDateTime::now_utc();
        let mut rng = loader_rng(9, "dates");
        for _ in 0..100 {
            let t = days_ago(now, 1, 30, &mut rng);
            assert!(t < now);
            assert!(t > now - Duration::days(32));
        }
    }

    #[test]
    fn test_reference_is_stable() {
        let a = reference("VA", "rahim.uddin@example.com/MY/work");
        let b = reference("VA", "rahim.uddin@example.com/MY/work");
        let c = reference("VA", "fatema.begum@example.com/MY/work");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 13);
        assert!(a.starts_with("VA-"));
    }

    #[test]
    fn test_clicks_never_exceed_impressions() {
        let mut rng = loader_rng(9, "ads");
        for _ in 0..100 {
            let (impressions, clicks) = impressions_and_clicks(&mut rng);
            assert!(clicks <= impressions);
        }
    }
}
