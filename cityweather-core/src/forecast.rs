//! Reduction of fine-grained forecast samples to one entry per day.

use chrono::{DateTime, Timelike, Utc};

use crate::model::{ForecastEntry, ForecastSet};

impl ForecastSet {
    /// Keeps samples taken exactly at 12:00:00, earliest first, one per calendar
    /// day, and at most [`ForecastSet::MAX_DAYS`] of them.
    pub fn from_samples(mut samples: Vec<ForecastEntry>) -> Self {
        samples.retain(|s| is_midday(s.timestamp));
        samples.sort_by_key(|s| s.timestamp);
        samples.dedup_by_key(|s| s.timestamp.date_naive());
        samples.truncate(Self::MAX_DAYS);
        Self(samples)
    }
}

fn is_midday(ts: DateTime<Utc>) -> bool {
    ts.hour() == 12 && ts.minute() == 0 && ts.second() == 0 && ts.nanosecond() == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(day: u32, hour: u32, temp: f64) -> ForecastEntry {
        ForecastEntry {
            timestamp: Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap(),
            temperature_c: temp,
            description: "few clouds".to_string(),
        }
    }

    fn three_hourly(days: u32) -> Vec<ForecastEntry> {
        (1..=days)
            .flat_map(|d| {
                (0..24)
                    .step_by(3)
                    .map(move |h| sample(d, h, f64::from(d * 100 + h)))
            })
            .collect()
    }

    #[test]
    fn keeps_only_midday_samples() {
        let set = ForecastSet::from_samples(three_hourly(3));

        assert_eq!(set.len(), 3);
        assert!(set.iter().all(|e| e.timestamp.hour() == 12));
        assert_eq!(set.entries()[0].temperature_c, 112.0);
    }

    #[test]
    fn caps_at_five_days() {
        let set = ForecastSet::from_samples(three_hourly(6));

        assert_eq!(set.len(), ForecastSet::MAX_DAYS);
        let last = set.entries().last().unwrap();
        assert_eq!(last.timestamp.date_naive().to_string(), "2025-03-05");
    }

    #[test]
    fn orders_and_deduplicates_by_day() {
        let samples = vec![
            sample(4, 12, 4.0),
            sample(2, 12, 2.0),
            sample(4, 12, 40.0),
            sample(3, 12, 3.0),
        ];
        let set = ForecastSet::from_samples(samples);

        let temps: Vec<f64> = set.iter().map(|e| e.temperature_c).collect();
        assert_eq!(temps, vec![2.0, 3.0, 4.0]);
        assert!(set.entries().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn ignores_near_midday_samples() {
        let off = ForecastEntry {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 1).unwrap(),
            temperature_c: 1.0,
            description: "mist".to_string(),
        };
        let set = ForecastSet::from_samples(vec![off, sample(1, 11, 1.0), sample(1, 13, 1.0)]);

        assert!(set.is_empty());
    }
}
