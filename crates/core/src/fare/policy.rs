use serde::{Deserialize, Serialize};

/// Distance tiers of the base fare.
///
/// Up to `base_distance` the flat `base_fare` applies. Up to `middle_limit`
/// every started `middle_unit` adds `middle_fare_per_unit`; beyond it every
/// started `long_unit` adds `long_fare_per_unit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareSchedule {
    /// Flat fare for short rides.
    pub base_fare: i64,
    /// Longest distance covered by the flat fare.
    pub base_distance: i64,
    /// Upper bound of the middle tier.
    pub middle_limit: i64,
    /// Charging increment inside the middle tier.
    pub middle_unit: i64,
    /// Charging increment beyond the middle tier.
    pub long_unit: i64,
    /// Amount charged per started middle increment.
    pub middle_fare_per_unit: i64,
    /// Amount charged per started long increment.
    pub long_fare_per_unit: i64,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            base_fare: 1250,
            base_distance: 10,
            middle_limit: 50,
            middle_unit: 5,
            long_unit: 8,
            middle_fare_per_unit: 100,
            long_fare_per_unit: 100,
        }
    }
}

impl FareSchedule {
    /// Base fare for a ride of `distance`.
    pub fn base_fare(&self, distance: i64) -> i64 {
        let middle = distance.min(self.middle_limit) - self.base_distance;
        let long = distance - self.middle_limit;
        self.base_fare
            + started_units(middle, self.middle_unit) * self.middle_fare_per_unit
            + started_units(long, self.long_unit) * self.long_fare_per_unit
    }
}

fn started_units(distance: i64, unit: i64) -> i64 {
    if distance <= 0 || unit <= 0 {
        return 0;
    }
    (distance + unit - 1) / unit
}

/// Deduction and rate applied to a fare.
///
/// The rider pays `fare - (fare - deduction) * rate_percent / 100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountPolicy {
    /// Fixed amount exempt from the discount.
    #[serde(default)]
    pub deduction: i64,
    /// Share of the remaining fare taken off, in percent.
    #[serde(default)]
    pub rate_percent: i64,
}

impl DiscountPolicy {
    /// Discounted fare, clamped at zero.
    pub fn apply(&self, fare: i64) -> i64 {
        let discount = (fare - self.deduction).max(0) * self.rate_percent / 100;
        (fare - discount).max(0)
    }
}

/// Half-open age range `[min_age, max_age)` and the policy riders in it get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBracket {
    /// Youngest age in the bracket.
    #[serde(default)]
    pub min_age: u32,
    /// First age past the bracket; open-ended when absent.
    #[serde(default)]
    pub max_age: Option<u32>,
    /// Fixed amount exempt from the discount.
    #[serde(default)]
    pub deduction: i64,
    /// Share of the remaining fare taken off, in percent.
    #[serde(default)]
    pub rate_percent: i64,
}

impl AgeBracket {
    /// Whether `age` falls inside the bracket.
    pub fn matches(&self, age: u32) -> bool {
        age >= self.min_age && self.max_age.map_or(true, |max| age < max)
    }

    /// Discount granted to riders in the bracket.
    pub fn policy(&self) -> DiscountPolicy {
        DiscountPolicy {
            deduction: self.deduction,
            rate_percent: self.rate_percent,
        }
    }

    /// Infants ride free, children get 50% and teenagers 20% off after a 350 deduction.
    pub fn defaults() -> Vec<AgeBracket> {
        vec![
            AgeBracket {
                min_age: 0,
                max_age: Some(6),
                deduction: 0,
                rate_percent: 100,
            },
            AgeBracket {
                min_age: 6,
                max_age: Some(13),
                deduction: 350,
                rate_percent: 50,
            },
            AgeBracket {
                min_age: 13,
                max_age: Some(19),
                deduction: 350,
                rate_percent: 20,
            },
        ]
    }
}
