//! Fare computation: distance tiers, line surcharge and age discount.

mod policy;

pub use policy::{AgeBracket, DiscountPolicy, FareSchedule};

use std::collections::HashMap;

use crate::{
    error::{Result, SubwayError},
    models::{Line, LineId},
};

/// Pure fare calculator built from a fare schedule and age brackets.
#[derive(Debug, Clone, PartialEq)]
pub struct FareCalculator {
    schedule: FareSchedule,
    brackets: Vec<AgeBracket>,
}

impl Default for FareCalculator {
    fn default() -> Self {
        Self::new(FareSchedule::default(), AgeBracket::defaults())
    }
}

impl FareCalculator {
    /// Build a calculator; brackets are matched in order.
    pub fn new(schedule: FareSchedule, brackets: Vec<AgeBracket>) -> Self {
        Self { schedule, brackets }
    }

    /// Distance-tiered fare before surcharge and discount.
    pub fn base_fare(&self, distance: i64) -> i64 {
        self.schedule.base_fare(distance)
    }

    /// Largest extra fare among the lines ridden; riding nothing costs nothing.
    pub fn line_surcharge(&self, line_ids: &[LineId], lines: &[Line]) -> Result<i64> {
        let extra_fares: HashMap<LineId, i64> =
            lines.iter().map(|line| (line.id, line.extra_fare)).collect();
        line_ids.iter().try_fold(0, |max, &line| {
            extra_fares
                .get(&line)
                .map(|&extra| max.max(extra))
                .ok_or(SubwayError::LineNotRegistered { line })
        })
    }

    /// Discount policy that applies to a rider of `age`.
    pub fn discount_policy(&self, age: u32) -> DiscountPolicy {
        self.brackets
            .iter()
            .find(|bracket| bracket.matches(age))
            .map(AgeBracket::policy)
            .unwrap_or_default()
    }

    /// Fare after the age discount, never below zero.
    pub fn age_discount(&self, age: u32, fare_before_discount: i64) -> i64 {
        self.discount_policy(age).apply(fare_before_discount)
    }

    /// `age_discount(age, base_fare(distance) + line_surcharge(line_ids, lines))`.
    pub fn calculate(
        &self,
        distance: i64,
        age: u32,
        line_ids: &[LineId],
        lines: &[Line],
    ) -> Result<i64> {
        let surcharge = self.line_surcharge(line_ids, lines)?;
        Ok(self.age_discount(age, self.base_fare(distance) + surcharge))
    }
}
