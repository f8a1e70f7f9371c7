//! Meal plan generation, confirmation and nutrition aggregation.
//!
//! Everything here is synchronous and works on data that was already fetched
//! from the stores.

pub mod aggregate;
pub mod confirm;
pub mod generator;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::model::Category;

pub use aggregate::{aggregate_by_date, DailyTargets, NutritionTotals, Progress};
pub use confirm::{confirm, CandidateDay};
pub use generator::{DailyPlan, GeneratedPlan, PlanGenerator, SlotTarget};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("catalog has {available} food items, need at least {required}")]
    InsufficientCatalog { available: usize, required: usize },

    #[error("an authenticated user is required to save a plan")]
    NotAuthenticated,
}

/// What to do for a slot whose category has no items in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Pick uniformly from the whole catalog.
    AnyItem,
    /// Leave the slot empty.
    Disabled,
}

impl FromStr for FallbackPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "any_item" => Ok(FallbackPolicy::AnyItem),
            "none" | "disabled" => Ok(FallbackPolicy::Disabled),
            other => anyhow::bail!("unknown fallback policy: {other}"),
        }
    }
}

/// Share of the daily calorie target given to each slot, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWeights {
    pub breakfast: u32,
    pub lunch: u32,
    pub dinner: u32,
    pub snack: u32,
}

impl Default for SlotWeights {
    fn default() -> Self {
        Self {
            breakfast: 25,
            lunch: 35,
            dinner: 30,
            snack: 10,
        }
    }
}

impl SlotWeights {
    pub fn percent(&self, slot: Category) -> u32 {
        match slot {
            Category::Breakfast => self.breakfast,
            Category::Lunch => self.lunch,
            Category::Dinner => self.dinner,
            Category::Snack => self.snack,
        }
    }

    pub fn sub_target(&self, daily_target: u32, slot: Category) -> u32 {
        let share = u64::from(daily_target) * u64::from(self.percent(slot)) / 100;
        u32::try_from(share).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_split_2000_kcal() {
        let w = SlotWeights::default();
        let split: Vec<u32> = Category::ALL
            .into_iter()
            .map(|c| w.sub_target(2000, c))
            .collect();
        assert_eq!(split, [500, 700, 600, 200]);
    }

    #[test]
    fn fallback_policy_parses_env_values() {
        assert_eq!("any".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::AnyItem);
        assert_eq!("None".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Disabled);
        assert!("sometimes".parse::<FallbackPolicy>().is_err());
    }
}
