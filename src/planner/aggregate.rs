use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::catalog::model::FoodItem;
use crate::plans::model::PlannedMeal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: u64,
    pub protein: u64,
    pub carbs: u64,
    pub fat: u64,
}

impl NutritionTotals {
    /// Adds one food; a missing food adds nothing.
    pub fn add_food(&mut self, food: Option<&FoodItem>) {
        if let Some(f) = food {
            self.calories += u64::from(f.calories);
            self.protein += u64::from(f.protein);
            self.carbs += u64::from(f.carbs);
            self.fat += u64::from(f.fat);
        }
    }

    pub fn from_foods<'a>(foods: impl IntoIterator<Item = Option<&'a FoodItem>>) -> Self {
        let mut totals = Self::default();
        for food in foods {
            totals.add_food(food);
        }
        totals
    }

    pub fn progress(&self, targets: &DailyTargets) -> Progress {
        Progress {
            calories: percent_of(self.calories, targets.calories),
            protein: percent_of(self.protein, targets.protein),
            carbs: percent_of(self.carbs, targets.carbs),
            fat: percent_of(self.fat, targets.fat),
        }
    }
}

/// Daily nutrition goals shown against the day's totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTargets {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

impl Default for DailyTargets {
    fn default() -> Self {
        Self {
            calories: 2000,
            protein: 120,
            carbs: 250,
            fat: 70,
        }
    }
}

/// Percentage of each target reached, capped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub calories: u8,
    pub protein: u8,
    pub carbs: u8,
    pub fat: u8,
}

fn percent_of(value: u64, target: u32) -> u8 {
    if target == 0 {
        return 0;
    }
    (value.saturating_mul(100) / u64::from(target)).min(100) as u8
}

/// Sums nutrition of the given meals per exact date.
pub fn aggregate_by_date<'a>(
    meals: impl IntoIterator<Item = &'a PlannedMeal>,
) -> BTreeMap<Date, NutritionTotals> {
    let mut by_date: BTreeMap<Date, NutritionTotals> = BTreeMap::new();
    for planned in meals {
        by_date
            .entry(planned.meal.date)
            .or_default()
            .add_food(planned.food.as_ref());
    }
    by_date
}
