use std::num::NonZeroU32;

use rand::{seq::SliceRandom, Rng};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use time::{Date, Duration};
use tracing::debug;

use super::{FallbackPolicy, NutritionTotals, PlanError, SlotWeights};
use crate::catalog::model::{Category, FoodItem};
use crate::config::PlannerConfig;

/// One candidate day. A slot is `None` when nothing could be picked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPlan {
    pub date: Date,
    pub breakfast: Option<FoodItem>,
    pub lunch: Option<FoodItem>,
    pub dinner: Option<FoodItem>,
    pub snack: Option<FoodItem>,
    pub totals: NutritionTotals,
}

// `total_calories` goes on the wire but is always read from `totals`
impl Serialize for DailyPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DailyPlan", 7)?;
        s.serialize_field("date", &self.date)?;
        s.serialize_field("breakfast", &self.breakfast)?;
        s.serialize_field("lunch", &self.lunch)?;
        s.serialize_field("dinner", &self.dinner)?;
        s.serialize_field("snack", &self.snack)?;
        s.serialize_field("total_calories", &self.total_calories())?;
        s.serialize_field("totals", &self.totals)?;
        s.end()
    }
}

impl DailyPlan {
    fn empty(date: Date) -> Self {
        Self {
            date,
            breakfast: None,
            lunch: None,
            dinner: None,
            snack: None,
            totals: NutritionTotals::default(),
        }
    }

    pub fn slot(&self, slot: Category) -> Option<&FoodItem> {
        match slot {
            Category::Breakfast => self.breakfast.as_ref(),
            Category::Lunch => self.lunch.as_ref(),
            Category::Dinner => self.dinner.as_ref(),
            Category::Snack => self.snack.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: Category) -> &mut Option<FoodItem> {
        match slot {
            Category::Breakfast => &mut self.breakfast,
            Category::Lunch => &mut self.lunch,
            Category::Dinner => &mut self.dinner,
            Category::Snack => &mut self.snack,
        }
    }

    pub fn total_calories(&self) -> u64 {
        self.totals.calories
    }

    pub fn filled_slots(&self) -> usize {
        Category::ALL
            .into_iter()
            .filter(|c| self.slot(*c).is_some())
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotTarget {
    pub slot: Category,
    pub calories: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPlan {
    pub target_calories: u32,
    pub slot_targets: Vec<SlotTarget>,
    pub days: Vec<DailyPlan>,
}

/// Picks one food per slot per day, biased toward the slot's share of the
/// daily calorie target.
#[derive(Debug, Clone)]
pub struct PlanGenerator {
    days: u32,
    top_k: usize,
    min_catalog_items: usize,
    fallback: FallbackPolicy,
    weights: SlotWeights,
}

impl Default for PlanGenerator {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

impl PlanGenerator {
    pub fn from_config(cfg: &PlannerConfig) -> Self {
        Self {
            days: cfg.days.max(1),
            top_k: cfg.top_k.max(1),
            min_catalog_items: cfg.min_catalog_items.max(1),
            fallback: cfg.fallback,
            weights: cfg.weights,
        }
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days.max(1);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_min_catalog_items(mut self, n: usize) -> Self {
        self.min_catalog_items = n.max(1);
        self
    }

    /// Builds `days` consecutive candidate days starting at `start`.
    ///
    /// For every slot the catalog items of that category are ranked by how far
    /// their calories are from the slot's sub-target, and one of the `top_k`
    /// closest is chosen at random. Re-running with a fresh rng is expected to
    /// give a different plan.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        catalog: &[FoodItem],
        target: NonZeroU32,
        start: Date,
        rng: &mut R,
    ) -> Result<GeneratedPlan, PlanError> {
        if catalog.len() < self.min_catalog_items {
            return Err(PlanError::InsufficientCatalog {
                available: catalog.len(),
                required: self.min_catalog_items,
            });
        }

        let slot_targets: Vec<SlotTarget> = Category::ALL
            .into_iter()
            .map(|slot| SlotTarget {
                slot,
                calories: self.weights.sub_target(target.get(), slot),
            })
            .collect();
        // the shortlist only depends on the slot, so rank once for all days
        let shortlists: Vec<(Category, Vec<&FoodItem>)> = slot_targets
            .iter()
            .map(|t| (t.slot, self.shortlist(catalog, t.slot, t.calories)))
            .collect();

        let mut days = Vec::with_capacity(self.days as usize);
        for offset in 0..self.days {
            let mut day = DailyPlan::empty(start + Duration::days(i64::from(offset)));
            for (slot, shortlist) in &shortlists {
                let pick = if shortlist.is_empty() {
                    match self.fallback {
                        FallbackPolicy::AnyItem => catalog.choose(&mut *rng),
                        FallbackPolicy::Disabled => None,
                    }
                } else {
                    shortlist.choose(&mut *rng).copied()
                };
                *day.slot_mut(*slot) = pick.cloned();
            }
            day.totals = NutritionTotals::from_foods(Category::ALL.map(|c| day.slot(c)));
            days.push(day);
        }

        debug!(
            catalog = catalog.len(),
            target = target.get(),
            days = days.len(),
            "meal plan generated"
        );
        Ok(GeneratedPlan {
            target_calories: target.get(),
            slot_targets,
            days,
        })
    }

    fn shortlist<'a>(&self, catalog: &'a [FoodItem], slot: Category, sub_target: u32) -> Vec<&'a FoodItem> {
        let mut bucket: Vec<&FoodItem> = catalog.iter().filter(|f| f.category == slot).collect();
        bucket.sort_by_key(|f| f.calories.abs_diff(sub_target));
        bucket.truncate(self.top_k);
        bucket
    }
}
