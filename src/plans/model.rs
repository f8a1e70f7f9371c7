use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::catalog::model::{Category, FoodItem};

/// A food scheduled into one slot of one day of a user's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMeal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub meal_type: Category,
    pub food_id: Uuid,
    pub is_completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A scheduled meal joined with its food; `food` is `None` when the reference
/// could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMeal {
    #[serde(flatten)]
    pub meal: ScheduledMeal,
    pub food: Option<FoodItem>,
}

/// Creation record for a scheduled meal. New meals always start uncompleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScheduledMeal {
    pub user_id: Uuid,
    pub date: Date,
    pub meal_type: Category,
    pub food_id: Uuid,
}

impl NewScheduledMeal {
    pub fn into_meal(self, id: Uuid, created_at: OffsetDateTime) -> ScheduledMeal {
        ScheduledMeal {
            id,
            user_id: self.user_id,
            date: self.date,
            meal_type: self.meal_type,
            food_id: self.food_id,
            is_completed: false,
            created_at,
        }
    }
}
