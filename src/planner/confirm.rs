use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::{DailyPlan, PlanError};
use crate::catalog::model::Category;
use crate::plans::model::NewScheduledMeal;

/// A candidate day as posted back by the client: food ids per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDay {
    pub date: Date,
    #[serde(default)]
    pub breakfast: Option<Uuid>,
    #[serde(default)]
    pub lunch: Option<Uuid>,
    #[serde(default)]
    pub dinner: Option<Uuid>,
    #[serde(default)]
    pub snack: Option<Uuid>,
}

impl CandidateDay {
    pub fn slots(&self) -> [(Category, Option<Uuid>); 4] {
        [
            (Category::Breakfast, self.breakfast),
            (Category::Lunch, self.lunch),
            (Category::Dinner, self.dinner),
            (Category::Snack, self.snack),
        ]
    }
}

impl From<&DailyPlan> for CandidateDay {
    fn from(day: &DailyPlan) -> Self {
        Self {
            date: day.date,
            breakfast: day.breakfast.as_ref().map(|f| f.id),
            lunch: day.lunch.as_ref().map(|f| f.id),
            dinner: day.dinner.as_ref().map(|f| f.id),
            snack: day.snack.as_ref().map(|f| f.id),
        }
    }
}

/// Flattens candidate days into creation records, one per filled slot.
pub fn confirm(days: &[CandidateDay], user: Option<Uuid>) -> Result<Vec<NewScheduledMeal>, PlanError> {
    let user_id = user.ok_or(PlanError::NotAuthenticated)?;
    Ok(days
        .iter()
        .flat_map(|day| {
            day.slots()
                .into_iter()
                .filter_map(move |(slot, food)| {
                    food.map(|food_id| NewScheduledMeal {
                        user_id,
                        date: day.date,
                        meal_type: slot,
                        food_id,
                    })
                })
        })
        .collect())
}
