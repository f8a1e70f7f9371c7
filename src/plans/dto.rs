use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::model::PlannedMeal;
use crate::catalog::model::Category;
use crate::planner::{CandidateDay, DailyTargets, NutritionTotals, Progress};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub target_calories: i64,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub days: Vec<CandidateDay>,
}

#[derive(Debug, Deserialize)]
pub struct AddMealRequest {
    pub food_id: Uuid,
    pub date: Date,
    pub meal_type: Category,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMealRequest {
    pub is_completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<Date>,
}

/// All planned meals of one date with their summed nutrition.
#[derive(Debug, Serialize)]
pub struct PlanDay {
    pub date: Date,
    pub totals: NutritionTotals,
    pub meals: Vec<PlannedMeal>,
}

#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub date: Date,
    pub totals: NutritionTotals,
    pub targets: DailyTargets,
    pub progress: Progress,
    pub meals: Vec<PlannedMeal>,
}
