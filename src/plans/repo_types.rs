use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::model::{PlannedMeal, ScheduledMeal};
use crate::catalog::model::{Category, FoodItem};
use crate::catalog::repo_types::FoodRow;

#[derive(Debug, FromRow)]
pub struct ScheduledMealRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub meal_type: String,
    pub food_id: Uuid,
    pub is_completed: bool,
    pub created_at: OffsetDateTime,
}

impl TryFrom<ScheduledMealRow> for ScheduledMeal {
    type Error = anyhow::Error;

    fn try_from(r: ScheduledMealRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            date: r.date,
            meal_type: r.meal_type.parse::<Category>()?,
            food_id: r.food_id,
            is_completed: r.is_completed,
            created_at: r.created_at,
        })
    }
}

/// `meal_plans LEFT JOIN foods`; every `f_*` column is NULL when the food is missing.
#[derive(Debug, FromRow)]
pub struct PlannedMealRow {
    #[sqlx(flatten)]
    pub meal: ScheduledMealRow,
    pub f_id: Option<Uuid>,
    pub f_name: Option<String>,
    pub f_category: Option<String>,
    pub f_calories: Option<i32>,
    pub f_protein: Option<i32>,
    pub f_carbs: Option<i32>,
    pub f_fat: Option<i32>,
    pub f_image_url: Option<String>,
    pub f_description: Option<String>,
}

impl TryFrom<PlannedMealRow> for PlannedMeal {
    type Error = anyhow::Error;

    fn try_from(r: PlannedMealRow) -> Result<Self, Self::Error> {
        let food = match (r.f_id, r.f_name, r.f_category) {
            (Some(id), Some(name), Some(category)) => Some(FoodItem::try_from(FoodRow {
                id,
                name,
                category,
                calories: r.f_calories.unwrap_or(0),
                protein: r.f_protein.unwrap_or(0),
                carbs: r.f_carbs.unwrap_or(0),
                fat: r.f_fat.unwrap_or(0),
                image_url: r.f_image_url,
                description: r.f_description,
            })?),
            _ => None,
        };
        Ok(Self {
            meal: r.meal.try_into()?,
            food,
        })
    }
}
