use anyhow::Context;
use sqlx::FromRow;
use uuid::Uuid;

use super::model::{Category, FoodItem};

#[derive(Debug, FromRow)]
pub struct FoodRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fat: i32,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<FoodRow> for FoodItem {
    type Error = anyhow::Error;

    fn try_from(r: FoodRow) -> Result<Self, Self::Error> {
        let category = r
            .category
            .parse::<Category>()
            .with_context(|| format!("food {}", r.id))?;
        Ok(Self {
            id: r.id,
            name: r.name,
            category,
            calories: non_negative(r.calories),
            protein: non_negative(r.protein),
            carbs: non_negative(r.carbs),
            fat: non_negative(r.fat),
            image_url: r.image_url,
            description: r.description,
        })
    }
}

pub(crate) fn non_negative(v: i32) -> u32 {
    u32::try_from(v).unwrap_or(0)
}
