use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::error::{AppError, AppResult};

use super::model::{Category, NewFoodItem};

#[derive(Debug, Deserialize)]
pub struct FoodListQuery {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFoodRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    pub category: Category,
    #[validate(range(min = 0, max = 100000, message = "Calories must be between 0 and 100000"))]
    pub calories: i64,
    #[validate(range(min = 0, max = 100000, message = "Protein must be between 0 and 100000"))]
    pub protein: Option<i64>,
    #[validate(range(min = 0, max = 100000, message = "Carbs must be between 0 and 100000"))]
    pub carbs: Option<i64>,
    #[validate(range(min = 0, max = 100000, message = "Fat must be between 0 and 100000"))]
    pub fat: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
    #[validate(length(max = 2000, message = "Description must be under 2000 characters"))]
    pub description: Option<String>,
}

impl CreateFoodRequest {
    pub fn into_new_food(self) -> AppResult<NewFoodItem> {
        self.validate()?;
        Ok(NewFoodItem {
            name: self.name.trim().to_string(),
            category: self.category,
            calories: nutrient("calories", self.calories)?,
            protein: nutrient("protein", self.protein.unwrap_or(0))?,
            carbs: nutrient("carbs", self.carbs.unwrap_or(0))?,
            fat: nutrient("fat", self.fat.unwrap_or(0))?,
            image_url: self.image_url,
            description: self.description.filter(|d| !d.trim().is_empty()),
        })
    }
}

/// Range is checked by the derive; this only narrows the type.
fn nutrient(field: &str, v: i64) -> AppResult<u32> {
    u32::try_from(v).map_err(|_| AppError::Validation(format!("{field} is out of range")))
}

/// Treats `""` and whitespace-only strings as an absent value.
fn blank_as_none<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(de)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(calories: i64, protein: Option<i64>) -> CreateFoodRequest {
        CreateFoodRequest {
            name: "  Greek Yogurt ".into(),
            category: Category::Snack,
            calories,
            protein,
            carbs: None,
            fat: Some(4),
            image_url: None,
            description: Some("   ".into()),
        }
    }

    #[test]
    fn valid_request_defaults_missing_macros_to_zero() {
        let food = request(150, Some(12)).into_new_food().unwrap();
        assert_eq!(food.name, "Greek Yogurt");
        assert_eq!(food.calories, 150);
        assert_eq!(food.protein, 12);
        assert_eq!(food.carbs, 0);
        assert_eq!(food.fat, 4);
        assert!(food.description.is_none());
    }

    #[test]
    fn blank_image_url_is_treated_as_missing() {
        let req: CreateFoodRequest = serde_json::from_value(serde_json::json!({
            "name": "Toast",
            "category": "Breakfast",
            "calories": 300,
            "image_url": "  ",
        }))
        .unwrap();
        let food = req.into_new_food().unwrap();
        assert!(food.image_url.is_none());

        let req: CreateFoodRequest = serde_json::from_value(serde_json::json!({
            "name": "Toast",
            "category": "Breakfast",
            "calories": 300,
            "image_url": "not a url",
        }))
        .unwrap();
        assert!(matches!(req.into_new_food(), Err(AppError::Validation(_))));
    }

    #[test]
    fn values_above_the_limit_are_rejected() {
        let err = request(100_001, None).into_new_food().unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("between 0 and 100000"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(matches!(
            request(-1, None).into_new_food(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            request(100, Some(-5)).into_new_food(),
            Err(AppError::Validation(_))
        ));
    }
}
