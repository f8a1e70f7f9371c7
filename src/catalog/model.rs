use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Meal category of a food item. Doubles as the schedule slot of a planned meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl Category {
    /// Slot order used for a day of the plan.
    pub const ALL: [Category; 4] = [
        Category::Breakfast,
        Category::Lunch,
        Category::Dinner,
        Category::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::Lunch => "Lunch",
            Category::Dinner => "Dinner",
            Category::Snack => "Snack",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown meal category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// Validated authoring payload for a new catalog entry.
#[derive(Debug, Clone)]
pub struct NewFoodItem {
    pub name: String,
    pub category: Category,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl NewFoodItem {
    pub fn into_food(self, id: Uuid) -> FoodItem {
        FoodItem {
            id,
            name: self.name,
            category: self.category,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            image_url: self.image_url,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("lunch".parse::<Category>().unwrap(), Category::Lunch);
        assert_eq!(" Snack ".parse::<Category>().unwrap(), Category::Snack);
        assert!("brunch".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_with_display_name() {
        let json = serde_json::to_string(&Category::Breakfast).unwrap();
        assert_eq!(json, "\"Breakfast\"");
    }
}
