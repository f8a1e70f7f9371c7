use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Category, FoodItem, NewFoodItem};

/// Filter and page of a catalog listing. Results are always sorted by name ascending.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub category: Option<Category>,
    /// Case-insensitive substring of the food name.
    pub search: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl CatalogQuery {
    pub fn matches(&self, food: &FoodItem) -> bool {
        if let Some(category) = self.category {
            if food.category != category {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => food
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list(&self, query: &CatalogQuery) -> anyhow::Result<Vec<FoodItem>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>>;
    /// Every item in the catalog, used as the generator's input.
    async fn snapshot(&self) -> anyhow::Result<Vec<FoodItem>>;
    async fn insert(&self, food: NewFoodItem) -> anyhow::Result<FoodItem>;
}
