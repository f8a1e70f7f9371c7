use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{FoodItem, NewFoodItem};
use super::store::{CatalogQuery, CatalogStore};

/// Catalog held in process memory, for tests and local runs without Postgres.
#[derive(Default)]
pub struct InMemoryCatalog {
    foods: RwLock<Vec<FoodItem>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_foods(foods: Vec<FoodItem>) -> Self {
        Self {
            foods: RwLock::new(foods),
        }
    }

    fn read(&self) -> anyhow::Result<std::sync::RwLockReadGuard<'_, Vec<FoodItem>>> {
        self.foods
            .read()
            .map_err(|_| anyhow::anyhow!("catalog lock poisoned"))
    }

    fn sorted(&self) -> anyhow::Result<Vec<FoodItem>> {
        let mut foods = self.read()?.clone();
        foods.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(foods)
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list(&self, query: &CatalogQuery) -> anyhow::Result<Vec<FoodItem>> {
        let offset = usize::try_from(query.offset.max(0))?;
        let limit = usize::try_from(query.limit.max(0))?;
        Ok(self
            .sorted()?
            .into_iter()
            .filter(|f| query.matches(f))
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        Ok(self.read()?.iter().find(|f| f.id == id).cloned())
    }

    async fn snapshot(&self) -> anyhow::Result<Vec<FoodItem>> {
        self.sorted()
    }

    async fn insert(&self, food: NewFoodItem) -> anyhow::Result<FoodItem> {
        let item = food.into_food(Uuid::new_v4());
        self.foods
            .write()
            .map_err(|_| anyhow::anyhow!("catalog lock poisoned"))?
            .push(item.clone());
        Ok(item)
    }
}
