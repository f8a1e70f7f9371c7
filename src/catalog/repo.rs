use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::model::{FoodItem, NewFoodItem};
use super::repo_types::FoodRow;
use super::store::{CatalogQuery, CatalogStore};

const FOOD_COLUMNS: &str =
    "id, name, category, calories, protein, carbs, fat, image_url, description";

/// Catalog backed by the `foods` table.
#[derive(Clone)]
pub struct PgCatalogStore {
    db: PgPool,
}

impl PgCatalogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_items(rows: Vec<FoodRow>) -> anyhow::Result<Vec<FoodItem>> {
    rows.into_iter().map(FoodItem::try_from).collect()
}

/// Escapes LIKE wildcards so user input only ever matches literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list(&self, query: &CatalogQuery) -> anyhow::Result<Vec<FoodItem>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {FOOD_COLUMNS} FROM foods WHERE TRUE"));
        if let Some(category) = query.category {
            qb.push(" AND category = ").push_bind(category.as_str());
        }
        if let Some(search) = query.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                qb.push(" AND name ILIKE ").push_bind(like_pattern(search));
            }
        }
        qb.push(" ORDER BY name ASC, id ASC LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset);

        let rows = qb
            .build_query_as::<FoodRow>()
            .fetch_all(&self.db)
            .await
            .context("list foods")?;
        into_items(rows)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        let row = sqlx::query_as::<_, FoodRow>(&format!(
            "SELECT {FOOD_COLUMNS} FROM foods WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get food")?;
        row.map(FoodItem::try_from).transpose()
    }

    async fn snapshot(&self) -> anyhow::Result<Vec<FoodItem>> {
        let rows = sqlx::query_as::<_, FoodRow>(&format!(
            "SELECT {FOOD_COLUMNS} FROM foods ORDER BY name ASC, id ASC"
        ))
        .fetch_all(&self.db)
        .await
        .context("snapshot foods")?;
        into_items(rows)
    }

    async fn insert(&self, food: NewFoodItem) -> anyhow::Result<FoodItem> {
        let row = sqlx::query_as::<_, FoodRow>(&format!(
            r#"
            INSERT INTO foods (id, name, category, calories, protein, carbs, fat, image_url, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {FOOD_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&food.name)
        .bind(food.category.as_str())
        .bind(i32::try_from(food.calories)?)
        .bind(i32::try_from(food.protein)?)
        .bind(i32::try_from(food.carbs)?)
        .bind(i32::try_from(food.fat)?)
        .bind(&food.image_url)
        .bind(&food.description)
        .fetch_one(&self.db)
        .await
        .context("insert food")?;
        row.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("oat"), "%oat%");
        assert_eq!(like_pattern("100%_juice"), "%100\\%\\_juice%");
    }
}
