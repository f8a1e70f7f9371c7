use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::model::{NewScheduledMeal, PlannedMeal, ScheduledMeal};
use super::repo_types::{PlannedMealRow, ScheduledMealRow};
use super::store::{PlanOrder, PlanQuery, PlanStore, UnknownFood};

const FOREIGN_KEY_VIOLATION: &str = "23503";
const MEAL_COLUMNS: &str = "id, user_id, date, meal_type, food_id, is_completed, created_at";

/// Plan store backed by the `meal_plans` table.
#[derive(Clone)]
pub struct PgPlanStore {
    db: PgPool,
}

impl PgPlanStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlanStore for PgPlanStore {
    async fn list(&self, query: &PlanQuery) -> anyhow::Result<Vec<PlannedMeal>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT mp.id, mp.user_id, mp.date, mp.meal_type, mp.food_id, mp.is_completed, mp.created_at,
                   f.id AS f_id, f.name AS f_name, f.category AS f_category,
                   f.calories AS f_calories, f.protein AS f_protein, f.carbs AS f_carbs,
                   f.fat AS f_fat, f.image_url AS f_image_url, f.description AS f_description
            FROM meal_plans mp
            LEFT JOIN foods f ON f.id = mp.food_id
            WHERE mp.user_id = "#,
        );
        qb.push_bind(query.user_id);
        if let Some(date) = query.date {
            qb.push(" AND mp.date = ").push_bind(date);
        }
        qb.push(match query.order {
            PlanOrder::Chronological => " ORDER BY mp.date ASC, mp.seq ASC",
            PlanOrder::NewestFirst => " ORDER BY mp.seq DESC",
        });

        let rows = qb
            .build_query_as::<PlannedMealRow>()
            .fetch_all(&self.db)
            .await
            .context("list meal plans")?;
        rows.into_iter().map(PlannedMeal::try_from).collect()
    }

    async fn insert_batch(&self, meals: &[NewScheduledMeal]) -> anyhow::Result<Vec<ScheduledMeal>> {
        if meals.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.db.begin().await.context("begin meal plan batch")?;
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO meal_plans (id, user_id, date, meal_type, food_id, is_completed) ",
        );
        qb.push_values(meals, |mut b, m| {
            b.push_bind(Uuid::new_v4())
                .push_bind(m.user_id)
                .push_bind(m.date)
                .push_bind(m.meal_type.as_str())
                .push_bind(m.food_id)
                .push_bind(false);
        });
        qb.push(format!(" RETURNING {MEAL_COLUMNS}"));

        let rows = match qb
            .build_query_as::<ScheduledMealRow>()
            .fetch_all(&mut *tx)
            .await
        {
            Ok(rows) => rows,
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
                return Err(UnknownFood(None).into());
            }
            Err(e) => return Err(anyhow::Error::new(e).context("insert meal plan batch")),
        };
        tx.commit().await.context("commit meal plan batch")?;

        rows.into_iter().map(ScheduledMeal::try_from).collect()
    }

    async fn set_completed(
        &self,
        user_id: Uuid,
        id: Uuid,
        completed: bool,
    ) -> anyhow::Result<Option<ScheduledMeal>> {
        let row = sqlx::query_as::<_, ScheduledMealRow>(&format!(
            r#"
            UPDATE meal_plans
            SET is_completed = $1
            WHERE id = $2 AND user_id = $3
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(completed)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("update meal plan completion")?;
        row.map(ScheduledMeal::try_from).transpose()
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete meal plan")?;
        Ok(result.rows_affected() > 0)
    }
}
