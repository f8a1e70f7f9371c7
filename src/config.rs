use serde::Deserialize;

use crate::planner::{DailyTargets, FallbackPolicy, SlotWeights};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Knobs for the plan generator and the dashboard targets.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    pub days: u32,
    pub top_k: usize,
    pub min_catalog_items: usize,
    pub fallback: FallbackPolicy,
    pub weights: SlotWeights,
    pub targets: DailyTargets,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            days: 3,
            top_k: 3,
            min_catalog_items: 1,
            fallback: FallbackPolicy::AnyItem,
            weights: SlotWeights::default(),
            targets: DailyTargets::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub catalog_page_size: i64,
    pub jwt: JwtConfig,
    pub planner: PlannerConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mealplanner".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "mealplanner-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
        };

        let defaults = PlannerConfig::default();
        let fallback = match std::env::var("PLAN_FALLBACK") {
            Ok(v) => v.parse::<FallbackPolicy>()?,
            Err(_) => defaults.fallback,
        };
        let planner = PlannerConfig {
            days: env_or("PLAN_DAYS", defaults.days),
            top_k: env_or("PLAN_TOP_K", defaults.top_k),
            min_catalog_items: env_or("PLAN_MIN_CATALOG_ITEMS", defaults.min_catalog_items),
            fallback,
            weights: defaults.weights,
            targets: DailyTargets {
                calories: env_or("TARGET_CALORIES", defaults.targets.calories),
                protein: env_or("TARGET_PROTEIN", defaults.targets.protein),
                carbs: env_or("TARGET_CARBS", defaults.targets.carbs),
                fat: env_or("TARGET_FAT", defaults.targets.fat),
            },
        };

        Ok(Self {
            database_url,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            catalog_page_size: env_or("CATALOG_PAGE_SIZE", 8),
            jwt,
            planner,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
