use core_config::{AppInfo, FromEnv, app_info, env_parse_or_default, server::ServerConfig};
use database::mongodb::{DEFAULT_STORE_TIMEOUT, MongoConfig};
use domain_attendees::FoodCostPolicy;
use std::time::Duration;

pub use core_config::Environment;

/// Application configuration composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Bound on each store round-trip (`STORE_TIMEOUT_MS`)
    pub store_timeout: Duration,
    /// `ATTENDEE_FOOD_COST_POLICY`: `zero` or `inherit_event`
    pub food_cost_policy: FoodCostPolicy,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let store_timeout_ms = env_parse_or_default(
            "STORE_TIMEOUT_MS",
            DEFAULT_STORE_TIMEOUT.as_millis() as u64,
        )?;
        let food_cost_policy =
            env_parse_or_default("ATTENDEE_FOOD_COST_POLICY", FoodCostPolicy::default())?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            store_timeout: Duration::from_millis(store_timeout_ms),
            food_cost_policy,
        })
    }
}
