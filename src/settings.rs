use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Postgres connection string. Without it the service keeps data in memory.
    pub database_url: Option<String>,
    pub pool_size: u32,
    pub bcrypt_cost: u32,
    pub log_level: String,
}

impl Settings {
    /// Reads settings from the process environment (`HOST`, `PORT`, `DATABASE_URL`, ...).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(Environment::default()))
    }

    pub fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Self = builder
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("pool_size", 10)?
            .set_default("bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))?
            .set_default("log_level", "info")?
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::Message(
                "POOL_SIZE must be at least 1".to_string(),
            ));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Message(format!(
                "BCRYPT_COST must be between {} and {}, got {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, self.bcrypt_cost
            )));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
