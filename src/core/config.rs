use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;

#[derive(Deserialize, Clone)]
pub struct AppConfig {
    pub ledgerly_server_config: LedgerlyServer,
    pub postgres: PostgresConfig,
    pub storage: LogoStorageConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self, config::ConfigError> {
        let base_path = std::env::current_dir().expect("Failed to find the current dir");
        let config_dir = base_path.join("src/core/configurations");

        let app_environment: Environment = std::env::var("LEDGERLY_APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .expect("Failed to parse LEDGERLY_APP_ENVIRONMENT");

        let configurations = config::Config::builder()
            .add_source(
                config::File::from(config_dir.join(app_environment.as_str())).required(true),
            )
            .build()?;

        configurations.try_deserialize()
    }
}

#[derive(Deserialize, Clone)]
pub struct LedgerlyServer {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone)]
pub struct PostgresConfig {
    pub username: String,
    pub password: Secret<String>,
    pub host: String,
    pub port: u16,
    pub database_name: String,
    pub migrate_on_startup: bool,
    pub seed_on_startup: bool,
}

impl PostgresConfig {
    pub fn connect(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .database(&self.database_name);

        options.log_statements(tracing::log::LevelFilter::Trace)
    }
}

#[derive(Deserialize, Clone)]
pub struct LogoStorageConfig {
    pub root_dir: String,
    pub public_base_url: String,
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Sandbox,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not supported environment. Use either `local`, `sandbox` or `production` ",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Environment;
    use claim::{assert_err, assert_ok};

    #[test]
    fn known_environments_parse() {
        assert_ok!(Environment::try_from("local".to_string()));
        assert_ok!(Environment::try_from("Sandbox".to_string()));
        assert_ok!(Environment::try_from("PRODUCTION".to_string()));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        assert_err!(Environment::try_from("staging".to_string()));
    }

    #[test]
    fn environment_round_trips_through_as_str() {
        for name in ["local", "sandbox", "production"] {
            let env = Environment::try_from(name.to_string()).unwrap();
            assert_eq!(env.as_str(), name);
        }
    }
}
