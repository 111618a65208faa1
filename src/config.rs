use crate::{auth::TokenKeys, domain::UserEmail, email_client::EmailClient};
use config::{Config, File};
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    PgPool,
};
use std::{env, error::Error, path::Path, time::Duration};

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email_client: EmailClientSettings,
    pub auth: AuthSettings,
    pub cors: CorsSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    /// Marks the token cookie `Secure` with `SameSite=None` for cross-site front-ends.
    pub secure_cookies: bool,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: SecretString,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub name: String,
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .username(&self.username)
            .password(self.password.expose_secret())
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .ssl_mode(ssl_mode)
    }

    pub fn get_db_pool(&self) -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(2))
            .connect_lazy_with(self.connect_options())
    }
}

#[derive(Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub sender_name: String,
    pub authorization_token: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<UserEmail, String> {
        UserEmail::parse(self.sender_email.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn client(&self) -> Result<EmailClient, String> {
        let url = self
            .base_url
            .parse::<Url>()
            .map_err(|e| format!("{} is not a valid email API url: {e}", self.base_url))?;

        Ok(EmailClient::new(
            url,
            self.sender()?,
            self.sender_name.clone(),
            self.authorization_token.clone(),
            self.timeout(),
        ))
    }
}

#[derive(Deserialize, Clone)]
pub struct AuthSettings {
    pub token_secret: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub token_ttl_days: i64,
}

impl AuthSettings {
    pub fn keys(&self) -> TokenKeys {
        TokenKeys::new(&self.token_secret, chrono::Duration::days(self.token_ttl_days))
    }
}

#[derive(Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

pub fn get() -> Result<Settings, Box<dyn Error>> {
    let config_path = env::current_dir()?.join("config");

    let app_env: Environment = env::var("APP_ENV")
        .unwrap_or_else(|_| "local".into())
        .try_into()?;

    load(&config_path, &app_env, environment_overrides())
}

/// `APP__SECTION__KEY` variables, e.g. `APP__CORS__ALLOWED_ORIGINS=https://a,https://b`.
fn environment_overrides() -> config::Environment {
    config::Environment::with_prefix("APP")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
}

fn load(
    config_path: &Path,
    app_env: &Environment,
    overrides: config::Environment,
) -> Result<Settings, Box<dyn Error>> {
    let env_file = format!("{}.toml", app_env.file_stem());

    let settings = Config::builder()
        .add_source(File::from(config_path.join("Base.toml")))
        .add_source(File::from(config_path.join(env_file)))
        .add_source(overrides)
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}

#[derive(Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    fn file_stem(&self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Production => "Production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}

impl TryFrom<&str> for Environment {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "local" => Ok(Self::Local),
            other => Err(format!(
                "{other} is not a supported environment. \
                Use either `local` or `production`.",
            )),
        }
    }
}
