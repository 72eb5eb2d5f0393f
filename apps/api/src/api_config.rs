use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use pcs_core::AppError;
use pcs_domain::{ClassificationRuleSet, StageRequirements};

use crate::api_services::SessionSettings;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub session: SessionSettings,
    pub rule_set: ClassificationRuleSet,
    pub stage_requirements: StageRequirements,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let database_max_connections = parse_positive(
            "DATABASE_MAX_CONNECTIONS",
            env::var("DATABASE_MAX_CONNECTIONS").ok(),
            5,
        )?;
        let frontend_url = env::var("FRONTEND_URL")
            .map(|value| value.trim().trim_end_matches('/').to_owned())
            .unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = parse_api_port(env::var("API_PORT").ok())?;

        let session = SessionSettings {
            cookie_name: env::var("SESSION_COOKIE_NAME")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| "id".to_owned()),
            cookie_secure: env::var("SESSION_COOKIE_SECURE")
                .unwrap_or_else(|_| "false".to_owned())
                .eq_ignore_ascii_case("true"),
            idle_minutes: i64::from(parse_positive(
                "SESSION_IDLE_MINUTES",
                env::var("SESSION_IDLE_MINUTES").ok(),
                30,
            )?),
        };

        let rule_set = parse_rule_set(env::var("ROUND_AUDIT_RULE_SET").ok())?;
        let stage_requirements = StageRequirements::new(
            parse_stage_requirement(
                "STAGE_REQUIREMENT_INSPIRE",
                env::var("STAGE_REQUIREMENT_INSPIRE").ok(),
            )?,
            parse_stage_requirement(
                "STAGE_REQUIREMENT_INVESTIGATE",
                env::var("STAGE_REQUIREMENT_INVESTIGATE").ok(),
            )?,
            parse_stage_requirement(
                "STAGE_REQUIREMENT_ACT",
                env::var("STAGE_REQUIREMENT_ACT").ok(),
            )?,
        )?;

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            frontend_url,
            api_host,
            api_port,
            session,
            rule_set,
            stage_requirements,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_rule_set(value: Option<String>) -> Result<ClassificationRuleSet, AppError> {
    match value.filter(|value| !value.trim().is_empty()) {
        Some(value) => ClassificationRuleSet::from_str(value.trim()).map_err(|error| {
            AppError::Validation(format!("invalid ROUND_AUDIT_RULE_SET: {error}"))
        }),
        None => Ok(ClassificationRuleSet::default()),
    }
}

fn parse_api_port(value: Option<String>) -> Result<u16, AppError> {
    let Some(value) = value.filter(|value| !value.trim().is_empty()) else {
        return Ok(3001);
    };

    value
        .trim()
        .parse::<u16>()
        .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))
}

fn parse_positive(name: &str, value: Option<String>, default: u32) -> Result<u32, AppError> {
    let Some(value) = value.filter(|value| !value.trim().is_empty()) else {
        return Ok(default);
    };

    match value.trim().parse::<u32>() {
        Ok(0) => Err(AppError::Validation(format!("{name} must be greater than zero"))),
        Ok(parsed) => Ok(parsed),
        Err(error) => Err(AppError::Validation(format!("invalid {name}: {error}"))),
    }
}

fn parse_stage_requirement(name: &str, value: Option<String>) -> Result<u32, AppError> {
    let Some(value) = value.filter(|value| !value.trim().is_empty()) else {
        return Ok(1);
    };

    value
        .trim()
        .parse::<u32>()
        .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
