use std::env;
use std::time::Duration;

use pcs_core::{AppError, AppResult};

/// Connection settings for the migration API.
#[derive(Debug, Clone)]
pub struct FixerConfig {
    pub api_base_url: String,
    pub frontend_origin: String,
    pub session_cookie: String,
    pub http_timeout: Duration,
}

impl FixerConfig {
    pub fn load() -> AppResult<Self> {
        let api_base_url = env::var("PCS_API_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3001".to_owned())
            .trim_end_matches('/')
            .to_owned();
        let frontend_origin = env::var("PCS_FRONTEND_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_owned())
            .trim_end_matches('/')
            .to_owned();
        let session_cookie = required_non_empty_env("PCS_SESSION_COOKIE")?;
        let http_timeout_seconds = parse_timeout_seconds(env::var("PCS_HTTP_TIMEOUT_SECONDS").ok())?;

        Ok(Self {
            api_base_url,
            frontend_origin,
            session_cookie,
            http_timeout: Duration::from_secs(http_timeout_seconds),
        })
    }
}

fn parse_timeout_seconds(value: Option<String>) -> AppResult<u64> {
    let Some(value) = value else {
        return Ok(30);
    };

    let seconds = value.trim().parse::<u64>().map_err(|error| {
        AppError::Validation(format!(
            "invalid PCS_HTTP_TIMEOUT_SECONDS value '{value}': {error}"
        ))
    })?;

    if seconds == 0 {
        return Err(AppError::Validation(
            "PCS_HTTP_TIMEOUT_SECONDS must be greater than zero".to_owned(),
        ));
    }

    Ok(seconds)
}

fn required_non_empty_env(name: &str) -> AppResult<String> {
    let value = env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use pcs_core::AppError;

    use super::parse_timeout_seconds;

    #[test]
    fn timeout_defaults_to_thirty_seconds() {
        assert!(matches!(parse_timeout_seconds(None), Ok(30)));
        assert!(matches!(parse_timeout_seconds(Some(" 5 ".to_owned())), Ok(5)));
    }

    #[test]
    fn zero_or_garbage_timeout_is_rejected() {
        assert!(matches!(
            parse_timeout_seconds(Some("0".to_owned())),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_timeout_seconds(Some("soon".to_owned())),
            Err(AppError::Validation(_))
        ));
    }
}
