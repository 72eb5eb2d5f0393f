use async_trait::async_trait;
use pcs_core::{AppError, AppResult};
use reqwest::{StatusCode, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::audit_client::{AuditView, FixOutcomeView, RecalculationView, RoundAuditClient};
use crate::fixer_config::FixerConfig;

const AUDIT_PATH: &str = "/api/admin/migration/audit-school-rounds";
const FIX_PATH: &str = "/api/admin/migration/fix-school-rounds";
const RECALCULATE_PATH: &str = "/api/admin/migration/recalculate-round-progress";

/// reqwest-backed client that replays the operator's console session.
pub struct HttpRoundAuditClient {
    http_client: reqwest::Client,
    api_base_url: String,
    frontend_origin: String,
    session_cookie: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpRoundAuditClient {
    pub fn new(config: &FixerConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            http_client,
            api_base_url: config.api_base_url.clone(),
            frontend_origin: config.frontend_origin.clone(),
            session_cookie: config.session_cookie.clone(),
        })
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> AppResult<T> {
        let endpoint = format!("{}{path}", self.api_base_url);
        debug!(%endpoint, "calling migration endpoint");

        let response = self
            .http_client
            .post(endpoint.as_str())
            .header(header::COOKIE, self.session_cookie.as_str())
            .header(header::ORIGIN, self.frontend_origin.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|error| AppError::Internal(format!("failed to call {path}: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(error_from_status(status, body.as_str()));
        }

        response.json::<T>().await.map_err(|error| {
            AppError::Internal(format!("failed to parse {path} response body: {error}"))
        })
    }
}

fn error_from_status(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|error| error.message)
        .unwrap_or_else(|_| format!("endpoint returned status {}: {body}", status.as_u16()));

    match status {
        StatusCode::BAD_REQUEST => AppError::Validation(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Internal(message),
    }
}

#[async_trait]
impl RoundAuditClient for HttpRoundAuditClient {
    async fn audit(&self) -> AppResult<AuditView> {
        self.post_json(AUDIT_PATH, json!({})).await
    }

    async fn fix(&self, school_ids: Vec<String>, dry_run: bool) -> AppResult<FixOutcomeView> {
        self.post_json(
            FIX_PATH,
            json!({
                "schoolIds": school_ids,
                "dryRun": dry_run,
            }),
        )
        .await
    }

    async fn recalculate(&self) -> AppResult<RecalculationView> {
        self.post_json(RECALCULATE_PATH, json!({})).await
    }
}
