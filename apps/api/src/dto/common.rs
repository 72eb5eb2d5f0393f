use serde::Serialize;
use ts_rs::TS;

/// Readiness of the audit service.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub database: HealthDependencyStatus,
    /// Schools visible to the audit; absent when the database check failed.
    pub school_count: Option<u32>,
    /// Classification rule set the audit runs with.
    pub rule_set: &'static str,
}

/// Status of one backing dependency.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}
