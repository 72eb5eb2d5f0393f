use axum::Json;
use axum::extract::{Extension, State};

use pcs_application::FixSchoolRoundsInput;
use pcs_core::AdminIdentity;

use crate::dto::{
    FixSchoolRoundsRequest, FixSchoolRoundsResponse, RecalculateRoundProgressResponse,
    RoundAuditResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn audit_school_rounds_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AdminIdentity>,
) -> ApiResult<Json<RoundAuditResponse>> {
    let report = state.round_audit_service.audit_school_rounds(&user).await?;

    Ok(Json(RoundAuditResponse::from(report)))
}

pub async fn fix_school_rounds_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AdminIdentity>,
    Json(payload): Json<FixSchoolRoundsRequest>,
) -> ApiResult<Json<FixSchoolRoundsResponse>> {
    let outcome = state
        .round_audit_service
        .fix_school_rounds(
            &user,
            FixSchoolRoundsInput {
                school_ids: payload.school_ids,
                dry_run: payload.dry_run,
            },
        )
        .await?;

    Ok(Json(FixSchoolRoundsResponse::from(outcome)))
}

pub async fn recalculate_round_progress_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AdminIdentity>,
) -> ApiResult<Json<RecalculateRoundProgressResponse>> {
    let report = state
        .round_audit_service
        .recalculate_round_progress(&user)
        .await?;

    Ok(Json(RecalculateRoundProgressResponse::from(report)))
}

#[cfg(test)]
mod tests;
