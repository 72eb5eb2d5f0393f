use super::*;

pub(super) struct DatabaseHealth {
    pub(super) dependency: HealthDependencyStatus,
    pub(super) school_count: Option<u32>,
}

/// One query proves both connectivity and that the school schema is migrated.
pub(super) async fn check_database(pool: &sqlx::PgPool) -> DatabaseHealth {
    let counted = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM schools")
        .fetch_one(pool)
        .await;

    match counted {
        Ok(count) => DatabaseHealth {
            dependency: HealthDependencyStatus {
                status: "ok",
                detail: None,
            },
            school_count: u32::try_from(count).ok(),
        },
        Err(error) => {
            warn!(error = %error, "school table health check failed");
            DatabaseHealth {
                dependency: HealthDependencyStatus {
                    status: "error",
                    detail: Some(format!("school table unavailable: {error}")),
                },
                school_count: None,
            }
        }
    }
}
