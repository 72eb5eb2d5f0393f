mod common;
mod migration;

pub use common::{HealthDependencyStatus, HealthResponse};
pub use migration::{
    AuditSummaryResponse, FixSchoolRoundsRequest, FixSchoolRoundsResponse, IssueCountsResponse,
    ProgressChangeResponse, ProgressSnapshotResponse, RecalculateRoundProgressResponse,
    RecommendedFixResponse, RoundAuditResponse, RoundBreakdownResponse, SchoolAuditResultResponse,
    SchoolFixDetailResponse, SchoolFixErrorResponse,
};
