mod conversions;
mod types;

pub use types::{
    AuditSummaryResponse, FixSchoolRoundsRequest, FixSchoolRoundsResponse, IssueCountsResponse,
    ProgressChangeResponse, ProgressSnapshotResponse, RecalculateRoundProgressResponse,
    RecommendedFixResponse, RoundAuditResponse, RoundBreakdownResponse, SchoolAuditResultResponse,
    SchoolFixDetailResponse, SchoolFixErrorResponse,
};
