//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod authorization_service;
mod round_audit_ports;
mod round_audit_service;

pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_service::{AuthorizationRepository, AuthorizationService};
pub use round_audit_ports::{
    FixSchoolRoundsInput, FixSchoolRoundsOutcome, ProgressChange, RecalculationReport,
    RoundAuditReport, RoundProgressInput, SchoolFixDetail, SchoolFixError, SchoolRoundRepository,
};
pub use round_audit_service::RoundAuditService;
