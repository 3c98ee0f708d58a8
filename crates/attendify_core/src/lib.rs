//! Core domain logic for Attendify: person registry, attendance ledger and
//! attendance reports over one SQLite store.

pub mod db;
pub mod logging;
pub mod model;
pub mod portal;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::attendance::{
    format_percentage, AttendanceEntry, AttendanceStatus, DailyAttendanceRow, DailyStatus,
    DEFAULT_LOW_ATTENDANCE_THRESHOLD, NOT_MARKED,
};
pub use model::head::DepartmentHead;
pub use model::person::{NewPerson, Person, PersonId, PersonOrder, PersonPatch};
pub use model::staff::{StaffMember, StaffPatch};
pub use model::{PatchOutcome, ValidationError};
pub use portal::capability::{Capability, PortalRole};
pub use portal::{Portal, PortalError, PortalResult};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::attendance_service::AttendanceService;
pub use service::person_service::PersonService;
pub use service::report_service::{
    AttendanceStats, DepartmentReportRow, LowAttendanceRow, OverallStatistics, ReportService,
    SummaryRow,
};
pub use service::seed::{seed_demo_data, SeedReport};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
