//! Role-scoped facades over the core services.
//!
//! # Responsibility
//! - Gate every call on the role's capability table before storage access.
//! - Bind the individual facade to exactly one person id.
//!
//! # Invariants
//! - A denied call performs no read or write.
//! - Reading another person's data requires `read_all`; reading the bound
//!   person's own data requires only `read_self`.

pub mod capability;

use crate::db::DbError;
use crate::model::attendance::{AttendanceEntry, AttendanceStatus, DailyAttendanceRow};
use crate::model::person::{NewPerson, Person, PersonId, PersonOrder, PersonPatch};
use crate::model::staff::{StaffMember, StaffPatch};
use crate::model::PatchOutcome;
use crate::portal::capability::{Capability, PortalRole};
use crate::repo::attendance_repo::SqliteAttendanceRepository;
use crate::repo::head_repo::SqliteHeadRepository;
use crate::repo::person_repo::SqlitePersonRepository;
use crate::repo::report_repo::SqliteReportRepository;
use crate::repo::staff_repo::SqliteStaffRepository;
use crate::repo::{EntityKind, RepoError};
use crate::service::attendance_service::AttendanceService;
use crate::service::head_service::HeadService;
use crate::service::person_service::PersonService;
use crate::service::report_service::{
    AttendanceStats, DepartmentReportRow, LowAttendanceRow, OverallStatistics, ReportService,
    SummaryRow,
};
use crate::service::staff_service::StaffService;
use log::warn;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PortalResult<T> = Result<T, PortalError>;

#[derive(Debug)]
pub enum PortalError {
    CapabilityDenied {
        role: PortalRole,
        capability: Capability,
    },
    /// Department head id or secret did not match.
    InvalidCredentials,
    Repo(RepoError),
}

impl Display for PortalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapabilityDenied { role, capability } => {
                write!(f, "role `{role}` lacks capability `{capability}`")
            }
            Self::InvalidCredentials => write!(f, "invalid department head credentials"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PortalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::CapabilityDenied { .. } | Self::InvalidCredentials => None,
        }
    }
}

impl From<RepoError> for PortalError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for PortalError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Capability-checked entry point for one role on one connection.
pub struct Portal<'conn> {
    conn: &'conn Connection,
    role: PortalRole,
    bound_person: Option<PersonId>,
}

impl<'conn> Portal<'conn> {
    /// Opens the administrative facade after checking a department head secret.
    pub fn administrator(
        conn: &'conn Connection,
        head_id: &str,
        secret: &str,
    ) -> PortalResult<Self> {
        let heads = HeadService::new(SqliteHeadRepository::try_new(conn)?);
        if !heads.verify_secret(head_id, secret)? {
            return Err(PortalError::InvalidCredentials);
        }
        Ok(Self {
            conn,
            role: PortalRole::Administrator,
            bound_person: None,
        })
    }

    pub fn instructor(conn: &'conn Connection) -> Self {
        Self {
            conn,
            role: PortalRole::Instructor,
            bound_person: None,
        }
    }

    /// Opens the individual facade for a registered person.
    ///
    /// Fails with `NotFound` when `person_id` is not in the registry.
    pub fn individual(conn: &'conn Connection, person_id: &str) -> PortalResult<Self> {
        let people = PersonService::new(SqlitePersonRepository::try_new(conn)?);
        if !people.exists(person_id)? {
            return Err(RepoError::not_found(EntityKind::Person, person_id).into());
        }
        Ok(Self {
            conn,
            role: PortalRole::Individual,
            bound_person: Some(person_id.to_string()),
        })
    }

    pub fn role(&self) -> PortalRole {
        self.role
    }

    pub fn bound_person(&self) -> Option<&str> {
        self.bound_person.as_deref()
    }

    fn require(&self, capability: Capability) -> PortalResult<()> {
        if self.role.allows(capability) {
            return Ok(());
        }
        warn!(
            "event=portal_denied module=portal status=rejected role={} capability={}",
            self.role, capability
        );
        Err(PortalError::CapabilityDenied {
            role: self.role,
            capability,
        })
    }

    fn require_read_of(&self, person_id: &str) -> PortalResult<()> {
        if self.bound_person.as_deref() == Some(person_id) {
            self.require(Capability::ReadSelf)
        } else {
            self.require(Capability::ReadAll)
        }
    }

    fn people(&self) -> PortalResult<PersonService<SqlitePersonRepository<'conn>>> {
        Ok(PersonService::new(SqlitePersonRepository::try_new(self.conn)?))
    }

    fn ledger(&self) -> PortalResult<AttendanceService<SqliteAttendanceRepository<'conn>>> {
        Ok(AttendanceService::new(SqliteAttendanceRepository::try_new(
            self.conn,
        )?))
    }

    fn reports(&self) -> PortalResult<ReportService<SqliteReportRepository<'conn>>> {
        Ok(ReportService::new(SqliteReportRepository::try_new(self.conn)?))
    }

    fn staff(&self) -> PortalResult<StaffService<SqliteStaffRepository<'conn>>> {
        Ok(StaffService::new(SqliteStaffRepository::try_new(self.conn)?))
    }

    pub fn profile(&self, person_id: &str) -> PortalResult<Person> {
        self.require_read_of(person_id)?;
        Ok(self.people()?.get(person_id)?)
    }

    pub fn records(&self, person_id: &str) -> PortalResult<Vec<AttendanceEntry>> {
        self.require_read_of(person_id)?;
        Ok(self.ledger()?.by_person(person_id)?)
    }

    pub fn stats(&self, person_id: &str) -> PortalResult<AttendanceStats> {
        self.require_read_of(person_id)?;
        Ok(self.reports()?.stats(person_id)?)
    }

    pub fn percentage(&self, person_id: &str) -> PortalResult<f64> {
        self.require_read_of(person_id)?;
        Ok(self.reports()?.percentage(person_id)?)
    }

    pub fn list_people(&self, order: PersonOrder) -> PortalResult<Vec<Person>> {
        self.require(Capability::ReadAll)?;
        Ok(self.people()?.list_all(order)?)
    }

    pub fn attendance_on(&self, date: &str) -> PortalResult<Vec<DailyAttendanceRow>> {
        self.require(Capability::ReadAll)?;
        Ok(self.ledger()?.by_date(date)?)
    }

    pub fn summary(&self) -> PortalResult<Vec<SummaryRow>> {
        self.require(Capability::ReadAll)?;
        Ok(self.reports()?.summary()?)
    }

    pub fn department_report(&self) -> PortalResult<Vec<DepartmentReportRow>> {
        self.require(Capability::ReadAll)?;
        Ok(self.reports()?.department_report()?)
    }

    pub fn low_attendance(&self, threshold: f64) -> PortalResult<Vec<LowAttendanceRow>> {
        self.require(Capability::ReadAll)?;
        Ok(self.reports()?.low_attendance(threshold)?)
    }

    pub fn overall_statistics(&self) -> PortalResult<OverallStatistics> {
        self.require(Capability::ReadAll)?;
        Ok(self.reports()?.overall_statistics()?)
    }

    pub fn list_staff(&self) -> PortalResult<Vec<StaffMember>> {
        self.require(Capability::ReadAll)?;
        Ok(self.staff()?.list_all()?)
    }

    pub fn mark(&self, person_id: &str, date: &str, status: AttendanceStatus) -> PortalResult<()> {
        self.require(Capability::WriteAttendance)?;
        Ok(self.ledger()?.mark(person_id, date, status)?)
    }

    pub fn is_marked(&self, person_id: &str, date: &str) -> PortalResult<bool> {
        self.require(Capability::WriteAttendance)?;
        Ok(self.ledger()?.is_marked(person_id, date)?)
    }

    pub fn create_person(&self, person: &NewPerson) -> PortalResult<()> {
        self.require(Capability::ManageRoster)?;
        Ok(self.people()?.create(person)?)
    }

    pub fn patch_person(&self, id: &str, patch: &PersonPatch) -> PortalResult<PatchOutcome> {
        self.require(Capability::ManageRoster)?;
        Ok(self.people()?.patch(id, patch)?)
    }

    pub fn delete_person(&self, id: &str) -> PortalResult<()> {
        self.require(Capability::ManageRoster)?;
        Ok(self.people()?.delete(id)?)
    }

    pub fn create_staff(&self, member: &StaffMember) -> PortalResult<()> {
        self.require(Capability::ManageStaff)?;
        Ok(self.staff()?.create(member)?)
    }

    pub fn patch_staff(&self, id: &str, patch: &StaffPatch) -> PortalResult<PatchOutcome> {
        self.require(Capability::ManageStaff)?;
        Ok(self.staff()?.patch(id, patch)?)
    }

    pub fn delete_staff(&self, id: &str) -> PortalResult<()> {
        self.require(Capability::ManageStaff)?;
        Ok(self.staff()?.delete(id)?)
    }
}
