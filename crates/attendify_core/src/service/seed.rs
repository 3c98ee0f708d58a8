//! Demo roster used by the CLI `seed` command.
//!
//! Everything goes through the normal services so `total_classes` is derived
//! by the ledger. Existing ids and already-marked dates are skipped, which
//! makes seeding safe to repeat.

use crate::model::attendance::AttendanceStatus;
use crate::model::person::NewPerson;
use crate::model::staff::StaffMember;
use crate::repo::attendance_repo::SqliteAttendanceRepository;
use crate::repo::head_repo::SqliteHeadRepository;
use crate::repo::person_repo::SqlitePersonRepository;
use crate::repo::staff_repo::SqliteStaffRepository;
use crate::repo::RepoResult;
use crate::service::attendance_service::AttendanceService;
use crate::service::head_service::HeadService;
use crate::service::person_service::PersonService;
use crate::service::staff_service::StaffService;
use log::info;
use rusqlite::Connection;
use serde::Serialize;

const DEMO_STUDENTS: [(&str, &str, &str, &str); 10] = [
    ("001", "Aarav Mehta", "aarav.mehta@student.edu", "Computer Science"),
    ("002", "Diya Sharma", "diya.sharma@student.edu", "Computer Science"),
    ("003", "Rohan Gupta", "rohan.gupta@student.edu", "Computer Science"),
    ("004", "Ananya Iyer", "ananya.iyer@student.edu", "Electronics"),
    ("005", "Kabir Patel", "kabir.patel@student.edu", "Electronics"),
    ("006", "Ishita Reddy", "ishita.reddy@student.edu", "Mechanical"),
    ("007", "Arjun Nair", "arjun.nair@student.edu", "Computer Science"),
    ("008", "Meera Joshi", "meera.joshi@student.edu", "Computer Science"),
    ("009", "Siddharth Das", "siddharth.das@student.edu", "Electronics"),
    ("010", "Kavya Pillai", "kavya.pillai@student.edu", "Mechanical"),
];

const DEMO_STAFF: [(&str, &str, &str, &str, &str); 5] = [
    ("T001", "Prof. Aarav Sharma", "aarav.sharma@attendify.edu", "Computer Science", "Data Structures"),
    ("T002", "Prof. Sneha Patel", "sneha.patel@attendify.edu", "Computer Science", "Operating Systems"),
    ("T003", "Prof. Rajesh Kumar", "rajesh.kumar@attendify.edu", "Electronics", "Digital Circuits"),
    ("T004", "Prof. Priya Menon", "priya.menon@attendify.edu", "Mechanical", "Thermodynamics"),
    ("T005", "Prof. Vikram Singh", "vikram.singh@attendify.edu", "Computer Science", "Database Systems"),
];

const DEMO_DATES: [&str; 10] = [
    "2026-02-03",
    "2026-02-04",
    "2026-02-05",
    "2026-02-06",
    "2026-02-07",
    "2026-02-08",
    "2026-02-09",
    "2026-02-10",
    "2026-02-11",
    "2026-02-12",
];

/// One pattern per student; `P` present, `A` absent, aligned with `DEMO_DATES`.
const DEMO_PATTERNS: [(&str, &str); 10] = [
    ("001", "PPPPAPPPPP"),
    ("002", "PPPPPPPPPP"),
    ("003", "PAPAPPAPPA"),
    ("004", "PPPPPPAPPP"),
    ("005", "APPAPAPPAP"),
    ("006", "PPPPPPPPPA"),
    ("007", "PPAPPPPAPP"),
    ("008", "PPPPPPPPPP"),
    ("009", "AAPPAPPAPP"),
    ("010", "PPPAPPPPAP"),
];

/// Counts of rows written by one seeding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub people_created: u32,
    pub staff_created: u32,
    pub records_created: u32,
    pub default_head_created: bool,
}

/// Loads the demo roster, staff, default head and attendance history.
pub fn seed_demo_data(conn: &Connection) -> RepoResult<SeedReport> {
    let people = PersonService::new(SqlitePersonRepository::try_new(conn)?);
    let staff = StaffService::new(SqliteStaffRepository::try_new(conn)?);
    let heads = HeadService::new(SqliteHeadRepository::try_new(conn)?);
    let ledger = AttendanceService::new(SqliteAttendanceRepository::try_new(conn)?);
    let mut report = SeedReport::default();

    for (id, name, contact, cohort) in DEMO_STUDENTS {
        if people.exists(id)? {
            continue;
        }
        people.create(
            &NewPerson::new(id, name)
                .with_contact(contact)
                .with_cohort(cohort),
        )?;
        report.people_created += 1;
    }

    for (id, name, contact, cohort, subject) in DEMO_STAFF {
        if staff.find(id)?.is_some() {
            continue;
        }
        staff.create(&StaffMember {
            id: id.to_string(),
            name: name.to_string(),
            contact: Some(contact.to_string()),
            cohort: Some(cohort.to_string()),
            subject: Some(subject.to_string()),
        })?;
        report.staff_created += 1;
    }

    report.default_head_created = heads.ensure_default_head()?;

    for (person_id, pattern) in DEMO_PATTERNS {
        for (date, mark) in DEMO_DATES.iter().zip(pattern.chars()) {
            if ledger.is_marked(person_id, date)? {
                continue;
            }
            let status = if mark == 'P' {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            ledger.mark(person_id, date, status)?;
            report.records_created += 1;
        }
    }

    info!(
        "event=seed_demo module=seed status=ok people_created={} staff_created={} records_created={} default_head_created={}",
        report.people_created,
        report.staff_created,
        report.records_created,
        report.default_head_created
    );
    Ok(report)
}
