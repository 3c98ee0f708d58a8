use attendify_core::db::open_db_in_memory;
use attendify_core::repo::attendance_repo::SqliteAttendanceRepository;
use attendify_core::repo::person_repo::SqlitePersonRepository;
use attendify_core::repo::report_repo::SqliteReportRepository;
use attendify_core::repo::staff_repo::SqliteStaffRepository;
use attendify_core::service::staff_service::StaffService;
use attendify_core::{
    format_percentage, seed_demo_data, AttendanceService, AttendanceStats, AttendanceStatus,
    NewPerson, PersonService, ReportService, StaffMember, DEFAULT_LOW_ATTENDANCE_THRESHOLD,
};
use rusqlite::Connection;

fn reports(conn: &Connection) -> ReportService<SqliteReportRepository<'_>> {
    ReportService::new(SqliteReportRepository::try_new(conn).unwrap())
}

fn people(conn: &Connection) -> PersonService<SqlitePersonRepository<'_>> {
    PersonService::new(SqlitePersonRepository::try_new(conn).unwrap())
}

fn ledger(conn: &Connection) -> AttendanceService<SqliteAttendanceRepository<'_>> {
    AttendanceService::new(SqliteAttendanceRepository::try_new(conn).unwrap())
}

/// Marks `pattern` (`P`/`A`) on consecutive January dates.
fn mark_pattern(conn: &Connection, id: &str, pattern: &str) {
    let ledger = ledger(conn);
    for (day, mark) in pattern.chars().enumerate() {
        let status = if mark == 'P' {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Absent
        };
        ledger
            .mark(id, &format!("2026-01-{:02}", day + 1), status)
            .unwrap();
    }
}

#[test]
fn zero_record_person_has_zero_percentage_and_stats() {
    let conn = open_db_in_memory().unwrap();
    people(&conn).create(&NewPerson::new("001", "Ada")).unwrap();
    let reports = reports(&conn);

    assert_eq!(reports.percentage("001").unwrap(), 0.0);
    assert_eq!(reports.stats("001").unwrap(), AttendanceStats::default());
    assert_eq!(reports.percentage("unregistered").unwrap(), 0.0);
}

#[test]
fn single_person_walkthrough() {
    let conn = open_db_in_memory().unwrap();
    let people = people(&conn);
    let ledger = ledger(&conn);
    let reports = reports(&conn);
    people.create(&NewPerson::new("001", "Ada")).unwrap();

    assert_eq!(reports.percentage("001").unwrap(), 0.0);

    ledger
        .mark("001", "2026-01-01", AttendanceStatus::Present)
        .unwrap();
    assert_eq!(reports.percentage("001").unwrap(), 100.0);
    assert_eq!(people.get("001").unwrap().total_classes, 1);

    ledger
        .mark("001", "2026-01-02", AttendanceStatus::Absent)
        .unwrap();
    assert_eq!(reports.percentage("001").unwrap(), 50.0);
    assert_eq!(
        reports.stats("001").unwrap(),
        AttendanceStats {
            total: 2,
            present: 1,
            absent: 1,
        }
    );
}

#[test]
fn summary_includes_zero_record_people_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let people = people(&conn);
    people.create(&NewPerson::new("002", "Grace")).unwrap();
    people.create(&NewPerson::new("001", "Ada")).unwrap();
    mark_pattern(&conn, "001", "PPPA");

    let summary = reports(&conn).summary().unwrap();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].person_id, "001");
    assert_eq!(summary[0].total, 4);
    assert_eq!(summary[0].present, 3);
    assert_eq!(summary[0].percentage, 75.0);
    assert_eq!(summary[1].person_id, "002");
    assert_eq!(summary[1].total, 0);
    assert_eq!(summary[1].percentage, 0.0);
}

#[test]
fn department_report_averages_per_person_percentages() {
    let conn = open_db_in_memory().unwrap();
    let people = people(&conn);
    people
        .create(&NewPerson::new("001", "Full").with_cohort("CS"))
        .unwrap();
    people
        .create(&NewPerson::new("002", "Empty").with_cohort("CS"))
        .unwrap();
    people
        .create(&NewPerson::new("003", "Solo").with_cohort("EE"))
        .unwrap();
    mark_pattern(&conn, "001", "P");
    mark_pattern(&conn, "003", "PA");

    let report = reports(&conn).department_report().unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].cohort.as_deref(), Some("CS"));
    assert_eq!(report[0].student_count, 2);
    assert_eq!(report[0].average_percentage, 50.0);
    assert_eq!(report[1].cohort.as_deref(), Some("EE"));
    assert_eq!(report[1].student_count, 1);
    assert_eq!(report[1].average_percentage, 50.0);
}

#[test]
fn people_without_cohort_form_their_own_group() {
    let conn = open_db_in_memory().unwrap();
    let people = people(&conn);
    people.create(&NewPerson::new("001", "Loose")).unwrap();
    people
        .create(&NewPerson::new("002", "Placed").with_cohort("CS"))
        .unwrap();

    let report = reports(&conn).department_report().unwrap();
    assert_eq!(report[0].cohort, None);
    assert_eq!(report[0].student_count, 1);
    assert_eq!(report[1].cohort.as_deref(), Some("CS"));
}

#[test]
fn low_attendance_filters_strictly_below_threshold_in_ascending_order() {
    let conn = open_db_in_memory().unwrap();
    let people = people(&conn);
    for id in ["001", "002", "003", "004", "005"] {
        people.create(&NewPerson::new(id, format!("P{id}"))).unwrap();
    }
    mark_pattern(&conn, "001", "PPPA"); // 75.0, not low
    mark_pattern(&conn, "002", "PA"); // 50.0
    mark_pattern(&conn, "003", "PPPP"); // 100.0
    mark_pattern(&conn, "005", "AP"); // 50.0, tie with 002
    // 004 has no records and scores 0.0.

    let low = reports(&conn)
        .low_attendance(DEFAULT_LOW_ATTENDANCE_THRESHOLD)
        .unwrap();
    let rows = low
        .iter()
        .map(|row| (row.person_id.as_str(), row.percentage))
        .collect::<Vec<_>>();
    assert_eq!(rows, vec![("004", 0.0), ("002", 50.0), ("005", 50.0)]);
    assert!(low
        .iter()
        .all(|row| row.percentage < DEFAULT_LOW_ATTENDANCE_THRESHOLD));
}

#[test]
fn overall_statistics_pool_every_record() {
    let conn = open_db_in_memory().unwrap();
    let people = people(&conn);
    people
        .create(&NewPerson::new("001", "A").with_cohort("CS"))
        .unwrap();
    people
        .create(&NewPerson::new("002", "B").with_cohort("CS"))
        .unwrap();
    mark_pattern(&conn, "001", "P");
    mark_pattern(&conn, "002", "AAA");
    StaffService::new(SqliteStaffRepository::try_new(&conn).unwrap())
        .create(&StaffMember::new("T001", "Teacher"))
        .unwrap();

    let reports = reports(&conn);
    let overall = reports.overall_statistics().unwrap();
    assert_eq!(overall.total_people, 2);
    assert_eq!(overall.total_staff, 1);
    assert_eq!(overall.total_records, 4);
    assert_eq!(overall.pooled_average_percentage, 25.0);

    let cs = &reports.department_report().unwrap()[0];
    assert_eq!(cs.average_percentage, 50.0);
}

#[test]
fn overall_statistics_on_empty_store_are_zero() {
    let conn = open_db_in_memory().unwrap();
    let overall = reports(&conn).overall_statistics().unwrap();

    assert_eq!(overall.total_people, 0);
    assert_eq!(overall.total_staff, 0);
    assert_eq!(overall.total_records, 0);
    assert_eq!(overall.pooled_average_percentage, 0.0);
}

#[test]
fn demo_seed_produces_expected_reports_and_is_repeatable() {
    let conn = open_db_in_memory().unwrap();

    let first = seed_demo_data(&conn).unwrap();
    assert_eq!(first.people_created, 10);
    assert_eq!(first.staff_created, 5);
    assert_eq!(first.records_created, 100);
    assert!(first.default_head_created);

    let second = seed_demo_data(&conn).unwrap();
    assert_eq!(second.people_created, 0);
    assert_eq!(second.records_created, 0);
    assert!(!second.default_head_created);

    let reports = reports(&conn);
    assert_eq!(reports.percentage("001").unwrap(), 90.0);
    assert_eq!(reports.percentage("003").unwrap(), 60.0);
    assert_eq!(people(&conn).get("002").unwrap().total_classes, 10);

    let low = reports
        .low_attendance(DEFAULT_LOW_ATTENDANCE_THRESHOLD)
        .unwrap()
        .into_iter()
        .map(|row| row.person_id)
        .collect::<Vec<_>>();
    assert_eq!(low, vec!["003", "005", "009"]);

    let overall = reports.overall_statistics().unwrap();
    assert_eq!(overall.total_people, 10);
    assert_eq!(overall.total_staff, 5);
    assert_eq!(overall.total_records, 100);
    assert_eq!(format_percentage(overall.pooled_average_percentage), "81.00%");
}
