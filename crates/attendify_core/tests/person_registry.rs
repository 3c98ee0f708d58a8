use attendify_core::db::open_db_in_memory;
use attendify_core::repo::attendance_repo::SqliteAttendanceRepository;
use attendify_core::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use attendify_core::{
    AttendanceService, AttendanceStatus, EntityKind, NewPerson, PatchOutcome, PersonOrder,
    PersonPatch, PersonService, RepoError, ValidationError,
};
use rusqlite::Connection;

fn people(conn: &Connection) -> PersonService<SqlitePersonRepository<'_>> {
    PersonService::new(SqlitePersonRepository::try_new(conn).unwrap())
}

fn ledger(conn: &Connection) -> AttendanceService<SqliteAttendanceRepository<'_>> {
    AttendanceService::new(SqliteAttendanceRepository::try_new(conn).unwrap())
}

#[test]
fn create_and_find_roundtrip_starts_with_zero_classes() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);

    service
        .create(
            &NewPerson::new("001", "Aarav Mehta")
                .with_contact("aarav@example.edu")
                .with_cohort("Computer Science"),
        )
        .unwrap();

    let loaded = service.find("001").unwrap().unwrap();
    assert_eq!(loaded.name, "Aarav Mehta");
    assert_eq!(loaded.contact.as_deref(), Some("aarav@example.edu"));
    assert_eq!(loaded.cohort.as_deref(), Some("Computer Science"));
    assert_eq!(loaded.total_classes, 0);
    assert!(service.exists("001").unwrap());
    assert_eq!(service.count().unwrap(), 1);
}

#[test]
fn create_rejects_taken_id() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);
    service.create(&NewPerson::new("001", "First")).unwrap();

    let err = service.create(&NewPerson::new("001", "Second")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::AlreadyExists {
            entity: EntityKind::Person,
            ref id,
        } if id == "001"
    ));
    assert_eq!(service.get("001").unwrap().name, "First");
}

#[test]
fn create_rejects_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);

    let err = service.create(&NewPerson::new("001", "   ")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyField("name"))
    ));
    assert_eq!(service.count().unwrap(), 0);
}

#[test]
fn find_missing_person_returns_none_and_get_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);

    assert!(service.find("999").unwrap().is_none());
    assert!(matches!(
        service.get("999"),
        Err(RepoError::NotFound { .. })
    ));
}

#[test]
fn patch_applies_only_non_empty_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);
    service
        .create(
            &NewPerson::new("001", "Ada")
                .with_contact("ada@example.edu")
                .with_cohort("Math"),
        )
        .unwrap();

    let outcome = service
        .patch(
            "001",
            &PersonPatch {
                name: Some("Ada Lovelace".to_string()),
                contact: Some("   ".to_string()),
                cohort: None,
            },
        )
        .unwrap();
    assert_eq!(outcome, PatchOutcome::Applied);

    let loaded = service.get("001").unwrap();
    assert_eq!(loaded.name, "Ada Lovelace");
    assert_eq!(loaded.contact.as_deref(), Some("ada@example.edu"));
    assert_eq!(loaded.cohort.as_deref(), Some("Math"));
}

#[test]
fn empty_patch_is_a_no_op_even_for_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);

    assert_eq!(
        service.patch("999", &PersonPatch::default()).unwrap(),
        PatchOutcome::NoChanges
    );
}

#[test]
fn patch_unknown_person_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);

    let err = service
        .patch(
            "999",
            &PersonPatch {
                name: Some("Nobody".to_string()),
                ..PersonPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn patch_never_touches_total_classes() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);
    service.create(&NewPerson::new("001", "Ada")).unwrap();
    ledger(&conn)
        .mark("001", "2026-01-01", AttendanceStatus::Present)
        .unwrap();

    service
        .patch(
            "001",
            &PersonPatch {
                cohort: Some("Physics".to_string()),
                ..PersonPatch::default()
            },
        )
        .unwrap();

    assert_eq!(service.get("001").unwrap().total_classes, 1);
}

#[test]
fn delete_cascades_attendance_records() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);
    let ledger = ledger(&conn);
    service.create(&NewPerson::new("001", "Ada")).unwrap();
    service.create(&NewPerson::new("002", "Grace")).unwrap();
    for date in ["2026-01-01", "2026-01-02", "2026-01-03"] {
        ledger.mark("001", date, AttendanceStatus::Present).unwrap();
        ledger.mark("002", date, AttendanceStatus::Absent).unwrap();
    }

    service.delete("001").unwrap();

    assert!(service.find("001").unwrap().is_none());
    assert!(ledger.by_person("001").unwrap().is_empty());
    assert_eq!(ledger.by_person("002").unwrap().len(), 3);
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM attendance;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 3);
}

#[test]
fn delete_reports_removed_record_count_and_rejects_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();
    repo.create_person(&NewPerson::new("001", "Ada")).unwrap();
    ledger(&conn)
        .mark("001", "2026-01-01", AttendanceStatus::Absent)
        .unwrap();

    assert_eq!(repo.delete_person("001").unwrap(), 1);
    assert!(matches!(
        repo.delete_person("001"),
        Err(RepoError::NotFound { .. })
    ));
}

#[test]
fn list_all_orders_by_id_or_cohort_then_id() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);
    service
        .create(&NewPerson::new("003", "C").with_cohort("Alpha"))
        .unwrap();
    service
        .create(&NewPerson::new("001", "A").with_cohort("Beta"))
        .unwrap();
    service
        .create(&NewPerson::new("002", "B").with_cohort("Alpha"))
        .unwrap();

    let by_id = service
        .list_all(PersonOrder::Id)
        .unwrap()
        .into_iter()
        .map(|person| person.id)
        .collect::<Vec<_>>();
    assert_eq!(by_id, vec!["001", "002", "003"]);

    let by_cohort = service
        .list_all(PersonOrder::CohortThenId)
        .unwrap()
        .into_iter()
        .map(|person| person.id)
        .collect::<Vec<_>>();
    assert_eq!(by_cohort, vec!["002", "003", "001"]);
}

#[test]
fn list_all_is_restartable() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);
    service.create(&NewPerson::new("001", "A")).unwrap();

    let first = service.list_all(PersonOrder::default()).unwrap();
    let second = service.list_all(PersonOrder::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn failed_person_delete_keeps_attendance_records() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);
    service.create(&NewPerson::new("001", "Ada")).unwrap();
    let ledger = ledger(&conn);
    for date in ["2026-01-01", "2026-01-02"] {
        ledger.mark("001", date, AttendanceStatus::Present).unwrap();
    }
    conn.execute_batch(
        "CREATE TRIGGER block_person_delete BEFORE DELETE ON people
         BEGIN SELECT RAISE(ABORT, 'people are read-only'); END;",
    )
    .unwrap();

    let err = service.delete("001").unwrap_err();

    assert!(err.is_storage_failure(), "{err}");
    assert!(conn.is_autocommit());
    assert!(service.find("001").unwrap().is_some());
    assert_eq!(ledger.by_person("001").unwrap().len(), 2);
}

#[test]
fn padded_ids_are_rejected_instead_of_aliasing() {
    let conn = open_db_in_memory().unwrap();
    let service = people(&conn);
    service.create(&NewPerson::new("001", "Ada")).unwrap();

    for padded in [" 001", "001 ", "\t002"] {
        assert!(matches!(
            service.create(&NewPerson::new(padded, "Shadow")),
            Err(RepoError::Validation(ValidationError::PaddedId("id")))
        ));
    }
    assert_eq!(service.count().unwrap(), 1);
}
