//! Aggregation engine over the registry and ledger.
//!
//! # Responsibility
//! - Derive percentages, counts and group reports from stored records.
//!
//! # Invariants
//! - Pure reads, no cross-call state.
//! - Zero-record people score 0.0 and are never reported as missing.
//! - `department_report` averages per-person percentages while
//!   `overall_statistics` pools every record; the two are not interchangeable.

use crate::model::attendance::AttendanceTally;
use crate::model::person::PersonId;
use crate::repo::report_repo::ReportRepository;
use crate::repo::RepoResult;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Record counts for one person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceStats {
    pub total: u32,
    pub present: u32,
    pub absent: u32,
}

impl From<AttendanceTally> for AttendanceStats {
    fn from(tally: AttendanceTally) -> Self {
        Self {
            total: tally.total,
            present: tally.present,
            absent: tally.absent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub person_id: PersonId,
    pub name: String,
    pub total: u32,
    pub present: u32,
    pub percentage: f64,
}

/// One cohort group. `cohort == None` collects people without a cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentReportRow {
    pub cohort: Option<String>,
    pub student_count: u64,
    pub average_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowAttendanceRow {
    pub person_id: PersonId,
    pub name: String,
    pub cohort: Option<String>,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStatistics {
    pub total_people: u64,
    pub total_staff: u64,
    /// Record-level average: every record is a 100 or 0 sample.
    pub pooled_average_percentage: f64,
    pub total_records: u64,
}

/// Read-only reporting service.
pub struct ReportService<R: ReportRepository> {
    repo: R,
}

impl<R: ReportRepository> ReportService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// `100 * present / total` for one person, 0.0 when there are no records.
    pub fn percentage(&self, person_id: &str) -> RepoResult<f64> {
        Ok(self.repo.tally_for_person(person_id)?.percentage())
    }

    pub fn stats(&self, person_id: &str) -> RepoResult<AttendanceStats> {
        Ok(self.repo.tally_for_person(person_id)?.into())
    }

    /// One row per registered person, ordered by id.
    pub fn summary(&self) -> RepoResult<Vec<SummaryRow>> {
        let rows = self
            .repo
            .person_tallies()?
            .into_iter()
            .map(|entry| SummaryRow {
                percentage: entry.tally.percentage(),
                total: entry.tally.total,
                present: entry.tally.present,
                person_id: entry.person_id,
                name: entry.name,
            })
            .collect::<Vec<_>>();
        debug!("event=report_summary module=reports status=ok rows={}", rows.len());
        Ok(rows)
    }

    /// Groups people by cohort and averages their individual percentages.
    pub fn department_report(&self) -> RepoResult<Vec<DepartmentReportRow>> {
        let mut groups: BTreeMap<Option<String>, (u64, f64)> = BTreeMap::new();
        for entry in self.repo.person_tallies()? {
            let (count, sum) = groups.entry(entry.cohort).or_insert((0, 0.0));
            *count += 1;
            *sum += entry.tally.percentage();
        }

        let rows = groups
            .into_iter()
            .map(|(cohort, (student_count, sum))| DepartmentReportRow {
                cohort,
                student_count,
                average_percentage: sum / student_count as f64,
            })
            .collect::<Vec<_>>();
        debug!(
            "event=report_departments module=reports status=ok groups={}",
            rows.len()
        );
        Ok(rows)
    }

    /// People strictly below `threshold`, lowest first, ties by id.
    pub fn low_attendance(&self, threshold: f64) -> RepoResult<Vec<LowAttendanceRow>> {
        let mut rows = self
            .repo
            .person_tallies()?
            .into_iter()
            .map(|entry| LowAttendanceRow {
                percentage: entry.tally.percentage(),
                person_id: entry.person_id,
                name: entry.name,
                cohort: entry.cohort,
            })
            .filter(|row| row.percentage < threshold)
            .collect::<Vec<_>>();
        rows.sort_by(|left, right| {
            left.percentage
                .total_cmp(&right.percentage)
                .then_with(|| left.person_id.cmp(&right.person_id))
        });
        debug!(
            "event=report_low_attendance module=reports status=ok threshold={} rows={}",
            threshold,
            rows.len()
        );
        Ok(rows)
    }

    pub fn overall_statistics(&self) -> RepoResult<OverallStatistics> {
        let totals = self.repo.ledger_totals()?;
        let pooled_average_percentage = if totals.records == 0 {
            0.0
        } else {
            totals.present as f64 * 100.0 / totals.records as f64
        };
        Ok(OverallStatistics {
            total_people: self.repo.count_people()?,
            total_staff: self.repo.count_staff()?,
            pooled_average_percentage,
            total_records: totals.records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::report_repo::{LedgerTotals, PersonTally};

    struct FixedTallies(Vec<PersonTally>);

    impl ReportRepository for FixedTallies {
        fn tally_for_person(&self, person_id: &str) -> RepoResult<AttendanceTally> {
            Ok(self
                .0
                .iter()
                .find(|entry| entry.person_id == person_id)
                .map(|entry| entry.tally)
                .unwrap_or_default())
        }

        fn person_tallies(&self) -> RepoResult<Vec<PersonTally>> {
            Ok(self.0.clone())
        }

        fn ledger_totals(&self) -> RepoResult<LedgerTotals> {
            Ok(self.0.iter().fold(LedgerTotals::default(), |acc, entry| {
                LedgerTotals {
                    records: acc.records + u64::from(entry.tally.total),
                    present: acc.present + u64::from(entry.tally.present),
                }
            }))
        }

        fn count_people(&self) -> RepoResult<u64> {
            Ok(self.0.len() as u64)
        }

        fn count_staff(&self) -> RepoResult<u64> {
            Ok(0)
        }
    }

    fn tally(id: &str, cohort: Option<&str>, total: u32, present: u32) -> PersonTally {
        PersonTally {
            person_id: id.to_string(),
            name: format!("Person {id}"),
            cohort: cohort.map(str::to_string),
            tally: AttendanceTally { total, present },
        }
    }

    #[test]
    fn department_average_differs_from_pooled_average() {
        let service = ReportService::new(FixedTallies(vec![
            tally("a", Some("CS"), 1, 1),
            tally("b", Some("CS"), 3, 0),
        ]));

        let departments = service.department_report().unwrap();
        assert_eq!(departments.len(), 1);
        assert_eq!(departments[0].average_percentage, 50.0);

        let overall = service.overall_statistics().unwrap();
        assert_eq!(overall.pooled_average_percentage, 25.0);
        assert_eq!(overall.total_records, 4);
    }

    #[test]
    fn missing_cohort_group_sorts_first() {
        let service = ReportService::new(FixedTallies(vec![
            tally("a", Some("Math"), 0, 0),
            tally("b", None, 2, 2),
        ]));

        let departments = service.department_report().unwrap();
        assert_eq!(departments[0].cohort, None);
        assert_eq!(departments[0].average_percentage, 100.0);
        assert_eq!(departments[1].cohort.as_deref(), Some("Math"));
    }

    #[test]
    fn low_attendance_ties_are_ordered_by_id() {
        let service = ReportService::new(FixedTallies(vec![
            tally("c", None, 2, 1),
            tally("a", None, 4, 2),
            tally("b", None, 0, 0),
            tally("d", None, 4, 3),
        ]));

        let ids = service
            .low_attendance(75.0)
            .unwrap()
            .into_iter()
            .map(|row| row.person_id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn pooled_average_over_empty_ledger_is_zero() {
        let service = ReportService::new(FixedTallies(Vec::new()));
        let overall = service.overall_statistics().unwrap();
        assert_eq!(overall.pooled_average_percentage, 0.0);
        assert_eq!(overall.total_people, 0);
    }
}
