//! Person registry use-case service.
//!
//! # Responsibility
//! - Provide create/patch/find/delete/list entry points for the roster.
//! - Log every registry write with outcome and duration.
//!
//! # Invariants
//! - `total_classes` cannot be set through this service.
//! - Delete is all-or-nothing: ledger rows and the person row go together.

use crate::model::person::{NewPerson, Person, PersonOrder, PersonPatch};
use crate::model::PatchOutcome;
use crate::repo::person_repo::PersonRepository;
use crate::repo::{EntityKind, RepoError, RepoResult};
use crate::service::log_write_failure;
use log::info;
use std::time::Instant;

const MODULE: &str = "registry";

/// Use-case service wrapper for the person registry.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new person.
    ///
    /// Fails with `AlreadyExists` when the id is taken.
    pub fn create(&self, person: &NewPerson) -> RepoResult<()> {
        let started_at = Instant::now();
        match self.repo.create_person(person) {
            Ok(()) => {
                info!(
                    "event=person_create module={} status=ok id={} duration_ms={}",
                    MODULE,
                    person.id,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                log_write_failure("person_create", MODULE, &person.id, started_at, &err);
                Err(err)
            }
        }
    }

    /// Applies the non-empty fields of `patch`.
    ///
    /// Returns `PatchOutcome::NoChanges` without touching storage when the
    /// patch carries nothing; fails with `NotFound` for an unknown id.
    pub fn patch(&self, id: &str, patch: &PersonPatch) -> RepoResult<PatchOutcome> {
        let started_at = Instant::now();
        match self.repo.patch_person(id, patch) {
            Ok(outcome) => {
                info!(
                    "event=person_patch module={} status=ok id={} outcome={:?} duration_ms={}",
                    MODULE,
                    id,
                    outcome,
                    started_at.elapsed().as_millis()
                );
                Ok(outcome)
            }
            Err(err) => {
                log_write_failure("person_patch", MODULE, id, started_at, &err);
                Err(err)
            }
        }
    }

    /// Looks up one person; `None` is the not-found signal.
    pub fn find(&self, id: &str) -> RepoResult<Option<Person>> {
        self.repo.get_person(id)
    }

    /// Like [`PersonService::find`] but maps absence to `NotFound`.
    pub fn get(&self, id: &str) -> RepoResult<Person> {
        self.repo
            .get_person(id)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Person, id))
    }

    /// Removes a person together with every attendance record it owns.
    pub fn delete(&self, id: &str) -> RepoResult<()> {
        let started_at = Instant::now();
        match self.repo.delete_person(id) {
            Ok(removed_records) => {
                info!(
                    "event=person_delete module={} status=ok id={} removed_records={} duration_ms={}",
                    MODULE,
                    id,
                    removed_records,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                log_write_failure("person_delete", MODULE, id, started_at, &err);
                Err(err)
            }
        }
    }

    /// Lists the whole roster. The returned vector can be iterated any number
    /// of times; each call re-reads storage.
    pub fn list_all(&self, order: PersonOrder) -> RepoResult<Vec<Person>> {
        self.repo.list_people(order)
    }

    pub fn exists(&self, id: &str) -> RepoResult<bool> {
        self.repo.person_exists(id)
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count_people()
    }
}
