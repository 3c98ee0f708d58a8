//! Staff registry use-case service.

use crate::model::staff::{StaffMember, StaffPatch};
use crate::model::PatchOutcome;
use crate::repo::staff_repo::StaffRepository;
use crate::repo::RepoResult;
use crate::service::log_write_failure;
use log::info;
use std::time::Instant;

const MODULE: &str = "staff";

pub struct StaffService<R: StaffRepository> {
    repo: R,
}

impl<R: StaffRepository> StaffService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create(&self, member: &StaffMember) -> RepoResult<()> {
        let started_at = Instant::now();
        self.repo
            .create_staff(member)
            .inspect(|_| {
                info!(
                    "event=staff_create module={} status=ok id={} duration_ms={}",
                    MODULE,
                    member.id,
                    started_at.elapsed().as_millis()
                );
            })
            .inspect_err(|err| {
                log_write_failure("staff_create", MODULE, &member.id, started_at, err);
            })
    }

    /// Applies non-empty fields; `NoChanges` when the patch carries nothing.
    pub fn patch(&self, id: &str, patch: &StaffPatch) -> RepoResult<PatchOutcome> {
        let started_at = Instant::now();
        self.repo
            .patch_staff(id, patch)
            .inspect(|outcome| {
                info!(
                    "event=staff_patch module={} status=ok id={} outcome={:?} duration_ms={}",
                    MODULE,
                    id,
                    outcome,
                    started_at.elapsed().as_millis()
                );
            })
            .inspect_err(|err| log_write_failure("staff_patch", MODULE, id, started_at, err))
    }

    pub fn find(&self, id: &str) -> RepoResult<Option<StaffMember>> {
        self.repo.get_staff(id)
    }

    pub fn delete(&self, id: &str) -> RepoResult<()> {
        let started_at = Instant::now();
        self.repo
            .delete_staff(id)
            .inspect(|_| {
                info!(
                    "event=staff_delete module={} status=ok id={} duration_ms={}",
                    MODULE,
                    id,
                    started_at.elapsed().as_millis()
                );
            })
            .inspect_err(|err| log_write_failure("staff_delete", MODULE, id, started_at, err))
    }

    pub fn list_all(&self) -> RepoResult<Vec<StaffMember>> {
        self.repo.list_staff()
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count_staff()
    }
}
