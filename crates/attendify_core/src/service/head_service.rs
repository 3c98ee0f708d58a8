//! Department head registry use-case service.
//!
//! # Invariants
//! - Secrets are never logged, not even as digests.
//! - `ensure_default_head` only writes when the registry is empty.

use crate::model::head::{DepartmentHead, NewDepartmentHead};
use crate::repo::head_repo::HeadRepository;
use crate::repo::RepoResult;
use crate::service::log_write_failure;
use log::{info, warn};
use std::time::Instant;

const MODULE: &str = "heads";

pub struct HeadService<R: HeadRepository> {
    repo: R,
}

impl<R: HeadRepository> HeadService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create(&self, head: &NewDepartmentHead) -> RepoResult<()> {
        let started_at = Instant::now();
        match self.repo.create_head(head) {
            Ok(()) => {
                info!(
                    "event=head_create module={} status=ok id={} duration_ms={}",
                    MODULE,
                    head.id,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                log_write_failure("head_create", MODULE, &head.id, started_at, &err);
                Err(err)
            }
        }
    }

    pub fn find(&self, id: &str) -> RepoResult<Option<DepartmentHead>> {
        self.repo.get_head(id)
    }

    pub fn list_all(&self) -> RepoResult<Vec<DepartmentHead>> {
        self.repo.list_heads()
    }

    /// Checks a login secret. Unknown ids and wrong secrets both return `false`.
    pub fn verify_secret(&self, id: &str, secret: &str) -> RepoResult<bool> {
        let matched = self.repo.verify_secret(id, secret)?;
        if !matched {
            warn!(
                "event=head_verify module={} status=rejected id={}",
                MODULE, id
            );
        }
        Ok(matched)
    }

    /// Provisions the default head when no head exists yet.
    ///
    /// Returns `true` when a head was created, `false` when the registry
    /// already had at least one entry.
    pub fn ensure_default_head(&self) -> RepoResult<bool> {
        if self.repo.count_heads()? > 0 {
            return Ok(false);
        }
        self.create(&NewDepartmentHead::default_head())?;
        Ok(true)
    }
}
