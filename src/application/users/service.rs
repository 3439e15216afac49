//! User management service, application-layer orchestration
//!
//! HTTP handlers are thin wrappers that decide what absence means and
//! delegate storage and export work to this service.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::info;

use super::export::{ExportError, FileExporter};
use crate::domain::{DomainResult, User, UserRepositoryInterface};

/// Service shared by the HTTP layer, erased over the concrete store.
pub type SharedUserService = Arc<UserService<dyn UserRepositoryInterface>>;

/// User service, generic over `R: UserRepositoryInterface` so it stays
/// decoupled from the concrete persistence layer.
pub struct UserService<R: UserRepositoryInterface + ?Sized> {
    repo: Arc<R>,
    exporter: FileExporter,
}

impl<R: UserRepositoryInterface + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>, exporter: FileExporter) -> Self {
        Self { repo, exporter }
    }

    pub fn exporter(&self) -> &FileExporter {
        &self.exporter
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        self.repo.find_by_id(id).await
    }

    pub async fn find_by_oib(&self, oib: &str) -> DomainResult<Option<User>> {
        info!(oib, "Finding user by OIB");
        self.repo.find_by_oib(oib).await
    }

    pub async fn ping(&self) -> DomainResult<()> {
        self.repo.ping().await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Insert or update depending on whether the user already has an id.
    pub async fn save(&self, user: User) -> DomainResult<User> {
        let inserting = user.is_new();
        info!(oib = %user.oib, inserting, "Saving user");

        let saved = self.repo.save(user).await?;
        if inserting {
            metrics::counter!("users_created_total").increment(1);
        }
        Ok(saved)
    }

    /// Delete by OIB. Deleting an unknown OIB is a no-op.
    pub async fn delete_by_oib(&self, oib: &str) -> DomainResult<()> {
        self.repo.delete_by_oib(oib).await?;
        metrics::counter!("users_deleted_total").increment(1);
        info!(oib, "User has been deleted");
        Ok(())
    }

    /// Write the export file for `user` stamped with the current local time.
    ///
    /// Returns the file name; the caller is responsible for storing it on
    /// the user.
    pub async fn generate_file(&self, user: &User) -> Result<String, ExportError> {
        self.generate_file_at(user, Local::now().naive_local()).await
    }

    pub async fn generate_file_at(
        &self,
        user: &User,
        at: NaiveDateTime,
    ) -> Result<String, ExportError> {
        info!(oib = %user.oib, "Generating export file");

        let file_name = self.exporter.write(user, at).await?;
        metrics::counter!("export_files_generated_total").increment(1);

        info!(
            oib = %user.oib,
            file_name = %file_name,
            directory = %self.exporter.directory().display(),
            "Export file generated"
        );
        Ok(file_name)
    }
}
