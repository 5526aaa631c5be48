//! Soft deletion, restore, and purge scheduling for accounts.
//!
//! A soft-deleted account keeps its row; `deleted_at` records the date after
//! which an external purge job may remove it. The root admin can never be
//! deleted.

use chrono::{DateTime, Duration, Utc};

use acad_core::entities::Account;
use acad_core::identity::Actor;
use acad_core::responses::{BulkDeleteReport, SoftDeleteReceipt};

use crate::error::DatabaseError;
use crate::repos::account::{SELECT_COLS, require_account, row_to_account};
use crate::service::AcadService;

impl AcadService {
    fn purge_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::days(self.lifecycle().purge_grace_days)
    }

    fn is_root_admin(&self, unique_id: &str) -> bool {
        self.lifecycle().root_admin_id == unique_id
    }

    /// Mark an account deleted and schedule it for purge.
    ///
    /// Admins may delete anyone; other accounts may only delete themselves.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for a non-admin deleting someone else, `Validation` for
    /// the root admin, `NotFound` for an unknown account.
    pub async fn soft_delete(
        &self,
        actor: &Actor,
        unique_id: &str,
    ) -> Result<SoftDeleteReceipt, DatabaseError> {
        if !actor.is_admin() && !actor.is_self(unique_id) {
            return Err(DatabaseError::unauthorized(format!(
                "'{}' may not delete '{unique_id}'",
                actor.unique_id
            )));
        }
        if self.is_root_admin(unique_id) {
            return Err(DatabaseError::validation("the root admin cannot be deleted"));
        }

        let now = Utc::now();
        let purge_after = self.purge_after(now);
        let tx = self.db().begin_write().await?;
        let outcome = async {
            let changed = tx
                .execute(
                    "UPDATE accounts SET is_deleted = 1, deleted_at = ?1, updated_at = ?2 \
                     WHERE unique_id = ?3",
                    libsql::params![purge_after.to_rfc3339(), now.to_rfc3339(), unique_id],
                )
                .await?;
            if changed == 0 {
                return Err(DatabaseError::not_found("account", unique_id));
            }
            Ok(())
        }
        .await;
        tx.finish(outcome).await?;

        tracing::info!(unique_id, actor = %actor.unique_id, %purge_after, "account soft-deleted");
        Ok(SoftDeleteReceipt {
            unique_id: unique_id.to_string(),
            purge_after,
        })
    }

    /// Clear the deleted mark and purge date.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown account.
    pub async fn restore(&self, unique_id: &str) -> Result<Account, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let outcome = async {
            let changed = tx
                .execute(
                    "UPDATE accounts SET is_deleted = 0, deleted_at = NULL, updated_at = ?1 \
                     WHERE unique_id = ?2",
                    libsql::params![Utc::now().to_rfc3339(), unique_id],
                )
                .await?;
            if changed == 0 {
                return Err(DatabaseError::not_found("account", unique_id));
            }
            require_account(&tx, unique_id).await
        }
        .await;
        let account = tx.finish(outcome).await?;
        tracing::info!(unique_id, "account restored");
        Ok(account)
    }

    /// Soft-delete many accounts at once. The root admin is skipped and
    /// reported rather than failing the batch; unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless the actor is an admin, `Validation` for an empty
    /// list.
    pub async fn bulk_soft_delete(
        &self,
        actor: &Actor,
        unique_ids: &[String],
    ) -> Result<BulkDeleteReport, DatabaseError> {
        if !actor.is_admin() {
            return Err(DatabaseError::unauthorized(
                "only admins may delete accounts in bulk",
            ));
        }
        if unique_ids.is_empty() {
            return Err(DatabaseError::validation("no accounts given"));
        }

        let (skipped, targets): (Vec<String>, Vec<String>) = unique_ids
            .iter()
            .cloned()
            .partition(|id| self.is_root_admin(id));
        if !skipped.is_empty() {
            tracing::warn!(skipped = ?skipped, "root admin excluded from bulk delete");
        }

        let now = Utc::now();
        let purge_after = self.purge_after(now);
        let tx = self.db().begin_write().await?;
        let outcome = async {
            let mut marked = 0u64;
            for id in &targets {
                marked += tx
                    .execute(
                        "UPDATE accounts SET is_deleted = 1, deleted_at = ?1, updated_at = ?2 \
                         WHERE unique_id = ?3 AND is_deleted = 0",
                        libsql::params![purge_after.to_rfc3339(), now.to_rfc3339(), id.as_str()],
                    )
                    .await?;
            }
            Ok(marked)
        }
        .await;
        let marked_count = tx.finish(outcome).await?;

        tracing::info!(marked_count, actor = %actor.unique_id, "bulk soft delete");
        Ok(BulkDeleteReport {
            marked_count,
            skipped,
            purge_after,
        })
    }

    /// Deleted accounts whose purge date is at or before `now`.
    pub async fn purge_candidates(&self, now: DateTime<Utc>) -> Result<Vec<Account>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM accounts \
                     WHERE is_deleted = 1 AND deleted_at IS NOT NULL AND deleted_at <= ?1 \
                     ORDER BY deleted_at"
                ),
                [now.to_rfc3339()],
            )
            .await?;
        let mut accounts = Vec::new();
        while let Some(row) = rows.next().await? {
            accounts.push(row_to_account(&row)?);
        }
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{create_staff, create_student, test_service};
    use acad_core::enums::Role;
    use acad_core::errors::ErrorKind;
    use pretty_assertions::assert_eq;

    fn admin() -> Actor {
        Actor::new("adm", Role::Admin)
    }

    #[tokio::test]
    async fn soft_delete_schedules_purge() {
        let svc = test_service().await;
        create_student(&svc, "s", 100).await;

        let receipt = svc.soft_delete(&admin(), "s").await.unwrap();
        let days = (receipt.purge_after - Utc::now()).num_days();
        assert!((29..=30).contains(&days), "purge in {days} days");

        let account = svc.get_account("s").await.unwrap();
        assert!(account.is_deleted);
        assert_eq!(
            account.deleted_at.map(|d| d.timestamp()),
            Some(receipt.purge_after.timestamp())
        );
    }

    #[tokio::test]
    async fn accounts_may_delete_themselves_only() {
        let svc = test_service().await;
        create_student(&svc, "s1", 100).await;
        create_student(&svc, "s2", 100).await;
        let actor = Actor::new("s1", Role::Student);

        let err = svc.soft_delete(&actor, "s2").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        svc.soft_delete(&actor, "s1").await.unwrap();
    }

    #[tokio::test]
    async fn root_admin_cannot_be_deleted() {
        let svc = test_service().await;
        svc.ensure_root_admin().await.unwrap();
        let err = svc.soft_delete(&admin(), "1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn soft_delete_missing_is_not_found() {
        let svc = test_service().await;
        let err = svc.soft_delete(&admin(), "ghost").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn restore_clears_deletion() {
        let svc = test_service().await;
        create_student(&svc, "s", 100).await;
        svc.soft_delete(&admin(), "s").await.unwrap();

        let restored = svc.restore("s").await.unwrap();
        assert!(!restored.is_deleted);
        assert!(restored.deleted_at.is_none());

        let err = svc.restore("ghost").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn bulk_delete_skips_root_admin() {
        let svc = test_service().await;
        svc.ensure_root_admin().await.unwrap();
        create_student(&svc, "2", 100).await;
        create_staff(&svc, "3", Role::Lecturer).await;

        let ids = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        let report = svc.bulk_soft_delete(&admin(), &ids).await.unwrap();
        assert_eq!(report.marked_count, 2);
        assert_eq!(report.skipped, vec!["1".to_string()]);
        assert!(!svc.get_account("1").await.unwrap().is_deleted);
        assert!(svc.get_account("2").await.unwrap().is_deleted);
    }

    #[tokio::test]
    async fn bulk_delete_requires_admin_and_ids() {
        let svc = test_service().await;
        let lecturer = Actor::new("l", Role::Lecturer);
        let err = svc
            .bulk_soft_delete(&lecturer, &["2".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let err = svc.bulk_soft_delete(&admin(), &[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn purge_candidates_respect_grace_period() {
        let svc = test_service().await;
        create_student(&svc, "s", 100).await;
        svc.soft_delete(&admin(), "s").await.unwrap();

        assert!(svc.purge_candidates(Utc::now()).await.unwrap().is_empty());
        let later = Utc::now() + Duration::days(31);
        let due = svc.purge_candidates(later).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].unique_id, "s");
    }
}
