//! Adviser-level assignment.
//!
//! At most one active adviser may hold a level at a time. Assigning a level
//! deactivates whoever held it, then upserts the (adviser, session)
//! assignment, all inside one write transaction. The partial unique index
//! `idx_accounts_active_adviser_level` backs the rule at the storage layer.

use chrono::Utc;

use acad_core::entities::{AdviserAssignment, AdviserAssignmentView};
use acad_core::enums::Role;
use acad_core::ids::PREFIX_ADVISER_ASSIGNMENT;

use crate::error::DatabaseError;
use crate::generate_id;
use crate::helpers::{get_bool, parse_datetime};
use crate::repos::account::require_account;
use crate::repos::session::find_session_by_label;
use crate::service::AcadService;

const SELECT_COLS: &str =
    "id, adviser_id, session_id, level_handled, published, created_at, updated_at";

fn row_to_assignment(row: &libsql::Row) -> Result<AdviserAssignment, DatabaseError> {
    Ok(AdviserAssignment {
        id: row.get(0)?,
        adviser_id: row.get(1)?,
        session_id: row.get(2)?,
        level_handled: row.get(3)?,
        published: get_bool(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

pub(crate) async fn find_assignment(
    conn: &libsql::Connection,
    adviser_id: &str,
    session_id: &str,
) -> Result<Option<AdviserAssignment>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM adviser_assignments \
                 WHERE adviser_id = ?1 AND session_id = ?2"
            ),
            libsql::params![adviser_id, session_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_assignment(&row)?)),
        None => Ok(None),
    }
}

async fn assign_in_tx(
    conn: &libsql::Connection,
    adviser_id: &str,
    level: i64,
    session_label: &str,
) -> Result<AdviserAssignment, DatabaseError> {
    let adviser = require_account(conn, adviser_id).await?;
    let session = find_session_by_label(conn, session_label)
        .await?
        .ok_or_else(|| DatabaseError::not_found("session", session_label))?;
    if adviser.role != Role::CourseAdviser {
        return Err(DatabaseError::validation(format!(
            "'{adviser_id}' is a {}, not a course adviser",
            adviser.role
        )));
    }
    if !session.is_current {
        return Err(DatabaseError::validation(format!(
            "advisers can only be assigned in the current session, not '{session_label}'"
        )));
    }
    let now = Utc::now().to_rfc3339();

    let displaced = conn
        .execute(
            "UPDATE accounts SET active_adviser = 0, updated_at = ?1 \
             WHERE active_adviser = 1 AND adviser_level = ?2 AND unique_id != ?3",
            libsql::params![now.as_str(), level, adviser_id],
        )
        .await?;
    if displaced > 0 {
        tracing::info!(level, displaced, "previous adviser for level deactivated");
    }

    let id = generate_id(conn, PREFIX_ADVISER_ASSIGNMENT).await?;
    conn.execute(
        "INSERT INTO adviser_assignments \
         (id, adviser_id, session_id, level_handled, published, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5) \
         ON CONFLICT(adviser_id, session_id) DO UPDATE SET \
         level_handled = excluded.level_handled, updated_at = excluded.updated_at",
        libsql::params![id, adviser_id, session.id.as_str(), level, now.as_str()],
    )
    .await?;

    conn.execute(
        "UPDATE accounts SET adviser_level = ?1, active_adviser = 1, updated_at = ?2 \
         WHERE unique_id = ?3",
        libsql::params![level, now.as_str(), adviser_id],
    )
    .await?;

    find_assignment(conn, adviser_id, &session.id)
        .await?
        .ok_or(DatabaseError::NoResult)
}

impl AcadService {
    /// Make `adviser_id` the active adviser for `level` in `session_label`,
    /// which must be the current session.
    ///
    /// # Errors
    ///
    /// `Validation` for a non-positive level, a non-adviser account, or a
    /// session that is not current. `NotFound` if the adviser or session is
    /// missing.
    pub async fn assign_adviser_level(
        &self,
        adviser_id: &str,
        level: i64,
        session_label: &str,
    ) -> Result<AdviserAssignment, DatabaseError> {
        if level <= 0 {
            return Err(DatabaseError::validation(format!(
                "adviser level must be positive, got {level}"
            )));
        }
        let tx = self.db().begin_write().await?;
        let outcome = assign_in_tx(&tx, adviser_id, level, session_label).await;
        let assignment = tx.finish(outcome).await?;
        tracing::info!(adviser = adviser_id, level, session = session_label, "adviser assigned");
        Ok(assignment)
    }

    /// Every assignment an adviser has held, newest session first.
    ///
    /// # Errors
    ///
    /// `NotFound` if the adviser does not exist.
    pub async fn adviser_assignments(
        &self,
        adviser_id: &str,
    ) -> Result<Vec<AdviserAssignmentView>, DatabaseError> {
        let conn = self.db().conn();
        require_account(conn, adviser_id).await?;
        let mut rows = conn
            .query(
                "SELECT a.session_id, s.label, a.level_handled, a.published \
                 FROM adviser_assignments a JOIN sessions s ON s.id = a.session_id \
                 WHERE a.adviser_id = ?1 ORDER BY s.created_at DESC",
                [adviser_id],
            )
            .await?;
        let mut views = Vec::new();
        while let Some(row) = rows.next().await? {
            views.push(AdviserAssignmentView {
                session_id: row.get(0)?,
                session_label: row.get(1)?,
                level_handled: row.get(2)?,
                published: get_bool(&row, 3)?,
            });
        }
        Ok(views)
    }
}
