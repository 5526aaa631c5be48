//! Session repository and the rollover that promotes everyone into a new session.

use std::collections::HashSet;

use chrono::Utc;

use acad_core::entities::Session;
use acad_core::ids::{PREFIX_ADVISER_ASSIGNMENT, PREFIX_SESSION};
use acad_core::promotion::LevelRule;
use acad_core::responses::PromotionSummary;

use crate::error::DatabaseError;
use crate::generate_id;
use crate::helpers::{get_bool, parse_datetime};
use crate::service::AcadService;

const SELECT_COLS: &str = "id, label, is_current, created_at";

fn row_to_session(row: &libsql::Row) -> Result<Session, DatabaseError> {
    Ok(Session {
        id: row.get(0)?,
        label: row.get(1)?,
        is_current: get_bool(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

async fn find_one(
    conn: &libsql::Connection,
    where_clause: &str,
    params: impl libsql::params::IntoParams,
) -> Result<Option<Session>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM sessions WHERE {where_clause}"),
            params,
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_session(&row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn find_current_session(
    conn: &libsql::Connection,
) -> Result<Option<Session>, DatabaseError> {
    find_one(conn, "is_current = 1", ()).await
}

pub(crate) async fn find_session_by_label(
    conn: &libsql::Connection,
    label: &str,
) -> Result<Option<Session>, DatabaseError> {
    find_one(conn, "label = ?1", [label]).await
}

pub(crate) async fn find_session(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<Session>, DatabaseError> {
    find_one(conn, "id = ?1", [id]).await
}

fn validate_label(label: &str) -> Result<&str, DatabaseError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(DatabaseError::validation("session label must not be blank"));
    }
    Ok(label)
}

async fn id_level_pairs(
    conn: &libsql::Connection,
    sql: &str,
) -> Result<Vec<(String, i64)>, DatabaseError> {
    let mut rows = conn.query(sql, ()).await?;
    let mut pairs = Vec::new();
    while let Some(row) = rows.next().await? {
        pairs.push((row.get::<String>(0)?, row.get::<i64>(1)?));
    }
    Ok(pairs)
}

/// Rollover steps, in order:
/// 1. clear the current flag everywhere
/// 2. create the new session as current
/// 3. promote every student
/// 4. promote every course adviser and give each an assignment
/// 5. point every remaining account at the new session
async fn rollover(
    conn: &libsql::Connection,
    label: &str,
    rule: LevelRule,
) -> Result<PromotionSummary, DatabaseError> {
    if find_session_by_label(conn, label).await?.is_some() {
        return Err(DatabaseError::conflict(format!(
            "session '{label}' already exists"
        )));
    }
    let now = Utc::now().to_rfc3339();

    conn.execute("UPDATE sessions SET is_current = 0", ()).await?;

    let session_id = generate_id(conn, PREFIX_SESSION).await?;
    conn.execute(
        "INSERT INTO sessions (id, label, is_current, created_at) VALUES (?1, ?2, 1, ?3)",
        libsql::params![session_id.as_str(), label, now.as_str()],
    )
    .await?;

    let students = id_level_pairs(
        conn,
        "SELECT unique_id, level FROM accounts WHERE role = 'student'",
    )
    .await?;
    let mut students_promoted = 0u64;
    for (student_id, level) in &students {
        students_promoted += conn
            .execute(
                "UPDATE accounts SET level = ?1, current_session = ?2, updated_at = ?3 \
                 WHERE unique_id = ?4",
                libsql::params![rule.next_level(*level), label, now.as_str(), student_id.as_str()],
            )
            .await?;
    }

    // Previously active advisers claim their next level first.
    let advisers = id_level_pairs(
        conn,
        "SELECT unique_id, adviser_level FROM accounts WHERE role = 'course_adviser' \
         ORDER BY active_adviser DESC, unique_id",
    )
    .await?;
    conn.execute(
        "UPDATE accounts SET active_adviser = 0 WHERE active_adviser = 1",
        (),
    )
    .await?;

    let mut claimed = HashSet::new();
    let mut advisers_promoted = 0u64;
    let mut assignments_created = 0u64;
    for (adviser_id, level) in &advisers {
        let next = rule.next_level(*level);
        let active = claimed.insert(next);
        if !active {
            tracing::warn!(
                adviser = %adviser_id,
                level = next,
                "level already held after rollover; adviser left inactive"
            );
        }
        advisers_promoted += conn
            .execute(
                "UPDATE accounts SET adviser_level = ?1, active_adviser = ?2, \
                 current_session = ?3, updated_at = ?4 WHERE unique_id = ?5",
                libsql::params![next, i64::from(active), label, now.as_str(), adviser_id.as_str()],
            )
            .await?;

        let assignment_id = generate_id(conn, PREFIX_ADVISER_ASSIGNMENT).await?;
        assignments_created += conn
            .execute(
                "INSERT INTO adviser_assignments \
                 (id, adviser_id, session_id, level_handled, published, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
                libsql::params![
                    assignment_id,
                    adviser_id.as_str(),
                    session_id.as_str(),
                    next,
                    now.as_str()
                ],
            )
            .await?;
    }

    conn.execute(
        "UPDATE accounts SET current_session = ?1, updated_at = ?2 \
         WHERE role NOT IN ('student', 'course_adviser')",
        libsql::params![label, now.as_str()],
    )
    .await?;

    let session = find_session(conn, &session_id)
        .await?
        .ok_or(DatabaseError::NoResult)?;
    Ok(PromotionSummary {
        session,
        students_promoted,
        advisers_promoted,
        assignments_created,
    })
}

async fn make_current(conn: &libsql::Connection, label: &str) -> Result<Session, DatabaseError> {
    conn.execute("UPDATE sessions SET is_current = 0", ()).await?;
    let now = Utc::now().to_rfc3339();
    let changed = conn
        .execute(
            "UPDATE sessions SET is_current = 1 WHERE label = ?1",
            [label],
        )
        .await?;
    if changed == 0 {
        let id = generate_id(conn, PREFIX_SESSION).await?;
        conn.execute(
            "INSERT INTO sessions (id, label, is_current, created_at) VALUES (?1, ?2, 1, ?3)",
            libsql::params![id, label, now.as_str()],
        )
        .await?;
    }
    conn.execute(
        "UPDATE accounts SET current_session = ?1, updated_at = ?2",
        libsql::params![label, now.as_str()],
    )
    .await?;
    find_session_by_label(conn, label)
        .await?
        .ok_or(DatabaseError::NoResult)
}

impl AcadService {
    /// Open a new academic session and promote every student and adviser.
    ///
    /// Runs as one transaction; on any failure nothing changes.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank label, `Conflict` if the label exists,
    /// `Transaction` if the commit fails.
    pub async fn open_new_session(&self, label: &str) -> Result<PromotionSummary, DatabaseError> {
        let label = validate_label(label)?;
        let rule = self.lifecycle().level_rule();

        let tx = self.db().begin_write().await?;
        let outcome = rollover(&tx, label, rule).await;
        let summary = tx.finish(outcome).await?;

        tracing::info!(
            session = %summary.session.label,
            students = summary.students_promoted,
            advisers = summary.advisers_promoted,
            "session opened"
        );
        Ok(summary)
    }

    /// Make `label` the current session without promoting anyone, creating
    /// the session if it does not exist yet.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank label.
    pub async fn set_current_session(&self, label: &str) -> Result<Session, DatabaseError> {
        let label = validate_label(label)?;
        let tx = self.db().begin_write().await?;
        let outcome = make_current(&tx, label).await;
        let session = tx.finish(outcome).await?;
        tracing::info!(session = %session.label, "current session set");
        Ok(session)
    }

    pub async fn current_session(&self) -> Result<Option<Session>, DatabaseError> {
        find_current_session(self.db().conn()).await
    }

    /// # Errors
    ///
    /// `NotFound` if no session has this label.
    pub async fn get_session_by_label(&self, label: &str) -> Result<Session, DatabaseError> {
        find_session_by_label(self.db().conn(), label)
            .await?
            .ok_or_else(|| DatabaseError::not_found("session", label))
    }

    pub async fn list_sessions(&self, limit: u32) -> Result<Vec<Session>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM sessions ORDER BY created_at DESC, label DESC LIMIT {limit}"
                ),
                (),
            )
            .await?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            sessions.push(row_to_session(&row)?);
        }
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::{create_staff, create_student, test_service};
    use acad_core::enums::Role;
    use acad_core::errors::ErrorKind;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn first_session_becomes_current() {
        let svc = test_service().await;
        let summary = svc.open_new_session("2023/2024").await.unwrap();

        assert!(summary.session.id.starts_with("ses-"));
        assert!(summary.session.is_current);
        assert_eq!(summary.students_promoted, 0);

        let current = svc.current_session().await.unwrap().unwrap();
        assert_eq!(current.label, "2023/2024");
    }

    #[tokio::test]
    async fn only_one_session_is_current() {
        let svc = test_service().await;
        svc.open_new_session("2023/2024").await.unwrap();
        svc.open_new_session("2024/2025").await.unwrap();

        let sessions = svc.list_sessions(10).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions.iter().filter(|s| s.is_current).count(), 1);
        let old = svc.get_session_by_label("2023/2024").await.unwrap();
        assert!(!old.is_current);
    }

    #[tokio::test]
    async fn duplicate_label_conflicts_and_changes_nothing() {
        let svc = test_service().await;
        svc.open_new_session("2024/2025").await.unwrap();
        create_student(&svc, "s", 300).await;

        let err = svc.open_new_session("2024/2025").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(svc.get_account("s").await.unwrap().level, 300);
    }

    #[tokio::test]
    async fn blank_label_is_rejected() {
        let svc = test_service().await;
        let err = svc.open_new_session("   ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn rollover_promotes_and_wraps_students() {
        let svc = test_service().await;
        create_student(&svc, "s400", 400).await;
        create_student(&svc, "s500", 500).await;

        let summary = svc.open_new_session("2024/2025").await.unwrap();
        assert_eq!(summary.students_promoted, 2);

        let s400 = svc.get_account("s400").await.unwrap();
        let s500 = svc.get_account("s500").await.unwrap();
        assert_eq!(s400.level, 500);
        assert_eq!(s500.level, 1);
        assert_eq!(s400.current_session.as_deref(), Some("2024/2025"));
    }

    #[tokio::test]
    async fn rollover_moves_advisers_and_creates_assignments() {
        let svc = test_service().await;
        svc.open_new_session("2023/2024").await.unwrap();
        create_staff(&svc, "adv", Role::CourseAdviser).await;
        svc.assign_adviser_level("adv", 200, "2023/2024").await.unwrap();
        create_staff(&svc, "lec", Role::Lecturer).await;

        let summary = svc.open_new_session("2024/2025").await.unwrap();
        assert_eq!(summary.advisers_promoted, 1);
        assert_eq!(summary.assignments_created, 1);

        let adviser = svc.get_account("adv").await.unwrap();
        assert_eq!(adviser.adviser_level, 300);
        assert!(adviser.active_adviser);

        let views = svc.adviser_assignments("adv").await.unwrap();
        assert!(views.iter().any(|v| v.session_label == "2024/2025" && v.level_handled == 300));

        let lecturer = svc.get_account("lec").await.unwrap();
        assert_eq!(lecturer.current_session.as_deref(), Some("2024/2025"));
    }

    #[tokio::test]
    async fn colliding_advisers_keep_one_active() {
        let svc = test_service().await;
        svc.open_new_session("2023/2024").await.unwrap();
        create_staff(&svc, "a", Role::CourseAdviser).await;
        create_staff(&svc, "b", Role::CourseAdviser).await;
        svc.assign_adviser_level("a", 500, "2023/2024").await.unwrap();
        svc.assign_adviser_level("b", 600, "2023/2024").await.unwrap();

        // Both wrap to the intake level.
        svc.open_new_session("2024/2025").await.unwrap();

        let a = svc.get_account("a").await.unwrap();
        let b = svc.get_account("b").await.unwrap();
        assert_eq!(a.adviser_level, 1);
        assert_eq!(b.adviser_level, 1);
        assert!(a.active_adviser);
        assert!(!b.active_adviser);
    }

    #[tokio::test]
    async fn set_current_session_creates_or_switches() {
        let svc = test_service().await;
        create_student(&svc, "s", 100).await;

        let created = svc.set_current_session("2022/2023").await.unwrap();
        assert!(created.is_current);
        svc.open_new_session("2023/2024").await.unwrap();

        let switched = svc.set_current_session("2022/2023").await.unwrap();
        assert_eq!(switched.id, created.id);
        assert!(switched.is_current);

        let student = svc.get_account("s").await.unwrap();
        assert_eq!(student.current_session.as_deref(), Some("2022/2023"));
        // Switching never promotes.
        assert_eq!(student.level, 200);
    }

    #[tokio::test]
    async fn missing_label_is_not_found() {
        let svc = test_service().await;
        let err = svc.get_session_by_label("1999/2000").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
