//! Course registration: one registration per student per session, replaced
//! wholesale when the student registers again.

use std::collections::HashSet;

use chrono::Utc;

use acad_core::entities::{CourseSelection, Registration, RegistrationLink};
use acad_core::enums::{RegistrationStatus, Role};
use acad_core::ids::PREFIX_REGISTRATION;
use acad_core::responses::{RegistrationDetail, RegistrationReceipt};

use crate::error::DatabaseError;
use crate::generate_id;
use crate::helpers::{parse_datetime, parse_enum};
use crate::repos::account::require_account;
use crate::repos::course::find_course;
use crate::service::AcadService;

const SELECT_COLS: &str = "id, student_id, session, level, total_credit, status, created_at";

fn row_to_registration(row: &libsql::Row) -> Result<Registration, DatabaseError> {
    Ok(Registration {
        id: row.get(0)?,
        student_id: row.get(1)?,
        session: row.get(2)?,
        level: row.get(3)?,
        total_credit: row.get(4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

async fn find_registration(
    conn: &libsql::Connection,
    student_id: &str,
    session: &str,
) -> Result<Option<Registration>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM registrations WHERE student_id = ?1 AND session = ?2"
            ),
            libsql::params![student_id, session],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_registration(&row)?)),
        None => Ok(None),
    }
}

fn validate_selection(
    session: &str,
    selection: &CourseSelection,
    total_credit: i64,
) -> Result<(), DatabaseError> {
    if session.trim().is_empty() {
        return Err(DatabaseError::validation("session must not be blank"));
    }
    if selection.is_empty() {
        return Err(DatabaseError::validation("no courses selected"));
    }
    if total_credit < 0 {
        return Err(DatabaseError::validation("total credit must not be negative"));
    }
    let mut seen = HashSet::new();
    for (course_id, _) in selection.tagged() {
        if !seen.insert(course_id) {
            return Err(DatabaseError::validation(format!(
                "course '{course_id}' selected more than once"
            )));
        }
    }
    Ok(())
}

async fn register_in_tx(
    conn: &libsql::Connection,
    student_id: &str,
    session: &str,
    level: i64,
    selection: &CourseSelection,
    total_credit: i64,
) -> Result<RegistrationReceipt, DatabaseError> {
    let student = require_account(conn, student_id).await?;
    if student.role != Role::Student {
        return Err(DatabaseError::validation(format!(
            "'{student_id}' is not a student"
        )));
    }
    for (course_id, _) in selection.tagged() {
        if find_course(conn, course_id).await?.is_none() {
            return Err(DatabaseError::not_found("course", course_id));
        }
    }

    if let Some(previous) = find_registration(conn, student_id, session).await? {
        conn.execute(
            "DELETE FROM registration_links WHERE registration_id = ?1",
            [previous.id.as_str()],
        )
        .await?;
        conn.execute(
            "DELETE FROM registrations WHERE id = ?1",
            [previous.id.as_str()],
        )
        .await?;
        tracing::debug!(student = student_id, session, "previous registration replaced");
    }

    let id = generate_id(conn, PREFIX_REGISTRATION).await?;
    conn.execute(
        &format!("INSERT INTO registrations ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
        libsql::params![
            id.as_str(),
            student_id,
            session,
            level,
            total_credit,
            RegistrationStatus::Registered.as_str(),
            Utc::now().to_rfc3339()
        ],
    )
    .await?;

    let mut total_registered = 0usize;
    for (course_id, semester) in selection.tagged() {
        conn.execute(
            "INSERT INTO registration_links (registration_id, course_id, semester) \
             VALUES (?1, ?2, ?3)",
            libsql::params![id.as_str(), course_id, semester.as_str()],
        )
        .await?;
        total_registered += 1;
    }

    Ok(RegistrationReceipt {
        registration_id: id,
        total_registered,
    })
}

impl AcadService {
    /// Register a student's course selection for a session.
    ///
    /// Registering again for the same session replaces the earlier
    /// registration and all its course links.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank session, empty or duplicate selection, or a
    /// non-student account. `NotFound` for an unknown student or course.
    pub async fn register(
        &self,
        student_id: &str,
        session: &str,
        level: i64,
        selection: &CourseSelection,
        total_credit: i64,
    ) -> Result<RegistrationReceipt, DatabaseError> {
        validate_selection(session, selection, total_credit)?;
        let session = session.trim();

        let tx = self.db().begin_write().await?;
        let outcome =
            register_in_tx(&tx, student_id, session, level, selection, total_credit).await;
        let receipt = tx.finish(outcome).await?;
        tracing::info!(
            student = student_id,
            session,
            courses = receipt.total_registered,
            "registration recorded"
        );
        Ok(receipt)
    }

    /// Whether the student has registered for `session`.
    pub async fn registration_status(
        &self,
        student_id: &str,
        session: &str,
    ) -> Result<Option<RegistrationStatus>, DatabaseError> {
        Ok(find_registration(self.db().conn(), student_id, session)
            .await?
            .map(|r| r.status))
    }

    pub async fn get_registration(
        &self,
        student_id: &str,
        session: &str,
    ) -> Result<Option<RegistrationDetail>, DatabaseError> {
        let conn = self.db().conn();
        let Some(registration) = find_registration(conn, student_id, session).await? else {
            return Ok(None);
        };
        let mut rows = conn
            .query(
                "SELECT registration_id, course_id, semester FROM registration_links \
                 WHERE registration_id = ?1 ORDER BY semester, course_id",
                [registration.id.as_str()],
            )
            .await?;
        let mut links = Vec::new();
        while let Some(row) = rows.next().await? {
            links.push(RegistrationLink {
                registration_id: row.get(0)?,
                course_id: row.get(1)?,
                semester: parse_enum(&row.get::<String>(2)?)?,
            });
        }
        Ok(Some(RegistrationDetail {
            registration,
            links,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{
        create_staff, create_student, create_test_course, test_service,
    };
    use acad_core::enums::Semester;
    use acad_core::errors::ErrorKind;
    use pretty_assertions::assert_eq;

    fn selection(first: &[&str], second: &[&str]) -> CourseSelection {
        CourseSelection {
            first: first.iter().map(ToString::to_string).collect(),
            second: second.iter().map(ToString::to_string).collect(),
        }
    }

    #[tokio::test]
    async fn register_records_links_per_term() {
        let svc = test_service().await;
        create_student(&svc, "s", 200).await;
        let c1 = create_test_course(&svc, "CSC201", 200).await;
        let c2 = create_test_course(&svc, "CSC202", 200).await;

        let receipt = svc
            .register("s", "2024/2025", 200, &selection(&[&c1.id], &[&c2.id]), 6)
            .await
            .unwrap();
        assert!(receipt.registration_id.starts_with("reg-"));
        assert_eq!(receipt.total_registered, 2);

        let detail = svc.get_registration("s", "2024/2025").await.unwrap().unwrap();
        assert_eq!(detail.registration.total_credit, 6);
        assert_eq!(detail.links.len(), 2);
        let second: Vec<_> = detail
            .links
            .iter()
            .filter(|l| l.semester == Semester::Second)
            .map(|l| l.course_id.as_str())
            .collect();
        assert_eq!(second, vec![c2.id.as_str()]);
    }

    #[tokio::test]
    async fn reregistering_replaces_previous() {
        let svc = test_service().await;
        create_student(&svc, "s", 100).await;
        let a = create_test_course(&svc, "A", 100).await;
        let b = create_test_course(&svc, "B", 100).await;
        let c = create_test_course(&svc, "C", 100).await;

        let first = svc
            .register("s", "2024/2025", 100, &selection(&[&a.id, &b.id], &[]), 6)
            .await
            .unwrap();
        let second = svc
            .register("s", "2024/2025", 100, &selection(&[&c.id], &[]), 3)
            .await
            .unwrap();
        assert_ne!(first.registration_id, second.registration_id);

        let detail = svc.get_registration("s", "2024/2025").await.unwrap().unwrap();
        assert_eq!(detail.registration.id, second.registration_id);
        assert_eq!(detail.links.len(), 1);
        assert_eq!(detail.links[0].course_id, c.id);
    }

    #[tokio::test]
    async fn unknown_course_changes_nothing() {
        let svc = test_service().await;
        create_student(&svc, "s", 100).await;
        let a = create_test_course(&svc, "A", 100).await;
        svc.register("s", "2024/2025", 100, &selection(&[&a.id], &[]), 3)
            .await
            .unwrap();

        let err = svc
            .register("s", "2024/2025", 100, &selection(&["crs-missing"], &[]), 3)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let detail = svc.get_registration("s", "2024/2025").await.unwrap().unwrap();
        assert_eq!(detail.links[0].course_id, a.id);
    }

    #[tokio::test]
    async fn empty_or_duplicate_selection_is_rejected() {
        let svc = test_service().await;
        create_student(&svc, "s", 100).await;
        let a = create_test_course(&svc, "A", 100).await;

        let err = svc
            .register("s", "2024/2025", 100, &selection(&[], &[]), 0)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = svc
            .register("s", "2024/2025", 100, &selection(&[&a.id], &[&a.id]), 6)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn staff_cannot_register() {
        let svc = test_service().await;
        create_staff(&svc, "lec", Role::Lecturer).await;
        let a = create_test_course(&svc, "A", 100).await;
        let err = svc
            .register("lec", "2024/2025", 100, &selection(&[&a.id], &[]), 3)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn status_reflects_registration() {
        let svc = test_service().await;
        create_student(&svc, "s", 100).await;
        let a = create_test_course(&svc, "A", 100).await;

        assert_eq!(svc.registration_status("s", "2024/2025").await.unwrap(), None);
        svc.register("s", "2024/2025", 100, &selection(&[&a.id], &[]), 3)
            .await
            .unwrap();
        assert_eq!(
            svc.registration_status("s", "2024/2025").await.unwrap(),
            Some(RegistrationStatus::Registered)
        );
    }
}
