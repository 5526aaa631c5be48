//! Grade upload and result publication.

use std::collections::HashSet;

use chrono::Utc;

use acad_core::entities::{CourseResult, GradeEntry};
use acad_core::enums::{Grade, Role};
use acad_core::grading::grade_scores;
use acad_core::ids::PREFIX_RESULT;
use acad_core::responses::{PublishReceipt, UploadSummary};

use crate::error::DatabaseError;
use crate::generate_id;
use crate::helpers::{get_bool, get_u32, parse_datetime, parse_enum};
use crate::repos::account::require_account;
use crate::repos::course::find_course;
use crate::repos::session::find_session;
use crate::service::AcadService;

const SELECT_COLS: &str = "id, student_id, course_code, session, ca, exam, total, grade, level, \
     published, created_at, updated_at";

fn row_to_result(row: &libsql::Row) -> Result<CourseResult, DatabaseError> {
    let grade: Grade = parse_enum(&row.get::<String>(7)?)?;
    Ok(CourseResult {
        id: row.get(0)?,
        student_id: row.get(1)?,
        course_code: row.get(2)?,
        session: row.get(3)?,
        ca: get_u32(row, 4)?,
        exam: get_u32(row, 5)?,
        total: get_u32(row, 6)?,
        grade,
        point: grade.points(),
        level: row.get(8)?,
        published: get_bool(row, 9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

async fn collect_results(mut rows: libsql::Rows) -> Result<Vec<CourseResult>, DatabaseError> {
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_result(&row)?);
    }
    Ok(results)
}

async fn upload_in_tx(
    conn: &libsql::Connection,
    course_id: &str,
    session: &str,
    grades: &[GradeEntry],
) -> Result<UploadSummary, DatabaseError> {
    let course = find_course(conn, course_id)
        .await?
        .ok_or_else(|| DatabaseError::not_found("course", course_id))?;

    // Resolve every student before the first write.
    let mut levels = Vec::with_capacity(grades.len());
    for entry in grades {
        let student = require_account(conn, &entry.student_id).await?;
        if student.role != Role::Student {
            return Err(DatabaseError::validation(format!(
                "'{}' is not a student",
                entry.student_id
            )));
        }
        levels.push(student.level);
    }

    let now = Utc::now().to_rfc3339();
    for (entry, level) in grades.iter().zip(levels) {
        let outcome = grade_scores(entry.ca, entry.exam);
        let id = generate_id(conn, PREFIX_RESULT).await?;
        conn.execute(
            &format!(
                "INSERT INTO results ({SELECT_COLS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?10) \
                 ON CONFLICT(student_id, course_code, session) DO UPDATE SET \
                 ca = excluded.ca, exam = excluded.exam, total = excluded.total, \
                 grade = excluded.grade, level = excluded.level, published = 0, \
                 updated_at = excluded.updated_at"
            ),
            libsql::params![
                id,
                entry.student_id.as_str(),
                course.code.as_str(),
                session,
                i64::from(entry.ca),
                i64::from(entry.exam),
                i64::from(outcome.total),
                outcome.grade.as_str(),
                level,
                now.as_str()
            ],
        )
        .await?;
    }

    Ok(UploadSummary {
        course_code: course.code,
        session: session.to_string(),
        count: grades.len(),
    })
}

async fn publish_in_tx(
    conn: &libsql::Connection,
    adviser_id: &str,
    session_id: &str,
    level: i64,
) -> Result<PublishReceipt, DatabaseError> {
    let adviser = require_account(conn, adviser_id).await?;
    if adviser.role != Role::CourseAdviser {
        return Err(DatabaseError::unauthorized(format!(
            "only course advisers publish results; '{adviser_id}' is a {}",
            adviser.role
        )));
    }
    let session = find_session(conn, session_id)
        .await?
        .ok_or_else(|| DatabaseError::not_found("session", session_id))?;
    if session.is_current && !(adviser.active_adviser && adviser.adviser_level == level) {
        return Err(DatabaseError::unauthorized(format!(
            "'{adviser_id}' is not the active adviser for level {level}"
        )));
    }

    let now = Utc::now().to_rfc3339();
    let changed = conn
        .execute(
            "UPDATE adviser_assignments SET published = 1, updated_at = ?1 \
             WHERE adviser_id = ?2 AND session_id = ?3 AND level_handled = ?4",
            libsql::params![now.as_str(), adviser_id, session_id, level],
        )
        .await?;
    if changed == 0 {
        return Err(DatabaseError::not_found(
            "adviser assignment",
            format!("{adviser_id}/{session_id}/{level}"),
        ));
    }

    let results_published = conn
        .execute(
            "UPDATE results SET published = 1, updated_at = ?1 WHERE session = ?2 AND level = ?3",
            libsql::params![now.as_str(), session.label.as_str(), level],
        )
        .await?;

    Ok(PublishReceipt {
        adviser_id: adviser_id.to_string(),
        session_id: session_id.to_string(),
        level_handled: level,
        results_published,
    })
}

impl AcadService {
    fn validate_grades(&self, session: &str, grades: &[GradeEntry]) -> Result<(), DatabaseError> {
        if session.trim().is_empty() {
            return Err(DatabaseError::validation("session must not be blank"));
        }
        if grades.is_empty() {
            return Err(DatabaseError::validation("no grades supplied"));
        }
        let limits = self.grading();
        let mut seen = HashSet::new();
        for entry in grades {
            if !seen.insert(entry.student_id.as_str()) {
                return Err(DatabaseError::validation(format!(
                    "student '{}' appears more than once",
                    entry.student_id
                )));
            }
            if entry.ca > limits.max_ca {
                return Err(DatabaseError::validation(format!(
                    "CA score {} for '{}' exceeds {}",
                    entry.ca, entry.student_id, limits.max_ca
                )));
            }
            if entry.exam > limits.max_exam {
                return Err(DatabaseError::validation(format!(
                    "exam score {} for '{}' exceeds {}",
                    entry.exam, entry.student_id, limits.max_exam
                )));
            }
        }
        Ok(())
    }

    /// Grade a batch of students for one course and session.
    ///
    /// All-or-nothing: any bad entry leaves every result untouched. Grading a
    /// student again overwrites the previous result and withdraws it from
    /// publication until it is published again.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank session, empty batch, duplicate student, or
    /// out-of-range score. `NotFound` for an unknown course or student.
    pub async fn upload_grades(
        &self,
        course_id: &str,
        session: &str,
        grades: &[GradeEntry],
    ) -> Result<UploadSummary, DatabaseError> {
        self.validate_grades(session, grades)?;
        let session = session.trim();

        let tx = self.db().begin_write().await?;
        let outcome = upload_in_tx(&tx, course_id, session, grades).await;
        let summary = tx.finish(outcome).await?;
        tracing::info!(
            course = %summary.course_code,
            session,
            count = summary.count,
            "grades uploaded"
        );
        Ok(summary)
    }

    /// Publish an adviser's results for the level they handle in a session.
    ///
    /// # Errors
    ///
    /// `NotFound` if the adviser, session, or matching assignment is missing.
    /// `Unauthorized` if the account is not a course adviser, or, for the
    /// current session, is not the active adviser for `level`.
    pub async fn publish_results(
        &self,
        adviser_id: &str,
        session_id: &str,
        level: i64,
    ) -> Result<PublishReceipt, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let outcome = publish_in_tx(&tx, adviser_id, session_id, level).await;
        let receipt = tx.finish(outcome).await?;
        tracing::info!(
            adviser = adviser_id,
            session = session_id,
            level,
            results = receipt.results_published,
            "results published"
        );
        Ok(receipt)
    }

    /// Published results for a student, optionally for one session.
    pub async fn student_results(
        &self,
        student_id: &str,
        session: Option<&str>,
    ) -> Result<Vec<CourseResult>, DatabaseError> {
        let conn = self.db().conn();
        let rows = match session {
            Some(session) => {
                conn.query(
                    &format!(
                        "SELECT {SELECT_COLS} FROM results \
                         WHERE student_id = ?1 AND session = ?2 AND published = 1 \
                         ORDER BY course_code"
                    ),
                    libsql::params![student_id, session],
                )
                .await?
            }
            None => {
                conn.query(
                    &format!(
                        "SELECT {SELECT_COLS} FROM results \
                         WHERE student_id = ?1 AND published = 1 \
                         ORDER BY session, course_code"
                    ),
                    [student_id],
                )
                .await?
            }
        };
        collect_results(rows).await
    }

    /// Every result recorded for a course in a session, published or not.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown course.
    pub async fn course_results(
        &self,
        course_id: &str,
        session: &str,
    ) -> Result<Vec<CourseResult>, DatabaseError> {
        let course = self.get_course(course_id).await?;
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM results \
                     WHERE course_code = ?1 AND session = ?2 ORDER BY student_id"
                ),
                libsql::params![course.code.as_str(), session],
            )
            .await?;
        collect_results(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{
        create_staff, create_student, create_test_course, open_test_session, test_service,
    };
    use acad_core::errors::ErrorKind;
    use pretty_assertions::assert_eq;

    fn entry(student_id: &str, ca: u32, exam: u32) -> GradeEntry {
        GradeEntry {
            student_id: student_id.to_string(),
            ca,
            exam,
        }
    }

    #[tokio::test]
    async fn upload_grades_derives_grade() {
        let svc = test_service().await;
        create_student(&svc, "s", 200).await;
        let course = create_test_course(&svc, "CSC201", 200).await;

        let summary = svc
            .upload_grades(&course.id, "2024/2025", &[entry("s", 39, 30)])
            .await
            .unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.course_code, "CSC201");

        let results = svc.course_results(&course.id, "2024/2025").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].total, 69);
        assert_eq!(results[0].grade, Grade::B);
        assert_eq!(results[0].point, 4);
        assert_eq!(results[0].level, 200);
        assert!(!results[0].published);
    }

    #[tokio::test]
    async fn second_upload_overwrites() {
        let svc = test_service().await;
        create_student(&svc, "s", 100).await;
        let course = create_test_course(&svc, "CSC101", 100).await;

        svc.upload_grades(&course.id, "2024/2025", &[entry("s", 20, 20)])
            .await
            .unwrap();
        svc.upload_grades(&course.id, "2024/2025", &[entry("s", 40, 30)])
            .await
            .unwrap();

        let results = svc.course_results(&course.id, "2024/2025").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].grade, Grade::A);
    }

    #[tokio::test]
    async fn bad_entry_leaves_batch_untouched() {
        let svc = test_service().await;
        create_student(&svc, "s1", 100).await;
        let course = create_test_course(&svc, "CSC101", 100).await;

        let err = svc
            .upload_grades(
                &course.id,
                "2024/2025",
                &[entry("s1", 30, 30), entry("ghost", 30, 30)],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(svc.course_results(&course.id, "2024/2025").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn scores_above_maximum_are_rejected() {
        let svc = test_service().await;
        create_student(&svc, "s", 100).await;
        let course = create_test_course(&svc, "CSC101", 100).await;

        let err = svc
            .upload_grades(&course.id, "2024/2025", &[entry("s", 41, 10)])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = svc
            .upload_grades(&course.id, "2024/2025", &[entry("s", 10, 61)])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let svc = test_service().await;
        create_student(&svc, "s", 100).await;
        let err = svc
            .upload_grades("crs-missing", "2024/2025", &[entry("s", 10, 10)])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn results_hidden_until_published() {
        let svc = test_service().await;
        let session_id = open_test_session(&svc, "2024/2025").await;
        create_student(&svc, "s", 300).await;
        create_staff(&svc, "adv", Role::CourseAdviser).await;
        svc.assign_adviser_level("adv", 300, "2024/2025").await.unwrap();
        let course = create_test_course(&svc, "CSC301", 300).await;
        svc.upload_grades(&course.id, "2024/2025", &[entry("s", 35, 40)])
            .await
            .unwrap();

        assert!(svc.student_results("s", None).await.unwrap().is_empty());

        let receipt = svc.publish_results("adv", &session_id, 300).await.unwrap();
        assert_eq!(receipt.results_published, 1);

        let visible = svc.student_results("s", Some("2024/2025")).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert!(visible[0].published);

        let views = svc.adviser_assignments("adv").await.unwrap();
        assert!(views[0].published);
    }

    #[tokio::test]
    async fn publish_only_touches_handled_level() {
        let svc = test_service().await;
        let session_id = open_test_session(&svc, "2024/2025").await;
        create_student(&svc, "s1", 100).await;
        create_student(&svc, "s2", 200).await;
        create_staff(&svc, "adv", Role::CourseAdviser).await;
        svc.assign_adviser_level("adv", 100, "2024/2025").await.unwrap();
        let course = create_test_course(&svc, "GST101", 100).await;
        svc.upload_grades(
            &course.id,
            "2024/2025",
            &[entry("s1", 30, 30), entry("s2", 30, 30)],
        )
        .await
        .unwrap();

        svc.publish_results("adv", &session_id, 100).await.unwrap();
        assert_eq!(svc.student_results("s1", None).await.unwrap().len(), 1);
        assert!(svc.student_results("s2", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn publish_requires_adviser_and_assignment() {
        let svc = test_service().await;
        let past_id = open_test_session(&svc, "2023/2024").await;
        let session_id = open_test_session(&svc, "2024/2025").await;
        create_staff(&svc, "lec", Role::Lecturer).await;
        create_staff(&svc, "adv", Role::CourseAdviser).await;

        let err = svc.publish_results("lec", &session_id, 100).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let err = svc.publish_results("adv", &session_id, 100).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let err = svc.publish_results("adv", &past_id, 100).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = svc.publish_results("ghost", &session_id, 100).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn displaced_adviser_cannot_publish() {
        let svc = test_service().await;
        let session_id = open_test_session(&svc, "2024/2025").await;
        create_student(&svc, "s", 300).await;
        create_staff(&svc, "x", Role::CourseAdviser).await;
        create_staff(&svc, "y", Role::CourseAdviser).await;
        svc.assign_adviser_level("y", 300, "2024/2025").await.unwrap();
        svc.assign_adviser_level("x", 300, "2024/2025").await.unwrap();
        let course = create_test_course(&svc, "CSC305", 300).await;
        svc.upload_grades(&course.id, "2024/2025", &[entry("s", 30, 30)])
            .await
            .unwrap();

        let err = svc.publish_results("y", &session_id, 300).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(svc.student_results("s", None).await.unwrap().is_empty());
        assert!(!svc.adviser_assignments("y").await.unwrap()[0].published);

        let receipt = svc.publish_results("x", &session_id, 300).await.unwrap();
        assert_eq!(receipt.results_published, 1);
    }
}
