//! Course catalogue repository with lecturer attachment.

use std::collections::BTreeSet;

use chrono::Utc;

use acad_core::entities::{Account, Course, NewCourse};
use acad_core::enums::Semester;
use acad_core::ids::PREFIX_COURSE;

use crate::error::DatabaseError;
use crate::generate_id;
use crate::helpers::parse_datetime;
use crate::repos::account::{find_account, row_to_account};
use crate::service::AcadService;
use crate::updates::course::CourseUpdate;

const SELECT_COLS: &str = "id, code, title, credits, level, semester, created_at, updated_at";

fn row_to_course(row: &libsql::Row) -> Result<Course, DatabaseError> {
    let semester_number: i64 = row.get(5)?;
    Ok(Course {
        id: row.get(0)?,
        code: row.get(1)?,
        title: row.get(2)?,
        credits: row.get(3)?,
        level: row.get(4)?,
        semester: Semester::from_number(semester_number).ok_or_else(|| {
            DatabaseError::InvalidState(format!("course semester {semester_number}"))
        })?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

async fn find_course_where(
    conn: &libsql::Connection,
    column: &str,
    value: &str,
) -> Result<Option<Course>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM courses WHERE {column} = ?1"),
            [value],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_course(&row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn find_course(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<Course>, DatabaseError> {
    find_course_where(conn, "id", id).await
}

async fn require_course_by_code(
    conn: &libsql::Connection,
    code: &str,
) -> Result<Course, DatabaseError> {
    find_course_where(conn, "code", code)
        .await?
        .ok_or_else(|| DatabaseError::not_found("course", code))
}

fn validate_fields(
    title: Option<&str>,
    credits: Option<i64>,
    level: Option<i64>,
) -> Result<(), DatabaseError> {
    if title.is_some_and(|t| t.trim().is_empty()) {
        return Err(DatabaseError::validation("course title must not be blank"));
    }
    if credits.is_some_and(|c| c < 0) {
        return Err(DatabaseError::validation("course credits must not be negative"));
    }
    if level.is_some_and(|l| l <= 0) {
        return Err(DatabaseError::validation("course level must be positive"));
    }
    Ok(())
}

async fn lecturer_ids(
    conn: &libsql::Connection,
    course_id: &str,
) -> Result<BTreeSet<String>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT lecturer_id FROM course_lecturers WHERE course_id = ?1",
            [course_id],
        )
        .await?;
    let mut ids = BTreeSet::new();
    while let Some(row) = rows.next().await? {
        ids.insert(row.get::<String>(0)?);
    }
    Ok(ids)
}

/// Bring the course's lecturer set to exactly `desired`.
async fn reconcile_lecturers(
    conn: &libsql::Connection,
    course_id: &str,
    desired: &[String],
) -> Result<(), DatabaseError> {
    let desired: BTreeSet<String> = desired.iter().cloned().collect();
    for lecturer_id in &desired {
        let account = find_account(conn, lecturer_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("lecturer", lecturer_id.as_str()))?;
        if !account.is_staff {
            return Err(DatabaseError::validation(format!(
                "'{lecturer_id}' is not a member of staff"
            )));
        }
    }

    let current = lecturer_ids(conn, course_id).await?;
    for removed in current.difference(&desired) {
        conn.execute(
            "DELETE FROM course_lecturers WHERE course_id = ?1 AND lecturer_id = ?2",
            libsql::params![course_id, removed.as_str()],
        )
        .await?;
    }
    for added in desired.difference(&current) {
        conn.execute(
            "INSERT INTO course_lecturers (course_id, lecturer_id) VALUES (?1, ?2)",
            libsql::params![course_id, added.as_str()],
        )
        .await?;
    }
    Ok(())
}

async fn create_in_tx(
    conn: &libsql::Connection,
    new: &NewCourse,
    lecturers: &[String],
) -> Result<Course, DatabaseError> {
    if find_course_where(conn, "code", &new.code).await?.is_some() {
        return Err(DatabaseError::conflict(format!(
            "course code '{}' already exists",
            new.code
        )));
    }
    let id = generate_id(conn, PREFIX_COURSE).await?;
    let now = Utc::now().to_rfc3339();
    conn.execute(
        &format!("INSERT INTO courses ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)"),
        libsql::params![
            id.as_str(),
            new.code.as_str(),
            new.title.as_str(),
            new.credits,
            new.level,
            new.semester.number(),
            now
        ],
    )
    .await?;
    reconcile_lecturers(conn, &id, lecturers).await?;
    find_course(conn, &id).await?.ok_or(DatabaseError::NoResult)
}

async fn update_in_tx(
    conn: &libsql::Connection,
    code: &str,
    update: &CourseUpdate,
) -> Result<Course, DatabaseError> {
    let course = require_course_by_code(conn, code).await?;

    let mut sets = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();
    let mut idx = 1usize;

    if let Some(ref title) = update.title {
        sets.push(format!("title = ?{idx}"));
        params.push(title.clone().into());
        idx += 1;
    }
    if let Some(credits) = update.credits {
        sets.push(format!("credits = ?{idx}"));
        params.push(credits.into());
        idx += 1;
    }
    if let Some(level) = update.level {
        sets.push(format!("level = ?{idx}"));
        params.push(level.into());
        idx += 1;
    }
    if let Some(semester) = update.semester {
        sets.push(format!("semester = ?{idx}"));
        params.push(semester.number().into());
        idx += 1;
    }

    if !sets.is_empty() {
        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(course.id.clone().into());
        let sql = format!("UPDATE courses SET {} WHERE id = ?{idx}", sets.join(", "));
        conn.execute(&sql, libsql::params_from_iter(params)).await?;
    }

    if let Some(ref lecturers) = update.lecturer_ids {
        reconcile_lecturers(conn, &course.id, lecturers).await?;
    }

    find_course(conn, &course.id).await?.ok_or(DatabaseError::NoResult)
}

impl AcadService {
    /// Add a course to the catalogue and attach its lecturers.
    ///
    /// # Errors
    ///
    /// `Validation` for blank fields, `Conflict` on a duplicate code,
    /// `NotFound` for an unknown lecturer.
    pub async fn create_course(
        &self,
        new: &NewCourse,
        lecturer_ids: &[String],
    ) -> Result<Course, DatabaseError> {
        if new.code.trim().is_empty() {
            return Err(DatabaseError::validation("course code must not be blank"));
        }
        validate_fields(Some(&new.title), Some(new.credits), Some(new.level))?;

        let tx = self.db().begin_write().await?;
        let outcome = create_in_tx(&tx, new, lecturer_ids).await;
        let course = tx.finish(outcome).await?;
        tracing::info!(code = %course.code, id = %course.id, "course created");
        Ok(course)
    }

    /// Apply a partial update, replacing the lecturer set when one is given.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown course code or lecturer, `Validation` for
    /// out-of-range fields.
    pub async fn update_course(
        &self,
        code: &str,
        update: CourseUpdate,
    ) -> Result<Course, DatabaseError> {
        validate_fields(update.title.as_deref(), update.credits, update.level)?;
        if update.is_empty() {
            return self.get_course_by_code(code).await;
        }

        let tx = self.db().begin_write().await?;
        let outcome = update_in_tx(&tx, code, &update).await;
        let course = tx.finish(outcome).await?;
        tracing::info!(code, "course updated");
        Ok(course)
    }

    /// Remove a course after detaching its lecturers. Registration links
    /// to it cascade; stored results keep their course code.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown course code.
    pub async fn delete_course(&self, code: &str) -> Result<(), DatabaseError> {
        let tx = self.db().begin_write().await?;
        let outcome = async {
            let course = require_course_by_code(&tx, code).await?;
            tx.execute(
                "DELETE FROM course_lecturers WHERE course_id = ?1",
                [course.id.as_str()],
            )
            .await?;
            tx.execute("DELETE FROM courses WHERE id = ?1", [course.id.as_str()])
                .await?;
            Ok(())
        }
        .await;
        tx.finish(outcome).await?;
        tracing::info!(code, "course deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// `NotFound` if no course has this ID.
    pub async fn get_course(&self, id: &str) -> Result<Course, DatabaseError> {
        find_course(self.db().conn(), id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("course", id))
    }

    /// # Errors
    ///
    /// `NotFound` if no course has this code.
    pub async fn get_course_by_code(&self, code: &str) -> Result<Course, DatabaseError> {
        require_course_by_code(self.db().conn(), code).await
    }

    pub async fn list_courses(&self, level: Option<i64>) -> Result<Vec<Course>, DatabaseError> {
        let conn = self.db().conn();
        let mut rows = match level {
            Some(level) => {
                conn.query(
                    &format!(
                        "SELECT {SELECT_COLS} FROM courses WHERE level = ?1 ORDER BY semester, code"
                    ),
                    [level],
                )
                .await?
            }
            None => {
                conn.query(
                    &format!("SELECT {SELECT_COLS} FROM courses ORDER BY level, semester, code"),
                    (),
                )
                .await?
            }
        };
        let mut courses = Vec::new();
        while let Some(row) = rows.next().await? {
            courses.push(row_to_course(&row)?);
        }
        Ok(courses)
    }

    /// Accounts attached to teach a course.
    ///
    /// # Errors
    ///
    /// `NotFound` if the course does not exist.
    pub async fn course_lecturers(&self, course_id: &str) -> Result<Vec<Account>, DatabaseError> {
        let conn = self.db().conn();
        self.get_course(course_id).await?;
        let mut rows = conn
            .query(
                "SELECT a.unique_id, a.role, a.first_name, a.last_name, a.email, a.mat_number, \
                 a.is_approved, a.is_staff, a.is_deleted, a.deleted_at, a.level, \
                 a.current_session, a.adviser_level, a.active_adviser, a.created_at, a.updated_at \
                 FROM course_lecturers cl JOIN accounts a ON a.unique_id = cl.lecturer_id \
                 WHERE cl.course_id = ?1 ORDER BY a.unique_id",
                [course_id],
            )
            .await?;
        let mut lecturers = Vec::new();
        while let Some(row) = rows.next().await? {
            lecturers.push(row_to_account(&row)?);
        }
        Ok(lecturers)
    }
}
