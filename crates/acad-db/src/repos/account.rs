//! Account directory: creation, approval, role changes, listing, and stats.

use chrono::Utc;

use acad_core::entities::{Account, NewAccount};
use acad_core::enums::Role;
use acad_core::identity::Actor;
use acad_core::responses::{AccountStats, RoleCounts};

use crate::error::DatabaseError;
use crate::helpers::{
    get_bool, get_opt_string, parse_datetime, parse_enum, parse_optional_datetime, query_count,
};
use crate::repos::session::find_current_session;
use crate::service::AcadService;

pub(crate) const SELECT_COLS: &str = "unique_id, role, first_name, last_name, email, mat_number, \
     is_approved, is_staff, is_deleted, deleted_at, level, current_session, adviser_level, \
     active_adviser, created_at, updated_at";

pub(crate) fn row_to_account(row: &libsql::Row) -> Result<Account, DatabaseError> {
    Ok(Account {
        unique_id: row.get(0)?,
        role: parse_enum(&row.get::<String>(1)?)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: get_opt_string(row, 4)?,
        mat_number: get_opt_string(row, 5)?,
        is_approved: get_bool(row, 6)?,
        is_staff: get_bool(row, 7)?,
        is_deleted: get_bool(row, 8)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 9)?.as_deref())?,
        level: row.get(10)?,
        current_session: get_opt_string(row, 11)?,
        adviser_level: row.get(12)?,
        active_adviser: get_bool(row, 13)?,
        created_at: parse_datetime(&row.get::<String>(14)?)?,
        updated_at: parse_datetime(&row.get::<String>(15)?)?,
    })
}

pub(crate) async fn find_account(
    conn: &libsql::Connection,
    unique_id: &str,
) -> Result<Option<Account>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM accounts WHERE unique_id = ?1"),
            [unique_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_account(&row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn require_account(
    conn: &libsql::Connection,
    unique_id: &str,
) -> Result<Account, DatabaseError> {
    find_account(conn, unique_id)
        .await?
        .ok_or_else(|| DatabaseError::not_found("account", unique_id))
}

async fn exists(conn: &libsql::Connection, column: &str, value: &str) -> Result<bool, DatabaseError> {
    let count = query_count(
        conn,
        &format!("SELECT COUNT(*) FROM accounts WHERE {column} = ?1"),
        [value],
    )
    .await?;
    Ok(count > 0)
}

fn validate_new_account(new: &NewAccount) -> Result<(), DatabaseError> {
    if new.unique_id.trim().is_empty() {
        return Err(DatabaseError::validation("unique_id must not be blank"));
    }
    if new.first_name.trim().is_empty() && new.last_name.trim().is_empty() {
        return Err(DatabaseError::validation("account needs a name"));
    }
    if new.role == Role::Student && new.level <= 0 {
        return Err(DatabaseError::validation(format!(
            "student level must be positive, got {}",
            new.level
        )));
    }
    Ok(())
}

async fn insert_account(
    conn: &libsql::Connection,
    new: &NewAccount,
) -> Result<Account, DatabaseError> {
    if exists(conn, "unique_id", &new.unique_id).await? {
        return Err(DatabaseError::conflict(format!(
            "account '{}' already exists",
            new.unique_id
        )));
    }
    if let Some(email) = new.email.as_deref() {
        if exists(conn, "email", email).await? {
            return Err(DatabaseError::conflict(format!("email '{email}' is already in use")));
        }
    }
    if let Some(mat) = new.mat_number.as_deref() {
        if exists(conn, "mat_number", mat).await? {
            return Err(DatabaseError::conflict(format!(
                "matriculation number '{mat}' is already in use"
            )));
        }
    }

    let current = find_current_session(conn).await?.map(|s| s.label);
    let level = if new.role == Role::Student { new.level } else { 0 };
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO accounts (unique_id, role, first_name, last_name, email, mat_number, \
         is_approved, is_staff, level, current_session, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
        libsql::params![
            new.unique_id.as_str(),
            new.role.as_str(),
            new.first_name.as_str(),
            new.last_name.as_str(),
            new.email.as_deref(),
            new.mat_number.as_deref(),
            i64::from(new.role == Role::Admin),
            i64::from(new.role.is_staff()),
            level,
            current.as_deref(),
            now
        ],
    )
    .await?;

    require_account(conn, &new.unique_id).await
}

impl AcadService {
    /// Create an account. Admins are created approved; everyone else waits
    /// for [`approve_account`](Self::approve_account).
    ///
    /// # Errors
    ///
    /// `Validation` for blank identifiers, `Conflict` when the ID, email, or
    /// matriculation number is taken.
    pub async fn create_account(&self, new: &NewAccount) -> Result<Account, DatabaseError> {
        validate_new_account(new)?;
        let tx = self.db().begin_write().await?;
        let outcome = insert_account(&tx, new).await;
        let account = tx.finish(outcome).await?;
        tracing::info!(unique_id = %account.unique_id, role = %account.role, "account created");
        Ok(account)
    }

    /// Make sure the protected root admin exists, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on storage failure.
    pub async fn ensure_root_admin(&self) -> Result<Account, DatabaseError> {
        let root_id = self.lifecycle().root_admin_id.clone();
        if let Some(account) = find_account(self.db().conn(), &root_id).await? {
            return Ok(account);
        }
        let new = NewAccount {
            unique_id: root_id,
            role: Role::Admin,
            first_name: "Root".to_string(),
            last_name: "Admin".to_string(),
            email: None,
            mat_number: None,
            level: 0,
        };
        self.create_account(&new).await
    }

    /// # Errors
    ///
    /// `NotFound` if no account has this ID.
    pub async fn get_account(&self, unique_id: &str) -> Result<Account, DatabaseError> {
        require_account(self.db().conn(), unique_id).await
    }

    /// Resolve an account ID into the actor performing an operation.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account is missing, `Unauthorized` if it is deleted.
    pub async fn resolve_actor(&self, unique_id: &str) -> Result<Actor, DatabaseError> {
        let account = self.get_account(unique_id).await?;
        if account.is_deleted {
            return Err(DatabaseError::unauthorized(format!(
                "account '{unique_id}' is deleted"
            )));
        }
        Ok(Actor::new(account.unique_id, account.role))
    }

    pub async fn list_accounts(
        &self,
        role: Option<Role>,
        include_deleted: bool,
        limit: u32,
    ) -> Result<Vec<Account>, DatabaseError> {
        let mut clauses = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(role) = role {
            clauses.push(format!("role = ?{}", params.len() + 1));
            params.push(role.as_str().into());
        }
        if !include_deleted {
            clauses.push("is_deleted = 0".to_string());
        }
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM accounts {where_clause} \
                     ORDER BY created_at, unique_id LIMIT {limit}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;

        let mut accounts = Vec::new();
        while let Some(row) = rows.next().await? {
            accounts.push(row_to_account(&row)?);
        }
        Ok(accounts)
    }

    /// # Errors
    ///
    /// `NotFound` if no account has this ID.
    pub async fn approve_account(&self, unique_id: &str) -> Result<Account, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let outcome = async {
            let changed = tx
                .execute(
                    "UPDATE accounts SET is_approved = 1, updated_at = ?1 WHERE unique_id = ?2",
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
        tracing::info!(unique_id, "account approved");
        Ok(account)
    }

    /// Change a staff member's role.
    ///
    /// Becoming a course adviser requires a current session and leaves the
    /// adviser inactive until [`assign_adviser_level`](Self::assign_adviser_level).
    /// Leaving the adviser role clears the adviser level and active flag.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account is missing. `Validation` when a student is
    /// involved on either side or no session is current.
    pub async fn update_role(&self, unique_id: &str, role: Role) -> Result<Account, DatabaseError> {
        if role == Role::Student {
            return Err(DatabaseError::validation(
                "staff accounts cannot be changed into students",
            ));
        }
        let tx = self.db().begin_write().await?;
        let outcome = update_role_in_tx(&tx, unique_id, role).await;
        let account = tx.finish(outcome).await?;
        tracing::info!(unique_id, role = %role, "role updated");
        Ok(account)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` on storage failure.
    pub async fn account_stats(&self) -> Result<AccountStats, DatabaseError> {
        let conn = self.db().conn();
        let mut rows = conn
            .query(
                "SELECT role, COUNT(*) FROM accounts WHERE is_deleted = 0 GROUP BY role",
                (),
            )
            .await?;
        let mut roles = RoleCounts::default();
        while let Some(row) = rows.next().await? {
            let count: i64 = row.get(1)?;
            match parse_enum::<Role>(&row.get::<String>(0)?)? {
                Role::Admin => roles.admin = count,
                Role::Lecturer => roles.lecturer = count,
                Role::CourseAdviser => roles.course_adviser = count,
                Role::Student => roles.student = count,
            }
        }
        let pending_approvals = query_count(
            conn,
            "SELECT COUNT(*) FROM accounts WHERE is_deleted = 0 AND is_approved = 0",
            (),
        )
        .await?;

        Ok(AccountStats {
            total_accounts: roles.admin + roles.lecturer + roles.course_adviser + roles.student,
            roles,
            pending_approvals,
            current_session: find_current_session(conn).await?.map(|s| s.label),
        })
    }
}

async fn update_role_in_tx(
    conn: &libsql::Connection,
    unique_id: &str,
    role: Role,
) -> Result<Account, DatabaseError> {
    let account = require_account(conn, unique_id).await?;
    if account.role == Role::Student {
        return Err(DatabaseError::validation(format!(
            "'{unique_id}' is a student; only staff roles can change"
        )));
    }
    if account.role == role {
        return Ok(account);
    }
    let now = Utc::now().to_rfc3339();

    if role == Role::CourseAdviser {
        let session = find_current_session(conn)
            .await?
            .ok_or_else(|| DatabaseError::validation("no current session is set"))?;
        conn.execute(
            "UPDATE accounts SET role = ?1, is_staff = 1, active_adviser = 0, \
             current_session = ?2, updated_at = ?3 WHERE unique_id = ?4",
            libsql::params![role.as_str(), session.label, now, unique_id],
        )
        .await?;
    } else {
        conn.execute(
            "UPDATE accounts SET role = ?1, is_staff = 1, active_adviser = 0, \
             adviser_level = 0, updated_at = ?2 WHERE unique_id = ?3",
            libsql::params![role.as_str(), now, unique_id],
        )
        .await?;
    }
    require_account(conn, unique_id).await
}
