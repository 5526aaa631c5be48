//! Shared test utilities for acad-db unit tests.

pub(crate) mod helpers {
    use acad_core::entities::{Account, Course, NewAccount, NewCourse};
    use acad_core::enums::{Role, Semester};

    use crate::service::AcadService;

    /// Create an in-memory service with default policies.
    pub async fn test_service() -> AcadService {
        AcadService::new_local(":memory:").await.unwrap()
    }

    /// Open a session and make it current; returns the session ID.
    pub async fn open_test_session(svc: &AcadService, label: &str) -> String {
        svc.open_new_session(label).await.unwrap().session.id
    }

    pub fn new_account(unique_id: &str, role: Role) -> NewAccount {
        NewAccount {
            unique_id: unique_id.to_string(),
            role,
            first_name: "Test".to_string(),
            last_name: unique_id.to_string(),
            email: Some(format!("{unique_id}@example.edu")),
            mat_number: (role == Role::Student).then(|| format!("MAT/{unique_id}")),
            level: if role == Role::Student { 100 } else { 0 },
        }
    }

    pub async fn create_student(svc: &AcadService, unique_id: &str, level: i64) -> Account {
        let mut new = new_account(unique_id, Role::Student);
        new.level = level;
        svc.create_account(&new).await.unwrap()
    }

    pub async fn create_staff(svc: &AcadService, unique_id: &str, role: Role) -> Account {
        svc.create_account(&new_account(unique_id, role)).await.unwrap()
    }

    pub async fn create_test_course(svc: &AcadService, code: &str, level: i64) -> Course {
        svc.create_course(
            &NewCourse {
                code: code.to_string(),
                title: format!("{code} title"),
                credits: 3,
                level,
                semester: Semester::First,
            },
            &[],
        )
        .await
        .unwrap()
    }
}
