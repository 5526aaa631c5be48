use serde::Serialize;

use acad_core::entities::{Account, Course};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct CourseDetailResponse {
    course: Course,
    lecturers: Vec<LecturerSummary>,
}

#[derive(Debug, Serialize)]
struct LecturerSummary {
    unique_id: String,
    name: String,
    email: Option<String>,
}

impl From<Account> for LecturerSummary {
    fn from(account: Account) -> Self {
        Self {
            name: account.full_name(),
            unique_id: account.unique_id,
            email: account.email,
        }
    }
}

pub async fn run(code: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let course = ctx.service.get_course_by_code(code).await?;
    let lecturers = ctx
        .service
        .course_lecturers(&course.id)
        .await?
        .into_iter()
        .map(LecturerSummary::from)
        .collect();
    output(&CourseDetailResponse { course, lecturers }, flags.format)
}
