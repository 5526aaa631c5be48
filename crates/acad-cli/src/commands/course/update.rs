use acad_db::updates::course::{CourseUpdate, CourseUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CourseCommands;
use crate::commands::shared::actor::require_admin;
use crate::commands::shared::parse::parse_semester;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    action: &CourseCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let CourseCommands::Update { code, .. } = action else {
        anyhow::bail!("expected course update");
    };
    require_admin(ctx, "update courses")?;
    let update = build_update(action)?;
    let course = ctx.service.update_course(code, update).await?;
    output(&course, flags.format)
}

fn build_update(action: &CourseCommands) -> anyhow::Result<CourseUpdate> {
    let CourseCommands::Update {
        title,
        credits,
        level,
        semester,
        lecturer,
        clear_lecturers,
        ..
    } = action
    else {
        anyhow::bail!("expected course update");
    };

    let mut builder = CourseUpdateBuilder::new();
    if let Some(title) = title {
        builder = builder.title(title.clone());
    }
    if let Some(credits) = credits {
        builder = builder.credits(*credits);
    }
    if let Some(level) = level {
        builder = builder.level(*level);
    }
    if let Some(semester) = semester {
        builder = builder.semester(parse_semester(*semester)?);
    }
    if *clear_lecturers {
        builder = builder.lecturer_ids(Vec::new());
    } else if !lecturer.is_empty() {
        builder = builder.lecturer_ids(lecturer.clone());
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use acad_core::enums::Semester;

    use super::*;

    fn update_action(lecturer: Vec<&str>, clear_lecturers: bool) -> CourseCommands {
        CourseCommands::Update {
            code: "CSC201".to_string(),
            title: None,
            credits: Some(4),
            level: None,
            semester: Some(2),
            lecturer: lecturer.into_iter().map(String::from).collect(),
            clear_lecturers,
        }
    }

    #[test]
    fn untouched_lecturers_stay_none() {
        let update = build_update(&update_action(vec![], false)).unwrap();
        assert_eq!(update.credits, Some(4));
        assert_eq!(update.semester, Some(Semester::Second));
        assert!(update.lecturer_ids.is_none());
    }

    #[test]
    fn clear_flag_sends_empty_set() {
        let update = build_update(&update_action(vec![], true)).unwrap();
        assert_eq!(update.lecturer_ids, Some(Vec::new()));
    }

    #[test]
    fn lecturers_replace_set() {
        let update = build_update(&update_action(vec!["l1", "l2"], false)).unwrap();
        assert_eq!(
            update.lecturer_ids,
            Some(vec!["l1".to_string(), "l2".to_string()])
        );
    }
}
