//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use acad_config::AcadConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/var/lib/acad/records.db"
busy_timeout_ms = 250

[lifecycle]
purge_grace_days = 14
root_admin_id = "000000"
level_step = 100
wrap_threshold = 600
intake_level = 100

[grading]
max_ca = 30
max_exam = 70

[general]
default_limit = 50
"#,
        )?;

        let config: AcadConfig = Figment::from(Serialized::defaults(AcadConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.path, "/var/lib/acad/records.db");
        assert_eq!(config.database.busy_timeout_ms, 250);
        assert_eq!(config.lifecycle.purge_grace_days, 14);
        assert_eq!(config.lifecycle.root_admin_id, "000000");
        assert_eq!(config.lifecycle.level_rule().next_level(500), 600);
        assert_eq!(config.lifecycle.level_rule().next_level(600), 100);
        assert_eq!(config.grading.max_ca, 30);
        assert_eq!(config.grading.max_exam, 70);
        assert_eq!(config.general.default_limit, 50);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[lifecycle]
purge_grace_days = 7
"#,
        )?;

        let config: AcadConfig = Figment::from(Serialized::defaults(AcadConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.lifecycle.purge_grace_days, 7);
        assert_eq!(config.lifecycle.root_admin_id, "1");
        assert_eq!(config.database.path, "academic.db");
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "from-toml.db"
"#,
        )?;
        jail.set_env("ACAD_DATABASE__PATH", "from-env.db");

        let config: AcadConfig = Figment::from(Serialized::defaults(AcadConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("ACAD_").split("__"))
            .extract()?;

        assert_eq!(config.database.path, "from-env.db");
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".acad")?;
        jail.create_file(
            ".acad/config.toml",
            r#"
[grading]
max_ca = 25
"#,
        )?;

        let config = AcadConfig::load().expect("config loads");
        assert_eq!(config.grading.max_ca, 25);
        Ok(())
    });
}

#[test]
fn invalid_values_are_rejected_on_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".acad")?;
        jail.create_file(
            ".acad/config.toml",
            r#"
[lifecycle]
purge_grace_days = 0
"#,
        )?;

        let err = AcadConfig::load().expect_err("zero grace days must fail");
        assert!(err.to_string().contains("purge_grace_days"));
        Ok(())
    });
}
