//! ID prefix constants.
//!
//! Generated IDs take the form `{prefix}-{8 hex chars}`, e.g. `ses-a3f8b2c1`.
//! Account identifiers are external and never generated here.

pub const PREFIX_SESSION: &str = "ses";
pub const PREFIX_COURSE: &str = "crs";
pub const PREFIX_REGISTRATION: &str = "reg";
pub const PREFIX_RESULT: &str = "rsl";
pub const PREFIX_ADVISER_ASSIGNMENT: &str = "adv";

/// Every prefix the engine generates IDs for.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_SESSION,
    PREFIX_COURSE,
    PREFIX_REGISTRATION,
    PREFIX_RESULT,
    PREFIX_ADVISER_ASSIGNMENT,
];
