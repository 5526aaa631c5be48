//! # acad-core
//!
//! Core types, grading rules, and error taxonomy for the academic records engine.
//!
//! This crate provides the foundational types shared across all `acad` crates:
//! - Entity structs for accounts, sessions, courses, registrations, results,
//!   and adviser assignments
//! - Role, semester, and grade enums with their storage representations
//! - The pure grade calculator and level promotion arithmetic
//! - ID prefix constants
//! - The error taxonomy surfaced to callers
//! - Response types returned by engine operations

pub mod entities;
pub mod enums;
pub mod errors;
pub mod grading;
pub mod identity;
pub mod ids;
pub mod promotion;
pub mod responses;
