//! Core utilities: settlement-run scheduling

pub mod schedule;
