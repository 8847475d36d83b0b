//! Statutory Payroll Tax Engine
//!
//! This crate computes statutory payroll deductions (income tax, health levy
//! and pension contribution) for a gross monthly pay figure under a
//! jurisdiction's published schedule, starting with Kenya.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
