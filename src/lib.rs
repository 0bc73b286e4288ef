//! ROI calculator for chatbot plus CRM-automation adoption.
//!
//! `calculator` is the pure engine: raw form values in, savings, ROI and
//! payback out. The remaining modules are the thin HTTP service around it
//! (`api`), lead persistence (`db`), and the shared config and error types.

pub mod api;
pub mod calculator;
pub mod config;
pub mod db;
pub mod error;
pub mod types;

pub use calculator::{calculate, calculate_raw, normalize};
pub use error::ValidationError;
pub use types::{DerivedMetric, RawRoiInput, RoiInput, RoiResult, SalesInputs, UndefinedMetric};
