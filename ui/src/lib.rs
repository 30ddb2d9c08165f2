//! Shared UI crate for Robot Report: the report modal, its charts and PDF export.

pub mod charts;
pub mod config;
pub mod core;
pub mod export;
pub mod i18n;
pub mod loader;
pub mod report;
pub mod services;
pub mod views;

#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(test)]
mod testing;

pub use config::ReportSettings;
pub use report::{ReportData, ReportModal};
pub use services::ReportServices;
