mod demo;
pub use demo::ReportDemo;

pub mod samples;
