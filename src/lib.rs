//! hwdash library
//!
//! Collects hardware and operating system facts from a pluggable provider
//! and normalizes them into one display-ready summary.

pub mod error;
pub mod data;
pub mod collectors;
pub mod utils;
pub mod aggregate;
pub mod cache;
pub mod service;
pub mod config;
pub mod display;

pub use error::{HwdashError, Result};
pub use data::{Domain, DomainStatus, HardwareSummary};
pub use collectors::{MonitorSource, Provider, SysfsProvider};
pub use aggregate::collect_summary;
pub use cache::TtlCache;
pub use service::SummaryService;
