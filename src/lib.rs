//! Listing insight: student comment sentiment plus grounded landlord
//! questions for one apartment listing.
//!
//! The binary reads an [`AnalysisRequest`] as JSON and prints the
//! [`AnalysisReport`]; library users call [`analyze`] directly with their
//! own model handle.

pub mod assessment;
pub mod config;
pub mod pipeline;
pub mod request;

pub use assessment::{Assessment, RiskLevel, assess};
pub use config::PipelineConfig;
pub use pipeline::{AnalysisReport, StudentReviews, analyze};
pub use request::AnalysisRequest;
