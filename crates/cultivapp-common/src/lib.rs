//! CultivApp Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared domain types and pure derivations for the CultivApp client.
//!
//! # Overview
//!
//! - **Types**: closed stage/rule/crop enums and the maintenance `Rule` record
//! - **Progress**: stage progress percentages and severity bands for display
//! - **Tasks**: due/overdue classification of scheduled maintenance tasks
//! - **Logging**: tracing subscriber setup shared by every binary
//!
//! # Example
//!
//! ```
//! use cultivapp_common::progress::{overall_percent, SeverityBand};
//!
//! let percent = overall_percent(3, 8);
//! assert_eq!(percent, 38);
//! assert_eq!(SeverityBand::from_percent(f64::from(percent)), SeverityBand::Low);
//! ```

pub mod error;
pub mod logging;
pub mod progress;
pub mod tasks;
pub mod types;

// Re-export commonly used types
pub use error::{CultivappError, Result};
pub use types::{CropStatus, HealthCategory, Rule, RuleId, RuleType, StageType};
