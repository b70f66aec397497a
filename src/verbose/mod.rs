//! # Logging Module
//!
//! Structured logging system for traffic simulation debugging and monitoring.
//!
//! This module provides hierarchical logging levels and structured event tracking
//! using the `tracing` crate with JSON output format. All lines funnel through a
//! single emit point keyed by [`VerboseLevel`]: globally filtered lines go through
//! [`verbose_log_with_fields`], per-run filtered lines through
//! [`VerboseLevel::log_with_fields`], and the run-tagged [`LocalLogger`] renders
//! its own JSON lines for output that must carry a run identifier.
//!
//! **Most of time end-developer should not use this module directly, except
//! for setting the global logging level.**
//!
//! ## Components
//!
//! - [`VerboseLevel`] - Hierarchical debug levels (None → Main → Additional → Detailed → All)
//! - [`verbose_log_with_fields`] - Globally filtered structured logging
//! - [`LocalLogger`] - Per-run logger carrying a run tag
//! - Event constants - Predefined event types for simulation phases
//!
//! ## Quick Start
//!
//! ```rust
//! use idm_traffic_sim_core::verbose::{
//!     EVENT_STEP, VerboseLevel, set_verbose_level, verbose_log_with_fields,
//! };
//!
//! // Set global logging level
//! set_verbose_level(VerboseLevel::Main);
//!
//! // Log simulation events
//! verbose_log_with_fields(
//!     VerboseLevel::Main,
//!     EVENT_STEP,
//!     "Starting simulation step",
//!     &[("step", &42)],
//! );
//! ```
//!
//! ## Logging Levels
//!
//! - `None` - No logging
//! - `Main` - Major simulation phases only
//! - `Additional` - Nested function details
//! - `Detailed` - Loop iterations and fine-grained operations
//! - `All` - Everything (trace level)
pub mod logger;
pub mod verbose;

pub use self::{logger::*, verbose::*};
