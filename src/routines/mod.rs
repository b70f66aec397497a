//! # Routines module
//!
//! **Per-tick computation routines** – The three phases the step driver
//! runs every tick, plus the acceleration law they share.
//!
//! ## Simulation pipeline
//!
//! Each tick executes, in order:
//! ```text
//! 1. signaling    – advance junction timers, flip street signals
//! 2. idm          – two-pass car update: base accelerations, lane decisions
//! 3. consistency  – commit pending state, migrate departed cars
//! ```
//!
//! The [`idm`] routine writes pending state only; the [`consistency`]
//! routine owns the single commit point. Between the two, and between
//! the consistency sub-phases, the step driver's call order provides the
//! barriers the data-parallel passes rely on.
//!
//! ## Components
//!
//! - [`acceleration::compute_acceleration`] – The Intelligent-Driver-Model law
//! - [`idm::perform`] – Car-following and MOBIL lane changes, street- or car-parallel
//! - [`consistency::perform`] – Commit, beyond collection, cross-street migration
//! - [`signaling::perform`] – Signal program advance and red/green flips
pub mod acceleration;
pub mod consistency;
pub mod idm;
pub mod signaling;
