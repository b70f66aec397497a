//! # Estimation module
//!
//! **Free-flow route projection** – An isolated per-vehicle projection
//! used by signal-program seeding and the outer optimization loop.
//!
//! The projection ignores signals and vehicle interactions entirely:
//! every vehicle moves at `min(target velocity, speed limit)` and follows
//! its turn sequence through the network. What it produces:
//!
//! - an upper bound on each vehicle's travel distance (its *priority*),
//! - per-street counts of stop-line passes (street throughput),
//! - a log of who passed which stop line at which tick.
//!
//! ## Components
//!
//! - [`estimator::Estimator`] – The projection and its result surface
//! - [`crossing::TrafficLightCrossing`] – One recorded stop-line pass
pub mod crossing;
pub mod estimator;

pub use self::crossing::TrafficLightCrossing;
pub use self::estimator::Estimator;
