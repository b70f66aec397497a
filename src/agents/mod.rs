//! # Agents Module
//!
//! This module provides the network-level vehicle record of the simulation:
//! static Intelligent-Driver-Model parameters, the cyclic turn sequence and
//! the position/velocity state the simulator syncs in and out of the
//! per-street containers.
//!
//! ## Key Components
//!
//! - [`Vehicle`] - The primary agent representing vehicles in the simulation
//! - [`VehiclePosition`] - Street, lane and distance of a vehicle
//!
//! ## Usage
//!
//! ```rust
//! use idm_traffic_sim_core::agents::Vehicle;
//! use idm_traffic_sim_core::network::directions::TurnDirection;
//!
//! // Create a basic vehicle
//! let vehicle = Vehicle::new(1)
//!     .with_target_velocity(13.89)
//!     .with_max_acceleration(1.0)
//!     .with_target_deceleration(1.5)
//!     .with_min_distance(2.0)
//!     .with_target_headway(1.5)
//!     .with_politeness(0.5)
//!     .with_route(vec![TurnDirection::Straight])
//!     .with_position(0, 0, 0.0)
//!     .build();
//! ```
mod vehicle;

pub use self::vehicle::*;
