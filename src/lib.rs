//! # idm_traffic_sim_core
//!
//! Core library for microscopic traffic simulation via the Intelligent
//! Driver Model.
//!
//! Every vehicle is simulated individually on a directed road network in
//! discrete one-second ticks: an IDM car-following law plus a MOBIL-style
//! lane-change law update the vehicles, junction signal programs gate the
//! street ends, and vehicles that run off a street are handed over to
//! their successor street according to their cyclic turn sequence.
//!
//! ## Modules
//!
//! - [`agents`] – Network-level vehicle records
//! - [`network`] – Junctions, streets, directions and the owning arenas
//! - [`streets`] – Per-street spatial index (two container layouts) and
//!   the red-light overlay
//! - [`routines`] – The per-tick computation routines
//! - [`simulation`] – The step driver
//! - [`estimation`] – Free-flow projection for signal seeding and
//!   optimization
//! - [`scenario`] – JSON input/output shapes and validation
//! - [`verbose`] – Structured logging
//! - [`utils`] – Scenario generators and deterministic test RNG
//!
//! ## Quick start
//!
//! ```rust
//! use idm_traffic_sim_core::scenario::ScenarioInput;
//! use idm_traffic_sim_core::simulation::Simulator;
//!
//! let raw = serde_json::json!({
//!     "time_steps": 10,
//!     "junctions": [
//!         {"id": 1, "x": 0, "y": 0, "signals": [{"dir": 1, "time": 5}]},
//!         {"id": 2, "x": 1, "y": 0, "signals": [{"dir": 3, "time": 5}]}
//!     ],
//!     "roads": [{"junction1": 1, "junction2": 2, "lanes": 1, "limit": 50.0}],
//!     "cars": [{
//!         "id": 1, "target_velocity": 50.0, "max_acceleration": 1.0,
//!         "target_deceleration": 1.5, "min_distance": 2.0,
//!         "target_headway": 1.5, "politeness": 0.5,
//!         "start": {"from": 1, "to": 2, "lane": 0, "distance": 0.0},
//!         "route": [2]
//!     }]
//! });
//! let scenario: ScenarioInput = serde_json::from_value(raw).unwrap();
//! let (network, time_steps) = scenario.build().unwrap();
//! let mut simulator: Simulator = Simulator::new(network);
//! simulator.steps(time_steps).unwrap();
//! assert!(simulator.get_total_travel_distance() > 0.0);
//! ```
pub mod agents;
pub mod estimation;
pub mod network;
pub mod routines;
pub mod scenario;
pub mod simulation;
pub mod streets;
pub mod utils;
pub mod verbose;
