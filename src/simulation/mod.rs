//! # Simulation module
//!
//! **Top-level orchestration module** – Coordinates all major components of the
//! Intelligent-Driver-Model traffic simulation.
//!
//! This module owns the road network and the per-street low-level state, and
//! executes the step-by-step simulation pipeline. It is the main entry point
//! for running, controlling, and inspecting a simulation.
//!
//! ## Purpose
//!
//! - Materializes one low-level street per directed street of the network
//! - Runs the per-tick pipeline and keeps the two representations in sync
//! - Aggregates total travel distance and per-street stop-line crossings,
//!   the two quantities the outer signal optimization consumes
//!
//! ## Simulation pipeline
//!
//! Each call to [`Simulator::step()`](crate::simulation::simulator::Simulator::step) executes:
//! ```text
//! 1. Signal programs tick      ← signaling routine
//! 2. Car-following update      ← idm routine (pass 1 + pass 2)
//! 3. Commit and migration      ← consistency routine
//! 4. Write-back into the network
//! ```
//!
//! ## Components
//!
//! - [`simulator::Simulator`] – Main simulation controller, generic over the
//!   container layout
//! - [`simulator::SimulationError`] – Unified error type for simulation steps
//!
//! ## Usage
//!
//! Load a scenario, build the simulator, run it and export the result:
//! ```rust,no_run
//! use idm_traffic_sim_core::scenario::input::ScenarioInput;
//! use idm_traffic_sim_core::scenario::output::SimulationResult;
//! use idm_traffic_sim_core::simulation::simulator::Simulator;
//! use idm_traffic_sim_core::verbose::VerboseLevel;
//!
//! let raw = std::fs::read_to_string("scenario.json").unwrap();
//! let input: ScenarioInput = serde_json::from_str(&raw).unwrap();
//! let (network, time_steps) = input.build().unwrap();
//!
//! let mut simulator: Simulator = Simulator::new(network);
//! simulator.set_verbose_level(VerboseLevel::Main);
//! simulator.steps(time_steps).unwrap();
//!
//! let result = SimulationResult::from_network(simulator.get_network());
//! println!("{}", serde_json::to_string(&result).unwrap());
//! ```
pub mod simulator;

pub use self::simulator::{SimulationError, Simulator};
