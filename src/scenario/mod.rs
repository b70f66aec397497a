//! # Scenario module
//!
//! **Scenario input and result output** – The JSON wire shapes of the
//! simulation and their materialization into a [`RoadNetwork`](crate::network::road_network::RoadNetwork).
//!
//! ## Purpose
//!
//! - Typed serde shapes for the scenario file (junctions with signal
//!   programs, roads, cars with cyclic routes)
//! - Full validation at load: any malformed entity rejects the scenario
//!   before a single tick runs
//! - Unit conversions at the boundary: speeds arrive in km/h and are
//!   simulated in m/s, road lengths derive from the junction grid
//!   (100 m per coordinate unit)
//! - The result shape exporting each vehicle's street (as a pair of
//!   external junction identifiers), lane and position
//!
//! ## Components
//!
//! - [`input::ScenarioInput`] – Scenario shape plus [`input::ScenarioInput::build`]
//! - [`input::ScenarioError`] – All load-time rejection reasons
//! - [`output::SimulationResult`] – Result shape plus writer
pub mod input;
pub mod output;

pub use self::input::{ScenarioError, ScenarioInput};
pub use self::output::{CarResult, SimulationResult};
