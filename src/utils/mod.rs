//! # Utils Module
//!
//! Utility functions and scenario generators for simulation development and testing.
//!
//! ## Key Components
//!
//! ### Scenario Generators
//! - [`generators::generate_grid_scenario`] - Creates randomized grid scenarios
//!
//! ### Testing Support
//! - [`rand::rng`] - Deterministic RNG for reproducible tests
//!
//! ## Example
//!
//! ```rust
//! use idm_traffic_sim_core::utils::generators::generate_grid_scenario;
//! use rand::SeedableRng;
//!
//! // Generate a 3×3 junction grid with 2-lane roads and 100 vehicles
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let scenario = generate_grid_scenario(3, 3, 2, 100, &mut rng);
//! assert_eq!(scenario.junctions.len(), 9);
//! ```
pub mod generators;
pub mod rand;
