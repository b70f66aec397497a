//! # Streets module
//!
//! **Per-street spatial index** – Keeps the cars of one directed street
//! ordered and answers the neighbor queries that the car-following and
//! lane-change laws consume.
//!
//! ## Purpose
//!
//! - Split every car's dynamic state into *current* (read during a tick)
//!   and *pending* (written during a tick, committed once)
//! - Keep cars sorted by `(distance ascending, external id descending)`
//!   between ticks
//! - Answer nearest-in-front / nearest-behind queries per lane
//! - Stage cars migrating in from predecessor streets and partition off
//!   cars that ran past the street end (the *beyonds*)
//! - Overlay a phantom stop-line car while the street's signal is red
//!
//! ## Components
//!
//! - [`car::SimCar`] – Value type stored in the containers
//! - [`container::CarContainer`] – Contract both layouts implement
//! - [`sorted_vec::SortedVecContainer`] – Contiguous sorted layout (default)
//! - [`bucket_list::BucketListContainer`] – Section × lane bucket layout
//! - [`sim_street::SimStreet`] – Container plus signal state and overlay
//!
//! The container layout is a type parameter of the simulator, chosen once
//! and threaded through every routine, so the inner loops compile down to
//! direct calls for whichever layout is picked.
pub mod bucket_list;
pub mod car;
pub mod container;
pub mod sim_street;
pub mod sorted_vec;

pub use self::bucket_list::{BucketListContainer, SECTION_LENGTH};
pub use self::car::{SimCar, VEHICLE_LENGTH};
pub use self::container::CarContainer;
pub use self::sim_street::{Signal, SimStreet, TRAFFIC_LIGHT_OFFSET};
pub use self::sorted_vec::SortedVecContainer;
