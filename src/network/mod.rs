//! # Network module
//!
//! **Road-network graph** – Junctions, directed streets and the arena that owns them.
//!
//! A road from the scenario input becomes two opposing [`street::Street`]s. Each
//! street references its two junctions by ID; each [`junction::Junction`] keeps
//! four incoming and four outgoing street slots keyed by [`directions::CardinalDirection`].
//! The [`road_network::RoadNetwork`] owns the flat arenas; everything else
//! navigates via stable indices.
//!
//! ## Components
//!
//! - [`directions`] – Cardinal directions, turn tokens and the turn algebra
//! - [`junction::Junction`] – Signal program timer and street slots
//! - [`street::Street`] – One direction of a road
//! - [`road_network::RoadNetwork`] – Arena owner and lookup surface
pub mod directions;
pub mod junction;
pub mod road_network;
pub mod street;

pub use self::directions::{CardinalDirection, DirectionError, TurnDirection};
pub use self::junction::{Junction, JunctionError, JunctionID, SignalPhase, MIN_SIGNAL_DURATION};
pub use self::road_network::RoadNetwork;
pub use self::street::{Street, StreetID};
