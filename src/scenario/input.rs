use crate::agents::Vehicle;
use crate::network::directions::{CardinalDirection, TurnDirection};
use crate::network::junction::{Junction, JunctionID, MIN_SIGNAL_DURATION, SignalPhase};
use crate::network::road_network::RoadNetwork;
use crate::network::street::Street;
use crate::verbose::{EVENT_SCENARIO_LOAD, VerboseLevel, verbose_log_with_fields};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

/// Maximum number of lanes per direction.
pub const MAX_LANE_COUNT: usize = 3;

/// Custom error types for scenario loading.
///
/// Any of these is fatal: the scenario is rejected as a whole and no
/// simulation is attempted.
#[derive(Debug, Clone)]
pub enum ScenarioError {
    DuplicateJunction(i64),
    DuplicateVehicle(i64),
    UnknownJunction(i64),
    InvalidLaneCount { junction1: i64, junction2: i64, lanes: usize },
    InvalidSignalDirection { junction: i64, code: u8 },
    SignalDurationTooShort { junction: i64, duration: u32 },
    EmptySignalsAfterFilter { junction: i64 },
    InvalidTurnCode { car: i64, code: u8 },
    InvalidPoliteness { car: i64, value: f64 },
    EmptyRoute { car: i64 },
    NoStreetBetween { car: i64, from: i64, to: i64 },
    InvalidStartLane { car: i64, lane: usize },
    InvalidStartDistance { car: i64, distance: f64 },
}

impl fmt::Display for ScenarioError {
    /// Formats the error message for `ScenarioError`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::DuplicateJunction(id) => {
                write!(f, "Duplicate junction ID '{}' in scenario", id)
            }
            ScenarioError::DuplicateVehicle(id) => {
                write!(f, "Duplicate car ID '{}' in scenario", id)
            }
            ScenarioError::UnknownJunction(id) => {
                write!(f, "Unknown junction ID '{}' referenced in scenario", id)
            }
            ScenarioError::InvalidLaneCount {
                junction1,
                junction2,
                lanes,
            } => {
                write!(
                    f,
                    "Road between junctions '{}' and '{}' has invalid lane count {}",
                    junction1, junction2, lanes
                )
            }
            ScenarioError::InvalidSignalDirection { junction, code } => {
                write!(
                    f,
                    "Junction '{}' has a signal with invalid direction code {}",
                    junction, code
                )
            }
            ScenarioError::SignalDurationTooShort { junction, duration } => {
                write!(
                    f,
                    "Junction '{}' has a signal of duration {} below the minimum of {}",
                    junction, duration, MIN_SIGNAL_DURATION
                )
            }
            ScenarioError::EmptySignalsAfterFilter { junction } => {
                write!(
                    f,
                    "Junction '{}' has no signals left after dropping disconnected directions",
                    junction
                )
            }
            ScenarioError::InvalidTurnCode { car, code } => {
                write!(f, "Car '{}' has an invalid turn code {} in its route", car, code)
            }
            ScenarioError::InvalidPoliteness { car, value } => {
                write!(
                    f,
                    "Car '{}' has politeness {} outside of [0.0, 1.0]",
                    car, value
                )
            }
            ScenarioError::EmptyRoute { car } => {
                write!(f, "Car '{}' has an empty route", car)
            }
            ScenarioError::NoStreetBetween { car, from, to } => {
                write!(
                    f,
                    "Car '{}' starts on a street from junction '{}' to junction '{}' which does not exist",
                    car, from, to
                )
            }
            ScenarioError::InvalidStartLane { car, lane } => {
                write!(f, "Car '{}' starts on lane {} which does not exist", car, lane)
            }
            ScenarioError::InvalidStartDistance { car, distance } => {
                write!(
                    f,
                    "Car '{}' starts at distance {} which is not on its street",
                    car, distance
                )
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

/// One signal entry of a junction: `dir` is a cardinal direction code
/// (0 → N, 1 → E, 2 → S, 3 → W), `time` the phase duration in ticks.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalInput {
    pub dir: u8,
    pub time: u32,
}

/// A junction of the scenario with its signal program.
#[derive(Debug, Clone, Deserialize)]
pub struct JunctionInput {
    pub id: i64,
    pub x: i64,
    pub y: i64,
    pub signals: Vec<SignalInput>,
}

/// A road of the scenario; materialized as two opposing streets.
/// `limit` is in km/h.
#[derive(Debug, Clone, Deserialize)]
pub struct RoadInput {
    pub junction1: i64,
    pub junction2: i64,
    pub lanes: usize,
    pub limit: f64,
}

/// Starting position of a car: the street from junction `from` to
/// junction `to`, a lane on it and the distance from its start in meters.
#[derive(Debug, Clone, Deserialize)]
pub struct StartInput {
    pub from: i64,
    pub to: i64,
    pub lane: usize,
    pub distance: f64,
}

/// A car of the scenario. `target_velocity` is in km/h, the route is a
/// sequence of turn codes (0 → U-turn, 1 → left, 2 → straight, 3 → right)
/// applied cyclically.
#[derive(Debug, Clone, Deserialize)]
pub struct CarInput {
    pub id: i64,
    pub target_velocity: f64,
    pub max_acceleration: f64,
    pub target_deceleration: f64,
    pub min_distance: f64,
    pub target_headway: f64,
    pub politeness: f64,
    pub start: StartInput,
    pub route: Vec<u8>,
}

/// The whole scenario as read from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioInput {
    pub time_steps: u32,
    pub junctions: Vec<JunctionInput>,
    pub roads: Vec<RoadInput>,
    pub cars: Vec<CarInput>,
}

/// Converts km/h to m/s.
fn kmh_to_ms(speed: f64) -> f64 {
    speed * 1000.0 / 3600.0
}

/// Street length between two junctions: the Euclidean distance on the
/// coordinate grid scaled by 100 meters per unit.
fn street_length(a: &Junction, b: &Junction) -> f64 {
    let x_offset = (a.get_x() - b.get_x()) as f64;
    let y_offset = (a.get_y() - b.get_y()) as f64;
    x_offset.hypot(y_offset) * 100.0
}

/// Cardinal direction of `other` as seen from `origin`.
///
/// The scenario grid is left-handed; the y axis is mirrored before the
/// quadrant comparison so north points up.
fn relative_direction(origin: &Junction, other: &Junction) -> CardinalDirection {
    let x_offset = other.get_x() - origin.get_x();
    let y_offset = -(other.get_y() - origin.get_y());

    if x_offset >= 0 {
        if y_offset.abs() < x_offset {
            CardinalDirection::East
        } else if y_offset >= 0 {
            CardinalDirection::North
        } else {
            CardinalDirection::South
        }
    } else if y_offset.abs() < -x_offset {
        CardinalDirection::West
    } else if y_offset >= 0 {
        CardinalDirection::North
    } else {
        CardinalDirection::South
    }
}

impl ScenarioInput {
    /// Materializes the scenario into a road network.
    ///
    /// Junctions come first, then every road becomes two opposing streets
    /// registered in the junction slots, then signal phases pointing at
    /// disconnected directions are dropped, and finally the cars are
    /// resolved onto their starting streets. Any validation failure
    /// rejects the scenario as a whole.
    ///
    /// Returns the network together with the requested number of ticks.
    pub fn build(&self) -> Result<(RoadNetwork, u32), ScenarioError> {
        let mut network = RoadNetwork::new();
        let mut junction_ids: IndexMap<i64, JunctionID> = IndexMap::new();

        for junction_input in &self.junctions {
            if junction_ids.contains_key(&junction_input.id) {
                return Err(ScenarioError::DuplicateJunction(junction_input.id));
            }
            let mut signals = Vec::with_capacity(junction_input.signals.len());
            for signal in &junction_input.signals {
                let direction = CardinalDirection::try_from(signal.dir).map_err(|_| {
                    ScenarioError::InvalidSignalDirection {
                        junction: junction_input.id,
                        code: signal.dir,
                    }
                })?;
                if signal.time < MIN_SIGNAL_DURATION {
                    return Err(ScenarioError::SignalDurationTooShort {
                        junction: junction_input.id,
                        duration: signal.time,
                    });
                }
                signals.push(SignalPhase::new(direction, signal.time));
            }
            let id = network.add_junction(Junction::new(
                0,
                junction_input.id,
                junction_input.x,
                junction_input.y,
                signals,
            ));
            junction_ids.insert(junction_input.id, id);
        }

        for road in &self.roads {
            let junction1 = *junction_ids
                .get(&road.junction1)
                .ok_or(ScenarioError::UnknownJunction(road.junction1))?;
            let junction2 = *junction_ids
                .get(&road.junction2)
                .ok_or(ScenarioError::UnknownJunction(road.junction2))?;
            if road.lanes == 0 || road.lanes > MAX_LANE_COUNT {
                return Err(ScenarioError::InvalidLaneCount {
                    junction1: road.junction1,
                    junction2: road.junction2,
                    lanes: road.lanes,
                });
            }
            let speed_limit = kmh_to_ms(road.limit);
            let length = street_length(
                network.get_junction(junction1),
                network.get_junction(junction2),
            );
            let direction_forward = relative_direction(
                network.get_junction(junction1),
                network.get_junction(junction2),
            );
            let direction_backward = relative_direction(
                network.get_junction(junction2),
                network.get_junction(junction1),
            );

            let forward =
                network.add_street(Street::new(0, road.lanes, speed_limit, length, junction1, junction2));
            let backward =
                network.add_street(Street::new(0, road.lanes, speed_limit, length, junction2, junction1));

            network
                .get_junction_mut(junction1)
                .add_outgoing_street(forward, direction_forward);
            network
                .get_junction_mut(junction2)
                .add_incoming_street(forward, direction_backward);
            network
                .get_junction_mut(junction2)
                .add_outgoing_street(backward, direction_backward);
            network
                .get_junction_mut(junction1)
                .add_incoming_street(backward, direction_forward);
        }

        // A signal for a direction without a connected incoming street
        // can never control traffic; such phases are dropped.
        for junction_input in &self.junctions {
            let id = junction_ids[&junction_input.id];
            let junction = network.get_junction(id);
            if junction.get_signals().is_empty() {
                continue;
            }
            let filtered: Vec<SignalPhase> = junction
                .get_signals()
                .iter()
                .filter(|phase| {
                    junction
                        .get_incoming_street(phase.get_direction())
                        .is_connected()
                })
                .copied()
                .collect();
            if filtered.is_empty() {
                return Err(ScenarioError::EmptySignalsAfterFilter {
                    junction: junction_input.id,
                });
            }
            if filtered.len() != junction.get_signals().len() {
                network.get_junction_mut(id).set_signals(filtered);
            }
        }

        let mut vehicle_ids: IndexMap<i64, ()> = IndexMap::new();
        for car in &self.cars {
            if vehicle_ids.contains_key(&car.id) {
                return Err(ScenarioError::DuplicateVehicle(car.id));
            }
            vehicle_ids.insert(car.id, ());

            if !(0.0..=1.0).contains(&car.politeness) {
                return Err(ScenarioError::InvalidPoliteness {
                    car: car.id,
                    value: car.politeness,
                });
            }
            if car.route.is_empty() {
                return Err(ScenarioError::EmptyRoute { car: car.id });
            }
            let mut route = Vec::with_capacity(car.route.len());
            for code in &car.route {
                let turn = TurnDirection::try_from(*code).map_err(|_| {
                    ScenarioError::InvalidTurnCode {
                        car: car.id,
                        code: *code,
                    }
                })?;
                route.push(turn);
            }

            let from = *junction_ids
                .get(&car.start.from)
                .ok_or(ScenarioError::UnknownJunction(car.start.from))?;
            if !junction_ids.contains_key(&car.start.to) {
                return Err(ScenarioError::UnknownJunction(car.start.to));
            }

            // The starting street is the outgoing street of `from` whose
            // target junction carries the external id `to`.
            let mut street_id = None;
            for slot in network.get_junction(from).get_outgoing_streets() {
                if !slot.is_connected() {
                    continue;
                }
                let street = network.get_street(slot.get_street());
                let target = network.get_junction(street.get_target_junction());
                if target.get_external_id() == car.start.to {
                    street_id = Some(street.get_id());
                    break;
                }
            }
            let street_id = street_id.ok_or(ScenarioError::NoStreetBetween {
                car: car.id,
                from: car.start.from,
                to: car.start.to,
            })?;

            let street = network.get_street(street_id);
            if car.start.lane >= street.get_lanes() {
                return Err(ScenarioError::InvalidStartLane {
                    car: car.id,
                    lane: car.start.lane,
                });
            }
            if car.start.distance < 0.0 || car.start.distance > street.get_length() {
                return Err(ScenarioError::InvalidStartDistance {
                    car: car.id,
                    distance: car.start.distance,
                });
            }

            network.add_vehicle(
                Vehicle::new(car.id)
                    .with_target_velocity(kmh_to_ms(car.target_velocity))
                    .with_max_acceleration(car.max_acceleration)
                    .with_target_deceleration(car.target_deceleration)
                    .with_min_distance(car.min_distance)
                    .with_target_headway(car.target_headway)
                    .with_politeness(car.politeness)
                    .with_route(route)
                    .with_position(street_id, car.start.lane, car.start.distance)
                    .build(),
            );
        }

        verbose_log_with_fields(
            VerboseLevel::Main,
            EVENT_SCENARIO_LOAD,
            "Scenario materialized",
            &[
                ("time_steps", &self.time_steps),
                ("junctions_num", &network.junctions_num()),
                ("streets_num", &network.streets_num()),
                ("vehicles_num", &network.vehicles_num()),
            ],
        );
        Ok((network, self.time_steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_scenario() -> serde_json::Value {
        serde_json::json!({
            "time_steps": 10,
            "junctions": [
                {"id": 1, "x": 0, "y": 0, "signals": [{"dir": 1, "time": 5}]},
                {"id": 2, "x": 1, "y": 0, "signals": [{"dir": 3, "time": 5}]}
            ],
            "roads": [
                {"junction1": 1, "junction2": 2, "lanes": 2, "limit": 50.0}
            ],
            "cars": [
                {
                    "id": 7,
                    "target_velocity": 50.0,
                    "max_acceleration": 1.0,
                    "target_deceleration": 1.5,
                    "min_distance": 2.0,
                    "target_headway": 1.5,
                    "politeness": 0.3,
                    "start": {"from": 1, "to": 2, "lane": 0, "distance": 0.0},
                    "route": [2]
                }
            ]
        })
    }

    fn parse(value: serde_json::Value) -> ScenarioInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_build_minimal_scenario() {
        let (network, time_steps) = parse(minimal_scenario()).build().unwrap();
        assert_eq!(time_steps, 10);
        assert_eq!(network.junctions_num(), 2);
        // One road becomes two opposing streets
        assert_eq!(network.streets_num(), 2);
        assert_eq!(network.vehicles_num(), 1);

        let street = network.get_street(network.get_vehicle(0).get_position().street);
        // 1 grid unit apart: 100 m
        assert_eq!(street.get_length(), 100.0);
        // 50 km/h
        assert!((street.get_speed_limit() - 13.888888888888889).abs() < 1e-12);
        assert_eq!(street.get_lanes(), 2);

        let vehicle = network.get_vehicle(0);
        assert!((vehicle.get_target_velocity() - 13.888888888888889).abs() < 1e-12);
        assert_eq!(vehicle.get_route(), &[TurnDirection::Straight]);
    }

    #[test]
    fn test_street_directions_registered() {
        let (network, _) = parse(minimal_scenario()).build().unwrap();
        // Junction 2 lies east of junction 1
        let junction1 = network.get_junction(0);
        assert!(junction1
            .get_outgoing_street(CardinalDirection::East)
            .is_connected());
        assert!(junction1
            .get_incoming_street(CardinalDirection::East)
            .is_connected());
        let junction2 = network.get_junction(1);
        assert!(junction2
            .get_outgoing_street(CardinalDirection::West)
            .is_connected());
        assert!(junction2
            .get_incoming_street(CardinalDirection::West)
            .is_connected());
    }

    #[test]
    fn test_duplicate_junction_rejected() {
        let mut value = minimal_scenario();
        value["junctions"][1]["id"] = serde_json::json!(1);
        assert!(matches!(
            parse(value).build(),
            Err(ScenarioError::DuplicateJunction(1))
        ));
    }

    #[test]
    fn test_politeness_out_of_range_rejected() {
        let mut value = minimal_scenario();
        value["cars"][0]["politeness"] = serde_json::json!(1.5);
        assert!(matches!(
            parse(value).build(),
            Err(ScenarioError::InvalidPoliteness { car: 7, .. })
        ));
    }

    #[test]
    fn test_bad_turn_code_rejected() {
        let mut value = minimal_scenario();
        value["cars"][0]["route"] = serde_json::json!([2, 4]);
        assert!(matches!(
            parse(value).build(),
            Err(ScenarioError::InvalidTurnCode { car: 7, code: 4 })
        ));
    }

    #[test]
    fn test_short_signal_rejected() {
        let mut value = minimal_scenario();
        value["junctions"][0]["signals"][0]["time"] = serde_json::json!(3);
        assert!(matches!(
            parse(value).build(),
            Err(ScenarioError::SignalDurationTooShort { junction: 1, duration: 3 })
        ));
    }

    #[test]
    fn test_disconnected_signal_dropped() {
        let mut value = minimal_scenario();
        // Junction 1 only has streets to the east; a north signal is noise
        value["junctions"][0]["signals"] = serde_json::json!([
            {"dir": 1, "time": 5},
            {"dir": 0, "time": 5}
        ]);
        let (network, _) = parse(value).build().unwrap();
        assert_eq!(network.get_junction(0).get_signals().len(), 1);
        assert_eq!(
            network.get_junction(0).get_signals()[0].get_direction(),
            CardinalDirection::East
        );
    }

    #[test]
    fn test_all_signals_disconnected_rejected() {
        let mut value = minimal_scenario();
        value["junctions"][0]["signals"] = serde_json::json!([{"dir": 0, "time": 5}]);
        assert!(matches!(
            parse(value).build(),
            Err(ScenarioError::EmptySignalsAfterFilter { junction: 1 })
        ));
    }

    #[test]
    fn test_unknown_start_street_rejected() {
        let mut value = minimal_scenario();
        // from == to never matches a street
        value["cars"][0]["start"]["to"] = serde_json::json!(1);
        assert!(matches!(
            parse(value).build(),
            Err(ScenarioError::NoStreetBetween { .. })
        ));
    }

    #[test]
    fn test_bad_start_lane_and_distance_rejected() {
        let mut value = minimal_scenario();
        value["cars"][0]["start"]["lane"] = serde_json::json!(2);
        assert!(matches!(
            parse(value).build(),
            Err(ScenarioError::InvalidStartLane { car: 7, lane: 2 })
        ));

        let mut value = minimal_scenario();
        value["cars"][0]["start"]["distance"] = serde_json::json!(150.0);
        assert!(matches!(
            parse(value).build(),
            Err(ScenarioError::InvalidStartDistance { car: 7, .. })
        ));
    }

    #[test]
    fn test_relative_direction_quadrants() {
        let origin = Junction::new(0, 1, 0, 0, vec![]);
        let east = Junction::new(0, 2, 5, 1, vec![]);
        let north = Junction::new(0, 3, 1, -5, vec![]);
        let south = Junction::new(0, 4, -1, 5, vec![]);
        let west = Junction::new(0, 5, -5, -1, vec![]);
        assert_eq!(relative_direction(&origin, &east), CardinalDirection::East);
        assert_eq!(relative_direction(&origin, &north), CardinalDirection::North);
        assert_eq!(relative_direction(&origin, &south), CardinalDirection::South);
        assert_eq!(relative_direction(&origin, &west), CardinalDirection::West);
    }
}
