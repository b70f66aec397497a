use crate::network::directions::TurnDirection;
use crate::network::street::{Street, StreetID};
use std::fmt;

pub type VehicleID = usize; // Alias for VehicleID

/// Custom error types for `Vehicle` operations.
#[derive(Debug, Clone)]
pub enum VehicleError {
    /// Indicates that a vehicle was declared with an empty turn sequence.
    EmptyRoute { vehicle_id: VehicleID },
}

impl fmt::Display for VehicleError {
    /// Formats the error message for `VehicleError`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleError::EmptyRoute { vehicle_id } => {
                write!(f, "Vehicle '{}' has an empty route", vehicle_id)
            }
        }
    }
}

impl std::error::Error for VehicleError {}

/// Where a vehicle currently is: a street, a lane on it and the distance
/// from the street's start in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehiclePosition {
    pub street: StreetID,
    pub lane: usize,
    pub distance: f64,
}

impl VehiclePosition {
    pub fn new(street: StreetID, lane: usize, distance: f64) -> VehiclePosition {
        VehiclePosition {
            street,
            lane,
            distance,
        }
    }
}

/// Represents a vehicle of the road network.
///
/// Holds the static Intelligent-Driver-Model parameters, the cyclic turn
/// sequence with its cursor, and the network-level dynamic state (position,
/// velocity, accumulated travel distance). The per-tick pending state lives
/// on the low-level [`SimCar`](crate::streets::SimCar); the simulator syncs
/// the two representations at materialization and write-back.
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Unique identifier, assigned by the network (arena index).
    id: VehicleID,
    /// Identifier used by the scenario input/output. Also the tie-breaker
    /// of the per-street sort order.
    external_id: i64,
    /// Velocity the driver aims for on a free road (m/s).
    target_velocity: f64,
    /// Maximum acceleration (m/s²).
    max_acceleration: f64,
    /// Comfortable braking deceleration (m/s²).
    target_deceleration: f64,
    /// Minimal bumper-to-bumper distance the driver keeps (m).
    min_distance: f64,
    /// Desired time headway to the car in front (s).
    target_headway: f64,
    /// MOBIL politeness factor in [0, 1].
    politeness: f64,
    /// Cyclic turn sequence.
    route: Vec<TurnDirection>,
    /// Cursor into `route`.
    direction_index: usize,
    position: VehiclePosition,
    starting_position: VehiclePosition,
    /// Current velocity (m/s). Zero at scenario load; kept up to date by
    /// the simulator's write-back so a rebuilt simulator resumes the
    /// identical trajectory.
    velocity: f64,
    /// Total distance traveled so far (m).
    travel_distance: f64,
}

impl Vehicle {
    /// Creates a new `VehicleBuilder` for constructing a `Vehicle`.
    ///
    /// # Arguments
    /// * `external_id` - The scenario-level identifier for the vehicle.
    ///
    /// # Returns
    /// A `VehicleBuilder` instance for configuring and building the vehicle.
    pub fn new(external_id: i64) -> VehicleBuilder {
        VehicleBuilder {
            vehicle: Vehicle {
                id: 0,
                external_id,
                target_velocity: 0.0,
                max_acceleration: 0.0,
                target_deceleration: 0.0,
                min_distance: 0.0,
                target_headway: 0.0,
                politeness: 0.0,
                route: Vec::new(),
                direction_index: 0,
                position: VehiclePosition::new(0, 0, 0.0),
                starting_position: VehiclePosition::new(0, 0, 0.0),
                velocity: 0.0,
                travel_distance: 0.0,
            },
        }
    }

    /// Returns the unique identifier (ID) of the vehicle
    pub fn get_id(&self) -> VehicleID {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: VehicleID) {
        self.id = id;
    }

    /// Identifier used by the scenario input/output
    pub fn get_external_id(&self) -> i64 {
        self.external_id
    }

    pub fn get_target_velocity(&self) -> f64 {
        self.target_velocity
    }

    pub fn get_max_acceleration(&self) -> f64 {
        self.max_acceleration
    }

    pub fn get_target_deceleration(&self) -> f64 {
        self.target_deceleration
    }

    pub fn get_min_distance(&self) -> f64 {
        self.min_distance
    }

    pub fn get_target_headway(&self) -> f64 {
        self.target_headway
    }

    pub fn get_politeness(&self) -> f64 {
        self.politeness
    }

    /// Cyclic turn sequence of the vehicle
    pub fn get_route(&self) -> &[TurnDirection] {
        &self.route
    }

    /// Cursor into the turn sequence
    pub fn get_direction_index(&self) -> usize {
        self.direction_index
    }

    /// Current position of the vehicle
    pub fn get_position(&self) -> &VehiclePosition {
        &self.position
    }

    /// Current velocity in m/s
    pub fn get_velocity(&self) -> f64 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: f64) {
        self.velocity = velocity;
    }

    /// Total distance traveled so far in m
    pub fn get_travel_distance(&self) -> f64 {
        self.travel_distance
    }

    pub fn set_travel_distance(&mut self, travel_distance: f64) {
        self.travel_distance = travel_distance;
    }

    /// Next turn token; advances the cursor cyclically.
    pub fn next_direction(&mut self) -> TurnDirection {
        let next = self.route[self.direction_index];
        self.direction_index = (self.direction_index + 1) % self.route.len();
        next
    }

    /// Moves the vehicle to a new position, validating it against the street.
    ///
    /// An out-of-range lane or distance indicates a formula bug upstream and aborts.
    pub fn set_position(&mut self, street: &Street, lane: usize, distance: f64) {
        assert!(
            lane < street.get_lanes(),
            "invalid position for vehicle {}: lane {} does not exist on street {}",
            self.id,
            lane,
            street.get_id()
        );
        assert!(
            (0.0..=street.get_length()).contains(&distance),
            "invalid position for vehicle {}: distance {} is not on street {} of length {}",
            self.id,
            distance,
            street.get_id(),
            street.get_length()
        );
        self.position = VehiclePosition::new(street.get_id(), lane, distance);
    }

    /// Resets the vehicle to the state right after scenario load.
    pub fn reset_position(&mut self) {
        self.position = self.starting_position;
        self.direction_index = 0;
        self.velocity = 0.0;
        self.travel_distance = 0.0;
    }
}

/// A builder for constructing `Vehicle` instances.
pub struct VehicleBuilder {
    vehicle: Vehicle,
}

impl VehicleBuilder {
    /// Sets the target velocity (m/s).
    pub fn with_target_velocity(mut self, target_velocity: f64) -> Self {
        self.vehicle.target_velocity = target_velocity;
        self
    }

    /// Sets the maximum acceleration (m/s²).
    pub fn with_max_acceleration(mut self, max_acceleration: f64) -> Self {
        self.vehicle.max_acceleration = max_acceleration;
        self
    }

    /// Sets the comfortable deceleration (m/s²).
    pub fn with_target_deceleration(mut self, target_deceleration: f64) -> Self {
        self.vehicle.target_deceleration = target_deceleration;
        self
    }

    /// Sets the minimal bumper-to-bumper distance (m).
    pub fn with_min_distance(mut self, min_distance: f64) -> Self {
        self.vehicle.min_distance = min_distance;
        self
    }

    /// Sets the desired time headway (s).
    pub fn with_target_headway(mut self, target_headway: f64) -> Self {
        self.vehicle.target_headway = target_headway;
        self
    }

    /// Sets the MOBIL politeness factor.
    pub fn with_politeness(mut self, politeness: f64) -> Self {
        self.vehicle.politeness = politeness;
        self
    }

    /// Sets the cyclic turn sequence.
    pub fn with_route(mut self, route: Vec<TurnDirection>) -> Self {
        self.vehicle.route = route;
        self
    }

    /// Sets the starting position (street, lane, distance).
    pub fn with_position(mut self, street: StreetID, lane: usize, distance: f64) -> Self {
        self.vehicle.position = VehiclePosition::new(street, lane, distance);
        self.vehicle.starting_position = self.vehicle.position;
        self
    }

    /// Sets the current velocity (m/s).
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.vehicle.velocity = velocity;
        self
    }

    /// Builds and returns the final `Vehicle` instance.
    pub fn build(self) -> Vehicle {
        self.vehicle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::directions::TurnDirection;

    #[test]
    fn test_route_cursor_wraps() {
        let mut vehicle = Vehicle::new(42)
            .with_route(vec![
                TurnDirection::Left,
                TurnDirection::Straight,
                TurnDirection::Right,
            ])
            .build();

        assert_eq!(vehicle.next_direction(), TurnDirection::Left);
        assert_eq!(vehicle.next_direction(), TurnDirection::Straight);
        assert_eq!(vehicle.next_direction(), TurnDirection::Right);
        // Cursor wraps to the start of the sequence
        assert_eq!(vehicle.next_direction(), TurnDirection::Left);
        assert_eq!(vehicle.get_direction_index(), 1);
    }

    #[test]
    fn test_reset_position() {
        let street = Street::new(0, 2, 13.89, 100.0, 0, 1);
        let mut vehicle = Vehicle::new(1)
            .with_route(vec![TurnDirection::Straight])
            .with_position(0, 0, 10.0)
            .build();

        vehicle.next_direction();
        vehicle.set_position(&street, 1, 55.0);
        vehicle.set_velocity(9.5);

        vehicle.reset_position();
        assert_eq!(vehicle.get_position().lane, 0);
        assert_eq!(vehicle.get_position().distance, 10.0);
        assert_eq!(vehicle.get_direction_index(), 0);
        assert_eq!(vehicle.get_velocity(), 0.0);
    }

    #[test]
    #[should_panic(expected = "lane 5 does not exist")]
    fn test_position_validation() {
        let street = Street::new(0, 2, 13.89, 100.0, 0, 1);
        let mut vehicle = Vehicle::new(1)
            .with_route(vec![TurnDirection::Straight])
            .build();
        vehicle.set_position(&street, 5, 10.0);
    }
}
