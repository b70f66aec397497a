use crate::agents::{Vehicle, VehicleID};
use std::cmp::Ordering;

/// Length of a regular vehicle in meters. The phantom stop-line car uses
/// the same length so the car-following law needs no special case.
pub const VEHICLE_LENGTH: f64 = 5.0;

/// Represents a vehicle inside a per-street container.
///
/// `SimCar` is a plain value type: it migrates between street containers
/// by value when a vehicle changes streets. Dynamic state is split into a
/// *current* part, read-only during a tick, and a *pending* part written
/// by the update routine; [`SimCar::apply_updates`] is the only transition
/// between the two. This split lets the update routine see every other
/// car's state from the previous tick regardless of evaluation order.
#[derive(Debug, Clone)]
pub struct SimCar {
    id: VehicleID,
    /// Scenario-level identifier; tie-breaker of the sort order.
    external_id: i64,
    target_velocity: f64,
    max_acceleration: f64,
    target_deceleration: f64,
    min_distance: f64,
    target_headway: f64,
    politeness: f64,
    length: f64,
    /// Precomputed `2·√(max_acceleration · target_deceleration)`, the
    /// denominator of the dynamic headway term.
    acceleration_divisor: f64,

    current_lane: usize,
    current_distance: f64,
    current_velocity: f64,

    next_base_acceleration: f64,
    next_lane: usize,
    next_distance: f64,
    next_velocity: f64,

    /// Total distance traveled so far (m); advanced by the committed
    /// velocity each tick and carried across street migrations.
    travel_distance: f64,
}

impl SimCar {
    /// Creates a new car from its static parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: VehicleID,
        external_id: i64,
        target_velocity: f64,
        max_acceleration: f64,
        target_deceleration: f64,
        min_distance: f64,
        target_headway: f64,
        politeness: f64,
        length: f64,
    ) -> SimCar {
        SimCar {
            id,
            external_id,
            target_velocity,
            max_acceleration,
            target_deceleration,
            min_distance,
            target_headway,
            politeness,
            length,
            acceleration_divisor: 2.0 * (max_acceleration * target_deceleration).sqrt(),
            current_lane: 0,
            current_distance: 0.0,
            current_velocity: 0.0,
            next_base_acceleration: 0.0,
            next_lane: 0,
            next_distance: 0.0,
            next_velocity: 0.0,
            travel_distance: 0.0,
        }
    }

    /// Creates a car from the network-level vehicle record.
    pub fn from_vehicle(vehicle: &Vehicle) -> SimCar {
        let mut car = SimCar::new(
            vehicle.get_id(),
            vehicle.get_external_id(),
            vehicle.get_target_velocity(),
            vehicle.get_max_acceleration(),
            vehicle.get_target_deceleration(),
            vehicle.get_min_distance(),
            vehicle.get_target_headway(),
            vehicle.get_politeness(),
            VEHICLE_LENGTH,
        );
        car.set_position(
            vehicle.get_position().lane,
            vehicle.get_position().distance,
            vehicle.get_velocity(),
        );
        car.travel_distance = vehicle.get_travel_distance();
        car
    }

    /// Places the car, seeding both the current and the pending state.
    ///
    /// Seeding the pending state makes a commit right after insertion a
    /// no-op, which the bucket container relies on.
    pub fn set_position(&mut self, lane: usize, distance: f64, velocity: f64) {
        self.current_lane = lane;
        self.current_distance = distance;
        self.current_velocity = velocity;
        self.next_lane = lane;
        self.next_distance = distance;
        self.next_velocity = velocity;
        self.next_base_acceleration = 0.0;
    }

    pub fn get_id(&self) -> VehicleID {
        self.id
    }

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

    pub fn get_length(&self) -> f64 {
        self.length
    }

    /// `2·√(max_acceleration · target_deceleration)`
    pub fn get_acceleration_divisor(&self) -> f64 {
        self.acceleration_divisor
    }

    /// Lane the car is on (current state)
    pub fn get_lane(&self) -> usize {
        self.current_lane
    }

    /// Distance from the street start in m (current state)
    pub fn get_distance(&self) -> f64 {
        self.current_distance
    }

    /// Velocity in m/s (current state)
    pub fn get_velocity(&self) -> f64 {
        self.current_velocity
    }

    pub fn get_travel_distance(&self) -> f64 {
        self.travel_distance
    }

    /// Stores the base acceleration computed by the first update pass so
    /// the lane-change pass can read it for neighbor cars.
    pub fn set_next_base_acceleration(&mut self, acceleration: f64) {
        self.next_base_acceleration = acceleration;
    }

    pub fn get_next_base_acceleration(&self) -> f64 {
        self.next_base_acceleration
    }

    /// Writes the pending state for the next tick.
    pub fn set_next(&mut self, lane: usize, distance: f64, velocity: f64) {
        self.next_lane = lane;
        self.next_distance = distance;
        self.next_velocity = velocity;
    }

    /// Advances the odometer; called with the committed per-tick velocity.
    pub fn add_travel_distance(&mut self, meters: f64) {
        self.travel_distance += meters;
    }

    /// Commits the pending state: pending → current.
    pub fn apply_updates(&mut self) {
        self.current_lane = self.next_lane;
        self.current_distance = self.next_distance;
        self.current_velocity = self.next_velocity;
    }

    /// Ordering of the per-street sort: distance ascending, ties broken by
    /// external id descending. Distances are finite by construction, so
    /// the total order over f64 matches the numeric order.
    pub fn cmp_position(&self, other: &SimCar) -> Ordering {
        self.current_distance
            .total_cmp(&other.current_distance)
            .then(other.external_id.cmp(&self.external_id))
    }
}
