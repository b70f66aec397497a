use crate::agents::{Vehicle, VehicleID};
use crate::network::junction::{Junction, JunctionID};
use crate::network::street::{Street, StreetID};

/// `RoadNetwork` owns the flat arenas of junctions, streets and vehicles.
///
/// Every entity is created once at scenario load and lives for the whole
/// run. Identifiers are arena indices, so all cross-references between
/// junctions, streets and vehicles resolve by plain indexing without
/// ownership cycles. The network is read-only during a simulation step
/// except for vehicle route cursors and the junction signal timers.
#[derive(Debug, Default)]
pub struct RoadNetwork {
    junctions: Vec<Junction>,
    streets: Vec<Street>,
    vehicles: Vec<Vehicle>,
}

impl RoadNetwork {
    /// Creates a new, empty `RoadNetwork`.
    pub fn new() -> Self {
        RoadNetwork {
            junctions: Vec::new(),
            streets: Vec::new(),
            vehicles: Vec::new(),
        }
    }

    /// Adds a junction to the arena, assigning its identifier. Returns the assigned ID.
    pub fn add_junction(&mut self, mut junction: Junction) -> JunctionID {
        let id = self.junctions.len();
        junction.set_id(id);
        self.junctions.push(junction);
        id
    }

    /// Adds a street to the arena, assigning its identifier. Returns the assigned ID.
    pub fn add_street(&mut self, mut street: Street) -> StreetID {
        let id = self.streets.len();
        street.set_id(id);
        self.streets.push(street);
        id
    }

    /// Adds a vehicle to the arena, assigning its identifier. Returns the assigned ID.
    pub fn add_vehicle(&mut self, mut vehicle: Vehicle) -> VehicleID {
        let id = self.vehicles.len();
        vehicle.set_id(id);
        self.vehicles.push(vehicle);
        id
    }

    pub fn get_junction(&self, id: JunctionID) -> &Junction {
        &self.junctions[id]
    }

    pub fn get_junction_mut(&mut self, id: JunctionID) -> &mut Junction {
        &mut self.junctions[id]
    }

    pub fn get_street(&self, id: StreetID) -> &Street {
        &self.streets[id]
    }

    pub fn get_vehicle(&self, id: VehicleID) -> &Vehicle {
        &self.vehicles[id]
    }

    pub fn get_vehicle_mut(&mut self, id: VehicleID) -> &mut Vehicle {
        &mut self.vehicles[id]
    }

    /// All junctions in arena order
    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    /// Mutable access to all junctions, used by the signaling routine
    pub fn junctions_mut(&mut self) -> &mut [Junction] {
        &mut self.junctions
    }

    /// All streets in arena order
    pub fn streets(&self) -> &[Street] {
        &self.streets
    }

    /// All vehicles in arena order
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Mutable access to all vehicles, used for write-back and route cursors
    pub fn vehicles_mut(&mut self) -> &mut [Vehicle] {
        &mut self.vehicles
    }

    /// Writes a vehicle's simulated state back into its network record.
    ///
    /// Splits the borrow across the two arenas so the position can be
    /// validated against the street while the vehicle is updated.
    pub fn write_vehicle_state(
        &mut self,
        vehicle_id: VehicleID,
        street_id: StreetID,
        lane: usize,
        distance: f64,
        velocity: f64,
        travel_distance: f64,
    ) {
        let street = &self.streets[street_id];
        let vehicle = &mut self.vehicles[vehicle_id];
        vehicle.set_position(street, lane, distance);
        vehicle.set_velocity(velocity);
        vehicle.set_travel_distance(travel_distance);
    }

    pub fn junctions_num(&self) -> usize {
        self.junctions.len()
    }

    pub fn streets_num(&self) -> usize {
        self.streets.len()
    }

    pub fn vehicles_num(&self) -> usize {
        self.vehicles.len()
    }
}
