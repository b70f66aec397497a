use crate::network::road_network::RoadNetwork;
use crate::verbose::{EVENT_SCENARIO_EXPORT, VerboseLevel, verbose_log_with_fields};
use serde::{Deserialize, Serialize};
use std::io;

/// One vehicle of the result: the external junction identifiers of the
/// street it currently is on, its lane and its position in meters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarResult {
    pub id: i64,
    pub from: i64,
    pub to: i64,
    pub lane: usize,
    pub position: f64,
}

/// Final state of all vehicles, in scenario order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationResult {
    pub cars: Vec<CarResult>,
}

impl SimulationResult {
    /// Collects the current vehicle positions from the network.
    pub fn from_network(network: &RoadNetwork) -> SimulationResult {
        let cars = network
            .vehicles()
            .iter()
            .map(|vehicle| {
                let position = vehicle.get_position();
                let street = network.get_street(position.street);
                CarResult {
                    id: vehicle.get_external_id(),
                    from: network
                        .get_junction(street.get_source_junction())
                        .get_external_id(),
                    to: network
                        .get_junction(street.get_target_junction())
                        .get_external_id(),
                    lane: position.lane,
                    position: position.distance,
                }
            })
            .collect();
        let result = SimulationResult { cars };
        verbose_log_with_fields(
            VerboseLevel::Main,
            EVENT_SCENARIO_EXPORT,
            "Vehicle positions collected for export",
            &[("cars_num", &result.cars.len())],
        );
        result
    }

    /// Serializes the result as a single JSON line.
    pub fn write<W: io::Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer(writer, self)
    }
}
