use crate::estimation::crossing::TrafficLightCrossing;
use crate::network::junction::JunctionError;
use crate::network::road_network::RoadNetwork;
use crate::network::street::StreetID;
use crate::streets::TRAFFIC_LIGHT_OFFSET;
use crate::verbose::{EVENT_ESTIMATE, VerboseLevel};

/// Free-flow route projection used to seed signal programs and rank
/// vehicles for the outer optimization.
///
/// Each vehicle is projected in isolation from its declared position: per
/// tick it moves at the smaller of its target velocity and the current
/// street's speed limit, ignoring signals and every other vehicle. Street
/// transitions follow the same turn-plus-rotate-to-connected rule the
/// consistency routine applies, with a local route cursor. The resulting
/// per-vehicle travel distance is an upper bound on what an accurate
/// simulation can reach and doubles as the vehicle's priority.
///
/// All buffers are local; the network is only read.
pub struct Estimator<'a> {
    network: &'a RoadNetwork,
    /// The travel distance per vehicle under free flow; also its priority.
    optimal_travel_distance: Vec<f64>,
    /// How often each vehicle passed each street's stop line.
    crossing_counts: Vec<Vec<u32>>,
    /// Who passed which stop line when.
    crossings_per_street: Vec<Vec<TrafficLightCrossing>>,
    verbose: VerboseLevel,
}

impl<'a> Estimator<'a> {
    /// Creates an estimator with zeroed buffers for the given network.
    pub fn new(network: &'a RoadNetwork) -> Estimator<'a> {
        let vehicles_num = network.vehicles_num();
        let streets_num = network.streets_num();
        Estimator {
            network,
            optimal_travel_distance: vec![0.0; vehicles_num],
            crossing_counts: vec![vec![0; streets_num]; vehicles_num],
            crossings_per_street: vec![Vec::new(); streets_num],
            verbose: VerboseLevel::None,
        }
    }

    /// Sets verbose level for the estimator
    pub fn set_verbose_level(&mut self, verbose: VerboseLevel) {
        self.verbose = verbose;
    }

    /// Projects every vehicle over `step_count` ticks.
    pub fn perform_steps(&mut self, step_count: u32) -> Result<(), JunctionError> {
        self.verbose.log_with_fields(
            EVENT_ESTIMATE,
            "Project vehicles under free flow",
            &[
                ("steps", &step_count),
                ("vehicles_num", &self.network.vehicles_num()),
            ],
        );
        let network = self.network;
        for vehicle in network.vehicles() {
            let vehicle_id = vehicle.get_id();
            let route = vehicle.get_route();
            let mut cursor = vehicle.get_direction_index();
            let mut street = network.get_street(vehicle.get_position().street);
            let mut distance = vehicle.get_position().distance;
            let mut travel_distance = 0.0;

            for tick in 0..step_count {
                let velocity = vehicle.get_target_velocity().min(street.get_speed_limit());
                let stop_line = street.get_length() - TRAFFIC_LIGHT_OFFSET;
                let was_before_stop_line = distance < stop_line;

                travel_distance += velocity;
                distance += velocity;

                if was_before_stop_line && distance >= stop_line {
                    self.crossing_counts[vehicle_id][street.get_id()] += 1;
                    self.crossings_per_street[street.get_id()].push(TrafficLightCrossing::new(
                        vehicle_id,
                        street.get_id(),
                        tick,
                    ));
                }

                if distance >= street.get_length() {
                    distance -= street.get_length();

                    let junction = network.get_junction(street.get_target_junction());
                    let origin = junction.incoming_direction_of(street.get_id())?;
                    let turn = route[cursor];
                    cursor = (cursor + 1) % route.len();
                    let desired = origin.take_turn(turn);
                    let (_, next_street) = junction.first_connected_outgoing(desired)?;
                    street = network.get_street(next_street);
                }
            }
            self.optimal_travel_distance[vehicle_id] = travel_distance;
        }
        Ok(())
    }

    /// Free-flow travel distance of one vehicle
    pub fn get_travel_distance(&self, vehicle: usize) -> f64 {
        self.optimal_travel_distance[vehicle]
    }

    /// The priority of a vehicle is equivalent to its free-flow travel distance.
    pub fn get_car_priority(&self, vehicle: usize) -> f64 {
        self.optimal_travel_distance[vehicle]
    }

    /// Priorities of all vehicles, indexed by vehicle ID
    pub fn get_car_priorities(&self) -> &[f64] {
        &self.optimal_travel_distance
    }

    /// Sum of the free-flow travel distances of all vehicles
    pub fn get_total_optimal_travel_distance(&self) -> f64 {
        self.optimal_travel_distance.iter().sum()
    }

    /// Number of stop-line passes at the given street under free flow
    pub fn get_traffic_light_throughput(&self, street: StreetID) -> usize {
        self.crossings_per_street[street].len()
    }

    /// Stop-line passes at the given street weighted by each passing
    /// vehicle's priority.
    pub fn get_prioritized_traffic_light_throughput(&self, street: StreetID) -> f64 {
        let mut prioritized = 0.0;
        for (vehicle, counts) in self.crossing_counts.iter().enumerate() {
            prioritized += self.optimal_travel_distance[vehicle] * counts[street] as f64;
        }
        prioritized
    }

    /// Who passed the given street's stop line when
    pub fn get_crossings(&self, street: StreetID) -> &[TrafficLightCrossing] {
        &self.crossings_per_street[street]
    }

    /// Resets all projection results.
    pub fn reset(&mut self) {
        self.optimal_travel_distance.fill(0.0);
        for counts in self.crossing_counts.iter_mut() {
            counts.fill(0);
        }
        for crossings in self.crossings_per_street.iter_mut() {
            crossings.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Vehicle;
    use crate::network::directions::{CardinalDirection, TurnDirection};
    use crate::network::junction::{Junction, SignalPhase};
    use crate::network::street::Street;

    /// A 100 m ring of two junctions: east on street 0, back west on street 1.
    fn ring_network(target_velocity: f64) -> RoadNetwork {
        let mut network = RoadNetwork::new();
        let west = network.add_junction(Junction::new(
            0,
            1,
            0,
            0,
            vec![SignalPhase::new(CardinalDirection::East, 5)],
        ));
        let east = network.add_junction(Junction::new(
            0,
            2,
            1,
            0,
            vec![SignalPhase::new(CardinalDirection::West, 5)],
        ));
        let eastbound = network.add_street(Street::new(0, 1, 10.0, 100.0, west, east));
        let westbound = network.add_street(Street::new(0, 1, 10.0, 100.0, east, west));
        network
            .get_junction_mut(east)
            .add_incoming_street(eastbound, CardinalDirection::West);
        network
            .get_junction_mut(west)
            .add_outgoing_street(eastbound, CardinalDirection::East);
        network
            .get_junction_mut(west)
            .add_incoming_street(westbound, CardinalDirection::East);
        network
            .get_junction_mut(east)
            .add_outgoing_street(westbound, CardinalDirection::West);

        network.add_vehicle(
            Vehicle::new(1)
                .with_target_velocity(target_velocity)
                .with_route(vec![TurnDirection::UTurn])
                .with_position(0, 0, 0.0)
                .build(),
        );
        network
    }

    #[test]
    fn test_travel_distance_capped_by_speed_limit() {
        // Driver wants 20 m/s, streets allow 10 m/s
        let network = ring_network(20.0);
        let mut estimator = Estimator::new(&network);
        estimator.perform_steps(10).unwrap();
        assert_eq!(estimator.get_travel_distance(0), 100.0);
        assert_eq!(estimator.get_total_optimal_travel_distance(), 100.0);
        assert_eq!(estimator.get_car_priority(0), 100.0);
    }

    #[test]
    fn test_crossings_counted_per_street() {
        // 10 m/s over 100 m streets: the stop line at 82.5 is crossed on
        // tick 8, the street boundary on tick 9, and again on the
        // opposite street one lap later.
        let network = ring_network(10.0);
        let mut estimator = Estimator::new(&network);
        estimator.perform_steps(20).unwrap();

        assert_eq!(estimator.get_traffic_light_throughput(0), 1);
        assert_eq!(estimator.get_traffic_light_throughput(1), 1);
        let first = estimator.get_crossings(0)[0];
        assert_eq!(first.vehicle, 0);
        assert_eq!(first.tick, 8);
        // Priority-weighted throughput: one crossing times 200 m priority
        assert_eq!(
            estimator.get_prioritized_traffic_light_throughput(0),
            200.0
        );
    }

    #[test]
    fn test_reset_clears_results() {
        let network = ring_network(10.0);
        let mut estimator = Estimator::new(&network);
        estimator.perform_steps(20).unwrap();
        estimator.reset();
        assert_eq!(estimator.get_travel_distance(0), 0.0);
        assert_eq!(estimator.get_traffic_light_throughput(0), 0);
        assert!(estimator.get_crossings(1).is_empty());
    }
}
