use idm_traffic_sim_core::estimation::Estimator;
use idm_traffic_sim_core::scenario::input::ScenarioInput;
use idm_traffic_sim_core::simulation::simulator::Simulator;

fn parse(value: serde_json::Value) -> ScenarioInput {
    serde_json::from_value(value).unwrap()
}

/// Two cars heading towards the same junction from opposite sides.
fn corridor_scenario() -> ScenarioInput {
    parse(serde_json::json!({
        "time_steps": 40,
        "junctions": [
            {"id": 1, "x": 0, "y": 0, "signals": [{"dir": 1, "time": 10}]},
            {"id": 2, "x": 2, "y": 0, "signals": [
                {"dir": 1, "time": 10},
                {"dir": 3, "time": 10}
            ]},
            {"id": 3, "x": 4, "y": 0, "signals": [{"dir": 3, "time": 10}]}
        ],
        "roads": [
            {"junction1": 1, "junction2": 2, "lanes": 1, "limit": 36.0},
            {"junction1": 2, "junction2": 3, "lanes": 1, "limit": 36.0}
        ],
        "cars": [
            {
                "id": 1,
                "target_velocity": 36.0,
                "max_acceleration": 1.0,
                "target_deceleration": 1.0,
                "min_distance": 2.0,
                "target_headway": 1.5,
                "politeness": 0.5,
                "start": {"from": 1, "to": 2, "lane": 0, "distance": 0.0},
                "route": [2]
            },
            {
                "id": 2,
                "target_velocity": 18.0,
                "max_acceleration": 1.0,
                "target_deceleration": 1.0,
                "min_distance": 2.0,
                "target_headway": 1.5,
                "politeness": 0.5,
                "start": {"from": 3, "to": 2, "lane": 0, "distance": 0.0},
                "route": [2]
            }
        ]
    }))
}

/// The projection ignores signals and interactions, so each car covers
/// exactly `min(target, limit) · ticks` meters.
#[test]
fn free_flow_distances_and_priorities() {
    let (network, _) = corridor_scenario().build().unwrap();
    let mut estimator = Estimator::new(&network);
    estimator.perform_steps(40).unwrap();

    // 36 km/h = 10 m/s, 18 km/h = 5 m/s
    assert_eq!(estimator.get_travel_distance(0), 400.0);
    assert_eq!(estimator.get_travel_distance(1), 200.0);
    assert_eq!(estimator.get_total_optimal_travel_distance(), 600.0);
    // The faster car outranks the slower one
    assert!(estimator.get_car_priority(0) > estimator.get_car_priority(1));
}

/// The projection's throughput counters see every stop-line pass the
/// route makes, while the simulator's counters stall at a red light.
#[test]
fn projection_counts_what_signals_would_block() {
    let (network, _) = corridor_scenario().build().unwrap();

    let mut estimator = Estimator::new(&network);
    estimator.perform_steps(40).unwrap();
    let vehicle = network.get_vehicle(0);
    let start_street = vehicle.get_position().street;
    // The fast car crosses its first stop line (182.5 m of 200 m) once
    assert_eq!(estimator.get_traffic_light_throughput(start_street), 1);
    let crossing = estimator.get_crossings(start_street)[0];
    assert_eq!(crossing.vehicle, 0);
    assert_eq!(crossing.tick, 18);

    // The junction ahead of car 1 starts its program on the other arm,
    // so the accurate simulation holds the car at the stop line longer
    // than the projection does.
    let mut simulator: Simulator = Simulator::new(network);
    simulator.steps(18).unwrap();
    assert_eq!(simulator.get_crossing_count(start_street), 0);
    simulator.steps(22).unwrap();
    assert_eq!(simulator.get_crossing_count(start_street), 1);
}
