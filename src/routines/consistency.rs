use crate::network::directions::TurnDirection;
use crate::network::junction::JunctionError;
use crate::network::road_network::RoadNetwork;
use crate::network::street::StreetID;
use crate::streets::{CarContainer, SimCar, SimStreet};
use crate::verbose::{EVENT_CONSISTENCY, EVENT_MIGRATE, VerboseLevel};
use rayon::prelude::*;

/// Commits the tick on every street and moves departed cars into their
/// successor streets.
///
/// Three phases with barriers in between:
///
/// 1. every street commits pending state and collects its beyonds, in
///    parallel; no street receives cars while any street is still
///    committing, so a migrating car never takes part in its
///    destination's beyond detection within the same tick;
/// 2. sequentially, every beyond car is routed: the direction its street
///    enters the target junction from, plus the car's next turn token,
///    gives the desired outgoing direction, rotated clockwise to the
///    first connected slot; the car carries its velocity, keeps
///    `min(lane, destination lanes − 1)` and continues at
///    `distance − street length`, capped at the destination length;
/// 3. every street incorporates its newly received cars, in parallel.
///
/// The `streets` slice must be indexed by street ID (the simulator
/// materializes it in arena order).
pub fn perform<S: CarContainer>(
    network: &mut RoadNetwork,
    streets: &mut [SimStreet<S>],
    level: VerboseLevel,
) -> Result<(), JunctionError> {
    streets
        .par_iter_mut()
        .for_each(|street| street.update_and_restore_consistency());

    let mut migrations: Vec<(StreetID, SimCar)> = Vec::new();
    for street_idx in 0..streets.len() {
        let street = &streets[street_idx];
        if street.beyonds().is_empty() {
            continue;
        }
        let street_id = street.get_id();
        let street_length = street.length();
        let target_junction_id = network.get_street(street_id).get_target_junction();
        let origin_direction = network
            .get_junction(target_junction_id)
            .incoming_direction_of(street_id)?;

        // Advancing the route cursors needs the network mutably, so the
        // turn tokens are drawn before the junction is consulted.
        let turns: Vec<TurnDirection> = street
            .beyonds()
            .iter()
            .map(|car| network.get_vehicle_mut(car.get_id()).next_direction())
            .collect();

        let junction = network.get_junction(target_junction_id);
        for (car, turn) in street.beyonds().iter().zip(turns) {
            let desired = origin_direction.take_turn(turn);
            let (_, destination_id) = junction.first_connected_outgoing(desired)?;
            let destination = network.get_street(destination_id);

            let lane = car.get_lane().min(destination.get_lanes() - 1);
            let distance = (car.get_distance() - street_length).min(destination.get_length());
            let mut migrated = car.clone();
            migrated.set_position(lane, distance, car.get_velocity());

            level.log_with_fields(
                EVENT_MIGRATE,
                "Move car to its next street",
                &[
                    ("car", &car.get_external_id()),
                    ("from_street", &street_id),
                    ("to_street", &destination_id),
                ],
            );
            migrations.push((destination_id, migrated));
        }
    }

    level.log_with_fields(
        EVENT_CONSISTENCY,
        "Commit streets and migrate departed cars",
        &[("migrated", &migrations.len())],
    );

    for street in streets.iter_mut() {
        street.remove_beyonds();
    }
    for (destination_id, car) in migrations {
        streets[destination_id].insert_car(car);
    }
    streets
        .par_iter_mut()
        .for_each(|street| street.incorporate_inserted_cars());
    Ok(())
}
