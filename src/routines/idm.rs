use crate::network::street::StreetID;
use crate::routines::acceleration::compute_acceleration;
use crate::streets::{CarContainer, SimCar, SimStreet};
use crate::verbose::{EVENT_IDM, VerboseLevel};
use rayon::prelude::*;

/// Streets with more cars than this are processed with inner parallelism
/// (parallel across the cars of the one street); streets at or below it
/// are processed street-parallel only.
pub const PARALLEL_THRESHOLD: usize = 100;

/// Per-street aggregates of one tick, reduced by the step driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct StreetTickStats {
    /// Sum of the distances all cars on the street covered this tick.
    pub travel_distance: f64,
    /// Cars whose committed motion crossed the stop line this tick.
    pub stop_line_crossings: u64,
}

/// A viable lane change: the acceleration gained and the MOBIL indicator
/// that justified it.
#[derive(Debug, Clone, Copy)]
struct LaneChange {
    acceleration: f64,
    indicator: f64,
}

/// Outcome of pass 2 for one car, applied at the write-back.
#[derive(Debug, Clone, Copy)]
struct Decision {
    lane: usize,
    acceleration: f64,
}

/// Runs the car-following and lane-change update on every street.
///
/// Streets are partitioned by car count at [`PARALLEL_THRESHOLD`]: small
/// streets run in parallel with each other, large streets run one after
/// another with the per-car work parallelized instead. Within one street
/// the update is two passes, base accelerations first and lane decisions
/// second, with a barrier in between so pass 2 sees every neighbor's
/// pass-1 result. Pending state only; nothing is committed here.
///
/// Returns the per-street tick aggregates keyed by street ID.
pub fn perform<S: CarContainer>(
    streets: &mut [SimStreet<S>],
    level: VerboseLevel,
) -> Vec<(StreetID, StreetTickStats)> {
    let (street_wise, car_wise): (Vec<&mut SimStreet<S>>, Vec<&mut SimStreet<S>>) = streets
        .iter_mut()
        .filter(|s| s.car_count() > 0)
        .partition(|s| s.car_count() <= PARALLEL_THRESHOLD);

    level.log_with_fields(
        EVENT_IDM,
        "Update cars on non-empty streets",
        &[
            ("street_wise", &street_wise.len()),
            ("car_wise", &car_wise.len()),
        ],
    );

    let mut stats: Vec<(StreetID, StreetTickStats)> = street_wise
        .into_par_iter()
        .map(|street| (street.get_id(), process_street(street)))
        .collect();

    for street in car_wise {
        stats.push((street.get_id(), process_street_car_wise(street)));
    }
    stats
}

/// Both passes over one street, sequential across its cars.
fn process_street<S: CarContainer>(street: &mut SimStreet<S>) -> StreetTickStats {
    let accelerations: Vec<f64> = street
        .iter()
        .map(|car| base_acceleration(street, car))
        .collect();
    write_base_accelerations(street, &accelerations);

    let decisions: Vec<Decision> = street
        .iter()
        .map(|car| decide_lane(street, car))
        .collect();
    commit_decisions(street, &decisions)
}

/// Both passes over one street, parallel across its cars. Used above the
/// threshold, where a single street dominates the tick.
fn process_street_car_wise<S: CarContainer>(street: &mut SimStreet<S>) -> StreetTickStats {
    let accelerations: Vec<f64> = {
        let view: &SimStreet<S> = street;
        let cars: Vec<&SimCar> = view.iter().collect();
        cars.into_par_iter()
            .map(|car| base_acceleration(view, car))
            .collect()
    };
    write_base_accelerations(street, &accelerations);

    let decisions: Vec<Decision> = {
        let view: &SimStreet<S> = street;
        let cars: Vec<&SimCar> = view.iter().collect();
        cars.into_par_iter()
            .map(|car| decide_lane(view, car))
            .collect()
    };
    commit_decisions(street, &decisions)
}

/// Pass 1 for one car: IDM acceleration against the car in front on the
/// own lane, signal overlay included.
fn base_acceleration<S: CarContainer>(street: &SimStreet<S>, car: &SimCar) -> f64 {
    compute_acceleration(car, street.next_car_in_front(car, 0), street.speed_limit())
}

fn write_base_accelerations<S: CarContainer>(street: &mut SimStreet<S>, accelerations: &[f64]) {
    let mut idx = 0;
    street.for_each_ordered_mut(|car| {
        car.set_next_base_acceleration(accelerations[idx]);
        idx += 1;
    });
}

/// Pass 2 for one car: evaluate the adjacent lanes and pick the outcome.
///
/// A valid left and a valid right candidate are ranked by their MOBIL
/// indicators; on a tie the right lane wins.
fn decide_lane<S: CarContainer>(street: &SimStreet<S>, car: &SimCar) -> Decision {
    let left = if car.get_lane() > 0 {
        compute_lane_change(street, car, -1)
    } else {
        None
    };
    let right = if car.get_lane() + 1 < street.lane_count() {
        compute_lane_change(street, car, 1)
    } else {
        None
    };

    match (left, right) {
        (Some(l), Some(r)) => {
            if r.indicator >= l.indicator {
                Decision {
                    lane: car.get_lane() + 1,
                    acceleration: r.acceleration,
                }
            } else {
                Decision {
                    lane: car.get_lane() - 1,
                    acceleration: l.acceleration,
                }
            }
        }
        (Some(l), None) => Decision {
            lane: car.get_lane() - 1,
            acceleration: l.acceleration,
        },
        (None, Some(r)) => Decision {
            lane: car.get_lane() + 1,
            acceleration: r.acceleration,
        },
        (None, None) => Decision {
            lane: car.get_lane(),
            acceleration: car.get_next_base_acceleration(),
        },
    }
}

/// Evaluates a single lane-change candidate.
///
/// The candidate is viable when there is room towards the real neighbors
/// on the new lane, the gained acceleration beats the base acceleration,
/// and the MOBIL indicator (own gain plus the politeness-weighted effect
/// on both followers) exceeds 1.0.
fn compute_lane_change<S: CarContainer>(
    street: &SimStreet<S>,
    car: &SimCar,
    lane_offset: i8,
) -> Option<LaneChange> {
    let new_behind = street.next_car_behind(car, lane_offset);
    let new_front_real = street.real_next_car_in_front(car, lane_offset);
    if !has_space(car, new_behind, new_front_real) {
        return None;
    }

    let acceleration = compute_acceleration(
        car,
        street.next_car_in_front(car, lane_offset),
        street.speed_limit(),
    );
    if acceleration <= car.get_next_base_acceleration() {
        return None;
    }

    // Effect of the change on the follower left behind and the follower
    // gained; an absent follower contributes nothing.
    let mut follower_deltas = 0.0;
    if let Some(old_behind) = street.next_car_behind(car, 0) {
        let freed = compute_acceleration(
            old_behind,
            street.next_car_in_front(car, 0),
            street.speed_limit(),
        );
        follower_deltas += freed - old_behind.get_next_base_acceleration();
    }
    if let Some(new_behind) = new_behind {
        let blocked = compute_acceleration(new_behind, Some(car), street.speed_limit());
        follower_deltas += blocked - new_behind.get_next_base_acceleration();
    }

    let indicator = acceleration - car.get_next_base_acceleration()
        + car.get_politeness() * follower_deltas;
    if indicator <= 1.0 {
        return None;
    }

    Some(LaneChange {
        acceleration,
        indicator,
    })
}

/// Room check on the prospective lane: both the follower and the leader
/// there must keep at least the car's minimal distance.
fn has_space(car: &SimCar, behind: Option<&SimCar>, in_front: Option<&SimCar>) -> bool {
    if let Some(behind) = behind {
        if car.get_distance() - car.get_length() < behind.get_distance() + car.get_min_distance() {
            return false;
        }
    }
    if let Some(in_front) = in_front {
        if in_front.get_distance() - in_front.get_length()
            < car.get_distance() + car.get_min_distance()
        {
            return false;
        }
    }
    true
}

/// Writes the pending dynamics for every car and gathers the tick stats.
fn commit_decisions<S: CarContainer>(
    street: &mut SimStreet<S>,
    decisions: &[Decision],
) -> StreetTickStats {
    let stop_line = street.stop_line_position();
    let mut stats = StreetTickStats::default();
    let mut idx = 0;
    street.for_each_ordered_mut(|car| {
        let decision = decisions[idx];
        idx += 1;
        let next_velocity = (car.get_velocity() + decision.acceleration).max(0.0);
        let next_distance = car.get_distance() + next_velocity;
        if car.get_distance() < stop_line && next_distance >= stop_line {
            stats.stop_line_crossings += 1;
        }
        car.set_next(decision.lane, next_distance, next_velocity);
        car.add_travel_distance(next_velocity);
        stats.travel_distance += next_velocity;
    });
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streets::{Signal, SortedVecContainer, VEHICLE_LENGTH};
    use crate::verbose::VerboseLevel;

    fn car(external_id: i64, lane: usize, distance: f64, velocity: f64) -> SimCar {
        let mut c = SimCar::new(
            external_id as usize,
            external_id,
            13.89,
            1.0,
            1.0,
            2.0,
            1.5,
            0.5,
            VEHICLE_LENGTH,
        );
        c.set_position(lane, distance, velocity);
        c
    }

    fn street_with(
        lanes: usize,
        cars: Vec<SimCar>,
    ) -> SimStreet<SortedVecContainer> {
        let mut street = SimStreet::new(0, lanes, 1000.0, 13.89);
        street.set_signal(Signal::Green);
        for c in cars {
            street.insert_car(c);
        }
        street.incorporate_inserted_cars();
        street
    }

    fn run_tick(street: &mut SimStreet<SortedVecContainer>) -> StreetTickStats {
        let stats = process_street(street);
        street.update_and_restore_consistency();
        stats
    }

    #[test]
    fn test_lone_car_accelerates_towards_target() {
        let mut street = street_with(1, vec![car(1, 0, 0.0, 0.0)]);
        let mut previous_velocity = 0.0;
        for _ in 0..30 {
            run_tick(&mut street);
            let v = street.iter().next().unwrap().get_velocity();
            assert!(v >= previous_velocity);
            assert!(v <= 13.89 + 1e-9);
            previous_velocity = v;
        }
        assert!(previous_velocity > 13.0);
    }

    #[test]
    fn test_follower_keeps_gap() {
        let mut street = street_with(
            1,
            vec![car(1, 0, 100.0, 10.0), car(2, 0, 50.0, 10.0)],
        );
        for _ in 0..60 {
            run_tick(&mut street);
        }
        let distances: Vec<f64> = street.iter().map(|c| c.get_distance()).collect();
        let gap = distances[1] - distances[0];
        assert!(gap > 5.0, "follower tailgates: gap {}", gap);
    }

    #[test]
    fn test_blocked_car_changes_lane() {
        // A standing leader on lane 0 and a free lane 1
        let mut street = street_with(
            2,
            vec![car(1, 0, 60.0, 0.0), car(2, 0, 20.0, 10.0)],
        );
        let mut changed_at = None;
        for tick in 0..5 {
            run_tick(&mut street);
            let fast = street.iter().find(|c| c.get_external_id() == 2).unwrap();
            if fast.get_lane() == 1 {
                changed_at = Some(tick);
                break;
            }
        }
        assert!(changed_at.is_some(), "car never changed onto the free lane");
    }

    #[test]
    fn test_no_lane_change_without_space() {
        // Lane 1 is fully plugged right next to the probe car
        let mut street = street_with(
            2,
            vec![
                car(1, 0, 60.0, 0.0),
                car(2, 0, 30.0, 5.0),
                car(3, 1, 31.0, 5.0),
                car(4, 1, 28.0, 5.0),
            ],
        );
        run_tick(&mut street);
        let probe = street.iter().find(|c| c.get_external_id() == 2).unwrap();
        assert_eq!(probe.get_lane(), 0);
    }

    #[test]
    fn test_stop_line_crossing_counted() {
        // 1000 m street, stop line at 982.5; a car at 975 moving 10 m/s crosses it
        let mut street = street_with(1, vec![car(1, 0, 975.0, 10.0)]);
        let stats = run_tick(&mut street);
        assert_eq!(stats.stop_line_crossings, 1);
        assert!(stats.travel_distance > 0.0);
    }

    #[test]
    fn test_perform_skips_empty_streets() {
        let mut streets: Vec<SimStreet<SortedVecContainer>> = vec![
            SimStreet::new(0, 1, 100.0, 13.89),
            SimStreet::new(1, 1, 100.0, 13.89),
        ];
        streets[1].insert_car(car(1, 0, 10.0, 0.0));
        streets[1].incorporate_inserted_cars();
        let stats = perform(&mut streets, VerboseLevel::None);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].0, 1);
    }
}
