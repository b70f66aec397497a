use crate::network::directions::CardinalDirection;
use crate::network::junction::JunctionID;
use crate::network::road_network::RoadNetwork;
use crate::streets::{CarContainer, Signal, SimStreet};
use crate::verbose::{EVENT_SIGNAL_PHASE, VerboseLevel};
use rayon::prelude::*;

/// Advances every junction's signal program by one tick and applies the
/// resulting signal flips to the incoming streets.
///
/// The timers tick in parallel, each junction only touching its own
/// counter, and the collected phase changes are applied afterwards: the
/// previously green direction's incoming street goes red, the newly green
/// one goes green. Directions without a connected street are skipped, so
/// a junction never has more than one green incoming street.
pub fn perform<S: CarContainer>(
    network: &mut RoadNetwork,
    streets: &mut [SimStreet<S>],
    level: VerboseLevel,
) {
    let changes: Vec<(JunctionID, CardinalDirection, CardinalDirection)> = network
        .junctions_mut()
        .par_iter_mut()
        .filter_map(|junction| {
            if junction.next_step() {
                Some((
                    junction.get_id(),
                    junction.get_previous_signal().get_direction(),
                    junction.get_current_signal().get_direction(),
                ))
            } else {
                None
            }
        })
        .collect();

    for (junction_id, previous, current) in changes {
        let junction = network.get_junction(junction_id);
        level.log_with_fields(
            EVENT_SIGNAL_PHASE,
            "Switch junction to its next signal phase",
            &[
                ("junction", &junction.get_external_id()),
                ("turned_red", &previous),
                ("turned_green", &current),
            ],
        );
        let turned_red = junction.get_incoming_street(previous);
        if turned_red.is_connected() {
            streets[turned_red.get_street()].set_signal(Signal::Red);
        }
        let turned_green = junction.get_incoming_street(current);
        if turned_green.is_connected() {
            streets[turned_green.get_street()].set_signal(Signal::Green);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::junction::{Junction, SignalPhase};
    use crate::network::street::Street;
    use crate::streets::SortedVecContainer;

    /// A junction with two incoming streets, north and east, on a
    /// two-phase program of five ticks each.
    fn two_arm_junction() -> (RoadNetwork, Vec<SimStreet<SortedVecContainer>>) {
        let mut network = RoadNetwork::new();
        let center = network.add_junction(Junction::new(
            0,
            1,
            0,
            0,
            vec![
                SignalPhase::new(CardinalDirection::North, 5),
                SignalPhase::new(CardinalDirection::East, 5),
            ],
        ));
        let north_arm = network.add_junction(Junction::new(0, 2, 0, 1, vec![]));
        let east_arm = network.add_junction(Junction::new(0, 3, 1, 0, vec![]));

        let from_north = network.add_street(Street::new(0, 1, 13.89, 100.0, north_arm, center));
        let from_east = network.add_street(Street::new(0, 1, 13.89, 100.0, east_arm, center));
        network
            .get_junction_mut(center)
            .add_incoming_street(from_north, CardinalDirection::North);
        network
            .get_junction_mut(center)
            .add_incoming_street(from_east, CardinalDirection::East);

        let mut streets = vec![
            SimStreet::new(0, 1, 100.0, 13.89),
            SimStreet::new(1, 1, 100.0, 13.89),
        ];
        // Initial state: only the current phase direction is green
        streets[0].set_signal(Signal::Green);
        streets[1].set_signal(Signal::Red);
        (network, streets)
    }

    #[test]
    fn test_phase_flip_swaps_green_street() {
        let (mut network, mut streets) = two_arm_junction();

        // Five ticks: timer counts down, nothing flips
        for _ in 0..5 {
            perform(&mut network, &mut streets, VerboseLevel::None);
            assert!(!streets[0].is_signal_red());
            assert!(streets[1].is_signal_red());
        }

        // Sixth tick: phase change, green moves from north to east
        perform(&mut network, &mut streets, VerboseLevel::None);
        assert!(streets[0].is_signal_red());
        assert!(!streets[1].is_signal_red());
    }

    #[test]
    fn test_at_most_one_green_per_junction() {
        let (mut network, mut streets) = two_arm_junction();
        for _ in 0..25 {
            perform(&mut network, &mut streets, VerboseLevel::None);
            let greens = streets.iter().filter(|s| !s.is_signal_red()).count();
            assert_eq!(greens, 1);
        }
    }

    #[test]
    fn test_junction_without_signals_is_skipped() {
        let mut network = RoadNetwork::new();
        network.add_junction(Junction::new(0, 1, 0, 0, vec![]));
        let mut streets: Vec<SimStreet<SortedVecContainer>> = vec![];
        // Must not panic or flip anything
        perform(&mut network, &mut streets, VerboseLevel::None);
    }
}
