use crate::network::directions::{CARDINAL_DIRECTIONS, CardinalDirection};
use crate::network::street::StreetID;
use std::fmt;

pub type JunctionID = usize; // Alias for JunctionID

/// Minimal duration (in ticks) a signal phase may run for.
pub const MIN_SIGNAL_DURATION: u32 = 5;

/// Custom error types for `Junction` operations.
#[derive(Debug, Clone)]
pub enum JunctionError {
    /// Indicates that a junction has no signal phases, so no signal ordering is defined.
    EmptySignals { junction_id: JunctionID },
    /// Indicates that a street claimed to end at a junction is not registered in any incoming slot.
    StreetNotIncoming {
        junction_id: JunctionID,
        street_id: StreetID,
    },
    /// Indicates that a junction has no connected outgoing slot at all.
    NoOutgoingConnected { junction_id: JunctionID },
}

impl fmt::Display for JunctionError {
    /// Formats the error message for `JunctionError`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JunctionError::EmptySignals { junction_id } => {
                write!(f, "Junction '{}' has an empty signal list", junction_id)
            }
            JunctionError::StreetNotIncoming {
                junction_id,
                street_id,
            } => {
                write!(
                    f,
                    "Street '{}' is not registered as incoming at junction '{}'",
                    street_id, junction_id
                )
            }
            JunctionError::NoOutgoingConnected { junction_id } => {
                write!(
                    f,
                    "Junction '{}' has no connected outgoing direction",
                    junction_id
                )
            }
        }
    }
}

impl std::error::Error for JunctionError {}

/// One entry of a junction's signal program: a direction gets green for a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalPhase {
    direction: CardinalDirection,
    duration: u32,
}

impl SignalPhase {
    pub fn new(direction: CardinalDirection, duration: u32) -> SignalPhase {
        SignalPhase {
            direction,
            duration,
        }
    }

    /// Incoming direction that is green during this phase
    pub fn get_direction(&self) -> CardinalDirection {
        self.direction
    }

    /// Phase duration in ticks
    pub fn get_duration(&self) -> u32 {
        self.duration
    }
}

/// A street slot of a junction keyed by cardinal direction.
///
/// All four slots always exist; `connected` tells whether a street
/// actually occupies the slot.
#[derive(Debug, Clone, Copy)]
pub struct ConnectedStreet {
    connected: bool,
    street: StreetID,
}

impl ConnectedStreet {
    fn empty() -> ConnectedStreet {
        ConnectedStreet {
            connected: false,
            street: 0,
        }
    }

    /// Whether a street occupies this slot
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Street occupying this slot. Only meaningful when `is_connected()`.
    pub fn get_street(&self) -> StreetID {
        self.street
    }
}

/// Represents a junction of the road network.
///
/// A junction holds four incoming and four outgoing street slots keyed by
/// cardinal direction, plus an ordered signal program. The program is
/// advanced once per tick via [`Junction::next_step`]; the remaining-tick
/// counter always stays within `[0, current_phase.duration]`.
#[derive(Debug, Clone)]
pub struct Junction {
    /// Unique identifier, assigned by the network (arena index).
    id: JunctionID,
    /// Identifier used by the scenario input/output.
    external_id: i64,
    /// Coordinates on the scenario grid.
    x: i64,
    y: i64,
    /// Ordered signal program. Non-empty for any junction that takes part in signaling.
    signals: Vec<SignalPhase>,
    /// Index of the currently green phase.
    signal_index: usize,
    /// Ticks left in the current phase.
    remaining: u32,
    incoming: [ConnectedStreet; 4],
    outgoing: [ConnectedStreet; 4],
}

impl Junction {
    /// Creates a new junction with the given signal program.
    ///
    /// The remaining-tick counter starts at the first phase's full duration.
    /// The identifier is overwritten when the junction is added to a network.
    pub fn new(id: JunctionID, external_id: i64, x: i64, y: i64, signals: Vec<SignalPhase>) -> Junction {
        let remaining = signals.first().map(|s| s.get_duration()).unwrap_or(0);
        Junction {
            id,
            external_id,
            x,
            y,
            signals,
            signal_index: 0,
            remaining,
            incoming: [ConnectedStreet::empty(); 4],
            outgoing: [ConnectedStreet::empty(); 4],
        }
    }

    /// Returns the unique identifier (ID) of the junction
    pub fn get_id(&self) -> JunctionID {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: JunctionID) {
        self.id = id;
    }

    /// Identifier used by the scenario input/output
    pub fn get_external_id(&self) -> i64 {
        self.external_id
    }

    pub fn get_x(&self) -> i64 {
        self.x
    }

    pub fn get_y(&self) -> i64 {
        self.y
    }

    /// Registers a street as incoming from the given direction.
    pub fn add_incoming_street(&mut self, street: StreetID, direction: CardinalDirection) {
        self.incoming[direction.index()] = ConnectedStreet {
            connected: true,
            street,
        };
    }

    /// Registers a street as outgoing towards the given direction.
    pub fn add_outgoing_street(&mut self, street: StreetID, direction: CardinalDirection) {
        self.outgoing[direction.index()] = ConnectedStreet {
            connected: true,
            street,
        };
    }

    /// Incoming slot for the given direction
    pub fn get_incoming_street(&self, direction: CardinalDirection) -> &ConnectedStreet {
        &self.incoming[direction.index()]
    }

    /// Outgoing slot for the given direction
    pub fn get_outgoing_street(&self, direction: CardinalDirection) -> &ConnectedStreet {
        &self.outgoing[direction.index()]
    }

    /// All four incoming slots in wire-code order
    pub fn get_incoming_streets(&self) -> &[ConnectedStreet; 4] {
        &self.incoming
    }

    /// All four outgoing slots in wire-code order
    pub fn get_outgoing_streets(&self) -> &[ConnectedStreet; 4] {
        &self.outgoing
    }

    /// Replaces the signal program. Resets phase index and remaining ticks.
    pub fn set_signals(&mut self, signals: Vec<SignalPhase>) {
        self.remaining = signals.first().map(|s| s.get_duration()).unwrap_or(0);
        self.signal_index = 0;
        self.signals = signals;
    }

    /// Signal program of the junction
    pub fn get_signals(&self) -> &[SignalPhase] {
        &self.signals
    }

    /// Currently green phase.
    ///
    /// Junctions with an empty program are rejected at scenario load, so
    /// this is a programmer error if it fires during a simulation.
    pub fn get_current_signal(&self) -> SignalPhase {
        assert!(
            !self.signals.is_empty(),
            "junction {} has no signal phases",
            self.id
        );
        self.signals[self.signal_index]
    }

    /// Phase that was green before the current one (cyclic).
    pub fn get_previous_signal(&self) -> SignalPhase {
        assert!(
            !self.signals.is_empty(),
            "junction {} has no signal phases",
            self.id
        );
        let previous = (self.signal_index + self.signals.len() - 1) % self.signals.len();
        self.signals[previous]
    }

    /// Index of the currently green phase
    pub fn get_signal_index(&self) -> usize {
        self.signal_index
    }

    /// Ticks left in the current phase
    pub fn get_remaining_ticks(&self) -> u32 {
        self.remaining
    }

    /// Advances the signal timer by one tick.
    ///
    /// When the remaining-tick counter has run out the program moves to the
    /// next phase (cyclic), the counter is reset to that phase's duration
    /// and `true` is returned to signal the phase change. Otherwise the
    /// counter is decremented and `false` is returned.
    pub fn next_step(&mut self) -> bool {
        if self.signals.is_empty() {
            return false;
        }
        if self.remaining == 0 {
            self.signal_index = (self.signal_index + 1) % self.signals.len();
            self.remaining = self.signals[self.signal_index].get_duration();
            true
        } else {
            self.remaining -= 1;
            false
        }
    }

    /// Resets the signal program to its first phase with a full timer.
    pub fn reset(&mut self) {
        self.signal_index = 0;
        self.remaining = self.signals.first().map(|s| s.get_duration()).unwrap_or(0);
    }

    /// Finds the cardinal direction from which the given street enters this junction.
    pub fn incoming_direction_of(&self, street: StreetID) -> Result<CardinalDirection, JunctionError> {
        for direction in CARDINAL_DIRECTIONS {
            let slot = &self.incoming[direction.index()];
            if slot.is_connected() && slot.get_street() == street {
                return Ok(direction);
            }
        }
        Err(JunctionError::StreetNotIncoming {
            junction_id: self.id,
            street_id: street,
        })
    }

    /// Rotates clockwise from the desired direction until a connected
    /// outgoing slot is found and returns it together with its direction.
    pub fn first_connected_outgoing(
        &self,
        desired: CardinalDirection,
    ) -> Result<(CardinalDirection, StreetID), JunctionError> {
        let mut direction = desired;
        for _ in 0..4 {
            let slot = &self.outgoing[direction.index()];
            if slot.is_connected() {
                return Ok((direction, slot.get_street()));
            }
            direction = direction.rotate_clockwise();
        }
        Err(JunctionError::NoOutgoingConnected {
            junction_id: self.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_phase_junction() -> Junction {
        let signals = CARDINAL_DIRECTIONS
            .iter()
            .map(|d| SignalPhase::new(*d, MIN_SIGNAL_DURATION))
            .collect();
        Junction::new(0, 100, 0, 0, signals)
    }

    #[test]
    fn test_signal_timer() {
        let mut junction = four_phase_junction();
        assert_eq!(junction.get_remaining_ticks(), 5);
        assert_eq!(junction.get_signal_index(), 0);

        // Five ticks count the timer down without a phase change
        for expected in (0..5).rev() {
            assert!(!junction.next_step());
            assert_eq!(junction.get_remaining_ticks(), expected);
            assert_eq!(junction.get_signal_index(), 0);
        }

        // The next tick flips to the second phase and resets the timer
        assert!(junction.next_step());
        assert_eq!(junction.get_signal_index(), 1);
        assert_eq!(junction.get_remaining_ticks(), 5);
        assert_eq!(
            junction.get_previous_signal().get_direction(),
            CardinalDirection::North
        );
        assert_eq!(
            junction.get_current_signal().get_direction(),
            CardinalDirection::East
        );
    }

    #[test]
    fn test_signal_program_wraps() {
        let mut junction = four_phase_junction();
        let mut changes = 0;
        for _ in 0..24 {
            if junction.next_step() {
                changes += 1;
            }
        }
        assert_eq!(changes, 4);
        assert_eq!(junction.get_signal_index(), 0);
        assert_eq!(
            junction.get_current_signal().get_direction(),
            CardinalDirection::North
        );
    }

    #[test]
    fn test_rotate_to_connected_outgoing() {
        let mut junction = four_phase_junction();
        junction.add_outgoing_street(7, CardinalDirection::South);

        // Desired direction disconnected, rotate clockwise until the south slot
        let (direction, street) = junction
            .first_connected_outgoing(CardinalDirection::East)
            .unwrap();
        assert_eq!(direction, CardinalDirection::South);
        assert_eq!(street, 7);

        let empty = Junction::new(1, 101, 1, 0, vec![]);
        assert!(empty.first_connected_outgoing(CardinalDirection::North).is_err());
    }

    #[test]
    fn test_incoming_direction_lookup() {
        let mut junction = four_phase_junction();
        junction.add_incoming_street(3, CardinalDirection::West);
        assert_eq!(
            junction.incoming_direction_of(3).unwrap(),
            CardinalDirection::West
        );
        assert!(junction.incoming_direction_of(9).is_err());
    }
}
