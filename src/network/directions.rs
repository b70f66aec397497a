use std::fmt;

/// Custom error types for direction code conversions.
#[derive(Debug, Clone)]
pub enum DirectionError {
    /// Indicates that the provided cardinal direction code is out of range (must be 0..=3).
    InvalidCardinalCode(u8),
    /// Indicates that the provided turn code is out of range (must be 0..=3).
    InvalidTurnCode(u8),
}

impl fmt::Display for DirectionError {
    /// Formats the error message for `DirectionError`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionError::InvalidCardinalCode(value) => {
                write!(f, "Invalid cardinal direction code: '{}'", value)
            }
            DirectionError::InvalidTurnCode(value) => {
                write!(f, "Invalid turn code: '{}'", value)
            }
        }
    }
}

impl std::error::Error for DirectionError {}

/// Represents the four cardinal directions used to key junction slots.
///
/// The wire format encodes them as 0 → North, 1 → East, 2 → South, 3 → West.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CardinalDirection {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

/// All cardinal directions in wire-code order. Handy for iterating junction slots.
pub const CARDINAL_DIRECTIONS: [CardinalDirection; 4] = [
    CardinalDirection::North,
    CardinalDirection::East,
    CardinalDirection::South,
    CardinalDirection::West,
];

impl CardinalDirection {
    /// Returns the wire code of the direction (also the junction slot index).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Resulting direction after taking the given turn when arriving from `self`.
    ///
    /// The turn is applied as a clockwise rotation: `(origin + turn) mod 4`.
    ///
    /// # Example
    /// ```
    /// use idm_traffic_sim_core::network::directions::{CardinalDirection, TurnDirection};
    /// let out = CardinalDirection::North.take_turn(TurnDirection::Right);
    /// assert_eq!(out, CardinalDirection::West);
    /// ```
    pub fn take_turn(self, turn: TurnDirection) -> CardinalDirection {
        CardinalDirection::from_index((self.index() + turn.index()) % 4)
    }

    /// Next direction clockwise. Used to rotate towards the first connected outgoing slot.
    pub fn rotate_clockwise(self) -> CardinalDirection {
        CardinalDirection::from_index((self.index() + 1) % 4)
    }

    fn from_index(idx: usize) -> CardinalDirection {
        CARDINAL_DIRECTIONS[idx % 4]
    }
}

impl TryFrom<u8> for CardinalDirection {
    type Error = DirectionError;

    /// Converts a wire code (0..=3) into a `CardinalDirection`.
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CardinalDirection::North),
            1 => Ok(CardinalDirection::East),
            2 => Ok(CardinalDirection::South),
            3 => Ok(CardinalDirection::West),
            other => Err(DirectionError::InvalidCardinalCode(other)),
        }
    }
}

impl fmt::Display for CardinalDirection {
    /// Formats the direction for display.
    ///
    /// Returns a short, lowercase string representation suitable for
    /// logging, debugging, and user interfaces.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use idm_traffic_sim_core::network::directions::CardinalDirection;
    ///
    /// assert_eq!(format!("{}", CardinalDirection::North), "n");
    /// assert_eq!(format!("{}", CardinalDirection::East), "e");
    /// assert_eq!(format!("{}", CardinalDirection::South), "s");
    /// assert_eq!(format!("{}", CardinalDirection::West), "w");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardinalDirection::North => "n",
            CardinalDirection::East => "e",
            CardinalDirection::South => "s",
            CardinalDirection::West => "w",
        };
        write!(f, "{}", s)
    }
}

/// Represents one token of a vehicle's turn sequence.
///
/// The wire format encodes them as 0 → U-turn, 1 → Left, 2 → Straight, 3 → Right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TurnDirection {
    UTurn = 0,
    Left = 1,
    Straight = 2,
    Right = 3,
}

impl TurnDirection {
    /// Returns the wire code of the turn.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for TurnDirection {
    type Error = DirectionError;

    /// Converts a wire code (0..=3) into a `TurnDirection`.
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TurnDirection::UTurn),
            1 => Ok(TurnDirection::Left),
            2 => Ok(TurnDirection::Straight),
            3 => Ok(TurnDirection::Right),
            other => Err(DirectionError::InvalidTurnCode(other)),
        }
    }
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TurnDirection::UTurn => "uturn",
            TurnDirection::Left => "left",
            TurnDirection::Straight => "straight",
            TurnDirection::Right => "right",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_turn() {
        // Arriving at a junction from the north and going straight keeps heading south-wise:
        // (origin + turn) mod 4 over the wire codes.
        assert_eq!(
            CardinalDirection::North.take_turn(TurnDirection::UTurn),
            CardinalDirection::North
        );
        assert_eq!(
            CardinalDirection::North.take_turn(TurnDirection::Straight),
            CardinalDirection::South
        );
        assert_eq!(
            CardinalDirection::East.take_turn(TurnDirection::Left),
            CardinalDirection::South
        );
        assert_eq!(
            CardinalDirection::West.take_turn(TurnDirection::Right),
            CardinalDirection::South
        );
    }

    #[test]
    fn test_rotate_clockwise_wraps() {
        assert_eq!(CardinalDirection::West.rotate_clockwise(), CardinalDirection::North);
        assert_eq!(CardinalDirection::North.rotate_clockwise(), CardinalDirection::East);
    }

    #[test]
    fn test_invalid_codes() {
        assert!(CardinalDirection::try_from(4).is_err());
        assert!(TurnDirection::try_from(7).is_err());
        assert_eq!(
            CardinalDirection::try_from(9).unwrap_err().to_string(),
            "Invalid cardinal direction code: '9'"
        );
    }
}
