use crate::network::junction::JunctionID;

pub type StreetID = usize; // Alias for StreetID

/// Represents one direction of a road between two junctions.
///
/// A road in the scenario input is materialized as two opposing streets.
/// Streets are immutable after network construction; vehicles reference
/// them by `StreetID`.
#[derive(Debug, Clone)]
pub struct Street {
    /// Unique identifier, assigned by the network (arena index).
    id: StreetID,
    /// Number of lanes in this direction (1..=3).
    lanes: usize,
    /// Speed limit in m/s.
    speed_limit: f64,
    /// Length in meters.
    length: f64,
    /// Junction the street starts at.
    from: JunctionID,
    /// Junction the street ends at.
    to: JunctionID,
}

impl Street {
    /// Creates a new street. The identifier is overwritten when the street
    /// is added to a network.
    pub fn new(
        id: StreetID,
        lanes: usize,
        speed_limit: f64,
        length: f64,
        from: JunctionID,
        to: JunctionID,
    ) -> Street {
        Street {
            id,
            lanes,
            speed_limit,
            length,
            from,
            to,
        }
    }

    /// Returns the unique identifier (ID) of the street
    pub fn get_id(&self) -> StreetID {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: StreetID) {
        self.id = id;
    }

    /// Number of lanes in this direction
    pub fn get_lanes(&self) -> usize {
        self.lanes
    }

    /// Speed limit in m/s
    pub fn get_speed_limit(&self) -> f64 {
        self.speed_limit
    }

    /// Length in meters
    pub fn get_length(&self) -> f64 {
        self.length
    }

    /// Junction the street starts at
    pub fn get_source_junction(&self) -> JunctionID {
        self.from
    }

    /// Junction the street ends at
    pub fn get_target_junction(&self) -> JunctionID {
        self.to
    }
}
