use crate::agents::VehicleID;
use crate::network::street::StreetID;

/// One recorded pass of a vehicle over a street's stop line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficLightCrossing {
    pub vehicle: VehicleID,
    pub street: StreetID,
    pub tick: u32,
}

impl TrafficLightCrossing {
    pub fn new(vehicle: VehicleID, street: StreetID, tick: u32) -> TrafficLightCrossing {
        TrafficLightCrossing {
            vehicle,
            street,
            tick,
        }
    }
}
