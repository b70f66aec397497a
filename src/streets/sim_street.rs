use crate::streets::car::{SimCar, VEHICLE_LENGTH};
use crate::streets::container::CarContainer;
use crate::network::street::StreetID;
use std::fmt;

/// Distance between a street's end and its stop line, in meters.
pub const TRAFFIC_LIGHT_OFFSET: f64 = 17.5;

/// Represents the state of a street's traffic light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Red light - vehicles must stop at the stop line.
    Red,
    /// Green light - vehicles may pass the junction.
    Green,
}

impl fmt::Display for Signal {
    /// Formats the signal for display.
    ///
    /// Returns a short, lowercase string representation suitable for
    /// logging, debugging, and user interfaces.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use idm_traffic_sim_core::streets::Signal;
    ///
    /// assert_eq!(format!("{}", Signal::Red), "r");
    /// assert_eq!(format!("{}", Signal::Green), "g");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Red => "r",
            Signal::Green => "g",
        };
        write!(f, "{}", s)
    }
}

/// A simulated street: a car container plus the signal state of the
/// street's end.
///
/// The street synthesizes a phantom car pinned at the stop line
/// (`length − TRAFFIC_LIGHT_OFFSET`, lane 0, velocity 0, regular vehicle
/// length). While the signal is red, [`SimStreet::next_car_in_front`]
/// substitutes the phantom for the real front car whenever the querying
/// car is still behind the stop line and no real car sits between the two.
/// The car-following law thus decelerates towards a red light through the
/// exact same code path it uses for a slow leader. The phantom never shows
/// up in iteration, never takes updates and is never anyone's follower.
#[derive(Debug, Clone)]
pub struct SimStreet<S> {
    id: StreetID,
    speed_limit: f64,
    signal: Signal,
    traffic_light_car: SimCar,
    container: S,
}

impl<S: CarContainer> SimStreet<S> {
    /// Creates a street with an empty container and a green signal.
    /// Streets ending at an unsignaled junction keep the green forever;
    /// signaled junctions set their incoming streets at materialization.
    pub fn new(id: StreetID, lane_count: usize, length: f64, speed_limit: f64) -> SimStreet<S> {
        let mut traffic_light_car = SimCar::new(
            usize::MAX,
            -1,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            VEHICLE_LENGTH,
        );
        traffic_light_car.set_position(0, length - TRAFFIC_LIGHT_OFFSET, 0.0);
        SimStreet {
            id,
            speed_limit,
            signal: Signal::Green,
            traffic_light_car,
            container: S::new(lane_count, length),
        }
    }

    /// Returns the unique identifier (ID) of the street
    pub fn get_id(&self) -> StreetID {
        self.id
    }

    pub fn lane_count(&self) -> usize {
        self.container.lane_count()
    }

    pub fn length(&self) -> f64 {
        self.container.length()
    }

    /// Speed limit in m/s
    pub fn speed_limit(&self) -> f64 {
        self.speed_limit
    }

    /// Position of the stop line: `length − TRAFFIC_LIGHT_OFFSET`
    pub fn stop_line_position(&self) -> f64 {
        self.container.length() - TRAFFIC_LIGHT_OFFSET
    }

    pub fn car_count(&self) -> usize {
        self.container.car_count()
    }

    pub fn is_signal_red(&self) -> bool {
        self.signal == Signal::Red
    }

    pub fn set_signal(&mut self, signal: Signal) {
        self.signal = signal;
    }

    pub fn switch_signal(&mut self) {
        self.signal = match self.signal {
            Signal::Red => Signal::Green,
            Signal::Green => Signal::Red,
        };
    }

    pub fn insert_car(&mut self, car: SimCar) {
        self.container.insert_car(car);
    }

    pub fn incorporate_inserted_cars(&mut self) {
        self.container.incorporate_inserted_cars();
    }

    pub fn update_and_restore_consistency(&mut self) {
        self.container.update_and_restore_consistency();
    }

    pub fn beyonds(&self) -> &[SimCar] {
        self.container.beyonds()
    }

    pub fn remove_beyonds(&mut self) {
        self.container.remove_beyonds();
    }

    /// Iterates the incorporated cars in container order.
    pub fn iter(&self) -> impl Iterator<Item = &SimCar> {
        self.container.iter()
    }

    /// Visits every incorporated car mutably, in container order.
    pub fn for_each_ordered_mut(&mut self, f: impl FnMut(&mut SimCar)) {
        self.container.for_each_ordered_mut(f);
    }

    /// Lane addressed by the probe car and a lane offset in {-1, 0, +1}.
    /// Offsets pointing outside the street are a programmer error.
    fn target_lane(&self, car: &SimCar, lane_offset: i8) -> usize {
        let lane = car.get_lane() as isize + lane_offset as isize;
        debug_assert!(
            lane >= 0 && (lane as usize) < self.container.lane_count(),
            "lane offset {} leaves street {} from lane {}",
            lane_offset,
            self.id,
            car.get_lane()
        );
        lane as usize
    }

    /// Next car in front of `car` on its own lane (offset 0) or an
    /// adjacent one, with the red-light phantom substituted when the stop
    /// line is the nearest obstacle ahead.
    pub fn next_car_in_front(&self, car: &SimCar, lane_offset: i8) -> Option<&SimCar> {
        let lane = self.target_lane(car, lane_offset);
        let front = self.container.next_in_front(car, lane);
        if self.signal == Signal::Red {
            let stop_line = self.traffic_light_car.get_distance();
            let behind_stop_line = car.get_distance() < stop_line;
            let front_is_farther = front.map_or(true, |f| f.get_distance() > stop_line);
            if behind_stop_line && front_is_farther {
                return Some(&self.traffic_light_car);
            }
        }
        front
    }

    /// Next *real* car in front, ignoring the signal overlay. Space checks
    /// for lane changes consult this one.
    pub fn real_next_car_in_front(&self, car: &SimCar, lane_offset: i8) -> Option<&SimCar> {
        let lane = self.target_lane(car, lane_offset);
        self.container.next_in_front(car, lane)
    }

    /// Next car behind `car`. The phantom never appears behind anyone.
    pub fn next_car_behind(&self, car: &SimCar, lane_offset: i8) -> Option<&SimCar> {
        let lane = self.target_lane(car, lane_offset);
        self.container.next_behind(car, lane)
    }
}
