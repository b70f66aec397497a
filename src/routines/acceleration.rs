use crate::streets::SimCar;

/// Intelligent-Driver-Model acceleration for `car`, optionally constrained
/// by a car in front (which may be the phantom stop-line car).
///
/// The free-road term pulls the velocity towards the smaller of the
/// driver's target velocity and the street's speed limit:
/// `a_free = 1 − (v / v_target)⁴`. A car in front adds the interaction
/// term `(s* / s)²` with the desired gap
/// `s* = s_min + v·T + v·Δv / (2·√(a_max·b))`; without one the
/// interaction term is zero. The result is scaled by the maximum
/// acceleration and may be negative (braking).
pub fn compute_acceleration(car: &SimCar, in_front: Option<&SimCar>, speed_limit: f64) -> f64 {
    let target_velocity = car.get_target_velocity().min(speed_limit);
    let unrestricted_driving_factor = 1.0 - (car.get_velocity() / target_velocity).powi(4);

    let mut car_in_front_factor = 0.0;
    if let Some(front) = in_front {
        // Bumper-to-bumper gap to the car in front
        let distance_delta = front.get_distance() - front.get_length() - car.get_distance();
        let velocity_delta = car.get_velocity() - front.get_velocity();

        let dynamic_headway =
            (car.get_velocity() * velocity_delta) / car.get_acceleration_divisor();
        let desired_gap = car.get_min_distance()
            + car.get_velocity() * car.get_target_headway()
            + dynamic_headway;

        car_in_front_factor = (desired_gap / distance_delta).powi(2);
    }

    car.get_max_acceleration() * (unrestricted_driving_factor - car_in_front_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streets::VEHICLE_LENGTH;

    fn car_at(distance: f64, velocity: f64) -> SimCar {
        let mut c = SimCar::new(0, 1, 13.89, 1.0, 1.0, 2.0, 1.5, 0.5, VEHICLE_LENGTH);
        c.set_position(0, distance, velocity);
        c
    }

    #[test]
    fn test_free_road_full_throttle_from_standstill() {
        let car = car_at(0.0, 0.0);
        let a = compute_acceleration(&car, None, 13.89);
        assert!((a - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_free_road_zero_at_target_velocity() {
        let car = car_at(0.0, 13.89);
        let a = compute_acceleration(&car, None, 13.89);
        assert!(a.abs() < 1e-12);
    }

    #[test]
    fn test_speed_limit_caps_target_velocity() {
        // Driving at the limit but below the driver's own target: no push left
        let car = car_at(0.0, 10.0);
        let a = compute_acceleration(&car, None, 10.0);
        assert!(a.abs() < 1e-12);
        // Above the limit the free term turns negative
        let car = car_at(0.0, 12.0);
        assert!(compute_acceleration(&car, None, 10.0) < 0.0);
    }

    #[test]
    fn test_close_leader_forces_braking() {
        let car = car_at(0.0, 10.0);
        let front = car_at(12.0, 0.0);
        // Gap of 7 m at 10 m/s against a standing leader
        let a = compute_acceleration(&car, Some(&front), 13.89);
        assert!(a < -1.0);
    }

    #[test]
    fn test_distant_leader_barely_matters() {
        let car = car_at(0.0, 5.0);
        let front = car_at(500.0, 5.0);
        let free = compute_acceleration(&car, None, 13.89);
        let constrained = compute_acceleration(&car, Some(&front), 13.89);
        assert!((free - constrained).abs() < 1e-3);
    }
}
