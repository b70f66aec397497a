use crate::streets::car::SimCar;
use crate::streets::container::CarContainer;

/// Length of a street section represented by a single bucket, in meters.
pub const SECTION_LENGTH: f64 = 1.0;

/// Bucket-list car container.
///
/// The street is partitioned into fixed-length sections; every
/// `(section, lane)` cell owns a small bucket of cars. A car's bucket is
/// computed directly from its distance and lane, so insertion places the
/// car at its final spot immediately and
/// [`incorporate_inserted_cars`](CarContainer::incorporate_inserted_cars)
/// has nothing left to do.
///
/// Buckets are kept sorted by `(distance ascending, external id
/// descending)`; together with the ascending section walk this preserves
/// the within-lane iteration order of the contract. Cars in different
/// lanes at the same distance may appear in a different relative order
/// than in the sorted-vector layout.
#[derive(Debug, Clone)]
pub struct BucketListContainer {
    lane_count: usize,
    length: f64,
    section_length: f64,
    /// One bucket per `(section, lane)` cell, laid out section-major.
    buckets: Vec<Vec<SimCar>>,
    /// Cars that left the street during the last commit.
    departed: Vec<SimCar>,
    car_count: usize,
}

impl BucketListContainer {
    /// Index of the bucket covering the given lane and distance.
    ///
    /// A distance equal to the street length maps into the last section;
    /// larger distances never reach this point (such cars depart).
    fn bucket_index(&self, lane: usize, distance: f64) -> usize {
        let sections = self.buckets.len() / self.lane_count;
        let section = ((distance / self.section_length) as usize).min(sections - 1);
        section * self.lane_count + lane
    }

    fn sections(&self) -> usize {
        self.buckets.len() / self.lane_count
    }

    /// Places a committed car into its bucket, keeping the bucket sorted.
    fn place(&mut self, car: SimCar) {
        let idx = self.bucket_index(car.get_lane(), car.get_distance());
        let bucket = &mut self.buckets[idx];
        let pos = bucket.partition_point(|c| c.cmp_position(&car) == std::cmp::Ordering::Less);
        bucket.insert(pos, car);
    }
}

impl CarContainer for BucketListContainer {
    fn new(lane_count: usize, length: f64) -> Self {
        let sections = (length / SECTION_LENGTH).ceil().max(1.0) as usize;
        BucketListContainer {
            lane_count,
            length,
            section_length: SECTION_LENGTH,
            buckets: vec![Vec::new(); sections * lane_count],
            departed: Vec::new(),
            car_count: 0,
        }
    }

    fn lane_count(&self) -> usize {
        self.lane_count
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn car_count(&self) -> usize {
        self.car_count
    }

    /// Commits the car and drops it straight into its bucket. Freshly
    /// positioned cars carry pending state equal to their current state,
    /// so the commit is idempotent.
    fn insert_car(&mut self, mut car: SimCar) {
        car.apply_updates();
        assert!(
            car.get_lane() < self.lane_count,
            "car {} inserted on lane {} of a {}-lane street",
            car.get_external_id(),
            car.get_lane(),
            self.lane_count
        );
        assert!(
            car.get_distance() >= 0.0,
            "car {} inserted at negative distance {}",
            car.get_external_id(),
            car.get_distance()
        );
        self.place(car);
        self.car_count += 1;
    }

    /// Nothing to do: cars are incorporated on insert in this layout.
    fn incorporate_inserted_cars(&mut self) {}

    fn update_and_restore_consistency(&mut self) {
        // Drain in descending order into a snapshot so every car is
        // committed exactly once, then redistribute.
        let mut snapshot: Vec<SimCar> = Vec::with_capacity(self.car_count);
        for bucket in self.buckets.iter_mut().rev() {
            snapshot.append(bucket);
        }
        for mut car in snapshot {
            car.apply_updates();
            if car.get_distance() >= self.length {
                self.departed.push(car);
                self.car_count -= 1;
            } else {
                self.place(car);
            }
        }
    }

    fn beyonds(&self) -> &[SimCar] {
        &self.departed
    }

    fn remove_beyonds(&mut self) {
        self.departed.clear();
    }

    fn iter(&self) -> impl Iterator<Item = &SimCar> {
        self.buckets.iter().flat_map(|bucket| bucket.iter())
    }

    fn for_each_ordered_mut(&mut self, mut f: impl FnMut(&mut SimCar)) {
        for bucket in self.buckets.iter_mut() {
            for car in bucket.iter_mut() {
                f(car);
            }
        }
    }

    fn next_in_front(&self, car: &SimCar, lane: usize) -> Option<&SimCar> {
        let distance = car.get_distance();
        let mut idx = self.bucket_index(lane, distance.clamp(0.0, self.length));
        // The probe's own bucket may hold a closer candidate
        if let Some(found) = self.buckets[idx].iter().find(|c| c.get_distance() > distance) {
            return Some(found);
        }
        // Walk section-wise towards the street end
        idx += self.lane_count;
        while idx < self.buckets.len() {
            if let Some(found) = self.buckets[idx].first() {
                return Some(found);
            }
            idx += self.lane_count;
        }
        None
    }

    fn next_behind(&self, car: &SimCar, lane: usize) -> Option<&SimCar> {
        let distance = car.get_distance();
        let mut idx = self.bucket_index(lane, distance.clamp(0.0, self.length));
        if let Some(found) = self.buckets[idx]
            .iter()
            .rev()
            .find(|c| c.get_distance() < distance)
        {
            return Some(found);
        }
        // Walk section-wise towards the street start
        while idx >= self.lane_count {
            idx -= self.lane_count;
            if let Some(found) = self.buckets[idx].last() {
                return Some(found);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streets::car::VEHICLE_LENGTH;

    fn car(external_id: i64, lane: usize, distance: f64) -> SimCar {
        let mut c = SimCar::new(
            external_id as usize,
            external_id,
            10.0,
            1.0,
            1.0,
            2.0,
            1.5,
            0.5,
            VEHICLE_LENGTH,
        );
        c.set_position(lane, distance, 0.0);
        c
    }

    fn filled_container() -> BucketListContainer {
        let mut container = BucketListContainer::new(2, 100.0);
        container.insert_car(car(1, 0, 30.2));
        container.insert_car(car(2, 1, 10.7));
        container.insert_car(car(3, 0, 50.0));
        container.insert_car(car(4, 1, 30.2));
        container
    }

    #[test]
    fn test_insert_is_immediately_visible() {
        let mut container = BucketListContainer::new(1, 100.0);
        container.insert_car(car(1, 0, 10.0));
        assert_eq!(container.car_count(), 1);
        assert!(container.next_in_front(&car(9, 0, 0.0), 0).is_some());
        // No staging in this layout
        container.incorporate_inserted_cars();
        assert_eq!(container.car_count(), 1);
    }

    #[test]
    fn test_iteration_ascending_sections() {
        let container = filled_container();
        let distances: Vec<f64> = container.iter().map(|c| c.get_distance()).collect();
        for pair in distances.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert_eq!(container.iter().count(), 4);
    }

    #[test]
    fn test_within_lane_order_with_sub_section_distances() {
        let mut container = BucketListContainer::new(1, 10.0);
        // Same section, same lane, sub-meter apart plus an exact tie
        container.insert_car(car(5, 0, 3.6));
        container.insert_car(car(1, 0, 3.2));
        container.insert_car(car(9, 0, 3.6));
        let ids: Vec<i64> = container.iter().map(|c| c.get_external_id()).collect();
        // Distance ascending; the tie at 3.6 orders external id 9 before 5
        assert_eq!(ids, vec![1, 9, 5]);
    }

    #[test]
    fn test_neighbor_queries_walk_buckets() {
        let container = filled_container();
        let front = container.next_in_front(&car(9, 1, 10.7), 1).unwrap();
        assert_eq!(front.get_external_id(), 4);
        let behind = container.next_behind(&car(9, 1, 30.2), 1).unwrap();
        assert_eq!(behind.get_external_id(), 2);
        // Same-bucket candidate on the other lane
        let front = container.next_in_front(&car(9, 1, 30.0), 0).unwrap();
        assert_eq!(front.get_external_id(), 1);
        assert!(container.next_behind(&car(9, 0, 10.7), 0).is_none());
        assert!(container.next_in_front(&car(9, 0, 50.0), 0).is_none());
    }

    #[test]
    fn test_commit_moves_cars_once() {
        let mut container = filled_container();
        // Everyone advances by 50 m; the car at 50.0 departs, the ones at
        // 30.2 move into buckets the descending walk already visited.
        container.for_each_ordered_mut(|c| {
            c.set_next(c.get_lane(), c.get_distance() + 50.0, 50.0);
        });
        container.update_and_restore_consistency();

        assert_eq!(container.car_count(), 3);
        assert_eq!(container.beyonds().len(), 1);
        assert_eq!(container.beyonds()[0].get_external_id(), 3);
        // Each survivor moved exactly once
        let distances: Vec<f64> = container.iter().map(|c| c.get_distance()).collect();
        assert_eq!(distances, vec![60.7, 80.2, 80.2]);
    }

    #[test]
    fn test_commit_at_exact_length_departs() {
        let mut container = BucketListContainer::new(1, 100.0);
        container.insert_car(car(1, 0, 95.0));
        container.for_each_ordered_mut(|c| c.set_next(0, 100.0, 5.0));
        container.update_and_restore_consistency();
        assert_eq!(container.car_count(), 0);
        assert_eq!(container.beyonds().len(), 1);
    }

    #[test]
    fn test_insert_at_street_length_lands_in_last_section() {
        let mut container = BucketListContainer::new(1, 100.0);
        container.insert_car(car(1, 0, 100.0));
        assert_eq!(container.car_count(), 1);
        assert_eq!(container.iter().next().unwrap().get_distance(), 100.0);
    }
}
