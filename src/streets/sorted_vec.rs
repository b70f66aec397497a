use crate::streets::car::SimCar;
use crate::streets::container::CarContainer;
use std::cmp::Ordering;

/// Sentinel for "no same-lane neighbor" in the link arrays.
const NO_LINK: usize = usize::MAX;

/// Sorted-vector car container, the default layout.
///
/// All incorporated cars live in one contiguous sequence sorted by
/// `(distance ascending, external id descending)` regardless of lane.
/// Staged cars wait in a separate vector until
/// [`incorporate_inserted_cars`](CarContainer::incorporate_inserted_cars)
/// sort-merges them in. Committing re-sorts in place and splits off the
/// tail of cars whose distance reached the street length.
///
/// Per entry the container maintains links to the next and the previous
/// car on the same lane, rebuilt after every sort by walking the sequence
/// once per lane. Own-lane neighbor queries resolve through these links;
/// queries towards adjacent lanes binary-search the probe distance and
/// walk towards the requested lane.
#[derive(Debug, Clone)]
pub struct SortedVecContainer {
    lane_count: usize,
    length: f64,
    /// Incorporated cars, sorted. Sorting is restored after every commit
    /// and every incorporation.
    cars: Vec<SimCar>,
    /// Index of the nearest strictly-closer-to-the-end car on the same
    /// lane, per entry of `cars`. `NO_LINK` when none exists.
    front_links: Vec<usize>,
    /// Index of the nearest strictly-closer-to-the-start car on the same
    /// lane, per entry of `cars`.
    behind_links: Vec<usize>,
    /// Staged cars, not visible to queries until incorporated.
    new_cars: Vec<SimCar>,
    /// Cars that left the street during the last commit.
    departed: Vec<SimCar>,
}

impl SortedVecContainer {
    fn assert_insertable(&self, car: &SimCar) {
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
    }

    /// Position of the probe car in the sorted sequence, if it is an
    /// incorporated car of this container.
    fn index_of(&self, car: &SimCar) -> Option<usize> {
        let idx = self
            .cars
            .partition_point(|c| c.cmp_position(car) == Ordering::Less);
        let candidate = self.cars.get(idx)?;
        if candidate.get_external_id() == car.get_external_id()
            && candidate.get_distance() == car.get_distance()
        {
            Some(idx)
        } else {
            None
        }
    }

    /// Rebuilds the same-lane neighbor links, one walk per lane.
    /// Cars at equal distance on one lane are not linked to each other;
    /// the links always skip to a strictly different distance.
    fn rebuild_lane_links(&mut self) {
        let n = self.cars.len();
        self.front_links.clear();
        self.front_links.resize(n, NO_LINK);
        self.behind_links.clear();
        self.behind_links.resize(n, NO_LINK);

        for lane in 0..self.lane_count {
            let lane_entries: Vec<usize> = (0..n)
                .filter(|i| self.cars[*i].get_lane() == lane)
                .collect();
            for (pos, entry) in lane_entries.iter().enumerate() {
                let distance = self.cars[*entry].get_distance();

                let mut ahead = pos + 1;
                while ahead < lane_entries.len()
                    && self.cars[lane_entries[ahead]].get_distance() == distance
                {
                    ahead += 1;
                }
                if ahead < lane_entries.len() {
                    self.front_links[*entry] = lane_entries[ahead];
                }

                let mut back = pos;
                while back > 0 && self.cars[lane_entries[back - 1]].get_distance() == distance {
                    back -= 1;
                }
                if back > 0 {
                    self.behind_links[*entry] = lane_entries[back - 1];
                }
            }
        }
    }
}

impl CarContainer for SortedVecContainer {
    fn new(lane_count: usize, length: f64) -> Self {
        SortedVecContainer {
            lane_count,
            length,
            cars: Vec::new(),
            front_links: Vec::new(),
            behind_links: Vec::new(),
            new_cars: Vec::new(),
            departed: Vec::new(),
        }
    }

    fn lane_count(&self) -> usize {
        self.lane_count
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn car_count(&self) -> usize {
        self.cars.len()
    }

    fn insert_car(&mut self, car: SimCar) {
        self.assert_insertable(&car);
        self.new_cars.push(car);
    }

    fn incorporate_inserted_cars(&mut self) {
        if self.new_cars.is_empty() {
            return;
        }
        for car in self.new_cars.drain(..) {
            let mut car = car;
            car.apply_updates();
            self.cars.push(car);
        }
        self.cars.sort_unstable_by(|a, b| a.cmp_position(b));
        self.rebuild_lane_links();
    }

    fn update_and_restore_consistency(&mut self) {
        for car in self.cars.iter_mut() {
            car.apply_updates();
        }
        self.cars.sort_unstable_by(|a, b| a.cmp_position(b));
        // The beyonds form the tail suffix once the order is restored
        let cut = self
            .cars
            .partition_point(|c| c.get_distance() < self.length);
        self.departed.extend(self.cars.drain(cut..));
        self.rebuild_lane_links();
    }

    fn beyonds(&self) -> &[SimCar] {
        &self.departed
    }

    fn remove_beyonds(&mut self) {
        self.departed.clear();
    }

    fn iter(&self) -> impl Iterator<Item = &SimCar> {
        self.cars.iter()
    }

    fn for_each_ordered_mut(&mut self, f: impl FnMut(&mut SimCar)) {
        self.cars.iter_mut().for_each(f);
    }

    fn next_in_front(&self, car: &SimCar, lane: usize) -> Option<&SimCar> {
        if lane == car.get_lane() {
            if let Some(idx) = self.index_of(car) {
                let link = self.front_links[idx];
                return if link == NO_LINK {
                    None
                } else {
                    Some(&self.cars[link])
                };
            }
        }
        let start = self
            .cars
            .partition_point(|c| c.get_distance() <= car.get_distance());
        self.cars[start..].iter().find(|c| c.get_lane() == lane)
    }

    fn next_behind(&self, car: &SimCar, lane: usize) -> Option<&SimCar> {
        if lane == car.get_lane() {
            if let Some(idx) = self.index_of(car) {
                let link = self.behind_links[idx];
                return if link == NO_LINK {
                    None
                } else {
                    Some(&self.cars[link])
                };
            }
        }
        let end = self
            .cars
            .partition_point(|c| c.get_distance() < car.get_distance());
        self.cars[..end]
            .iter()
            .rev()
            .find(|c| c.get_lane() == lane)
    }
}
