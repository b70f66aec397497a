use crate::network::junction::JunctionError;
use crate::network::road_network::RoadNetwork;
use crate::network::street::StreetID;
use crate::routines::{consistency, idm, signaling};
use crate::streets::{CarContainer, Signal, SimCar, SimStreet, SortedVecContainer};
use crate::verbose::{
    EVENT_MATERIALIZE, EVENT_SIMULATION_RESET, EVENT_STEP, EVENT_WRITE_BACK, LocalLogger,
    VerboseLevel,
};
use std::fmt;
use uuid::Uuid;

/// Custom error types for `Simulator`.
#[derive(Debug, Clone)]
pub enum SimulationError {
    /// Indicates a malformed junction encountered while routing a car.
    Junction(JunctionError),
}

impl fmt::Display for SimulationError {
    /// Formats the error message for `SimulationError`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Junction(err) => {
                write!(f, "Junction error: {}", err)
            }
        }
    }
}

impl std::error::Error for SimulationError {}

impl From<JunctionError> for SimulationError {
    fn from(err: JunctionError) -> Self {
        SimulationError::Junction(err)
    }
}

/// Simulator - drives the discrete-time traffic simulation over a road network.
///
/// Owns the [`RoadNetwork`] and one low-level [`SimStreet`] per directed
/// street. The container layout is the type parameter `S`, resolved once
/// for the whole simulation so the per-car loops stay monomorphic; the
/// sorted-vector layout is the default.
///
/// Each tick runs the signaling routine, the car update routine and the
/// consistency routine, in that order. Low-level streets are materialized
/// lazily on the first step; after the requested steps every vehicle's
/// state is written back into the network for export. A simulator built
/// from a previously written-back network resumes the identical
/// trajectory.
pub struct Simulator<S: CarContainer = SortedVecContainer> {
    network: RoadNetwork,
    streets: Vec<SimStreet<S>>,
    initialized: bool,

    /// Simulation info - number of steps executed
    steps: u32,
    /// Sum of all per-car travel distances accrued so far (m).
    total_travel_distance: f64,
    /// Per-street counters of stop-line crossings, indexed by street ID.
    crossing_counts: Vec<u64>,

    /// Unique run identifier
    id: Uuid,
    /// Debugging information level
    verbose: VerboseLevel,
    /// Run-tagged logger for the simulator's own phase events
    logger: LocalLogger,
}

impl<S: CarContainer> Simulator<S> {
    /// Creates a new simulator for the given network.
    pub fn new(network: RoadNetwork) -> Self {
        let crossing_counts = vec![0; network.streets_num()];
        let id = Uuid::new_v4();
        Simulator {
            network,
            streets: Vec::new(),
            initialized: false,
            steps: 0,
            total_travel_distance: 0.0,
            crossing_counts,
            id,
            verbose: VerboseLevel::None,
            logger: LocalLogger::with_run(VerboseLevel::None, id.to_string()),
        }
    }

    /// Gets the unique run identifier
    pub fn get_id(&self) -> Uuid {
        self.id
    }

    /// Gets the current step count
    pub fn get_steps(&self) -> u32 {
        self.steps
    }

    /// Gets the verbose level
    pub fn get_verbose_level(&self) -> VerboseLevel {
        self.verbose
    }

    /// Sets verbose level for the simulator
    pub fn set_verbose_level(&mut self, verbose: VerboseLevel) {
        self.verbose = verbose;
        self.logger.set_level(verbose);
    }

    /// The road network the simulator operates on
    pub fn get_network(&self) -> &RoadNetwork {
        &self.network
    }

    /// Consumes the simulator, handing the network back to the caller.
    /// After a write-back the network carries everything needed to build
    /// a fresh simulator that continues the same trajectory.
    pub fn into_network(self) -> RoadNetwork {
        self.network
    }

    /// Sum of all per-car travel distances accrued so far (m). The outer
    /// optimization loop maximizes this value.
    pub fn get_total_travel_distance(&self) -> f64 {
        self.total_travel_distance
    }

    /// Stop-line crossing counters per street, indexed by street ID
    pub fn get_crossing_counts(&self) -> &[u64] {
        &self.crossing_counts
    }

    /// Stop-line crossings of a single street
    pub fn get_crossing_count(&self, street: StreetID) -> u64 {
        self.crossing_counts[street]
    }

    /// The materialized low-level streets, indexed by street ID. Empty
    /// until the first step ran.
    pub fn get_sim_streets(&self) -> &[SimStreet<S>] {
        &self.streets
    }

    /// Builds the low-level streets from the network: one street per
    /// directed street in arena order, initial green for every junction's
    /// current phase direction, and every vehicle inserted into its
    /// starting street.
    fn initialize_low_level(&mut self) {
        self.streets = self
            .network
            .streets()
            .iter()
            .map(|street| {
                SimStreet::new(
                    street.get_id(),
                    street.get_lanes(),
                    street.get_length(),
                    street.get_speed_limit(),
                )
            })
            .collect();

        // Streets run green by default; a signaled junction holds all its
        // phase directions red except the current one.
        for junction in self.network.junctions() {
            if junction.get_signals().is_empty() {
                continue;
            }
            for phase in junction.get_signals() {
                let slot = junction.get_incoming_street(phase.get_direction());
                if slot.is_connected() {
                    self.streets[slot.get_street()].set_signal(Signal::Red);
                }
            }
            let green = junction.get_incoming_street(junction.get_current_signal().get_direction());
            if green.is_connected() {
                self.streets[green.get_street()].set_signal(Signal::Green);
            }
        }

        for vehicle in self.network.vehicles() {
            let car = SimCar::from_vehicle(vehicle);
            self.streets[vehicle.get_position().street].insert_car(car);
        }
        for street in self.streets.iter_mut() {
            street.incorporate_inserted_cars();
        }

        self.logger.log_with_fields(
            EVENT_MATERIALIZE,
            "Materialize low-level streets from the network",
            &[
                ("streets_num", &self.streets.len()),
                ("vehicles_num", &self.network.vehicles_num()),
            ],
        );
        self.initialized = true;
    }

    fn ensure_initialized(&mut self) {
        if !self.initialized {
            self.initialize_low_level();
        }
    }

    /// One tick: signaling, car update, consistency. Pending state is
    /// committed inside the consistency routine.
    fn compute_step(&mut self) -> Result<(), SimulationError> {
        signaling::perform(&mut self.network, &mut self.streets, self.verbose);

        let tick_stats = idm::perform(&mut self.streets, self.verbose);
        for (street_id, stats) in tick_stats {
            self.total_travel_distance += stats.travel_distance;
            self.crossing_counts[street_id] += stats.stop_line_crossings;
        }

        consistency::perform(&mut self.network, &mut self.streets, self.verbose)?;

        self.steps += 1;
        self.logger.log_with_fields(
            EVENT_STEP,
            "Simulation step executed",
            &[("step", &self.steps)],
        );
        Ok(())
    }

    /// Writes every car's current state back into the network records.
    fn write_back(&mut self) {
        for street in self.streets.iter() {
            let street_id = street.get_id();
            for car in street.iter() {
                self.network.write_vehicle_state(
                    car.get_id(),
                    street_id,
                    car.get_lane(),
                    car.get_distance(),
                    car.get_velocity(),
                    car.get_travel_distance(),
                );
            }
        }
        self.logger.log_with_fields(
            EVENT_WRITE_BACK,
            "Write vehicle state back into the network",
            &[("step", &self.steps)],
        );
    }

    /// Executes a single step and syncs the network representation.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        self.ensure_initialized();
        self.compute_step()?;
        self.write_back();
        Ok(())
    }

    /// Executes `n` steps, syncing the network representation once at the end.
    pub fn steps(&mut self, n: u32) -> Result<(), SimulationError> {
        self.ensure_initialized();
        for _ in 0..n {
            self.compute_step()?;
        }
        self.write_back();
        Ok(())
    }

    /// Resets vehicles, junction timers, counters and the low-level state,
    /// returning the simulator to the freshly loaded scenario.
    pub fn reset(&mut self) {
        self.logger.log_with_fields(
            EVENT_SIMULATION_RESET,
            "Reset simulation",
            &[("step", &self.steps)],
        );
        for vehicle in self.network.vehicles_mut() {
            vehicle.reset_position();
        }
        for junction in self.network.junctions_mut() {
            junction.reset();
        }
        self.streets.clear();
        self.initialized = false;
        self.steps = 0;
        self.total_travel_distance = 0.0;
        self.crossing_counts = vec![0; self.network.streets_num()];
    }
}
