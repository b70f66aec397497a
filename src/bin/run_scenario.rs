use idm_traffic_sim_core::scenario::input::ScenarioInput;
use idm_traffic_sim_core::scenario::output::SimulationResult;
use idm_traffic_sim_core::simulation::simulator::Simulator;
use idm_traffic_sim_core::verbose::init_logger;
use std::io::{self, Read, Write};
use std::process::ExitCode;

// cargo build --release --bin run_scenario
// RUST_LOG=info ./target/release/run_scenario < scenario.json > result.json
pub fn main() -> ExitCode {
    init_logger();

    let mut raw = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut raw) {
        eprintln!("Failed to read scenario from stdin: {}", e);
        return ExitCode::FAILURE;
    }

    let scenario: ScenarioInput = match serde_json::from_str(&raw) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Failed to parse scenario JSON: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (network, time_steps) = match scenario.build() {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Invalid scenario: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut simulator: Simulator = Simulator::new(network);
    if let Err(e) = simulator.steps(time_steps) {
        eprintln!("Simulation failed: {}", e);
        return ExitCode::FAILURE;
    }

    let result = SimulationResult::from_network(simulator.get_network());
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = result.write(&mut handle) {
        eprintln!("Failed to write result: {}", e);
        return ExitCode::FAILURE;
    }
    let _ = handle.write_all(b"\n");
    ExitCode::SUCCESS
}
