use std::fmt;
use std::sync::OnceLock;
use tracing::{Level, debug, info, trace};
use tracing_subscriber::{
    EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Hierarchical logging levels for simulation debugging.
///
/// Each level includes all lower levels, providing increasingly detailed output.
/// Uses JSON structured logging via the `tracing` crate.
///
/// # Examples
///
/// ```rust
/// use idm_traffic_sim_core::verbose::{VerboseLevel, set_verbose_level};
///
/// // Set logging level
/// set_verbose_level(VerboseLevel::Main);
///
/// // Check current level
/// if VerboseLevel::Main.is_at_least(VerboseLevel::Additional) {
///     println!("Will log additional details");
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum VerboseLevel {
    /// No debug at all
    None = 0,
    /// Major simulation phases - `info` level
    Main = 1,
    /// Function-level details - `debug` level
    Additional = 2,
    /// Loop iterations and fine operations - `debug` level
    Detailed = 3,
    /// Everything including traces - `trace` level
    All = 4,
}

impl fmt::Display for VerboseLevel {
    /// Formats the verbosity level for display.
    ///
    /// Returns a short, lowercase string representation suitable for
    /// logging, debugging, and user interfaces.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use idm_traffic_sim_core::verbose::VerboseLevel;
    ///
    /// assert_eq!(format!("{}", VerboseLevel::None), "none");
    /// assert_eq!(format!("{}", VerboseLevel::Main), "main");
    /// assert_eq!(format!("{}", VerboseLevel::Additional), "additional");
    /// assert_eq!(format!("{}", VerboseLevel::Detailed), "detailed");
    /// assert_eq!(format!("{}", VerboseLevel::All), "all");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerboseLevel::None => "none",
            VerboseLevel::Main => "main",
            VerboseLevel::Additional => "additional",
            VerboseLevel::Detailed => "detailed",
            VerboseLevel::All => "all",
        };
        write!(f, "{}", s)
    }
}

impl From<VerboseLevel> for Level {
    fn from(level: VerboseLevel) -> Self {
        match level {
            VerboseLevel::None => Level::ERROR,
            VerboseLevel::Main => Level::INFO,
            VerboseLevel::Additional => Level::DEBUG,
            VerboseLevel::Detailed => Level::DEBUG,
            VerboseLevel::All => Level::TRACE,
        }
    }
}

// Event type constants
pub const EVENT_STEP: &str = "step";
pub const EVENT_SIGNAL_PHASE: &str = "signal_phase";
pub const EVENT_IDM: &str = "idm_update";
pub const EVENT_CONSISTENCY: &str = "consistency";
pub const EVENT_MIGRATE: &str = "migrate_car";
pub const EVENT_MATERIALIZE: &str = "materialize";
pub const EVENT_WRITE_BACK: &str = "write_back";
pub const EVENT_SCENARIO_LOAD: &str = "scenario_load";
pub const EVENT_SCENARIO_EXPORT: &str = "scenario_export";
pub const EVENT_ESTIMATE: &str = "estimate";
pub const EVENT_SIMULATION_RESET: &str = "simulation_reset";

// Global verbose level storage
static VERBOSE_LEVEL: OnceLock<VerboseLevel> = OnceLock::new();
static LOGGER_INITIALIZED: OnceLock<bool> = OnceLock::new();

/// Initialize the tracing logger once
pub fn init_logger() {
    if LOGGER_INITIALIZED.set(true).is_ok() {
        tracing_subscriber::registry()
            .with(
                tracing_fmt::layer()
                    .json()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

/// Single emit point: every structured log line of the crate funnels
/// through here, at the tracing level the verbosity maps onto.
fn emit(level: VerboseLevel, event: &str, message: &str, fields: &[(&str, &dyn fmt::Display)]) {
    let mut field_map = std::collections::HashMap::new();
    for (key, value) in fields {
        field_map.insert(*key, format!("{}", value));
    }
    let tracing_level = Level::from(level);
    if tracing_level == Level::INFO {
        info!(event = event, ?field_map, message);
    } else if tracing_level == Level::DEBUG {
        debug!(event = event, ?field_map, message);
    } else if tracing_level == Level::TRACE {
        trace!(event = event, ?field_map, message);
    }
}

// ===== GLOBAL VERBOSE FUNCTIONS =====

/// Sets the global verbose level and updates tracing filter
pub fn set_verbose_level(level: VerboseLevel) {
    let _ = VERBOSE_LEVEL.set(level);
    init_logger();
}

/// Gets the current global verbose level
pub fn get_verbose_level() -> VerboseLevel {
    *VERBOSE_LEVEL.get().unwrap_or(&VerboseLevel::None)
}

/// Checks if current global verbose level is at least the specified level
pub fn is_verbose_level(level: VerboseLevel) -> bool {
    get_verbose_level() >= level
}

/// Logs a message with fields if the global verbose level allows it
pub fn verbose_log_with_fields(
    level: VerboseLevel,
    event: &str,
    message: &str,
    fields: &[(&str, &dyn fmt::Display)],
) {
    if !is_verbose_level(level) {
        return;
    }
    emit(level, event, message, fields);
}

// ===== PER-RUN VERBOSE METHODS =====

/// Run-specific logging functions
impl VerboseLevel {
    /// Logs a message with fields if the run verbose level allows it
    pub fn log_with_fields(self, event: &str, message: &str, fields: &[(&str, &dyn fmt::Display)]) {
        if self == VerboseLevel::None {
            return;
        }
        emit(self, event, message, fields);
    }

    /// Checks if this level is at least the minimum level
    pub fn is_at_least(self, min_level: VerboseLevel) -> bool {
        self >= min_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(VerboseLevel::All.is_at_least(VerboseLevel::Detailed));
        assert!(VerboseLevel::Main.is_at_least(VerboseLevel::Main));
        assert!(!VerboseLevel::None.is_at_least(VerboseLevel::Main));
    }

    #[test]
    fn test_tracing_level_mapping() {
        assert_eq!(Level::from(VerboseLevel::Main), Level::INFO);
        assert_eq!(Level::from(VerboseLevel::Additional), Level::DEBUG);
        assert_eq!(Level::from(VerboseLevel::Detailed), Level::DEBUG);
        assert_eq!(Level::from(VerboseLevel::All), Level::TRACE);
    }

    #[test]
    fn test_silent_levels_emit_nothing() {
        // None must be a no-op on both logging paths
        VerboseLevel::None.log_with_fields(EVENT_STEP, "suppressed", &[("step", &1)]);
        verbose_log_with_fields(VerboseLevel::All, EVENT_STEP, "filtered out", &[]);
    }
}
