//! Driver configuration structures and loaders.
use std::env;
use std::time::Duration;

use crate::skills::MoveParams;

/// Configuration for the control-loop driver.
#[derive(Clone, Debug)]
pub struct DriverConfig {
    pub loop_config: LoopConfig,
    pub sim: SimConfig,
    pub motion: MoveParams,
    /// Shell id of the robot the play drives.
    pub robot_id: u8,
    /// Restart the waypoint sequence each time it completes.
    pub continuous: bool,
    /// Print the play's transition graph and tree at startup.
    pub dump_graph: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            loop_config: LoopConfig::default(),
            sim: SimConfig::default(),
            motion: MoveParams::default(),
            robot_id: 0,
            continuous: true,
            dump_graph: false,
        }
    }
}

impl DriverConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PLAY_TICK_HZ` - Control loop rate (default: 60, min: 1)
    /// - `PLAY_MAX_TICKS` - Stop after this many ticks (default: run until interrupted)
    /// - `PLAY_CONTINUOUS` - Loop the sequence forever (default: true)
    /// - `PLAY_ROBOT_ID` - Shell id of the driven robot (default: 0)
    /// - `PLAY_DUMP_GRAPH` - Print the play's transition graph at startup (default: false)
    /// - `SIM_MAX_SPEED` - Simulated robot speed in m/s (default: 1.5)
    /// - `MOVE_ARRIVAL_TOLERANCE` - Arrival radius in meters (default: 0.05)
    /// - `MOVE_TIMEOUT_TICKS` - Fail a move after this many ticks (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(hz) = read_env::<u32>("PLAY_TICK_HZ") {
            config.loop_config.tick_hz = hz.max(1);
        }
        config.loop_config.max_ticks = read_env::<u64>("PLAY_MAX_TICKS");

        if let Some(continuous) = read_env::<bool>("PLAY_CONTINUOUS") {
            config.continuous = continuous;
        }
        if let Some(robot_id) = read_env::<u8>("PLAY_ROBOT_ID") {
            config.robot_id = robot_id;
        }

        if let Some(dump) = read_flag("PLAY_DUMP_GRAPH") {
            config.dump_graph = dump;
        }

        if let Some(speed) = read_env::<f32>("SIM_MAX_SPEED") {
            config.sim.max_speed = speed.max(0.0);
        }
        if let Some(tolerance) = read_env::<f32>("MOVE_ARRIVAL_TOLERANCE") {
            config.motion.arrival_tolerance = tolerance.max(0.0);
        }
        config.motion.timeout_ticks = read_env::<u64>("MOVE_TIMEOUT_TICKS");

        config
    }
}

/// Control loop timing.
#[derive(Clone, Debug)]
pub struct LoopConfig {
    pub tick_hz: u32,
    pub max_ticks: Option<u64>,
}

impl LoopConfig {
    /// Wall-clock time between ticks.
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_hz.max(1)))
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            max_ticks: None,
        }
    }
}

/// Simulated field parameters.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub max_speed: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { max_speed: 1.5 }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    parse_value(key, &env::var(key).ok()?)
}

/// Like [`read_env`] for booleans, but a variable set to nothing means `true`.
fn read_flag(key: &str) -> Option<bool> {
    parse_flag(key, &env::var(key).ok()?)
}

fn parse_flag(key: &str, raw: &str) -> Option<bool> {
    if raw.is_empty() {
        Some(true)
    } else {
        parse_value(key, raw)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring malformed environment value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_follows_tick_rate() {
        let config = LoopConfig {
            tick_hz: 50,
            max_ticks: None,
        };
        assert_eq!(config.period(), Duration::from_millis(20));
    }

    #[test]
    fn zero_rate_is_clamped() {
        let config = LoopConfig {
            tick_hz: 0,
            max_ticks: None,
        };
        assert_eq!(config.period(), Duration::from_secs(1));
    }

    #[test]
    fn defaults_loop_forever() {
        let config = DriverConfig::default();
        assert!(config.continuous);
        assert_eq!(config.loop_config.max_ticks, None);
        assert_eq!(config.motion, MoveParams::default());
    }

    #[test]
    fn bare_flag_is_true() {
        assert_eq!(parse_flag("PLAY_DUMP_GRAPH", ""), Some(true));
        assert_eq!(parse_flag("PLAY_DUMP_GRAPH", "false"), Some(false));
    }

    #[test]
    fn malformed_flag_keeps_the_default() {
        assert_eq!(parse_flag("PLAY_DUMP_GRAPH", "garbage"), None);
        assert_eq!(parse_value::<u32>("PLAY_TICK_HZ", "fast"), None);
        assert_eq!(parse_value::<u32>("PLAY_TICK_HZ", "50"), Some(50));
    }
}
