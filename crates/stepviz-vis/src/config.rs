//! Configuration for the interactive surfaces.

use std::net::SocketAddr;

use stepviz_engine::{ControllerConfig, StepDelay};
use tracing::warn;

/// Configuration for the visualization server and terminal driver.
#[derive(Debug, Clone)]
pub struct VisConfig {
    /// Address the WebSocket server binds
    pub addr: SocketAddr,
    /// Sink events buffered before the worker blocks
    pub channel_capacity: usize,
    /// Step delay of every new screen
    pub initial_delay: StepDelay,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            channel_capacity: 64,
            initial_delay: StepDelay::default(),
        }
    }
}

impl VisConfig {
    /// Read `STEPVIZ_ADDR`, `STEPVIZ_CHANNEL_CAPACITY` and `STEPVIZ_DELAY`.
    /// Unset variables keep their defaults; invalid ones are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("STEPVIZ_ADDR") {
            match raw.parse() {
                Ok(addr) => config.addr = addr,
                Err(_) => warn!(value = %raw, "invalid STEPVIZ_ADDR, using default"),
            }
        }
        if let Some(raw) = lookup("STEPVIZ_CHANNEL_CAPACITY") {
            match raw.parse::<usize>() {
                Ok(capacity) if capacity > 0 => config = config.with_channel_capacity(capacity),
                _ => warn!(value = %raw, "invalid STEPVIZ_CHANNEL_CAPACITY, using default"),
            }
        }
        if let Some(raw) = lookup("STEPVIZ_DELAY") {
            match raw.parse::<f64>() {
                Ok(secs) if secs.is_finite() => config.initial_delay = StepDelay::from_secs(secs),
                _ => warn!(value = %raw, "invalid STEPVIZ_DELAY, using default"),
            }
        }
        config
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }

    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: StepDelay) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Controller settings for a new screen.
    pub fn controller(&self) -> ControllerConfig {
        ControllerConfig::default().with_delay(self.initial_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = VisConfig::default();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.initial_delay.as_secs(), StepDelay::DEFAULT);
    }

    #[test]
    fn reads_overrides() {
        let config = VisConfig::from_lookup(lookup(&[
            ("STEPVIZ_ADDR", "127.0.0.1:8081"),
            ("STEPVIZ_CHANNEL_CAPACITY", "8"),
            ("STEPVIZ_DELAY", "1.5"),
        ]));
        assert_eq!(config.addr, "127.0.0.1:8081".parse().unwrap());
        assert_eq!(config.channel_capacity, 8);
        assert_eq!(config.initial_delay.as_secs(), 1.5);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = VisConfig::from_lookup(lookup(&[
            ("STEPVIZ_ADDR", "nowhere"),
            ("STEPVIZ_CHANNEL_CAPACITY", "0"),
            ("STEPVIZ_DELAY", "fast"),
        ]));
        let defaults = VisConfig::default();
        assert_eq!(config.addr, defaults.addr);
        assert_eq!(config.channel_capacity, defaults.channel_capacity);
        assert_eq!(config.initial_delay, defaults.initial_delay);
    }

    #[test]
    fn delay_is_clamped() {
        let config = VisConfig::from_lookup(lookup(&[("STEPVIZ_DELAY", "30")]));
        assert_eq!(config.initial_delay.as_secs(), StepDelay::MAX);
        assert_eq!(VisConfig::default().with_port(9000).addr.port(), 9000);
    }

    #[test]
    fn channel_capacity_is_at_least_one() {
        assert_eq!(VisConfig::default().with_channel_capacity(0).channel_capacity, 1);
        assert_eq!(VisConfig::default().with_channel_capacity(2).channel_capacity, 2);
    }
}
