//! Bounded player counters (life and friends).

use crate::config::CounterSpec;
use serde::{Deserialize, Serialize};

/// Lower bound for counters the variant does not declare
pub const DEFAULT_COUNTER_MIN: i64 = 0;

/// Upper bound for counters the variant does not declare
pub const DEFAULT_COUNTER_MAX: i64 = 2_000_000_000;

/// A named value owned by a player, always kept inside `min..=max`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    name: String,
    value: i64,
    min: i64,
    max: i64,
}

impl Counter {
    /// Create a counter; the initial value is clamped into the bounds
    pub fn new(name: impl Into<String>, value: i64, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    pub fn from_spec(spec: &CounterSpec) -> Self {
        Self::new(spec.name.clone(), spec.initial, spec.min, spec.max)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Whether `value` lies inside the bounds
    pub fn accepts(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Set the value, clamping into the bounds. Returns the previous value.
    pub fn set(&mut self, value: i64) -> i64 {
        std::mem::replace(&mut self.value, value.clamp(self.min, self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn life() -> Counter {
        Counter::new("life", 20, DEFAULT_COUNTER_MIN, DEFAULT_COUNTER_MAX)
    }

    #[test]
    fn test_set_round_trip() {
        let mut counter = life();
        assert_eq!(counter.set(37), 20);
        assert_eq!(counter.value(), 37);
    }

    #[test]
    fn test_set_clamps_below_min() {
        let mut counter = life();
        counter.set(-5);
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn test_set_clamps_above_max() {
        let mut counter = life();
        counter.set(3_000_000_000);
        assert_eq!(counter.value(), DEFAULT_COUNTER_MAX);
    }

    #[test]
    fn test_initial_value_is_clamped() {
        let counter = Counter::new("poison", 15, 0, 10);
        assert_eq!(counter.value(), 10);
        assert!(counter.accepts(0));
        assert!(!counter.accepts(11));
    }
}
