//! Planner configuration.

use crate::{CoreError, CoreResult};

/// Tuning knobs shared by the map, router and route compiler.
///
/// Typically built with `PlannerConfig::default()` and adjusted field by
/// field, or deserialized (feature `serde`) by the application crate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Maximum `len / buckets` ratio for every [`ExpandableMap`] the planner
    /// creates.  Default: 0.5.
    ///
    /// [`ExpandableMap`]: crate::ExpandableMap
    pub max_load_factor: f64,

    /// Half-width in degrees of the "straight through" band around 0°/360°.
    /// A street-name change whose turn angle falls inside the band emits no
    /// turn instruction.  Default: 1.0.
    pub turn_epsilon_deg: f64,

    /// Upper bound on A* node expansions per point-to-point search.  `None`
    /// searches until the frontier is exhausted.  Default: 1,000,000.
    pub max_expansions: Option<usize>,
}

impl PlannerConfig {
    pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.5;
    /// Smallest accepted load factor; keeps bucket doubling bounded.
    pub const MIN_MAX_LOAD_FACTOR: f64 = 0.01;
    pub const DEFAULT_TURN_EPSILON_DEG: f64 = 1.0;
    pub const DEFAULT_MAX_EXPANSIONS: usize = 1_000_000;

    /// Check that every field is in range.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.max_load_factor.is_finite() && self.max_load_factor >= Self::MIN_MAX_LOAD_FACTOR) {
            return Err(CoreError::Config(format!(
                "max_load_factor must be at least {}, got {}",
                Self::MIN_MAX_LOAD_FACTOR,
                self.max_load_factor
            )));
        }
        if !(0.0..180.0).contains(&self.turn_epsilon_deg) {
            return Err(CoreError::Config(format!(
                "turn_epsilon_deg must be in [0, 180), got {}",
                self.turn_epsilon_deg
            )));
        }
        if self.max_expansions == Some(0) {
            return Err(CoreError::Config("max_expansions must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_load_factor:  Self::DEFAULT_MAX_LOAD_FACTOR,
            turn_epsilon_deg: Self::DEFAULT_TURN_EPSILON_DEG,
            max_expansions:   Some(Self::DEFAULT_MAX_EXPANSIONS),
        }
    }
}
