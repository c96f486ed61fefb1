//! Record identity: `Id = (Kind, UniqueToken)` as described in spec.md §3.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kinds of record the persistence contract stores (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kind {
    /// An experiment record
    Experiment,
    /// A population record
    Population,
    /// A species record
    Specie,
    /// A live-agent genotype record
    Agent,
    /// A cortex record
    Cortex,
    /// A neuron record
    Neuron,
    /// A sensor record
    Sensor,
    /// An actuator record
    Actuator,
    /// A morphology record
    Morphology,
    /// A per-generation trace record
    Trace,
    /// An aggregate statistic record
    Stat,
    /// A hall-of-fame champion record
    Champion,
}

impl Kind {
    /// All record kinds, in a stable order
    pub const ALL: [Kind; 12] = [
        Kind::Experiment,
        Kind::Population,
        Kind::Specie,
        Kind::Agent,
        Kind::Cortex,
        Kind::Neuron,
        Kind::Sensor,
        Kind::Actuator,
        Kind::Morphology,
        Kind::Trace,
        Kind::Stat,
        Kind::Champion,
    ];
}

/// A record's unique token within its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordId(pub u64);

impl RecordId {
    /// Create a new record id
    pub const fn new(token: u64) -> Self {
        Self(token)
    }

    /// The raw token value
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
