use crate::protocol::constants::{DEBUG_HIGH, DEBUG_LOW};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub debug_level: u8,
}

impl EngineConfig {
    pub fn with_debug(debug_level: u8) -> Self {
        Self { debug_level }
    }

    /// Per-stage summaries
    pub fn summaries(&self) -> bool {
        self.debug_level >= DEBUG_LOW
    }

    /// Full code table dumps
    pub fn verbose(&self) -> bool {
        self.debug_level >= DEBUG_HIGH
    }
}
