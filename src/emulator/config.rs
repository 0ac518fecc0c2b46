// src/emulator/config.rs

use crate::permutation::DEFAULT_MAX_REGISTER_WIDTH;

/// Settings for [`OracleEmulator`](super::OracleEmulator) and the
/// [`Simulator`](crate::Simulator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatorConfig {
    /// Keep built tables keyed by `(operation_id, parameter, nx, ny)` and reuse
    /// them on later invocations. Off by default: tables are rebuilt per call.
    pub cache_tables: bool,
    /// Largest `nx + ny` the emulator will unroll.
    pub max_register_width: usize,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            cache_tables: false,
            max_register_width: DEFAULT_MAX_REGISTER_WIDTH,
        }
    }
}

impl EmulatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the table cache.
    pub fn with_table_cache(mut self, enabled: bool) -> Self {
        self.cache_tables = enabled;
        self
    }

    /// Sets the largest register width the emulator will unroll.
    pub fn with_max_register_width(mut self, width: usize) -> Self {
        self.max_register_width = width;
        self
    }
}
