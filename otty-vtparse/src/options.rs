use std::sync::Arc;

use crate::table::TransitionTable;
use crate::transitions::VT500_TRANSITION_TABLE;

/// Configuration knobs for a [`Parser`](crate::Parser).
#[derive(Clone, Debug)]
pub struct ParserOptions {
    /// State machine driving the parser.
    pub table: Arc<TransitionTable>,
    /// Numeric parameters kept per CSI/DCS sequence.
    ///
    /// Unlike an unbounded parser, which appends an element for every
    /// separator, separators past the limit are dropped together with the
    /// digits that follow them. A 33-parameter SGR with the default limit
    /// dispatches its first 32 values. Values below 1 are treated as 1.
    pub max_params: usize,
    /// Code units kept per OSC payload; the excess is dropped.
    pub max_osc_len: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            table: Arc::clone(&VT500_TRANSITION_TABLE),
            max_params: 32,
            max_osc_len: 0x10_0000,
        }
    }
}

impl ParserOptions {
    /// Use `table` instead of the shared VT500 table.
    #[must_use]
    pub fn with_table(mut self, table: Arc<TransitionTable>) -> Self {
        self.table = table;
        self
    }

    #[must_use]
    pub fn with_max_params(mut self, max_params: usize) -> Self {
        self.max_params = max_params;
        self
    }

    #[must_use]
    pub fn with_max_osc_len(mut self, max_osc_len: usize) -> Self {
        self.max_osc_len = max_osc_len;
        self
    }
}
