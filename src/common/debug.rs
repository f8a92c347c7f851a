use std::sync::OnceLock;

/// Switch that decides whether diagnostic trace lines are emitted.
///
/// The switch latches on its first query: `latch(init)` stores `init` the
/// first time it is called and returns the stored value on every later call,
/// whatever argument is passed. `enabled()` is a query with `false` as its
/// argument, so a switch that is read before it is latched stays off.
#[derive(Debug, Clone, Default)]
pub struct DebugTrace {
    state: OnceLock<bool>,
}

impl DebugTrace {
    /// Creates a switch that has not been latched yet.
    pub fn new() -> Self {
        Self {
            state: OnceLock::new(),
        }
    }

    /// Creates a switch already latched to `enabled`.
    pub fn latched(enabled: bool) -> Self {
        let trace = Self::new();
        trace.latch(enabled);
        trace
    }

    pub fn latch(&self, init: bool) -> bool {
        *self.state.get_or_init(|| init)
    }

    pub fn enabled(&self) -> bool {
        self.latch(false)
    }
}

/// Emits a `log::debug!` line when the given `DebugTrace` is enabled.
#[macro_export]
macro_rules! trace_op {
    ($trace:expr, $($arg:tt)+) => {
        if $trace.enabled() {
            ::log::debug!($($arg)+);
        }
    };
}
