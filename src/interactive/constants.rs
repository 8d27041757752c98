//! Timing knobs for the interactive loop.

/// Terminal event polling interval in milliseconds.
pub const EVENT_POLL_INTERVAL_MS: u64 = 50;

/// Transient status message auto-clear delay in milliseconds.
pub const MESSAGE_CLEAR_DELAY_MS: u64 = 3000;

/// Upper bound on tail batches applied per loop pass, so a deep backfill
/// backlog keeps interleaving with keystroke handling.
pub const MAX_TAIL_BATCHES_PER_PASS: usize = 8;
