//! Shared numeric constants for the engine.

// ── Scheduling ──────────────────────────────────────────────────

/// Poll rate for linked-list selection and the joystick idle scan.
pub const POLL_HZ: u32 = 60;

// ── Curves ──────────────────────────────────────────────────────

/// Bend assigned to the last connector of a fan is `BEND_SCALE * (n - 1) / n`.
pub const BEND_SCALE: f64 = 100.0;

/// Normalized anchor written to both ends of a beautified connector.
pub const MIDPOINT_ANCHOR: f64 = 0.5;

// ── Caps ────────────────────────────────────────────────────────

/// Arc-length percentage at which the cap is centered.
pub const CAP_POINT_PCT: f64 = 50.0;

/// Half-width of the cap window, in arc-length percent.
pub const CAP_DELTA_PCT: f64 = 2.0;

/// Arc-length error tolerance handed to the curve solver.
pub const ARC_ACCURACY: f64 = 1e-3;

/// Total path lengths at or below this are treated as degenerate.
pub const MIN_PATH_LENGTH: f64 = 1e-6;
