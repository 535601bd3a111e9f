//! Common utilities for component calculations.

/// Initial potential for heat ports that have no better value (20 °C).
pub const DEFAULT_PORT_TEMPERATURE: f64 = 293.15;

/// Substitute for a vanishing temperature lift in COP calculations (K).
pub const EPSILON_LIFT: f64 = 1e-6;

/// Threshold above which a scalar input counts as `true`.
pub const SWITCH_THRESHOLD: f64 = 0.5;

/// Network-visible name of a component port, e.g. `wall.ext[2]`.
pub fn qualified(component: &str, port: &str) -> String {
    format!("{component}.{port}")
}

/// Port name for node `i` of an indexed port row, e.g. `ext[2]`.
pub fn indexed(row: &str, i: usize) -> String {
    format!("{row}[{i}]")
}
