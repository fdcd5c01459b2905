// Statistics derivation engine: aggregation, prediction, category scoring,
// and opponent scouting. Everything here is pure and synchronous; sparse or
// unparsable data flows through as explicit nulls, never as errors.

pub mod aggregate;
pub mod direction;
pub mod math;
pub mod scorer;
pub mod trend;
pub mod weakness;
