pub mod filtering;
pub mod statistics;
pub mod transforms;

/// Round to two decimal places, the precision used for reported
/// averages, deviations and percentage deltas. Exact halves go to the
/// even neighbour.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
