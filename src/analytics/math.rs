// Numeric reductions over raw stat values.
//
// Upstream fantasy APIs report stat values as strings, and a value of "-" or
// "" means the stat was not recorded that week. Every reduction here filters
// through `parse_numeric` first and reports "no qualifying data" as `None`
// rather than coercing missing values to zero.

// ---------------------------------------------------------------------------
// Parsing / filtering
// ---------------------------------------------------------------------------

/// Parse a raw stat value into a finite float.
///
/// Returns `None` for placeholder strings ("-", ""), non-numeric text, and
/// non-finite parses. This is the single filtering point for the whole
/// engine: a value rejected here is excluded from every computation.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Keep only the values that parse as finite numbers, in input order.
pub fn filter_numeric<'a, I>(raw: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a str>,
{
    raw.into_iter().filter_map(parse_numeric).collect()
}

// ---------------------------------------------------------------------------
// Numeric core
// ---------------------------------------------------------------------------

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (N denominator, not N-1).
///
/// Returns `Some(0.0)` for a single value and `None` for an empty slice.
/// The N denominator is deliberate: the observed weeks are the full
/// population of interest, not a sample.
pub fn std_dev_of(values: &[f64]) -> Option<f64> {
    let mean = mean_of(values)?;
    if values.len() == 1 {
        return Some(0.0);
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

// ---------------------------------------------------------------------------
// Raw-value reductions
// ---------------------------------------------------------------------------

/// Average of the parseable values, or `None` if nothing qualifies.
pub fn average(raw: &[&str]) -> Option<f64> {
    mean_of(&filter_numeric(raw.iter().copied()))
}

/// Minimum of the parseable values.
pub fn min(raw: &[&str]) -> Option<f64> {
    filter_numeric(raw.iter().copied())
        .into_iter()
        .reduce(f64::min)
}

/// Maximum of the parseable values.
pub fn max(raw: &[&str]) -> Option<f64> {
    filter_numeric(raw.iter().copied())
        .into_iter()
        .reduce(f64::max)
}

/// Population standard deviation of the parseable values.
pub fn std_dev(raw: &[&str]) -> Option<f64> {
    std_dev_of(&filter_numeric(raw.iter().copied()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
