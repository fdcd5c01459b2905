// Per-category direction and highlight policy.
//
// Whether a category is won by the higher or the lower raw value, and which
// categories are not meaningfully "won" at all. Every other module consults
// these two functions instead of re-deriving the rules, so there is exactly
// one definition of what winning a category means.

/// Turnovers in Yahoo's basketball stat taxonomy.
const TURNOVERS_STAT_ID: &str = "19";

/// True if a lower raw value wins this category.
///
/// Turnovers are the only lower-is-better category: matched by stat id or by
/// a case-insensitive "turnover" substring in the display name, so renamed
/// or re-keyed league settings still resolve correctly.
pub fn is_lower_better(stat_id: &str, display_name: &str) -> bool {
    stat_id == TURNOVERS_STAT_ID || display_name.to_lowercase().contains("turnover")
}

/// True if this category should be excluded from competitive highlighting.
///
/// Composite made/attempted displays (FGM/A, FTM/A) carry two numbers in one
/// value and cannot be compared as a single quantity.
pub fn should_skip_highlight(display_name: &str) -> bool {
    display_name.contains("FGM/A") || display_name.contains("FTM/A")
}
