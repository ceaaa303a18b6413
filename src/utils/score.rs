//! Score arithmetic

/// Clamp a score into `[floor, ceiling]`
pub fn clamp_score(score: f64, floor: f64, ceiling: f64) -> f64 {
    score.max(floor).min(ceiling)
}

/// Round to two decimals, the precision scores are reported with
pub fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Saturating curve in `[0, max_bonus)` that is half way at `midpoint`
pub fn saturating_bonus(value: f64, max_bonus: f64, midpoint: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    max_bonus * value / (value + midpoint)
}
