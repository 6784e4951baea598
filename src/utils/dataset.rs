use crate::modules::session::Session;

/// Rating used for closed sessions that never received one.
pub const UNSET_RATING: f64 = 3.0;

/// Seconds per unit of the duration feature.
pub const DURATION_SCALE_SEC: f64 = 600.0;

/// Feature rows for offline clustering, one per closed session:
/// `[completion_ratio, rating, total_duration / 600]`.
///
/// A rating of 0 counts as unset here and is replaced by 3.
pub fn session_feature_rows(sessions: &[Session]) -> Vec<[f64; 3]> {
    sessions
        .iter()
        .filter(|s| s.is_closed())
        .map(|s| {
            let rating = if s.rating > 0.0 { s.rating } else { UNSET_RATING };
            [s.completion_ratio, rating, f64::from(s.total_duration) / DURATION_SCALE_SEC]
        })
        .collect()
}
