//! Error types for sounding ingestion and analysis.
//!
//! Structural input problems abort the request; physical non-findings
//! (no LCL, no windward site) are encoded as `Option` values in the
//! result types and never pass through here.

/// Errors that can occur while building or querying a sounding.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundingError {
    /// Input profile is malformed or insufficient (ordering, length,
    /// missing fields). Fatal for the request, no silent repair.
    InvalidProfile(String),
    /// Interpolation query outside the pressure span of the profile.
    PressureOutOfRange {
        /// Requested pressure (hPa).
        pressure_hpa: f64,
        /// Lowest pressure carried by the profile (hPa).
        min_hpa: f64,
        /// Highest pressure carried by the profile (hPa).
        max_hpa: f64,
    },
    /// An injected sounding source failed to deliver a profile.
    Fetch(String),
}

impl std::fmt::Display for SoundingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoundingError::InvalidProfile(msg) => write!(f, "Invalid profile: {msg}"),
            SoundingError::PressureOutOfRange {
                pressure_hpa,
                min_hpa,
                max_hpa,
            } => write!(
                f,
                "Pressure {pressure_hpa} hPa outside profile span [{min_hpa}, {max_hpa}] hPa"
            ),
            SoundingError::Fetch(msg) => write!(f, "Sounding fetch failed: {msg}"),
        }
    }
}

impl std::error::Error for SoundingError {}

/// Bounded iterative solve ran out of iterations before reaching tolerance.
///
/// Internal to the theta-e inversion. The corrector handles it by keeping
/// the uncorrected value for the affected level; it is never propagated as
/// a request-level failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceError {
    /// Target equivalent potential temperature (K).
    pub target_theta_e_k: f64,
    /// Pressure of the level being solved (hPa).
    pub pressure_hpa: f64,
    /// Iterations spent before giving up.
    pub iterations: usize,
}

impl std::fmt::Display for ConvergenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Theta-e inversion for {:.1} K at {:.0} hPa did not converge in {} iterations",
            self.target_theta_e_k, self.pressure_hpa, self.iterations
        )
    }
}

impl std::error::Error for ConvergenceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_offending_values() {
        let range = SoundingError::PressureOutOfRange {
            pressure_hpa: 1050.0,
            min_hpa: 100.0,
            max_hpa: 1000.0,
        };
        let msg = range.to_string();
        assert!(msg.contains("1050"), "message should carry the query: {msg}");
        assert!(msg.contains("1000"), "message should carry the span: {msg}");

        let conv = ConvergenceError {
            target_theta_e_k: 321.5,
            pressure_hpa: 900.0,
            iterations: 60,
        };
        assert!(conv.to_string().contains("60 iterations"));
    }
}
