//! Orbit configuration error types.

/// Errors raised when an orbital body or a body set is invalid.
///
/// Values are never clamped into range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrbitError {
    /// Eccentricity outside `[0, 1)`. Open orbits are unsupported.
    #[error("eccentricity must be in [0, 1), got {0}")]
    Eccentricity(f64),

    /// Semi-major axis that is zero, negative, or not finite.
    #[error("semi-major axis must be positive, got {0}")]
    SemiMajorAxis(f64),

    /// Orbital period that is zero, negative, or not finite.
    #[error("orbital period must be positive, got {0}")]
    Period(f64),

    /// Visual radius that is zero, negative, or not finite.
    #[error("visual radius must be positive, got {0}")]
    VisualRadius(f64),

    /// Orientation angle or phase that is NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    Angle { name: &'static str, value: f64 },

    /// No body with this identifier is part of the system.
    #[error("no body '{0}' in the system")]
    UnknownBody(String),

    /// Body identifier was empty.
    #[error("body identifier must not be empty")]
    EmptyIdentifier,

    /// A body with the same identifier is already part of the system.
    #[error("body '{0}' is already registered")]
    DuplicateBody(String),
}
