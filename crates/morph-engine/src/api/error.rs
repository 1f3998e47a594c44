use thiserror::Error;

/// Construction-time failures. Per-frame animation never produces these.
#[derive(Error, Debug)]
pub enum MorphError {
    /// A particle group or spiral strip was configured with zero elements.
    #[error("particle group '{group}' must contain at least one particle")]
    EmptyGroup { group: String },

    /// A palette with no colors was supplied.
    #[error("particle group '{group}' has an empty color palette")]
    EmptyPalette { group: String },

    /// A palette entry could not be parsed as `#RRGGBB`.
    #[error("invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    /// Scale range is not finite or has min > max.
    #[error("particle group '{group}' has invalid scale range [{min}, {max}]")]
    InvalidScaleRange { group: String, min: f32, max: f32 },

    /// A shape constant (height, radius, speed) is not a positive finite number.
    #[error("shape parameter '{name}' must be positive and finite, got {value}")]
    InvalidShape { name: &'static str, value: f32 },

    /// A (min, max) parameter range is not finite or has min > max.
    #[error("parameter '{name}' has invalid range [{min}, {max}]")]
    InvalidRange { name: &'static str, min: f32, max: f32 },

    /// Scene preset JSON failed to parse.
    #[error("preset parse error: {0}")]
    Preset(#[from] serde_json::Error),
}

/// Result type using MorphError
pub type Result<T> = std::result::Result<T, MorphError>;

/// Reject zero, negative, NaN and infinite shape constants.
pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MorphError::InvalidShape { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_positive_rejects_bad_values() {
        assert!(require_positive("h", 1.0).is_ok());
        assert!(require_positive("h", 0.0).is_err());
        assert!(require_positive("h", -2.0).is_err());
        assert!(require_positive("h", f32::NAN).is_err());
        assert!(require_positive("h", f32::INFINITY).is_err());
    }

    #[test]
    fn error_messages_name_the_group() {
        let err = MorphError::EmptyPalette { group: "hearts".into() };
        assert!(err.to_string().contains("hearts"));
    }

    #[test]
    fn range_error_reports_both_ends() {
        let err = MorphError::InvalidRange { name: "spiral_blink_speed", min: 7.0, max: 3.0 };
        let msg = err.to_string();
        assert!(msg.contains("spiral_blink_speed") && msg.contains('7') && msg.contains('3'));
        assert!(!msg.contains("positive"));
    }
}
