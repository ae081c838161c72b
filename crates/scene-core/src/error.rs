use thiserror::Error;

/// Invalid numeric configuration, detected at the call that supplied it.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("opacity scale must be non-zero")]
    ZeroOpacityScale,
    #[error("{name} must be finite")]
    NonFinite { name: &'static str },
    #[error("range is inverted: min {min} > max {max}")]
    InvertedRange { min: f32, max: f32 },
    #[error("step must be positive, got {step}")]
    NonPositiveStep { step: f32 },
}

/// Binding and lookup failures on the parameter panel.
///
/// All of these are fatal to the single call that raised them; the panel and
/// its existing controls stay usable.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("bound target was dropped")]
    TargetDropped,
    #[error("control kind does not match the bound value type")]
    TypeMismatch,
    #[error("bound value is not finite")]
    NonFiniteValue,
    #[error("unknown group id")]
    UnknownGroup,
    #[error("unknown control id")]
    UnknownControl,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
