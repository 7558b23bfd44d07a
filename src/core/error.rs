use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid {field}: {reason}, got {value}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
        value: f64,
    },
}

impl EngineError {
    pub(crate) fn non_finite(field: &'static str, value: f64) -> Self {
        EngineError::InvalidInput {
            field,
            reason: "must be a finite number",
            value,
        }
    }

    pub(crate) fn zero(field: &'static str) -> Self {
        EngineError::InvalidInput {
            field,
            reason: "must not be zero",
            value: 0.0,
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            EngineError::InvalidInput { field, .. } => field,
        }
    }
}
