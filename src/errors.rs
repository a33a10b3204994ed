use thiserror::Error;

/// Result of evaluating an expression
pub type CalcResult = Result<f64, CalcError>;
/// Result of an intermediate evaluation step that produces no value
pub type CalcErrorResult = Result<(), CalcError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("failed to parse expression")]
    ParseFailed,
    #[error("failed to convert '{0}' to a number")]
    StrToNumber(String),
    #[error("root marker is not followed by a number")]
    UnboundRoot,
    #[error("nor value neither operator found")]
    EmptyValue,
    #[error("invalid operator '{0}'")]
    InvalidOp(String),
    #[error("too many operators")]
    TooManyOps,
    #[error("too many numbers")]
    InsufficientOps,
    #[error("mismatched closing bracket")]
    ClosingBracketMismatch,
    #[error("nothing to calculate")]
    EmptyExpression,
    #[error("result is not a finite number")]
    Undefined,
    #[error("unreachable")]
    Unreachable,
}

impl CalcError {
    /// True for outcomes of valid syntax that have no finite value,
    /// e.g. division by zero. Everything else is a malformed expression.
    pub fn is_undefined(&self) -> bool {
        matches!(self, CalcError::Undefined)
    }

    /// The short message the calculator display shows for this error
    pub fn ui_message(&self) -> &'static str {
        if self.is_undefined() {
            "Can't divide by zero"
        } else {
            "Error"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_messages() {
        assert_eq!(CalcError::Undefined.ui_message(), "Can't divide by zero");
        assert_eq!(CalcError::ParseFailed.ui_message(), "Error");
        assert_eq!(CalcError::UnboundRoot.ui_message(), "Error");
        assert_eq!(CalcError::TooManyOps.ui_message(), "Error");
    }
}
