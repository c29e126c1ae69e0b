/// Shape errors raised by the numeric core.
///
/// Ordinary degenerate input (fewer than two points, zero variance) never
/// produces one of these; every component has an explicit fallback for it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("need at least 2 points, got {got}")]
    InsufficientData { got: usize },

    #[error("x has {x_len} values but y has {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    #[error("x must be strictly increasing (violated at index {index})")]
    NotStrictlyIncreasing { index: usize },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::new(4, format!("Analysis failed: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
