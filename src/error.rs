pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("no detection backend is usable")]
    DetectionUnavailable,
    #[error("detection failed (code {code}): {message}")]
    DetectionFailed { code: i32, message: String },
    #[error("no interactive elements detected")]
    NoElementsFound,
    #[error("detected {count} hints, session cap is {max}")]
    TooManyHints { count: usize, max: usize },
}

impl From<std::io::Error> for AppError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl AppError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    pub fn detection_failed(code: i32, message: impl Into<String>) -> Self {
        Self::DetectionFailed {
            code,
            message: message.into(),
        }
    }
}
