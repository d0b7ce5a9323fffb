use thiserror::Error;

/// Broad failure category. Each kind maps to a distinct process exit code so
/// scripts can tell a network problem apart from a degenerate fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    Fetch,
    Data,
    Fit,
    Ui,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Config => 2,
            ErrorKind::Io => 3,
            ErrorKind::Fetch => 4,
            ErrorKind::Data => 5,
            ErrorKind::Fit => 6,
            ErrorKind::Ui => 7,
        }
    }

    /// Short label used when presenting the error in the shell.
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Config => "configuration error",
            ErrorKind::Io => "i/o error",
            ErrorKind::Fetch => "fetch failed",
            ErrorKind::Data => "no usable data",
            ErrorKind::Fit => "cannot fit curve",
            ErrorKind::Ui => "terminal error",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fetch, message)
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Data, message)
    }

    pub fn fit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fit, message)
    }

    pub fn ui(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Ui, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}
