use std::path::Path;

/// Application error carrying the process exit code.
///
/// Exit code conventions:
///
/// - `2`: input/config/IO problems (missing or unreadable files, missing
///   columns, unresolved configuration)
/// - `4`: data/processing problems (anything unexpected past validation)
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

    /// Input/config/IO error (exit code 2).
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Data/processing error (exit code 4).
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    /// Classify an I/O error on `path`.
    ///
    /// Access-denied and missing-file conditions get distinct messages since
    /// they are the two failure modes operators actually hit (the base
    /// workbook tends to live on a synced network share).
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::PermissionDenied => {
                Self::input(format!("Permission denied accessing '{}'.", path.display()))
            }
            ErrorKind::NotFound => Self::input(format!("File not found: '{}'.", path.display())),
            _ => Self::input(format!("I/O error on '{}': {err}", path.display())),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};
    use std::path::PathBuf;

    #[test]
    fn io_errors_are_classified() {
        let path = PathBuf::from("base.xlsx");

        let denied = AppError::from_io(&path, Error::new(ErrorKind::PermissionDenied, "nope"));
        assert_eq!(denied.exit_code(), 2);
        assert!(denied.to_string().contains("Permission denied"));

        let missing = AppError::from_io(&path, Error::new(ErrorKind::NotFound, "gone"));
        assert!(missing.to_string().contains("File not found"));
    }
}
