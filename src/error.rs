//! Module containing the definition of error types.

use thiserror::Error;

/// Enumeration of the different error kinds that stop a recovery before it starts.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The given package path is not a usable APK file.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Error message.
        message: String,
    },
    /// A custom selection was made without choosing any step.
    #[error("at least one recovery step must be selected")]
    EmptySelection,
    /// A required external tool could not be executed.
    #[error("the required dependency `{name}` is missing")]
    MissingDependency {
        /// Name of the missing dependency.
        name: String,
    },
    /// Configuration error.
    #[error("there was an error in the configuration: {message}")]
    Config {
        /// Error message.
        message: String,
    },
    /// The interactive prompt was aborted or could not be shown.
    #[error("the interactive prompt failed: {message}")]
    Prompt {
        /// Error message.
        message: String,
    },
}

impl ErrorKind {
    /// Creates an `InvalidInput` error with the given message.
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Process exit code for this kind of error.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Self::InvalidInput { .. } => 10,
            Self::EmptySelection => 20,
            Self::MissingDependency { .. } => 30,
            Self::Config { .. } => 50,
            Self::Prompt { .. } => 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorKind;

    #[test]
    fn it_exit_codes_are_non_zero() {
        let kinds = [
            ErrorKind::invalid_input("path"),
            ErrorKind::EmptySelection,
            ErrorKind::MissingDependency {
                name: "apktool".to_owned(),
            },
            ErrorKind::Config {
                message: "bad".to_owned(),
            },
            ErrorKind::Prompt {
                message: "closed".to_owned(),
            },
        ];

        for kind in &kinds {
            assert_ne!(kind.exit_code(), 0);
        }
    }

    #[test]
    fn it_display() {
        assert_eq!(
            format!(
                "{}",
                ErrorKind::MissingDependency {
                    name: "unzip".to_owned()
                }
            ),
            "the required dependency `unzip` is missing"
        );
        assert_eq!(
            format!("{}", ErrorKind::EmptySelection),
            "at least one recovery step must be selected"
        );
    }
}
