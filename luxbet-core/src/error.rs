use thiserror::Error;

pub type Result<T> = std::result::Result<T, LuxbetError>;

#[derive(Error, Debug)]
pub enum LuxbetError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Registration rejected: {0}")]
    Registration(String),

    #[error("Navigation not allowed: {from:?} -> {to:?}")]
    Navigation {
        from: crate::Screen,
        to: crate::Screen,
    },

    #[error("Dialog error: {0}")]
    Dialog(#[from] dialoguer::Error),
}

impl LuxbetError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn registration(msg: impl Into<String>) -> Self {
        Self::Registration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_errors_convert() {
        fn prompt() -> Result<String> {
            let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
            Err(dialoguer::Error::IO(io))?
        }

        let err = prompt().unwrap_err();
        assert!(matches!(err, LuxbetError::Dialog(_)));
        assert!(err.to_string().contains("stdin closed"));
    }

    #[test]
    fn test_helper_constructors() {
        assert_eq!(
            LuxbetError::config("bad").to_string(),
            "Invalid configuration: bad"
        );
        assert!(matches!(
            LuxbetError::registration("no"),
            LuxbetError::Registration(ref m) if m == "no"
        ));
    }
}
