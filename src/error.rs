//! Errors raised while loading a diagram description

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read diagram file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse diagram TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = LoadError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing.toml",
        ));
        assert!(err.to_string().starts_with("Failed to read diagram file"));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_toml_error_display() {
        let err = LoadError::from(toml::from_str::<toml::Value>("nodes = [").unwrap_err());
        assert!(err.to_string().starts_with("Failed to parse diagram TOML"));
    }
}
