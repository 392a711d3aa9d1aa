pub use masterror::{AppError, AppResult};

/// Create input read error (`source` is a path or `stdin`)
pub fn input_read_error(source_name: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read '{}': {}", source_name, source))
}

/// Create output write error
pub fn output_write_error(source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to write output: {}", source))
}

/// Create usage error for arguments clap cannot check on its own
pub fn usage_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}
