use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Class table error: {0}")]
    ClassTable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_table_error() {
        let error = AppError::ClassTable("missing column Faith".to_string());
        assert_eq!(error.to_string(), "Class table error: missing column Faith");
    }

    #[test]
    fn test_io_error_conversion() {
        fn read_missing() -> AppResult<String> {
            Ok(std::fs::read_to_string("/nonexistent/soulsheet")?)
        }
        let result = read_missing();
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
