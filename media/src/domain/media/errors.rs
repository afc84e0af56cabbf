#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No file attached")]
    NoFileAttached,
    #[error("Invalid extension")]
    InvalidExtension,
    #[error("Invalid file extension")]
    InvalidFileExtension,
}
