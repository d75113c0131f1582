use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("No volume loaded")]
    MissingGeometry,

    #[error("Invalid volume dimensions: {nx}x{ny}x{nz}")]
    InvalidDimensions { nx: usize, ny: usize, nz: usize },

    #[error("Invalid slice spacing: {0}")]
    InvalidSpacing(f64),
}

pub type Result<T> = std::result::Result<T, SyncError>;
