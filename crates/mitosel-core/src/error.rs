use thiserror::Error;

#[derive(Error, Debug)]
pub enum MitoselError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid input shape: expected {expected}, found {found}")]
    InputShape { expected: String, found: String },

    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No ROI with id {0} in result table")]
    UnknownRoi(usize),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("Malformed result table: {0}")]
    ResultTable(String),
}

pub type Result<T> = std::result::Result<T, MitoselError>;
