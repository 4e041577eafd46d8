use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdgeError {
    #[error("Invalid raster dimensions: width={width}, height={height}, buffer length={len}")]
    InvalidDimension {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unable to allocate resources: {0}")]
    ResourceExhaustion(String),

    #[error("Worker failed: {0}")]
    WorkerFailure(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EdgeError {
    /// Process exit status used by the command line front end. 2 is left to
    /// clap for argument parsing errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            EdgeError::InvalidDimension { .. } => 3,
            EdgeError::ResourceExhaustion(_) => 4,
            EdgeError::WorkerFailure(_) => 5,
            EdgeError::InvalidConfig(_) => 6,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, EdgeError>;
