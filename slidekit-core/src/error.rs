use thiserror::Error;

/// Configuration values the controller refuses to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("autoplay delay must be greater than zero milliseconds")]
    ZeroDelay,
    #[error("pagination window must show at least one dot")]
    ZeroPaginationDots,
}

/// Fatal construction failures. Construction stops before anything is
/// mounted, rendered or scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarouselError {
    #[error("carousel container not found")]
    ContainerNotFound,
    #[error("no slides or images provided for the carousel")]
    NoSlidesProvided,
    #[error("invalid carousel configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, CarouselError>;
