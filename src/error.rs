use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("a grid sweep needs at least 2 subdivisions, got {0}")]
    GridTooSmall(usize),
    #[error("out of memory reserving a result grid of {cells} cells")]
    Allocation { cells: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}
