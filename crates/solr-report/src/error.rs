#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Input file {0} was not found")]
    InputPath(String),

    #[error("Cannot write report to {0}")]
    OutputPath(String, #[source] std::io::Error),
}
