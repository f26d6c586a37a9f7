use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
