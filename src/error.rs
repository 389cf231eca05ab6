use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug)]
pub enum PipelineError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(String),
    Adapter(String),
    Other(String),
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io(e)      => Some(e),
            PipelineError::Json(e)    => Some(e),
            PipelineError::Config(_)  => None,
            PipelineError::Adapter(_) => None,
            PipelineError::Other(_)   => None,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self { PipelineError::Io(e) }
}
impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self { PipelineError::Json(e) }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PipelineError::Io(e) => write!(f, "IO error: {}", e),
            PipelineError::Json(e) => write!(f, "JSON error: {}", e),
            PipelineError::Config(e) => write!(f, "Config error: {}", e),
            PipelineError::Adapter(e) => write!(f, "Adapter error: {}", e),
            PipelineError::Other(e) => write!(f, "Other error: {}", e),
        }
    }
}
