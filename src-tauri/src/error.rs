use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassGridShellError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl From<ClassGridShellError> for String {
    fn from(err: ClassGridShellError) -> Self {
        err.to_string()
    }
}
