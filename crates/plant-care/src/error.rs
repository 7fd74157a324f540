use llm_common::LlmClientError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("error fetching the PDF file: {0}")]
    Network(String),

    #[error("URL did not point to a PDF file: {0}")]
    Format(String),

    #[error("error reading the PDF file: {0}")]
    Parse(String),

    #[error("care model request failed: {0}")]
    ExternalService(String),

    #[error("an unexpected error occurred: {0}")]
    Unexpected(String),
}

impl From<LlmClientError> for AppError {
    fn from(e: LlmClientError) -> Self {
        match e {
            LlmClientError::MissingApiKey | LlmClientError::InvalidConfig(_) => {
                AppError::Config(e.to_string())
            }
            other => AppError::ExternalService(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network(e.to_string())
    }
}
