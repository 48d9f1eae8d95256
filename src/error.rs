#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Fatal(String),

    #[error("Authentication failed: {message}")]
    Auth {
        message: String,
        error_code: Option<i32>,
    },

    #[error("SMS confirmation required")]
    SecondFactorRequired { phone: Option<String> },

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("API error: {message}")]
    Api {
        message: String,
        error_code: Option<i32>,
    },

    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Input closed")]
    InputClosed,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InputClosed => 0,
            _ => 1,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Fatal(_) => "fatal",
            AppError::Auth { .. } => "auth",
            AppError::SecondFactorRequired { .. } => "second_factor_required",
            AppError::NotAuthenticated => "not_authenticated",
            AppError::MalformedPayload(_) => "malformed_payload",
            AppError::Api { .. } => "api",
            AppError::Keychain(_) => "keychain",
            AppError::Settings(_) => "settings",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::InputClosed => "input_closed",
            AppError::Http(_) => "http",
            AppError::Json(_) => "json",
            AppError::Io(_) => "io",
        }
    }

    pub fn api_error_code(&self) -> Option<i32> {
        match self {
            AppError::Auth { error_code, .. } | AppError::Api { error_code, .. } => *error_code,
            _ => None,
        }
    }
}
