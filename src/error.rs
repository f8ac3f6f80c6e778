/// Everything that can go wrong while talking to the Govee Platform API.
///
/// None of these are retried; they surface directly to the caller.
#[derive(Debug, thiserror::Error)]
pub enum GoveeError {
    /// DNS, connect, TLS or timeout failure, or a body that could
    /// not be read off the wire.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Either the HTTP status or the status embedded in the response
    /// envelope was something other than 200.
    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Rejected locally; no request was sent.
    #[error("{instance} value {value} is out of range {min}..={max}")]
    Validation {
        instance: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("device {0} not found")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl GoveeError {
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, GoveeError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            GoveeError::Api {
                code: 401,
                message: "invalid key".to_string()
            }
            .to_string(),
            "api error 401: invalid key"
        );
        assert_eq!(
            GoveeError::Validation {
                instance: "brightness",
                value: 101,
                min: 1,
                max: 100
            }
            .to_string(),
            "brightness value 101 is out of range 1..=100"
        );
        assert_eq!(
            GoveeError::NotFound("52 york".to_string()).to_string(),
            "device 52 york not found"
        );
    }

    #[test]
    fn code() {
        assert_eq!(
            GoveeError::Api {
                code: 500,
                message: String::new()
            }
            .code(),
            Some(500)
        );
        assert_eq!(GoveeError::Decode("nope".to_string()).code(), None);
    }
}
