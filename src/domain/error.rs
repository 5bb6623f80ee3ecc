//! Domain error types.

use crate::domain::submission::SubmissionError;

/// Top-level error type for dealdesk.
#[derive(Debug, thiserror::Error)]
pub enum DealdeskError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("deal not found: {id}")]
    DealNotFound { id: String },

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DealdeskError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            DealdeskError::Io(_) | DealdeskError::Csv(_) | DealdeskError::Json(_) => 1,
            DealdeskError::ConfigParse { .. } | DealdeskError::ConfigInvalid { .. } => 2,
            DealdeskError::DataSource { .. } => 3,
            DealdeskError::Submission(_) => 4,
            DealdeskError::DealNotFound { .. } => 5,
        }
    }
}

impl From<&DealdeskError> for std::process::ExitCode {
    fn from(err: &DealdeskError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = DealdeskError::ConfigInvalid {
            section: "browse".into(),
            key: "sort".into(),
            reason: "unknown sort order".into(),
        };
        assert_eq!(err.to_string(), "invalid config value [browse] sort: unknown sort order");

        let err = DealdeskError::DealNotFound { id: "d-7".into() };
        assert_eq!(err.to_string(), "deal not found: d-7");

        let err = DealdeskError::from(SubmissionError::FacilitySize);
        assert_eq!(err.to_string(), "Please enter your facility size.");
    }

    #[test]
    fn exit_codes() {
        let cases = [
            (DealdeskError::Io(std::io::Error::other("boom")), 1),
            (
                DealdeskError::ConfigParse {
                    file: "a.ini".into(),
                    reason: "bad".into(),
                },
                2,
            ),
            (
                DealdeskError::DataSource {
                    reason: "unreadable".into(),
                },
                3,
            ),
            (
                DealdeskError::Submission(SubmissionError::Tenor),
                4,
            ),
            (
                DealdeskError::DealNotFound { id: "x".into() },
                5,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.exit_code(), expected, "{err}");
        }
    }
}
