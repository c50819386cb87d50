/// Raisons pour lesquelles un snapshot de worker ne peut pas être classifié.
///
/// Un snapshot invalide ne doit jamais produire un statut "healthy" :
/// la classification échoue avant le calcul du score.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatusError {
    #[error("worker {address} has not reported system metrics yet")]
    MissingMetrics { address: String },
    #[error("worker {address} reports zero cpu processors")]
    NoProcessors { address: String },
    #[error("worker {address}: {field} = {value} is outside [0, 1]")]
    FractionOutOfRange {
        address: String,
        field: &'static str,
        value: f64,
    },
    #[error("worker {address}: {field} = {value} is not a valid epoch timestamp")]
    InvalidTimestamp {
        address: String,
        field: &'static str,
        value: i64,
    },
    #[error("worker {address}: {field} = {value} is not a finite non-negative figure")]
    InvalidFigure {
        address: String,
        field: &'static str,
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_worker() {
        let err = StatusError::FractionOutOfRange {
            address: "10.0.0.7:27777".into(),
            field: "diskUsage",
            value: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "worker 10.0.0.7:27777: diskUsage = 1.5 is outside [0, 1]"
        );

        let err = StatusError::MissingMetrics { address: "w1".into() };
        assert!(err.to_string().contains("w1"));
    }
}
