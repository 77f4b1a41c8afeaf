use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("variable {name} not present in the data")]
    MissingVariable { name: String },

    #[error("estimation sample is empty after listwise deletion")]
    EmptySample,

    #[error("design matrix is singular or not positive definite")]
    Singular,

    #[error("model did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("outcome for a logistic model must be 0/1, found {value}")]
    NonBinaryOutcome { value: f64 },

    #[error("too few observations: {rows} rows for {parameters} parameters")]
    TooFewObservations { rows: usize, parameters: usize },
}

pub type Result<T> = std::result::Result<T, StatsError>;
