use thiserror::Error;

use crate::feed::FeedError;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("{what} is too close to zero ({value}) to compare against")]
    DegenerateReference { what: &'static str, value: f64 },
    #[error("second sample is not later than the first (dt = {0} s)")]
    NonPositiveElapsed(f64),
    #[error("aircraft is missing '{0}'")]
    MissingField(&'static str),
}
