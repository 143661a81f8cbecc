use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::ports::StoreError;
use crate::shared::core::primitives::InvalidInterval;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] BookingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<InvalidInterval> for ApplicationError {
    fn from(error: InvalidInterval) -> Self {
        ApplicationError::Domain(BookingError::InvalidInterval(error))
    }
}

impl ApplicationError {
    pub fn domain(&self) -> Option<&BookingError> {
        match self {
            ApplicationError::Domain(error) => Some(error),
            ApplicationError::Store(_) => None,
        }
    }
}
