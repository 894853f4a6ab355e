use alloc::vec::Vec;

use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
#[error("Finalizer of `{type_info}` failed: {error}")]
pub struct FinalizeError {
    pub type_info: TypeInfo,
    pub error: anyhow::Error,
}

#[derive(thiserror::Error, Debug)]
pub enum CloseErrorKind {
    /// Every finalizer was attempted, these are the ones that failed in the order they ran.
    #[error("{} finalizer(s) failed on close", errors.len())]
    Finalize { errors: Vec<FinalizeError> },
}

impl CloseErrorKind {
    pub(crate) fn check(errors: Vec<FinalizeError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::Finalize { errors })
        }
    }
}
