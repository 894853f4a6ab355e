mod close;
mod instantiate;
mod resolve;

pub use close::{CloseErrorKind, FinalizeError};
pub use instantiate::InstantiateErrorKind;
pub use resolve::ResolveErrorKind;

pub type InstantiatorResult<T> = Result<T, InstantiateErrorKind>;
