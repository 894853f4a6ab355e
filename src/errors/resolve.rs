use super::instantiate::InstantiateErrorKind;
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    /// The requested type, or one of its transitive dependencies, has no registration.
    #[error("Type `{0}` is not registered")]
    UnregisteredType(TypeInfo),
    /// The injector was closed, its singletons are finalized and no longer served.
    #[error("Injector is closed")]
    InjectorClosed,
    /// The cached instance doesn't downcast to the requested abstraction.
    ///
    /// Instances are always stored as the abstraction they are registered for,
    /// so this variant signals a broken internal invariant and isn't returned through the public API.
    #[doc(hidden)]
    #[error("Incorrect instance type stored for `{expected}`")]
    IncorrectType { expected: TypeInfo },
    #[error(transparent)]
    Instantiate(#[from] InstantiateErrorKind),
}
