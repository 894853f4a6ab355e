use alloc::{vec, vec::Vec};

use crate::{
    any::TypeInfo,
    dependency_resolver::DependencyResolver,
    resolver::Resolver,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
    ResolveErrorKind,
};

/// Instantiator parameter resolved from the container according to the registered lifetime of `Dep`.
pub struct Inject<Dep: ?Sized>(pub RcThreadSafety<Dep>);

impl<Dep: ?Sized + SendSafety + SyncSafety + 'static> DependencyResolver for Inject<Dep> {
    type Error = ResolveErrorKind;

    #[inline]
    fn resolve(resolver: &Resolver<'_>) -> Result<Self, Self::Error> {
        resolver.resolve().map(Self)
    }

    #[inline]
    fn dependencies() -> Vec<TypeInfo> {
        vec![TypeInfo::of::<Dep>()]
    }
}
