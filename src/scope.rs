use alloc::vec::Vec;
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::{
    any::TypeInfo,
    cache::Cache,
    errors::{CloseErrorKind, ResolveErrorKind},
    finalizer::finalize_cache,
    handle::Instance,
    injector::InjectorInner,
    resolver::Resolver,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

/// Unit of work with its own cache of scoped instances.
///
/// Created by [`crate::Injector::begin_scope`]. Scoped registrations are instantiated at most once per scope,
/// singletons are shared with the injector and all other scopes.
///
/// The scope ends with [`Scope::close`] or when dropped, whichever comes first.
/// Finalizers of the scoped instances are called then, in reverse order of their first resolution.
pub struct Scope {
    injector: RcThreadSafety<InjectorInner>,
    cache: Mutex<Cache>,
    id: usize,
    closed: bool,
}

impl Scope {
    #[inline]
    #[must_use]
    pub(crate) fn new(injector: RcThreadSafety<InjectorInner>, id: usize) -> Self {
        Self {
            injector,
            cache: Mutex::new(Cache::new()),
            id,
            closed: false,
        }
    }

    /// Identifier of the scope in the resolution logs, unique within its injector.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Resolves the abstraction `Dep` in this scope.
    ///
    /// # Errors
    /// - [`ResolveErrorKind::UnregisteredType`] if `Dep` or one of its transitive dependencies isn't registered.
    /// - [`ResolveErrorKind::Instantiate`] if a factory failed.
    #[inline]
    pub fn resolve<Dep>(&self) -> Result<RcThreadSafety<Dep>, ResolveErrorKind>
    where
        Dep: ?Sized + SendSafety + SyncSafety + 'static,
    {
        self.resolver().resolve()
    }

    /// Resolves an abstraction known only at runtime in this scope.
    ///
    /// # Errors
    /// Same as [`Scope::resolve`].
    #[inline]
    pub fn resolve_dyn(&self, type_info: TypeInfo) -> Result<Instance, ResolveErrorKind> {
        self.resolver().resolve_dyn(type_info)
    }

    /// Ends the scope: calls the finalizers of the scoped instances and releases the cache.
    ///
    /// Every finalizer is called even if some of them fail.
    ///
    /// # Errors
    /// [`CloseErrorKind::Finalize`] with the errors of the failed finalizers.
    pub fn close(mut self) -> Result<(), CloseErrorKind> {
        self.closed = true;
        self.finalize()
    }

    #[inline]
    #[must_use]
    pub(crate) fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.injector, &self.cache, self.id)
    }

    fn finalize(&self) -> Result<(), CloseErrorKind> {
        let mut errors = Vec::new();
        finalize_cache(&self.cache, &self.injector.table, &mut errors);
        debug!(scope = self.id, "Scope closed");

        CloseErrorKind::check(errors)
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.finalize() {
            error!(scope = self.id, "Scope closed on drop with errors: {}", err);
        }
    }
}
