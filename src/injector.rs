use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::{
    any::TypeInfo,
    cache::Cache,
    errors::{CloseErrorKind, ResolveErrorKind},
    finalizer::finalize_cache,
    handle::Instance,
    registry::{RegistrationInfo, RegistrationTable},
    resolver::Resolver,
    scope::Scope,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

const ROOT_SCOPE_ID: usize = 0;

/// Root container built by [`crate::Registry::build`].
///
/// Owns the singleton cache and its own scoped cache, used for scoped registrations resolved
/// directly through the injector. Clones share the same state.
#[derive(Clone)]
pub struct Injector {
    pub(crate) inner: RcThreadSafety<InjectorInner>,
}

impl Injector {
    #[inline]
    #[must_use]
    pub(crate) fn new(table: RegistrationTable) -> Self {
        Self {
            inner: RcThreadSafety::new(InjectorInner {
                table,
                singletons: Mutex::new(Cache::new()),
                root: Mutex::new(Cache::new()),
                next_scope_id: AtomicUsize::new(ROOT_SCOPE_ID + 1),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Begins a new scope with an empty scoped cache.
    #[inline]
    #[must_use]
    pub fn begin_scope(&self) -> Scope {
        let id = self.inner.next_scope_id.fetch_add(1, Ordering::Relaxed);
        debug!(scope = id, "Scope begun");
        Scope::new(self.inner.clone(), id)
    }

    /// Resolves the abstraction `Dep` in the injector's own scope.
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

    /// # Errors
    /// Same as [`Injector::resolve`].
    #[inline]
    pub fn resolve_dyn(&self, type_info: TypeInfo) -> Result<Instance, ResolveErrorKind> {
        self.resolver().resolve_dyn(type_info)
    }

    #[inline]
    #[must_use]
    pub fn registration(&self, abstraction: &TypeInfo) -> Option<RegistrationInfo> {
        self.inner.table.info(abstraction)
    }

    /// All registrations, ordered by abstraction.
    #[inline]
    pub fn registrations(&self) -> impl Iterator<Item = RegistrationInfo> + '_ {
        self.inner.table.infos()
    }

    /// Finalizes the instances cached in the injector's own scope, then the singletons, and clears both caches.
    ///
    /// After the call every resolution through the injector, its clones and the scopes begun from it
    /// fails with [`ResolveErrorKind::InjectorClosed`]. Scopes that are still open keep their scoped
    /// instances until they are closed or dropped. Closing again is a no-op.
    ///
    /// # Errors
    /// [`CloseErrorKind::Finalize`] with the errors of the failed finalizers.
    pub fn close(&self) -> Result<(), CloseErrorKind> {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            debug!("Injector already closed");
            return Ok(());
        }
        self.inner.finalize()
    }

    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    #[inline]
    #[must_use]
    pub(crate) fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.inner, &self.inner.root, ROOT_SCOPE_ID)
    }
}

pub(crate) struct InjectorInner {
    pub(crate) table: RegistrationTable,
    pub(crate) singletons: Mutex<Cache>,
    pub(crate) root: Mutex<Cache>,
    next_scope_id: AtomicUsize,
    closed: AtomicBool,
}

impl InjectorInner {
    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn finalize(&self) -> Result<(), CloseErrorKind> {
        let mut errors = Vec::new();
        finalize_cache(&self.root, &self.table, &mut errors);
        finalize_cache(&self.singletons, &self.table, &mut errors);
        debug!("Injector closed");

        CloseErrorKind::check(errors)
    }
}

impl Drop for InjectorInner {
    fn drop(&mut self) {
        if let Err(err) = self.finalize() {
            error!("Injector closed on drop with errors: {}", err);
        }
    }
}
