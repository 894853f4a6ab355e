use parking_lot::Mutex;
use tracing::{debug, error, field, info_span};

use crate::{
    any::TypeInfo,
    cache::{Cache, Resolved},
    errors::ResolveErrorKind,
    handle::Instance,
    injector::InjectorInner,
    lifetime::Lifetime,
    registry::Registration,
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// Resolution context passed to [`crate::DependencyResolver`]s.
///
/// Borrows the injector and the cache of the scope the resolution started in.
pub struct Resolver<'a> {
    pub(crate) injector: &'a InjectorInner,
    pub(crate) cache: &'a Mutex<Cache>,
    pub(crate) scope: usize,
}

impl<'a> Resolver<'a> {
    #[inline]
    #[must_use]
    pub(crate) const fn new(injector: &'a InjectorInner, cache: &'a Mutex<Cache>, scope: usize) -> Self {
        Self { injector, cache, scope }
    }

    /// Resolves the abstraction `Dep` according to its registered lifetime.
    ///
    /// Dependencies are resolved in the context of this resolver, including dependencies of a singleton
    /// built by this call. A singleton that depends on a scoped type keeps the instance of the scope
    /// that first resolved it.
    ///
    /// # Errors
    /// - [`ResolveErrorKind::UnregisteredType`] if `Dep` or one of its transitive dependencies isn't registered.
    /// - [`ResolveErrorKind::Instantiate`] if a factory failed.
    /// - [`ResolveErrorKind::InjectorClosed`] if the injector was closed.
    pub fn resolve<Dep>(&self) -> Result<RcThreadSafety<Dep>, ResolveErrorKind>
    where
        Dep: ?Sized + SendSafety + SyncSafety + 'static,
    {
        let type_info = TypeInfo::of::<Dep>();
        let dependency = self.resolve_erased(type_info)?;

        match dependency.downcast_ref::<RcThreadSafety<Dep>>() {
            Some(dependency) => Ok(dependency.clone()),
            None => {
                error!(dependency = type_info.name, "Incorrect instance type");
                Err(ResolveErrorKind::IncorrectType { expected: type_info })
            }
        }
    }

    /// Resolves an abstraction known only at runtime.
    ///
    /// # Errors
    /// Same as [`Resolver::resolve`].
    pub fn resolve_dyn(&self, type_info: TypeInfo) -> Result<Instance, ResolveErrorKind> {
        self.resolve_erased(type_info)
            .map(|value| Instance::new(type_info, value))
    }

    pub(crate) fn resolve_erased(&self, type_info: TypeInfo) -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        let span = info_span!(
            "resolve",
            dependency = type_info.name,
            scope = self.scope,
            lifetime = field::Empty
        );
        let _guard = span.enter();

        if self.injector.is_closed() {
            error!("Injector is closed");
            return Err(ResolveErrorKind::InjectorClosed);
        }

        let Some(registration) = self.injector.table.get(&type_info) else {
            error!("Type is not registered");
            return Err(ResolveErrorKind::UnregisteredType(type_info));
        };
        span.record("lifetime", registration.lifetime.name());

        match registration.lifetime {
            Lifetime::Transient => (registration.instantiator)(self),
            Lifetime::Scoped => self.cached(self.cache, type_info, registration),
            Lifetime::Singleton => self.cached(&self.injector.singletons, type_info, registration),
        }
    }

    /// Returns the instance cached in `cache` or builds, caches and returns a new one.
    ///
    /// The lock is released while the factory runs, so factories may resolve other cached dependencies.
    /// If two resolutions race, the instance stored first is returned to both.
    fn cached(
        &self,
        cache: &Mutex<Cache>,
        type_info: TypeInfo,
        registration: &Registration,
    ) -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        if let Some(dependency) = cache.lock().get(&type_info) {
            debug!("Found in cache");
            return Ok(dependency);
        }
        debug!("Not found in cache");

        let dependency = (registration.instantiator)(self)?;

        let mut guard = cache.lock();
        // `close` sets the flag before taking the cache
        if self.injector.is_closed() {
            error!("Injector is closed");
            return Err(ResolveErrorKind::InjectorClosed);
        }
        let (dependency, inserted) = guard.insert_if_absent(type_info, dependency);
        if !inserted {
            debug!("Cached concurrently, instance dropped");
            return Ok(dependency);
        }
        debug!("Cached");

        if registration.finalizer.is_some() {
            guard.push_resolved(Resolved {
                type_info,
                dependency: dependency.clone(),
            });
            debug!("Pushed to resolved set");
        }

        Ok(dependency)
    }
}
