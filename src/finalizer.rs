use alloc::{boxed::Box, vec::Vec};
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::{
    cache::{Cache, Resolved},
    errors::FinalizeError,
    registry::RegistrationTable,
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// Cleanup capability of a cached (singleton or scoped) dependency.
///
/// Transient dependencies aren't cached nor tracked, so their finalizers are never called.
pub trait Finalizer<Dep: ?Sized>: 'static {
    fn finalize(&self, dependency: RcThreadSafety<Dep>) -> Result<(), anyhow::Error>;
}

impl<F, Dep> Finalizer<Dep> for F
where
    F: Fn(RcThreadSafety<Dep>) -> Result<(), anyhow::Error> + 'static,
    Dep: ?Sized,
{
    #[inline]
    fn finalize(&self, dependency: RcThreadSafety<Dep>) -> Result<(), anyhow::Error> {
        self(dependency)
    }
}

#[cfg(feature = "thread_safe")]
pub(crate) type BoxedFinalizer = Box<dyn Fn(RcAnyThreadSafety) -> Result<(), anyhow::Error> + Send + Sync>;
#[cfg(not(feature = "thread_safe"))]
pub(crate) type BoxedFinalizer = Box<dyn Fn(RcAnyThreadSafety) -> Result<(), anyhow::Error>>;

#[must_use]
pub(crate) fn boxed_finalizer<Dep, Fin>(finalizer: Fin) -> BoxedFinalizer
where
    Dep: ?Sized + SendSafety + SyncSafety + 'static,
    Fin: Finalizer<Dep> + SendSafety + SyncSafety,
{
    Box::new(move |dependency: RcAnyThreadSafety| -> Result<(), anyhow::Error> {
        let Some(dependency) = dependency.downcast_ref::<RcThreadSafety<Dep>>() else {
            return Err(anyhow::anyhow!("Finalizer received an instance of another type"));
        };
        finalizer.finalize(dependency.clone())
    })
}

/// Calls finalizers of the instances tracked by `cache` in LIFO order and empties the cache.
///
/// A failing finalizer doesn't stop the others, its error is pushed to `errors`.
/// The cache lock isn't held while finalizers run.
pub(crate) fn finalize_cache(cache: &Mutex<Cache>, table: &RegistrationTable, errors: &mut Vec<FinalizeError>) {
    let (mut resolved_set, map) = {
        let mut guard = cache.lock();
        (guard.take_resolved_set(), guard.take_map())
    };

    while let Some(Resolved { type_info, dependency }) = resolved_set.0.pop_back() {
        let Some(finalizer) = table.get(&type_info).and_then(|registration| registration.finalizer.as_ref()) else {
            continue;
        };

        match finalizer(dependency) {
            Ok(()) => {
                debug!(dependency = type_info.name, "Finalizer called");
            }
            Err(err) => {
                error!(dependency = type_info.name, "Finalizer failed: {}", err);
                errors.push(FinalizeError { type_info, error: err });
            }
        }
    }

    drop(map);
}
