use alloc::{collections::BTreeMap, vec::Vec};
use tracing::{debug, warn};

use super::errors::InstantiateErrorKind;
use crate::{
    any::TypeInfo,
    dependency_resolver::DependencyResolver,
    finalizer::{boxed_finalizer, BoxedFinalizer, Finalizer},
    injector::Injector,
    instantiator::{boxed_injectable, boxed_instantiator, BoxedInstantiator, Injectable, Instantiator},
    lifetime::Lifetime,
    upcast::Upcast,
    utils::thread_safety::{SendSafety, SyncSafety},
};

/// Builder of the registration table.
///
/// Every abstraction has at most one registration, registering it again replaces the previous one.
///
/// # Examples
/// ```rust
/// use naive_injector::{upcast, Inject, Injectable, InstantiatorResult, Lifetime, RcThreadSafety, Registry};
///
/// trait UserRepo: Send + Sync {
///     fn name(&self) -> &'static str;
/// }
///
/// struct PostgresUserRepo;
///
/// impl UserRepo for PostgresUserRepo {
///     fn name(&self) -> &'static str {
///         "postgres"
///     }
/// }
///
/// impl Injectable for PostgresUserRepo {
///     type Deps = ();
///
///     fn inject((): ()) -> InstantiatorResult<Self> {
///         Ok(PostgresUserRepo)
///     }
/// }
///
/// upcast!(PostgresUserRepo => dyn UserRepo);
///
/// struct CreateUser {
///     repo: RcThreadSafety<dyn UserRepo>,
/// }
///
/// let injector = Registry::new()
///     .register_scoped_as::<dyn UserRepo, PostgresUserRepo>()
///     .provide(Lifetime::Transient, |Inject(repo): Inject<dyn UserRepo>| Ok(CreateUser { repo }))
///     .build();
///
/// let scope = injector.begin_scope();
/// let interactor = scope.resolve::<CreateUser>().unwrap();
/// assert_eq!(interactor.repo.name(), "postgres");
/// ```
#[derive(Default)]
pub struct Registry {
    registrations: BTreeMap<TypeInfo, Registration>,
    finalizers: BTreeMap<TypeInfo, BoxedFinalizer>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            registrations: BTreeMap::new(),
            finalizers: BTreeMap::new(),
        }
    }

    /// Registers `T` as its own abstraction with transient lifetime.
    #[inline]
    #[must_use]
    pub fn register<T>(self) -> Self
    where
        T: Injectable + SendSafety + SyncSafety,
    {
        self.register_with::<T>(Lifetime::Transient)
    }

    #[inline]
    #[must_use]
    pub fn register_singleton<T>(self) -> Self
    where
        T: Injectable + SendSafety + SyncSafety,
    {
        self.register_with::<T>(Lifetime::Singleton)
    }

    #[inline]
    #[must_use]
    pub fn register_scoped<T>(self) -> Self
    where
        T: Injectable + SendSafety + SyncSafety,
    {
        self.register_with::<T>(Lifetime::Scoped)
    }

    #[inline]
    #[must_use]
    pub fn register_with<T>(self, lifetime: Lifetime) -> Self
    where
        T: Injectable + SendSafety + SyncSafety,
    {
        self.register_as_with::<T, T>(lifetime)
    }

    /// Registers `C` as the implementation of abstraction `A` with transient lifetime.
    #[inline]
    #[must_use]
    pub fn register_as<A, C>(self) -> Self
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        C: Injectable + Upcast<A>,
    {
        self.register_as_with::<A, C>(Lifetime::Transient)
    }

    #[inline]
    #[must_use]
    pub fn register_singleton_as<A, C>(self) -> Self
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        C: Injectable + Upcast<A>,
    {
        self.register_as_with::<A, C>(Lifetime::Singleton)
    }

    #[inline]
    #[must_use]
    pub fn register_scoped_as<A, C>(self) -> Self
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        C: Injectable + Upcast<A>,
    {
        self.register_as_with::<A, C>(Lifetime::Scoped)
    }

    #[inline]
    #[must_use]
    pub fn register_as_with<A, C>(mut self, lifetime: Lifetime) -> Self
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        C: Injectable + Upcast<A>,
    {
        self.add_registration(
            TypeInfo::of::<A>(),
            Registration {
                concrete: TypeInfo::of::<C>(),
                lifetime,
                dependencies: C::Deps::dependencies(),
                instantiator: boxed_injectable::<A, C>(),
                finalizer: None,
            },
        );
        self
    }

    /// Registers the type provided by `instantiator` as its own abstraction.
    ///
    /// The instantiator parameters are its dependencies, see [`Instantiator`].
    #[inline]
    #[must_use]
    pub fn provide<Inst, Deps>(self, lifetime: Lifetime, instantiator: Inst) -> Self
    where
        Inst: Instantiator<Deps, Error = InstantiateErrorKind> + SendSafety + SyncSafety,
        Inst::Provides: SendSafety + SyncSafety,
        Deps: DependencyResolver,
    {
        self.provide_as::<Inst::Provides, Inst, Deps>(lifetime, instantiator)
    }

    /// Registers the type provided by `instantiator` as the implementation of abstraction `A`.
    #[inline]
    #[must_use]
    pub fn provide_as<A, Inst, Deps>(mut self, lifetime: Lifetime, instantiator: Inst) -> Self
    where
        A: ?Sized + SendSafety + SyncSafety + 'static,
        Inst: Instantiator<Deps, Error = InstantiateErrorKind> + SendSafety + SyncSafety,
        Inst::Provides: Upcast<A>,
        Deps: DependencyResolver,
    {
        self.add_registration(
            TypeInfo::of::<A>(),
            Registration {
                concrete: TypeInfo::of::<Inst::Provides>(),
                lifetime,
                dependencies: Inst::dependencies(),
                instantiator: boxed_instantiator::<A, Inst, Deps>(instantiator),
                finalizer: None,
            },
        );
        self
    }

    /// Adds a finalizer for the given abstraction.
    /// The finalizer is called when the scope that cached the instance ends, or when the injector is closed
    /// for singletons, in LIFO order of their resolution (not the order of registration).
    ///
    /// # Warning
    /// - The finalizer is only used for singleton and scoped registrations, transient instances aren't tracked.
    ///
    /// - [`Drop`] isn't an equivalent of a finalizer, because:
    ///     1. The finalizer is called deterministically when its scope ends, while [`Drop`] waits for the last reference.
    ///     2. The finalizer can fail and its error is reported by `close`.
    #[inline]
    #[must_use]
    pub fn add_finalizer<Dep>(mut self, finalizer: impl Finalizer<Dep> + SendSafety + SyncSafety) -> Self
    where
        Dep: ?Sized + SendSafety + SyncSafety + 'static,
    {
        self.finalizers.insert(TypeInfo::of::<Dep>(), boxed_finalizer(finalizer));
        self
    }

    /// Freezes the registrations and creates the root injector.
    #[must_use]
    pub fn build(self) -> Injector {
        let Self {
            mut registrations,
            finalizers,
        } = self;

        for (type_info, finalizer) in finalizers {
            let Some(registration) = registrations.get_mut(&type_info) else {
                warn!(dependency = type_info.name, "Finalizer added for unregistered type, ignored");
                continue;
            };
            if !registration.lifetime.is_cached() {
                warn!(dependency = type_info.name, "Finalizer added for transient type, it won't be called");
            }
            registration.finalizer = Some(finalizer);
        }

        debug!(registrations = registrations.len(), "Registry built");

        Injector::new(RegistrationTable { registrations })
    }
}

impl Registry {
    pub(crate) fn add_registration(&mut self, abstraction: TypeInfo, registration: Registration) -> Option<Registration> {
        let concrete = registration.concrete;
        let previous = self.registrations.insert(abstraction, registration);
        if let Some(previous) = &previous {
            warn!(
                dependency = abstraction.name,
                previous = previous.concrete.name,
                current = concrete.name,
                "Registration replaced"
            );
        }
        previous
    }
}

pub(crate) struct Registration {
    pub(crate) concrete: TypeInfo,
    pub(crate) lifetime: Lifetime,
    pub(crate) dependencies: Vec<TypeInfo>,
    pub(crate) instantiator: BoxedInstantiator,
    pub(crate) finalizer: Option<BoxedFinalizer>,
}

/// Public description of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInfo {
    pub abstraction: TypeInfo,
    pub concrete: TypeInfo,
    pub lifetime: Lifetime,
    pub dependencies: Vec<TypeInfo>,
    pub has_finalizer: bool,
}

pub(crate) struct RegistrationTable {
    registrations: BTreeMap<TypeInfo, Registration>,
}

impl RegistrationTable {
    #[inline]
    #[must_use]
    pub(crate) fn get(&self, type_info: &TypeInfo) -> Option<&Registration> {
        self.registrations.get(type_info)
    }

    #[must_use]
    pub(crate) fn info(&self, type_info: &TypeInfo) -> Option<RegistrationInfo> {
        self.registrations
            .get_key_value(type_info)
            .map(|(abstraction, registration)| registration_info(abstraction, registration))
    }

    pub(crate) fn infos(&self) -> impl Iterator<Item = RegistrationInfo> + '_ {
        self.registrations
            .iter()
            .map(|(abstraction, registration)| registration_info(abstraction, registration))
    }
}

fn registration_info(abstraction: &TypeInfo, registration: &Registration) -> RegistrationInfo {
    RegistrationInfo {
        abstraction: *abstraction,
        concrete: registration.concrete,
        lifetime: registration.lifetime,
        dependencies: registration.dependencies.clone(),
        has_finalizer: registration.finalizer.is_some(),
    }
}
