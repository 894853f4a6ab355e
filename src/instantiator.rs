use alloc::{boxed::Box, vec::Vec};
use tracing::debug;

use super::{
    dependency_resolver::DependencyResolver,
    errors::{InstantiateErrorKind, InstantiatorResult, ResolveErrorKind},
};
use crate::{
    any::TypeInfo,
    resolver::Resolver,
    upcast::Upcast,
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// Factory of a registered type.
///
/// Implemented for functions and closures whose parameters are all [`DependencyResolver`]s
/// and which return `Result<Provides, Error>`.
/// The parameter list is the full dependency list of the produced type.
pub trait Instantiator<Deps>: 'static
where
    Deps: DependencyResolver,
{
    type Provides: 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&self, dependencies: Deps) -> Result<Self::Provides, Self::Error>;

    #[inline]
    #[must_use]
    fn dependencies() -> Vec<TypeInfo> {
        Deps::dependencies()
    }
}

/// A type that knows how to build itself from its dependencies.
///
/// This is the constructor used by [`crate::Registry::register`] and friends.
///
/// # Examples
/// ```rust
/// use naive_injector::{Inject, Injectable, InstantiatorResult, RcThreadSafety};
///
/// struct Database;
///
/// impl Injectable for Database {
///     type Deps = ();
///
///     fn inject((): ()) -> InstantiatorResult<Self> {
///         Ok(Database)
///     }
/// }
///
/// struct UserService {
///     db: RcThreadSafety<Database>,
/// }
///
/// impl Injectable for UserService {
///     type Deps = (Inject<Database>,);
///
///     fn inject((Inject(db),): Self::Deps) -> InstantiatorResult<Self> {
///         Ok(UserService { db })
///     }
/// }
/// ```
pub trait Injectable: Sized + 'static {
    type Deps: DependencyResolver;

    fn inject(dependencies: Self::Deps) -> InstantiatorResult<Self>;
}

#[cfg(feature = "thread_safe")]
pub(crate) type BoxedInstantiator = Box<dyn Fn(&Resolver<'_>) -> Result<RcAnyThreadSafety, ResolveErrorKind> + Send + Sync>;
#[cfg(not(feature = "thread_safe"))]
pub(crate) type BoxedInstantiator = Box<dyn Fn(&Resolver<'_>) -> Result<RcAnyThreadSafety, ResolveErrorKind>>;

/// Stores `dependency` as the abstraction `A`, erased for the caches.
#[inline]
#[must_use]
fn erase<A, Provides>(dependency: Provides) -> RcAnyThreadSafety
where
    A: ?Sized + SendSafety + SyncSafety + 'static,
    Provides: Upcast<A>,
{
    let dependency: RcThreadSafety<A> = Upcast::upcast(RcThreadSafety::new(dependency));
    RcThreadSafety::new(dependency)
}

#[must_use]
pub(crate) fn boxed_instantiator<A, Inst, Deps>(instantiator: Inst) -> BoxedInstantiator
where
    A: ?Sized + SendSafety + SyncSafety + 'static,
    Inst: Instantiator<Deps, Error = InstantiateErrorKind> + SendSafety + SyncSafety,
    Inst::Provides: Upcast<A>,
    Deps: DependencyResolver,
{
    Box::new(move |resolver: &Resolver<'_>| -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        let dependencies = Deps::resolve(resolver).map_err(Into::<ResolveErrorKind>::into)?;
        let dependency = instantiator.instantiate(dependencies)?;

        debug!("Instantiated");

        Ok(erase::<A, _>(dependency))
    })
}

#[must_use]
pub(crate) fn boxed_injectable<A, T>() -> BoxedInstantiator
where
    A: ?Sized + SendSafety + SyncSafety + 'static,
    T: Injectable + Upcast<A>,
{
    Box::new(|resolver: &Resolver<'_>| -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        let dependencies = T::Deps::resolve(resolver).map_err(Into::<ResolveErrorKind>::into)?;
        let dependency = T::inject(dependencies)?;

        debug!("Instantiated");

        Ok(erase::<A, _>(dependency))
    })
}

macro_rules! impl_instantiator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Response, Err, $($ty,)*> Instantiator<($($ty,)*)> for F
        where
            F: Fn($($ty,)*) -> Result<Response, Err> + 'static,
            Response: 'static,
            Err: Into<InstantiateErrorKind>,
            $( $ty: DependencyResolver, )*
        {
            type Provides = Response;
            type Error = Err;

            #[inline]
            fn instantiate(&self, ($($ty,)*): ($($ty,)*)) -> Result<Self::Provides, Self::Error> {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_instantiator);

/// Wrapper to create an instantiator that just returns passed value.
/// It can be used when the value was created outside the container.
///
/// Every call of the instantiator returns a new clone, so the registered lifetime decides
/// how many clones are made: one per resolution for transient, one per scope for scoped, one for singleton.
#[inline]
#[must_use]
pub fn instance<T: Clone + 'static>(val: T) -> impl Instantiator<(), Provides = T, Error = InstantiateErrorKind> {
    move || Ok(val.clone())
}
