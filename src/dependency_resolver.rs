use alloc::vec::Vec;

use super::errors::ResolveErrorKind;
use crate::{any::TypeInfo, resolver::Resolver};

/// Something an instantiator can take as a parameter.
///
/// Implemented by [`crate::Inject`] and by tuples of resolvers, which resolve their elements left to right.
pub trait DependencyResolver: Sized {
    type Error: Into<ResolveErrorKind>;

    fn resolve(resolver: &Resolver<'_>) -> Result<Self, Self::Error>;

    /// Types requested from the container, in resolution order.
    #[inline]
    #[must_use]
    fn dependencies() -> Vec<TypeInfo> {
        Vec::new()
    }
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case, unused_mut)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: DependencyResolver, )*
        {
            type Error = ResolveErrorKind;

            #[inline]
            #[allow(unused_variables)]
            fn resolve(resolver: &Resolver<'_>) -> Result<Self, Self::Error> {
                Ok(($($ty::resolve(resolver).map_err(Into::into)?,)*))
            }

            fn dependencies() -> Vec<TypeInfo> {
                let mut dependencies = Vec::new();
                $( dependencies.extend($ty::dependencies()); )*
                dependencies
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);

#[cfg(test)]
mod tests {
    extern crate std;

    use super::DependencyResolver;
    use crate::{any::TypeInfo, inject::Inject, lifetime::Lifetime, registry::Registry, utils::thread_safety::RcThreadSafety, ResolveErrorKind};

    use alloc::{
        format,
        string::{String, ToString as _},
        vec,
    };
    use core::sync::atomic::{AtomicU8, Ordering};
    use tracing::debug;
    use tracing_test::traced_test;

    struct Request;
    struct Response;
    struct Missing;

    #[test]
    #[allow(dead_code)]
    fn test_dependency_resolver_impls() {
        fn resolver<T: DependencyResolver>() {}
        fn resolver_with_dep<Dep: Send + Sync + 'static>() {
            resolver::<Inject<Dep>>();
            resolver::<(Inject<Dep>, Inject<Dep>)>();
            resolver::<()>();
        }
    }

    #[test]
    fn test_dependencies_order() {
        assert_eq!(
            <(Inject<Request>, Inject<Response>)>::dependencies(),
            vec![TypeInfo::of::<Request>(), TypeInfo::of::<Response>()],
        );
        assert!(<()>::dependencies().is_empty());
    }

    #[test]
    #[traced_test]
    fn test_tuple_resolves_left_to_right() {
        let position = RcThreadSafety::new(AtomicU8::new(0));
        let request_position = RcThreadSafety::new(AtomicU8::new(0));
        let response_position = RcThreadSafety::new(AtomicU8::new(0));

        let injector = Registry::new()
            .provide(Lifetime::Transient, {
                let position = position.clone();
                let request_position = request_position.clone();
                move || {
                    request_position.store(position.fetch_add(1, Ordering::SeqCst) + 1, Ordering::SeqCst);
                    debug!("Call instantiator request");
                    Ok(Request)
                }
            })
            .provide(Lifetime::Transient, {
                let position = position.clone();
                let response_position = response_position.clone();
                move || {
                    response_position.store(position.fetch_add(1, Ordering::SeqCst) + 1, Ordering::SeqCst);
                    debug!("Call instantiator response");
                    Ok(Response)
                }
            })
            .build();

        let _ = injector.resolve::<Request>().unwrap();
        position.store(0, Ordering::SeqCst);
        request_position.store(0, Ordering::SeqCst);

        let (Inject(_), Inject(_)) = <(Inject<Response>, Inject<Request>)>::resolve(&injector.resolver()).unwrap();

        assert_eq!(response_position.load(Ordering::SeqCst), 1);
        assert_eq!(request_position.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[traced_test]
    fn test_tuple_stops_at_first_missing() {
        let request_call_count = RcThreadSafety::new(AtomicU8::new(0));

        let injector = Registry::new()
            .provide(Lifetime::Transient, {
                let request_call_count = request_call_count.clone();
                move || {
                    request_call_count.fetch_add(1, Ordering::SeqCst);
                    Ok(Request)
                }
            })
            .build();

        let result = <(Inject<Missing>, Inject<Request>)>::resolve(&injector.resolver());

        assert!(matches!(result, Err(ResolveErrorKind::UnregisteredType(type_info)) if type_info == TypeInfo::of::<Missing>()));
        assert_eq!(request_call_count.load(Ordering::SeqCst), 0);
    }
}
