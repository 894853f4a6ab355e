use crate::utils::thread_safety::RcThreadSafety;

/// Conversion of a shared concrete instance into the abstraction it is registered for.
///
/// Every type is its own abstraction. For trait objects, implement it with [`crate::upcast!`]
/// or by hand, the body is just the unsized coercion:
///
/// ```rust
/// use naive_injector::{RcThreadSafety, Upcast};
///
/// trait Greeter: Send + Sync {}
///
/// struct English;
///
/// impl Greeter for English {}
///
/// impl Upcast<dyn Greeter> for English {
///     fn upcast(this: RcThreadSafety<Self>) -> RcThreadSafety<dyn Greeter> {
///         this
///     }
/// }
/// ```
pub trait Upcast<A: ?Sized>: Sized {
    fn upcast(this: RcThreadSafety<Self>) -> RcThreadSafety<A>;
}

impl<T> Upcast<T> for T {
    #[inline]
    fn upcast(this: RcThreadSafety<Self>) -> RcThreadSafety<T> {
        this
    }
}

/// Implements [`Upcast`] from a concrete type to a trait object.
///
/// # Syntax
/// ```text
/// upcast!(Concrete => dyn Trait [+ Send + Sync ...])
/// ```
///
/// # Examples
/// ```rust
/// use naive_injector::{upcast, RcThreadSafety, Upcast};
///
/// trait UserRepo: Send + Sync {}
///
/// struct PostgresUserRepo;
///
/// impl UserRepo for PostgresUserRepo {}
///
/// upcast!(PostgresUserRepo => dyn UserRepo);
///
/// let repo: RcThreadSafety<dyn UserRepo> = Upcast::upcast(RcThreadSafety::new(PostgresUserRepo));
/// ```
#[macro_export]
macro_rules! upcast {
    ($concrete:ty => $abstraction:ty) => {
        impl $crate::Upcast<$abstraction> for $concrete {
            #[inline]
            fn upcast(this: $crate::RcThreadSafety<Self>) -> $crate::RcThreadSafety<$abstraction> {
                this
            }
        }
    };
}
