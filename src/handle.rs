use core::fmt::{self, Debug, Formatter};

use crate::{
    any::TypeInfo,
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety},
};

/// Instance resolved by an abstraction known only at runtime.
#[derive(Clone)]
pub struct Instance {
    type_info: TypeInfo,
    value: RcAnyThreadSafety,
}

impl Instance {
    #[inline]
    #[must_use]
    pub(crate) const fn new(type_info: TypeInfo, value: RcAnyThreadSafety) -> Self {
        Self { type_info, value }
    }

    /// Abstraction the instance was resolved for.
    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// Returns the instance as `A` if it was resolved for the abstraction `A`.
    #[inline]
    #[must_use]
    pub fn downcast<A: ?Sized + 'static>(&self) -> Option<RcThreadSafety<A>> {
        self.value.downcast_ref::<RcThreadSafety<A>>().cloned()
    }

    #[inline]
    #[must_use]
    pub fn is<A: ?Sized + 'static>(&self) -> bool {
        self.value.is::<RcThreadSafety<A>>()
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance").field("type_info", &self.type_info).finish_non_exhaustive()
    }
}
