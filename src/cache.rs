use alloc::collections::vec_deque::VecDeque;
use core::mem;

use crate::{
    any::{self, TypeInfo},
    utils::thread_safety::RcAnyThreadSafety,
};

#[derive(Default)]
pub(crate) struct Cache {
    pub(crate) map: any::Map,
    pub(crate) resolved: ResolvedSet,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, type_info: &TypeInfo) -> Option<RcAnyThreadSafety> {
        self.map.get(type_info).cloned()
    }

    /// Returns the cached instance and whether `value` was the one stored.
    /// An instance cached before the call wins over `value`.
    pub(crate) fn insert_if_absent(&mut self, type_info: TypeInfo, value: RcAnyThreadSafety) -> (RcAnyThreadSafety, bool) {
        use alloc::collections::btree_map::Entry::{Occupied, Vacant};

        match self.map.entry(type_info) {
            Occupied(entry) => (entry.get().clone(), false),
            Vacant(entry) => (entry.insert(value).clone(), true),
        }
    }

    #[inline]
    pub(crate) fn push_resolved(&mut self, resolved: Resolved) {
        self.resolved.push(resolved);
    }

    #[inline]
    #[must_use]
    pub(crate) fn take_resolved_set(&mut self) -> ResolvedSet {
        mem::take(&mut self.resolved)
    }

    #[inline]
    #[must_use]
    pub(crate) fn take_map(&mut self) -> any::Map {
        mem::take(&mut self.map)
    }
}

pub(crate) struct Resolved {
    pub(crate) type_info: TypeInfo,
    pub(crate) dependency: RcAnyThreadSafety,
}

/// Instances with a finalizer, in the order they were first cached.
#[derive(Default)]
pub(crate) struct ResolvedSet(pub(crate) VecDeque<Resolved>);

impl ResolvedSet {
    pub(crate) fn push(&mut self, resolved: Resolved) {
        self.0.push_back(resolved);
    }
}

#[cfg(test)]
mod tests {
    use super::{Cache, Resolved};
    use crate::{any::TypeInfo, utils::thread_safety::RcThreadSafety};

    #[test]
    fn test_insert_if_absent_keeps_first() {
        let mut cache = Cache::new();
        let type_info = TypeInfo::of::<u8>();

        let (first, inserted) = cache.insert_if_absent(type_info, RcThreadSafety::new(RcThreadSafety::new(1u8)));
        assert!(inserted);

        let (second, inserted) = cache.insert_if_absent(type_info, RcThreadSafety::new(RcThreadSafety::new(2u8)));
        assert!(!inserted);
        assert!(RcThreadSafety::ptr_eq(&first, &second));
        assert_eq!(**second.downcast_ref::<RcThreadSafety<u8>>().unwrap(), 1);
    }

    #[test]
    fn test_take_clears() {
        let mut cache = Cache::new();
        let type_info = TypeInfo::of::<u8>();
        let (dependency, _) = cache.insert_if_absent(type_info, RcThreadSafety::new(RcThreadSafety::new(1u8)));
        cache.push_resolved(Resolved { type_info, dependency });

        assert_eq!(cache.take_resolved_set().0.len(), 1);
        assert_eq!(cache.take_map().len(), 1);
        assert!(cache.get(&type_info).is_none());
        assert!(cache.resolved.0.is_empty());
    }
}
