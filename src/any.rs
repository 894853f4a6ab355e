use alloc::collections::BTreeMap;
use core::{
    any::{type_name, TypeId},
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
};

use crate::utils::thread_safety::RcAnyThreadSafety;

/// Identity of a type known to the container.
///
/// Equality, ordering and hashing use only [`TypeId`], the name is kept for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for TypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Type name without the module path, e.g. `Config` for `app::settings::Config`
    /// and `Greeter + core::marker::Send` for `dyn app::Greeter + core::marker::Send`.
    ///
    /// Generic arguments and trait object bounds keep their full paths.
    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let end = self.name.find(['<', '+']).unwrap_or(self.name.len());
        let path = &self.name[..end];
        match path.rsplit_once("::") {
            Some((prefix, _)) => &self.name[prefix.len() + 2..],
            None => self.name,
        }
    }
}

pub(crate) type Map = BTreeMap<TypeInfo, RcAnyThreadSafety>;

#[cfg(test)]
mod tests {
    use super::TypeInfo;

    mod nested {
        pub(crate) struct Config;
        pub(crate) struct Wrapper<T>(pub(crate) T);
    }

    trait Greeter {}

    #[test]
    fn test_short_name() {
        assert_eq!(TypeInfo::of::<nested::Config>().short_name(), "Config");
        assert_eq!(TypeInfo::of::<u8>().short_name(), "u8");
        assert!(TypeInfo::of::<nested::Wrapper<nested::Config>>().short_name().starts_with("Wrapper<"));
        assert_eq!(TypeInfo::of::<dyn Greeter>().short_name(), "Greeter");
    }

    #[test]
    fn test_short_name_trait_object_bounds() {
        let short_name = TypeInfo::of::<dyn Greeter + Send>().short_name();
        assert!(short_name.starts_with("Greeter"), "{short_name}");
        assert!(short_name.ends_with("Send"), "{short_name}");

        let short_name = TypeInfo::of::<dyn Greeter + Send + Sync>().short_name();
        assert!(short_name.starts_with("Greeter"), "{short_name}");
    }

    #[test]
    fn test_eq_by_id() {
        assert_eq!(TypeInfo::of::<nested::Config>(), TypeInfo::of::<nested::Config>());
        assert_ne!(TypeInfo::of::<nested::Config>(), TypeInfo::of::<u8>());
    }
}
