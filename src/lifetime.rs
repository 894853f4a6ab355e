use core::fmt::{self, Display, Formatter};

/// Policy governing how resolved instances are reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lifetime {
    /// A new instance on every resolution, never cached.
    Transient,
    /// One instance per [`crate::Injector`], shared by every scope begun from it.
    Singleton,
    /// One instance per [`crate::Scope`].
    /// Resolving through the injector itself uses the injector's own scoped cache.
    Scoped,
}

impl Lifetime {
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Lifetime::Transient => "transient",
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        matches!(self, Lifetime::Singleton | Lifetime::Scoped)
    }
}

impl Display for Lifetime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
