#![no_std]

extern crate alloc;

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod cache;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod finalizer;
pub(crate) mod handle;
pub(crate) mod inject;
pub(crate) mod injector;
pub(crate) mod instantiator;
pub(crate) mod lifetime;
pub(crate) mod registry;
pub(crate) mod resolver;
pub(crate) mod scope;
pub(crate) mod upcast;
pub(crate) mod utils;

pub use any::TypeInfo;
pub use dependency_resolver::DependencyResolver;
pub use errors::{CloseErrorKind, FinalizeError, InstantiateErrorKind, InstantiatorResult, ResolveErrorKind};
pub use finalizer::Finalizer;
pub use handle::Instance;
pub use inject::Inject;
pub use injector::Injector;
pub use instantiator::{instance, Injectable, Instantiator};
pub use lifetime::Lifetime;
pub use registry::{RegistrationInfo, Registry};
pub use resolver::Resolver;
pub use scope::Scope;
pub use upcast::Upcast;
pub use utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety};
