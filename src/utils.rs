pub(crate) mod thread_safety;
