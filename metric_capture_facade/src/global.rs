//! Entry points bound to the process-wide registry, log sink and helpers.
//!
//! Until [`set_registry`](crate::set_registry) has been called these still
//! resolve the name, but only report it at debug level instead of recording it.

use core::{
    any::Any,
    fmt::{Debug, Display},
};

use crate::{
    accessor::Accessors,
    capture::Dispatch,
    helper::HelperRegistry,
    log::TracingSink,
    recorder::{Operation, HELPERS, LOG_SINK, REGISTRY},
};

static NO_HELPERS: HelperRegistry = HelperRegistry::new();

fn dispatch() -> Dispatch<'static> {
    Dispatch {
        registry: REGISTRY.get(),
        log: LOG_SINK.get().unwrap_or(&TracingSink),
        helpers: HELPERS.get().unwrap_or(&NO_HELPERS),
    }
}

pub fn mark_capture<T>(value: Option<&T>, base: &str)
where
    T: Display + Debug + ?Sized,
{
    dispatch().capture(Operation::Mark, value, base)
}

pub fn mark_capture_with_method<T>(value: Option<&T>, base: &str, method: &str)
where
    T: Accessors + Debug + ?Sized,
{
    dispatch().capture_with_method(Operation::Mark, value, base, method)
}

pub fn mark_capture_using_helper<T>(value: Option<&T>, base: &str, helper: &str)
where
    T: Any + Debug,
{
    dispatch().capture_using_helper(Operation::Mark, value, base, helper)
}

pub fn count_capture<T>(value: Option<&T>, base: &str)
where
    T: Display + Debug + ?Sized,
{
    dispatch().capture(Operation::Count, value, base)
}

pub fn count_capture_with_method<T>(value: Option<&T>, base: &str, method: &str)
where
    T: Accessors + Debug + ?Sized,
{
    dispatch().capture_with_method(Operation::Count, value, base, method)
}

pub fn count_capture_using_helper<T>(value: Option<&T>, base: &str, helper: &str)
where
    T: Any + Debug,
{
    dispatch().capture_using_helper(Operation::Count, value, base, helper)
}
