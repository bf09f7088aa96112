//! Name a metric after a call site's return value and mark or count it.
//!
//! Three naming strategies are available, each as a `mark_*` and a `count_*`
//! entry point: the value's `Display` output, a named accessor on the value
//! ([`Accessors`]), or a [`NameHelper`] looked up by identifier in a
//! [`HelperRegistry`]. Derivation never fails toward the caller; a fallback
//! suffix from [`naming`] is used instead.
//!
//! The entry points exist on an injected [`Capture`] and as free functions
//! reading the process-wide bindings installed by [`set_registry`],
//! [`set_log_sink`] and [`set_helpers`].

#[cfg(feature = "enable")]
#[doc(hidden)]
pub use paste::paste;

mod accessor;
mod capture;
mod error;
mod global;
mod helper;
mod log;
pub mod naming;
pub mod recorder;

pub use accessor::Accessors;
pub use capture::Capture;
pub use error::CaptureError;
pub use global::{
    count_capture, count_capture_using_helper, count_capture_with_method, mark_capture,
    mark_capture_using_helper, mark_capture_with_method,
};
pub use helper::{HelperRegistry, NameHelper};
pub use log::{LogSink, TracingSink};
pub use recorder::{MetricsRegistry, Operation};

/// Install the process-wide registry. Returns `false` if one is already set.
pub fn set_registry<R>(registry: R) -> bool
where
    R: MetricsRegistry + 'static,
{
    recorder::REGISTRY.set(Box::new(registry))
}

/// Install the process-wide log sink. Returns `false` if one is already set.
pub fn set_log_sink<S>(sink: S) -> bool
where
    S: LogSink + 'static,
{
    recorder::LOG_SINK.set(Box::new(sink))
}

/// Install the process-wide helpers. Returns `false` if already set.
pub fn set_helpers(helpers: HelperRegistry) -> bool {
    recorder::HELPERS.set(Box::new(helpers))
}

/// Record the value of an expression and evaluate to it.
///
/// `capture!(mark, "base", expr)` names the metric after `expr`'s `Display`
/// output; `method = "name"` and `helper = "id"` select the other strategies.
#[cfg(feature = "enable")]
#[macro_export]
macro_rules! capture {
    ($op:ident, $base:expr, method = $method:expr, $value:expr) => {{
        let value = $value;
        $crate::paste! {
            $crate::[<$op _capture_with_method>](
                ::core::option::Option::Some(&value),
                $base,
                $method,
            );
        }
        value
    }};
    ($op:ident, $base:expr, helper = $helper:expr, $value:expr) => {{
        let value = $value;
        $crate::paste! {
            $crate::[<$op _capture_using_helper>](
                ::core::option::Option::Some(&value),
                $base,
                $helper,
            );
        }
        value
    }};
    ($op:ident, $base:expr, $value:expr) => {{
        let value = $value;
        $crate::paste! {
            $crate::[<$op _capture>](
                ::core::option::Option::Some(&value),
                $base,
            );
        }
        value
    }};
}

/// Like [`capture!`] for an `Option`, where `None` is recorded as a null return.
#[cfg(feature = "enable")]
#[macro_export]
macro_rules! capture_option {
    ($op:ident, $base:expr, method = $method:expr, $value:expr) => {{
        let value = $value;
        $crate::paste! {
            $crate::[<$op _capture_with_method>](
                ::core::option::Option::as_ref(&value),
                $base,
                $method,
            );
        }
        value
    }};
    ($op:ident, $base:expr, helper = $helper:expr, $value:expr) => {{
        let value = $value;
        $crate::paste! {
            $crate::[<$op _capture_using_helper>](
                ::core::option::Option::as_ref(&value),
                $base,
                $helper,
            );
        }
        value
    }};
    ($op:ident, $base:expr, $value:expr) => {{
        let value = $value;
        $crate::paste! {
            $crate::[<$op _capture>](
                ::core::option::Option::as_ref(&value),
                $base,
            );
        }
        value
    }};
}

#[cfg(not(feature = "enable"))]
#[macro_export]
macro_rules! capture {
    ($op:ident, $base:expr, method = $method:expr, $value:expr) => {
        $value
    };
    ($op:ident, $base:expr, helper = $helper:expr, $value:expr) => {
        $value
    };
    ($op:ident, $base:expr, $value:expr) => {
        $value
    };
}

#[cfg(not(feature = "enable"))]
#[macro_export]
macro_rules! capture_option {
    ($op:ident, $base:expr, method = $method:expr, $value:expr) => {
        $value
    };
    ($op:ident, $base:expr, helper = $helper:expr, $value:expr) => {
        $value
    };
    ($op:ident, $base:expr, $value:expr) => {
        $value
    };
}
