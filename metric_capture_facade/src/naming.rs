//! Metric name derivation.
//!
//! Every strategy returns a [`Resolution`]: the final name, always
//! `base + suffix`, and the failure that forced a fallback suffix, if any.
//! Nothing here logs; the dispatcher decides what to report.

use core::{
    any::{type_name, Any},
    fmt::{Display, Write},
};
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::{accessor::Accessors, error::CaptureError, helper::HelperRegistry};

/// Suffix used when there is no captured value.
pub const NULL_RETURN: &str = "_nullreturn";
/// Suffix used when the value or its accessor could not produce a name.
pub const DEFAULT: &str = "_default";
/// Suffix used when a naming helper could not be loaded or failed.
pub const INVALID_HELPER: &str = "_error_invalid_helper";

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Resolution {
    name: String,
    failure: Option<CaptureError>,
}

impl Resolution {
    fn derived(base: &str, suffix: &str) -> Self {
        Self {
            name: [base, suffix].concat(),
            failure: None,
        }
    }

    fn fallback(base: &str, suffix: &str, failure: CaptureError) -> Self {
        Self {
            name: [base, suffix].concat(),
            failure: Some(failure),
        }
    }

    fn null_return(base: &str) -> Self {
        Self::derived(base, NULL_RETURN)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_name(self) -> String {
        self.name
    }

    pub fn failure(&self) -> Option<&CaptureError> {
        self.failure.as_ref()
    }
}

/// `base` followed by the value's `Display` output.
pub fn resolve<T>(value: Option<&T>, base: &str) -> Resolution
where
    T: Display + ?Sized,
{
    let Some(value) = value else {
        return Resolution::null_return(base);
    };
    match guarded(|| stringify(value)) {
        Ok(suffix) => Resolution::derived(base, &suffix),
        Err(e) => Resolution::fallback(base, DEFAULT, e),
    }
}

/// `Display` output of `value`, or [`CaptureError::Unprintable`] if its
/// formatting reports an error.
pub fn stringify<T>(value: &T) -> Result<String, CaptureError>
where
    T: Display + ?Sized,
{
    let mut out = String::new();
    write!(out, "{value}").map_err(|_| CaptureError::Unprintable {
        type_name: type_name::<T>(),
    })?;
    Ok(out)
}

/// `base` followed by the result of the accessor named `method`.
pub fn resolve_with_method<T>(value: Option<&T>, base: &str, method: &str) -> Resolution
where
    T: Accessors + ?Sized,
{
    let Some(value) = value else {
        return Resolution::null_return(base);
    };
    match guarded(|| value.call_accessor(method)) {
        Ok(suffix) => Resolution::derived(base, &suffix),
        Err(e) => Resolution::fallback(base, DEFAULT, e),
    }
}

/// `base` followed by the fragment produced by the helper registered as `helper`.
pub fn resolve_using_helper<T>(
    value: Option<&T>,
    base: &str,
    helper: &str,
    helpers: &HelperRegistry,
) -> Resolution
where
    T: Any,
{
    let Some(value) = value else {
        return Resolution::null_return(base);
    };
    match guarded(|| helpers.load(helper)?.name(value)) {
        Ok(suffix) => Resolution::derived(base, &suffix),
        Err(e) => Resolution::fallback(base, INVALID_HELPER, e),
    }
}

fn guarded<F>(f: F) -> Result<String, CaptureError>
where
    F: FnOnce() -> Result<String, CaptureError>,
{
    catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(CaptureError::from_panic(payload)))
}
