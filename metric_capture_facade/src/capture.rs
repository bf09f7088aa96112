use core::{
    any::{type_name, Any},
    fmt::{self, Debug, Display},
};
use std::sync::Arc;

use crate::{
    accessor::Accessors,
    helper::HelperRegistry,
    log::{LogSink, Raw, TracingSink},
    naming::{self, Resolution},
    recorder::{MetricsRegistry, Operation},
};

/// Borrowed collaborators for one entry point call.
///
/// Each call logs the raw value at debug level, resolves the name, reports a
/// non-silent failure as a warning, then performs exactly one registry call.
/// Without a registry the derived name is logged at debug level instead.
pub(crate) struct Dispatch<'a> {
    pub(crate) registry: Option<&'a dyn MetricsRegistry>,
    pub(crate) log: &'a dyn LogSink,
    pub(crate) helpers: &'a HelperRegistry,
}

impl Dispatch<'_> {
    pub(crate) fn capture<T>(&self, op: Operation, value: Option<&T>, base: &str)
    where
        T: Display + Debug + ?Sized,
    {
        self.log.debug(format_args!("{} {:?}", op.verb(), Raw(value)));
        let resolution = naming::resolve(value, base);
        if let Some(e) = resolution.failure() {
            self.log.warn(format_args!(
                "Unable to get metric name from object {} cause: {}",
                type_name::<T>(),
                e
            ));
        }
        self.record(op, resolution);
    }

    pub(crate) fn capture_with_method<T>(
        &self,
        op: Operation,
        value: Option<&T>,
        base: &str,
        method: &str,
    ) where
        T: Accessors + Debug + ?Sized,
    {
        self.log.debug(format_args!(
            "{} with method {}: {:?}",
            op.verb(),
            method,
            Raw(value)
        ));
        let resolution = naming::resolve_with_method(value, base, method);
        if let Some(e) = resolution.failure().filter(|e| !e.is_silent()) {
            self.log.warn(format_args!(
                "Unable to get metric name from method {} on object {} cause: {}",
                method,
                type_name::<T>(),
                e
            ));
        }
        self.record(op, resolution);
    }

    pub(crate) fn capture_using_helper<T>(
        &self,
        op: Operation,
        value: Option<&T>,
        base: &str,
        helper: &str,
    ) where
        T: Any + Debug,
    {
        self.log.debug(format_args!(
            "{} with helper {}: {:?}",
            op.verb(),
            helper,
            Raw(value)
        ));
        let resolution = naming::resolve_using_helper(value, base, helper, self.helpers);
        if let Some(e) = resolution.failure().filter(|e| !e.is_silent()) {
            self.log.warn(format_args!(
                "Unable to get metric name helper {} with object {} cause: {}",
                helper,
                type_name::<T>(),
                e
            ));
        }
        self.record(op, resolution);
    }

    fn record(&self, op: Operation, resolution: Resolution) {
        match self.registry {
            Some(registry) => op.apply(registry, resolution.name()),
            None => self.log.debug(format_args!(
                "No metrics registry installed, dropping {} {}",
                op.as_str(),
                resolution.name()
            )),
        }
    }
}

/// Capture entry points bound to an injected registry, log sink and helper set.
#[derive(Clone)]
pub struct Capture {
    registry: Arc<dyn MetricsRegistry>,
    log: Arc<dyn LogSink>,
    helpers: Arc<HelperRegistry>,
}

impl Capture {
    pub fn new(registry: Arc<dyn MetricsRegistry>) -> Self {
        Self {
            registry,
            log: Arc::new(TracingSink),
            helpers: Arc::new(HelperRegistry::new()),
        }
    }

    pub fn with_log_sink(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    pub fn with_helpers(mut self, helpers: impl Into<Arc<HelperRegistry>>) -> Self {
        self.helpers = helpers.into();
        self
    }

    fn dispatch(&self) -> Dispatch<'_> {
        Dispatch {
            registry: Some(&*self.registry),
            log: &*self.log,
            helpers: &self.helpers,
        }
    }

    pub fn mark_capture<T>(&self, value: Option<&T>, base: &str)
    where
        T: Display + Debug + ?Sized,
    {
        self.dispatch().capture(Operation::Mark, value, base)
    }

    pub fn mark_capture_with_method<T>(&self, value: Option<&T>, base: &str, method: &str)
    where
        T: Accessors + Debug + ?Sized,
    {
        self.dispatch()
            .capture_with_method(Operation::Mark, value, base, method)
    }

    pub fn mark_capture_using_helper<T>(&self, value: Option<&T>, base: &str, helper: &str)
    where
        T: Any + Debug,
    {
        self.dispatch()
            .capture_using_helper(Operation::Mark, value, base, helper)
    }

    pub fn count_capture<T>(&self, value: Option<&T>, base: &str)
    where
        T: Display + Debug + ?Sized,
    {
        self.dispatch().capture(Operation::Count, value, base)
    }

    pub fn count_capture_with_method<T>(&self, value: Option<&T>, base: &str, method: &str)
    where
        T: Accessors + Debug + ?Sized,
    {
        self.dispatch()
            .capture_with_method(Operation::Count, value, base, method)
    }

    pub fn count_capture_using_helper<T>(&self, value: Option<&T>, base: &str, helper: &str)
    where
        T: Any + Debug,
    {
        self.dispatch()
            .capture_using_helper(Operation::Count, value, base, helper)
    }
}

impl fmt::Debug for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capture")
            .field("helpers", &self.helpers)
            .finish_non_exhaustive()
    }
}
