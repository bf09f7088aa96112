use core::{
    cell::UnsafeCell,
    sync::atomic::{AtomicUsize, Ordering},
};
use std::sync::Arc;

use crate::{helper::HelperRegistry, log::LogSink};

/// Registry that receives the derived metric names.
pub trait MetricsRegistry: Send + Sync {
    /// Signal a single event under `name`.
    fn mark(&self, name: &str);
    /// Increment the counter under `name`.
    fn count(&self, name: &str);
}

impl<R: MetricsRegistry + ?Sized> MetricsRegistry for Arc<R> {
    fn mark(&self, name: &str) {
        (**self).mark(name)
    }

    fn count(&self, name: &str) {
        (**self).count(name)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Operation {
    Mark,
    Count,
}

impl Operation {
    pub fn apply(self, registry: &dyn MetricsRegistry, name: &str) {
        match self {
            Self::Mark => registry.mark(name),
            Self::Count => registry.count(name),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mark => "mark",
            Self::Count => "count",
        }
    }

    pub(crate) fn verb(self) -> &'static str {
        match self {
            Self::Mark => "Marking",
            Self::Count => "Counting",
        }
    }
}

const UNSET: usize = 0;
const SETTING: usize = 1;
const SET: usize = 2;

/// Process-wide slot that can be written once and read lock-free afterwards.
pub struct BindingCell<T: ?Sized + 'static> {
    value: UnsafeCell<Option<&'static T>>,
    state: AtomicUsize,
}

unsafe impl<T: ?Sized + Sync> Send for BindingCell<T> {}
unsafe impl<T: ?Sized + Sync> Sync for BindingCell<T> {}

impl<T: ?Sized + 'static> BindingCell<T> {
    pub const fn new() -> Self {
        Self {
            value: UnsafeCell::new(None),
            state: AtomicUsize::new(UNSET),
        }
    }

    /// Returns `false` and drops `value` if the cell was already set.
    pub fn set(&self, value: Box<T>) -> bool {
        if self
            .state
            .compare_exchange(UNSET, SETTING, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            unsafe {
                self.value.get().write(Some(Box::leak(value)));
            }
            self.state.store(SET, Ordering::Release);
            true
        } else {
            false
        }
    }

    pub fn get(&self) -> Option<&'static T> {
        if self.state.load(Ordering::Acquire) != SET {
            None
        } else {
            unsafe { self.value.get().read() }
        }
    }
}

impl<T: ?Sized + 'static> Default for BindingCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub static REGISTRY: BindingCell<dyn MetricsRegistry> = BindingCell::new();
pub static LOG_SINK: BindingCell<dyn LogSink> = BindingCell::new();
pub static HELPERS: BindingCell<HelperRegistry> = BindingCell::new();
