//! Naming helpers looked up by identifier at call time.
//!
//! A [`HelperRegistry`] maps string identifiers, conventionally the helper's
//! fully-qualified type path, to constructors. Every lookup builds a fresh
//! instance. Entries registered with [`HelperRegistry::register_foreign`]
//! construct a type that does not implement [`NameHelper`]; loading them
//! yields [`CaptureError::NotAHelper`].

use core::{any::Any, convert::Infallible, fmt};
use std::collections::BTreeMap;

use crate::error::CaptureError;

/// Derives a metric name fragment from a captured value.
pub trait NameHelper: Send + Sync {
    fn name(&self, value: &dyn Any) -> Result<String, CaptureError>;
}

enum Loaded {
    Helper(Box<dyn NameHelper>),
    Foreign(&'static str),
}

type Factory = Box<dyn Fn() -> Result<Loaded, String> + Send + Sync>;

#[derive(Default)]
pub struct HelperRegistry {
    factories: BTreeMap<String, Factory>,
}

impl HelperRegistry {
    pub const fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    pub fn register<H>(&mut self, id: impl Into<String>) -> &mut Self
    where
        H: NameHelper + Default + 'static,
    {
        self.register_with(id, || Ok::<_, Infallible>(H::default()))
    }

    /// Register a helper whose construction may fail.
    pub fn register_with<H, E, F>(&mut self, id: impl Into<String>, constructor: F) -> &mut Self
    where
        H: NameHelper + 'static,
        E: fmt::Display,
        F: Fn() -> Result<H, E> + Send + Sync + 'static,
    {
        let factory: Factory = Box::new(move || match constructor() {
            Ok(helper) => Ok(Loaded::Helper(Box::new(helper))),
            Err(e) => Err(e.to_string()),
        });
        self.factories.insert(id.into(), factory);
        self
    }

    /// Register a type that is constructible under `id` but cannot name values.
    pub fn register_foreign<T>(&mut self, id: impl Into<String>) -> &mut Self
    where
        T: Default + 'static,
    {
        let factory: Factory = Box::new(|| {
            drop(T::default());
            Ok(Loaded::Foreign(core::any::type_name::<T>()))
        });
        self.factories.insert(id.into(), factory);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Instantiate the helper registered under `id`.
    pub fn load(&self, id: &str) -> Result<Box<dyn NameHelper>, CaptureError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| CaptureError::HelperNotFound(id.to_owned()))?;
        match factory() {
            Ok(Loaded::Helper(helper)) => Ok(helper),
            Ok(Loaded::Foreign(type_name)) => Err(CaptureError::NotAHelper {
                helper: id.to_owned(),
                type_name,
            }),
            Err(reason) => Err(CaptureError::HelperInstantiation {
                helper: id.to_owned(),
                reason,
            }),
        }
    }
}

impl fmt::Debug for HelperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}
