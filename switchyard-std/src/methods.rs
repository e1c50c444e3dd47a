//! Late-bound router methods.

use crate::registry::HandlerRef;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use switchyard_core::Handler;

/// Handlers addressable by name.
///
/// Routes registered by name refer to these through [`HandlerRef::Method`];
/// the lookup happens at dispatch time, so a method may be defined or
/// replaced after its route was registered.
#[derive(Clone, Default)]
pub struct MethodTable {
    methods: HashMap<String, Arc<dyn Handler>>,
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.methods.keys()).finish()
    }
}

impl MethodTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or replace a method, returning the previous one.
    pub fn define<H: Handler>(
        &mut self,
        name: impl Into<String>,
        handler: H,
    ) -> Option<Arc<dyn Handler>> {
        self.methods.insert(name.into(), Arc::new(handler))
    }

    /// The method called `name`.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.methods.get(name).cloned()
    }

    /// Whether a method called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Remove a method.
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Handler>> {
        self.methods.remove(name)
    }

    /// The handler a route reference currently points to.
    pub fn resolve(&self, handler: &HandlerRef) -> Option<Arc<dyn Handler>> {
        match handler {
            HandlerRef::Explicit(handler) => Some(Arc::clone(handler)),
            HandlerRef::Method(name) => self.get(name),
        }
    }
}
