//! Around-filter continuations.
//!
//! A [`FilterChain`] holds everything that runs after the before stage: the
//! applicable around filters, the handler and the after filters. Walking the
//! chain is explicit continuation passing: each around filter receives a
//! [`Proceed`] value for the rest of the chain and nothing runs unless that
//! value is consumed.

use crate::error::BoxError;
use crate::filter::{AfterFilter, AroundFilter, Handler};
use crate::params::Params;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The around filters, handler and after filters of one dispatch.
pub struct FilterChain {
    route: String,
    params: Params,
    around: Vec<Arc<dyn AroundFilter>>,
    handler: Arc<dyn Handler>,
    after: Vec<Arc<dyn AfterFilter>>,
    handled: AtomicBool,
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("route", &self.route)
            .field("params", &self.params)
            .field("around", &self.around.len())
            .field("after", &self.after.len())
            .field("handled", &self.handled())
            .finish()
    }
}

impl FilterChain {
    /// A chain that runs `handler` directly.
    pub fn new(route: impl Into<String>, params: Params, handler: Arc<dyn Handler>) -> Self {
        Self {
            route: route.into(),
            params,
            around: Vec::new(),
            handler,
            after: Vec::new(),
            handled: AtomicBool::new(false),
        }
    }

    /// Around filters, outermost first.
    pub fn with_around(mut self, around: Vec<Arc<dyn AroundFilter>>) -> Self {
        self.around = around;
        self
    }

    /// After filters, in run order.
    pub fn with_after(mut self, after: Vec<Arc<dyn AfterFilter>>) -> Self {
        self.after = after;
        self
    }

    /// The continuation for the outermost around filter.
    pub fn start(self: &Arc<Self>) -> Proceed {
        Proceed {
            chain: Arc::clone(self),
            index: 0,
        }
    }

    /// Whether the handler has executed successfully.
    pub fn handled(&self) -> bool {
        self.handled.load(Ordering::Acquire)
    }

    /// The route name.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// The parameter mapping.
    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// A one-shot continuation for the remainder of a [`FilterChain`].
///
/// `Proceed` is `Send + 'static`: an around filter may call it synchronously
/// or keep it and call it later from another thread or task. There is no
/// timeout; a dropped `Proceed` silently abandons the route.
#[must_use = "the route does not run unless `proceed` is called"]
pub struct Proceed {
    chain: Arc<FilterChain>,
    index: usize,
}

impl fmt::Debug for Proceed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proceed")
            .field("route", &self.chain.route)
            .field("index", &self.index)
            .finish()
    }
}

impl Proceed {
    /// Run the next around filter, or the handler and after filters when no
    /// around filter remains.
    ///
    /// Errors from anything further down the chain are returned to the caller.
    pub fn proceed(self) -> Result<(), BoxError> {
        let chain = self.chain;
        match chain.around.get(self.index) {
            Some(filter) => {
                let next = Proceed {
                    chain: Arc::clone(&chain),
                    index: self.index + 1,
                };
                filter.around(next, &chain.route, &chain.params)
            }
            None => {
                chain.handler.call(&chain.params)?;
                chain.handled.store(true, Ordering::Release);
                for filter in &chain.after {
                    filter.after(&chain.route, &chain.params)?;
                }
                Ok(())
            }
        }
    }

    /// The route name.
    pub fn route(&self) -> &str {
        &self.chain.route
    }

    /// The parameter mapping.
    pub fn params(&self) -> &Params {
        &self.chain.params
    }
}
