//! Logging filter for route observation.

use switchyard_core::{AroundFilter, BoxError, Params, Proceed};

/// An around filter that logs each route it wraps and whether it completed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingFilter;

impl AroundFilter for LoggingFilter {
    fn around(&self, proceed: Proceed, route: &str, params: &Params) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(route = %route, ?params, "Dispatching route");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = (route, params);
        }

        let result = proceed.proceed();

        #[cfg(feature = "tracing")]
        if let Err(error) = &result {
            tracing::warn!(route = %route, %error, "Route failed");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use switchyard_core::{FilterChain, Handler};

    #[test]
    fn test_logging_filter_proceeds() {
        let handler = crate::testing::CountingHandler::new();
        let chain = Arc::new(
            FilterChain::new("home", Params::new(), Arc::new(handler.clone()) as Arc<dyn Handler>)
                .with_around(vec![Arc::new(LoggingFilter) as Arc<dyn AroundFilter>]),
        );

        chain.start().proceed().unwrap();
        assert!(chain.handled());
        assert_eq!(handler.count(), 1);
    }
}
