//! Query string codec.
//!
//! The default codec produces and consumes `application/x-www-form-urlencoded`
//! style strings:
//!
//! - encode: `key=percent(value)` joined with `&`, then `%20` becomes `+`
//! - decode: `+` becomes a space, items split on `&` and at the first `=`,
//!   values percent-decoded, the last duplicate key wins, and an item without
//!   `=` yields an undefined value
//!
//! Both functions live in a [`QueryConfig`] that can be swapped process-wide
//! with [`QueryConfig::configure`] or injected per router via [`QuerySource`].

use crate::params::Params;
use lazy_static::lazy_static;
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Serializes a parameter mapping into a query string (without the `?`).
pub type EncodeFn = Arc<dyn Fn(&Params) -> String + Send + Sync>;

/// Parses a query string (without the `?`) into a parameter mapping.
pub type DecodeFn = Arc<dyn Fn(&str) -> Params + Send + Sync>;

lazy_static! {
    static ref GLOBAL_QUERY_CONFIG: RwLock<QueryConfig> = RwLock::new(QueryConfig::default());
}

/// Encode `params` with the default codec.
///
/// An undefined value is written as the literal `undefined`.
pub fn encode_query(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| {
            let value = value.as_deref().unwrap_or("undefined");
            format!("{}={}", key, urlencoding::encode(value))
        })
        .collect::<Vec<_>>()
        .join("&")
        .replace("%20", "+")
}

/// Decode `query` with the default codec.
pub fn decode_query(query: &str) -> Params {
    let mut params = Params::new();
    for item in query.replace('+', " ").split('&') {
        match item.split_once('=') {
            Some((key, value)) => {
                params.insert(key, percent_decode(value));
            }
            None => {
                params.insert_undefined(item);
            }
        }
    }
    params
}

/// Percent-decode `value`, falling back to a lossy conversion when the
/// decoded bytes are not UTF-8.
pub fn percent_decode(value: &str) -> String {
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => match urlencoding::decode_binary(value.as_bytes()) {
            Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Cow::Owned(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        },
    }
}

/// The pair of query functions used for URL building and dispatch.
#[derive(Clone)]
pub struct QueryConfig {
    encode: EncodeFn,
    decode: DecodeFn,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            encode: Arc::new(encode_query),
            decode: Arc::new(decode_query),
        }
    }
}

impl fmt::Debug for QueryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryConfig").finish_non_exhaustive()
    }
}

impl QueryConfig {
    /// A config using the default codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the encode function.
    pub fn with_encode<F>(mut self, encode: F) -> Self
    where
        F: Fn(&Params) -> String + Send + Sync + 'static,
    {
        self.encode = Arc::new(encode);
        self
    }

    /// Replace the decode function.
    pub fn with_decode<F>(mut self, decode: F) -> Self
    where
        F: Fn(&str) -> Params + Send + Sync + 'static,
    {
        self.decode = Arc::new(decode);
        self
    }

    /// Encode `params` into a query string.
    pub fn encode(&self, params: &Params) -> String {
        (self.encode)(params)
    }

    /// Decode a query string into a mapping.
    pub fn decode(&self, query: &str) -> Params {
        (self.decode)(query)
    }

    /// Merge `overrides` into this config.
    pub fn apply(&mut self, overrides: QueryOverrides) {
        if let Some(encode) = overrides.encode {
            self.encode = encode;
        }
        if let Some(decode) = overrides.decode {
            self.decode = decode;
        }
    }

    /// Snapshot of the process-wide config.
    pub fn global() -> QueryConfig {
        GLOBAL_QUERY_CONFIG
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge `overrides` into the process-wide config.
    ///
    /// Affects every subsequent encode/decode of every router that uses the
    /// global config, until reconfigured. Returns the resulting config.
    pub fn configure(overrides: QueryOverrides) -> QueryConfig {
        let mut global = GLOBAL_QUERY_CONFIG
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        global.apply(overrides);
        global.clone()
    }

    /// Restore the default codec process-wide.
    pub fn reset_global() {
        *GLOBAL_QUERY_CONFIG
            .write()
            .unwrap_or_else(PoisonError::into_inner) = QueryConfig::default();
    }
}

/// A partial [`QueryConfig`]: only the functions that are set get replaced.
#[derive(Clone, Default)]
pub struct QueryOverrides {
    encode: Option<EncodeFn>,
    decode: Option<DecodeFn>,
}

impl QueryOverrides {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the encode function.
    pub fn encode<F>(mut self, encode: F) -> Self
    where
        F: Fn(&Params) -> String + Send + Sync + 'static,
    {
        self.encode = Some(Arc::new(encode));
        self
    }

    /// Override the decode function.
    pub fn decode<F>(mut self, decode: F) -> Self
    where
        F: Fn(&str) -> Params + Send + Sync + 'static,
    {
        self.decode = Some(Arc::new(decode));
        self
    }
}

/// Where a router reads its query functions from.
#[derive(Debug, Clone, Default)]
pub enum QuerySource {
    /// The process-wide config, read at each use.
    #[default]
    Global,
    /// A config owned by one router.
    Local(QueryConfig),
}

impl QuerySource {
    /// The config currently in effect.
    pub fn resolve(&self) -> QueryConfig {
        match self {
            QuerySource::Global => QueryConfig::global(),
            QuerySource::Local(config) => config.clone(),
        }
    }
}

impl From<QueryConfig> for QuerySource {
    fn from(config: QueryConfig) -> Self {
        QuerySource::Local(config)
    }
}
