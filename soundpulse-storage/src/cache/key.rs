//! Cache keys derived from a route and its significant parameters.

use std::fmt;

use soundpulse_core::RouteId;

/// A cache key scoped to one route.
///
/// # Design
///
/// The key is structural: route plus an ordered list of `(name, value)`
/// pairs. Optional parameters are recorded even when absent, so
/// `playlist_id` missing and `playlist_id=""` never collide. Two keys are
/// equal only if the route and every parameter value are equal.
///
/// The private fields mean a key can only be built through [`CacheKey::new`],
/// which forces a route to be named.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    route: RouteId,
    params: Vec<(&'static str, Option<String>)>,
}

impl CacheKey {
    pub fn new(route: RouteId) -> Self {
        Self {
            route,
            params: Vec::new(),
        }
    }

    /// Append a required parameter.
    pub fn with_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, Some(value.into())));
        self
    }

    /// Append an optional parameter, recording its absence explicitly.
    pub fn with_optional_param<S: Into<String>>(
        mut self,
        name: &'static str,
        value: Option<S>,
    ) -> Self {
        self.params.push((name, value.map(Into::into)));
        self
    }

    pub fn route(&self) -> RouteId {
        self.route
    }

    pub fn params(&self) -> &[(&'static str, Option<String>)] {
        &self.params
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.route)?;
        for (idx, (name, value)) in self.params.iter().enumerate() {
            let sep = if idx == 0 { '?' } else { '&' };
            match value {
                Some(value) => write!(f, "{}{}={}", sep, name, value)?,
                None => write!(f, "{}{}", sep, name)?,
            }
        }
        Ok(())
    }
}
