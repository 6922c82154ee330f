use std::{borrow::Cow, collections::HashMap};

use super::Oid;

/// Registry of user defined type oids.
///
/// Builtin types have oids fixed at compile time, but enums, domains and
/// composite types get their oid when created, which differ between
/// databases. Caller resolve them once (e.g. by querying `pg_type`) and
/// register them here, keyed by type name.
///
/// A type that is not registered accepts no oid.
///
/// ```
/// use pgrecv::OidMap;
///
/// let mut oids = OidMap::new();
/// oids.register("mood", 16_390, 16_389);
///
/// assert!(oids.accepts("mood", 16_390));
/// assert!(oids.accepts_array("mood", 16_389));
/// assert!(!oids.accepts("weather", 16_390));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OidMap {
    types: HashMap<Cow<'static, str>, Entry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    oid: Oid,
    array_oid: Oid,
}

impl OidMap {
    /// Create empty [`OidMap`].
    ///
    /// This does not allocate, an empty map is enough when only builtin
    /// types are decoded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register type `name` with its oid and its array oid.
    ///
    /// Returns the previous `(oid, array_oid)` if `name` was registered.
    pub fn register(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        oid: Oid,
        array_oid: Oid,
    ) -> Option<(Oid, Oid)> {
        self.types
            .insert(name.into(), Entry { oid, array_oid })
            .map(|e| (e.oid, e.array_oid))
    }

    /// Returns registered oid of type `name`.
    pub fn oid(&self, name: &str) -> Option<Oid> {
        self.types.get(name).map(|e| e.oid)
    }

    /// Returns registered array oid of type `name`.
    pub fn array_oid(&self, name: &str) -> Option<Oid> {
        self.types.get(name).map(|e| e.array_oid)
    }

    /// Returns `true` if `oid` is the registered oid of type `name`.
    pub fn accepts(&self, name: &str, oid: Oid) -> bool {
        self.oid(name) == Some(oid)
    }

    /// Returns `true` if `oid` is the registered array oid of type `name`.
    pub fn accepts_array(&self, name: &str, oid: Oid) -> bool {
        self.array_oid(name) == Some(oid)
    }

    /// Returns the number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
