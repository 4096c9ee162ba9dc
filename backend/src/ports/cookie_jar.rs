//! Cookie transport port.
//!
//! Owned by the HTTP layer; the session authority reads and writes the
//! session cookie only through this interface.

/// Request-scoped cookie store.
///
/// `set` and `delete` record changes that the transport sends back to the
/// client; later `get` calls on the same jar observe them.
pub trait CookieJar: Send {
    /// Returns the cookie's value, if present.
    fn get(&self, name: &str) -> Option<String>;

    /// Sets a cookie.
    fn set(&mut self, name: &str, value: &str);

    /// Removes a cookie.
    fn delete(&mut self, name: &str);
}
