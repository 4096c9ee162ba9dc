//! User directory adapters for the session authority.
//!
//! - `mock` - In-memory directory for tests and database-less runs
//! - The postgres directory lives in `adapters::postgres`

mod mock;

pub use mock::MockUserRepository;
