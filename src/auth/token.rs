//! Bearer token records and redacted secrets.

pub mod record;
pub mod secret;
