//! Auth-domain identifiers, bearer tokens, and shopper credentials.

pub mod credentials;
pub mod id;
pub mod token;

pub use credentials::*;
pub use id::*;
pub use token::{record::*, secret::*};
