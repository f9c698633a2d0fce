//! Commerce resources exchanged with the platform.
//!
//! Every resource carries a typed core plus a flattened `extra` map so members the crate does
//! not model survive a decode/encode cycle untouched.

pub mod basket;
pub mod customer;
pub mod order;
pub mod product;
pub mod product_list;

pub use basket::*;
pub use customer::*;
pub use order::*;
pub use product::*;
pub use product_list::*;
