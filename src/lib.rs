//! Storefront session layer for hosted commerce APIs: single-flight PKCE logins, auth-aware
//! request interception, and basket/wishlist synchronization in one async crate.

#![deny(clippy::all, unused_crate_dependencies)]
#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod basket;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod interceptor;
pub mod model;
pub mod obs;
pub mod product_list;
pub mod store;
pub mod storefront;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap, HashSet},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value, json};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
