//! Customer profile.

// self
use crate::{
	_prelude::*,
	auth::CustomerId,
	model::{Address, PaymentInstrument},
};

/// Whether tokens were minted for an anonymous or a logged-in shopper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
	/// Anonymous shopper.
	#[default]
	Guest,
	/// Logged-in shopper with a customer profile.
	Registered,
}
impl AuthType {
	/// Returns the stable wire name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Guest => "guest",
			Self::Registered => "registered",
		}
	}
}
impl Display for AuthType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for AuthType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"guest" => Ok(Self::Guest),
			"registered" => Ok(Self::Registered),
			other => Err(format!("unknown auth type `{other}`")),
		}
	}
}

/// Shopper profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
	/// Customer id.
	pub customer_id: CustomerId,
	/// Guest or registered.
	#[serde(default)]
	pub auth_type: AuthType,
	/// Contact email (registered customers).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Given name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// Family name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	/// Saved addresses.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub addresses: Vec<Address>,
	/// Saved payment instruments.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub payment_instruments: Vec<PaymentInstrument>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
impl Customer {
	/// Minimal guest profile; guests have no server-side profile to fetch.
	pub fn guest(customer_id: CustomerId) -> Self {
		Self {
			customer_id,
			auth_type: AuthType::Guest,
			email: None,
			first_name: None,
			last_name: None,
			addresses: Vec::new(),
			payment_instruments: Vec::new(),
			extra: Map::new(),
		}
	}

	/// Returns `true` for registered customers.
	pub fn is_registered(&self) -> bool {
		self.auth_type == AuthType::Registered
	}
}
