//! Error-shape detection for commerce API bodies.
//!
//! The platform reports failures as JSON objects carrying `title`, `type`, and `detail`.
//! Bodies of that shape are lifted into [`ApiError`], which keeps the payload (annotated with
//! `isError` and a `message` mirroring `detail`) so callers can surface it as-is.

// self
use crate::_prelude::*;

/// Returns `true` when `body` carries truthy `detail`, `title`, and `type` members.
pub fn is_error(body: &Value) -> bool {
	let Some(object) = body.as_object() else {
		return false;
	};

	["detail", "title", "type"].iter().all(|key| object.get(*key).is_some_and(truthy))
}

/// Error-shaped platform response.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("{title}: {detail}")]
pub struct ApiError {
	status: Option<u16>,
	title: String,
	error_type: String,
	detail: String,
	payload: Value,
}
impl ApiError {
	/// Lifts an error-shaped body; returns `None` when the body is not error-shaped.
	pub fn from_body(status: Option<u16>, body: &Value) -> Option<Self> {
		if !is_error(body) {
			return None;
		}

		let field = |key: &str| body.get(key).map(render).unwrap_or_default();

		Some(Self {
			status,
			title: field("title"),
			error_type: field("type"),
			detail: field("detail"),
			payload: annotate(body.clone()),
		})
	}

	/// Synthesizes an error for a failed status whose body is not error-shaped.
	pub fn from_status(status: u16, body: &Value) -> Self {
		let detail = match body {
			Value::Null => format!("Request failed with status {status}"),
			Value::String(text) if !text.trim().is_empty() => text.trim().to_owned(),
			other => other.to_string(),
		};
		let error_type = format!("http-{status}");
		let title = "Request failed".to_owned();
		let payload = annotate(json!({
			"title": title,
			"type": error_type,
			"detail": detail,
		}));

		Self { status: Some(status), title, error_type, detail, payload }
	}

	/// HTTP status, when known.
	pub fn status(&self) -> Option<u16> {
		self.status
	}

	/// Short error title.
	pub fn title(&self) -> &str {
		&self.title
	}

	/// Platform error type identifier.
	pub fn error_type(&self) -> &str {
		&self.error_type
	}

	/// Human-readable description.
	pub fn detail(&self) -> &str {
		&self.detail
	}

	/// Annotated body: the original members plus `isError: true` and `message`.
	pub fn payload(&self) -> &Value {
		&self.payload
	}
}

/// Rewrites a legacy `{ "fault": { type, message, arguments } }` body into the standard
/// error shape; other bodies pass through untouched.
pub fn convert_fault(body: Value) -> Value {
	let Some(fault) = body.get("fault").and_then(Value::as_object) else {
		return body;
	};
	let message = fault.get("message").and_then(Value::as_str).unwrap_or_default().to_owned();
	let fault_type = fault.get("type").and_then(Value::as_str).unwrap_or_default();
	let mut converted = Map::new();

	converted.insert("title".into(), Value::String(message.clone()));
	converted.insert("type".into(), Value::String(split_words(fault_type)));
	converted.insert("detail".into(), Value::String(message));

	if let Some(arguments) = fault.get("arguments") {
		converted.insert("arguments".into(), arguments.clone());
	}

	Value::Object(converted)
}

fn annotate(body: Value) -> Value {
	let mut body = match body {
		Value::Object(map) => map,
		other => {
			let mut map = Map::new();

			map.insert("detail".into(), other);

			map
		},
	};
	let message = body.get("detail").cloned().unwrap_or(Value::Null);

	body.insert("isError".into(), Value::Bool(true));
	body.insert("message".into(), message);

	Value::Object(body)
}

fn truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

fn render(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}

// `ProductItemNotAvailableException` -> `Product Item Not Available Exception`.
fn split_words(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len() + 8);

	for (idx, ch) in raw.chars().enumerate() {
		if ch == '_' {
			out.push(' ');

			continue;
		}
		if idx > 0 && ch.is_ascii_uppercase() && !out.ends_with(' ') {
			out.push(' ');
		}

		out.push(ch);
	}

	out
}
