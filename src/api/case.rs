//! Key-case conversion between the legacy snake_case dialect and camelCase resources.

// self
use crate::_prelude::*;

/// Recursively renames object keys from `snake_case` to `camelCase`.
pub fn keys_to_camel(value: Value) -> Value {
	rename_keys(value, &to_camel)
}

/// Recursively renames object keys from `camelCase` to `snake_case`.
pub fn keys_to_snake(value: Value) -> Value {
	rename_keys(value, &to_snake)
}

fn rename_keys(value: Value, rename: &dyn Fn(&str) -> String) -> Value {
	match value {
		Value::Object(map) => Value::Object(
			map.into_iter().map(|(key, value)| (rename(&key), rename_keys(value, rename))).collect(),
		),
		Value::Array(items) =>
			Value::Array(items.into_iter().map(|item| rename_keys(item, rename)).collect()),
		other => other,
	}
}

fn to_camel(key: &str) -> String {
	let mut out = String::with_capacity(key.len());
	let mut upper_next = false;

	for (idx, ch) in key.chars().enumerate() {
		if (ch == '_' || ch == '-') && idx > 0 {
			upper_next = true;

			continue;
		}
		if upper_next {
			out.extend(ch.to_uppercase());

			upper_next = false;
		} else {
			out.push(ch);
		}
	}

	if upper_next {
		out.push('_');
	}

	out
}

fn to_snake(key: &str) -> String {
	let mut out = String::with_capacity(key.len() + 4);

	for ch in key.chars() {
		if ch.is_ascii_uppercase() {
			out.push('_');
			out.push(ch.to_ascii_lowercase());
		} else {
			out.push(ch);
		}
	}

	out
}
