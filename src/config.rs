//! Host page configuration for the standalone viewer.

use serde::Deserialize;

use crate::components::genealogy::DEFAULT_LEVELS;

/// Settings read from `<script id="genealogy-config" type="application/json">`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
	/// API origin; empty for same-origin requests.
	pub api_base: String,
	/// Animal whose genealogy is shown.
	pub animal_id: Option<i64>,
	/// `sessionStorage` key holding the bearer token.
	pub token_key: String,
	/// Initial depth in generations.
	pub levels: u8,
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			api_base: String::new(),
			animal_id: None,
			token_key: "token".to_string(),
			levels: DEFAULT_LEVELS,
		}
	}
}

impl ViewerConfig {
	/// Parses the config script contents.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}
