//! Genealogy fetch against the AnimaLineage REST API.

use std::sync::Arc;

use gloo_net::http::Request;
use thiserror::Error;

use super::types::FamilyTreeNode;

/// Supplies the bearer token for API calls.
pub trait AuthTokenProvider: Send + Sync {
	/// Current token, `None` when signed out.
	fn token(&self) -> Option<String>;
}

/// Reads the token from `sessionStorage` under a fixed key.
#[derive(Clone, Debug)]
pub struct SessionStorageTokens {
	/// `sessionStorage` key.
	pub key: String,
}

impl Default for SessionStorageTokens {
	fn default() -> Self {
		Self {
			key: "token".to_string(),
		}
	}
}

impl AuthTokenProvider for SessionStorageTokens {
	fn token(&self) -> Option<String> {
		let storage = web_sys::window()?.session_storage().ok()??;
		storage.get_item(&self.key).ok().flatten().filter(|t| !t.is_empty())
	}
}

/// A token known up front, e.g. handed over by the host page.
#[derive(Clone, Debug)]
pub struct StaticToken(pub Option<String>);

impl AuthTokenProvider for StaticToken {
	fn token(&self) -> Option<String> {
		self.0.clone()
	}
}

/// Errors from the genealogy fetch.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
	/// The request never completed.
	#[error("network error: {0}")]
	Network(String),
	/// Non-2xx response.
	#[error("server answered {status} {status_text}")]
	Http { status: u16, status_text: String },
	/// Body is not a genealogy payload.
	#[error("unexpected genealogy payload: {0}")]
	Decode(String),
}

impl FetchError {
	/// Message shown in the inline error banner.
	pub fn user_message(&self) -> String {
		match self {
			FetchError::Http { status: 401 | 403, .. } => {
				"Accès refusé : veuillez vous reconnecter.".to_string()
			}
			FetchError::Http { status: 404, .. } => "Animal introuvable.".to_string(),
			_ => format!("Impossible de charger la généalogie ({self})."),
		}
	}
}

/// Client for the genealogy endpoint.
#[derive(Clone)]
pub struct GenealogyClient {
	base_url: String,
	tokens: Arc<dyn AuthTokenProvider>,
}

impl GenealogyClient {
	/// Client rooted at `base_url`; empty for same-origin.
	pub fn new(base_url: impl Into<String>, tokens: Arc<dyn AuthTokenProvider>) -> Self {
		Self {
			base_url: base_url.into(),
			tokens,
		}
	}

	/// Endpoint for `animal_id` over `levels` generations.
	pub fn genealogy_url(&self, animal_id: i64, levels: u8) -> String {
		format!(
			"{}/api/animaux/{}/genealogie?levels={}&include_children=true",
			self.base_url.trim_end_matches('/'),
			animal_id,
			levels
		)
	}

	/// Fetches the genealogy of `animal_id` over `levels` generations.
	pub async fn fetch_genealogy(&self, animal_id: i64, levels: u8) -> Result<FamilyTreeNode, FetchError> {
		let url = self.genealogy_url(animal_id, levels);
		log::debug!("fetching {}", url);

		let mut request = Request::get(&url).header("Accept", "application/json");
		if let Some(token) = self.tokens.token() {
			request = request.header("Authorization", &format!("Bearer {token}"));
		}

		let response = request
			.send()
			.await
			.map_err(|e| FetchError::Network(e.to_string()))?;
		if !response.ok() {
			return Err(FetchError::Http {
				status: response.status(),
				status_text: response.status_text(),
			});
		}
		let body = response
			.text()
			.await
			.map_err(|e| FetchError::Network(e.to_string()))?;
		parse_genealogy(&body)
	}
}

/// Decodes a genealogy response body.
pub fn parse_genealogy(body: &str) -> Result<FamilyTreeNode, FetchError> {
	serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builds_genealogy_url() {
		let client = GenealogyClient::new("https://api.example.org/", Arc::new(StaticToken(None)));
		assert_eq!(
			client.genealogy_url(42, 3),
			"https://api.example.org/api/animaux/42/genealogie?levels=3&include_children=true"
		);
		let relative = GenealogyClient::new("", Arc::new(StaticToken(None)));
		assert_eq!(
			relative.genealogy_url(7, 5),
			"/api/animaux/7/genealogie?levels=5&include_children=true"
		);
	}

	#[test]
	fn decode_errors_are_reported() {
		let err = parse_genealogy("{\"level\": 0}").unwrap_err();
		assert!(matches!(err, FetchError::Decode(_)));
		assert!(err.user_message().starts_with("Impossible de charger"));
	}

	#[test]
	fn auth_failures_have_dedicated_message() {
		let err = FetchError::Http {
			status: 401,
			status_text: "Unauthorized".into(),
		};
		assert_eq!(err.user_message(), "Accès refusé : veuillez vous reconnecter.");
		assert_eq!(err.to_string(), "server answered 401 Unauthorized");
	}

	#[test]
	fn static_token_provider() {
		assert_eq!(StaticToken(Some("abc".into())).token().as_deref(), Some("abc"));
	}
}
