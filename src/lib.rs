//! animalineage-genealogy: interactive genealogy viewer for AnimaLineage.
//!
//! This crate provides a WASM-based component that fetches an animal's
//! pedigree and renders it as a classic tree, as concentric descendant rings,
//! or as a generation list, with pan/zoom and hover on the canvas views.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod config;

pub use components::genealogy::{
	Animal, AuthTokenProvider, FamilyTreeNode, GenealogyClient, GenealogyViewer, SessionStorageTokens,
};
pub use config::ViewerConfig;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("animalineage-genealogy: logging initialized");
}

/// Load viewer settings from a script element with id="genealogy-config".
/// Expected format: JSON with { api_base, animal_id, token_key, levels }, all optional.
fn load_config() -> Option<ViewerConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("genealogy-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match ViewerConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"animalineage-genealogy: animal {:?}, api '{}'",
				config.animal_id, config.api_base
			);
			Some(config)
		}
		Err(e) => {
			warn!("animalineage-genealogy: failed to parse config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads settings from the DOM and renders the genealogy viewer.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();
	let tokens = SessionStorageTokens {
		key: config.token_key.clone(),
	};
	provide_context(GenealogyClient::new(config.api_base.clone(), Arc::new(tokens)));

	let content = match config.animal_id {
		Some(animal_id) => view! { <GenealogyViewer animal_id=animal_id initial_levels=config.levels /> }.into_any(),
		None => view! { <p class="empty-state">"Aucun animal sélectionné."</p> }.into_any(),
	};

	view! {
		<Html attr:lang="fr" attr:dir="ltr" />
		<Title text="AnimaLineage · Généalogie" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="genealogy-page">{content}</main>
	}
}
