//! Container fetching the genealogy and switching between the three views.

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::api::{GenealogyClient, SessionStorageTokens};
use super::canvas::{CanvasView, GenealogyCanvas};
use super::list::GenerationList;
use super::types::FamilyTreeNode;
use super::view::ViewTransform;

/// Shallowest selectable depth.
pub const MIN_LEVELS: u8 = 2;
/// Deepest selectable depth.
pub const MAX_LEVELS: u8 = 5;
/// Depth requested when the viewer opens.
pub const DEFAULT_LEVELS: u8 = 3;

/// Zoom factor applied by the toolbar buttons.
const BUTTON_ZOOM_STEP: f64 = 1.2;

/// Brings a requested depth into the selectable range.
pub fn clamp_levels(levels: u8) -> u8 {
	levels.clamp(MIN_LEVELS, MAX_LEVELS)
}

/// Active visualization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
	/// Classic tree canvas.
	#[default]
	Tree,
	/// Generation list.
	List,
	/// Concentric rings canvas.
	Concentric,
}

impl ViewMode {
	/// Toolbar order.
	pub const ALL: [ViewMode; 3] = [ViewMode::Tree, ViewMode::List, ViewMode::Concentric];

	/// Button label.
	pub fn label(self) -> &'static str {
		match self {
			ViewMode::Tree => "Arbre",
			ViewMode::List => "Liste",
			ViewMode::Concentric => "Concentrique",
		}
	}

	/// Whether the mode draws on a canvas and so supports pan and zoom.
	pub fn is_canvas(self) -> bool {
		!matches!(self, ViewMode::List)
	}
}

/// Lifecycle of the genealogy fetch. A viewer starts out loading.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FetchState {
	/// Request in flight.
	#[default]
	Loading,
	/// Payload received.
	Loaded(FamilyTreeNode),
	/// Request failed; holds the message for the error banner.
	Failed(String),
}

impl FetchState {
	/// Tree once loaded.
	pub fn tree(&self) -> Option<&FamilyTreeNode> {
		match self {
			FetchState::Loaded(tree) => Some(tree),
			_ => None,
		}
	}

	/// Banner text after a failure.
	pub fn error_message(&self) -> Option<String> {
		match self {
			FetchState::Failed(message) => Some(message.clone()),
			_ => None,
		}
	}

	/// Whether the loading indicator shows.
	pub fn is_loading(&self) -> bool {
		matches!(self, FetchState::Loading)
	}
}

/// Genealogy modal body for one animal.
///
/// Uses the [`GenealogyClient`] from context when one is provided, otherwise
/// a same-origin client reading the token from `sessionStorage`.
#[component]
pub fn GenealogyViewer(
	/// Focal animal.
	animal_id: i64,
	/// Shows a close button calling back when clicked.
	#[prop(optional, into)]
	on_close: Option<Callback<()>>,
	/// Starting depth, clamped to the selectable range.
	#[prop(default = DEFAULT_LEVELS)]
	initial_levels: u8,
) -> impl IntoView {
	let client = use_context::<GenealogyClient>()
		.unwrap_or_else(|| GenealogyClient::new("", Arc::new(SessionStorageTokens::default())));

	let levels = RwSignal::new(clamp_levels(initial_levels));
	let view_mode = RwSignal::new(ViewMode::default());
	let transform = RwSignal::new(ViewTransform::default());
	let viewport = RwSignal::new((0.0, 0.0));
	let state = RwSignal::new(FetchState::default());
	let request_seq = StoredValue::new(0u64);

	Effect::new(move |_| {
		let depth = levels.get();
		let seq = request_seq.get_value() + 1;
		request_seq.set_value(seq);
		state.set(FetchState::Loading);

		let client = client.clone();
		spawn_local(async move {
			let result = client.fetch_genealogy(animal_id, depth).await;
			if request_seq.try_get_value() != Some(seq) {
				log::debug!("genealogy: dropping superseded response for depth {}", depth);
				return;
			}
			let next = match result {
				Ok(tree) => {
					log::info!("genealogy: loaded animal {} over {} levels", animal_id, depth);
					FetchState::Loaded(tree)
				}
				Err(e) => {
					log::warn!("genealogy: fetch failed for animal {}: {}", animal_id, e);
					FetchState::Failed(e.user_message())
				}
			};
			let _ = state.try_set(next);
		});
	});

	let tree = Signal::derive(move || state.with(|s| s.tree().cloned()));

	let select_mode = move |mode: ViewMode| {
		view_mode.set(mode);
		transform.set(ViewTransform::default());
	};

	let zoom_by = move |factor: f64| {
		let (w, h) = viewport.get_untracked();
		transform.update(|t| t.zoom_at(w / 2.0, h / 2.0, factor));
	};

	let mode_buttons = ViewMode::ALL
		.into_iter()
		.map(|mode| {
			view! {
				<button
					class="view-mode"
					class:active=move || view_mode.get() == mode
					aria-pressed=move || (view_mode.get() == mode).to_string()
					on:click=move |_| select_mode(mode)
				>
					{mode.label()}
				</button>
			}
		})
		.collect_view();

	let depth_options = (MIN_LEVELS..=MAX_LEVELS)
		.map(|n| view! { <option value=n.to_string()>{format!("{n} générations")}</option> })
		.collect_view();

	let close_button = on_close.map(|cb| {
		view! {
			<button class="close" aria-label="Fermer" on:click=move |_| cb.run(())>
				"×"
			</button>
		}
	});

	let body = move || {
		if let Some(message) = state.with(FetchState::error_message) {
			return view! { <div class="error-banner" role="alert">{message}</div> }.into_any();
		}
		if state.with(FetchState::is_loading) {
			return view! { <p class="loading">"Chargement de la généalogie…"</p> }.into_any();
		}
		match view_mode.get() {
			ViewMode::Tree => view! {
				<GenealogyCanvas data=tree mode=CanvasView::Tree transform=transform viewport=viewport />
			}
			.into_any(),
			ViewMode::Concentric => view! {
				<GenealogyCanvas data=tree mode=CanvasView::Concentric transform=transform viewport=viewport />
			}
			.into_any(),
			ViewMode::List => view! { <GenerationList data=tree /> }.into_any(),
		}
	};

	view! {
		<div class="genealogy-viewer">
			<header class="genealogy-toolbar">
				<h2>"Généalogie"</h2>
				<div class="view-modes" role="group" aria-label="Mode d'affichage">
					{mode_buttons}
				</div>
				<label>
					"Profondeur "
					<select
						prop:value=move || levels.get().to_string()
						on:change=move |ev| {
							if let Ok(n) = event_target_value(&ev).parse::<u8>() {
								levels.set(clamp_levels(n));
							}
						}
					>
						{depth_options}
					</select>
				</label>
				<Show when=move || view_mode.get().is_canvas()>
					<div class="zoom-controls">
						<button aria-label="Zoom arrière" on:click=move |_| zoom_by(1.0 / BUTTON_ZOOM_STEP)>"−"</button>
						<button aria-label="Réinitialiser la vue" on:click=move |_| transform.set(ViewTransform::default())>
							"⟲"
						</button>
						<button aria-label="Zoom avant" on:click=move |_| zoom_by(BUTTON_ZOOM_STEP)>"+"</button>
					</div>
				</Show>
				{close_button}
			</header>
			<div class="genealogy-body">{body}</div>
			<footer class="genealogy-legend">
				<span class="legend male">"♂ Mâle"</span>
				<span class="legend female">"♀ Femelle"</span>
				<span class="legend deceased">"Hachuré : décédé"</span>
			</footer>
		</div>
	}
}
