//! Genealogy visualization component.
//!
//! Renders an animal's pedigree in three interchangeable views:
//! - a classic box-and-line tree of ancestors and descendants on a canvas
//! - concentric rings of descendants around the focal animal on a canvas
//! - a DOM list of descendants grouped by generation, with a summary
//!
//! Both canvas views share pan (drag), zoom (wheel, clamped) and hover
//! highlighting. Layout code is independent of the DOM.
//!
//! # Example
//!
//! ```ignore
//! use animalineage_genealogy::GenealogyViewer;
//!
//! view! { <GenealogyViewer animal_id=42 on_close=move |_| show.set(false) /> }
//! ```

pub mod api;
mod canvas;
pub mod concentric;
pub mod generations;
mod list;
mod render;
pub mod theme;
pub mod tree_layout;
mod types;
pub mod view;
mod viewer;

pub use api::{AuthTokenProvider, FetchError, GenealogyClient, SessionStorageTokens, StaticToken};
pub use canvas::{pick_concentric, pick_tree, CanvasView, GenealogyCanvas};
pub use list::GenerationList;
pub use render::{card_lines, fit_label};
pub use theme::Theme;
pub use types::{format_date, Animal, FamilyTreeNode, Sex, Status};
pub use viewer::{clamp_levels, FetchState, GenealogyViewer, ViewMode, DEFAULT_LEVELS, MAX_LEVELS, MIN_LEVELS};
