//! Leptos component wrapping the genealogy canvas.
//!
//! The component creates an HTML canvas and wires mouse, touch and wheel
//! handlers for panning, zooming and hovering. Unlike an animation loop, the
//! scene is redrawn by an effect whenever the data, the transform or the
//! hovered animal changes.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent,
};

use super::concentric::{ConcentricConfig, ConcentricLayout};
use super::render;
use super::theme::Theme;
use super::tree_layout::{TreeLayout, TreeLayoutConfig};
use super::types::FamilyTreeNode;
use super::view::{PanState, ViewTransform};

const DEFAULT_WIDTH: f64 = 900.0;
const DEFAULT_HEIGHT: f64 = 620.0;

/// Which graphical view a canvas draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasView {
	/// Classic tree.
	Tree,
	/// Concentric rings.
	Concentric,
}

/// Drawing context and gesture state, created once the canvas is mounted.
struct CanvasContext {
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
	pan: PanState,
	theme: Theme,
}

/// Imperatively registered wheel listener, kept so it can be removed.
struct WheelListener {
	target: HtmlCanvasElement,
	callback: Closure<dyn FnMut(WheelEvent)>,
}

/// Animal under the screen point in the classic tree.
pub fn pick_tree(
	tree: &FamilyTreeNode,
	transform: &ViewTransform,
	sx: f64,
	sy: f64,
	width: f64,
	height: f64,
) -> Option<i64> {
	let (wx, wy) = transform.screen_to_world(sx, sy);
	TreeLayout::compute(tree, width, height, TreeLayoutConfig::default())
		.node_at(wx, wy)
		.map(|n| n.id())
}

/// Animal under the screen point in the concentric view, whose disk is
/// centred on the canvas.
pub fn pick_concentric(
	layout: &ConcentricLayout,
	transform: &ViewTransform,
	sx: f64,
	sy: f64,
	width: f64,
	height: f64,
) -> Option<i64> {
	let (wx, wy) = transform.screen_to_world(sx, sy);
	layout.animal_at(wx - width / 2.0, wy - height / 2.0)
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, client_x: f64, client_y: f64) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((client_x - rect.left(), client_y - rect.top()))
}

fn canvas_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let parent = canvas.parent_element();
	let measured = |size: Option<i32>, fallback: f64| match size {
		Some(s) if s > 0 => s as f64,
		_ => fallback,
	};
	(
		width.unwrap_or_else(|| measured(parent.as_ref().map(|p| p.client_width()), DEFAULT_WIDTH)),
		height.unwrap_or_else(|| measured(parent.as_ref().map(|p| p.client_height()), DEFAULT_HEIGHT)),
	)
}

/// Renders one graphical genealogy view on a canvas element.
///
/// The pan/zoom `transform` belongs to the caller so it can be shared and
/// reset across views. The canvas sizes itself to its parent unless
/// `width`/`height` are given; the resulting size is published to
/// `viewport` when provided.
#[component]
pub fn GenealogyCanvas(
	/// Genealogy to draw; nothing is drawn while `None`.
	#[prop(into)]
	data: Signal<Option<FamilyTreeNode>>,
	/// Which view to draw.
	mode: CanvasView,
	/// Shared pan/zoom state.
	transform: RwSignal<ViewTransform>,
	/// Receives the canvas size once measured.
	#[prop(optional)]
	viewport: Option<RwSignal<(f64, f64)>>,
	/// Fixed width in pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height in pixels.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<CanvasContext>>> = Rc::new(RefCell::new(None));
	let ready = RwSignal::new(false);
	let hovered = RwSignal::new(None::<i64>);
	let wheel_listener = StoredValue::new_local(None::<WheelListener>);

	let concentric = Memo::new(move |_| {
		if mode != CanvasView::Concentric {
			return None;
		}
		data.with(|tree| {
			tree.as_ref()
				.map(|t| ConcentricLayout::compute(t, ConcentricConfig::default()))
		})
	});

	let context_init = context.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}

		let (w, h) = canvas_size(&canvas, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		if let Some(viewport) = viewport {
			viewport.set((w, h));
		}

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(obj)) => match obj.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					log::warn!("genealogy: 2d context has an unexpected type");
					return;
				}
			},
			_ => {
				log::warn!("genealogy: canvas 2d context unavailable");
				return;
			}
		};

		*context_init.borrow_mut() = Some(CanvasContext {
			ctx,
			width: w,
			height: h,
			pan: PanState::default(),
			theme: Theme::default(),
		});

		// Registered by hand: a passive listener could not prevent page zoom.
		let on_wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |ev: WheelEvent| {
			ev.prevent_default();
			if let Some((x, y)) = local_point(canvas_ref, ev.client_x() as f64, ev.client_y() as f64) {
				transform.update(|t| t.wheel(x, y, ev.delta_y()));
			}
		});
		let options = AddEventListenerOptions::new();
		options.set_passive(false);
		if canvas
			.add_event_listener_with_callback_and_add_event_listener_options(
				"wheel",
				on_wheel.as_ref().unchecked_ref(),
				&options,
			)
			.is_err()
		{
			log::warn!("genealogy: could not register wheel listener");
		}
		wheel_listener.set_value(Some(WheelListener {
			target: canvas,
			callback: on_wheel,
		}));

		ready.set(true);
	});

	on_cleanup(move || {
		wheel_listener.try_update_value(|listener| {
			if let Some(l) = listener.take() {
				let _ = l
					.target
					.remove_event_listener_with_callback("wheel", l.callback.as_ref().unchecked_ref());
			}
		});
	});

	let context_draw = context.clone();
	Effect::new(move |_| {
		if !ready.get() {
			return;
		}
		let t = transform.get();
		let hovered_id = hovered.get();
		let borrowed = context_draw.borrow();
		let Some(c) = borrowed.as_ref() else {
			return;
		};
		match mode {
			CanvasView::Tree => data.with(|tree| {
				if let Some(tree) = tree {
					let layout = TreeLayout::compute(tree, c.width, c.height, TreeLayoutConfig::default());
					render::render_tree(&c.ctx, &layout, &t, hovered_id, &c.theme, c.width, c.height);
				}
			}),
			CanvasView::Concentric => concentric.with(|layout| {
				if let Some(layout) = layout {
					render::render_concentric(&c.ctx, layout, &t, hovered_id, &c.theme, c.width, c.height);
				}
			}),
		}
	});

	let pick = move |c: &CanvasContext, x: f64, y: f64| -> Option<i64> {
		let t = transform.get_untracked();
		match mode {
			CanvasView::Tree => data.with_untracked(|tree| {
				tree.as_ref()
					.and_then(|tree| pick_tree(tree, &t, x, y, c.width, c.height))
			}),
			CanvasView::Concentric => concentric.with_untracked(|layout| {
				layout
					.as_ref()
					.and_then(|layout| pick_concentric(layout, &t, x, y, c.width, c.height))
			}),
		}
	};

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, ev.client_x() as f64, ev.client_y() as f64) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.pan.begin(x, y, &transform.get_untracked());
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, ev.client_x() as f64, ev.client_y() as f64) else {
			return;
		};
		if let Some(ref c) = *context_mm.borrow() {
			if let Some(next) = c.pan.drag_to(x, y, &transform.get_untracked()) {
				transform.set(next);
			} else {
				let hit = pick(c, x, y);
				if hovered.get_untracked() != hit {
					hovered.set(hit);
				}
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.pan.end();
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.pan.end();
		}
		hovered.set(None);
	};

	let context_ts = context.clone();
	let on_touchstart = move |ev: TouchEvent| {
		let Some(touch) = ev.touches().get(0) else {
			return;
		};
		let Some((x, y)) = local_point(canvas_ref, touch.client_x() as f64, touch.client_y() as f64) else {
			return;
		};
		if let Some(ref mut c) = *context_ts.borrow_mut() {
			c.pan.begin(x, y, &transform.get_untracked());
		}
	};

	let context_tm = context.clone();
	let on_touchmove = move |ev: TouchEvent| {
		let Some(touch) = ev.touches().get(0) else {
			return;
		};
		let Some((x, y)) = local_point(canvas_ref, touch.client_x() as f64, touch.client_y() as f64) else {
			return;
		};
		if let Some(ref c) = *context_tm.borrow() {
			if let Some(next) = c.pan.drag_to(x, y, &transform.get_untracked()) {
				transform.set(next);
			}
		}
	};

	let context_te = context.clone();
	let on_touchend = move |_: TouchEvent| {
		if let Some(ref mut c) = *context_te.borrow_mut() {
			c.pan.end();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="genealogy-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			style=move || {
				let cursor = if hovered.get().is_some() { "pointer" } else { "grab" };
				format!("display: block; touch-action: none; cursor: {cursor};")
			}
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::genealogy::types::Animal;

	fn node(id: i64, pere: Option<i64>, level: i32) -> FamilyTreeNode {
		FamilyTreeNode {
			animal: Animal {
				id,
				identifiant_officiel: format!("FR{id}"),
				pere_id: pere,
				..Default::default()
			},
			level,
			..Default::default()
		}
	}

	#[test]
	fn tree_picking_inverts_pan_and_zoom() {
		let mut root = node(1, None, 0);
		root.enfants = vec![node(2, Some(1), 1)];
		let (w, h) = (800.0, 600.0);
		// Focal card centre sits at (400, 300) in world space.
		let transform = ViewTransform {
			x: 100.0,
			y: -50.0,
			k: 0.5,
		};
		let (sx, sy) = (400.0 * 0.5 + 100.0, 300.0 * 0.5 - 50.0);
		assert_eq!(pick_tree(&root, &transform, sx, sy, w, h), Some(1));
		assert_eq!(pick_tree(&root, &ViewTransform::default(), sx, sy, w, h), None);
	}

	#[test]
	fn concentric_picking_is_centred_on_canvas() {
		let mut root = node(1, None, 0);
		root.enfants = vec![node(2, Some(1), 1)];
		let layout = ConcentricLayout::compute(&root, ConcentricConfig::default());
		let t = ViewTransform::default();
		assert_eq!(pick_concentric(&layout, &t, 400.0, 300.0, 800.0, 600.0), Some(1));
		let r = (layout.config.inner_radius(1) + layout.config.outer_radius(1)) / 2.0;
		assert_eq!(pick_concentric(&layout, &t, 400.0 - r, 300.0, 800.0, 600.0), Some(2));
	}
}
