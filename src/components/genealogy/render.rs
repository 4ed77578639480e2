//! Canvas rendering for the classic tree and the concentric view.
//!
//! Both views draw the background in screen space, then apply the pan/zoom
//! transform and draw in world space. Hovered elements are drawn last so
//! their shadow or highlight sits on top.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::concentric::{label_rotation, ConcentricLayout, NodeLayout};
use super::theme::{Color, Theme};
use super::tree_layout::{PositionedNode, TreeLayout};
use super::types::Animal;
use super::view::ViewTransform;

/// Average glyph width as a fraction of the font size, for truncation.
const GLYPH_RATIO: f64 = 0.6;

/// Renders the classic tree.
pub fn render_tree(
	ctx: &CanvasRenderingContext2d,
	layout: &TreeLayout,
	transform: &ViewTransform,
	hovered: Option<i64>,
	theme: &Theme,
	width: f64,
	height: f64,
) {
	draw_background(ctx, theme, width, height);

	ctx.save();
	apply_transform(ctx, transform);

	draw_connectors(ctx, layout, theme);
	for node in layout.nodes.iter().filter(|n| Some(n.id()) != hovered) {
		draw_card(ctx, layout, node, theme, false);
	}
	if let Some(node) = layout.nodes.iter().find(|n| Some(n.id()) == hovered) {
		draw_card(ctx, layout, node, theme, true);
	}

	ctx.restore();
}

/// Renders the concentric view centred on the canvas.
pub fn render_concentric(
	ctx: &CanvasRenderingContext2d,
	layout: &ConcentricLayout,
	transform: &ViewTransform,
	hovered: Option<i64>,
	theme: &Theme,
	width: f64,
	height: f64,
) {
	draw_background(ctx, theme, width, height);

	ctx.save();
	apply_transform(ctx, transform);
	let _ = ctx.translate(width / 2.0, height / 2.0);

	for sector in layout.sectors.iter().filter(|s| Some(s.animal.id) != hovered) {
		draw_sector(ctx, sector, theme, false);
	}
	if let Some(sector) = layout.sectors.iter().find(|s| Some(s.animal.id) == hovered) {
		draw_sector(ctx, sector, theme, true);
	}
	draw_center(ctx, layout, theme, hovered == Some(layout.center.id));

	ctx.restore();
}

fn apply_transform(ctx: &CanvasRenderingContext2d, transform: &ViewTransform) {
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);
}

fn draw_background(ctx: &CanvasRenderingContext2d, theme: &Theme, width: f64, height: f64) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_connectors(ctx: &CanvasRenderingContext2d, layout: &TreeLayout, theme: &Theme) {
	ctx.set_stroke_style_str(&theme.connector.color.to_css());
	ctx.set_line_width(theme.connector.width);
	ctx.set_line_cap("square");
	ctx.begin_path();
	for s in layout.connectors() {
		ctx.move_to(s.x1, s.y1);
		ctx.line_to(s.x2, s.y2);
	}
	ctx.stroke();
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_card(
	ctx: &CanvasRenderingContext2d,
	layout: &TreeLayout,
	node: &PositionedNode,
	theme: &Theme,
	hovered: bool,
) {
	let animal = &node.node.animal;
	let style = theme.sex(animal.sexe);
	let card = &theme.card;
	let (x, y) = (layout.card_left(node), layout.card_top(node));
	let (w, h) = (layout.config.card_width, layout.config.card_height);
	let focal = node.id() == layout.root_id;

	ctx.save();
	if hovered {
		ctx.set_shadow_color(&card.hover_shadow.to_css());
		ctx.set_shadow_blur(card.hover_shadow_blur);
		ctx.set_shadow_offset_x(0.0);
		ctx.set_shadow_offset_y(4.0);
	}
	rounded_rect_path(ctx, x, y, w, h, card.corner_radius);
	ctx.set_fill_style_str(&style.fill.to_css());
	ctx.fill();
	ctx.restore();

	if animal.is_deceased() {
		ctx.save();
		rounded_rect_path(ctx, x, y, w, h, card.corner_radius);
		ctx.clip();
		draw_diagonal_hatch(ctx, theme, x, y, w, h);
		ctx.restore();
	}

	rounded_rect_path(ctx, x, y, w, h, card.corner_radius);
	if focal {
		ctx.set_stroke_style_str(&card.focus_border.to_css());
		ctx.set_line_width(card.focus_border_width);
	} else {
		ctx.set_stroke_style_str(&style.border.to_css());
		ctx.set_line_width(card.border_width);
	}
	if animal.is_deceased() {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(&JsValue::from_f64(6.0), &JsValue::from_f64(4.0)));
	}
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	let max_chars = ((w - 2.0 * card.padding) / (11.0 * GLYPH_RATIO)).floor() as usize;
	let tx = x + card.padding;
	let mut ty = y + card.padding;
	ctx.set_text_align("left");
	ctx.set_text_baseline("top");
	ctx.set_fill_style_str(&style.text.to_css());

	ctx.set_font(&card.title_font);
	let title = format!("{} {}", animal.identifiant_officiel, animal.sex_symbol());
	let _ = ctx.fill_text(&fit_label(&title, max_chars), tx, ty);
	ty += card.line_height + 2.0;

	ctx.set_font(&card.body_font);
	for line in card_lines(animal) {
		let _ = ctx.fill_text(&fit_label(&line, max_chars), tx, ty);
		ty += card.line_height;
	}
}

/// Body text of a card below the identifier line.
pub fn card_lines(animal: &Animal) -> Vec<String> {
	let mut lines = Vec::new();
	if let Some(nom) = animal.nom.as_deref().filter(|n| !n.trim().is_empty()) {
		lines.push(nom.to_string());
	}
	lines.push(animal.race_nom.clone().unwrap_or_else(|| "Race inconnue".to_string()));
	if let Some(birth) = animal.birth_label() {
		lines.push(format!("Né(e) le {birth}"));
	}
	if let Some(death) = animal.death_label() {
		lines.push(format!("Décès le {death}"));
	}
	lines.push(animal.status_label().to_string());
	lines
}

fn draw_diagonal_hatch(ctx: &CanvasRenderingContext2d, theme: &Theme, x: f64, y: f64, w: f64, h: f64) {
	let hatch = &theme.hatch;
	ctx.set_stroke_style_str(&hatch.color.to_css());
	ctx.set_line_width(hatch.line_width);
	ctx.begin_path();
	let mut offset = -h;
	while offset < w {
		ctx.move_to(x + offset, y + h);
		ctx.line_to(x + offset + h, y);
		offset += hatch.spacing;
	}
	ctx.stroke();
}

fn sector_path(ctx: &CanvasRenderingContext2d, sector: &NodeLayout) {
	ctx.begin_path();
	let _ = ctx.arc(0.0, 0.0, sector.outer_radius, sector.angle_start, sector.angle_end);
	let _ = ctx.arc_with_anticlockwise(
		0.0,
		0.0,
		sector.inner_radius,
		sector.angle_end,
		sector.angle_start,
		true,
	);
	ctx.close_path();
}

fn draw_sector(ctx: &CanvasRenderingContext2d, sector: &NodeLayout, theme: &Theme, hovered: bool) {
	let style = theme.sex(sector.animal.sexe);
	let fill = if hovered {
		style.fill.darken(theme.sector.hover_darken)
	} else {
		style.fill
	};

	sector_path(ctx, sector);
	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill();

	if sector.animal.is_deceased() {
		ctx.save();
		sector_path(ctx, sector);
		ctx.clip();
		draw_radial_hatch(ctx, theme, sector);
		ctx.restore();
	}

	sector_path(ctx, sector);
	ctx.set_stroke_style_str(&theme.sector.separator.to_css());
	ctx.set_line_width(theme.sector.separator_width);
	ctx.stroke();
	if hovered {
		ctx.set_stroke_style_str(&style.border.to_css());
		ctx.set_line_width(theme.sector.separator_width * 1.5);
		ctx.stroke();
	}

	draw_sector_label(ctx, sector, theme, style.text);
}

fn draw_radial_hatch(ctx: &CanvasRenderingContext2d, theme: &Theme, sector: &NodeLayout) {
	let hatch = &theme.hatch;
	ctx.set_stroke_style_str(&hatch.color.to_css());
	ctx.set_line_width(hatch.line_width);
	ctx.begin_path();
	let mut angle = sector.angle_start + hatch.angular_step / 2.0;
	while angle < sector.angle_end {
		let (cos, sin) = (angle.cos(), angle.sin());
		ctx.move_to(sector.inner_radius * cos, sector.inner_radius * sin);
		ctx.line_to(sector.outer_radius * cos, sector.outer_radius * sin);
		angle += hatch.angular_step;
	}
	ctx.stroke();
}

fn draw_sector_label(ctx: &CanvasRenderingContext2d, sector: &NodeLayout, theme: &Theme, color: Color) {
	let font_size = theme.sector.font_size(sector.generation);
	let mid = sector.mid_angle();
	let radius = sector.mid_radius();
	let arc_length = radius * sector.span();
	let max_chars = (arc_length / (font_size * GLYPH_RATIO)).floor() as usize;
	if max_chars < 2 {
		return;
	}

	ctx.save();
	let _ = ctx.translate(radius * mid.cos(), radius * mid.sin());
	let _ = ctx.rotate(label_rotation(mid));
	ctx.set_font(&format!("{font_size}px sans-serif"));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(&color.to_css());
	let _ = ctx.fill_text(&fit_label(sector.animal.display_name(), max_chars), 0.0, 0.0);
	ctx.restore();
}

fn draw_center(ctx: &CanvasRenderingContext2d, layout: &ConcentricLayout, theme: &Theme, hovered: bool) {
	let animal = &layout.center;
	let style = theme.sex(animal.sexe);
	let radius = layout.config.center_radius;

	ctx.save();
	if hovered {
		ctx.set_shadow_color(&theme.card.hover_shadow.to_css());
		ctx.set_shadow_blur(theme.card.hover_shadow_blur);
	}
	ctx.begin_path();
	let _ = ctx.arc(0.0, 0.0, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&style.fill.to_css());
	ctx.fill();
	ctx.restore();

	ctx.begin_path();
	let _ = ctx.arc(0.0, 0.0, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&style.border.to_css());
	ctx.set_line_width(theme.card.focus_border_width);
	ctx.stroke();

	let max_chars = (2.0 * radius * 0.8 / (14.0 * GLYPH_RATIO)).floor() as usize;
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(&style.text.to_css());
	ctx.set_font(&theme.sector.center_font);
	let _ = ctx.fill_text(&fit_label(animal.display_name(), max_chars), 0.0, -9.0);
	ctx.set_font(&theme.card.body_font);
	let _ = ctx.fill_text(
		&format!("{} {}", animal.identifiant_officiel, animal.sex_symbol()),
		0.0,
		9.0,
	);

	if layout.sectors.is_empty() {
		ctx.set_fill_style_str(&theme.connector.color.with_alpha(0.9).to_css());
		let _ = ctx.fill_text("Aucun descendant connu", 0.0, radius + 24.0);
	}
}

/// Truncates `text` to at most `max_chars` characters, ending with an
/// ellipsis when shortened.
pub fn fit_label(text: &str, max_chars: usize) -> String {
	if text.chars().count() <= max_chars {
		return text.to_string();
	}
	if max_chars == 0 {
		return String::new();
	}
	let mut out: String = text.chars().take(max_chars - 1).collect();
	out.push('…');
	out
}
