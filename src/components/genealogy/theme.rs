//! Visual theming for the genealogy canvases.
//!
//! Colors per sex, card and sector styling, hatch patterns for deceased
//! animals, and fonts.

use super::types::Sex;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in [0, 1].
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with another opacity.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// CSS color string accepted by canvas style setters.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Fill, border and text colors for one sex.
#[derive(Clone, Debug)]
pub struct SexStyle {
	/// Card and sector fill.
	pub fill: Color,
	/// Card border and hovered sector outline.
	pub border: Color,
	/// Label color.
	pub text: Color,
}

/// Diagonal / radial hatching drawn over deceased animals.
#[derive(Clone, Debug)]
pub struct HatchStyle {
	/// Hatch line color.
	pub color: Color,
	/// Hatch line width.
	pub line_width: f64,
	/// Distance between lines on cards, in world units.
	pub spacing: f64,
	/// Angle between radial lines on sectors, in radians.
	pub angular_step: f64,
}

/// Card look for the classic tree.
#[derive(Clone, Debug)]
pub struct CardStyle {
	/// Rounded corner radius.
	pub corner_radius: f64,
	/// Border width of ordinary cards.
	pub border_width: f64,
	/// Border width of the focal card.
	pub focus_border_width: f64,
	/// Border color of the focal card.
	pub focus_border: Color,
	/// Drop shadow under the hovered card or centre disk.
	pub hover_shadow: Color,
	/// Blur radius of the hover shadow.
	pub hover_shadow_blur: f64,
	/// Inner padding around text.
	pub padding: f64,
	/// Distance between body text lines.
	pub line_height: f64,
	/// Font of the identifier line.
	pub title_font: String,
	/// Font of the other lines.
	pub body_font: String,
}

/// Connector lines between cards.
#[derive(Clone, Debug)]
pub struct ConnectorStyle {
	/// Line color.
	pub color: Color,
	/// Line width.
	pub width: f64,
}

/// Sector look for the concentric view.
#[derive(Clone, Debug)]
pub struct SectorStyle {
	/// Outline between sectors.
	pub separator: Color,
	/// Outline width.
	pub separator_width: f64,
	/// Darkening applied to the hovered sector fill.
	pub hover_darken: f64,
	/// Label font size for generation 1; shrinks by `font_step` per ring.
	pub base_font_size: f64,
	/// Font shrink per generation.
	pub font_step: f64,
	/// Floor for label font size.
	pub min_font_size: f64,
	/// Font of the focal animal's name in the centre disk.
	pub center_font: String,
}

impl SectorStyle {
	/// Label font size for a ring.
	pub fn font_size(&self, generation: u32) -> f64 {
		(self.base_font_size - self.font_step * generation.saturating_sub(1) as f64).max(self.min_font_size)
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background.
	pub background: Color,
	/// Blue palette for males.
	pub male: SexStyle,
	/// Pink palette for females.
	pub female: SexStyle,
	/// Neutral palette for animals without a recorded sex.
	pub unknown: SexStyle,
	/// Deceased hatching.
	pub hatch: HatchStyle,
	/// Tree cards.
	pub card: CardStyle,
	/// Tree connectors.
	pub connector: ConnectorStyle,
	/// Concentric sectors.
	pub sector: SectorStyle,
}

impl Theme {
	/// Palette for an animal's sex.
	pub fn sex(&self, sex: Option<Sex>) -> &SexStyle {
		match sex {
			Some(Sex::Male) => &self.male,
			Some(Sex::Female) => &self.female,
			None => &self.unknown,
		}
	}

	/// Light theme used inside the AnimaLineage dashboard.
	pub fn light() -> Self {
		Self {
			background: Color::rgb(248, 250, 252),
			male: SexStyle {
				fill: Color::rgb(219, 234, 254),
				border: Color::rgb(59, 130, 246),
				text: Color::rgb(30, 58, 138),
			},
			female: SexStyle {
				fill: Color::rgb(252, 231, 243),
				border: Color::rgb(236, 72, 153),
				text: Color::rgb(131, 24, 67),
			},
			unknown: SexStyle {
				fill: Color::rgb(241, 245, 249),
				border: Color::rgb(148, 163, 184),
				text: Color::rgb(51, 65, 85),
			},
			hatch: HatchStyle {
				color: Color::rgba(55, 65, 81, 0.35),
				line_width: 1.5,
				spacing: 10.0,
				angular_step: 0.08,
			},
			card: CardStyle {
				corner_radius: 8.0,
				border_width: 2.0,
				focus_border_width: 4.0,
				focus_border: Color::rgb(217, 119, 6),
				hover_shadow: Color::rgba(15, 23, 42, 0.45),
				hover_shadow_blur: 16.0,
				padding: 10.0,
				line_height: 15.0,
				title_font: "bold 13px sans-serif".to_string(),
				body_font: "11px sans-serif".to_string(),
			},
			connector: ConnectorStyle {
				color: Color::rgb(100, 116, 139),
				width: 2.0,
			},
			sector: SectorStyle {
				separator: Color::rgb(255, 255, 255),
				separator_width: 2.0,
				hover_darken: 0.12,
				base_font_size: 13.0,
				font_step: 2.0,
				min_font_size: 8.0,
				center_font: "bold 14px sans-serif".to_string(),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}
