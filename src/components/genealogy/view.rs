//! Pan and zoom state shared by the canvas views.

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.3;
/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 2.0;

const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Pan and zoom transform applied to the whole scene.
///
/// A world point `p` lands on screen at `p * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to `MIN_ZOOM..=MAX_ZOOM`).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Inverse transform of a screen point.
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Scales by `factor` keeping the screen point `(px, py)` fixed.
	pub fn zoom_at(&mut self, px: f64, py: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = px - (px - self.x) * ratio;
		self.y = py - (py - self.y) * ratio;
		self.k = new_k;
	}

	/// Applies one wheel notch: negative delta zooms in.
	pub fn wheel(&mut self, px: f64, py: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			WHEEL_ZOOM_OUT
		} else {
			WHEEL_ZOOM_IN
		};
		self.zoom_at(px, py, factor);
	}
}

/// Tracks an in-progress canvas pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Whether a drag is in progress.
	pub active: bool,
	/// Pointer x at drag start.
	pub start_x: f64,
	/// Pointer y at drag start.
	pub start_y: f64,
	/// Transform x at drag start.
	pub transform_start_x: f64,
	/// Transform y at drag start.
	pub transform_start_y: f64,
}

impl PanState {
	/// Starts a drag at the pointer.
	pub fn begin(&mut self, x: f64, y: f64, transform: &ViewTransform) {
		self.active = true;
		self.start_x = x;
		self.start_y = y;
		self.transform_start_x = transform.x;
		self.transform_start_y = transform.y;
	}

	/// Transform for the pointer now at `(x, y)`, or `None` when not panning.
	pub fn drag_to(&self, x: f64, y: f64, transform: &ViewTransform) -> Option<ViewTransform> {
		if !self.active {
			return None;
		}
		Some(ViewTransform {
			x: self.transform_start_x + (x - self.start_x),
			y: self.transform_start_y + (y - self.start_y),
			k: transform.k,
		})
	}

	/// Ends the drag.
	pub fn end(&mut self) {
		self.active = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zoom_stays_clamped() {
		let mut t = ViewTransform::default();
		for _ in 0..200 {
			t.wheel(400.0, 300.0, -120.0);
		}
		assert_eq!(t.k, MAX_ZOOM);
		for _ in 0..200 {
			t.wheel(10.0, 20.0, 120.0);
		}
		assert_eq!(t.k, MIN_ZOOM);
		for i in 0..100 {
			t.wheel(0.0, 0.0, if i % 3 == 0 { 1.0 } else { -1.0 });
			assert!((MIN_ZOOM..=MAX_ZOOM).contains(&t.k));
		}
	}

	#[test]
	fn zoom_keeps_pivot_fixed() {
		let mut t = ViewTransform {
			x: 50.0,
			y: -20.0,
			k: 1.0,
		};
		let before = t.screen_to_world(300.0, 200.0);
		t.wheel(300.0, 200.0, -1.0);
		let after = t.screen_to_world(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn pan_accumulates_offset() {
		let t = ViewTransform {
			x: 10.0,
			y: 10.0,
			k: 1.5,
		};
		let mut pan = PanState::default();
		assert!(pan.drag_to(5.0, 5.0, &t).is_none());
		pan.begin(100.0, 100.0, &t);
		let moved = pan.drag_to(130.0, 80.0, &t).unwrap();
		assert_eq!((moved.x, moved.y, moved.k), (40.0, -10.0, 1.5));
		pan.end();
		assert!(!pan.active);
	}
}
