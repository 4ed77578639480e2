//! Classic box-and-line pedigree layout.
//!
//! Every reachable animal becomes a fixed-size card. Each `level` maps to one
//! row, rows are centred on the canvas, then a single pass pulls parent pairs
//! above their child and child groups below their parent. The pass does not
//! iterate to a fixed point, so a final sweep restores the minimum spacing
//! between neighbours on each row.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::types::FamilyTreeNode;

/// Card geometry and spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeLayoutConfig {
	/// Card width.
	pub card_width: f64,
	/// Card height.
	pub card_height: f64,
	/// Horizontal gap between neighbouring cards.
	pub gap: f64,
	/// Vertical distance between row centres.
	pub level_height: f64,
}

impl Default for TreeLayoutConfig {
	fn default() -> Self {
		Self {
			card_width: 170.0,
			card_height: 112.0,
			gap: 30.0,
			level_height: 170.0,
		}
	}
}

impl TreeLayoutConfig {
	/// Minimum distance between two card centres on the same row.
	pub fn pitch(&self) -> f64 {
		self.card_width + self.gap
	}
}

/// A card placed on the canvas. `x`/`y` are the card centre in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode<'a> {
	/// Source node.
	pub node: &'a FamilyTreeNode,
	/// Row: negative for ancestors, positive for descendants.
	pub level: i32,
	/// Card centre x.
	pub x: f64,
	/// Card centre y.
	pub y: f64,
	/// Indices of placed father and mother.
	pub parents: Vec<usize>,
	/// Indices of placed children, in source order.
	pub children: Vec<usize>,
}

impl PositionedNode<'_> {
	/// Animal id of the card.
	pub fn id(&self) -> i64 {
		self.node.id()
	}
}

/// An axis-aligned connector segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
	/// Start x.
	pub x1: f64,
	/// Start y.
	pub y1: f64,
	/// End x.
	pub x2: f64,
	/// End y.
	pub y2: f64,
}

impl Segment {
	fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
		Self { x1, y1, x2, y2 }
	}
}

/// Complete classic-tree layout for one render.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeLayout<'a> {
	/// Geometry used.
	pub config: TreeLayoutConfig,
	/// Cards in discovery order, focal card first.
	pub nodes: Vec<PositionedNode<'a>>,
	/// Focal animal id.
	pub root_id: i64,
}

impl<'a> TreeLayout<'a> {
	/// Lays out `root` on a canvas of `width` x `height`.
	pub fn compute(root: &'a FamilyTreeNode, width: f64, height: f64, config: TreeLayoutConfig) -> Self {
		let mut nodes = Vec::new();
		let mut visited = HashSet::new();
		collect(root, 0, &mut visited, &mut nodes);
		link(&mut nodes);

		let center_x = width / 2.0;
		let center_y = height / 2.0;
		for (level, row) in rows(&nodes) {
			let total = row.len() as f64 * config.pitch() - config.gap;
			let left = center_x - total / 2.0 + config.card_width / 2.0;
			for (i, idx) in row.into_iter().enumerate() {
				nodes[idx].x = left + i as f64 * config.pitch();
				nodes[idx].y = center_y + level as f64 * config.level_height;
			}
		}

		let mut layout = Self {
			config,
			nodes,
			root_id: root.id(),
		};
		layout.optimize();
		layout.separate_rows();
		log::debug!("tree layout: {} cards", layout.nodes.len());
		layout
	}

	/// Single pass pulling parents over children and children under parents.
	fn optimize(&mut self) {
		for i in 0..self.nodes.len() {
			let level = self.nodes[i].level;
			let x = self.nodes[i].x;

			if level <= 0 && self.nodes[i].parents.len() == 2 {
				let (a, b) = (self.nodes[i].parents[0], self.nodes[i].parents[1]);
				let delta = x - (self.nodes[a].x + self.nodes[b].x) / 2.0;
				self.nodes[a].x += delta;
				self.nodes[b].x += delta;
			}

			if level >= 0 && !self.nodes[i].children.is_empty() {
				let children = self.nodes[i].children.clone();
				let (min, max) = span(children.iter().map(|&c| self.nodes[c].x));
				let delta = x - (min + max) / 2.0;
				for c in children {
					self.nodes[c].x += delta;
				}
			}
		}
	}

	/// Pushes cards right so neighbours on a row never overlap.
	fn separate_rows(&mut self) {
		let pitch = self.config.pitch();
		for (_, mut row) in rows(&self.nodes) {
			row.sort_by(|&a, &b| self.nodes[a].x.total_cmp(&self.nodes[b].x));
			for pair in row.windows(2) {
				let min_x = self.nodes[pair[0]].x + pitch;
				if self.nodes[pair[1]].x < min_x {
					self.nodes[pair[1]].x = min_x;
				}
			}
		}
	}

	/// Left edge of a card.
	pub fn card_left(&self, node: &PositionedNode) -> f64 {
		node.x - self.config.card_width / 2.0
	}

	/// Top edge of a card.
	pub fn card_top(&self, node: &PositionedNode) -> f64 {
		node.y - self.config.card_height / 2.0
	}

	/// Card containing the world point, if any.
	pub fn node_at(&self, wx: f64, wy: f64) -> Option<&PositionedNode<'a>> {
		let (hw, hh) = (self.config.card_width / 2.0, self.config.card_height / 2.0);
		self.nodes
			.iter()
			.find(|n| (wx - n.x).abs() <= hw && (wy - n.y).abs() <= hh)
	}

	/// Orthogonal connector segments between parents and children.
	///
	/// Ancestor links are emitted from the child side (levels <= 0),
	/// descendant links from the parent side (levels >= 0), so each link is
	/// drawn once.
	pub fn connectors(&self) -> Vec<Segment> {
		let half_h = self.config.card_height / 2.0;
		let mut segments = Vec::new();

		for node in &self.nodes {
			if node.level <= 0 && !node.parents.is_empty() {
				let parents: Vec<&PositionedNode> = node.parents.iter().map(|&p| &self.nodes[p]).collect();
				let bottom = parents.iter().map(|p| p.y + half_h).fold(f64::MIN, f64::max);
				let top = node.y - half_h;
				let mid_y = (bottom + top) / 2.0;
				for p in &parents {
					segments.push(Segment::new(p.x, p.y + half_h, p.x, mid_y));
				}
				let (min, max) = span(parents.iter().map(|p| p.x).chain([node.x]));
				if max > min {
					segments.push(Segment::new(min, mid_y, max, mid_y));
				}
				segments.push(Segment::new(node.x, mid_y, node.x, top));
			}

			if node.level >= 0 && !node.children.is_empty() {
				let children: Vec<&PositionedNode> = node.children.iter().map(|&c| &self.nodes[c]).collect();
				let bottom = node.y + half_h;
				let top = children.iter().map(|c| c.y - half_h).fold(f64::MAX, f64::min);
				let mid_y = (bottom + top) / 2.0;
				segments.push(Segment::new(node.x, bottom, node.x, mid_y));
				let (min, max) = span(children.iter().map(|c| c.x).chain([node.x]));
				if max > min {
					segments.push(Segment::new(min, mid_y, max, mid_y));
				}
				for c in &children {
					segments.push(Segment::new(c.x, mid_y, c.x, c.y - half_h));
				}
			}
		}
		segments
	}
}

fn collect<'a>(
	node: &'a FamilyTreeNode,
	level: i32,
	visited: &mut HashSet<i64>,
	out: &mut Vec<PositionedNode<'a>>,
) {
	if !visited.insert(node.id()) {
		return;
	}
	out.push(PositionedNode {
		node,
		level,
		x: 0.0,
		y: 0.0,
		parents: Vec::new(),
		children: Vec::new(),
	});
	for parent in node.parents() {
		collect(parent, level - 1, visited, out);
	}
	for child in &node.enfants {
		collect(child, level + 1, visited, out);
	}
}

/// Resolves structural links to indices. A link whose target was placed
/// on a different path still resolves by id, but never across the same row
/// or in the wrong vertical direction.
fn link(nodes: &mut [PositionedNode]) {
	let index: HashMap<i64, usize> = nodes.iter().enumerate().map(|(i, n)| (n.id(), i)).collect();
	for i in 0..nodes.len() {
		let level = nodes[i].level;
		let parents: Vec<usize> = nodes[i]
			.node
			.parents()
			.filter_map(|p| index.get(&p.id()).copied())
			.filter(|&p| nodes[p].level < level)
			.collect();
		let mut children: Vec<usize> = nodes[i]
			.node
			.enfants
			.iter()
			.filter_map(|c| index.get(&c.id()).copied())
			.filter(|&c| nodes[c].level > level)
			.collect();
		children.dedup();
		nodes[i].parents = parents;
		nodes[i].children = children;
	}
}

/// Node indices grouped by level, in discovery order.
fn rows(nodes: &[PositionedNode]) -> BTreeMap<i32, Vec<usize>> {
	let mut rows: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
	for (i, node) in nodes.iter().enumerate() {
		rows.entry(node.level).or_default().push(i);
	}
	rows
}

fn span(values: impl Iterator<Item = f64>) -> (f64, f64) {
	values.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)))
}
