//! Concentric (sunburst) descendant layout.
//!
//! The focal animal is a disk at the origin. Each generation of descendants
//! is a ring; a child's angular sector always lies inside its parent's.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::f64::consts::{PI, TAU};

use super::types::{Animal, FamilyTreeNode};

/// Upper bound on flood-fill passes when deriving descendants.
const MAX_DERIVATION_PASSES: usize = 10;

/// Ring geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct ConcentricConfig {
	/// Radius of the focal disk.
	pub center_radius: f64,
	/// Width of every generation ring.
	pub ring_thickness: f64,
	/// Angle at which generation 1 starts, in radians.
	pub start_angle: f64,
}

impl Default for ConcentricConfig {
	fn default() -> Self {
		Self {
			center_radius: 70.0,
			ring_thickness: 85.0,
			start_angle: 0.0,
		}
	}
}

impl ConcentricConfig {
	/// Inner radius of a generation ring.
	pub fn inner_radius(&self, generation: u32) -> f64 {
		self.center_radius + (generation.saturating_sub(1)) as f64 * self.ring_thickness
	}

	/// Outer radius of a generation ring.
	pub fn outer_radius(&self, generation: u32) -> f64 {
		self.center_radius + generation as f64 * self.ring_thickness
	}
}

/// A descendant found by [`derive_descendants`].
#[derive(Clone, Debug, PartialEq)]
pub struct Descendant {
	/// The descendant.
	pub animal: Animal,
	/// 1 for children, 2 for grandchildren, …
	pub generation: u32,
}

/// An annulus sector for one descendant. Angles in radians, relative to the
/// disk centre, canvas orientation (clockwise, y down).
#[derive(Clone, Debug, PartialEq)]
pub struct NodeLayout {
	/// Animal drawn in the sector.
	pub animal: Animal,
	/// Ring index, 1 being the innermost.
	pub generation: u32,
	/// Inner radius.
	pub inner_radius: f64,
	/// Outer radius.
	pub outer_radius: f64,
	/// Start angle in radians.
	pub angle_start: f64,
	/// End angle in radians, never below `angle_start`.
	pub angle_end: f64,
}

impl NodeLayout {
	/// Angular width.
	pub fn span(&self) -> f64 {
		self.angle_end - self.angle_start
	}

	/// Angle of the sector bisector.
	pub fn mid_angle(&self) -> f64 {
		(self.angle_start + self.angle_end) / 2.0
	}

	/// Radius where the label sits.
	pub fn mid_radius(&self) -> f64 {
		(self.inner_radius + self.outer_radius) / 2.0
	}

	/// Whether the polar point lies in this sector. `angle` must be in [0, 2π).
	pub fn contains(&self, distance: f64, angle: f64) -> bool {
		if distance < self.inner_radius || distance > self.outer_radius {
			return false;
		}
		let start = normalize_angle(self.angle_start);
		let end = start + self.span();
		(angle >= start && angle < end) || (angle + TAU >= start && angle + TAU < end)
	}
}

/// Full concentric layout: the focal animal and its descendant sectors.
#[derive(Clone, Debug, PartialEq)]
pub struct ConcentricLayout {
	/// Ring geometry used.
	pub config: ConcentricConfig,
	/// Focal animal drawn in the centre disk.
	pub center: Animal,
	/// Descendant sectors, generation by generation.
	pub sectors: Vec<NodeLayout>,
}

impl ConcentricLayout {
	/// Derives descendants of `root` and places them on rings.
	pub fn compute(root: &FamilyTreeNode, config: ConcentricConfig) -> Self {
		let descendants = derive_descendants(root);
		let sectors = assign_sectors(root.id(), &descendants, &config);
		log::debug!(
			"concentric layout: {} descendants, {} sectors",
			descendants.len(),
			sectors.len()
		);
		Self {
			config,
			center: root.animal.clone(),
			sectors,
		}
	}

	/// Number of rings drawn.
	pub fn generations(&self) -> u32 {
		self.sectors.iter().map(|s| s.generation).max().unwrap_or(0)
	}

	/// Hit-test in world coordinates relative to the disk centre.
	/// Returns the animal id under the point, the focal animal included.
	pub fn animal_at(&self, wx: f64, wy: f64) -> Option<i64> {
		let distance = wx.hypot(wy);
		if distance <= self.config.center_radius {
			return Some(self.center.id);
		}
		let angle = normalize_angle(wy.atan2(wx));
		self.sectors
			.iter()
			.find(|s| s.contains(distance, angle))
			.map(|s| s.animal.id)
	}
}

/// Normalizes an angle to [0, 2π).
pub fn normalize_angle(angle: f64) -> f64 {
	let a = angle.rem_euclid(TAU);
	if a >= TAU { 0.0 } else { a }
}

/// Text rotation for a label centred at `mid_angle`: tangent to the ring,
/// turned half a turn on the lower half so it never reads upside down.
pub fn label_rotation(mid_angle: f64) -> f64 {
	let a = normalize_angle(mid_angle);
	let tangent = a + PI / 2.0;
	if a > 0.0 && a < PI {
		tangent - PI
	} else {
		tangent
	}
}

/// Collects every node embedded in the payload, first occurrence per id.
fn flatten_all(root: &FamilyTreeNode) -> Vec<&FamilyTreeNode> {
	let mut seen = HashSet::new();
	let mut out = Vec::new();
	let mut stack = vec![root];
	while let Some(node) = stack.pop() {
		if !seen.insert(node.id()) {
			continue;
		}
		out.push(node);
		// Reverse so the walk visits father, mother, then children in order.
		for child in node.enfants.iter().rev() {
			stack.push(child);
		}
		if let Some(mere) = node.mere.as_deref() {
			stack.push(mere);
		}
		if let Some(pere) = node.pere.as_deref() {
			stack.push(pere);
		}
	}
	out
}

/// Re-derives the true descendants of `root` from the whole payload.
///
/// Ancestor branches share the payload, so descendants are found by parent
/// ids rather than by position in the nesting: a node is a descendant when
/// its father or mother is the root or an already-known descendant.
pub fn derive_descendants(root: &FamilyTreeNode) -> Vec<Descendant> {
	let root_id = root.id();
	let candidates = flatten_all(root);
	let mut known: HashMap<i64, u32> = HashMap::from([(root_id, 0)]);
	let mut out = Vec::new();

	for pass in 0..MAX_DERIVATION_PASSES {
		let before = out.len();
		for node in &candidates {
			let animal = &node.animal;
			if known.contains_key(&animal.id) {
				continue;
			}
			let parent_generation = [animal.pere_id, animal.mere_id]
				.into_iter()
				.flatten()
				.filter_map(|p| known.get(&p).copied())
				.min();
			let Some(parent_generation) = parent_generation else {
				continue;
			};
			// `level` may not skip rings below the known parent.
			let generation = if animal.is_child_of(root_id) {
				1
			} else if node.level != 0 {
				node.level.unsigned_abs().min(parent_generation + 1)
			} else {
				parent_generation + 1
			};
			known.insert(animal.id, generation);
			out.push(Descendant {
				animal: animal.clone(),
				generation,
			});
		}
		if out.len() == before {
			log::trace!("descendant derivation settled after {} passes", pass + 1);
			break;
		}
	}
	out
}

/// Splits the circle among generation 1, then recursively subdivides each
/// parent's sector equally among its children.
pub fn assign_sectors(root_id: i64, descendants: &[Descendant], config: &ConcentricConfig) -> Vec<NodeLayout> {
	let mut sectors: Vec<NodeLayout> = Vec::new();
	// Sector index by animal id, per generation.
	let mut placed: BTreeMap<u32, HashMap<i64, usize>> = BTreeMap::new();

	let first: Vec<&Descendant> = descendants.iter().filter(|d| d.generation == 1).collect();
	let first = if first.is_empty() {
		descendants.iter().filter(|d| d.animal.is_child_of(root_id)).collect()
	} else {
		first
	};
	if first.is_empty() {
		return sectors;
	}
	let step = TAU / first.len() as f64;
	for (i, d) in first.iter().enumerate() {
		let start = config.start_angle + i as f64 * step;
		placed.entry(1).or_default().insert(d.animal.id, sectors.len());
		sectors.push(NodeLayout {
			animal: d.animal.clone(),
			generation: 1,
			inner_radius: config.inner_radius(1),
			outer_radius: config.outer_radius(1),
			angle_start: start,
			angle_end: if i + 1 == first.len() {
				config.start_angle + TAU
			} else {
				start + step
			},
		});
	}

	let outer: BTreeSet<u32> = descendants.iter().map(|d| d.generation).filter(|&g| g > 1).collect();
	for generation in outer {
		// Group this generation's nodes under their nearest placed parent,
		// keeping parent order stable.
		let mut groups: Vec<(usize, Vec<&Descendant>)> = Vec::new();
		for d in descendants.iter().filter(|d| d.generation == generation) {
			let parent = placed.range(..generation).rev().find_map(|(_, ring)| {
				[d.animal.pere_id, d.animal.mere_id]
					.into_iter()
					.flatten()
					.find_map(|p| ring.get(&p).copied())
			});
			match parent {
				Some(p) => match groups.iter_mut().find(|(idx, _)| *idx == p) {
					Some((_, children)) => children.push(d),
					None => groups.push((p, vec![d])),
				},
				None => log::debug!(
					"no placed parent for {} in generation {}",
					d.animal.identifiant_officiel,
					generation
				),
			}
		}
		groups.sort_by_key(|(idx, _)| *idx);

		for (parent_idx, children) in groups {
			let (start, end) = (sectors[parent_idx].angle_start, sectors[parent_idx].angle_end);
			let step = (end - start) / children.len() as f64;
			for (i, d) in children.iter().enumerate() {
				let a0 = start + i as f64 * step;
				placed.entry(generation).or_default().insert(d.animal.id, sectors.len());
				sectors.push(NodeLayout {
					animal: d.animal.clone(),
					generation,
					inner_radius: config.inner_radius(generation),
					outer_radius: config.outer_radius(generation),
					angle_start: a0,
					angle_end: if i + 1 == children.len() { end } else { a0 + step },
				});
			}
		}
	}
	sectors
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: i64, pere: Option<i64>, mere: Option<i64>, level: i32) -> FamilyTreeNode {
		FamilyTreeNode {
			animal: Animal {
				id,
				identifiant_officiel: format!("FR{id:03}"),
				pere_id: pere,
				mere_id: mere,
				..Default::default()
			},
			level,
			..Default::default()
		}
	}

	fn sector(layout: &ConcentricLayout, id: i64) -> &NodeLayout {
		layout.sectors.iter().find(|s| s.animal.id == id).unwrap()
	}

	#[test]
	fn two_children_split_circle_in_half() {
		let mut root = node(1, None, None, 0);
		root.enfants = vec![node(2, None, Some(1), 1), node(3, Some(1), None, 1)];
		let layout = ConcentricLayout::compute(&root, ConcentricConfig::default());
		assert_eq!(layout.sectors.len(), 2);
		let a = sector(&layout, 2);
		let b = sector(&layout, 3);
		assert_eq!(a.angle_start, 0.0);
		assert!((a.span() - PI).abs() < 1e-12);
		assert!((b.angle_start - PI).abs() < 1e-12);
		assert!((b.span() - PI).abs() < 1e-12);
	}

	/// 1 -> {2, 3, 4}; 2 -> {5, 6}; 4 -> {7}; 6 -> {8, 9, 10}, with an ancestor branch.
	fn pedigree() -> FamilyTreeNode {
		let mut root = node(1, Some(50), Some(51), 0);
		root.pere = Some(Box::new(node(50, Some(60), None, -1)));
		root.mere = Some(Box::new(node(51, None, None, -1)));
		let mut c2 = node(2, Some(1), None, 1);
		let mut c6 = node(6, Some(2), None, 2);
		c6.enfants = vec![node(8, Some(6), None, 3), node(9, None, Some(6), 3), node(10, Some(6), None, 3)];
		c2.enfants = vec![node(5, Some(2), None, 2), c6];
		let mut c4 = node(4, None, Some(1), 1);
		c4.enfants = vec![node(7, Some(4), None, 2)];
		root.enfants = vec![c2, node(3, Some(1), None, 1), c4];
		root
	}

	#[test]
	fn ancestors_are_excluded() {
		let descendants = derive_descendants(&pedigree());
		let mut ids: Vec<i64> = descendants.iter().map(|d| d.animal.id).collect();
		ids.sort();
		assert_eq!(ids, vec![2, 3, 4, 5, 6, 7, 8, 9, 10]);
		let generation_of = |id: i64| descendants.iter().find(|d| d.animal.id == id).unwrap().generation;
		assert_eq!((generation_of(2), generation_of(6), generation_of(9)), (1, 2, 3));
	}

	#[test]
	fn generation_one_covers_full_circle() {
		let layout = ConcentricLayout::compute(&pedigree(), ConcentricConfig::default());
		let total: f64 = layout.sectors.iter().filter(|s| s.generation == 1).map(NodeLayout::span).sum();
		assert!((total - TAU).abs() < 1e-12);
	}

	#[test]
	fn children_subdivide_parent_span() {
		let layout = ConcentricLayout::compute(&pedigree(), ConcentricConfig::default());
		for (parent, children) in [(2, vec![5, 6]), (4, vec![7]), (6, vec![8, 9, 10])] {
			let p = sector(&layout, parent);
			let sum: f64 = children.iter().map(|&c| sector(&layout, c).span()).sum();
			assert!((sum - p.span()).abs() < 1e-12, "parent {parent}");
			for c in children {
				let s = sector(&layout, c);
				assert!(s.angle_start >= p.angle_start - 1e-12 && s.angle_end <= p.angle_end + 1e-12);
				assert_eq!(s.inner_radius, p.outer_radius);
			}
		}
		assert_eq!(layout.generations(), 3);
	}

	#[test]
	fn derivation_is_order_independent() {
		// Grandchild nested before its parent in the payload.
		let mut root = node(1, None, None, 0);
		let mut stray = node(3, Some(2), None, 1);
		stray.enfants = vec![node(2, Some(1), None, 1)];
		root.enfants = vec![stray];
		let descendants = derive_descendants(&root);
		let generation_of = |id: i64| descendants.iter().find(|d| d.animal.id == id).map(|d| d.generation);
		assert_eq!(generation_of(2), Some(1));
		assert_eq!(generation_of(3), Some(1));
	}

	#[test]
	fn layout_is_deterministic() {
		let tree = pedigree();
		let a = ConcentricLayout::compute(&tree, ConcentricConfig::default());
		let b = ConcentricLayout::compute(&tree.clone(), ConcentricConfig::default());
		assert_eq!(a, b);
	}

	#[test]
	fn oversized_level_stays_next_to_parent() {
		let mut root = node(1, None, None, 0);
		let mut child = node(2, Some(1), None, 1);
		child.enfants = vec![node(3, Some(2), None, 20_000_000), node(4, Some(2), None, i32::MIN)];
		root.enfants = vec![child];
		let layout = ConcentricLayout::compute(&root, ConcentricConfig::default());

		assert_eq!(layout.generations(), 2);
		let config = &layout.config;
		for id in [3, 4] {
			let s = sector(&layout, id);
			assert_eq!(s.generation, 2);
			assert_eq!((s.inner_radius, s.outer_radius), (config.inner_radius(2), config.outer_radius(2)));
		}
		let parent = sector(&layout, 2);
		let sum = sector(&layout, 3).span() + sector(&layout, 4).span();
		assert!((sum - parent.span()).abs() < 1e-12);
	}

	#[test]
	fn polar_hit_testing() {
		let mut root = node(1, None, None, 0);
		root.enfants = vec![node(2, Some(1), None, 1), node(3, Some(1), None, 1)];
		let config = ConcentricConfig::default();
		let r = (config.inner_radius(1) + config.outer_radius(1)) / 2.0;
		let layout = ConcentricLayout::compute(&root, config);
		assert_eq!(layout.animal_at(0.0, 0.0), Some(1));
		// Canvas y points down: positive y is the 0..π half.
		assert_eq!(layout.animal_at(0.0, r), Some(2));
		assert_eq!(layout.animal_at(0.0, -r), Some(3));
		assert_eq!(layout.animal_at(r, -0.001), Some(3));
		assert_eq!(layout.animal_at(10_000.0, 0.0), None);
	}

	#[test]
	fn sector_wraps_past_zero() {
		let s = NodeLayout {
			animal: Animal::default(),
			generation: 1,
			inner_radius: 10.0,
			outer_radius: 20.0,
			angle_start: -PI / 4.0,
			angle_end: PI / 4.0,
		};
		assert!(s.contains(15.0, 0.1));
		assert!(s.contains(15.0, normalize_angle(-0.1)));
		assert!(!s.contains(15.0, PI));
	}

	#[test]
	fn labels_stay_upright() {
		// Right side: text runs downward-tangent, untouched.
		assert!((label_rotation(0.0) - PI / 2.0).abs() < 1e-12);
		// Bottom: flipped half a turn.
		assert!((label_rotation(PI / 2.0) - 0.0).abs() < 1e-12);
		// Top: tangent already reads left to right.
		assert!((label_rotation(3.0 * PI / 2.0) - 2.0 * PI).abs() < 1e-12);
	}
}
