//! Descendants flattened and grouped by generation, with summary counts.

use std::collections::{BTreeMap, HashSet};

use super::types::{Animal, FamilyTreeNode, Sex};

/// Label used in the breed histogram when an animal has no breed.
pub const UNKNOWN_BREED: &str = "Race inconnue";

/// One descendant with its generation relative to the focal animal.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationEntry {
	/// The descendant.
	pub animal: Animal,
	/// 1 for children, 2 for grandchildren, …
	pub generation: u32,
}

/// Depth-first walk of `enfants`. Each animal is listed once, at the depth
/// of the first path that reaches it; the root itself is never listed.
pub fn flatten_descendants(root: &FamilyTreeNode) -> Vec<GenerationEntry> {
	let mut visited = HashSet::from([root.id()]);
	let mut out = Vec::new();
	walk(root, 1, &mut visited, &mut out);
	out
}

fn walk(node: &FamilyTreeNode, generation: u32, visited: &mut HashSet<i64>, out: &mut Vec<GenerationEntry>) {
	for child in &node.enfants {
		if !visited.insert(child.id()) {
			continue;
		}
		out.push(GenerationEntry {
			animal: child.animal.clone(),
			generation,
		});
		walk(child, generation + 1, visited, out);
	}
}

/// Entries keyed by generation, ascending, keeping walk order inside a group.
pub fn group_by_generation(entries: &[GenerationEntry]) -> BTreeMap<u32, Vec<GenerationEntry>> {
	let mut groups: BTreeMap<u32, Vec<GenerationEntry>> = BTreeMap::new();
	for entry in entries {
		groups.entry(entry.generation).or_default().push(entry.clone());
	}
	groups
}

/// Aggregate counts shown in the summary panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescendantStats {
	/// Descendants listed.
	pub total: usize,
	/// Males.
	pub males: usize,
	/// Females.
	pub females: usize,
	/// Records without a sex.
	pub unknown_sex: usize,
	/// Alive.
	pub alive: usize,
	/// Deceased, by status or death date.
	pub deceased: usize,
	/// Breed name to count, alphabetical.
	pub breeds: BTreeMap<String, usize>,
}

impl DescendantStats {
	/// Counts over a flattened descendant list.
	pub fn from_entries(entries: &[GenerationEntry]) -> Self {
		let mut stats = Self::default();
		for GenerationEntry { animal, .. } in entries {
			stats.total += 1;
			match animal.sexe {
				Some(Sex::Male) => stats.males += 1,
				Some(Sex::Female) => stats.females += 1,
				None => stats.unknown_sex += 1,
			}
			if animal.is_deceased() {
				stats.deceased += 1;
			} else {
				stats.alive += 1;
			}
			let breed = animal
				.race_nom
				.as_deref()
				.filter(|b| !b.trim().is_empty())
				.unwrap_or(UNKNOWN_BREED);
			*stats.breeds.entry(breed.to_string()).or_insert(0) += 1;
		}
		stats
	}
}

/// Heading for a generation section.
pub fn generation_title(generation: u32) -> String {
	match generation {
		1 => "Enfants".to_string(),
		2 => "Petits-enfants".to_string(),
		3 => "Arrière-petits-enfants".to_string(),
		n => format!("Génération {n}"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: i64, sexe: Option<Sex>, race: Option<&str>, dead: bool, enfants: Vec<FamilyTreeNode>) -> FamilyTreeNode {
		FamilyTreeNode {
			animal: Animal {
				id,
				identifiant_officiel: format!("FR{id:03}"),
				sexe,
				race_nom: race.map(str::to_string),
				date_deces: dead.then(|| "2023-02-01".to_string()),
				..Default::default()
			},
			enfants,
			..Default::default()
		}
	}

	/// Root 1 -> {2, 3}; 2 -> {4, 5}; 3 -> {5, 1}; 5 -> {6}.
	fn family() -> FamilyTreeNode {
		let six = node(6, Some(Sex::Female), Some("Lacaune"), false, vec![]);
		let five = || node(5, Some(Sex::Male), Some("Lacaune"), true, vec![six.clone()]);
		let two = node(2, Some(Sex::Female), Some("Manech"), false, vec![node(4, Some(Sex::Male), None, false, vec![]), five()]);
		let three = node(3, Some(Sex::Male), Some("Lacaune"), false, vec![five(), node(1, Some(Sex::Female), None, false, vec![])]);
		node(1, Some(Sex::Female), Some("Lacaune"), false, vec![two, three])
	}

	#[test]
	fn lists_each_reachable_descendant_once() {
		let entries = flatten_descendants(&family());
		let ids: Vec<i64> = entries.iter().map(|e| e.animal.id).collect();
		assert_eq!(ids, vec![2, 4, 5, 6, 3]);
		let unique: HashSet<i64> = ids.iter().copied().collect();
		assert_eq!(unique.len(), entries.len());
		assert!(!unique.contains(&1));
	}

	#[test]
	fn generation_is_walk_depth() {
		let entries = flatten_descendants(&family());
		let generation_of = |id: i64| entries.iter().find(|e| e.animal.id == id).unwrap().generation;
		assert_eq!((generation_of(2), generation_of(3), generation_of(4), generation_of(5), generation_of(6)), (1, 1, 2, 2, 3));

		let groups = group_by_generation(&entries);
		assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
		assert_eq!(groups[&1].iter().map(|e| e.animal.id).collect::<Vec<_>>(), vec![2, 3]);
	}

	#[test]
	fn summary_counts() {
		let stats = DescendantStats::from_entries(&flatten_descendants(&family()));
		assert_eq!(stats.total, 5);
		assert_eq!((stats.males, stats.females), (3, 2));
		assert_eq!((stats.alive, stats.deceased), (4, 1));
		assert_eq!(stats.breeds.get("Lacaune"), Some(&3));
		assert_eq!(stats.breeds.get("Manech"), Some(&1));
		assert_eq!(stats.breeds.get(UNKNOWN_BREED), Some(&1));
	}

	#[test]
	fn missing_sex_is_counted_apart() {
		let root = node(1, Some(Sex::Female), None, false, vec![node(2, None, None, false, vec![])]);
		let stats = DescendantStats::from_entries(&flatten_descendants(&root));
		assert_eq!((stats.males, stats.females, stats.unknown_sex), (0, 0, 1));
	}

	#[test]
	fn empty_tree_has_no_entries() {
		let root = node(1, Some(Sex::Male), None, false, vec![]);
		assert!(flatten_descendants(&root).is_empty());
		assert_eq!(DescendantStats::from_entries(&[]), DescendantStats::default());
	}

	#[test]
	fn titles() {
		assert_eq!(generation_title(1), "Enfants");
		assert_eq!(generation_title(7), "Génération 7");
	}
}
