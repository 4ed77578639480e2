//! End-to-end checks from an API payload to the three layouts.

#![allow(unused_crate_dependencies)]

use std::f64::consts::TAU;

use animalineage_genealogy::components::genealogy::api::parse_genealogy;
use animalineage_genealogy::components::genealogy::concentric::{ConcentricConfig, ConcentricLayout};
use animalineage_genealogy::components::genealogy::generations::{
	flatten_descendants, group_by_generation, DescendantStats,
};
use animalineage_genealogy::components::genealogy::tree_layout::{TreeLayout, TreeLayoutConfig};

const PAYLOAD: &str = r#"{
	"animal": {"id": 10, "identifiant_officiel": "FR-010", "nom": "Belle", "sexe": "F", "race_nom": "Limousine", "statut": "vivant"},
	"level": 0,
	"pere": {
		"animal": {"id": 1, "identifiant_officiel": "FR-001", "sexe": "M", "race_nom": "Limousine", "date_deces": "2019-03-02"},
		"level": -1
	},
	"mere": {
		"animal": {"id": 2, "identifiant_officiel": "FR-002", "sexe": "F", "race_nom": "Salers"},
		"level": -1
	},
	"enfants": [
		{
			"animal": {"id": 20, "identifiant_officiel": "FR-020", "sexe": "M", "mere_id": 10},
			"level": 1,
			"enfants": [
				{"animal": {"id": 30, "identifiant_officiel": "FR-030", "sexe": "F", "pere_id": 20, "race_nom": "Limousine"}, "level": 2},
				{"animal": {"id": 31, "identifiant_officiel": "FR-031", "sexe": "M", "pere_id": 20, "race_nom": "Limousine", "statut": "mort"}, "level": 2}
			]
		},
		{
			"animal": {"id": 21, "identifiant_officiel": "FR-021", "sexe": "F", "race_nom": "Limousine", "mere_id": 10},
			"level": 1
		}
	]
}"#;

#[test]
fn tree_layout_places_every_animal_once() {
	let root = parse_genealogy(PAYLOAD).unwrap();
	let layout = TreeLayout::compute(&root, 1200.0, 800.0, TreeLayoutConfig::default());

	let mut ids: Vec<i64> = layout.nodes.iter().map(|n| n.id()).collect();
	ids.sort_unstable();
	assert_eq!(ids, vec![1, 2, 10, 20, 21, 30, 31]);

	let root_node = layout.nodes.iter().find(|n| n.id() == 10).unwrap();
	let father = layout.nodes.iter().find(|n| n.id() == 1).unwrap();
	let child = layout.nodes.iter().find(|n| n.id() == 20).unwrap();
	assert!(father.y < root_node.y);
	assert!(child.y > root_node.y);
}

#[test]
fn concentric_rings_cover_descendants_only() {
	let root = parse_genealogy(PAYLOAD).unwrap();
	let layout = ConcentricLayout::compute(&root, ConcentricConfig::default());

	assert_eq!(layout.center.id, 10);
	assert_eq!(layout.generations(), 2);
	assert!(layout.sectors.iter().all(|s| s.animal.id != 1 && s.animal.id != 2));

	let first_ring: f64 = layout
		.sectors
		.iter()
		.filter(|s| s.generation == 1)
		.map(|s| s.span())
		.sum();
	assert!((first_ring - TAU).abs() < 1e-9);

	let parent = layout.sectors.iter().find(|s| s.animal.id == 20).unwrap();
	for grandchild in layout.sectors.iter().filter(|s| s.generation == 2) {
		assert!(grandchild.angle_start >= parent.angle_start - 1e-9);
		assert!(grandchild.angle_end <= parent.angle_end + 1e-9);
	}
}

#[test]
fn generation_list_and_summary() {
	let root = parse_genealogy(PAYLOAD).unwrap();
	let entries = flatten_descendants(&root);
	let groups = group_by_generation(&entries);

	assert_eq!(groups[&1].len(), 2);
	assert_eq!(groups[&2].len(), 2);

	let stats = DescendantStats::from_entries(&entries);
	assert_eq!(stats.total, 4);
	assert_eq!(stats.males, 2);
	assert_eq!(stats.females, 2);
	assert_eq!(stats.deceased, 1);
	assert_eq!(stats.alive, 3);
	assert_eq!(stats.breeds.get("Limousine"), Some(&3));
}
