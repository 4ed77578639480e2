//! Genealogy data structures as delivered by the AnimaLineage API.

use chrono::NaiveDate;
use serde::Deserialize;

/// Sex of an animal.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
pub enum Sex {
	/// `"M"` on the wire.
	#[serde(rename = "M")]
	Male,
	/// `"F"` on the wire.
	#[serde(rename = "F")]
	Female,
}

impl Sex {
	/// Glyph shown next to the identifier.
	pub fn symbol(self) -> &'static str {
		match self {
			Sex::Male => "♂",
			Sex::Female => "♀",
		}
	}
}

/// Life status reported by the backend.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	/// Alive.
	Vivant,
	/// Deceased.
	Mort,
}

/// Identity record of an animal.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Animal {
	/// Database id.
	pub id: i64,
	/// Official identifier (ear tag, registry number). Unique.
	pub identifiant_officiel: String,
	/// Optional name.
	#[serde(default)]
	pub nom: Option<String>,
	/// `None` when the record carries no sex.
	#[serde(default)]
	pub sexe: Option<Sex>,
	/// Breed display name.
	#[serde(default)]
	pub race_nom: Option<String>,
	/// Birth date, `YYYY-MM-DD`.
	#[serde(default)]
	pub date_naissance: Option<String>,
	/// Death date, `YYYY-MM-DD`.
	#[serde(default)]
	pub date_deces: Option<String>,
	/// Status as stored.
	#[serde(default)]
	pub statut: Option<Status>,
	/// Father id.
	#[serde(default)]
	pub pere_id: Option<i64>,
	/// Mother id.
	#[serde(default)]
	pub mere_id: Option<i64>,
}

impl Animal {
	/// A death date wins over a missing or stale `statut`.
	pub fn is_deceased(&self) -> bool {
		self.date_deces.is_some() || self.statut == Some(Status::Mort)
	}

	/// Effective status.
	pub fn status(&self) -> Status {
		if self.is_deceased() {
			Status::Mort
		} else {
			Status::Vivant
		}
	}

	/// Status text agreed with the animal's sex.
	pub fn status_label(&self) -> &'static str {
		match (self.status(), self.sexe) {
			(Status::Vivant, Some(Sex::Female)) => "Vivante",
			(Status::Vivant, _) => "Vivant",
			(Status::Mort, Some(Sex::Female)) => "Morte",
			(Status::Mort, _) => "Mort",
		}
	}

	/// Sex glyph, `?` when unknown.
	pub fn sex_symbol(&self) -> &'static str {
		self.sexe.map_or("?", Sex::symbol)
	}

	/// Name when set, official identifier otherwise.
	pub fn display_name(&self) -> &str {
		self.nom
			.as_deref()
			.filter(|n| !n.trim().is_empty())
			.unwrap_or(&self.identifiant_officiel)
	}

	/// Whether `parent_id` is the father or the mother.
	pub fn is_child_of(&self, parent_id: i64) -> bool {
		self.pere_id == Some(parent_id) || self.mere_id == Some(parent_id)
	}

	/// Formatted birth date.
	pub fn birth_label(&self) -> Option<String> {
		self.date_naissance.as_deref().map(format_date)
	}

	/// Formatted death date.
	pub fn death_label(&self) -> Option<String> {
		self.date_deces.as_deref().map(format_date)
	}
}

/// Formats an ISO date (`2021-03-14` or `2021-03-14T00:00:00`) as `14/03/2021`.
/// Unparseable input is returned unchanged.
pub fn format_date(raw: &str) -> String {
	let day = raw.get(..10).unwrap_or(raw);
	match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
		Ok(date) => date.format("%d/%m/%Y").to_string(),
		Err(_) => raw.to_string(),
	}
}

/// Recursive genealogy node: an animal with its parents and children.
///
/// `level` is negative for ancestors, 0 for the focal animal and positive
/// for descendants.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FamilyTreeNode {
	/// Animal at this node.
	pub animal: Animal,
	/// Father's subtree.
	#[serde(default)]
	pub pere: Option<Box<FamilyTreeNode>>,
	/// Mother's subtree.
	#[serde(default)]
	pub mere: Option<Box<FamilyTreeNode>>,
	/// Children's subtrees.
	#[serde(default)]
	pub enfants: Vec<FamilyTreeNode>,
	/// Generation offset from the focal animal.
	#[serde(default)]
	pub level: i32,
}

impl FamilyTreeNode {
	/// Animal id.
	pub fn id(&self) -> i64 {
		self.animal.id
	}

	/// Father then mother, when present.
	pub fn parents(&self) -> impl Iterator<Item = &FamilyTreeNode> {
		self.pere.as_deref().into_iter().chain(self.mere.as_deref())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_nested_payload() {
		let json = r#"{
			"animal": {"id": 1, "identifiant_officiel": "FR001", "sexe": "F", "statut": "vivant"},
			"pere": {"animal": {"id": 10, "identifiant_officiel": "FR010", "sexe": "M"}, "level": -1},
			"mere": null,
			"enfants": [
				{"animal": {"id": 2, "identifiant_officiel": "FR002", "sexe": "M", "mere_id": 1}, "level": 1}
			],
			"level": 0
		}"#;
		let node: FamilyTreeNode = serde_json::from_str(json).unwrap();
		assert_eq!(node.id(), 1);
		assert_eq!(node.pere.as_ref().map(|p| p.level), Some(-1));
		assert!(node.mere.is_none());
		assert_eq!(node.enfants.len(), 1);
		assert!(node.enfants[0].animal.is_child_of(1));
		assert_eq!(node.parents().count(), 1);
	}

	#[test]
	fn death_date_implies_deceased() {
		let animal = Animal {
			identifiant_officiel: "FR1".into(),
			date_deces: Some("2022-01-05".into()),
			statut: Some(Status::Vivant),
			sexe: Some(Sex::Female),
			..Default::default()
		};
		assert!(animal.is_deceased());
		assert_eq!(animal.status_label(), "Morte");
	}

	#[test]
	fn display_name_falls_back_to_identifier() {
		let mut animal = Animal {
			identifiant_officiel: "FR9".into(),
			nom: Some("  ".into()),
			..Default::default()
		};
		assert_eq!(animal.display_name(), "FR9");
		animal.nom = Some("Marguerite".into());
		assert_eq!(animal.display_name(), "Marguerite");
	}

	#[test]
	fn missing_sex_stays_unknown() {
		let animal: Animal = serde_json::from_str(r#"{"id": 4, "identifiant_officiel": "FR4"}"#).unwrap();
		assert_eq!(animal.sexe, None);
		assert_eq!(animal.sex_symbol(), "?");
		assert_eq!(animal.status_label(), "Vivant");

		let female: Animal = serde_json::from_str(r#"{"id": 5, "identifiant_officiel": "FR5", "sexe": "F"}"#).unwrap();
		assert_eq!(female.sexe, Some(Sex::Female));
		assert_eq!(female.sex_symbol(), "♀");
	}

	#[test]
	fn formats_dates_in_french_order() {
		assert_eq!(format_date("2021-03-14"), "14/03/2021");
		assert_eq!(format_date("2021-03-14T08:00:00Z"), "14/03/2021");
		assert_eq!(format_date("inconnue"), "inconnue");
	}
}
