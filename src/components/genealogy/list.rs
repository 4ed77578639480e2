//! DOM listing of descendants grouped by generation.

use leptos::prelude::*;

use super::generations::{
	flatten_descendants, generation_title, group_by_generation, DescendantStats, GenerationEntry,
};
use super::types::{FamilyTreeNode, Sex};

/// Accessible alternative to the canvas views: one section per generation
/// plus a summary panel.
#[component]
pub fn GenerationList(
	/// Genealogy whose descendants are listed.
	#[prop(into)]
	data: Signal<Option<FamilyTreeNode>>,
) -> impl IntoView {
	let entries = Memo::new(move |_| {
		data.with(|tree| tree.as_ref().map(flatten_descendants).unwrap_or_default())
	});

	view! {
		<div class="generation-list">
			{move || {
				let entries = entries.get();
				if entries.is_empty() {
					return view! {
						<p class="empty-state">"Aucun descendant enregistré pour cet animal."</p>
					}
						.into_any();
				}
				let stats = DescendantStats::from_entries(&entries);
				let sections = group_by_generation(&entries)
					.into_iter()
					.map(|(generation, members)| {
						let count = members.len();
						view! {
							<section class="generation" aria-label=generation_title(generation)>
								<h3>{generation_title(generation)} " (" {count} ")"</h3>
								<ul>
									{members
										.into_iter()
										.map(|entry| view! { <AnimalRow entry=entry /> })
										.collect_view()}
								</ul>
							</section>
						}
					})
					.collect_view();
				view! {
					<SummaryPanel stats=stats />
					{sections}
				}
					.into_any()
			}}
		</div>
	}
}

#[component]
fn SummaryPanel(stats: DescendantStats) -> impl IntoView {
	let breeds = stats
		.breeds
		.into_iter()
		.map(|(breed, count)| view! { <li>{breed} ": " {count}</li> })
		.collect_view();
	view! {
		<aside class="genealogy-summary">
			<h3>"Résumé"</h3>
			<dl>
				<dt>"Descendants"</dt>
				<dd>{stats.total}</dd>
				<dt>"Mâles"</dt>
				<dd>{stats.males}</dd>
				<dt>"Femelles"</dt>
				<dd>{stats.females}</dd>
				{(stats.unknown_sex > 0)
					.then(|| view! {
						<dt>"Sexe inconnu"</dt>
						<dd>{stats.unknown_sex}</dd>
					})}
				<dt>"Vivants"</dt>
				<dd>{stats.alive}</dd>
				<dt>"Décédés"</dt>
				<dd>{stats.deceased}</dd>
			</dl>
			<h4>"Races"</h4>
			<ul class="breed-histogram">{breeds}</ul>
		</aside>
	}
}

#[component]
fn AnimalRow(entry: GenerationEntry) -> impl IntoView {
	let animal = entry.animal;
	let sex_class = match animal.sexe {
		Some(Sex::Male) => "male",
		Some(Sex::Female) => "female",
		None => "unknown-sex",
	};
	let class = if animal.is_deceased() {
		format!("animal-row {sex_class} deceased")
	} else {
		format!("animal-row {sex_class}")
	};
	let name = animal.nom.clone().filter(|n| !n.trim().is_empty());
	let breed = animal.race_nom.clone();
	let birth = animal.birth_label().map(|d| format!("Né(e) le {d}"));
	let death = animal.death_label().map(|d| format!("Décès le {d}"));

	view! {
		<li class=class>
			<span class="sex" aria-hidden="true">{animal.sex_symbol()}</span>
			<strong class="identifier">{animal.identifiant_officiel.clone()}</strong>
			{name.map(|n| view! { <span class="name">{n}</span> })}
			{breed.map(|b| view! { <span class="breed">{b}</span> })}
			{birth.map(|b| view! { <span class="birth">{b}</span> })}
			{death.map(|d| view! { <span class="death">{d}</span> })}
			<span class="status">{animal.status_label()}</span>
		</li>
	}
}
