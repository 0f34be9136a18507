// ---------------------------------------------------------------------------
// Ingredient associations — transaction building and suggestion queries
// ---------------------------------------------------------------------------
//
// Builds transactions from search logs (or, when those are sparse, from the
// recipe corpus), mines pair rules, and answers "what goes with what I
// have?" queries. The query path never fails: any error in retrieval or
// mining is replaced with a fixed list of staple ingredients.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::apriori::AprioriMiner;
use crate::config::MiningConfig;
use crate::error::ForageError;
use crate::normalize::normalize_ingredient;
use crate::types::{
	AssociationReport, AssociationRule, AssociationSuggestion, Item, SearchRecord, Transaction,
};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

pub const MAX_SEARCH_RECORDS: usize = 1000;
/// Fewer search transactions than this pulls in the recipe corpus.
pub const MIN_SEARCH_TRANSACTIONS: usize = 10;
pub const MAX_RECIPE_RECORDS: usize = 500;
pub const MAX_INGREDIENTS_PER_RECIPE: usize = 10;
pub const MAX_RULE_SUGGESTIONS: usize = 6;
pub const MAX_POPULAR_SUGGESTIONS: usize = 8;

const FALLBACK_SUGGESTIONS: &[(&str, u32, u32)] = &[
	("onion", 85, 70),
	("tomato", 80, 65),
	("garlic", 75, 60),
	("ginger", 70, 55),
];

// ---------------------------------------------------------------------------
// Transaction source
// ---------------------------------------------------------------------------

/// Where transaction data comes from. Implementations fetch at most `limit`
/// records; any error makes the query path degrade to the fallback list.
pub trait TransactionSource {
	fn recent_searches(&self, limit: usize) -> Result<Vec<SearchRecord>, ForageError>;
	fn recipes(&self, limit: usize) -> Result<Vec<Item>, ForageError>;
}

/// A source over snapshots already in memory.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
	pub searches: Vec<SearchRecord>,
	pub recipes: Vec<Item>,
}

impl TransactionSource for SnapshotSource {
	fn recent_searches(&self, limit: usize) -> Result<Vec<SearchRecord>, ForageError> {
		Ok(self.searches.iter().take(limit).cloned().collect())
	}

	fn recipes(&self, limit: usize) -> Result<Vec<Item>, ForageError> {
		Ok(self.recipes.iter().take(limit).cloned().collect())
	}
}

// ---------------------------------------------------------------------------
// Transaction building
// ---------------------------------------------------------------------------

fn is_meaningful(ingredient: &str) -> bool {
	ingredient.chars().count() > 2
}

/// One transaction per search that carried ingredients.
pub fn search_transactions(searches: &[SearchRecord]) -> Vec<Transaction> {
	searches
		.iter()
		.filter(|s| !s.ingredients.is_empty())
		.map(|s| {
			s.ingredients
				.iter()
				.map(|raw| normalize_ingredient(raw))
				.filter(|ing| is_meaningful(ing))
				.collect()
		})
		.collect()
}

/// One transaction per recipe with at least two usable ingredients. Each
/// ingredient line is split on `,` and `;` and the result is capped.
pub fn recipe_transactions(recipes: &[Item]) -> Vec<Transaction> {
	recipes
		.iter()
		.filter_map(|recipe| {
			let ingredients: Transaction = recipe
				.ingredients
				.iter()
				.flat_map(|line| line.split([',', ';']))
				.map(normalize_ingredient)
				.filter(|ing| is_meaningful(ing))
				.take(MAX_INGREDIENTS_PER_RECIPE)
				.collect();
			(ingredients.len() > 1).then_some(ingredients)
		})
		.collect()
}

/// Search transactions, extended with recipe transactions when searches
/// are too sparse to mine on their own.
pub fn build_transactions(source: &dyn TransactionSource) -> Result<Vec<Transaction>, ForageError> {
	let searches = source.recent_searches(MAX_SEARCH_RECORDS)?;
	let mut transactions = search_transactions(&searches);

	if transactions.len() < MIN_SEARCH_TRANSACTIONS {
		let recipes = source.recipes(MAX_RECIPE_RECORDS)?;
		let from_recipes = recipe_transactions(&recipes);
		tracing::debug!(
			searches = transactions.len(),
			recipes = from_recipes.len(),
			"Search history sparse; adding recipe transactions"
		);
		transactions.extend(from_recipes);
	}

	Ok(transactions)
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

fn percent(ratio: f64) -> u32 {
	(ratio * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Consequents of rules whose antecedent is one of `current` (already
/// normalized), in rule order.
pub fn rule_suggestions(rules: &[AssociationRule], current: &[String]) -> Vec<AssociationSuggestion> {
	rules
		.iter()
		.filter(|rule| current.iter().any(|c| *c == rule.antecedent))
		.take(MAX_RULE_SUGGESTIONS)
		.map(|rule| AssociationSuggestion {
			ingredient: rule.consequent.clone(),
			confidence: percent(rule.confidence),
			support: percent(rule.support),
			lift: Some((rule.lift * 100.0).round() / 100.0),
			is_popular: false,
		})
		.collect()
}

/// Most frequently occurring ingredients across all transactions. Every
/// occurrence counts, including repeats within one transaction.
pub fn popular_ingredients(transactions: &[Transaction]) -> Vec<AssociationSuggestion> {
	let total = transactions.len();
	if total == 0 {
		return Vec::new();
	}

	let mut counts: Vec<(&str, usize)> = Vec::new();
	let mut position: HashMap<&str, usize> = HashMap::new();
	for ingredient in transactions.iter().flatten() {
		match position.get(ingredient.as_str()) {
			Some(&idx) => counts[idx].1 += 1,
			None => {
				position.insert(ingredient.as_str(), counts.len());
				counts.push((ingredient.as_str(), 1));
			}
		}
	}
	counts.sort_by(|a, b| b.1.cmp(&a.1));

	counts
		.into_iter()
		.take(MAX_POPULAR_SUGGESTIONS)
		.map(|(ingredient, count)| {
			let share = percent(count as f64 / total as f64);
			AssociationSuggestion {
				ingredient: ingredient.to_string(),
				confidence: share,
				support: share,
				lift: None,
				is_popular: true,
			}
		})
		.collect()
}

/// Fixed staples returned when suggestions cannot be computed.
pub fn fallback_report() -> AssociationReport {
	AssociationReport {
		associations: FALLBACK_SUGGESTIONS
			.iter()
			.map(|&(ingredient, confidence, support)| AssociationSuggestion {
				ingredient: ingredient.to_string(),
				confidence,
				support,
				lift: None,
				is_popular: true,
			})
			.collect(),
		total_transactions: 0,
		has_current_ingredients: false,
	}
}

/// Suggest ingredients to go with `current` (raw, as entered by the user).
/// With no current ingredients, the most popular ingredients are returned
/// instead. Never fails; see [`fallback_report`].
pub fn suggest(
	source: &dyn TransactionSource,
	current: &[String],
	config: &MiningConfig,
) -> AssociationReport {
	match try_suggest(source, current, config) {
		Ok(report) => report,
		Err(e) => {
			tracing::warn!(error = %e, code = e.code(), "Association query failed; serving fallback");
			fallback_report()
		}
	}
}

fn try_suggest(
	source: &dyn TransactionSource,
	current: &[String],
	config: &MiningConfig,
) -> Result<AssociationReport, ForageError> {
	let current: Vec<String> = current
		.iter()
		.map(|c| c.trim())
		.filter(|c| !c.is_empty())
		.map(normalize_ingredient)
		.collect();

	let transactions = build_transactions(source)?;
	let rules = AprioriMiner::from_config(*config).mine(&transactions)?;

	let associations = if current.is_empty() {
		popular_ingredients(&transactions)
	} else {
		rule_suggestions(&rules, &current)
	};

	Ok(AssociationReport {
		associations,
		total_transactions: transactions.len(),
		has_current_ingredients: !current.is_empty(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::decode_records;

	struct BrokenSource;

	impl TransactionSource for BrokenSource {
		fn recent_searches(&self, _limit: usize) -> Result<Vec<SearchRecord>, ForageError> {
			Err(ForageError::Source("search log unavailable".into()))
		}

		fn recipes(&self, _limit: usize) -> Result<Vec<Item>, ForageError> {
			Ok(Vec::new())
		}
	}

	fn search(ingredients: &[&str]) -> SearchRecord {
		SearchRecord {
			ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
		}
	}

	fn recipe(id: &str, ingredients: &[&str]) -> Item {
		let mut item = Item::new(id);
		item.ingredients = ingredients.iter().map(|s| s.to_string()).collect();
		item
	}

	fn strings(list: &[&str]) -> Vec<String> {
		list.iter().map(|s| s.to_string()).collect()
	}

	fn curry_searches() -> Vec<SearchRecord> {
		let mut searches = Vec::new();
		for _ in 0..6 {
			searches.push(search(&["2 onions", "1 tsp jeera", "garlic"]));
		}
		for _ in 0..4 {
			searches.push(search(&["tomato", "1 tsp jeera"]));
		}
		searches
	}

	// -- transaction building -------------------------------------------------

	#[test]
	fn search_transactions_normalize_and_drop_short() {
		let t = search_transactions(&[search(&["2 cups Rice", "1 eg"]), search(&[])]);
		assert_eq!(t, vec![strings(&["rice"])]);
	}

	#[test]
	fn recipe_transactions_split_cap_and_require_two() {
		let many: Vec<String> = (0..15).map(|i| format!("spice{i}")).collect();
		let many_refs: Vec<&str> = many.iter().map(String::as_str).collect();
		let t = recipe_transactions(&[
			recipe("a", &["onion, garlic; ginger"]),
			recipe("b", &["salt"]),
			recipe("c", &many_refs),
		]);
		assert_eq!(t.len(), 2);
		assert_eq!(t[0], strings(&["onion", "garlic", "ginger"]));
		assert_eq!(t[1].len(), MAX_INGREDIENTS_PER_RECIPE);
	}

	#[test]
	fn recipe_records_with_joined_or_listed_ingredients() {
		let recipes: Vec<Item> = decode_records(
			vec![
				serde_json::json!({ "_id": "r1", "Ingredients": "onion, garlic, tomato" }),
				serde_json::json!({ "_id": "r2", "ingredients": "onion; ginger" }),
				serde_json::json!({ "_id": "r3", "ingredients": ["paneer", "peas"] }),
			],
			"recipe",
		);
		assert_eq!(recipes.len(), 3);

		let source = SnapshotSource {
			searches: Vec::new(),
			recipes,
		};
		let t = build_transactions(&source).unwrap();
		assert_eq!(
			t,
			vec![
				strings(&["onion", "garlic", "tomato"]),
				strings(&["onion", "ginger"]),
				strings(&["paneer", "peas"]),
			]
		);
	}

	#[test]
	fn sparse_searches_extended_with_recipes() {
		let source = SnapshotSource {
			searches: vec![search(&["paneer", "peas"])],
			recipes: vec![recipe("a", &["onion", "garlic"])],
		};
		let t = build_transactions(&source).unwrap();
		assert_eq!(t, vec![strings(&["paneer", "peas"]), strings(&["onion", "garlic"])]);
	}

	#[test]
	fn enough_searches_skip_recipes() {
		let source = SnapshotSource {
			searches: curry_searches(),
			recipes: vec![recipe("a", &["onion", "garlic"])],
		};
		assert_eq!(build_transactions(&source).unwrap().len(), 10);
	}

	// -- suggestions ----------------------------------------------------------

	#[test]
	fn suggests_consequents_for_current_ingredients() {
		let source = SnapshotSource {
			searches: curry_searches(),
			recipes: Vec::new(),
		};
		let report = suggest(&source, &strings(&["Onions"]), &MiningConfig::production());
		assert!(report.has_current_ingredients);
		assert_eq!(report.total_transactions, 10);
		let names: Vec<&str> = report.associations.iter().map(|a| a.ingredient.as_str()).collect();
		assert!(names.contains(&"cumin"));
		assert!(names.contains(&"garlic"));
		assert!(report.associations.iter().all(|a| !a.is_popular && a.lift.is_some()));
		let cumin = report.associations.iter().find(|a| a.ingredient == "cumin").unwrap();
		assert_eq!(cumin.confidence, 100);
		assert_eq!(cumin.support, 60);
	}

	#[test]
	fn rule_suggestions_capped() {
		let rules: Vec<AssociationRule> = (0..10)
			.map(|i| AssociationRule {
				antecedent: "onion".into(),
				consequent: format!("x{i}"),
				support: 0.2,
				confidence: 0.9,
				lift: 1.234,
			})
			.collect();
		let s = rule_suggestions(&rules, &strings(&["onion"]));
		assert_eq!(s.len(), MAX_RULE_SUGGESTIONS);
		assert_eq!(s[0].lift, Some(1.23));
		assert_eq!(s[0].confidence, 90);
	}

	#[test]
	fn popular_ingredients_without_current() {
		let source = SnapshotSource {
			searches: curry_searches(),
			recipes: Vec::new(),
		};
		let report = suggest(&source, &[], &MiningConfig::production());
		assert!(!report.has_current_ingredients);
		assert_eq!(report.associations[0].ingredient, "cumin");
		assert_eq!(report.associations[0].confidence, 100);
		assert_eq!(report.associations[1].ingredient, "onions");
		assert_eq!(report.associations[1].support, 60);
		assert!(report.associations.iter().all(|a| a.is_popular));
	}

	#[test]
	fn popular_ingredients_capped() {
		let t = vec![(0..20).map(|i| format!("item{i}")).collect::<Transaction>()];
		assert_eq!(popular_ingredients(&t).len(), MAX_POPULAR_SUGGESTIONS);
	}

	#[test]
	fn blank_current_ingredients_ignored() {
		let source = SnapshotSource::default();
		let report = suggest(&source, &strings(&["  ", ""]), &MiningConfig::default());
		assert!(!report.has_current_ingredients);
		assert!(report.associations.is_empty());
		assert_eq!(report.total_transactions, 0);
	}

	// -- fallback contract ----------------------------------------------------

	#[test]
	fn source_failure_serves_fallback() {
		let report = suggest(&BrokenSource, &strings(&["onion"]), &MiningConfig::default());
		assert_eq!(report, fallback_report());
		let names: Vec<&str> = report.associations.iter().map(|a| a.ingredient.as_str()).collect();
		assert_eq!(names, vec!["onion", "tomato", "garlic", "ginger"]);
		assert_eq!(report.associations[0].confidence, 85);
		assert_eq!(report.associations[3].support, 55);
		assert_eq!(report.total_transactions, 0);
		assert!(!report.has_current_ingredients);
	}

	#[test]
	fn mining_failure_serves_fallback() {
		let source = SnapshotSource {
			searches: curry_searches(),
			recipes: Vec::new(),
		};
		let bad = MiningConfig {
			min_support: 2.0,
			min_confidence: 0.3,
		};
		assert_eq!(suggest(&source, &[], &bad), fallback_report());
	}
}
