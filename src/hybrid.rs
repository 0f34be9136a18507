// ---------------------------------------------------------------------------
// Hybrid Ranker — content-based + collaborative recipe recommendations
// ---------------------------------------------------------------------------
//
// Content scores come from the cosine similarity between a user profile
// vector (sum of the TF-IDF vectors of liked items) and each unrated item.
// Collaborative candidates get a flat score of 1. Both are blended with
// fixed weights, then adjusted multiplicatively by the user's preferences.
// Pure functions; no state survives a call.
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};

use crate::collaborative::collaborative_recommendations;
use crate::config::RecommenderConfig;
use crate::cosine::{cosine_similarity, sum_vectors};
use crate::tfidf::vectorize_items;
use crate::types::{HybridScores, Item, RankedItem, TermVector, UserProfile};

const COLLABORATIVE_FLAT_SCORE: f64 = 1.0;

/// Top items for `target_id` as full records, best first.
pub fn recommend(
	items: &[Item],
	profiles: &[UserProfile],
	target_id: &str,
	config: &RecommenderConfig,
) -> Vec<Item> {
	rank(items, profiles, target_id, config)
		.into_iter()
		.map(|r| r.item)
		.collect()
}

/// Top items for `target_id` with their adjusted score and the weighted
/// content / collaborative contributions that produced it.
pub fn rank(
	items: &[Item],
	profiles: &[UserProfile],
	target_id: &str,
	config: &RecommenderConfig,
) -> Vec<RankedItem> {
	let Some(user) = profiles.iter().find(|p| p.user_id == target_id) else {
		tracing::debug!(target_id, "Target user not found; nothing to rank");
		return Vec::new();
	};

	let vectors = vectorize_items(items);
	let content = content_scores(items, &vectors, user, config);
	let collaborative = collaborative_recommendations(profiles, target_id, config);

	// Blend, keeping first-seen order so equal scores stay deterministic.
	let mut blended: Vec<(&str, HybridScores)> = Vec::new();
	let mut position: HashMap<&str, usize> = HashMap::new();
	for &(id, score) in &content {
		position.insert(id, blended.len());
		blended.push((
			id,
			HybridScores {
				content: Some(score * config.content_weight),
				collaborative: None,
			},
		));
	}
	for id in collaborative.iter().map(String::as_str) {
		let weighted = COLLABORATIVE_FLAT_SCORE * config.collaborative_weight;
		match position.get(id) {
			Some(&idx) => blended[idx].1.collaborative = Some(weighted),
			None => {
				position.insert(id, blended.len());
				blended.push((
					id,
					HybridScores {
						content: None,
						collaborative: Some(weighted),
					},
				));
			}
		}
	}

	let mut catalog: HashMap<&str, &Item> = HashMap::with_capacity(items.len());
	for item in items {
		catalog.entry(item.id.as_str()).or_insert(item);
	}

	let mut ranked: Vec<RankedItem> = blended
		.into_iter()
		.filter_map(|(id, scores)| {
			let item = catalog.get(id)?;
			let combined = scores.content.unwrap_or(0.0) + scores.collaborative.unwrap_or(0.0);
			Some(RankedItem {
				item: (*item).clone(),
				score: adjust_score(combined, item, user, config),
				scores,
			})
		})
		.collect();

	ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
	ranked.truncate(config.max_results);

	tracing::debug!(
		target_id,
		content = content.len(),
		collaborative = collaborative.len(),
		results = ranked.len(),
		"Hybrid ranking complete"
	);
	ranked
}

/// Content-based candidates: cosine similarity of every unrated item to the
/// sum of the user's liked-item vectors. Empty when none of the user's
/// likes are in the catalog.
fn content_scores<'a>(
	items: &'a [Item],
	vectors: &[TermVector],
	user: &UserProfile,
	config: &RecommenderConfig,
) -> Vec<(&'a str, f64)> {
	let liked: Vec<&TermVector> = items
		.iter()
		.zip(vectors)
		.filter(|(item, _)| user.likes(&item.id))
		.map(|(_, v)| v)
		.collect();
	if liked.is_empty() {
		return Vec::new();
	}
	let profile = sum_vectors(liked);

	// One candidate per id; the first catalog entry wins.
	let mut seen: HashSet<&str> = HashSet::new();
	let mut scores: Vec<(&str, f64)> = items
		.iter()
		.zip(vectors)
		.filter(|(item, _)| !user.has_rated(&item.id) && seen.insert(item.id.as_str()))
		.map(|(item, v)| (item.id.as_str(), cosine_similarity(&profile, v)))
		.collect();
	scores.sort_by(|a, b| b.1.total_cmp(&a.1));
	scores.truncate(config.max_content_candidates);
	scores
}

/// Apply the preference adjustments to a blended score. Each rule is an
/// independent multiplier.
pub fn adjust_score(score: f64, item: &Item, user: &UserProfile, config: &RecommenderConfig) -> f64 {
	let mut adjusted = score;

	if user.preferred_cuisines.iter().any(|c| *c == item.cuisine) {
		adjusted *= config.preferred_cuisine_boost;
	}

	if let Some(preferred) = user.preferred_cooking_time {
		if item.cooking_time > preferred * config.long_cook_factor {
			adjusted *= config.long_cook_penalty;
		}
	}

	if user.cooking_skill.as_deref() == Some(item.difficulty.as_str()) {
		adjusted *= config.skill_match_boost;
	}

	if has_restricted_ingredient(item, user) {
		adjusted *= config.restricted_ingredient_penalty;
	}

	adjusted
}

/// Case-insensitive substring test. Keywords are used as given, so an empty
/// keyword matches every ingredient.
fn has_restricted_ingredient(item: &Item, user: &UserProfile) -> bool {
	let restrictions: Vec<String> = user
		.dietary_restrictions
		.iter()
		.map(|r| r.to_lowercase())
		.collect();
	if restrictions.is_empty() {
		return false;
	}
	item.ingredients.iter().any(|ingredient| {
		let ingredient = ingredient.to_lowercase();
		restrictions.iter().any(|r| ingredient.contains(r.as_str()))
	})
}
