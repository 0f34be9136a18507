// ---------------------------------------------------------------------------
// Collaborative filter — user-user neighbors over liked-item sets
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};

use crate::config::RecommenderConfig;
use crate::types::UserProfile;

/// A similar user and their Jaccard similarity to the target.
#[derive(Debug, Clone)]
pub struct Neighbor<'a> {
	pub profile: &'a UserProfile,
	pub similarity: f64,
}

/// `|A ∩ B| / |A ∪ B|` over the two id lists taken as sets. Two empty sets
/// score 0.
pub fn jaccard_similarity(a: &[String], b: &[String]) -> f64 {
	let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
	let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
	let union = set_a.union(&set_b).count();
	if union == 0 {
		return 0.0;
	}
	set_a.intersection(&set_b).count() as f64 / union as f64
}

/// Users most similar to `target`, strongest first. Users at or below the
/// similarity threshold are dropped; ties keep input order.
pub fn nearest_neighbors<'a>(
	profiles: &'a [UserProfile],
	target: &UserProfile,
	config: &RecommenderConfig,
) -> Vec<Neighbor<'a>> {
	let mut neighbors: Vec<Neighbor<'a>> = profiles
		.iter()
		.filter(|p| p.user_id != target.user_id)
		.map(|p| Neighbor {
			profile: p,
			similarity: jaccard_similarity(&p.liked_items, &target.liked_items),
		})
		.filter(|n| n.similarity > config.min_neighbor_similarity)
		.collect();
	neighbors.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
	neighbors.truncate(config.max_neighbors);
	neighbors
}

/// Item ids liked by the target's neighbors, scored by the summed
/// similarity of every neighbor that likes them. Items the target already
/// liked or disliked are excluded. Returns `(id, score)` best first.
pub fn collaborative_scores(
	profiles: &[UserProfile],
	target_id: &str,
	config: &RecommenderConfig,
) -> Vec<(String, f64)> {
	let Some(target) = profiles.iter().find(|p| p.user_id == target_id) else {
		tracing::debug!(target_id, "Target user not found; no collaborative candidates");
		return Vec::new();
	};

	let neighbors = nearest_neighbors(profiles, target, config);

	let mut order: Vec<(String, f64)> = Vec::new();
	let mut position: HashMap<&str, usize> = HashMap::new();
	for neighbor in &neighbors {
		let mut seen: HashSet<&str> = HashSet::new();
		for item_id in &neighbor.profile.liked_items {
			if !seen.insert(item_id.as_str()) || target.has_rated(item_id) {
				continue;
			}
			match position.get(item_id.as_str()) {
				Some(&idx) => order[idx].1 += neighbor.similarity,
				None => {
					position.insert(item_id.as_str(), order.len());
					order.push((item_id.clone(), neighbor.similarity));
				}
			}
		}
	}

	order.sort_by(|a, b| b.1.total_cmp(&a.1));
	order.truncate(config.max_collaborative_results);

	tracing::debug!(
		target_id,
		neighbors = neighbors.len(),
		candidates = order.len(),
		"Collaborative filtering complete"
	);
	order
}

/// Recommended item ids for `target_id`, best first. An unknown target
/// yields an empty list.
pub fn collaborative_recommendations(
	profiles: &[UserProfile],
	target_id: &str,
	config: &RecommenderConfig,
) -> Vec<String> {
	collaborative_scores(profiles, target_id, config)
		.into_iter()
		.map(|(id, _)| id)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn user(id: &str, liked: &[&str], disliked: &[&str]) -> UserProfile {
		let mut p = UserProfile::new(id);
		p.liked_items = liked.iter().map(|s| s.to_string()).collect();
		p.disliked_items = disliked.iter().map(|s| s.to_string()).collect();
		p
	}

	fn ids(list: &[&str]) -> Vec<String> {
		list.iter().map(|s| s.to_string()).collect()
	}

	// -- jaccard_similarity tests ---------------------------------------------

	#[test]
	fn jaccard_identical_sets() {
		assert!((jaccard_similarity(&ids(&["a", "b"]), &ids(&["b", "a"])) - 1.0).abs() < 1e-10);
	}

	#[test]
	fn jaccard_disjoint_sets() {
		assert_eq!(jaccard_similarity(&ids(&["a"]), &ids(&["b"])), 0.0);
	}

	#[test]
	fn jaccard_empty_sets() {
		assert_eq!(jaccard_similarity(&[], &[]), 0.0);
	}

	#[test]
	fn jaccard_ignores_duplicates() {
		let s = jaccard_similarity(&ids(&["a", "a", "b"]), &ids(&["a"]));
		assert!((s - 0.5).abs() < 1e-10);
	}

	// -- nearest_neighbors tests ----------------------------------------------

	#[test]
	fn disjoint_users_are_filtered_out() {
		let profiles = vec![user("t", &["a"], &[]), user("u", &["b"], &[])];
		let n = nearest_neighbors(&profiles, &profiles[0], &RecommenderConfig::default());
		assert!(n.is_empty());
	}

	#[test]
	fn neighbors_capped_and_sorted_with_stable_ties() {
		let mut profiles = vec![user("t", &["a", "b"], &[])];
		for i in 0..7 {
			profiles.push(user(&format!("u{i}"), &["a"], &[]));
		}
		profiles.push(user("best", &["a", "b"], &[]));
		let n = nearest_neighbors(&profiles, &profiles[0], &RecommenderConfig::default());
		assert_eq!(n.len(), 5);
		assert_eq!(n[0].profile.user_id, "best");
		assert!((n[0].similarity - 1.0).abs() < 1e-10);
		let rest: Vec<&str> = n[1..].iter().map(|x| x.profile.user_id.as_str()).collect();
		assert_eq!(rest, vec!["u0", "u1", "u2", "u3"]);
	}

	// -- collaborative_recommendations tests ----------------------------------

	#[test]
	fn unknown_target_returns_empty() {
		let profiles = vec![user("u", &["a"], &[])];
		assert!(
			collaborative_recommendations(&profiles, "missing", &RecommenderConfig::default())
				.is_empty()
		);
	}

	#[test]
	fn scores_accumulate_across_neighbors() {
		let profiles = vec![
			user("t", &["a", "b"], &["x"]),
			user("n1", &["a", "b", "c", "x"], &[]),
			user("n2", &["a", "d", "c"], &[]),
		];
		let scores = collaborative_scores(&profiles, "t", &RecommenderConfig::default());
		// n1: 2/4 = 0.5, n2: 1/4 = 0.25
		assert_eq!(scores[0].0, "c");
		assert!((scores[0].1 - 0.75).abs() < 1e-10);
		assert_eq!(scores[1].0, "d");
		assert!((scores[1].1 - 0.25).abs() < 1e-10);
		assert!(scores.iter().all(|(id, _)| id != "a" && id != "b" && id != "x"));
	}

	#[test]
	fn equal_scores_keep_encounter_order() {
		let profiles = vec![
			user("t", &["a"], &[]),
			user("n", &["a", "z", "b", "m"], &[]),
		];
		let recs = collaborative_recommendations(&profiles, "t", &RecommenderConfig::default());
		assert_eq!(recs, ids(&["z", "b", "m"]));
	}

	#[test]
	fn results_truncated_to_limit() {
		let shared = ["s1", "s2", "s3", "s4", "s5"];
		let mut neighbor = user("n", &shared, &[]);
		neighbor.liked_items.extend((0..12).map(|i| format!("i{i}")));
		let profiles = vec![user("t", &shared, &[]), neighbor];
		let recs = collaborative_recommendations(&profiles, "t", &RecommenderConfig::default());
		assert_eq!(recs.len(), 10);
		assert_eq!(recs[0], "i0");
	}
}
