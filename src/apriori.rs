// ---------------------------------------------------------------------------
// Apriori miner — frequent ingredients, frequent pairs, association rules
// ---------------------------------------------------------------------------
//
// Only 1- and 2-itemsets are mined. Every frequent pair (A, B) yields the
// two directed rules A -> B and B -> A, each kept when its confidence meets
// the threshold. Items are visited in first-seen order so rule order is
// fully determined by the input.
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};

use crate::config::MiningConfig;
use crate::error::ForageError;
use crate::types::{AssociationRule, Transaction};

#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItem {
	pub item: String,
	pub count: usize,
	pub support: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequentPair {
	pub first: String,
	pub second: String,
	pub support: f64,
}

/// Pair-wise Apriori rule miner.
///
/// ```
/// use simse_forage_engine::apriori::AprioriMiner;
///
/// let transactions = vec![
///     vec!["onion".to_string(), "garlic".to_string()],
///     vec!["onion".to_string(), "garlic".to_string()],
///     vec!["onion".to_string(), "tomato".to_string()],
/// ];
/// let rules = AprioriMiner::new()
///     .with_min_support(0.3)
///     .with_min_confidence(0.5)
///     .mine(&transactions)
///     .unwrap();
/// assert_eq!(rules[0].confidence, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AprioriMiner {
	config: MiningConfig,
}

impl Default for AprioriMiner {
	fn default() -> Self {
		Self::new()
	}
}

impl AprioriMiner {
	/// Miner with the library defaults (support 0.1, confidence 0.5).
	#[must_use]
	pub fn new() -> Self {
		Self::from_config(MiningConfig::default())
	}

	#[must_use]
	pub fn from_config(config: MiningConfig) -> Self {
		Self { config }
	}

	#[must_use]
	pub fn with_min_support(mut self, min_support: f64) -> Self {
		self.config.min_support = min_support;
		self
	}

	#[must_use]
	pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
		self.config.min_confidence = min_confidence;
		self
	}

	pub fn config(&self) -> &MiningConfig {
		&self.config
	}

	/// Items whose support (share of transactions containing them at least
	/// once) reaches the minimum, in first-seen order.
	pub fn frequent_items(&self, transactions: &[Transaction]) -> Vec<FrequentItem> {
		let total = transactions.len();
		if total == 0 {
			return Vec::new();
		}

		let mut counts: Vec<(&str, usize)> = Vec::new();
		let mut position: HashMap<&str, usize> = HashMap::new();
		for transaction in transactions {
			let mut seen: HashSet<&str> = HashSet::new();
			for item in transaction {
				if !seen.insert(item.as_str()) {
					continue;
				}
				match position.get(item.as_str()) {
					Some(&idx) => counts[idx].1 += 1,
					None => {
						position.insert(item.as_str(), counts.len());
						counts.push((item.as_str(), 1));
					}
				}
			}
		}

		counts
			.into_iter()
			.map(|(item, count)| FrequentItem {
				item: item.to_string(),
				count,
				support: count as f64 / total as f64,
			})
			.filter(|f| f.support >= self.config.min_support)
			.collect()
	}

	/// Unordered pairs of frequent items whose co-occurrence support
	/// reaches the minimum.
	pub fn frequent_pairs(
		&self,
		transactions: &[Transaction],
		frequent: &[FrequentItem],
	) -> Vec<FrequentPair> {
		let total = transactions.len();
		if total == 0 {
			return Vec::new();
		}

		let sets: Vec<HashSet<&str>> = transactions
			.iter()
			.map(|t| t.iter().map(String::as_str).collect())
			.collect();

		let mut pairs = Vec::new();
		for (i, a) in frequent.iter().enumerate() {
			for b in &frequent[i + 1..] {
				let together = sets
					.iter()
					.filter(|s| s.contains(a.item.as_str()) && s.contains(b.item.as_str()))
					.count();
				let support = together as f64 / total as f64;
				if support >= self.config.min_support {
					pairs.push(FrequentPair {
						first: a.item.clone(),
						second: b.item.clone(),
						support,
					});
				}
			}
		}
		pairs
	}

	/// Mine association rules, sorted by confidence (highest first).
	///
	/// Fails only on thresholds outside `[0, 1]`.
	pub fn mine(&self, transactions: &[Transaction]) -> Result<Vec<AssociationRule>, ForageError> {
		self.config.validate()?;

		let frequent = self.frequent_items(transactions);
		let pairs = self.frequent_pairs(transactions, &frequent);
		let support_of: HashMap<&str, f64> = frequent
			.iter()
			.map(|f| (f.item.as_str(), f.support))
			.collect();

		let mut rules = Vec::new();
		for pair in &pairs {
			let (Some(&support_a), Some(&support_b)) = (
				support_of.get(pair.first.as_str()),
				support_of.get(pair.second.as_str()),
			) else {
				continue;
			};
			rules.extend(self.directed_rule(
				&pair.first,
				&pair.second,
				pair.support,
				support_a,
				support_b,
			));
			rules.extend(self.directed_rule(
				&pair.second,
				&pair.first,
				pair.support,
				support_b,
				support_a,
			));
		}

		rules.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

		tracing::debug!(
			transactions = transactions.len(),
			frequent_items = frequent.len(),
			frequent_pairs = pairs.len(),
			rules = rules.len(),
			"Mined association rules"
		);
		Ok(rules)
	}

	fn directed_rule(
		&self,
		antecedent: &str,
		consequent: &str,
		pair_support: f64,
		antecedent_support: f64,
		consequent_support: f64,
	) -> Option<AssociationRule> {
		if antecedent_support == 0.0 || consequent_support == 0.0 {
			return None;
		}
		let confidence = pair_support / antecedent_support;
		if confidence < self.config.min_confidence {
			return None;
		}
		Some(AssociationRule {
			antecedent: antecedent.to_string(),
			consequent: consequent.to_string(),
			support: pair_support,
			confidence,
			lift: confidence / consequent_support,
		})
	}
}
