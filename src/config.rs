use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::ForageError;

#[derive(Parser, Debug)]
#[command(
	name = "simse-forage-engine",
	about = "Recipe recommendation, ingredient association and seasonal food matching over JSON-RPC"
)]
pub struct CliArgs {
	/// Minimum support for ingredient association mining
	#[arg(long, default_value = "0.05", env = "FORAGE_MIN_SUPPORT")]
	pub min_support: f64,

	/// Minimum confidence for ingredient association rules
	#[arg(long, default_value = "0.3", env = "FORAGE_MIN_CONFIDENCE")]
	pub min_confidence: f64,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, default_value = "info", env = "FORAGE_LOG_LEVEL")]
	pub log_level: String,
}

impl CliArgs {
	pub fn mining_config(&self) -> Result<MiningConfig, ForageError> {
		let config = MiningConfig {
			min_support: self.min_support,
			min_confidence: self.min_confidence,
		};
		config.validate()?;
		Ok(config)
	}
}

// ---------------------------------------------------------------------------
// Recommender tuning
// ---------------------------------------------------------------------------

/// Constants of the collaborative filter and hybrid ranker. Every field may
/// be omitted on the wire; omitted fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecommenderConfig {
	/// Neighbors at or below this Jaccard similarity are discarded.
	pub min_neighbor_similarity: f64,
	pub max_neighbors: usize,
	pub max_collaborative_results: usize,
	pub max_content_candidates: usize,
	pub max_results: usize,
	pub content_weight: f64,
	pub collaborative_weight: f64,
	pub preferred_cuisine_boost: f64,
	/// Items slower than `preferred time * long_cook_factor` are penalised.
	pub long_cook_factor: f64,
	pub long_cook_penalty: f64,
	pub skill_match_boost: f64,
	pub restricted_ingredient_penalty: f64,
}

impl Default for RecommenderConfig {
	fn default() -> Self {
		Self {
			min_neighbor_similarity: 0.1,
			max_neighbors: 5,
			max_collaborative_results: 10,
			max_content_candidates: 15,
			max_results: 20,
			content_weight: 0.6,
			collaborative_weight: 0.4,
			preferred_cuisine_boost: 1.3,
			long_cook_factor: 1.5,
			long_cook_penalty: 0.7,
			skill_match_boost: 1.2,
			restricted_ingredient_penalty: 0.3,
		}
	}
}

// ---------------------------------------------------------------------------
// Mining thresholds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningConfig {
	pub min_support: f64,
	pub min_confidence: f64,
}

impl Default for MiningConfig {
	fn default() -> Self {
		Self {
			min_support: 0.1,
			min_confidence: 0.5,
		}
	}
}

impl MiningConfig {
	/// Looser thresholds used when mining live search logs.
	pub fn production() -> Self {
		Self {
			min_support: 0.05,
			min_confidence: 0.3,
		}
	}

	pub fn validate(&self) -> Result<(), ForageError> {
		check_unit("minSupport", self.min_support)?;
		check_unit("minConfidence", self.min_confidence)
	}
}

fn check_unit(name: &'static str, value: f64) -> Result<(), ForageError> {
	if (0.0..=1.0).contains(&value) {
		Ok(())
	} else {
		Err(ForageError::InvalidThreshold { name, value })
	}
}
