// ---------------------------------------------------------------------------
// ForageServer — JSON-RPC dispatcher
// ---------------------------------------------------------------------------
//
// Routes incoming JSON-RPC 2.0 requests (NDJSON over stdin) to the
// recommendation, association and seasonal pipelines. Every request carries
// its own record snapshot; the only state held here is the configuration
// taken from the command line.
// ---------------------------------------------------------------------------

use std::io::{self, BufRead};

use serde::Deserialize;

use crate::apriori::AprioriMiner;
use crate::associations::{self, SnapshotSource};
use crate::collaborative::collaborative_scores;
use crate::config::{MiningConfig, RecommenderConfig};
use crate::cosine::cosine_similarity;
use crate::dtw::dtw_sequence_distance;
use crate::error::ForageError;
use crate::hybrid;
use crate::normalize::normalize_ingredient;
use crate::protocol::*;
use crate::seasonal::{select_category, SeasonalMatcher, SeasonalPreferences, SeasonalTable};
use crate::tfidf::vectorize_items;
use crate::transport::NdjsonTransport;
use crate::types::{
	decode_records, Item, Season, SearchRecord, TermVector, TimeOfDay, Transaction,
	UserProfile, WeatherPattern,
};

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

pub struct ForageServer {
	transport: NdjsonTransport,
	mining: MiningConfig,
}

impl ForageServer {
	/// Create a server whose association queries default to `mining`.
	pub fn new(transport: NdjsonTransport, mining: MiningConfig) -> Self {
		Self { transport, mining }
	}

	/// Main loop: read JSON-RPC messages from stdin, dispatch to handlers.
	pub fn run(&mut self) -> Result<(), ForageError> {
		let stdin = io::stdin();
		let reader = stdin.lock();

		for line_result in reader.lines() {
			let line = line_result?;
			if line.trim().is_empty() {
				continue;
			}

			let request: JsonRpcRequest = match serde_json::from_str(&line) {
				Ok(r) => r,
				Err(e) => {
					tracing::error!("Failed to parse request: {}", e);
					continue;
				}
			};

			self.dispatch(request);
		}

		Ok(())
	}

	// ── Dispatch ──────────────────────────────────────────────────────────

	fn dispatch(&mut self, req: JsonRpcRequest) {
		let id = req.id;
		let result = match req.method.as_str() {
			// -- Content / collaborative ---------------------------------
			"vectorize/tfidf" => handle_vectorize(req.params),
			"similarity/cosine" => handle_cosine(req.params),
			"recommend/collaborative" => handle_collaborative(req.params),
			"recommend/hybrid" => handle_hybrid(req.params),

			// -- Associations --------------------------------------------
			"ingredients/normalize" => handle_normalize(req.params),
			"associations/mine" => handle_mine(req.params, &self.mining),
			"associations/suggest" => handle_suggest(req.params, &self.mining),

			// -- Seasonal ------------------------------------------------
			"seasonal/recommend" => handle_seasonal_recommend(req.params),
			"seasonal/context" => handle_seasonal_context(req.params),
			"seasonal/dtwDistance" => handle_dtw_distance(req.params),

			// -- Unknown -------------------------------------------------
			_ => {
				self.transport.write_error(
					id,
					METHOD_NOT_FOUND,
					format!("Unknown method: {}", req.method),
					None,
				);
				return;
			}
		};

		match result {
			Ok(value) => self.transport.write_response(id, value),
			Err(e) => {
				let code = match e {
					ForageError::InvalidParams(_) => INVALID_PARAMS,
					_ => FORAGE_ERROR,
				};
				self.transport
					.write_error(id, code, e.to_string(), Some(e.to_json_rpc_error()));
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Param types
// ---------------------------------------------------------------------------

fn parse_params<T: serde::de::DeserializeOwned>(params: serde_json::Value) -> Result<T, ForageError> {
	serde_json::from_value(params).map_err(|e| ForageError::InvalidParams(e.to_string()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VectorizeParams {
	#[serde(default)]
	items: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct CosineParams {
	a: TermVector,
	b: TermVector,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendParams {
	#[serde(default)]
	items: Vec<serde_json::Value>,
	#[serde(default)]
	profiles: Vec<serde_json::Value>,
	user_id: String,
	#[serde(default)]
	config: RecommenderConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NormalizeParams {
	ingredients: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MineParams {
	transactions: Vec<Transaction>,
	min_support: Option<f64>,
	min_confidence: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestParams {
	#[serde(default)]
	searches: Vec<serde_json::Value>,
	#[serde(default)]
	recipes: Vec<serde_json::Value>,
	#[serde(default)]
	current_ingredients: IngredientList,
	min_support: Option<f64>,
	min_confidence: Option<f64>,
}

/// Current ingredients, either listed or as one comma-separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientList {
	Joined(String),
	Listed(Vec<String>),
}

impl Default for IngredientList {
	fn default() -> Self {
		Self::Listed(Vec::new())
	}
}

impl IngredientList {
	fn into_list(self) -> Vec<String> {
		match self {
			Self::Joined(joined) => joined.split(',').map(str::to_string).collect(),
			Self::Listed(list) => list,
		}
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeasonalParams {
	temperature: f64,
	condition: String,
	season: Option<Season>,
	month: Option<u32>,
	#[serde(default)]
	preferences: SeasonalPreferences,
	table: Option<SeasonalTable>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContextParams {
	month: Option<u32>,
	hour: Option<u32>,
	temperature: Option<f64>,
	condition: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DtwParams {
	current: Option<WeatherPattern>,
	#[serde(default)]
	query: Vec<WeatherPattern>,
	#[serde(default)]
	history: Vec<WeatherPattern>,
}

fn mining_override(
	base: &MiningConfig,
	min_support: Option<f64>,
	min_confidence: Option<f64>,
) -> MiningConfig {
	MiningConfig {
		min_support: min_support.unwrap_or(base.min_support),
		min_confidence: min_confidence.unwrap_or(base.min_confidence),
	}
}

fn season_for_month(month: u32) -> Result<Season, ForageError> {
	if !(1..=12).contains(&month) {
		return Err(ForageError::InvalidParams(format!(
			"month must be in 1..=12, got {month}"
		)));
	}
	Ok(Season::from_month(month))
}

// ---------------------------------------------------------------------------
// Content / collaborative handlers
// ---------------------------------------------------------------------------

fn handle_vectorize(params: serde_json::Value) -> Result<serde_json::Value, ForageError> {
	let p: VectorizeParams = parse_params(params)?;
	let items: Vec<Item> = decode_records(p.items, "item");
	let vectors = vectorize_items(&items);

	let results: Vec<serde_json::Value> = items
		.iter()
		.zip(&vectors)
		.map(|(item, terms)| serde_json::json!({ "id": item.id, "terms": terms }))
		.collect();
	Ok(serde_json::json!({ "vectors": results }))
}

fn handle_cosine(params: serde_json::Value) -> Result<serde_json::Value, ForageError> {
	let p: CosineParams = parse_params(params)?;
	Ok(serde_json::json!({ "similarity": cosine_similarity(&p.a, &p.b) }))
}

fn handle_collaborative(params: serde_json::Value) -> Result<serde_json::Value, ForageError> {
	let p: RecommendParams = parse_params(params)?;
	let profiles: Vec<UserProfile> = decode_records(p.profiles, "profile");
	let scores = collaborative_scores(&profiles, &p.user_id, &p.config);

	let results: Vec<serde_json::Value> = scores
		.into_iter()
		.map(|(id, score)| serde_json::json!({ "id": id, "score": score }))
		.collect();
	Ok(serde_json::json!({ "recommendations": results }))
}

fn handle_hybrid(params: serde_json::Value) -> Result<serde_json::Value, ForageError> {
	let p: RecommendParams = parse_params(params)?;
	let items: Vec<Item> = decode_records(p.items, "item");
	let profiles: Vec<UserProfile> = decode_records(p.profiles, "profile");
	let ranked = hybrid::rank(&items, &profiles, &p.user_id, &p.config);
	Ok(serde_json::json!({ "recommendations": ranked }))
}

// ---------------------------------------------------------------------------
// Association handlers
// ---------------------------------------------------------------------------

fn handle_normalize(params: serde_json::Value) -> Result<serde_json::Value, ForageError> {
	let p: NormalizeParams = parse_params(params)?;
	let normalized: Vec<String> = p.ingredients.iter().map(|s| normalize_ingredient(s)).collect();
	Ok(serde_json::json!({ "normalized": normalized }))
}

fn handle_mine(
	params: serde_json::Value,
	mining: &MiningConfig,
) -> Result<serde_json::Value, ForageError> {
	let p: MineParams = parse_params(params)?;
	let config = mining_override(mining, p.min_support, p.min_confidence);
	let rules = AprioriMiner::from_config(config).mine(&p.transactions)?;
	Ok(serde_json::json!({
		"rules": rules,
		"totalTransactions": p.transactions.len(),
	}))
}

fn handle_suggest(
	params: serde_json::Value,
	mining: &MiningConfig,
) -> Result<serde_json::Value, ForageError> {
	// The query path degrades instead of failing, bad params included.
	let report = match parse_params::<SuggestParams>(params) {
		Ok(p) => {
			let config = mining_override(mining, p.min_support, p.min_confidence);
			let source = SnapshotSource {
				searches: decode_records::<SearchRecord>(p.searches, "search"),
				recipes: decode_records::<Item>(p.recipes, "recipe"),
			};
			associations::suggest(&source, &p.current_ingredients.into_list(), &config)
		}
		Err(e) => {
			tracing::warn!(error = %e, "Unreadable association query; serving fallback");
			associations::fallback_report()
		}
	};
	Ok(serde_json::to_value(report)?)
}

// ---------------------------------------------------------------------------
// Seasonal handlers
// ---------------------------------------------------------------------------

fn handle_seasonal_recommend(params: serde_json::Value) -> Result<serde_json::Value, ForageError> {
	let p: SeasonalParams = parse_params(params)?;
	let season = match (p.season, p.month) {
		(Some(season), _) => Some(season),
		(None, Some(month)) => Some(season_for_month(month)?),
		(None, None) => None,
	};
	let matcher = match p.table {
		Some(table) => SeasonalMatcher::with_table(table),
		None => SeasonalMatcher::new(),
	};

	let recommendations = matcher.recommend(p.temperature, &p.condition, season, &p.preferences);
	Ok(serde_json::json!({
		"category": select_category(p.temperature, &p.condition).as_str(),
		"season": season,
		"recommendations": recommendations,
	}))
}

fn handle_seasonal_context(params: serde_json::Value) -> Result<serde_json::Value, ForageError> {
	let p: ContextParams = parse_params(params)?;
	let mut context = serde_json::Map::new();

	if let Some(month) = p.month {
		context.insert("season".into(), season_for_month(month)?.as_str().into());
	}
	if let Some(hour) = p.hour {
		if hour > 23 {
			return Err(ForageError::InvalidParams(format!(
				"hour must be in 0..=23, got {hour}"
			)));
		}
		context.insert("timeOfDay".into(), TimeOfDay::from_hour(hour).as_str().into());
	}
	if let (Some(temperature), Some(condition)) = (p.temperature, p.condition.as_deref()) {
		context.insert(
			"category".into(),
			select_category(temperature, condition).as_str().into(),
		);
	}

	Ok(serde_json::Value::Object(context))
}

fn handle_dtw_distance(params: serde_json::Value) -> Result<serde_json::Value, ForageError> {
	let p: DtwParams = parse_params(params)?;
	let query = match p.current {
		Some(current) => vec![current],
		None if !p.query.is_empty() => p.query,
		None => {
			return Err(ForageError::InvalidParams(
				"expected `current` or a non-empty `query`".into(),
			))
		}
	};

	let distance = dtw_sequence_distance(&query, &p.history);
	// Non-finite distances (empty history) serialize as null.
	Ok(serde_json::json!({
		"distance": distance,
		"finite": distance.is_finite(),
	}))
}
