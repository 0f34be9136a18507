use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Sparse term -> weight mapping. Ordered so identical inputs serialize
/// byte-for-byte identically.
pub type TermVector = BTreeMap<String, f64>;

/// One recipe's or one search's normalized ingredient list.
pub type Transaction = Vec<String>;

const DEFAULT_RATING: f64 = 3.0;

fn default_rating() -> f64 {
	DEFAULT_RATING
}

/// Accepts either a list of strings or a single string, which becomes a
/// one-element list.
pub fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum OneOrMany {
		One(String),
		Many(Vec<String>),
	}

	Ok(match OneOrMany::deserialize(deserializer)? {
		OneOrMany::One(value) => vec![value],
		OneOrMany::Many(values) => values,
	})
}

// ---------------------------------------------------------------------------
// Catalog records
// ---------------------------------------------------------------------------

/// A recipe or food entity. Only `id` is required; every other field falls
/// back to an empty/neutral default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
	#[serde(alias = "_id")]
	pub id: String,
	#[serde(default)]
	pub name: String,
	#[serde(default, alias = "Ingredients", deserialize_with = "string_or_list")]
	pub ingredients: Vec<String>,
	#[serde(default)]
	pub cuisine: String,
	#[serde(default)]
	pub difficulty: String,
	#[serde(default)]
	pub cooking_time: f64,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default = "default_rating")]
	pub rating: f64,
}

impl Item {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: String::new(),
			ingredients: Vec::new(),
			cuisine: String::new(),
			difficulty: String::new(),
			cooking_time: 0.0,
			tags: Vec::new(),
			rating: DEFAULT_RATING,
		}
	}

	/// Ingredients, cuisine, difficulty and tags joined by spaces and
	/// lowercased.
	pub fn feature_document(&self) -> String {
		let mut parts: Vec<&str> = Vec::with_capacity(self.ingredients.len() + self.tags.len() + 2);
		parts.extend(self.ingredients.iter().map(String::as_str));
		parts.push(&self.cuisine);
		parts.push(&self.difficulty);
		parts.extend(self.tags.iter().map(String::as_str));
		parts.join(" ").to_lowercase()
	}
}

/// A user's taste record as seen by the recommenders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
	pub user_id: String,
	#[serde(default, alias = "likedRecipes")]
	pub liked_items: Vec<String>,
	#[serde(default, alias = "dislikedRecipes")]
	pub disliked_items: Vec<String>,
	#[serde(default)]
	pub preferred_cuisines: Vec<String>,
	#[serde(default)]
	pub dietary_restrictions: Vec<String>,
	#[serde(default, alias = "cookingSkillLevel")]
	pub cooking_skill: Option<String>,
	#[serde(default)]
	pub preferred_cooking_time: Option<f64>,
}

impl UserProfile {
	pub fn new(user_id: impl Into<String>) -> Self {
		Self {
			user_id: user_id.into(),
			liked_items: Vec::new(),
			disliked_items: Vec::new(),
			preferred_cuisines: Vec::new(),
			dietary_restrictions: Vec::new(),
			cooking_skill: None,
			preferred_cooking_time: None,
		}
	}

	pub fn likes(&self, item_id: &str) -> bool {
		self.liked_items.iter().any(|id| id == item_id)
	}

	pub fn dislikes(&self, item_id: &str) -> bool {
		self.disliked_items.iter().any(|id| id == item_id)
	}

	/// Whether the user has already expressed an opinion on the item.
	pub fn has_rated(&self, item_id: &str) -> bool {
		self.likes(item_id) || self.dislikes(item_id)
	}
}

/// An item from the hybrid ranker with its score breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedItem {
	pub item: Item,
	pub score: f64,
	pub scores: HybridScores,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HybridScores {
	pub content: Option<f64>,
	pub collaborative: Option<f64>,
}

// ---------------------------------------------------------------------------
// Association mining
// ---------------------------------------------------------------------------

/// A search-log entry carrying the ingredients the user typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
	#[serde(default)]
	pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
	pub antecedent: String,
	pub consequent: String,
	pub support: f64,
	pub confidence: f64,
	pub lift: f64,
}

/// One ingredient suggestion. Percentages are whole numbers in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationSuggestion {
	pub ingredient: String,
	pub confidence: u32,
	pub support: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lift: Option<f64>,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub is_popular: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationReport {
	pub associations: Vec<AssociationSuggestion>,
	pub total_transactions: usize,
	pub has_current_ingredients: bool,
}

// ---------------------------------------------------------------------------
// Weather / seasonal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
	Spring,
	Summer,
	Autumn,
	Winter,
}

impl Season {
	/// Meteorological season for a 1-based month (northern hemisphere).
	pub fn from_month(month: u32) -> Self {
		match month {
			3..=5 => Self::Spring,
			6..=8 => Self::Summer,
			9..=11 => Self::Autumn,
			_ => Self::Winter,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Spring => "spring",
			Self::Summer => "summer",
			Self::Autumn => "autumn",
			Self::Winter => "winter",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
	Morning,
	Afternoon,
	Evening,
	Night,
}

impl TimeOfDay {
	/// Bucket for a 0-23 hour of the day.
	pub fn from_hour(hour: u32) -> Self {
		match hour {
			5..=11 => Self::Morning,
			12..=16 => Self::Afternoon,
			17..=20 => Self::Evening,
			_ => Self::Night,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Morning => "morning",
			Self::Afternoon => "afternoon",
			Self::Evening => "evening",
			Self::Night => "night",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherPattern {
	pub temperature: f64,
	pub condition: String,
	pub humidity: f64,
	pub season: Season,
	pub time_of_day: TimeOfDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
	Recipe,
	Restaurant,
	Cuisine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecommendation {
	pub id: String,
	pub name: String,
	#[serde(rename = "type")]
	pub kind: FoodKind,
	pub weather_score: f64,
	pub seasonal_boost: f64,
	pub temperature_range: (f64, f64),
	pub preferred_conditions: Vec<String>,
	pub tags: Vec<String>,
}

impl FoodRecommendation {
	/// Case-folded tag lookup; surrounding whitespace is ignored.
	pub fn has_tag(&self, tag: &str) -> bool {
		let tag = tag.trim().to_lowercase();
		self.tags.iter().any(|t| t.trim().to_lowercase() == tag)
	}
}

// ---------------------------------------------------------------------------
// Loose record decoding
// ---------------------------------------------------------------------------

/// Decode each raw record independently, dropping the ones that do not fit
/// the expected shape so one bad record cannot fail a whole batch.
pub fn decode_records<T: DeserializeOwned>(values: Vec<serde_json::Value>, kind: &str) -> Vec<T> {
	let total = values.len();
	let decoded: Vec<T> = values
		.into_iter()
		.enumerate()
		.filter_map(|(index, value)| match serde_json::from_value(value) {
			Ok(record) => Some(record),
			Err(e) => {
				tracing::warn!(kind, index, error = %e, "Skipping malformed record");
				None
			}
		})
		.collect();
	if decoded.len() < total {
		tracing::debug!(kind, kept = decoded.len(), total, "Decoded records with skips");
	}
	decoded
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn item_defaults_fill_missing_fields() {
		let item: Item = serde_json::from_value(json!({ "_id": "r1" })).unwrap();
		assert_eq!(item.id, "r1");
		assert_eq!(item.rating, 3.0);
		assert_eq!(item.cooking_time, 0.0);
		assert!(item.ingredients.is_empty());
	}

	#[test]
	fn ingredients_accept_string_or_list() {
		let joined: Item =
			serde_json::from_value(json!({ "_id": "r1", "Ingredients": "onion, garlic" })).unwrap();
		assert_eq!(joined.ingredients, vec!["onion, garlic".to_string()]);

		let listed: Item =
			serde_json::from_value(json!({ "id": "r2", "ingredients": ["onion", "ginger"] }))
				.unwrap();
		assert_eq!(listed.ingredients, vec!["onion".to_string(), "ginger".to_string()]);

		let bad = serde_json::from_value::<Item>(json!({ "id": "r3", "ingredients": 7 }));
		assert!(bad.is_err());
	}

	#[test]
	fn tags_fold_non_ascii_case() {
		let food = FoodRecommendation {
			id: "crepes".into(),
			name: "Crêpes".into(),
			kind: FoodKind::Recipe,
			weather_score: 0.5,
			seasonal_boost: 1.0,
			temperature_range: (0.0, 30.0),
			preferred_conditions: Vec::new(),
			tags: vec!["Française".into()],
		};
		assert!(food.has_tag("FRANÇAISE"));
		assert!(food.has_tag(" française "));
		assert!(!food.has_tag("italian"));
	}

	#[test]
	fn feature_document_joins_and_lowercases() {
		let mut item = Item::new("r1");
		item.ingredients = vec!["Basil".into(), "Tomato".into()];
		item.cuisine = "Italian".into();
		item.difficulty = "Easy".into();
		item.tags = vec!["Quick".into()];
		assert_eq!(item.feature_document(), "basil tomato italian easy quick");
	}

	#[test]
	fn profile_accepts_recipe_aliases() {
		let profile: UserProfile = serde_json::from_value(json!({
			"userId": "u1",
			"likedRecipes": ["a"],
			"dislikedRecipes": ["b"],
			"cookingSkillLevel": "easy"
		}))
		.unwrap();
		assert!(profile.likes("a"));
		assert!(profile.dislikes("b"));
		assert!(profile.has_rated("b"));
		assert!(!profile.has_rated("c"));
		assert_eq!(profile.cooking_skill.as_deref(), Some("easy"));
		assert_eq!(profile.preferred_cooking_time, None);
	}

	#[test]
	fn decode_records_skips_malformed() {
		let items: Vec<Item> = decode_records(
			vec![json!({ "id": "ok" }), json!({ "name": "no id" }), json!(42)],
			"item",
		);
		assert_eq!(items.len(), 1);
		assert_eq!(items[0].id, "ok");
	}

	#[test]
	fn season_from_month() {
		assert_eq!(Season::from_month(1), Season::Winter);
		assert_eq!(Season::from_month(4), Season::Spring);
		assert_eq!(Season::from_month(7), Season::Summer);
		assert_eq!(Season::from_month(10), Season::Autumn);
		assert_eq!(Season::from_month(12), Season::Winter);
	}

	#[test]
	fn time_of_day_from_hour() {
		assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
		assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
		assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
		assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
		assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
	}

	#[test]
	fn suggestion_omits_absent_fields() {
		let s = AssociationSuggestion {
			ingredient: "garlic".into(),
			confidence: 50,
			support: 20,
			lift: None,
			is_popular: false,
		};
		let value = serde_json::to_value(&s).unwrap();
		assert!(value.get("lift").is_none());
		assert!(value.get("isPopular").is_none());
	}
}
