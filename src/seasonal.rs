// ---------------------------------------------------------------------------
// Seasonal matcher — weather-appropriate food categories
// ---------------------------------------------------------------------------
//
// Picks a weather category from temperature and condition, then ranks that
// category's table entries after dietary filtering, a favorite-cuisine boost
// and a season multiplier.
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::types::{FoodKind, FoodRecommendation, Season};

const FAVORITE_CUISINE_BOOST: f64 = 1.2;
const HOT_THRESHOLD: f64 = 25.0;
const COLD_THRESHOLD: f64 = 15.0;

const HOT_CONDITIONS: &[&str] = &["clear", "sunny"];
const COLD_CONDITIONS: &[&str] = &["rain", "drizzle", "snow", "overcast"];

const MEAT_TAGS: &[&str] = &["meat", "seafood"];
const ANIMAL_PRODUCT_TAGS: &[&str] = &["dairy", "eggs"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCategory {
	HotSunny,
	ColdRainy,
	MildPleasant,
}

impl WeatherCategory {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::HotSunny => "hot_sunny",
			Self::ColdRainy => "cold_rainy",
			Self::MildPleasant => "mild_pleasant",
		}
	}
}

/// Category for the current weather. The condition is trimmed and
/// case-folded, then matched against fixed keyword sets.
pub fn select_category(temperature: f64, condition: &str) -> WeatherCategory {
	let condition = condition.trim().to_lowercase();
	if temperature > HOT_THRESHOLD && HOT_CONDITIONS.contains(&condition.as_str()) {
		WeatherCategory::HotSunny
	} else if temperature < COLD_THRESHOLD && COLD_CONDITIONS.contains(&condition.as_str()) {
		WeatherCategory::ColdRainy
	} else {
		WeatherCategory::MildPleasant
	}
}

/// Multiplier applied to every entry of `category` in `season`. Unlisted
/// combinations, and an unknown season, leave scores unchanged.
pub fn season_multiplier(season: Option<Season>, category: WeatherCategory) -> f64 {
	use WeatherCategory::*;
	match (season, category) {
		(Some(Season::Summer), HotSunny) => 1.5,
		(Some(Season::Summer), MildPleasant) => 1.2,
		(Some(Season::Summer), ColdRainy) => 0.8,
		(Some(Season::Winter), ColdRainy) => 1.5,
		(Some(Season::Winter), MildPleasant) => 1.1,
		(Some(Season::Winter), HotSunny) => 0.7,
		(Some(Season::Spring), MildPleasant) => 1.3,
		(Some(Season::Spring), HotSunny) => 1.1,
		(Some(Season::Spring), ColdRainy) => 1.0,
		(Some(Season::Autumn), MildPleasant) => 1.2,
		(Some(Season::Autumn), ColdRainy) => 1.3,
		(Some(Season::Autumn), HotSunny) => 0.9,
		(None, _) => 1.0,
	}
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Food entries per weather category. Missing categories deserialize empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalTable {
	#[serde(default)]
	pub hot_sunny: Vec<FoodRecommendation>,
	#[serde(default)]
	pub cold_rainy: Vec<FoodRecommendation>,
	#[serde(default)]
	pub mild_pleasant: Vec<FoodRecommendation>,
}

impl Default for SeasonalTable {
	fn default() -> Self {
		Self::builtin()
	}
}

impl SeasonalTable {
	pub fn entries(&self, category: WeatherCategory) -> &[FoodRecommendation] {
		match category {
			WeatherCategory::HotSunny => &self.hot_sunny,
			WeatherCategory::ColdRainy => &self.cold_rainy,
			WeatherCategory::MildPleasant => &self.mild_pleasant,
		}
	}

	/// The stock table.
	pub fn builtin() -> Self {
		Self {
			hot_sunny: vec![
				entry(
					"ice_cream",
					"Ice Cream & Cold Desserts",
					0.95,
					1.5,
					(25.0, 45.0),
					&["clear", "sunny"],
					&["cold", "refreshing", "dessert"],
				),
				entry(
					"smoothies",
					"Fresh Smoothies & Juices",
					0.9,
					1.4,
					(20.0, 40.0),
					&["clear", "sunny", "partly cloudy"],
					&["cold", "healthy", "refreshing"],
				),
				entry(
					"salads",
					"Fresh Salads & Light Meals",
					0.85,
					1.3,
					(22.0, 35.0),
					&["clear", "sunny"],
					&["light", "fresh", "healthy"],
				),
			],
			cold_rainy: vec![
				entry(
					"hot_soup",
					"Hot Soups & Stews",
					0.95,
					1.6,
					(-10.0, 15.0),
					&["rain", "drizzle", "snow", "cloudy"],
					&["hot", "comfort", "warming"],
				),
				entry(
					"hot_beverages",
					"Hot Chocolate & Coffee",
					0.9,
					1.5,
					(-5.0, 20.0),
					&["rain", "snow", "cloudy"],
					&["hot", "beverage", "comfort"],
				),
				entry(
					"comfort_food",
					"Comfort Food & Hearty Meals",
					0.88,
					1.4,
					(0.0, 18.0),
					&["rain", "drizzle", "overcast"],
					&["hearty", "comfort", "warm"],
				),
			],
			mild_pleasant: vec![
				entry(
					"grilled_food",
					"Grilled & BBQ Items",
					0.85,
					1.2,
					(18.0, 28.0),
					&["clear", "partly cloudy"],
					&["grilled", "outdoor", "social"],
				),
				entry(
					"pasta",
					"Pasta & Mediterranean",
					0.8,
					1.1,
					(15.0, 25.0),
					&["clear", "partly cloudy"],
					&["moderate", "satisfying"],
				),
			],
		}
	}
}

fn entry(
	id: &str,
	name: &str,
	weather_score: f64,
	seasonal_boost: f64,
	temperature_range: (f64, f64),
	conditions: &[&str],
	tags: &[&str],
) -> FoodRecommendation {
	FoodRecommendation {
		id: id.to_string(),
		name: name.to_string(),
		kind: FoodKind::Recipe,
		weather_score,
		seasonal_boost,
		temperature_range,
		preferred_conditions: conditions.iter().map(|s| s.to_string()).collect(),
		tags: tags.iter().map(|s| s.to_string()).collect(),
	}
}

// ---------------------------------------------------------------------------
// Matcher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalPreferences {
	#[serde(default)]
	pub is_vegetarian: bool,
	#[serde(default)]
	pub is_vegan: bool,
	#[serde(default)]
	pub favorite_cuisines: Vec<String>,
}

impl SeasonalPreferences {
	fn allows(&self, entry: &FoodRecommendation) -> bool {
		if (self.is_vegetarian || self.is_vegan) && MEAT_TAGS.iter().any(|t| entry.has_tag(t)) {
			return false;
		}
		!(self.is_vegan && ANIMAL_PRODUCT_TAGS.iter().any(|t| entry.has_tag(t)))
	}

	fn favors(&self, entry: &FoodRecommendation) -> bool {
		self.favorite_cuisines.iter().any(|c| entry.has_tag(c))
	}
}

#[derive(Debug, Clone, Default)]
pub struct SeasonalMatcher {
	table: SeasonalTable,
}

impl SeasonalMatcher {
	/// Matcher over the stock table.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_table(table: SeasonalTable) -> Self {
		Self { table }
	}

	pub fn table(&self) -> &SeasonalTable {
		&self.table
	}

	/// Ranked entries for the current weather, best first. Returned entries
	/// carry their final `weather_score`; ties keep table order.
	pub fn recommend(
		&self,
		temperature: f64,
		condition: &str,
		season: Option<Season>,
		preferences: &SeasonalPreferences,
	) -> Vec<FoodRecommendation> {
		let category = select_category(temperature, condition);
		let multiplier = season_multiplier(season, category);

		let mut ranked: Vec<FoodRecommendation> = self
			.table
			.entries(category)
			.iter()
			.filter(|e| preferences.allows(e))
			.map(|e| {
				let mut e = e.clone();
				if preferences.favors(&e) {
					e.weather_score *= FAVORITE_CUISINE_BOOST;
				}
				e.weather_score *= multiplier;
				e
			})
			.collect();
		ranked.sort_by(|a, b| b.weather_score.total_cmp(&a.weather_score));

		tracing::debug!(
			category = category.as_str(),
			season = season.map(|s| s.as_str()),
			multiplier,
			results = ranked.len(),
			"Seasonal ranking complete"
		);
		ranked
	}
}
