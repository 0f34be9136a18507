// ---------------------------------------------------------------------------
// Ingredient normalization
// ---------------------------------------------------------------------------
//
// Reduces free-text ingredient lines ("2 tbsp finely chopped onions (diced)")
// to a base ingredient ("onions") so that search logs and recipe lists can
// be mined as comparable transactions.
// ---------------------------------------------------------------------------

use std::sync::LazyLock;

use regex::Regex;

static PARENTHETICAL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("parenthetical pattern"));

static QUANTITY_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"\b(\d+/?\d*|\d*\.?\d+)\s*(cups?|tbsp|tsp|teaspoons?|tablespoons?|oz|ounces?|lbs?|pounds?|kg|grams?|ml|liters?|cloves?|pieces?|slices?)\b",
	)
	.expect("quantity pattern")
});

static BARE_NUMBER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\b\d+[\s-]*[/\d]*\s*").expect("number pattern"));

static PREPARATION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"\b(finely|coarsely|roughly|thinly|thickly|diced|chopped|sliced|minced|crushed|ground|fresh|dried|frozen|canned|organic)\b",
	)
	.expect("preparation pattern")
});

static ARTICLES: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\b(a|an|the|of|to|for)\b").expect("article pattern"));

static SEPARATORS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[\s-]+").expect("separator pattern"));

/// Checked in order against the cleaned string; first contained key wins.
const SYNONYMS: &[(&str, &str)] = &[
	("red chilli powder", "chili powder"),
	("turmeric powder", "turmeric"),
	("cumin seeds", "cumin"),
	("coriander seeds", "coriander"),
	("mustard seeds", "mustard seeds"),
	("curry leaves", "curry leaves"),
	("green chilies", "green chili"),
	("red chilies", "red chili"),
	("garam masala", "garam masala"),
	("jeera", "cumin"),
	("haldi", "turmeric"),
];

/// Strip quantities, units, parentheticals, preparation words and articles,
/// leaving collapsed lowercase text.
pub fn clean_ingredient(raw: &str) -> String {
	let text = raw.trim().to_lowercase();
	let text = PARENTHETICAL.replace_all(&text, "");
	let text = QUANTITY_WITH_UNIT.replace_all(&text, "");
	let text = BARE_NUMBER.replace_all(&text, "");
	let text = PREPARATION.replace_all(&text, "");
	let text = ARTICLES.replace_all(&text, "");
	SEPARATORS.replace_all(&text, " ").trim().to_string()
}

/// Base ingredient for a raw ingredient line: a synonym-map hit if the
/// cleaned text contains a known key, else its first word longer than two
/// characters, else the whole cleaned text.
pub fn normalize_ingredient(raw: &str) -> String {
	let cleaned = clean_ingredient(raw);

	if let Some((_, canonical)) = SYNONYMS.iter().find(|(key, _)| cleaned.contains(key)) {
		return canonical.to_string();
	}

	cleaned
		.split(' ')
		.find(|word| word.chars().count() > 2)
		.map(str::to_string)
		.unwrap_or(cleaned)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_quantity_preparation_and_parenthetical() {
		assert_eq!(clean_ingredient("2 tbsp finely chopped onions (diced)"), "onions");
		assert_eq!(normalize_ingredient("2 tbsp finely chopped onions (diced)"), "onions");
	}

	#[test]
	fn strips_fractions_and_units() {
		assert_eq!(clean_ingredient("1/2 cup sugar"), "sugar");
		assert_eq!(clean_ingredient("3 cloves garlic, minced"), "garlic,");
		assert_eq!(normalize_ingredient("250 grams paneer"), "paneer");
	}

	#[test]
	fn strips_articles() {
		assert_eq!(clean_ingredient("a pinch of salt"), "pinch salt");
		assert_eq!(normalize_ingredient("a pinch of salt"), "pinch");
	}

	#[test]
	fn applies_synonyms() {
		assert_eq!(normalize_ingredient("1 tsp jeera"), "cumin");
		assert_eq!(normalize_ingredient("Haldi (turmeric)"), "turmeric");
		assert_eq!(normalize_ingredient("2 tsp red chilli powder"), "chili powder");
		assert_eq!(normalize_ingredient("1 tbsp cumin seeds"), "cumin");
	}

	#[test]
	fn collapses_dashes_and_whitespace() {
		assert_eq!(clean_ingredient("  sun-dried   tomatoes "), "sun tomatoes");
	}

	#[test]
	fn short_words_fall_back_to_cleaned_text() {
		assert_eq!(normalize_ingredient("Oil"), "oil");
		assert_eq!(normalize_ingredient("2 eg"), "eg");
		assert_eq!(normalize_ingredient(""), "");
	}
}
