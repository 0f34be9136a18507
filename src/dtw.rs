// ---------------------------------------------------------------------------
// Dynamic time warping over weather observations
// ---------------------------------------------------------------------------

use crate::types::WeatherPattern;

const TEMPERATURE_SCALE: f64 = 50.0;
const HUMIDITY_SCALE: f64 = 100.0;
const CONDITION_MISMATCH: f64 = 1.0;
const SEASON_MISMATCH: f64 = 0.5;
const TIME_OF_DAY_MISMATCH: f64 = 0.3;

/// Distance between two observations: scaled temperature and humidity
/// differences plus fixed penalties for differing condition, season and
/// time of day. Conditions are trimmed and case-folded before comparing.
pub fn weather_distance(a: &WeatherPattern, b: &WeatherPattern) -> f64 {
	let mut distance = (a.temperature - b.temperature).abs() / TEMPERATURE_SCALE
		+ (a.humidity - b.humidity).abs() / HUMIDITY_SCALE;
	if a.condition.trim().to_lowercase() != b.condition.trim().to_lowercase() {
		distance += CONDITION_MISMATCH;
	}
	if a.season != b.season {
		distance += SEASON_MISMATCH;
	}
	if a.time_of_day != b.time_of_day {
		distance += TIME_OF_DAY_MISMATCH;
	}
	distance
}

/// Minimum cumulative alignment cost between two sequences. Either side
/// empty gives `f64::INFINITY`.
///
/// Only two rows of the cost matrix are kept.
pub fn dtw_sequence_distance(query: &[WeatherPattern], history: &[WeatherPattern]) -> f64 {
	if query.is_empty() || history.is_empty() {
		return f64::INFINITY;
	}

	let m = history.len();
	let mut prev = vec![f64::INFINITY; m + 1];
	let mut curr = vec![f64::INFINITY; m + 1];
	prev[0] = 0.0;

	for q in query {
		curr[0] = f64::INFINITY;
		for (j, h) in history.iter().enumerate() {
			let cost = weather_distance(q, h);
			let best = prev[j + 1].min(curr[j]).min(prev[j]);
			curr[j + 1] = cost + best;
		}
		std::mem::swap(&mut prev, &mut curr);
	}

	prev[m]
}

/// DTW distance of the current observation against a historical sequence.
pub fn dtw_distance(current: &WeatherPattern, history: &[WeatherPattern]) -> f64 {
	dtw_sequence_distance(std::slice::from_ref(current), history)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{Season, TimeOfDay};

	fn pattern(temp: f64, condition: &str, humidity: f64) -> WeatherPattern {
		WeatherPattern {
			temperature: temp,
			condition: condition.into(),
			humidity,
			season: Season::Summer,
			time_of_day: TimeOfDay::Afternoon,
		}
	}

	#[test]
	fn weather_distance_components() {
		let a = pattern(30.0, "clear", 40.0);
		let mut b = pattern(20.0, "rain", 60.0);
		b.season = Season::Winter;
		b.time_of_day = TimeOfDay::Night;
		let expected = 10.0 / 50.0 + 1.0 + 20.0 / 100.0 + 0.5 + 0.3;
		assert!((weather_distance(&a, &b) - expected).abs() < 1e-10);
	}

	#[test]
	fn condition_compare_ignores_case() {
		let a = pattern(20.0, "Clear", 50.0);
		let b = pattern(20.0, "clear", 50.0);
		assert_eq!(weather_distance(&a, &b), 0.0);
	}

	#[test]
	fn condition_compare_folds_non_ascii() {
		let a = pattern(20.0, "NUAGEUX ÉPARS", 50.0);
		let b = pattern(20.0, " nuageux épars", 50.0);
		assert_eq!(weather_distance(&a, &b), 0.0);
		let c = pattern(20.0, "pluie", 50.0);
		assert_eq!(weather_distance(&a, &c), 1.0);
	}

	#[test]
	fn identical_single_point_is_zero() {
		let w = pattern(22.0, "clear", 55.0);
		assert_eq!(dtw_distance(&w, &[w.clone()]), 0.0);
	}

	#[test]
	fn single_point_equals_pairwise_distance() {
		let a = pattern(22.0, "clear", 55.0);
		let b = pattern(12.0, "rain", 85.0);
		assert!((dtw_distance(&a, &[b.clone()]) - weather_distance(&a, &b)).abs() < 1e-10);
	}

	#[test]
	fn single_point_sums_over_history() {
		let a = pattern(20.0, "clear", 50.0);
		let history = vec![pattern(25.0, "clear", 50.0), pattern(20.0, "rain", 50.0)];
		let expected = 0.1 + 1.0;
		assert!((dtw_distance(&a, &history) - expected).abs() < 1e-10);
	}

	#[test]
	fn empty_sequences_are_infinite() {
		let a = pattern(20.0, "clear", 50.0);
		assert!(dtw_distance(&a, &[]).is_infinite());
		assert!(dtw_sequence_distance(&[], &[a]).is_infinite());
	}

	#[test]
	fn warping_absorbs_repeated_points() {
		let x = pattern(10.0, "clear", 50.0);
		let y = pattern(30.0, "clear", 50.0);
		let query = vec![x.clone(), y.clone()];
		let history = vec![x.clone(), x, y.clone(), y];
		assert_eq!(dtw_sequence_distance(&query, &history), 0.0);
	}
}
