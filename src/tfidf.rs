// ---------------------------------------------------------------------------
// TF-IDF vectorizer
// ---------------------------------------------------------------------------
//
// Turns item feature documents into sparse term-weight vectors.
//
// Document frequency counts documents whose joined text *contains* the term
// as a substring, not documents holding it as a whole token. Short terms
// therefore pick up extra documents ("oil" is found in "boiled"); results
// depend on this, so keep it.
// ---------------------------------------------------------------------------

use std::collections::{BTreeMap, HashMap};

use crate::types::{Item, TermVector};

/// Build one TF-IDF vector per item, in item order.
pub fn vectorize_items(items: &[Item]) -> Vec<TermVector> {
	let documents: Vec<String> = items.iter().map(Item::feature_document).collect();
	vectorize_documents(&documents)
}

/// Build one TF-IDF vector per pre-joined, lowercased document.
///
/// `tf = count / tokens in document`, `idf = ln(documents / df)` with a zero
/// `df` treated as 1. Zero-weight terms are left out.
pub fn vectorize_documents(documents: &[String]) -> Vec<TermVector> {
	if documents.is_empty() {
		return Vec::new();
	}

	let term_counts: Vec<(BTreeMap<&str, usize>, usize)> = documents
		.iter()
		.map(|doc| {
			let mut counts = BTreeMap::new();
			let mut tokens = 0usize;
			for token in doc.split_whitespace() {
				*counts.entry(token).or_insert(0) += 1;
				tokens += 1;
			}
			(counts, tokens)
		})
		.collect();

	let mut doc_freq: HashMap<&str, usize> = HashMap::new();
	for (counts, _) in &term_counts {
		for &term in counts.keys() {
			doc_freq
				.entry(term)
				.or_insert_with(|| documents.iter().filter(|doc| doc.contains(term)).count());
		}
	}

	let total_docs = documents.len() as f64;
	let vectors: Vec<TermVector> = term_counts
		.iter()
		.map(|(counts, tokens)| {
			let mut vector = TermVector::new();
			if *tokens == 0 {
				return vector;
			}
			for (&term, &count) in counts {
				let tf = count as f64 / *tokens as f64;
				let df = doc_freq.get(term).copied().unwrap_or(0).max(1);
				let weight = tf * (total_docs / df as f64).ln();
				if weight > 0.0 {
					vector.insert(term.to_string(), weight);
				}
			}
			vector
		})
		.collect();

	tracing::debug!(
		documents = documents.len(),
		terms = doc_freq.len(),
		"Built TF-IDF vectors"
	);
	vectors
}
