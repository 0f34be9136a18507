use crate::types::TermVector;

/// Cosine similarity between two sparse term vectors.
///
/// The dot product runs over shared terms; each norm runs over all of that
/// vector's terms. Returns 0.0 when nothing is shared or either norm is zero.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
	let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };

	let mut dot: f64 = 0.0;
	let mut shared = 0usize;
	for (term, weight) in small {
		if let Some(other) = large.get(term) {
			dot += weight * other;
			shared += 1;
		}
	}
	if shared == 0 {
		return 0.0;
	}

	let denom = magnitude(a) * magnitude(b);
	if denom == 0.0 {
		return 0.0;
	}

	let result = dot / denom;
	if !result.is_finite() {
		return 0.0;
	}
	result.clamp(-1.0, 1.0)
}

/// L2 norm over every term of the vector.
pub fn magnitude(vector: &TermVector) -> f64 {
	vector.values().map(|w| w * w).sum::<f64>().sqrt()
}

/// Component-wise sum of term vectors.
pub fn sum_vectors<'a, I>(vectors: I) -> TermVector
where
	I: IntoIterator<Item = &'a TermVector>,
{
	let mut total = TermVector::new();
	for vector in vectors {
		for (term, weight) in vector {
			*total.entry(term.clone()).or_insert(0.0) += weight;
		}
	}
	total
}
