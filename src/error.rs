use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForageError {
	#[error("Invalid params: {0}")]
	InvalidParams(String),
	#[error("Invalid threshold {name}: {value} (expected a value in [0, 1])")]
	InvalidThreshold { name: &'static str, value: f64 },
	#[error("Transaction source failed: {0}")]
	Source(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Serialization error: {0}")]
	Serialization(String),
}

impl ForageError {
	pub fn code(&self) -> &str {
		match self {
			Self::InvalidParams(_) => "FORAGE_INVALID_PARAMS",
			Self::InvalidThreshold { .. } => "FORAGE_INVALID_THRESHOLD",
			Self::Source(_) => "FORAGE_SOURCE",
			Self::Io(_) => "FORAGE_IO",
			Self::Serialization(_) => "FORAGE_SERIALIZATION",
		}
	}

	pub fn to_json_rpc_error(&self) -> serde_json::Value {
		serde_json::json!({
			"forageCode": self.code(),
			"message": self.to_string(),
		})
	}
}

impl From<serde_json::Error> for ForageError {
	fn from(e: serde_json::Error) -> Self {
		Self::Serialization(e.to_string())
	}
}
