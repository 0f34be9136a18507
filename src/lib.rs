pub mod apriori;
pub mod associations;
pub mod collaborative;
pub mod config;
pub mod cosine;
pub mod dtw;
pub mod error;
pub mod hybrid;
pub mod normalize;
pub mod protocol;
pub mod seasonal;
pub mod server;
pub mod tfidf;
pub mod transport;
pub mod types;
