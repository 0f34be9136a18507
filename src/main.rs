use anyhow::Result;
use clap::Parser;
use simse_forage_engine::config::CliArgs;
use simse_forage_engine::server::ForageServer;
use simse_forage_engine::transport::NdjsonTransport;

fn main() -> Result<()> {
	let args = CliArgs::parse();

	// Logging goes to stderr; stdout carries JSON-RPC only.
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
		)
		.init();

	let mining = args.mining_config()?;
	tracing::info!(
		min_support = mining.min_support,
		min_confidence = mining.min_confidence,
		"Association mining thresholds"
	);

	let mut server = ForageServer::new(NdjsonTransport::new(), mining);

	tracing::info!("simse-forage-engine ready");

	if let Err(e) = server.run() {
		tracing::error!("Server error: {}", e);
		std::process::exit(1);
	}

	Ok(())
}
