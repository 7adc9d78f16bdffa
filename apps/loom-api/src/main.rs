use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = loom_api::Args::parse();

	loom_api::run(args).await
}
