use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = lyric_api::Args::parse();

	lyric_api::run(args).await
}
