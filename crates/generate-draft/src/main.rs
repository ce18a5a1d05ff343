use anyhow::{Context, Result};
use clap::Parser;
use shared::{Config, DraftReport};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "generate-draft")]
#[command(version)]
#[command(about = "Generate one medical-education blog draft from health news feeds")]
struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    let _args = Args::parse();
    setup_tracing();

    let config = Config::from_env();
    tracing::info!(
        "Using model {} with output dir {}",
        config.model,
        config.output_dir.display()
    );

    let report = shared::run(&config)
        .await
        .context("Failed to generate blog draft")?;

    print_report(&report)?;

    Ok(())
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_report(report: &DraftReport) -> Result<()> {
    let snippet = serde_json::to_string_pretty(&report.metadata)
        .context("Failed to serialize metadata snippet")?;

    println!("\n✅ Draft generated:");
    println!("- markdown: {}", report.path.display());
    println!("\n📌 Metadata snippet (add this to the blog-posts index):");
    println!("{}", snippet);
    println!("\n(Next step: insert the snippet into the blog-posts index and review the draft before publishing.)");

    Ok(())
}
