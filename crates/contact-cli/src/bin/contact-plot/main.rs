mod figure;

use anyhow::Context;
use clap::{ArgAction, Parser};
use contact_matrix::core::io::report::ContactReport;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "contact-plot",
    version,
    about = "Draws a contact matrix written by `contact` as a heatmap of contact percentages."
)]
struct PlotCli {
    /// Contact matrix file written by `contact`
    #[arg(value_name = "DAT_FILE")]
    input: PathBuf,

    /// Output SVG file
    #[arg(short = 'o', long, value_name = "FILE", default_value = "contact.svg")]
    output: PathBuf,

    /// Figure width in pixels
    #[arg(long, value_name = "PX", default_value_t = 1000)]
    width: u32,

    /// Figure height in pixels
    #[arg(long, value_name = "PX", default_value_t = 800)]
    height: u32,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = PlotCli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &PlotCli) -> anyhow::Result<()> {
    let report = ContactReport::read_from_path(&cli.input)
        .with_context(|| format!("Failed to read contact matrix '{}'", cli.input.display()))?;
    info!(
        columns = report.column_labels().len(),
        rows = report.row_labels().len(),
        "Contact matrix loaded."
    );

    figure::render_heatmap(&report, &cli.output, (cli.width, cli.height))
        .with_context(|| format!("Failed to draw heatmap '{}'", cli.output.display()))?;

    println!("Heatmap written to: {}", cli.output.display());
    Ok(())
}
