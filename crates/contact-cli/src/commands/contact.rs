use crate::cli::Cli;
use crate::config::{self, RunSettings};
use crate::error::{CliError, Result};
use crate::utils::output::OutputFile;
use crate::utils::progress::CliProgressHandler;
use contact_matrix::core::io::report::Provenance;
use contact_matrix::engine::progress::ProgressReporter;
use contact_matrix::workflows;
use std::io::{self, Write};
use tracing::info;

const PROGRAM_NAME: &str = "contact";

pub fn run(args: &Cli, command_line: Vec<String>) -> Result<()> {
    let settings = config::resolve(args)?;
    write_parameters(&settings, &mut io::stdout().lock())?;

    // Created up front so an unwritable destination fails before any work.
    let mut output = OutputFile::create(&settings.output)?;

    let progress_handler = if args.quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the contact workflow...");
    let analysis = workflows::contact::run(&settings.contact, &reporter)?;
    info!(
        frames = analysis.frames(),
        "Workflow finished. Writing contact matrix to {:?}",
        output.destination()
    );

    let provenance = Provenance::new(
        PROGRAM_NAME,
        &format!("v{}", env!("CARGO_PKG_VERSION")),
        command_line,
    );
    analysis
        .to_report()
        .write_to(&provenance, output.writer())
        .map_err(|source| CliError::Output {
            path: settings.output.clone(),
            source,
        })?;
    output.commit()?;

    println!(
        "Contact matrix over {} frame(s) written to: {}",
        analysis.frames(),
        settings.output.display()
    );
    Ok(())
}

fn write_parameters(settings: &RunSettings, out: &mut impl Write) -> io::Result<()> {
    let contact = &settings.contact;
    writeln!(out, "Parameters for Contact Matrix calculation:")?;
    writeln!(out, ">>> structure file:   {}", contact.structure_path.display())?;
    match &contact.trajectory_path {
        Some(path) => writeln!(out, ">>> trajectory file:  {}", path.display())?,
        None => writeln!(out, ">>> trajectory file:  ----")?,
    }
    writeln!(out, ">>> index file:       {}", contact.index_path.display())?;
    writeln!(out, ">>> output file:      {}", settings.output.display())?;
    writeln!(out, ">>> selection a:      {}", contact.selection_a)?;
    writeln!(out, ">>> selection b:      {}", contact.selection_b)?;
    writeln!(out, ">>> cut-off:          {:.6} nm", contact.cutoff)?;
    writeln!(out)
}
