use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use prosail::batch::BatchRunner;
use prosail::config::RunConfig;
use prosail::kernel::FortranKernel;
use prosail::run;

/// Run the PROSAIL canopy reflectance model from JSON run configurations
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Run configuration file (single run)
    #[arg(required_unless_present = "batch")]
    config: Option<PathBuf>,

    /// Where to write the spectrum of a single run (JSON)
    #[arg(short, long, conflicts_with = "batch")]
    output: Option<PathBuf>,

    /// Run every *.json config under INPUT_DIR, writing spectra to OUTPUT_DIR
    #[arg(long, num_args = 2, value_names = ["INPUT_DIR", "OUTPUT_DIR"], conflicts_with = "config")]
    batch: Option<Vec<PathBuf>>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let kernel = FortranKernel;

    if let Some(dirs) = args.batch {
        let runner = BatchRunner::new(&dirs[0], &dirs[1]);
        let written = runner.process(&kernel)?;
        info!(count = written.len(), "batch finished");
        return Ok(());
    }

    let path = args.config.ok_or("no run configuration given")?;
    let config = RunConfig::from_file(&path)?;
    info!(config = %path.display(), lidf = %config.parameters().lidf, "running PROSAIL");

    let spectrum = run(config.parameters(), &kernel)?;
    println!("{}", spectrum);

    if let Some(output) = args.output {
        spectrum.to_json_file(&output, config.wavelength_unit())?;
        info!(output = %output.display(), "saved spectrum");
    }

    Ok(())
}
