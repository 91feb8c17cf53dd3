use clap::{Parser, Subcommand};
use optimize_images::{config, output, process, scan};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "optimize-images")]
#[command(about = "Batch-convert photographs into web-ready sizes and formats")]
#[command(long_about = "\
Batch-convert photographs into web-ready sizes and formats

Every JPEG, PNG, GIF, BMP or TIFF under the input directory is written to
the output directory, at the same relative location, as:

  optimized/
  ├── photo-thumbnail.webp         # 300x200, cover fit
  ├── photo-thumbnail.avif
  ├── photo-small.webp             # 600x400
  ├── photo-small.avif
  ├── photo-medium.webp            # 1200x800
  ├── photo-medium.avif
  ├── photo-large.webp             # 1920x1080
  ├── photo-large.avif
  └── photo.webp                   # native resolution

Sizes, formats, quality and concurrency come from optimize-images.toml when
it exists. Run 'optimize-images gen-config' to print a documented one.")]
#[command(version)]
struct Cli {
    /// Config file (missing file means stock defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Input directory (overrides the config file)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Output directory (overrides the config file)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover and transcode every image
    Run,
    /// List the images a run would process, in processing order
    Discover,
    /// Print a stock optimize-images.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run => {
            let config = resolve_config(&cli)?;
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    let lines = output::format_process_event(&event);
                    if event.is_error() {
                        lines.iter().for_each(|line| eprintln!("{}", line));
                    } else {
                        lines.iter().for_each(|line| println!("{}", line));
                    }
                }
            });
            let result = process::process(&config, Some(tx));
            // The sender is dropped by now, so the printer drains and exits.
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let summary = result?;
            for line in output::format_summary(&summary) {
                println!("{}", line);
            }
        }
        Command::Discover => {
            let config = resolve_config(&cli)?;
            let images = if config.input_dir.is_dir() {
                scan::discover_excluding(&config.input_dir, Some(config.output_dir.as_path()))?
            } else {
                Vec::new()
            };
            for line in output::format_discover_output(&images) {
                println!("{}", line);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file and apply command-line directory overrides.
fn resolve_config(cli: &Cli) -> Result<config::PipelineConfig, config::ConfigError> {
    let mut config = config::load_config(&cli.config)?;
    if let Some(input) = &cli.input {
        config.input_dir = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    Ok(config)
}
