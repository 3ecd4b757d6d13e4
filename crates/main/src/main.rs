use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use config_sheet::content::build_content_stream;
use config_sheet::export::{self, formatted_timestamp};
use config_sheet::{BackendKind, ConfigurationRecord, ExportSettings};

/// Renders product configuration summaries as single-page PDF documents.
///
/// Output directories default to `Saved/Configurations` and `Saved/PDFs` and can be changed with
/// the `CONFIG_SHEET_CONFIG_DIR` and `CONFIG_SHEET_PDF_DIR` environment variables or the flags
/// below. `RUST_LOG` controls log output.
#[derive(Parser)]
#[command(author, version, about = "Product configuration summaries as PDF")]
struct Cli {
    /// Log encoder details (object offsets, stream length).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory receiving exported JSON records.
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Directory receiving rendered documents.
    #[arg(long, global = true)]
    pdf_dir: Option<PathBuf>,

    /// Renderer used for documents.
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    /// Built-in encoder using the standard Helvetica fonts.
    Native,
    /// genpdf layout with embedded TrueType fonts.
    Genpdf,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Native => BackendKind::Native,
            BackendArg::Genpdf => BackendKind::Genpdf,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render a PDF from an exported JSON record.
    Render {
        /// JSON record to render.
        json: PathBuf,

        /// Output path. Defaults to `<pdf-dir>/<json stem>.pdf`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Record a configuration as JSON and render it.
    Export {
        /// Configuration name. Empty names use `ProductConfiguration`.
        #[arg(long, default_value = "")]
        name: String,

        /// Selected variant, e.g. "Paint > Red". Repeat for more.
        #[arg(long = "variant")]
        variants: Vec<String>,

        /// Selected environment.
        #[arg(long, default_value = "Default")]
        environment: String,

        /// Selected camera.
        #[arg(long, default_value = "Default")]
        camera: String,

        /// Only write the JSON record.
        #[arg(long)]
        no_pdf: bool,
    },

    /// Print the content stream generated for a JSON record.
    Preview {
        /// JSON record to lay out.
        json: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn settings_from(cli: &Cli) -> ExportSettings {
    let mut settings = ExportSettings::from_env();
    if let Some(dir) = &cli.config_dir {
        settings = settings.with_config_dir(dir);
    }
    if let Some(dir) = &cli.pdf_dir {
        settings = settings.with_pdf_dir(dir);
    }
    if let Some(backend) = cli.backend {
        settings = settings.with_backend(backend.into());
    }
    settings
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let settings = settings_from(&cli);

    match cli.command {
        Commands::Render { json, output } => {
            let output = output.unwrap_or_else(|| export::default_pdf_path(&json, &settings));
            export::generate_pdf_from_json(&json, &output, settings.backend())?;
            println!("Generated {}", output.display());
        }
        Commands::Export {
            name,
            variants,
            environment,
            camera,
            no_pdf,
        } => {
            let now = chrono::Local::now().naive_local();
            let record = ConfigurationRecord::new(name)
                .with_timestamp(formatted_timestamp(now))
                .with_variants(variants)
                .with_environment(environment)
                .with_camera(camera);

            if no_pdf {
                let record = record.with_name_fallback(settings.default_name());
                let json = export::export_configuration(&record, &settings, now)?;
                println!("Exported {}", json.display());
            } else {
                let files = export::export_to_pdf(record, &settings, now)?;
                println!("Exported {}", files.json.display());
                println!("Generated {}", files.pdf.display());
            }
        }
        Commands::Preview { json } => {
            let record = export::read_record(&json)?;
            println!("{}", build_content_stream(&record));
        }
    }

    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
