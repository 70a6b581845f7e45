//! PDF Stamper CLI - Command line tool for merging and labelling PDF documents.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pdf_stamper_core::{
    AppConfig, DirectorySink, FileSink, PdfSink, PdfSource, PdfStamper, TextColor, derive_label,
    inspect_pdf,
};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, ValueEnum)]
enum ColorOption {
    Black,
    DarkRed,
    Blue,
}

impl From<ColorOption> for TextColor {
    fn from(opt: ColorOption) -> Self {
        match opt {
            ColorOption::Black => Self::black(),
            ColorOption::DarkRed => Self::dark_red(),
            ColorOption::Blue => Self::blue(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pdf-stamp")]
#[command(author, version, about = "Merge two PDFs and label the second one's pages", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append SECOND to FIRST and stamp SECOND's pages with a label from FIRST's name
    Merge {
        /// Document whose pages come first and whose name gives the label
        first: PathBuf,

        /// Document whose pages are appended and stamped
        second: PathBuf,

        /// Output PDF file (default: <output_name> in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use this name instead of FIRST's file name when deriving the label
        #[arg(long)]
        name: Option<String>,

        /// Stamp font (one of the standard Type1 fonts)
        #[arg(long)]
        font: Option<String>,

        /// Stamp color
        #[arg(long, value_enum)]
        color: Option<ColorOption>,

        /// Write streams uncompressed
        #[arg(long)]
        no_compress: bool,
    },

    /// Print the label a document name would produce
    Label {
        /// Document name, e.g. "flight-10-20.pdf"
        name: String,
    },

    /// Print page sizes and shown text of a PDF
    Inspect {
        /// PDF file to inspect
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match args.command {
        Command::Merge {
            first,
            second,
            output,
            name,
            font,
            color,
            no_compress,
        } => {
            let mut config = load_config(args.config.as_deref())?;
            if let Some(font) = font {
                config.stamp.font = font;
            }
            if let Some(color) = color {
                config.stamp.color = color.into();
            }
            if no_compress {
                config.compress = false;
            }

            run_merge(config, &first, &second, output, name).await
        }
        Command::Label { name } => {
            #[allow(clippy::print_stdout)]
            {
                println!("{}", derive_label(&name));
            }
            Ok(())
        }
        Command::Inspect { file } => run_inspect(&file).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path).context("Failed to load config file"),
        None => Ok(AppConfig::load()),
    }
}

async fn run_merge(
    config: AppConfig,
    first: &Path,
    second: &Path,
    output: Option<PathBuf>,
    name: Option<String>,
) -> Result<()> {
    let stamper = PdfStamper::new(config).context("Invalid configuration")?;

    info!("Loading PDFs: {} + {}", first.display(), second.display());
    let mut a = PdfSource::read(first)
        .await
        .context(format!("Failed to read PDF: {}", first.display()))?;
    let b = PdfSource::read(second)
        .await
        .context(format!("Failed to read PDF: {}", second.display()))?;

    if let Some(name) = name {
        a.name = name;
    }

    let (sink, target): (Box<dyn PdfSink>, PathBuf) = if let Some(path) = output {
        (Box::new(FileSink::new(&path)), path)
    } else {
        let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
        let sink = DirectorySink::new(cwd);
        let target = sink.target(&stamper.config().output_name)?;
        (Box::new(sink), target)
    };

    let merged = stamper
        .merge_and_save(a, b, sink.as_ref())
        .await
        .context("Failed to merge PDFs")?;

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!(
            "Merged {} pages ({} labelled \"{}\") into: {}",
            merged.page_count,
            merged.stamped_pages,
            merged.label,
            target.display()
        );
    }

    Ok(())
}

async fn run_inspect(file: &Path) -> Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .context(format!("Failed to read PDF: {}", file.display()))?;
    let pages = inspect_pdf(&bytes).context(format!("Failed to parse PDF: {}", file.display()))?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}: {} pages", file.display(), pages.len());
        for page in pages {
            println!(
                "  page {} ({} x {}): {}",
                page.number,
                page.width,
                page.height,
                page.text_runs.join(" | ")
            );
        }
    }

    Ok(())
}
