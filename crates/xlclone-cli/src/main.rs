//! xlclone CLI - clone live Excel workbooks into standalone .xlsx files

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use xlclone_core::{DocumentHost, DocumentInfo};
use xlclone_engine::{
    clone_folder, output_name, CloneOptions, ClonePipeline, StrategyPreference,
};
use xlclone_host::{ExcelBridgeConfig, ExcelHost};

#[derive(Parser)]
#[command(name = "xlclone")]
#[command(
    author,
    version,
    about = "Clone workbooks open in Excel without using Excel's own save"
)]
struct Cli {
    /// Path to the Windows bridge executable (default: found next to this
    /// binary)
    #[arg(long, global = true, value_name = "PATH")]
    bridge_exe: Option<PathBuf>,

    /// WINE executable used to run the bridge
    #[arg(long, global = true, value_name = "PATH", default_value = "wine")]
    wine: PathBuf,

    /// WINEPREFIX for the bridge process
    #[arg(long, global = true, value_name = "DIR")]
    wine_prefix: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the workbooks currently open in Excel
    List,

    /// Clone an open workbook (or several) to standalone .xlsx files
    Clone {
        /// Workbook to clone, by display name (default: ask when several
        /// are open)
        #[arg(conflicts_with = "all")]
        name: Option<String>,

        /// Clone every open workbook
        #[arg(long)]
        all: bool,

        /// Output directory (default: system temp dir)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Unpacked template package for the injection strategy
        /// (default: <temp>/xlsx_template if it exists)
        #[arg(long, value_name = "DIR")]
        template: Option<PathBuf>,

        /// Try full reconstruction before template injection
        #[arg(long)]
        prefer_rebuild: bool,

        /// Skip the native-copy strategy entirely
        #[arg(long)]
        no_native_copy: bool,

        /// Launch a hidden Excel instance when none is running
        /// (default: attach only)
        #[arg(long)]
        launch: bool,
    },

    /// Clone every .xlsx file in a folder through Excel
    CloneFolder {
        /// Folder holding the source .xlsx files
        folder: PathBuf,

        /// Output directory (default: FOLDER/new)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Unpacked template package for the injection strategy
        /// (default: <temp>/xlsx_template if it exists)
        #[arg(long, value_name = "DIR")]
        template: Option<PathBuf>,

        /// Try full reconstruction before template injection
        #[arg(long)]
        prefer_rebuild: bool,

        /// Skip the native-copy strategy entirely
        #[arg(long)]
        no_native_copy: bool,

        /// Never launch Excel; attach to a running instance or fail
        #[arg(long)]
        no_launch: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Single-document cloning targets a workbook someone already has open,
    // so attach-only is the default there; batch mode has its own files and
    // may bring Excel up itself.
    let allow_launch = match &cli.command {
        Commands::List => false,
        Commands::Clone { launch, .. } => *launch,
        Commands::CloneFolder { no_launch, .. } => !*no_launch,
    };

    let config = ExcelBridgeConfig {
        bridge_exe_path: cli.bridge_exe,
        wine_path: cli.wine,
        wine_prefix: cli.wine_prefix,
        allow_launch,
    };
    let host = ExcelHost::connect(config)
        .context("Could not connect to Excel. Is it running?")?;

    let result = match cli.command {
        Commands::List => list_documents(&host),
        Commands::Clone {
            name,
            all,
            output,
            template,
            prefer_rebuild,
            no_native_copy,
            ..
        } => clone_open(
            &host,
            name.as_deref(),
            all,
            output.as_deref(),
            clone_options(template, prefer_rebuild, no_native_copy),
        ),
        Commands::CloneFolder {
            folder,
            output,
            template,
            prefer_rebuild,
            no_native_copy,
            ..
        } => run_folder(
            &host,
            &folder,
            output.as_deref(),
            clone_options(template, prefer_rebuild, no_native_copy),
        ),
    };

    if let Err(e) = host.shutdown() {
        eprintln!("Warning: bridge shutdown failed: {e}");
    }
    result
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Logs go to stderr; stdout carries only results.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn clone_options(
    template: Option<PathBuf>,
    prefer_rebuild: bool,
    no_native_copy: bool,
) -> CloneOptions {
    CloneOptions {
        template_dir: template.or_else(default_template),
        use_native_copy: !no_native_copy,
        preference: if prefer_rebuild {
            StrategyPreference::RebuildFirst
        } else {
            StrategyPreference::InjectionFirst
        },
        ..Default::default()
    }
}

/// `<temp>/xlsx_template`, when such a folder exists.
fn default_template() -> Option<PathBuf> {
    let dir = env::temp_dir().join("xlsx_template");
    dir.is_dir().then_some(dir)
}

fn list_documents(host: &ExcelHost) -> Result<()> {
    let docs = host
        .list_documents()
        .context("Failed to list open workbooks")?;

    if docs.is_empty() {
        eprintln!("No workbooks are open.");
        return Ok(());
    }
    for doc in docs {
        let marker = if doc.active { "\t(active)" } else { "" };
        println!("{}{}", doc.name, marker);
    }
    Ok(())
}

fn clone_open(
    host: &ExcelHost,
    name: Option<&str>,
    all: bool,
    output_dir: Option<&Path>,
    options: CloneOptions,
) -> Result<()> {
    let docs = host
        .list_documents()
        .context("Failed to list open workbooks")?;
    if docs.is_empty() {
        bail!("no workbooks are open in Excel");
    }

    let targets = if all {
        docs
    } else if let Some(name) = name {
        let doc = docs
            .iter()
            .find(|doc| doc.name == name)
            .with_context(|| format!("no open workbook named '{name}'"))?;
        vec![doc.clone()]
    } else if docs.len() == 1 {
        vec![docs[0].clone()]
    } else {
        pick_documents(&docs)?
    };

    let output_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => env::temp_dir(),
    };
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create '{}'", output_dir.display()))?;

    let pipeline = ClonePipeline::new(host, options);
    let mut failed = 0usize;

    for doc in &targets {
        let output = output_dir.join(output_name(Path::new(&doc.name)));
        eprintln!("Cloning '{}'...", doc.name);

        match pipeline.clone_document(doc.id, &doc.name, &output) {
            Ok(report) => {
                eprintln!("  {} via {}", report.output.display(), report.strategy);
                println!("{}", report.output.display());
            }
            Err(e) if e.is_fatal_for_session() => {
                return Err(e).context("the Excel session was lost");
            }
            Err(e) => {
                eprintln!("  FAILED: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} workbook(s) failed", targets.len());
    }
    Ok(())
}

/// Numbered chooser shown when several workbooks are open and no name was
/// given: empty input takes the first, `0` takes all of them.
fn pick_documents(docs: &[DocumentInfo]) -> Result<Vec<DocumentInfo>> {
    eprintln!("Open workbooks:");
    for (i, doc) in docs.iter().enumerate() {
        let marker = if doc.active { "  (active)" } else { "" };
        eprintln!("  {}. {}{}", i + 1, doc.name, marker);
    }
    eprintln!("  0. All of them");
    eprint!("Which one? [1]: ");
    io::stderr().flush().ok();

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read the selection")?;
    let choice = line.trim();

    if choice.is_empty() {
        return Ok(vec![docs[0].clone()]);
    }
    if choice == "0" {
        return Ok(docs.to_vec());
    }
    let index: usize = choice
        .parse()
        .with_context(|| format!("invalid selection '{choice}'"))?;
    if index == 0 || index > docs.len() {
        bail!("selection {index} is out of range");
    }
    Ok(vec![docs[index - 1].clone()])
}

fn run_folder(
    host: &ExcelHost,
    folder: &Path,
    output_dir: Option<&Path>,
    options: CloneOptions,
) -> Result<()> {
    let summary = clone_folder(host, folder, output_dir, options)
        .with_context(|| format!("Batch clone of '{}' failed", folder.display()))?;

    println!("Processed: {}", summary.processed);
    println!("Succeeded: {}", summary.succeeded);
    println!("Failed:    {}", summary.failed);
    println!("Output:    {}", summary.output_dir.display());

    if summary.failed > 0 {
        bail!(
            "{} of {} workbook(s) failed",
            summary.failed,
            summary.processed
        );
    }
    Ok(())
}
