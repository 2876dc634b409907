use clap::{Parser, Subcommand};
use placard::{BatchExporterBuilder, ExportConfig, ExportError, FieldValues, InMemoryExportStore, Layout};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Render placard layouts to PDF and export batches as zip archives.
#[derive(Parser, Debug)]
#[command(name = "placard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one layout to a PDF file.
    Render {
        /// Layout JSON (page type plus ordered elements).
        layout: PathBuf,
        /// Output PDF path.
        output: PathBuf,
        /// JSON object of field values, e.g. {"business_name": "Cafe"}.
        #[arg(long)]
        fields: Option<PathBuf>,
    },
    /// Export every item of a batch into a zip archive.
    Batch {
        /// Store snapshot JSON with batches, items and style presets.
        store: PathBuf,
        batch_id: String,
        /// Directory the archive is written to.
        out_dir: PathBuf,
        /// Maximum number of items rendering at once.
        #[arg(long)]
        concurrency: Option<usize>,
        /// Write the updated store (generated flags) back to the snapshot.
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<(), ExportError> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Render { layout, output, fields } => {
            let layout = Layout::from_json(&fs::read_to_string(&layout)?)?;
            let fields: FieldValues = match fields {
                Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
                None => FieldValues::new(),
            };
            let bytes = placard::export_single(&layout, &fields)?;
            fs::write(&output, &bytes)?;
            println!("Wrote {} ({} bytes)", output.display(), bytes.len());
        }
        Command::Batch {
            store,
            batch_id,
            out_dir,
            concurrency,
            save,
        } => {
            let records = Arc::new(InMemoryExportStore::load(&store)?);
            let mut config = ExportConfig::from_env()?;
            config.output_dir = out_dir;
            if let Some(n) = concurrency {
                config.concurrency = n;
            }
            let exporter = BatchExporterBuilder::new()
                .with_store(records.clone())
                .with_config(config)
                .build()?;

            let report = exporter.export_blocking(&batch_id.into())?;
            if save {
                records.save(&store)?;
            }
            for failure in &report.failures {
                eprintln!("skipped {}: {}", failure.export_id, failure.reason);
            }
            for item in &report.unmarked {
                eprintln!("not marked generated {}: {}", item.export_id, item.reason);
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
