use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use seiso_import::config::Config;
use seiso_import::connector::SeisoConnector;
use seiso_import::importer::MasterImporter;
use seiso_import::link::LinkFactory;
use seiso_import::loader::Format;
use seiso_import::logging;
use seiso_import::mapper::MasterItemMapper;
use seiso_import::uri::UriFactory;

#[derive(Parser)]
#[command(name = "seiso-import")]
#[command(about = "Imports Seiso data master files into Seiso")]
#[command(version = "0.1.0")]
struct Cli {
    /// Master files to import, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Master file format: json or yaml
    #[arg(long, default_value = "json")]
    format: String,

    /// Path to the config file with Seiso connection settings
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let format: Format = cli.format.parse()?;
    let config = Config::load(&cli.config)?;

    let store = Arc::new(SeisoConnector::new(&config.seiso)?);
    let uris = UriFactory::new(config.seiso.base_uri.clone());
    let mapper = MasterItemMapper::new(LinkFactory::new(uris));
    let importer = MasterImporter::new(store, mapper);

    info!(files = cli.files.len(), "Starting import");
    if let Err(e) = importer.import_files(&cli.files, format).await {
        // The batch stops at the first failing file.
        error!("Import failed: {e}");
        return Err(e.into());
    }

    println!("Imported {} file(s)", cli.files.len());
    Ok(())
}
