use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use gmd_transfer::classifier::FileKindClassifier;
use gmd_transfer::codec::{ArchiveCodec, JsonArchiveCodec};
use gmd_transfer::config::Config;
use gmd_transfer::export::ExportOrchestrator;
use gmd_transfer::import::{ImportBatchResult, ImportOrchestrator, ImportStatus};
use gmd_transfer::library::{JsonFileLibrary, LocalLibrary};
use gmd_transfer::picker::RfdFilePicker;
use gmd_transfer::platform::{DesktopPlatform, PlatformActions, PlatformCapabilities};
use gmd_transfer::surface::{ExportEvent, ExportSurface, ImportEvent, ImportSurface};
use gmd_transfer::{Entity, EntityKind};

#[tokio::main]
async fn main() {
    // Use RUST_LOG env var if set, otherwise default to info level
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let config = Config::load();
    let codec: Arc<dyn ArchiveCodec> = Arc::new(JsonArchiveCodec::new());

    let result = match args[1].as_str() {
        "classify" => classify(&codec, &args[2..]),
        "list" => open_library(&config).and_then(|library| list(library.as_ref())),
        "import" => match open_library(&config) {
            Ok(library) => import(&config, codec, library, &args[2..]).await,
            Err(e) => Err(e),
        },
        "export" => match open_library(&config) {
            Ok(library) => export(&config, codec, library.as_ref(), &args[2..]).await,
            Err(e) => Err(e),
        },
        other => {
            error!("Unknown command: {}", other);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn open_library(config: &Config) -> Result<Arc<dyn LocalLibrary>, String> {
    let path = config.get_library_path();
    JsonFileLibrary::open(&path)
        .map(|library| Arc::new(library) as Arc<dyn LocalLibrary>)
        .map_err(|e| format!("Failed to open library at {}: {}", path.display(), e))
}

fn classify(codec: &Arc<dyn ArchiveCodec>, paths: &[String]) -> Result<(), String> {
    if paths.is_empty() {
        return Err("classify requires at least one file".to_string());
    }

    let classifier = FileKindClassifier::new(codec.clone());
    for path in paths {
        println!("{}: {}", path, classifier.classify(&PathBuf::from(path)));
    }
    Ok(())
}

fn list(library: &dyn LocalLibrary) -> Result<(), String> {
    let levels = library.levels().map_err(|e| e.to_string())?;
    let lists = library.lists().map_err(|e| e.to_string())?;

    println!("Levels ({}):", levels.len());
    for level in &levels {
        println!("  {}", level.name);
    }
    println!("Lists ({}):", lists.len());
    for list in &lists {
        println!("  {} ({} levels)", list.name, list.level_ids.len());
    }
    Ok(())
}

async fn import(
    config: &Config,
    codec: Arc<dyn ArchiveCodec>,
    library: Arc<dyn LocalLibrary>,
    paths: &[String],
) -> Result<(), String> {
    if !paths.is_empty() {
        let paths: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
        let result = ImportOrchestrator::new(codec, library).import_batch(&paths);
        return report_batch(&result);
    }

    let (surface, mut events) =
        ImportSurface::new(Arc::new(RfdFilePicker::new()), codec, library, config);
    surface.start_import();

    match events.recv().await {
        Some(ImportEvent::Finished(result)) => report_batch(&result),
        Some(ImportEvent::Failed(err)) => Err(err.to_string()),
        Some(ImportEvent::Cancelled) => {
            info!("Import cancelled");
            Ok(())
        }
        None => Err("Import ended without a result".to_string()),
    }
}

fn report_batch(result: &ImportBatchResult) -> Result<(), String> {
    for entry in &result.entries {
        match &entry.status {
            ImportStatus::InsertedLevel { name } => {
                println!("Imported level '{}' from {}", name, entry.path.display())
            }
            ImportStatus::InsertedList { name } => {
                println!("Imported list '{}' from {}", name, entry.path.display())
            }
            ImportStatus::Rejected(_) => {}
        }
    }

    match result.failure() {
        Some((_, err)) => Err(format!("Error importing: {}", err)),
        None => Ok(()),
    }
}

async fn export(
    config: &Config,
    codec: Arc<dyn ArchiveCodec>,
    library: &dyn LocalLibrary,
    args: &[String],
) -> Result<(), String> {
    let mut target: Option<(EntityKind, String)> = None;
    let mut out: Option<PathBuf> = None;
    let mut open_folder = false;

    let mut i = 0;
    while i < args.len() {
        if args[i] == "--open-folder" {
            open_folder = true;
            i += 1;
            continue;
        }
        let value = args
            .get(i + 1)
            .ok_or_else(|| format!("{} requires a value", args[i]))?;
        match args[i].as_str() {
            "--level" => target = Some((EntityKind::Level, value.clone())),
            "--list" => target = Some((EntityKind::List, value.clone())),
            "--out" => out = Some(PathBuf::from(value)),
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 2;
    }

    let (kind, name) = target.ok_or("export requires --level <name> or --list <name>")?;
    let entity = find_entity(library, kind, &name)?;
    let platform: Arc<dyn PlatformActions> = Arc::new(DesktopPlatform);

    if let Some(destination) = out {
        let capabilities = if config.post_export_action {
            platform.capabilities()
        } else {
            PlatformCapabilities::default()
        };
        let receipt = ExportOrchestrator::new(codec, capabilities)
            .export_entity(&entity, &destination)
            .map_err(|e| format!("Error exporting: {}", e))?;
        println!("Saved to: {}", receipt.path.display());
        if let Some(action) = &receipt.action {
            if open_folder || action.runs_automatically() {
                platform.perform(action)?;
            }
        }
        return Ok(());
    }

    let (surface, mut events) =
        ExportSurface::new(Arc::new(RfdFilePicker::new()), codec, platform, config);
    surface.start_export(entity);

    match events.recv().await {
        Some(ExportEvent::Exported(receipt)) => {
            println!("Saved to: {}", receipt.path.display());
            if open_folder {
                surface.perform_follow_up(&receipt);
            }
            Ok(())
        }
        Some(ExportEvent::Failed(err)) => Err(format!("Error exporting: {}", err)),
        Some(ExportEvent::Cancelled) => {
            info!("Export cancelled");
            Ok(())
        }
        None => Err("Export ended without a result".to_string()),
    }
}

fn find_entity(library: &dyn LocalLibrary, kind: EntityKind, name: &str) -> Result<Entity, String> {
    let found = match kind {
        EntityKind::Level => library
            .levels()
            .map_err(|e| e.to_string())?
            .into_iter()
            .find(|level| level.name == name)
            .map(Entity::Level),
        EntityKind::List => library
            .lists()
            .map_err(|e| e.to_string())?
            .into_iter()
            .find(|list| list.name == name)
            .map(Entity::List),
    };

    found.ok_or_else(|| format!("No {} named '{}' in the library", kind, name))
}

fn print_usage(program_name: &str) {
    eprintln!("Usage:");
    eprintln!("  {} classify <file>...", program_name);
    eprintln!("  {} import [<file>...]", program_name);
    eprintln!(
        "  {} export (--level <name> | --list <name>) [--out <file>] [--open-folder]",
        program_name
    );
    eprintln!("  {} list", program_name);
    eprintln!();
    eprintln!("Without files, import and export open the native file dialog.");
    eprintln!("The library lives in $GMD_TRANSFER_LIBRARY_PATH (default ~/.gmd-transfer).");
}
