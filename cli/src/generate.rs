#![deny(missing_docs)]

//! # Generate Command
//!
//! Loads the OpenAPI document, scans the handler sources, and writes the
//! route bindings, dispatch map and (optionally) the HTML reference.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use routegen_core::{
    compile, extract_annotations, load_spec_document, stale_artifacts, write_artifacts, AppError,
    AppResult, Artifact, CompileOptions, DispatchPolicy, RouterKind,
};
use walkdir::WalkDir;

use crate::config::GeneratorConfig;

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the OpenAPI JSON document.
    #[clap(long)]
    pub spec: PathBuf,

    /// Handler source files or directories to scan for documentation blocks.
    #[clap(long, required = true, num_args = 1..)]
    pub sources: Vec<PathBuf>,

    /// Output path for the route bindings.
    #[clap(long)]
    pub routes_out: PathBuf,

    /// Output path for the dispatch map.
    #[clap(long)]
    pub dispatch_out: PathBuf,

    /// Output path for the HTML reference. Skipped when absent.
    #[clap(long)]
    pub docs_out: Option<PathBuf>,

    /// Router to generate for (`crow` or `actix`).
    #[clap(long, env = "ROUTEGEN_ROUTER")]
    pub router: Option<RouterKind>,

    /// Operation ids whose handler is registered by hand.
    #[clap(long = "non-dispatchable")]
    pub non_dispatchable: Vec<String>,

    /// Title of the HTML reference.
    #[clap(long)]
    pub title: Option<String>,

    /// YAML configuration file.
    #[clap(long, env = "ROUTEGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write nothing; fail if any output on disk is out of date.
    #[clap(long)]
    pub check: bool,
}

/// Executes the generation.
pub fn execute(args: &GenerateArgs) -> AppResult<()> {
    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };

    let router = args.router.or(config.router).unwrap_or_default();
    let policy = DispatchPolicy::new(
        config
            .non_dispatchable
            .iter()
            .chain(args.non_dispatchable.iter())
            .cloned(),
    );

    // 1. Inputs
    let document = load_spec_document(&args.spec)?;
    let files = collect_sources(&args.sources, &config.annotations.extensions)?;
    let blocks = extract_annotations(&files, &config.annotations.syntax())?;

    // 2. Compile
    let strategy = router.strategy(&config.crow, &config.actix);
    let options = CompileOptions {
        policy,
        title: args.title.clone().or(config.title),
    };
    let generated = compile(&document, &blocks, &options, strategy.as_ref())?;

    // 3. Write or check
    let mut artifacts = vec![
        Artifact::new(&args.routes_out, generated.route_bindings),
        Artifact::new(&args.dispatch_out, generated.dispatch_map),
    ];
    if let Some(docs_out) = &args.docs_out {
        artifacts.push(Artifact::new(docs_out, generated.documentation));
    }

    if args.check {
        let stale = stale_artifacts(&artifacts)?;
        if !stale.is_empty() {
            let list: Vec<String> = stale.iter().map(|p| p.display().to_string()).collect();
            return Err(AppError::General(format!(
                "Generated files are out of date: {}",
                list.join(", ")
            )));
        }
        println!("{} artifact(s) up to date", artifacts.len());
        return Ok(());
    }

    write_artifacts(&artifacts)?;
    println!(
        "Generated {} routes ({} router) from {:?}",
        generated.routes.len(),
        router,
        args.spec
    );
    Ok(())
}

/// Expands `sources` into a file list.
///
/// Files are taken as given. Directories are walked in file-name order and
/// contribute files whose extension is in `extensions`. Duplicates are dropped.
pub fn collect_sources(sources: &[PathBuf], extensions: &[String]) -> AppResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for source in sources {
        if source.is_file() {
            if seen.insert(source.clone()) {
                files.push(source.clone());
            }
            continue;
        }
        if !source.is_dir() {
            return Err(AppError::General(format!(
                "Source path not found: {:?}",
                source
            )));
        }

        for entry in WalkDir::new(source).sort_by_file_name() {
            let entry = entry
                .map_err(|e| AppError::General(format!("Failed to walk {:?}: {}", source, e)))?;
            let path = entry.path();
            if entry.file_type().is_file()
                && has_extension(path, extensions)
                && seen.insert(path.to_path_buf())
            {
                files.push(path.to_path_buf());
            }
        }
    }

    tracing::debug!(files = files.len(), "collected source files");
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}
