#![deny(missing_docs)]

//! # Routes Command
//!
//! Prints the computed route table without generating anything.

use std::path::PathBuf;

use routegen_core::{build_routes, load_spec_document, AppResult, DispatchPolicy, RouteSpec};

use crate::config::GeneratorConfig;

/// Arguments for the routes command.
#[derive(clap::Args, Debug, Clone)]
pub struct RoutesArgs {
    /// Path to the OpenAPI JSON document.
    #[clap(long)]
    pub spec: PathBuf,

    /// Operation ids whose handler is registered by hand.
    #[clap(long = "non-dispatchable")]
    pub non_dispatchable: Vec<String>,

    /// YAML configuration file.
    #[clap(long, env = "ROUTEGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Executes the listing.
pub fn execute(args: &RoutesArgs) -> AppResult<()> {
    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    let policy = DispatchPolicy::new(
        config
            .non_dispatchable
            .into_iter()
            .chain(args.non_dispatchable.iter().cloned()),
    );

    let document = load_spec_document(&args.spec)?;
    let routes = build_routes(&document.operations, &policy)?;
    print!("{}", format_route_table(&routes));
    Ok(())
}

/// Renders routes as an aligned plain-text table.
pub fn format_route_table(routes: &[RouteSpec]) -> String {
    const HEADERS: [&str; 5] = ["METHOD", "PATTERN", "DISPATCH KEY", "OPERATION", "DISPATCH"];

    let rows: Vec<[String; 5]> = routes
        .iter()
        .map(|r| {
            [
                r.method.to_string(),
                r.pattern.clone(),
                r.dispatch_key.clone(),
                r.operation_id.clone(),
                if r.dispatchable { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let header = HEADERS.map(String::from);
    for row in std::iter::once(&header).chain(rows.iter()) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}
