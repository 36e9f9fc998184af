//! CLI logic for the Caffeine diagram generator.
//!
//! [`run`] renders every diagram of the catalogue, in order, into the output
//! directory and reports each written file on stdout. The first failure stops
//! the run.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, io::Write};

use log::{debug, info};

use caffeine_diagrams::{
    CaffeineError, DiagramRenderer,
    catalog::{self, CatalogEntry},
    config::{AppConfig, OutputFormat},
};

/// File name of the optional viewer manifest
pub const MANIFEST_FILE: &str = "diagrams.json";

/// Run the Caffeine diagram generator, reporting to stdout.
///
/// # Errors
///
/// Returns `CaffeineError` for:
/// - Configuration loading errors
/// - Output directory creation errors
/// - Layout and rendering errors
/// - File write errors
pub fn run(args: &Args) -> Result<(), CaffeineError> {
    let stdout = std::io::stdout();
    run_with_output(args, &mut stdout.lock())
}

/// Run the generator, writing the status lines to `out`.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_output(args: &Args, out: &mut impl Write) -> Result<(), CaffeineError> {
    let app_config = resolve_config(args)?;
    let output = app_config.output();
    let directory = output.directory().to_path_buf();
    let formats = output.formats().to_vec();

    info!(
        directory:? = directory,
        formats:? = formats;
        "Generating diagrams"
    );

    fs::create_dir_all(&directory).map_err(|err| CaffeineError::write(&directory, err))?;

    let entries = catalog::caffeine_diagrams();
    let renderer = DiagramRenderer::new(app_config);

    for entry in &entries {
        for format in &formats {
            let path = renderer.write(entry.diagram(), &directory, *format)?;
            writeln!(out, "✅ Generated: {}", path.display())?;
        }
    }

    if args.manifest {
        write_manifest(&entries, &directory, formats.first().copied().unwrap_or_default())?;
    }

    writeln!(out)?;
    writeln!(out, "🎉 All diagrams generated successfully!")?;
    writeln!(out, "📁 Output directory: {}", directory.display())?;

    info!(count = entries.len() * formats.len(); "Diagrams generated");
    Ok(())
}

/// Loads the configuration file and applies command-line overrides.
fn resolve_config(args: &Args) -> Result<AppConfig, CaffeineError> {
    let mut app_config = config::load_config(args.config.as_ref())?;

    if let Some(dir) = &args.output_dir {
        app_config.output_mut().set_directory(dir);
    }
    if !args.formats.is_empty() {
        app_config.output_mut().set_formats(args.formats.clone());
    }
    if app_config.output().formats().is_empty() {
        return Err(CaffeineError::Config(
            "at least one output format is required".to_string(),
        ));
    }

    debug!(config:? = app_config; "Configuration resolved");
    Ok(app_config)
}

fn write_manifest(
    entries: &[CatalogEntry],
    directory: &std::path::Path,
    format: OutputFormat,
) -> Result<(), CaffeineError> {
    let manifest = catalog::manifest(entries, format);
    let json = catalog::manifest_json(&manifest)?;
    let path = directory.join(MANIFEST_FILE);
    fs::write(&path, json).map_err(|err| CaffeineError::write(&path, err))?;
    info!(path:? = path, entries = manifest.len(); "Manifest written");
    Ok(())
}
