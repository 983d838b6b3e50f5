//! Catalog CLI commands.
//!
//! Inspect the images a catalog manifest offers and whether they are cached.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Subcommand;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::manifest_path;
use crate::cache::{IMAGES_SUBDIR, get_cache_subdir};
use crate::cli::output::{format_bool, format_optional, print_heading, print_json, truncate};
use crate::error::PixellError;
use crate::platform::SystemClock;
use crate::wallpaper::catalog::{ManifestCatalog, ManifestEntry};

/// Longest name shown before truncation.
const MAX_NAME_CHARS: usize = 32;

/// Catalog subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum CatalogCommands {
    /// List timelines, images and collections in a manifest.
    #[command(after_long_help = r#"Examples:
  pixellwp catalog list                          # Manifest next to the config file
  pixellwp catalog list --manifest ./catalog.jsonc
  pixellwp catalog list --json"#)]
    List {
        /// Catalog manifest to read. Defaults to catalog.jsonc next to the config file.
        #[arg(long, short, value_name = "PATH")]
        manifest: Option<PathBuf>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// One listed catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntrySummary {
    kind: &'static str,
    name: String,
    id: Option<u64>,
    size: Option<String>,
    ready: bool,
}

/// Execute catalog subcommands.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed.
pub fn execute(cmd: &CatalogCommands, config: Option<&Path>) -> Result<(), PixellError> {
    match cmd {
        CatalogCommands::List { manifest, json } => {
            let path = manifest_path(manifest.as_deref(), config);
            let catalog = ManifestCatalog::open(
                &path,
                get_cache_subdir(IMAGES_SUBDIR),
                Arc::new(SystemClock),
            )?;
            let entries = summarize(&catalog);

            if *json {
                return print_json(&entries);
            }
            print_entries(&path, &entries);
            Ok(())
        }
    }
}

/// Flattens the manifest into rows, each kind sorted in natural order.
fn summarize(catalog: &ManifestCatalog) -> Vec<EntrySummary> {
    let manifest = catalog.manifest();
    let image_row = |kind: &'static str, entry: &ManifestEntry| EntrySummary {
        kind,
        name: entry.name.clone(),
        id: Some(entry.id),
        size: Some(format!("{}x{}", entry.width, entry.height)),
        ready: catalog.entry_is_ready(entry),
    };

    let mut timelines: Vec<_> =
        manifest.timelines.iter().map(|entry| image_row("timeline", entry)).collect();
    let mut images: Vec<_> = manifest.images.iter().map(|entry| image_row("image", entry)).collect();
    let mut collections: Vec<_> = manifest
        .collections
        .iter()
        .map(|collection| {
            let ready = collection.images.iter().all(|member| {
                manifest
                    .images
                    .iter()
                    .find(|entry| &entry.name == member)
                    .is_some_and(|entry| catalog.entry_is_ready(entry))
            });
            EntrySummary {
                kind: "collection",
                name: collection.name.clone(),
                id: None,
                size: Some(format!("{} images", collection.images.len())),
                ready,
            }
        })
        .collect();

    for rows in [&mut timelines, &mut images, &mut collections] {
        rows.sort_by(|a, b| natord::compare(&a.name, &b.name));
    }

    timelines.into_iter().chain(images).chain(collections).collect()
}

fn print_entries(path: &Path, entries: &[EntrySummary]) {
    if entries.is_empty() {
        println!("No images found in {}.", path.display());
        return;
    }

    #[derive(Tabled)]
    struct EntryRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Kind")]
        kind: &'static str,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Size")]
        size: String,
        #[tabled(rename = "Ready")]
        ready: String,
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|entry| EntryRow {
            id: format_optional(entry.id),
            kind: entry.kind,
            name: truncate(&entry.name, MAX_NAME_CHARS),
            size: format_optional(entry.size.as_deref()),
            ready: format_bool(entry.ready),
        })
        .collect();

    print_heading(&format!("Catalog {}", path.display()));
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .to_string();
    println!("{table}");
}
