//! Headless engine session.
//!
//! Drives one engine on a tokio runtime with a [`TracingRenderer`], backed by
//! the configuration file (hot-reloaded) and a catalog manifest. Runs until
//! Ctrl-C, then destroys the engine.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;

use super::manifest_path;
use crate::cache::{IMAGES_SUBDIR, get_cache_subdir};
use crate::config::{ConfigStore, FileStore, resolve_config_path, watch_config_file};
use crate::error::PixellError;
use crate::platform::{Clock, SystemClock};
use crate::wallpaper::{
    EngineActor, EngineDeps, EngineHandle, ImageCatalog, ManifestCatalog, MemoryCatalog,
    SessionKind, TracingRenderer,
};

/// How often the session logs the current frame.
const STATUS_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run as a settings preview: gestures persist, edits are reconciled.
    #[arg(long)]
    pub preview: bool,

    /// Catalog manifest. Defaults to catalog.jsonc next to the config file.
    #[arg(long, short, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Surface width in pixels.
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Surface height in pixels.
    #[arg(long, requires = "width")]
    pub height: Option<u32>,
}

impl RunArgs {
    const fn session(&self) -> SessionKind {
        if self.preview { SessionKind::Preview } else { SessionKind::Live }
    }

    /// Surface size, if one was given.
    ///
    /// # Errors
    ///
    /// Returns [`PixellError::InvalidArguments`] if only one dimension is set
    /// or either is zero.
    pub fn surface_size(&self) -> Result<Option<(u32, u32)>, PixellError> {
        match (self.width, self.height) {
            (None, None) => Ok(None),
            (Some(0), Some(_)) | (Some(_), Some(0)) => Err(PixellError::InvalidArguments(
                "--width and --height must be greater than zero".to_string(),
            )),
            (Some(width), Some(height)) => Ok(Some((width, height))),
            _ => Err(PixellError::InvalidArguments(
                "--width and --height must be given together".to_string(),
            )),
        }
    }
}

/// Runs the session until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the configuration or manifest cannot be loaded, or the
/// engine stops unexpectedly.
pub fn execute(args: &RunArgs, config: Option<&Path>) -> Result<(), PixellError> {
    let surface = args.surface_size()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let store = Arc::new(FileStore::open(resolve_config_path(config))?);
    let catalog = open_catalog(args.manifest.as_deref(), config, Arc::clone(&clock))?;

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    runtime.block_on(async move {
        watch_config_file(&store);
        tracing::info!(
            config = %store.path().display(),
            session = ?args.session(),
            "starting engine session"
        );

        let deps = EngineDeps {
            catalog,
            store: store as Arc<dyn ConfigStore>,
            renderer: Box::new(TracingRenderer::new()),
            clock,
        };
        let handle = EngineActor::spawn(deps, args.session());

        handle.surface_created().await?;
        if let Some((width, height)) = surface {
            handle.surface_changed(width, height).await?;
        }
        handle.visibility_changed(true).await?;
        log_frame(&handle).await?;

        let mut status = tokio::time::interval(STATUS_INTERVAL);
        status.tick().await;
        loop {
            tokio::select! {
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    break;
                }
                _ = status.tick() => log_frame(&handle).await?,
            }
        }

        tracing::info!("stopping engine session");
        handle.destroy().await?;
        Ok::<(), PixellError>(())
    })
}

/// Opens the manifest catalog, or an empty in-memory one when no manifest exists.
fn open_catalog(
    explicit: Option<&Path>,
    config: Option<&Path>,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn ImageCatalog>, PixellError> {
    let path = manifest_path(explicit, config);
    if explicit.is_none() && !path.exists() {
        tracing::warn!(path = %path.display(), "no catalog manifest, showing placeholder");
        return Ok(Arc::new(MemoryCatalog::new(clock)));
    }

    let catalog = ManifestCatalog::open(&path, get_cache_subdir(IMAGES_SUBDIR), clock)?;
    Ok(Arc::new(catalog))
}

async fn log_frame(handle: &EngineHandle) -> Result<(), PixellError> {
    let frame = handle.frame().await?;
    tracing::info!(
        image = %frame.image,
        size = %format!("{}x{}", frame.width, frame.height),
        viewport = %frame.viewport,
        override_time = ?frame.override_time,
        time_of_day = ?frame.time_of_day,
        "current frame"
    );
    Ok(())
}
