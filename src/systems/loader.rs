//! Background resource loading.
//!
//! - [`loader_thread`] runs on its own OS thread, owns the
//!   [`AssetFetcher`], and answers every [`LoaderCmd::Load`] with exactly one
//!   [`LoaderMessage`].
//! - [`poll_resource_loads`] drains finished loads into the
//!   [`ResourceCache`] once per frame on the main thread, where readiness
//!   events get published.
//!
//! The thread blocks on its command channel, so it costs nothing while idle.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, trace};

use crate::events::loader::{LoaderCmd, LoaderMessage};
use crate::resources::resourcecache::{AssetFetcher, ResourceCache};

/// Entry point of the loader thread.
///
/// Exits on [`LoaderCmd::Shutdown`], or when either channel side is dropped.
pub fn loader_thread<F: AssetFetcher>(
    fetcher: F,
    rx_cmd: Receiver<LoaderCmd>,
    tx_msg: Sender<LoaderMessage>,
) {
    debug!(
        "[loader] thread starting (id={:?})",
        std::thread::current().id()
    );

    for cmd in rx_cmd.iter() {
        match cmd {
            LoaderCmd::Load { name, kind, source } => {
                trace!("[loader] fetching {} '{}' from '{}'", kind, name, source);
                let message = match fetcher.fetch(kind, &source) {
                    Ok(asset) => LoaderMessage::Loaded {
                        name,
                        asset: Arc::new(asset),
                    },
                    Err(error) => LoaderMessage::Failed { name, error },
                };
                if tx_msg.send(message).is_err() {
                    break;
                }
            }
            LoaderCmd::Shutdown => break,
        }
    }

    debug!("[loader] thread exiting");
}

/// Apply finished loads and publish their readiness topics.
///
/// Runs once per frame, before sprites draw, so a resource that finished
/// during the frame is drawn in that same frame.
pub fn poll_resource_loads(mut cache: ResMut<ResourceCache>) {
    let applied = cache.poll();
    if applied > 0 {
        trace!("applied {} finished load(s)", applied);
    }
}

/// Stop the loader thread owned by the world's [`ResourceCache`], if any.
pub fn shutdown_resource_loader(world: &mut World) {
    if let Some(mut cache) = world.get_resource_mut::<ResourceCache>() {
        cache.shutdown();
    }
}
