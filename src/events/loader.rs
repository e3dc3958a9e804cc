//! Messages exchanged with the background loader thread.
//!
//! The main thread sends [`LoaderCmd`] values, the loader thread answers with
//! [`LoaderMessage`] values. Nothing on the loader thread touches engine
//! state directly; results are applied when the cache drains its inbox.

use std::sync::Arc;

use crate::error::LoadError;
use crate::events::resource::ResourceKind;
use crate::resources::resourcecache::Asset;

/// Commands sent *to* the loader thread.
#[derive(Debug)]
pub enum LoaderCmd {
    Load {
        name: String,
        kind: ResourceKind,
        source: String,
    },
    Shutdown,
}

/// Results sent *back* from the loader thread.
#[derive(Debug)]
pub enum LoaderMessage {
    Loaded { name: String, asset: Arc<Asset> },
    Failed { name: String, error: LoadError },
}
