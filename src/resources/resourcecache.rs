//! Asynchronous, deduplicated resource cache.
//!
//! [`ResourceCache`] owns the lifecycle of every named resource:
//!
//! ```text
//! unrequested --add_resource--> loading --ok--> ready
//!                                  \----err--> failed --reset--> unrequested
//! ```
//!
//! Fetching and decoding happen on a background loader thread (see
//! [`crate::systems::loader`]). Results come back over a channel and are
//! applied on the main thread by [`ResourceCache::poll`], which is also
//! where the readiness topic `resource-<kind>-<name>` is published. The
//! loader thread never mutates cache state.
//!
//! A name is loaded at most once: calling [`ResourceCache::add_resource`] for
//! a name that is already `loading` or `ready` does nothing.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use bevy_ecs::prelude::Resource;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use log::{debug, error, info, warn};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::LoadError;
use crate::events::loader::{LoaderCmd, LoaderMessage};
use crate::events::resource::{ResourceKind, resource_topic};
use crate::resources::eventbus::EventBus;
use crate::systems::loader::loader_thread;

/// Decoded RGBA8 image.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// A loaded resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    Image(ImageData),
    Json(serde_json::Value),
    Text(String),
    /// Undecoded audio file contents.
    Audio(Vec<u8>),
    Binary(Vec<u8>),
}

impl Asset {
    pub fn as_image(&self) -> Option<&ImageData> {
        match self {
            Asset::Image(image) => Some(image),
            _ => None,
        }
    }
}

/// Lifecycle state of a named resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceState {
    Unrequested,
    Loading,
    Ready,
    Failed,
}

/// Fetches and decodes one resource. Runs on the loader thread.
pub trait AssetFetcher: Send + 'static {
    fn fetch(&self, kind: ResourceKind, source: &str) -> Result<Asset, LoadError>;
}

/// Reads resources from disk, relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetFetcher for FileFetcher {
    fn fetch(&self, kind: ResourceKind, source: &str) -> Result<Asset, LoadError> {
        let path = self.root.join(source);
        let display = path.display().to_string();
        let bytes = std::fs::read(&path).map_err(|source| LoadError::Io {
            path: display.clone(),
            source,
        })?;
        match kind {
            ResourceKind::Image => {
                let decoded = image::load_from_memory(&bytes).map_err(|source| {
                    LoadError::Image {
                        path: display.clone(),
                        source,
                    }
                })?;
                let rgba = decoded.to_rgba8();
                Ok(Asset::Image(ImageData {
                    width: rgba.width(),
                    height: rgba.height(),
                    pixels: rgba.into_raw(),
                }))
            }
            ResourceKind::Json => serde_json::from_slice(&bytes)
                .map(Asset::Json)
                .map_err(|source| LoadError::Json {
                    path: display,
                    source,
                }),
            ResourceKind::Text => String::from_utf8(bytes)
                .map(Asset::Text)
                .map_err(|_| LoadError::Utf8 { path: display }),
            ResourceKind::Audio => Ok(Asset::Audio(bytes)),
            ResourceKind::Binary => Ok(Asset::Binary(bytes)),
        }
    }
}

enum EntryState {
    Loading,
    Ready(Arc<Asset>),
    Failed(String),
}

struct Entry {
    source: String,
    kind: ResourceKind,
    state: EntryState,
}

#[derive(Deserialize)]
struct Manifest {
    resources: Vec<ManifestEntry>,
}

#[derive(Deserialize)]
struct ManifestEntry {
    name: String,
    source: String,
}

/// Load-and-cache store keyed by logical resource name.
#[derive(Resource)]
pub struct ResourceCache {
    entries: FxHashMap<String, Entry>,
    bus: EventBus,
    tx_cmd: Sender<LoaderCmd>,
    rx_msg: Receiver<LoaderMessage>,
    handle: Option<JoinHandle<()>>,
    pending: usize,
}

impl ResourceCache {
    /// Create the cache and spawn its loader thread.
    ///
    /// Readiness events are published on `bus`.
    pub fn new(bus: EventBus, fetcher: impl AssetFetcher) -> Self {
        let (tx_cmd, rx_cmd) = unbounded::<LoaderCmd>();
        let (tx_msg, rx_msg) = unbounded::<LoaderMessage>();

        let handle = std::thread::Builder::new()
            .name("resource-loader".into())
            .spawn(move || loader_thread(fetcher, rx_cmd, tx_msg))
            .map_err(|e| error!("failed to spawn resource loader thread: {}", e))
            .ok();

        Self {
            entries: FxHashMap::default(),
            bus,
            tx_cmd,
            rx_msg,
            handle,
            pending: 0,
        }
    }

    /// Create a cache that reads files below `root`.
    pub fn with_root(bus: EventBus, root: impl Into<PathBuf>) -> Self {
        Self::new(bus, FileFetcher::new(root))
    }

    /// Return the resource if, and only if, it is ready.
    ///
    /// Never blocks. `None` covers unrequested, loading and failed alike.
    pub fn request(&self, name: &str) -> Option<Arc<Asset>> {
        match self.entries.get(name).map(|e| &e.state) {
            Some(EntryState::Ready(asset)) => Some(Arc::clone(asset)),
            _ => None,
        }
    }

    /// Start loading `name` from `source` unless it is already loading or ready.
    ///
    /// A `failed` resource stays failed; call [`reset`](Self::reset) first to
    /// try again. Returns the state after the call.
    pub fn add_resource(&mut self, name: impl Into<String>, source: impl Into<String>) -> ResourceState {
        let source = source.into();
        let kind = ResourceKind::from_source(&source);
        self.add_resource_as(name, source, kind)
    }

    /// [`add_resource`](Self::add_resource) with the kind given by the caller
    /// instead of guessed from `source`. The kind decides both the decoder and
    /// the readiness topic.
    ///
    /// If `name` is already known its recorded kind wins; see [`kind`](Self::kind).
    pub fn add_resource_as(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
        kind: ResourceKind,
    ) -> ResourceState {
        let name = name.into();
        let current = self.state(&name);
        match current {
            ResourceState::Loading | ResourceState::Ready => return current,
            ResourceState::Failed => {
                warn!(
                    "resource '{}' previously failed to load; reset it before requesting again",
                    name
                );
                return current;
            }
            ResourceState::Unrequested => {}
        }

        let source = source.into();
        let cmd = LoaderCmd::Load {
            name: name.clone(),
            kind,
            source: source.clone(),
        };

        let state = if self.tx_cmd.send(cmd).is_ok() {
            debug!("loading {} resource '{}' from '{}'", kind, name, source);
            self.pending += 1;
            EntryState::Loading
        } else {
            error!("cannot load '{}': {}", name, LoadError::LoaderGone);
            EntryState::Failed(LoadError::LoaderGone.to_string())
        };
        let loading = matches!(state, EntryState::Loading);
        self.entries.insert(name, Entry { source, kind, state });

        if loading {
            ResourceState::Loading
        } else {
            ResourceState::Failed
        }
    }

    /// Lifecycle state of `name`.
    pub fn state(&self, name: &str) -> ResourceState {
        match self.entries.get(name).map(|e| &e.state) {
            None => ResourceState::Unrequested,
            Some(EntryState::Loading) => ResourceState::Loading,
            Some(EntryState::Ready(_)) => ResourceState::Ready,
            Some(EntryState::Failed(_)) => ResourceState::Failed,
        }
    }

    /// Kind of a requested resource.
    pub fn kind(&self, name: &str) -> Option<ResourceKind> {
        self.entries.get(name).map(|e| e.kind)
    }

    /// Source location a requested resource was loaded from.
    pub fn source(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.source.as_str())
    }

    /// Error message of a failed resource.
    pub fn failure(&self, name: &str) -> Option<&str> {
        match self.entries.get(name).map(|e| &e.state) {
            Some(EntryState::Failed(message)) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Number of loads still in flight.
    pub fn pending_count(&self) -> usize {
        self.pending
    }

    /// Forget a failed resource so it can be requested again.
    ///
    /// Only `failed` entries are reset; returns whether one was.
    pub fn reset(&mut self, name: &str) -> bool {
        if self.state(name) == ResourceState::Failed {
            self.entries.remove(name);
            info!("resource '{}' reset after failure", name);
            true
        } else {
            false
        }
    }

    /// Apply every finished load without blocking. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let finished: Vec<LoaderMessage> = self.rx_msg.try_iter().collect();
        let count = finished.len();
        for message in finished {
            self.apply(message);
        }
        count
    }

    /// Block until every in-flight load finished or `timeout` elapsed.
    ///
    /// Meant for startup preloading; the frame loop uses [`poll`](Self::poll).
    pub fn wait_for_loads(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut applied = 0;
        while self.pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx_msg.recv_timeout(remaining) {
                Ok(message) => {
                    self.apply(message);
                    applied += 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!("gave up waiting on {} resource load(s)", self.pending);
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        applied
    }

    fn apply(&mut self, message: LoaderMessage) {
        let (name, outcome) = match message {
            LoaderMessage::Loaded { name, asset } => (name, Ok(asset)),
            LoaderMessage::Failed { name, error } => (name, Err(error)),
        };
        let Some(entry) = self.entries.get_mut(&name) else {
            warn!("dropping load result for unknown resource '{}'", name);
            return;
        };
        if !matches!(entry.state, EntryState::Loading) {
            warn!("dropping duplicate load result for '{}'", name);
            return;
        }
        self.pending = self.pending.saturating_sub(1);

        match outcome {
            Ok(asset) => {
                entry.state = EntryState::Ready(asset);
                let topic = resource_topic(entry.kind, &name);
                debug!("resource '{}' ready, publishing '{}'", name, topic);
                self.bus.publish(&topic, None);
            }
            Err(e) => {
                error!("failed to load resource '{}': {}", name, e);
                entry.state = EntryState::Failed(e.to_string());
            }
        }
    }

    /// Queue every entry of a JSON preload manifest.
    ///
    /// ```json
    /// { "resources": [ { "name": "hero", "source": "hero.png" } ] }
    /// ```
    ///
    /// Returns the number of loads the manifest started. Entries already
    /// known to the cache, or repeated within the manifest, are not counted.
    pub fn load_manifest(&mut self, path: impl AsRef<Path>) -> Result<usize, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read manifest {:?}: {}", path, e))?;
        let manifest: Manifest = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse manifest {:?}: {}", path, e))?;

        let queued = manifest
            .resources
            .into_iter()
            .filter(|entry| {
                self.state(&entry.name) == ResourceState::Unrequested
                    && self.add_resource(entry.name.clone(), entry.source.clone())
                        == ResourceState::Loading
            })
            .count();
        info!("Queued {} resource(s) from manifest {:?}", queued, path);
        Ok(queued)
    }

    /// Stop the loader thread and wait for it. Loads still in flight are dropped.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.tx_cmd.send(LoaderCmd::Shutdown);
            if handle.join().is_err() {
                error!("resource loader thread panicked");
            }
        }
    }
}

impl Drop for ResourceCache {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const WAIT: Duration = Duration::from_secs(5);

    struct CountingFetcher {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl AssetFetcher for CountingFetcher {
        fn fetch(&self, _kind: ResourceKind, source: &str) -> Result<Asset, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LoadError::Utf8 {
                    path: source.to_string(),
                })
            } else {
                Ok(Asset::Text(source.to_string()))
            }
        }
    }

    /// Holds every fetch until the test lets it through.
    struct GatedFetcher {
        gate: Receiver<()>,
    }

    impl AssetFetcher for GatedFetcher {
        fn fetch(&self, _kind: ResourceKind, source: &str) -> Result<Asset, LoadError> {
            let _ = self.gate.recv();
            Ok(Asset::Text(source.to_string()))
        }
    }

    fn counting_cache(fail: bool) -> (ResourceCache, EventBus, Arc<AtomicUsize>) {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = ResourceCache::new(
            bus.clone(),
            CountingFetcher {
                calls: Arc::clone(&calls),
                fail,
            },
        );
        (cache, bus, calls)
    }

    #[test]
    fn test_add_resource_twice_loads_once() {
        let (mut cache, _bus, calls) = counting_cache(false);
        assert_eq!(cache.add_resource("hero", "hero.png"), ResourceState::Loading);
        assert_eq!(cache.add_resource("hero", "hero.png"), ResourceState::Loading);
        assert_eq!(cache.pending_count(), 1);

        cache.wait_for_loads(WAIT);
        assert_eq!(cache.add_resource("hero", "hero.png"), ResourceState::Ready);
        cache.shutdown();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_request_absent_until_applied() {
        let (mut cache, _bus, _calls) = counting_cache(false);
        assert!(cache.request("hero").is_none());
        cache.add_resource("hero", "hero.png");
        // Results only land on poll/wait, on this thread.
        assert!(cache.request("hero").is_none());
        assert_eq!(cache.state("hero"), ResourceState::Loading);

        assert_eq!(cache.wait_for_loads(WAIT), 1);
        let first = cache.request("hero").expect("ready");
        let second = cache.request("hero").expect("still ready");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, Asset::Text("hero.png".into()));
    }

    #[test]
    fn test_readiness_topic_published_once() {
        let (mut cache, bus, _calls) = counting_cache(false);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in = Arc::clone(&seen);
        bus.subscribe_fn("resource-image-hero", move |_, event| {
            assert!(event.payload.is_none());
            seen_in.lock().unwrap().push(event.topic.to_string());
        });

        cache.add_resource("hero", "hero.png");
        cache.add_resource("hero", "hero.png");
        cache.wait_for_loads(WAIT);
        cache.poll();

        assert_eq!(*seen.lock().unwrap(), vec!["resource-image-hero".to_string()]);
    }

    #[test]
    fn test_failed_load_is_terminal_until_reset() {
        let (mut cache, bus, calls) = counting_cache(true);
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in = Arc::clone(&fired);
        bus.subscribe_fn("resource-text-intro", move |_, _| {
            fired_in.fetch_add(1, Ordering::SeqCst);
        });

        cache.add_resource("intro", "intro.txt");
        cache.wait_for_loads(WAIT);
        assert_eq!(cache.state("intro"), ResourceState::Failed);
        assert!(cache.request("intro").is_none());
        assert!(cache.failure("intro").is_some());
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        assert_eq!(cache.add_resource("intro", "intro.txt"), ResourceState::Failed);
        assert_eq!(cache.pending_count(), 0);

        assert!(cache.reset("intro"));
        assert_eq!(cache.state("intro"), ResourceState::Unrequested);
        assert_eq!(cache.add_resource("intro", "intro.txt"), ResourceState::Loading);
        cache.wait_for_loads(WAIT);
        cache.shutdown();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_wait_for_loads_gives_up_after_timeout() {
        let (open, gate) = unbounded::<()>();
        let mut cache = ResourceCache::new(EventBus::new(), GatedFetcher { gate });
        cache.add_resource("slow", "slow.txt");

        assert_eq!(cache.wait_for_loads(Duration::from_millis(50)), 0);
        assert_eq!(cache.pending_count(), 1);
        assert_eq!(cache.state("slow"), ResourceState::Loading);
        assert!(cache.request("slow").is_none());

        open.send(()).unwrap();
        assert_eq!(cache.wait_for_loads(WAIT), 1);
        assert_eq!(cache.state("slow"), ResourceState::Ready);
    }

    #[test]
    fn test_add_resource_as_overrides_guessed_kind() {
        let (mut cache, bus, _calls) = counting_cache(false);
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in = Arc::clone(&fired);
        bus.subscribe_fn("resource-image-hero", move |_, _| {
            fired_in.fetch_add(1, Ordering::SeqCst);
        });

        cache.add_resource_as("hero", "https://cdn.example/hero", ResourceKind::Image);
        assert_eq!(cache.kind("hero"), Some(ResourceKind::Image));
        // A later request with another kind keeps the recorded one.
        cache.add_resource_as("hero", "hero.bin", ResourceKind::Binary);
        assert_eq!(cache.kind("hero"), Some(ResourceKind::Image));

        cache.wait_for_loads(WAIT);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reset_ignores_non_failed() {
        let (mut cache, _bus, _calls) = counting_cache(false);
        assert!(!cache.reset("nothing"));
        cache.add_resource("hero", "hero.png");
        assert!(!cache.reset("hero"));
    }

    #[test]
    fn test_kind_and_source_recorded() {
        let (mut cache, _bus, _calls) = counting_cache(false);
        cache.add_resource("level", "levels/one.json");
        assert_eq!(cache.kind("level"), Some(ResourceKind::Json));
        assert_eq!(cache.source("level"), Some("levels/one.json"));
        assert_eq!(cache.kind("missing"), None);
    }

    #[test]
    fn test_file_fetcher_reads_json_and_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cfg.json"), r#"{"speed": 3}"#).unwrap();
        std::fs::write(dir.path().join("intro.txt"), "hello").unwrap();

        let fetcher = FileFetcher::new(dir.path());
        assert_eq!(
            fetcher.fetch(ResourceKind::Json, "cfg.json").unwrap(),
            Asset::Json(serde_json::json!({ "speed": 3 }))
        );
        assert_eq!(
            fetcher.fetch(ResourceKind::Text, "intro.txt").unwrap(),
            Asset::Text("hello".into())
        );
        assert!(matches!(
            fetcher.fetch(ResourceKind::Text, "missing.txt"),
            Err(LoadError::Io { .. })
        ));
    }

    #[test]
    fn test_file_fetcher_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]));
        img.save(dir.path().join("red.png")).unwrap();

        let asset = FileFetcher::new(dir.path())
            .fetch(ResourceKind::Image, "red.png")
            .unwrap();
        let image = asset.as_image().expect("image asset");
        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(image.pixels.len(), 3 * 2 * 4);
        assert_eq!(&image.pixels[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_file_fetcher_rejects_corrupt_image() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.png"), b"not a png").unwrap();
        assert!(matches!(
            FileFetcher::new(dir.path()).fetch(ResourceKind::Image, "bad.png"),
            Err(LoadError::Image { .. })
        ));
    }

    #[test]
    fn test_load_manifest_queues_entries() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("manifest.json");
        std::fs::write(
            &manifest,
            r#"{ "resources": [
                { "name": "hero", "source": "hero.png" },
                { "name": "hero", "source": "hero.png" },
                { "name": "intro", "source": "intro.txt" }
            ] }"#,
        )
        .unwrap();

        let (mut cache, _bus, calls) = counting_cache(false);
        assert_eq!(cache.load_manifest(&manifest), Ok(2));
        assert_eq!(cache.pending_count(), 2);
        cache.wait_for_loads(WAIT);
        // Everything is ready now, so a second pass starts nothing.
        assert_eq!(cache.load_manifest(&manifest), Ok(0));
        cache.shutdown();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.load_manifest(dir.path().join("nope.json")).is_err());
    }
}
