use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};

use crate::assets::decode::{DecodedImage, decode_image};
use crate::assets::source::ImageSource;
use crate::foundation::error::{LumenError, LumenResult};

/// Outcome delivered once per decode request.
pub type DecodeOutcome = LumenResult<DecodedImage>;

/// Configuration for [`TextureLoader`].
#[derive(Clone, Debug)]
pub struct TextureLoaderOpts {
    /// Directory that relative [`ImageSource::Path`] values resolve against.
    pub assets_root: PathBuf,
    /// Decode worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for TextureLoaderOpts {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("."),
            threads: None,
        }
    }
}

impl TextureLoaderOpts {
    /// Defaults overridden by `LUMEN_ASSETS_ROOT` and `LUMEN_DECODE_THREADS`.
    ///
    /// Empty, unparsable or zero values are ignored.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Ok(root) = std::env::var("LUMEN_ASSETS_ROOT")
            && !root.trim().is_empty()
        {
            opts.assets_root = PathBuf::from(root);
        }
        opts.threads = std::env::var("LUMEN_DECODE_THREADS")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0);
        opts
    }

    /// Return options with a different assets root.
    pub fn with_assets_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets_root = root.into();
        self
    }

    /// Return options with an explicit worker count.
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }
}

/// Schedules image reads and decodes on a dedicated worker pool.
///
/// Every request gets its own single-use channel ([`PendingDecode`]); results are never applied
/// to a texture from the worker side. The owner of the texture picks them up on its own turn.
#[derive(Clone)]
pub struct TextureLoader {
    assets_root: PathBuf,
    pool: Arc<rayon::ThreadPool>,
}

impl std::fmt::Debug for TextureLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureLoader")
            .field("assets_root", &self.assets_root)
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

impl TextureLoader {
    /// Build a loader and its worker pool.
    pub fn new(opts: TextureLoaderOpts) -> LumenResult<Self> {
        Ok(Self {
            pool: Arc::new(build_thread_pool(opts.threads)?),
            assets_root: opts.assets_root,
        })
    }

    /// Build a loader configured from the environment, see [`TextureLoaderOpts::from_env`].
    pub fn from_env() -> LumenResult<Self> {
        Self::new(TextureLoaderOpts::from_env())
    }

    /// Root directory used when resolving relative sources.
    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }

    /// Issue a non-blocking decode of `source`.
    pub fn request(&self, source: &ImageSource) -> PendingDecode {
        let (tx, rx) = mpsc::sync_channel::<DecodeOutcome>(1);
        let label = source.label().to_owned();
        let source = source.clone();
        let root = self.assets_root.clone();

        tracing::debug!(source = %label, "texture decode requested");
        self.pool.spawn(move || {
            let outcome = load_and_decode(&root, &source);
            // The receiver is gone when the texture was dropped before completion.
            let _ = tx.send(outcome);
        });

        PendingDecode { label, rx }
    }

    /// Read and decode `source` on the calling thread.
    pub fn load_blocking(&self, source: &ImageSource) -> DecodeOutcome {
        load_and_decode(&self.assets_root, source)
    }
}

fn load_and_decode(root: &Path, source: &ImageSource) -> DecodeOutcome {
    source
        .read_bytes(root)
        .and_then(|bytes| decode_image(&bytes))
        .map_err(|e| match e {
            LumenError::Decode(_) => e,
            other => LumenError::decode(format!("'{}': {other}", source.label())),
        })
}

fn build_thread_pool(threads: Option<usize>) -> LumenResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LumenError::validation("decode threads must be >= 1"));
    }

    let mut builder =
        rayon::ThreadPoolBuilder::new().thread_name(|i| format!("lumen2d-decode-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LumenError::validation(format!("failed to build decode thread pool: {e}")))
}

/// Single-resolution handle for one decode request.
///
/// Resolves exactly once: after [`PendingDecode::try_take`] has returned `Some`, the handle
/// should be dropped.
#[derive(Debug)]
pub struct PendingDecode {
    label: String,
    rx: mpsc::Receiver<DecodeOutcome>,
}

impl PendingDecode {
    /// A handle that is already resolved with `outcome`.
    pub fn ready(label: impl Into<String>, outcome: DecodeOutcome) -> Self {
        let (tx, rx) = mpsc::sync_channel(1);
        let _ = tx.send(outcome);
        Self {
            label: label.into(),
            rx,
        }
    }

    /// Source label this request was issued for.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Non-blocking check for the outcome.
    pub fn try_take(&self) -> Option<DecodeOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(self.worker_gone())),
        }
    }

    /// Block until the outcome is available.
    pub fn wait(self) -> DecodeOutcome {
        match self.rx.recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(self.worker_gone()),
        }
    }

    fn worker_gone(&self) -> LumenError {
        LumenError::decode(format!(
            "'{}': decode worker exited without a result",
            self.label
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
