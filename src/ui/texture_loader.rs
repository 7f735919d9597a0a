// Background image decoding for page slots.
// Worker threads decode; results are drained on the main loop and handed to
// still-alive PageWidgets through weak references.

use gdk4::Texture;
use gtk4::prelude::*;
use gtk4::{gdk, glib};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::OnceLock;
use std::time::Duration;

use super::page_widget::PageWidget;
use crate::image_loader::{decode_preview, DecodedImage};

const PREVIEW_SIZE: u32 = 900;
const LOADER_THREADS: usize = 2;
const LOADER_QUEUE: usize = 128;
const CACHE_ENTRIES: usize = 64;

// Dark gray texture shown while a slot image is decoding
pub fn placeholder_texture() -> &'static Texture {
    static PLACEHOLDER: OnceLock<Texture> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        let width = 64;
        let height = 64;
        let mut pixels = vec![0u8; width * height * 4];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[0x35, 0x38, 0x39, 0xff]);
        }
        let bytes = glib::Bytes::from_owned(pixels);
        gdk::MemoryTexture::new(
            width as i32,
            height as i32,
            gdk::MemoryFormat::R8g8b8a8,
            &bytes,
            width * 4,
        )
        .upcast()
    })
}

#[derive(Debug)]
struct DecodeRequest {
    path: PathBuf,
}

#[derive(Debug)]
struct DecodeResult {
    path: PathBuf,
    image: Option<DecodedImage>,
}

#[derive(Clone)]
struct SlotWaiter {
    widget: glib::WeakRef<PageWidget>,
    index: usize,
}

/// Paths queued for decoding, plus the overflow the bounded worker queue
/// had no room for. Overflow is resent on the next drain tick.
#[derive(Debug, Default)]
struct DecodeQueue {
    pending: HashSet<PathBuf>,
    backlog: VecDeque<PathBuf>,
}

impl DecodeQueue {
    /// Marks `path` as wanted. Returns `false` when it is already queued,
    /// deferred or being decoded.
    fn admit(&mut self, path: &Path) -> bool {
        self.pending.insert(path.to_path_buf())
    }

    /// Keeps an admitted path that did not fit into the worker queue.
    fn defer(&mut self, path: PathBuf) {
        if !self.backlog.contains(&path) {
            self.backlog.push_back(path);
        }
    }

    /// Resends deferred paths in request order until `send` reports a full
    /// queue. Returns how many were sent.
    fn retry_backlog(&mut self, mut send: impl FnMut(&Path) -> bool) -> usize {
        let mut sent = 0;
        while let Some(path) = self.backlog.front() {
            if !send(path) {
                break;
            }
            self.backlog.pop_front();
            sent += 1;
        }
        sent
    }

    /// Forgets a deferred path nobody waits for any more. Paths already
    /// handed to a worker stay pending until their result arrives.
    fn withdraw(&mut self, path: &Path) -> bool {
        let Some(position) = self.backlog.iter().position(|p| p == path) else {
            return false;
        };
        self.backlog.remove(position);
        self.pending.remove(path);
        true
    }

    fn complete(&mut self, path: &Path) {
        self.pending.remove(path);
    }

    fn backlog_len(&self) -> usize {
        self.backlog.len()
    }
}

struct LoaderState {
    queue: DecodeQueue,
    waiters: HashMap<PathBuf, Vec<SlotWaiter>>,
    cache: lru::LruCache<PathBuf, Texture>,
}

struct TextureLoader {
    request_tx: flume::Sender<DecodeRequest>,
    result_rx: flume::Receiver<DecodeResult>,
    state: RefCell<LoaderState>,
}

thread_local! {
    static TEXTURE_LOADER: Rc<TextureLoader> = TextureLoader::new();
}

/// Queue a decode of `path` for slot `index` of `widget`.
pub fn request_texture(widget: &PageWidget, index: usize, path: &Path) {
    TEXTURE_LOADER.with(|loader| loader.request(widget, index, path));
}

/// Stop waiting for `path` on behalf of `widget`.
pub fn cancel_texture(widget: &PageWidget, path: &Path) {
    TEXTURE_LOADER.with(|loader| loader.cancel(widget, path));
}

impl TextureLoader {
    fn new() -> Rc<Self> {
        let (request_tx, request_rx) = flume::bounded::<DecodeRequest>(LOADER_QUEUE);
        let (result_tx, result_rx) = flume::unbounded::<DecodeResult>();

        for _ in 0..LOADER_THREADS {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            std::thread::spawn(move || {
                while let Ok(req) = rx.recv() {
                    let image = match decode_preview(&req.path, PREVIEW_SIZE) {
                        Ok(image) => Some(image),
                        Err(err) => {
                            tracing::warn!(error = ?err, "Failed to decode slot image");
                            None
                        }
                    };
                    if tx
                        .send(DecodeResult {
                            path: req.path,
                            image,
                        })
                        .is_err()
                    {
                        break;
                    }
                }
            });
        }

        let loader = Rc::new(Self {
            request_tx,
            result_rx,
            state: RefCell::new(LoaderState {
                queue: DecodeQueue::default(),
                waiters: HashMap::new(),
                cache: lru::LruCache::new(
                    NonZeroUsize::new(CACHE_ENTRIES).unwrap_or(NonZeroUsize::MIN),
                ),
            }),
        });

        let loader_weak = Rc::downgrade(&loader);
        glib::timeout_add_local(Duration::from_millis(16), move || {
            if let Some(loader) = loader_weak.upgrade() {
                loader.process_results();
                glib::ControlFlow::Continue
            } else {
                glib::ControlFlow::Break
            }
        });

        loader
    }

    fn request(&self, widget: &PageWidget, index: usize, path: &Path) {
        let mut state = self.state.borrow_mut();

        if let Some(texture) = state.cache.get(path).cloned() {
            let widget_weak = widget.downgrade();
            let path = path.to_path_buf();
            glib::idle_add_local_once(move || {
                if let Some(widget) = widget_weak.upgrade() {
                    widget.apply_texture(index, &path, Some(&texture));
                }
            });
            return;
        }

        state
            .waiters
            .entry(path.to_path_buf())
            .or_default()
            .push(SlotWaiter {
                widget: widget.downgrade(),
                index,
            });

        if !state.queue.admit(path) {
            return;
        }
        match self.request_tx.try_send(DecodeRequest {
            path: path.to_path_buf(),
        }) {
            Ok(()) => {}
            Err(flume::TrySendError::Full(request)) => {
                tracing::debug!("Decode queue full, deferring {}", path.display());
                state.queue.defer(request.path);
            }
            Err(flume::TrySendError::Disconnected(_)) => {
                tracing::warn!("Decode workers stopped, {} not loaded", path.display());
                state.queue.complete(path);
                let waiters = state.waiters.remove(path).unwrap_or_default();
                drop(state);
                fail_waiters(waiters, path);
            }
        }
    }

    fn cancel(&self, widget: &PageWidget, path: &Path) {
        let mut state = self.state.borrow_mut();
        let Some(waiters) = state.waiters.get_mut(path) else {
            return;
        };
        waiters.retain(|waiter| {
            waiter
                .widget
                .upgrade()
                .is_some_and(|alive| &alive != widget)
        });
        if waiters.is_empty() {
            state.waiters.remove(path);
            state.queue.withdraw(path);
        }
    }

    fn process_results(&self) {
        while let Ok(result) = self.result_rx.try_recv() {
            let texture = result.image.and_then(create_texture);

            let waiters = {
                let mut state = self.state.borrow_mut();
                state.queue.complete(&result.path);
                if let Some(ref texture) = texture {
                    state.cache.put(result.path.clone(), texture.clone());
                }
                state.waiters.remove(&result.path).unwrap_or_default()
            };

            for waiter in waiters {
                if let Some(widget) = waiter.widget.upgrade() {
                    widget.apply_texture(waiter.index, &result.path, texture.as_ref());
                }
            }
        }

        let mut state = self.state.borrow_mut();
        if state.queue.backlog_len() > 0 {
            let tx = &self.request_tx;
            let sent = state.queue.retry_backlog(|path| {
                tx.try_send(DecodeRequest {
                    path: path.to_path_buf(),
                })
                .is_ok()
            });
            if sent > 0 {
                tracing::debug!(sent, left = state.queue.backlog_len(), "Resent deferred decodes");
            }
        }
    }
}

// Slots whose decode can never run show the fallback text
fn fail_waiters(waiters: Vec<SlotWaiter>, path: &Path) {
    for waiter in waiters {
        if let Some(widget) = waiter.widget.upgrade() {
            widget.apply_texture(waiter.index, path, None);
        }
    }
}

fn create_texture(image: DecodedImage) -> Option<Texture> {
    let DecodedImage {
        rgba,
        width,
        height,
    } = image;
    if rgba.len() < expected_len(width, height)? {
        return None;
    }
    let bytes = glib::Bytes::from_owned(rgba);
    let texture = gdk::MemoryTexture::new(
        width as i32,
        height as i32,
        gdk::MemoryFormat::R8g8b8a8,
        &bytes,
        (width * 4) as usize,
    );
    Some(texture.upcast())
}

fn expected_len(width: u32, height: u32) -> Option<usize> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(
        (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_len() {
        assert_eq!(expected_len(0, 10), None);
        assert_eq!(expected_len(2, 3), Some(24));
    }

    #[test]
    fn test_overflow_is_retried_in_order() {
        let (tx, rx) = flume::bounded::<PathBuf>(2);
        let mut queue = DecodeQueue::default();
        let paths: Vec<PathBuf> = (0..5).map(|i| PathBuf::from(format!("{i}.jpg"))).collect();

        for path in &paths {
            assert!(queue.admit(path));
            if let Err(flume::TrySendError::Full(path)) = tx.try_send(path.clone()) {
                queue.defer(path);
            }
        }
        assert_eq!(queue.backlog_len(), 3);
        // Deferred paths still count as pending
        assert!(!queue.admit(&paths[4]));

        // Workers drain the queue, the next tick resends what fits
        let drained: Vec<PathBuf> = rx.try_iter().collect();
        assert_eq!(drained, paths[..2].to_vec());
        let sent = queue.retry_backlog(|path| tx.try_send(path.to_path_buf()).is_ok());
        assert_eq!(sent, 2);
        assert_eq!(queue.backlog_len(), 1);

        rx.try_iter().for_each(drop);
        assert_eq!(queue.retry_backlog(|path| tx.try_send(path.to_path_buf()).is_ok()), 1);
        assert_eq!(queue.backlog_len(), 0);
        let last: Vec<PathBuf> = rx.try_iter().collect();
        assert_eq!(last, vec![paths[4].clone()]);
    }

    #[test]
    fn test_every_admitted_path_eventually_sends() {
        let (tx, rx) = flume::bounded::<PathBuf>(LOADER_QUEUE);
        let mut queue = DecodeQueue::default();
        for i in 0..300 {
            let path = PathBuf::from(format!("{i}.jpg"));
            assert!(queue.admit(&path));
            if let Err(flume::TrySendError::Full(path)) = tx.try_send(path) {
                queue.defer(path);
            }
        }

        let mut received = 0;
        for _ in 0..10 {
            received += rx.try_iter().count();
            queue.retry_backlog(|path| tx.try_send(path.to_path_buf()).is_ok());
        }
        received += rx.try_iter().count();
        assert_eq!(received, 300);
        assert_eq!(queue.backlog_len(), 0);
    }

    #[test]
    fn test_withdraw_only_touches_deferred_paths() {
        let mut queue = DecodeQueue::default();
        let in_flight = Path::new("a.jpg");
        let deferred = Path::new("b.jpg");
        queue.admit(in_flight);
        queue.admit(deferred);
        queue.defer(deferred.to_path_buf());

        assert!(!queue.withdraw(in_flight));
        assert!(queue.withdraw(deferred));
        assert_eq!(queue.backlog_len(), 0);
        // A withdrawn path can be requested again, an in-flight one cannot
        assert!(queue.admit(deferred));
        assert!(!queue.admit(in_flight));

        queue.complete(in_flight);
        assert!(queue.admit(in_flight));
    }
}
