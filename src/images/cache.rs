//! LRU cache for decoded images and their rendered canvases.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use image::DynamicImage;

use crate::canvas::Canvas;

use super::Protocol;

/// Maximum number of decoded images to keep in cache
const MAX_CACHE_SIZE: usize = 50;

/// Cache entry for a decoded image
#[derive(Clone)]
struct CachedImage {
    /// The decoded image
    image: Arc<DynamicImage>,
    /// Last access timestamp (for LRU eviction)
    last_access: std::time::Instant,
}

/// Key of one rendered canvas: the image plus everything that shapes its
/// output.
#[derive(Clone, PartialEq, Eq, Hash)]
struct CanvasKey {
    url: String,
    protocol: Protocol,
    cols: usize,
    rows: usize,
}

/// Thread-safe image cache.
///
/// Rendered canvases are cached alongside the decoded pixels so each
/// distinct image converts once per protocol and size; later lookups slice
/// the stored canvas without recomputation.
#[derive(Clone, Default)]
pub struct ImageCache {
    /// Raw decoded images
    images: Arc<Mutex<HashMap<String, CachedImage>>>,
    /// Rendered canvases
    canvases: Arc<Mutex<HashMap<CanvasKey, Canvas>>>,
}

impl ImageCache {
    /// Create a new image cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a decoded image in the cache.
    pub fn insert(&self, url: &str, image: DynamicImage) {
        let mut cache = self.images.lock().unwrap();

        // Evict oldest entries if cache is full
        if cache.len() >= MAX_CACHE_SIZE {
            Self::evict_oldest(&mut cache);
        }

        cache.insert(
            url.to_string(),
            CachedImage {
                image: Arc::new(image),
                last_access: std::time::Instant::now(),
            },
        );
        // The image changed; rendered canvases for it are stale.
        self.canvases
            .lock()
            .unwrap()
            .retain(|key, _| key.url != url);
    }

    /// Get a decoded image from cache.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<Arc<DynamicImage>> {
        let mut cache = self.images.lock().unwrap();
        if let Some(entry) = cache.get_mut(url) {
            entry.last_access = std::time::Instant::now();
            Some(Arc::clone(&entry.image))
        } else {
            None
        }
    }

    /// Check if an image is cached.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.images
            .lock()
            .unwrap()
            .contains_key(url)
    }

    /// The rendered canvas for `url` at a protocol and size, converting and
    /// caching on first use. `None` when the image is not decoded yet.
    #[must_use]
    pub fn canvas(
        &self,
        url: &str,
        protocol: Protocol,
        cols: usize,
        rows: usize,
        cell: super::CellBox,
    ) -> Option<Canvas> {
        let key = CanvasKey {
            url: url.to_string(),
            protocol,
            cols,
            rows,
        };
        if let Some(canvas) = self
            .canvases
            .lock()
            .unwrap()
            .get(&key)
        {
            return Some(canvas.clone());
        }

        let image = self.get(url)?;
        let canvas = super::image_canvas(&image, protocol, cols, rows, cell);
        self.canvases
            .lock()
            .unwrap()
            .insert(key, canvas.clone());
        Some(canvas)
    }

    /// Evict the oldest entry from the cache.
    fn evict_oldest(cache: &mut HashMap<String, CachedImage>) {
        if let Some(oldest_key) = cache
            .iter()
            .min_by_key(|(_, v)| v.last_access)
            .map(|(k, _)| k.clone())
        {
            cache.remove(&oldest_key);
        }
    }

    /// Clear the entire cache.
    pub fn clear(&self) {
        self.images
            .lock()
            .unwrap()
            .clear();
        self.canvases
            .lock()
            .unwrap()
            .clear();
    }

    /// Get the number of cached images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images
            .lock()
            .unwrap()
            .len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::CellBox;

    fn dot() -> DynamicImage {
        DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            4,
            4,
            image::Rgba([1, 2, 3, 255]),
        ))
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ImageCache::new();
        assert!(cache.is_empty());
        cache.insert("a", dot());
        assert!(cache.contains("a"));
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_canvas_requires_decoded_image() {
        let cache = ImageCache::new();
        assert!(
            cache
                .canvas("missing", Protocol::Halfblock, 2, 1, CellBox::default())
                .is_none()
        );

        cache.insert("a", dot());
        let canvas = cache
            .canvas("a", Protocol::Halfblock, 2, 1, CellBox::default())
            .unwrap();
        assert_eq!(canvas.cols(), 2);
        assert_eq!(canvas.rows(), 1);
    }

    #[test]
    fn test_reinsert_invalidates_canvases() {
        let cache = ImageCache::new();
        cache.insert("a", dot());
        let first = cache
            .canvas("a", Protocol::Halfblock, 2, 1, CellBox::default())
            .unwrap();
        cache.insert("a", DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            4,
            4,
            image::Rgba([200, 0, 0, 255]),
        )));
        let second = cache
            .canvas("a", Protocol::Halfblock, 2, 1, CellBox::default())
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_eviction_keeps_size_bounded() {
        let cache = ImageCache::new();
        for i in 0..MAX_CACHE_SIZE + 5 {
            cache.insert(&format!("url-{i}"), dot());
        }
        assert!(cache.len() <= MAX_CACHE_SIZE);
    }
}
