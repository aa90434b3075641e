//! Cover art loader with an in-memory, cost-weighted LRU cache

use std::sync::Arc;

use anyhow::{Context, Result};
use image::DynamicImage;
use lru::LruCache;
use reqwest::{Client, Url};
use tokio::sync::Mutex;

/// Decoded RGBA cost of an image in bytes
pub fn image_cost(image: &DynamicImage) -> usize {
    image.width() as usize * image.height() as usize * 4
}

/// LRU keyed by URL, bounded by the summed cost of its entries rather than by
/// entry count.
pub struct ImageCache {
    entries: LruCache<String, (Arc<DynamicImage>, usize)>,
    total_cost: usize,
    cost_limit: usize,
}

impl ImageCache {
    pub fn new(cost_limit: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            total_cost: 0,
            cost_limit,
        }
    }

    pub fn get(&mut self, url: &str) -> Option<Arc<DynamicImage>> {
        self.entries.get(url).map(|(image, _)| image.clone())
    }

    /// Insert, evicting least recently used entries until the limit holds.
    /// An image costlier than the whole budget is not cached at all.
    pub fn insert(&mut self, url: String, image: Arc<DynamicImage>, cost: usize) {
        if cost > self.cost_limit {
            tracing::debug!(url = %url, cost, limit = self.cost_limit, "Image too large to cache");
            return;
        }

        if let Some((_, old_cost)) = self.entries.put(url, (image, cost)) {
            self.total_cost -= old_cost;
        }
        self.total_cost += cost;

        while self.total_cost > self.cost_limit {
            match self.entries.pop_lru() {
                Some((evicted, (_, evicted_cost))) => {
                    tracing::trace!(url = %evicted, cost = evicted_cost, "Evicted cover art");
                    self.total_cost -= evicted_cost;
                }
                None => break,
            }
        }
    }

    #[cfg(test)]
    pub fn total_cost(&self) -> usize {
        self.total_cost
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains(url)
    }
}

#[derive(Clone)]
pub struct ArtworkLoader {
    http: Client,
    cache: Arc<Mutex<ImageCache>>,
}

impl ArtworkLoader {
    pub fn new(http: Client, cost_limit: usize) -> Self {
        Self {
            http,
            cache: Arc::new(Mutex::new(ImageCache::new(cost_limit))),
        }
    }

    /// Cached image for `url` without touching the network
    pub async fn cached(&self, url: &Url) -> Option<Arc<DynamicImage>> {
        self.cache.lock().await.get(url.as_str())
    }

    /// Return the decoded image for `url`, hitting the network only on a miss
    pub async fn fetch_image(&self, url: &Url) -> Result<Arc<DynamicImage>> {
        if let Some(hit) = self.cached(url).await {
            return Ok(hit);
        }

        tracing::debug!(url = %url, "Fetching cover art");
        let bytes = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()?
            .bytes()
            .await
            .context("failed to read image body")?;

        let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .context("image decode task panicked")?
            .context("cannot decode image data")?;

        let cost = image_cost(&image);
        let image = Arc::new(image);
        self.cache
            .lock()
            .await
            .insert(url.to_string(), image.clone(), cost);

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::time::Duration;

    fn solid(width: u32, height: u32) -> Arc<DynamicImage> {
        Arc::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 20, 30]))))
    }

    #[test]
    fn test_cost_is_rgba_bytes() {
        assert_eq!(image_cost(&solid(10, 5)), 200);
    }

    #[test]
    fn test_evicts_least_recently_used_under_cost_limit() {
        // each 10x10 image costs 400
        let mut cache = ImageCache::new(1000);
        cache.insert("a".into(), solid(10, 10), 400);
        cache.insert("b".into(), solid(10, 10), 400);

        // touch "a" so "b" becomes the eviction candidate
        assert!(cache.get("a").is_some());
        cache.insert("c".into(), solid(10, 10), 400);

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.total_cost(), 800);
    }

    #[test]
    fn test_total_cost_never_exceeds_limit() {
        let mut cache = ImageCache::new(1000);
        for (i, side) in [3u32, 9, 12, 4, 15, 7, 1].iter().enumerate() {
            let image = solid(*side, *side);
            let cost = image_cost(&image);
            cache.insert(format!("img{i}"), image, cost);
            assert!(cache.total_cost() <= 1000);
        }
    }

    #[test]
    fn test_oversized_image_is_not_cached() {
        let mut cache = ImageCache::new(100);
        cache.insert("small".into(), solid(2, 2), 16);
        cache.insert("huge".into(), solid(100, 100), 40_000);
        assert!(!cache.contains("huge"));
        assert!(cache.contains("small"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_replacing_entry_updates_cost() {
        let mut cache = ImageCache::new(1000);
        cache.insert("a".into(), solid(10, 10), 400);
        cache.insert("a".into(), solid(5, 5), 100);
        assert_eq!(cache.total_cost(), 100);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let mut png = Vec::new();
        solid(4, 4)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        // the server answers exactly one request; a second network hit would time out
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr();
        std::thread::spawn(move || {
            if let Ok(req) = server.recv() {
                let _ = req.respond(tiny_http::Response::from_data(png));
            }
        });

        let http = Client::builder().timeout(Duration::from_secs(2)).build().unwrap();
        let loader = ArtworkLoader::new(http, 1 << 20);
        let url = Url::parse(&format!("http://{}/cover.png", addr)).unwrap();

        let first = loader.fetch_image(&url).await.unwrap();
        assert_eq!(first.width(), 4);
        let second = loader.fetch_image(&url).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_an_error() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr();
        std::thread::spawn(move || {
            if let Ok(req) = server.recv() {
                let _ = req.respond(tiny_http::Response::from_string("not an image"));
            }
        });

        let http = Client::builder().timeout(Duration::from_secs(2)).build().unwrap();
        let loader = ArtworkLoader::new(http, 1 << 20);
        let url = Url::parse(&format!("http://{}/cover.png", addr)).unwrap();
        assert!(loader.fetch_image(&url).await.is_err());
        assert!(loader.cached(&url).await.is_none());
    }
}
