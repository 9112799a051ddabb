use iced::widget::image::Handle;
use pdf_viewport_core::{RenderRequest, RenderToken};
use std::collections::{HashMap, VecDeque};

/// Rendered page kept for redisplay
#[derive(Debug, Clone)]
struct CachedPage {
    width: u32,
    handle: Handle,
}

/// Rendered pages of the open document, keyed by render token.
///
/// The page on screen and the one waiting to replace it must both survive
/// eviction, otherwise a zoom change would blank the viewport.
#[derive(Debug)]
pub struct PageCache {
    limit: usize,
    pages: HashMap<RenderToken, CachedPage>,
    order: VecDeque<RenderToken>,
}

impl PageCache {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(2),
            pages: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, token: &RenderToken) -> Option<Handle> {
        self.pages.get(token).map(|page| page.handle.clone())
    }

    /// True when this exact request (token and width) has been drawn
    pub fn contains(&self, request: &RenderRequest) -> bool {
        self.pages
            .get(&request.token)
            .is_some_and(|page| page.width == request.width)
    }

    pub fn insert(&mut self, request: &RenderRequest, handle: Handle, keep: &[RenderToken]) {
        let token = request.token;
        self.pages.insert(
            token,
            CachedPage {
                width: request.width,
                handle,
            },
        );
        self.order.retain(|cached| *cached != token);
        self.order.push_back(token);

        while self.pages.len() > self.limit {
            let Some(index) = self.order.iter().position(|cached| !keep.contains(cached)) else {
                break;
            };
            if let Some(evicted) = self.order.remove(index) {
                self.pages.remove(&evicted);
                tracing::trace!(page = evicted.page, scale = %evicted.scale, "evicted rendered page");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_viewport_core::{Rotation, Scale};

    fn request(page: u32, width: u32) -> RenderRequest {
        RenderRequest {
            token: RenderToken {
                page,
                scale: Scale::ACTUAL_SIZE,
                rotation: Rotation::NONE,
            },
            width,
        }
    }

    fn pixel() -> Handle {
        Handle::from_rgba(1, 1, vec![0u8, 0, 0, 255])
    }

    #[test]
    fn width_is_part_of_a_hit() {
        let mut cache = PageCache::new(4);
        cache.insert(&request(1, 600), pixel(), &[]);
        assert!(cache.contains(&request(1, 600)));
        assert!(!cache.contains(&request(1, 800)));
        assert!(cache.get(&request(1, 800).token).is_some());
    }

    #[test]
    fn evicts_oldest_but_keeps_visible_pages() {
        let mut cache = PageCache::new(2);
        let shown = request(1, 600);
        cache.insert(&shown, pixel(), &[shown.token]);
        cache.insert(&request(2, 600), pixel(), &[shown.token]);
        cache.insert(&request(3, 600), pixel(), &[shown.token]);

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&shown));
        assert!(!cache.contains(&request(2, 600)));
        assert!(cache.contains(&request(3, 600)));
    }

    #[test]
    fn clear_empties_cache() {
        let mut cache = PageCache::new(3);
        cache.insert(&request(1, 10), pixel(), &[]);
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
