use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use trawler_types::models::Brand;

use crate::backend::ReputationBackend;

/// Most choices a chat autocomplete will accept.
pub const MAX_CHOICES: usize = 25;

/// Fallback catalogue used while the backend cannot be reached.
pub fn static_brands() -> Vec<Brand> {
    vec![
        Brand::new("CRYPTO", "Generic: Crypto"),
        Brand::new("CSGO", "Counter-Strike"),
        Brand::new("DISCORD", "Discord Inc."),
        Brand::new("ROBLOX", "Roblox Corporation"),
        Brand::new("STEAM", "Steam"),
        Brand::new("TWITCH", "Twitch Interactive, Inc."),
        Brand::new("OTHER", "Other"),
    ]
}

/// Lazily populated brand catalogue.
///
/// The first successful fetch is kept for the life of the process. A failed
/// or empty fetch serves the static table and is not cached, so the next
/// call tries the backend again.
pub struct BrandCache {
    backend: Arc<dyn ReputationBackend>,
    cached: RwLock<Option<Arc<[Brand]>>>,
}

impl BrandCache {
    pub fn new(backend: Arc<dyn ReputationBackend>) -> Self {
        Self {
            backend,
            cached: RwLock::new(None),
        }
    }

    pub async fn brands(&self) -> Arc<[Brand]> {
        if let Some(brands) = self.cached.read().await.as_ref() {
            return brands.clone();
        }

        let mut slot = self.cached.write().await;
        // Another task may have filled it while we waited for the lock
        if let Some(brands) = slot.as_ref() {
            return brands.clone();
        }

        match self.backend.brands().await {
            Ok(brands) if !brands.is_empty() => {
                info!("Brand list populated with {} entries", brands.len());
                let brands: Arc<[Brand]> = brands.into();
                *slot = Some(brands.clone());
                brands
            }
            Ok(_) => {
                warn!("Backend returned an empty brand list, using static table");
                static_brands().into()
            }
            Err(e) => {
                warn!("Brand list fetch failed, using static table: {}", e);
                static_brands().into()
            }
        }
    }

    /// Case-insensitive substring search, capped at [`MAX_CHOICES`].
    pub async fn search(&self, query: &str) -> Vec<Brand> {
        let query = query.trim().to_lowercase();
        self.brands()
            .await
            .iter()
            .filter(|b| query.is_empty() || b.name.to_lowercase().contains(&query))
            .take(MAX_CHOICES)
            .cloned()
            .collect()
    }

    /// Exact match on the display name chosen by the user.
    pub async fn resolve(&self, name: &str) -> Option<Brand> {
        self.brands().await.iter().find(|b| b.name == name).cloned()
    }
}
