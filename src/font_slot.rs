use std::sync::Arc;

use parking_lot::RwLock;

use crate::metrics::GlyphMetrics;

/// Metrics snapshot shared between a font loader and any number of layouts.
pub type SharedMetrics = Arc<dyn GlyphMetrics + Send + Sync>;

/// Shared handle through which a font loader announces that metrics are ready.
///
/// A slot starts empty. The loader builds a complete metrics value first and
/// then hands it over with [`FontSlot::publish`], so readers only ever observe
/// "not ready" or a fully initialized snapshot. Every publish or unload bumps
/// the generation, which lets layouts notice the change on their next read.
///
/// Clones refer to the same slot.
#[derive(Clone, Default)]
pub struct FontSlot {
    inner: Arc<RwLock<SlotState>>,
}

#[derive(Default)]
struct SlotState {
    metrics: Option<SharedMetrics>,
    generation: u64,
}

impl FontSlot {
    /// Creates a slot that is not ready yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot that already holds `metrics`.
    pub fn ready(metrics: impl GlyphMetrics + Send + Sync + 'static) -> Self {
        let slot = Self::new();
        slot.publish(metrics);
        slot
    }

    /// Installs a new metrics snapshot, replacing any previous one.
    pub fn publish(&self, metrics: impl GlyphMetrics + Send + Sync + 'static) {
        self.publish_shared(Arc::new(metrics));
    }

    /// Same as [`Self::publish`] for a snapshot that is already shared.
    pub fn publish_shared(&self, metrics: SharedMetrics) {
        let mut state = self.inner.write();
        state.metrics = Some(metrics);
        state.generation = state.generation.wrapping_add(1);
        log::debug!("font metrics published (generation {})", state.generation);
    }

    /// Drops the current snapshot; layouts reading the slot produce no lines
    /// until something is published again.
    pub fn unload(&self) {
        let mut state = self.inner.write();
        if state.metrics.take().is_some() {
            state.generation = state.generation.wrapping_add(1);
            log::debug!("font metrics unloaded (generation {})", state.generation);
        }
    }

    /// `true` once a snapshot has been published and not unloaded since.
    pub fn is_ready(&self) -> bool {
        self.inner.read().metrics.is_some()
    }

    /// Counter that changes on every publish and unload.
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Current snapshot together with the generation it belongs to.
    pub fn snapshot(&self) -> (u64, Option<SharedMetrics>) {
        let state = self.inner.read();
        (state.generation, state.metrics.clone())
    }

    /// Current snapshot, if ready.
    pub fn metrics(&self) -> Option<SharedMetrics> {
        self.inner.read().metrics.clone()
    }

    /// `true` when both handles refer to the same slot.
    pub fn same_slot(&self, other: &FontSlot) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for FontSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read();
        f.debug_struct("FontSlot")
            .field("ready", &state.metrics.is_some())
            .field("generation", &state.generation)
            .finish()
    }
}
