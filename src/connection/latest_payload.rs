use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Single overwrite-only slot holding the most recent inbound payload.
///
/// Written by the receive loop, read by the dispatcher on every tick. Not a
/// queue: a store replaces whatever the consumer has not looked at yet.
#[derive(Default)]
pub struct LatestPayload {
    slot: ArcSwapOption<String>,
}

impl LatestPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(
        &self,
        payload: String,
    ) {
        self.slot.store(Some(Arc::new(payload)));
    }

    pub fn load(&self) -> Option<Arc<String>> {
        self.slot.load_full()
    }
}

impl std::fmt::Debug for LatestPayload {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("LatestPayload").field("slot", &self.load()).finish()
    }
}
