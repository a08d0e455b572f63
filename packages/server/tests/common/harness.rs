// Pipeline harness wired to mock dependencies

use async_trait::async_trait;
use review_extraction::testing::MockFetcher;
use review_extraction::{FetchResult, PageFetcher, SitejabberAdapter, TrustpilotAdapter};
use server_core::domains::reviews::{Diagnostics, ReviewPipeline, SourceTarget};
use server_core::kernel::{MockReviewStore, ServerDeps, TestDependencies};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

use super::fixtures::{SITEJABBER_URL, TRUSTPILOT_URL};

pub struct TestHarness {
    pub pipeline: Arc<ReviewPipeline>,
    pub fetcher: MockFetcher,
    pub store: MockReviewStore,
}

impl TestHarness {
    pub fn new(fetcher: MockFetcher) -> Self {
        Self::with_store(fetcher, MockReviewStore::new())
    }

    pub fn with_store(fetcher: MockFetcher, store: MockReviewStore) -> Self {
        let deps = TestDependencies::new()
            .mock_fetcher(fetcher.clone())
            .mock_store(store.clone());
        let pipeline = Arc::new(ReviewPipeline::new(
            &deps.into_server_deps(),
            default_targets(),
            Diagnostics::new(),
        ));

        Self {
            pipeline,
            fetcher,
            store,
        }
    }

    /// Harness whose fetches block until the returned opener is used
    pub fn gated(fetcher: MockFetcher) -> (Self, GateOpener, Arc<Notify>) {
        let gated = GatedFetcher::new(fetcher.clone());
        let opener = gated.opener();
        let entered = gated.entered();
        let store = MockReviewStore::new();
        let deps = ServerDeps::new(Arc::new(gated), Arc::new(store.clone()));
        let pipeline = Arc::new(ReviewPipeline::new(
            &deps,
            default_targets(),
            Diagnostics::new(),
        ));

        (
            Self {
                pipeline,
                fetcher,
                store,
            },
            opener,
            entered,
        )
    }
}

/// Trustpilot then Sitejabber, pointed at the fixture URLs
pub fn default_targets() -> Vec<SourceTarget> {
    vec![
        SourceTarget::new(Arc::new(TrustpilotAdapter::new()), TRUSTPILOT_URL),
        SourceTarget::new(Arc::new(SitejabberAdapter::new()), SITEJABBER_URL),
    ]
}

/// Fetcher that holds every request until the gate is opened
pub struct GatedFetcher {
    inner: MockFetcher,
    gate: Arc<Semaphore>,
    entered: Arc<Notify>,
}

impl GatedFetcher {
    pub fn new(inner: MockFetcher) -> Self {
        Self {
            inner,
            gate: Arc::new(Semaphore::new(0)),
            entered: Arc::new(Notify::new()),
        }
    }

    /// Handle that opens the gate for every pending and later request
    pub fn opener(&self) -> GateOpener {
        GateOpener(self.gate.clone())
    }

    /// Notified once a request is waiting at the gate
    pub fn entered(&self) -> Arc<Notify> {
        self.entered.clone()
    }
}

pub struct GateOpener(Arc<Semaphore>);

impl GateOpener {
    pub fn open(&self) {
        self.0.add_permits(1);
    }
}

#[async_trait]
impl PageFetcher for GatedFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.entered.notify_one();
        // Permit goes straight back, so one open lets every request through
        drop(self.gate.acquire().await.unwrap());
        self.inner.fetch(url).await
    }
}
