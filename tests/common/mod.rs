#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use chrono::Utc;
use shortener_gateway::application::services::{CacheAsideResolver, ResolutionGateway};
use shortener_gateway::clock::ManualClock;
use shortener_gateway::domain::client_registry::{ClientRegistry, DEFAULT_IDLE_TIMEOUT};
use shortener_gateway::domain::entities::{NewShortLink, ShortLink};
use shortener_gateway::domain::repositories::LinkRepository;
use shortener_gateway::domain::token_bucket::RateLimitPolicy;
use shortener_gateway::error::StoreError;
use shortener_gateway::infrastructure::cache::InMemoryCache;
use shortener_gateway::routes::app_router;
use shortener_gateway::state::AppState;
use shortener_gateway::utils::code_generator::RandomCodeGenerator;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::Layer;

pub const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Link store kept in a `Vec`, counting lookups so tests can tell cache hits
/// from store reads.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<ShortLink>>,
    reads: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryLinkRepository {
    pub fn seed(&self, code: &str, long_url: &str) {
        let mut links = self.links.lock().unwrap();
        let id = links.len() as i64 + 1;
        links.push(ShortLink::new(
            id,
            code.to_string(),
            long_url.to_string(),
            Utc::now(),
        ));
    }

    pub fn store_reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, StoreError> {
        self.check_available()?;

        let mut links = self.links.lock().unwrap();
        if links.iter().any(|l| l.code == new_link.code) {
            return Err(StoreError::Duplicate {
                code: new_link.code,
            });
        }

        let link = ShortLink::new(
            links.len() as i64 + 1,
            new_link.code,
            new_link.long_url,
            Utc::now(),
        );
        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, StoreError> {
        self.check_available()?;
        self.reads.fetch_add(1, Ordering::SeqCst);

        let links = self.links.lock().unwrap();
        Ok(links.iter().find(|l| l.code == code).cloned())
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<ShortLink>, StoreError> {
        self.check_available()?;

        let links = self.links.lock().unwrap();
        Ok(links
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst)
    }
}

/// Injects a fixed peer address, standing in for `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer {
    addr: SocketAddr,
}

impl MockConnectInfoLayer {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }
}

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.addr,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}

/// A running test application and handles on its collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<InMemoryLinkRepository>,
    pub cache: Arc<InMemoryCache>,
    pub clock: Arc<ManualClock>,
    pub registry: Arc<ClientRegistry>,
}

/// Serves the production router, middleware included, over in-memory
/// collaborators.
///
/// The app trusts `X-Forwarded-For`, so tests pick a client identity per
/// request. Requests without the header come from `127.0.0.1`.
pub fn spawn_app() -> TestApp {
    let clock = Arc::new(ManualClock::new());
    let repo = Arc::new(InMemoryLinkRepository::default());
    let cache = Arc::new(InMemoryCache::new(1000, clock.clone()));

    let resolver = Arc::new(CacheAsideResolver::new(
        repo.clone(),
        cache.clone(),
        CACHE_TTL,
    ));
    let registry = Arc::new(ClientRegistry::new(
        RateLimitPolicy::default(),
        DEFAULT_IDLE_TIMEOUT,
        clock.clone(),
    ));
    let gateway = Arc::new(ResolutionGateway::new(
        registry.clone(),
        resolver,
        Arc::new(RandomCodeGenerator),
    ));

    let state = AppState::new(gateway, cache.clone(), true);

    let peer = MockConnectInfoLayer::new("127.0.0.1:12345".parse().unwrap());
    let app = Router::new().fallback_service(peer.layer(app_router(state)));

    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        repo,
        cache,
        clock,
        registry,
    }
}
