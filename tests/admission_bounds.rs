use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use futures::{stream, TryStreamExt};
use tempfile::TempDir;
use tokio::io::{AsyncRead, ReadBuf};

use memenow_storage_grpc::models::{ObjectInfo, UploadChunk};
use memenow_storage_grpc::storage::ObjectReader;
use memenow_storage_grpc::{
    AdmissionController, AppResult, FileTransferService, FsObjectStore, ObjectStore, Pool,
};

/// Concurrency gauge with a high-water mark.
#[derive(Default)]
struct Gauge {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(self: &Arc<Self>) -> GaugeGuard {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        GaugeGuard(self.clone())
    }

    fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct GaugeGuard(Arc<Gauge>);

impl Drop for GaugeGuard {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Reader that counts as an in-flight transfer until dropped.
struct GuardedReader {
    inner: ObjectReader,
    _guard: GaugeGuard,
}

impl AsyncRead for GuardedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

/// Filesystem store that slows every operation down and records how many
/// transfers and listings touch it at once.
struct TrackingStore {
    inner: FsObjectStore,
    transfers: Arc<Gauge>,
    listings: Arc<Gauge>,
}

#[async_trait]
impl ObjectStore for TrackingStore {
    async fn put(&self, name: &str, content: &[u8]) -> AppResult<()> {
        let _guard = self.transfers.enter();
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.inner.put(name, content).await
    }

    async fn open(&self, name: &str) -> AppResult<ObjectReader> {
        let guard = self.transfers.enter();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let inner = self.inner.open(name).await?;
        Ok(Box::new(GuardedReader {
            inner,
            _guard: guard,
        }))
    }

    async fn list(&self) -> AppResult<Vec<ObjectInfo>> {
        let _guard = self.listings.enter();
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.inner.list().await
    }
}

struct Harness {
    _dir: TempDir,
    service: FileTransferService,
    transfers: Arc<Gauge>,
    listings: Arc<Gauge>,
}

async fn harness(transfer_capacity: usize, list_capacity: usize) -> Harness {
    let dir = TempDir::new().unwrap();
    let transfers = Arc::new(Gauge::default());
    let listings = Arc::new(Gauge::default());
    let store = TrackingStore {
        inner: FsObjectStore::new(dir.path()).await.unwrap(),
        transfers: transfers.clone(),
        listings: listings.clone(),
    };
    let service = FileTransferService::new(
        Arc::new(store),
        Arc::new(AdmissionController::new(transfer_capacity, list_capacity)),
        1024,
    );

    Harness {
        _dir: dir,
        service,
        transfers,
        listings,
    }
}

async fn upload(service: &FileTransferService, name: &str, content: Vec<u8>) -> AppResult<()> {
    let pieces: Vec<AppResult<UploadChunk>> = content
        .chunks(512)
        .map(|piece| Ok(UploadChunk::new(name, piece)))
        .collect();
    service.upload(stream::iter(pieces)).await.map(|_| ())
}

/// Drains a download slowly so the reader stays open across several polls.
async fn slow_download(service: &FileTransferService, name: &str) -> AppResult<usize> {
    let mut chunks = service.download(name).await?;
    let mut total = 0;
    while let Some(chunk) = chunks.try_next().await? {
        total += chunk.len();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    Ok(total)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn mixed_transfer_burst_never_exceeds_shared_capacity() {
    let h = harness(10, 100).await;
    upload(&h.service, "seed.bin", vec![9u8; 3000])
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..30 {
        let service = h.service.clone();
        tasks.push(tokio::spawn(async move {
            upload(&service, &format!("up-{i}.bin"), vec![i as u8; 2048])
                .await
                .is_ok()
        }));
    }
    for _ in 0..30 {
        let service = h.service.clone();
        tasks.push(tokio::spawn(async move {
            slow_download(&service, "seed.bin")
                .await
                .map(|n| n == 3000)
                .unwrap_or(false)
        }));
    }
    // Failing calls must give their slot back too.
    for i in 0..10 {
        let service = h.service.clone();
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                upload(&service, "", vec![1, 2, 3]).await.is_err()
            } else {
                service.download("missing.bin").await.is_err()
            }
        }));
    }

    for task in tasks {
        assert!(task.await.unwrap());
    }

    assert!(h.transfers.peak() <= 10, "peak {}", h.transfers.peak());
    assert!(h.transfers.peak() >= 1);
    assert_eq!(h.transfers.active(), 0);

    let admission = h.service.admission();
    assert_eq!(admission.in_use(Pool::Transfer), 0);
    let drained: Vec<_> = (0..10)
        .map(|_| admission.try_acquire(Pool::Transfer))
        .collect();
    assert!(drained.iter().all(Option::is_some));
    assert!(admission.try_acquire(Pool::Transfer).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn listing_burst_is_bounded_by_list_capacity() {
    let h = harness(10, 5).await;
    upload(&h.service, "a.txt", b"hello".to_vec())
        .await
        .unwrap();

    let tasks: Vec<_> = (0..40)
        .map(|_| {
            let service = h.service.clone();
            tokio::spawn(async move { service.list().await.map(|objects| objects.len()) })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), 1);
    }

    assert!(h.listings.peak() <= 5, "peak {}", h.listings.peak());
    assert_eq!(h.service.admission().in_use(Pool::List), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn default_list_pool_admits_at_most_one_hundred() {
    let h = harness(10, 100).await;

    let tasks: Vec<_> = (0..250)
        .map(|_| {
            let service = h.service.clone();
            tokio::spawn(async move { service.list().await.is_ok() })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap());
    }

    assert!(h.listings.peak() <= 100, "peak {}", h.listings.peak());
    assert_eq!(h.listings.active(), 0);
    assert_eq!(h.service.admission().available(Pool::List), 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn open_downloads_starve_uploads_until_dropped() {
    let h = harness(2, 100).await;
    upload(&h.service, "seed.bin", vec![3u8; 4096])
        .await
        .unwrap();

    let first = h.service.download("seed.bin").await.unwrap();
    let second = h.service.download("seed.bin").await.unwrap();
    assert_eq!(h.service.admission().in_use(Pool::Transfer), 2);

    let service = h.service.clone();
    let mut pending =
        tokio::spawn(async move { upload(&service, "late.bin", vec![1u8; 10]).await });

    let blocked = tokio::time::timeout(Duration::from_millis(100), &mut pending).await;
    assert!(blocked.is_err(), "upload ran while every transfer slot was held");

    drop(first);
    pending.await.unwrap().unwrap();

    drop(second);
    assert_eq!(h.service.admission().in_use(Pool::Transfer), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn listing_proceeds_while_transfers_are_saturated() {
    let h = harness(1, 100).await;
    upload(&h.service, "seed.bin", vec![3u8; 2048])
        .await
        .unwrap();

    let held = h.service.download("seed.bin").await.unwrap();

    let listed = tokio::time::timeout(Duration::from_secs(5), h.service.list())
        .await
        .expect("listing blocked on the transfer pool")
        .unwrap();
    assert_eq!(listed.len(), 1);

    let collected: Vec<Vec<u8>> = held.try_collect().await.unwrap();
    assert_eq!(collected.concat().len(), 2048);
    assert_eq!(h.service.admission().in_use(Pool::Transfer), 0);
    assert!(h.listings.peak() >= 1);
}
