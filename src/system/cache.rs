//! 압축 파일 메타데이터 캐시
//!
//! 용량을 넘으면 가장 먼저 들어온 항목부터 제거한다 (FIFO).
//! 조회(hit)는 순서를 갱신하지 않는다.

use crate::models::ArchiveMetadata;
use crate::system::archive::read_metadata;
use crate::utils::error::Result;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// 스레드 간 공유용. 잠금은 조회와 삽입 동안만 잡고 압축 파일 읽기 중에는 풀어 둔다.
pub type SharedMetadataCache = Arc<Mutex<ArchiveMetadataCache>>;

#[derive(Debug)]
pub struct ArchiveMetadataCache {
    capacity: usize,
    entries: HashMap<PathBuf, ArchiveMetadata>,
    /// 삽입 순서 (앞이 가장 오래됨)
    order: VecDeque<PathBuf>,
}

impl ArchiveMetadataCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn shared(capacity: usize) -> SharedMetadataCache {
        Arc::new(Mutex::new(Self::new(capacity)))
    }

    /// 캐시에 있으면 그대로, 없으면 압축 파일을 읽어 저장 후 반환
    pub fn get(&mut self, path: &Path) -> Result<ArchiveMetadata> {
        self.get_with(path, read_metadata)
    }

    /// `get` 과 같되 캐시 미스 시 사용할 로더를 지정
    pub fn get_with<F>(&mut self, path: &Path, load: F) -> Result<ArchiveMetadata>
    where
        F: FnOnce(&Path) -> Result<ArchiveMetadata>,
    {
        if let Some(meta) = self.lookup(path) {
            return Ok(meta);
        }
        let meta = load(path)?;
        self.insert(path.to_path_buf(), meta.clone());
        Ok(meta)
    }

    /// 저장된 값 조회. 순서는 바뀌지 않는다
    pub fn lookup(&self, path: &Path) -> Option<ArchiveMetadata> {
        let meta = self.entries.get(path)?;
        debug!(archive = %path.display(), "metadata cache hit");
        Some(meta.clone())
    }

    /// 저장 후 용량을 넘으면 가장 오래된 항목부터 제거. 이미 있는 경로는 값만 바뀐다
    pub fn insert(&mut self, path: PathBuf, meta: ArchiveMetadata) {
        if self.entries.insert(path.clone(), meta).is_none() {
            self.order.push_back(path);
        }
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            debug!(archive = %oldest.display(), "metadata cache evicted");
        }
    }

    /// 한 경로의 캐시를 버린다. 제거되었으면 true
    pub fn invalidate(&mut self, path: &Path) -> bool {
        if self.entries.remove(path).is_none() {
            return false;
        }
        self.order.retain(|p| p != path);
        true
    }
}

#[cfg(test)]
impl ArchiveMetadataCache {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }
}

/// 공유 캐시 경유 조회. 미스 시 잠금 없이 압축 파일을 읽는다
pub fn fetch(cache: &SharedMetadataCache, path: &Path) -> Result<ArchiveMetadata> {
    fetch_with(cache, path, read_metadata)
}

/// `fetch` 와 같되 캐시 미스 시 사용할 로더를 지정
pub fn fetch_with<F>(cache: &SharedMetadataCache, path: &Path, load: F) -> Result<ArchiveMetadata>
where
    F: FnOnce(&Path) -> Result<ArchiveMetadata>,
{
    let cached = lock(cache).lookup(path);
    if let Some(meta) = cached {
        return Ok(meta);
    }

    let meta = load(path)?;
    lock(cache).insert(path.to_path_buf(), meta.clone());
    Ok(meta)
}

/// 오염된 잠금도 그대로 사용
pub fn lock(cache: &SharedMetadataCache) -> MutexGuard<'_, ArchiveMetadataCache> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArchiveEntry;
    use crate::utils::error::ZipperError;
    use std::cell::Cell;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn fake_meta(size: u64) -> ArchiveMetadata {
        ArchiveMetadata::from_entries(vec![ArchiveEntry {
            path: "file.txt".to_string(),
            size,
            modified: None,
            is_dir: false,
        }])
    }

    fn path(i: usize) -> PathBuf {
        PathBuf::from(format!("/archives/{}.zip", i))
    }

    #[test]
    fn test_hit_does_not_reload() {
        let mut cache = ArchiveMetadataCache::new(10);
        let loads = Cell::new(0);
        let loader = |_: &Path| {
            loads.set(loads.get() + 1);
            Ok(fake_meta(7))
        };

        let first = cache.get_with(&path(1), loader).unwrap();
        let second = cache.get_with(&path(1), loader).unwrap();
        assert_eq!(first, second);
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn test_fifo_eviction_ignores_access_order() {
        let mut cache = ArchiveMetadataCache::new(10);
        for i in 1..=10 {
            cache.get_with(&path(i), |_| Ok(fake_meta(i as u64))).unwrap();
        }
        assert_eq!(cache.len(), 10);

        // 가장 오래된 항목을 바로 전에 조회해도 순서는 바뀌지 않는다
        cache
            .get_with(&path(1), |_| panic!("must be served from cache"))
            .unwrap();
        cache.get_with(&path(11), |_| Ok(fake_meta(11))).unwrap();

        assert_eq!(cache.len(), 10);
        assert!(!cache.contains(&path(1)));
        for i in 2..=11 {
            assert!(cache.contains(&path(i)), "path {} should remain", i);
        }
    }

    #[test]
    fn test_failed_load_inserts_nothing() {
        let mut cache = ArchiveMetadataCache::new(2);
        let result = cache.get_with(&path(1), |p| {
            Err(ZipperError::NotAnArchive {
                path: p.to_path_buf(),
                reason: "broken".to_string(),
            })
        });
        assert!(matches!(result, Err(ZipperError::NotAnArchive { .. })));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_frees_a_slot() {
        let mut cache = ArchiveMetadataCache::new(3);
        for i in 1..=3 {
            cache.get_with(&path(i), |_| Ok(fake_meta(1))).unwrap();
        }
        assert!(cache.invalidate(&path(2)));
        assert!(!cache.invalidate(&path(2)));
        assert_eq!(cache.len(), 2);

        // 제거된 자리만큼 여유가 생겨 다음 삽입에서 아무것도 빠지지 않음
        cache.get_with(&path(4), |_| Ok(fake_meta(1))).unwrap();
        assert!(cache.contains(&path(1)));
        cache.get_with(&path(5), |_| Ok(fake_meta(1))).unwrap();
        assert!(!cache.contains(&path(1)));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut cache = ArchiveMetadataCache::new(0);
        cache.get_with(&path(1), |_| Ok(fake_meta(1))).unwrap();
        cache.get_with(&path(2), |_| Ok(fake_meta(1))).unwrap();
        assert!(cache.contains(&path(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_reads_real_archive_once_then_serves_stale() {
        let temp = tempdir().unwrap();
        let archive = temp.path().join("real.zip");
        let mut writer = ZipWriter::new(fs::File::create(&archive).unwrap());
        writer
            .start_file("hello.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"hello").unwrap();
        writer.finish().unwrap();

        let mut cache = ArchiveMetadataCache::new(10);
        let meta = cache.get(&archive).unwrap();
        assert_eq!(meta.entry_count, 1);
        assert_eq!(meta.total_size, 5);

        // 파일이 사라져도 캐시된 값이 반환됨 (무효화 전까지)
        fs::remove_file(&archive).unwrap();
        assert_eq!(cache.get(&archive).unwrap(), meta);

        cache.invalidate(&archive);
        assert!(matches!(
            cache.get(&archive),
            Err(ZipperError::NotFound { .. })
        ));
    }

    #[test]
    fn test_shared_fetch_loads_without_holding_the_lock() {
        let cache = ArchiveMetadataCache::shared(4);
        let meta = fetch_with(&cache, &path(1), |_| {
            // 읽는 동안 다른 스레드가 캐시를 쓸 수 있어야 한다
            assert!(cache.try_lock().is_ok(), "cache locked during load");
            Ok(fake_meta(3))
        })
        .unwrap();
        assert_eq!(meta.total_size, 3);
        assert!(lock(&cache).contains(&path(1)));

        let hit = fetch_with(&cache, &path(1), |_| panic!("must be served from cache")).unwrap();
        assert_eq!(hit, meta);
    }

    #[test]
    fn test_shared_fetch_failure_inserts_nothing() {
        let cache = ArchiveMetadataCache::shared(4);
        let missing = tempdir().unwrap().path().join("gone.zip");
        assert!(matches!(
            fetch(&cache, &missing),
            Err(ZipperError::NotFound { .. })
        ));
        assert!(lock(&cache).is_empty());
    }

    #[test]
    fn test_insert_existing_path_keeps_position() {
        let mut cache = ArchiveMetadataCache::new(2);
        cache.insert(path(1), fake_meta(1));
        cache.insert(path(2), fake_meta(2));
        cache.insert(path(1), fake_meta(5));
        assert_eq!(cache.lookup(&path(1)).map(|m| m.total_size), Some(5));

        cache.insert(path(3), fake_meta(3));
        assert!(!cache.contains(&path(1)));
        assert!(cache.contains(&path(2)));
    }
}
