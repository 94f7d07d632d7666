//! 파일 인덱스와 인덱스 기반 resolver
//!
//! 디렉토리, 단일 파일, 스쿼시된 이미지 레이어는 모두 같은 [`FileIndex`]로
//! 정리되고, [`IndexResolver`]가 그 위에서 [`Resolver`] 계약을 구현합니다.
//!
//! # 인덱스 구성
//!
//! - 경로 -> 항목 (`by_path`)
//! - 파일 이름 -> 항목 목록 (`by_basename`)
//! - 확장자 -> 항목 목록 (`by_extension`)
//! - MIME 타입 -> 일반 파일 목록 (`by_mime`)
//!
//! 심볼릭 링크는 질의 시점에 인덱스 안에서 해석하며 소스 밖으로 나가지 않습니다.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use strata_core::metrics as m;

use crate::error::SourceError;
use crate::location::{Coordinates, FileRef, Location};
use crate::metadata::{FileMetadata, FileType};
use crate::mime;
use crate::paths;
use crate::resolver::{FileContents, Resolver};
use crate::stream::LocationStream;

/// 심볼릭 링크를 따라가는 최대 횟수
pub const MAX_LINK_DEPTH: usize = 40;

/// 항목 내용의 실제 저장 위치
#[derive(Debug, Clone)]
pub(crate) enum Backing {
    /// 호스트 파일시스템 경로
    Disk(PathBuf),
    /// 메모리 내 바이트
    Memory(Arc<[u8]>),
    /// 내용 없음 (디렉토리, 링크, 특수 파일)
    Empty,
}

/// 인덱스 항목 하나
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// 소스 루트 기준 경로 (`/`로 시작)
    pub path: String,
    /// 파일 메타데이터
    pub metadata: FileMetadata,
    /// 항목을 제공한 파일시스템(레이어) 식별자
    pub file_system_id: String,
    pub(crate) backing: Backing,
}

impl IndexEntry {
    /// 호스트 파일을 내용으로 가지는 항목
    pub fn on_disk(path: &str, metadata: FileMetadata, host_path: PathBuf) -> Self {
        let backing = if metadata.is_regular() {
            Backing::Disk(host_path)
        } else {
            Backing::Empty
        };
        Self {
            path: paths::clean(path),
            metadata,
            file_system_id: String::new(),
            backing,
        }
    }

    /// 메모리 내용을 가지는 일반 파일 항목. MIME 타입은 내용으로 판별합니다.
    pub fn in_memory(path: &str, contents: impl Into<Vec<u8>>) -> Self {
        let contents: Vec<u8> = contents.into();
        let head = &contents[..contents.len().min(mime::SNIFF_LEN)];
        let metadata = FileMetadata {
            mode: 0o644,
            file_type: FileType::RegularFile,
            size: contents.len() as u64,
            mime_type: mime::sniff(head).to_owned(),
            ..FileMetadata::default()
        };
        Self {
            path: paths::clean(path),
            metadata,
            file_system_id: String::new(),
            backing: Backing::Memory(Arc::from(contents)),
        }
    }

    /// 디렉토리 항목
    pub fn directory(path: &str) -> Self {
        Self {
            path: paths::clean(path),
            metadata: FileMetadata {
                mode: 0o755,
                file_type: FileType::Directory,
                ..FileMetadata::default()
            },
            file_system_id: String::new(),
            backing: Backing::Empty,
        }
    }

    /// 심볼릭 링크 항목. 절대 대상은 소스 루트 기준으로 해석됩니다.
    pub fn symlink(path: &str, destination: &str) -> Self {
        Self {
            path: paths::clean(path),
            metadata: FileMetadata {
                mode: 0o777,
                file_type: FileType::SymbolicLink,
                link_destination: destination.to_owned(),
                ..FileMetadata::default()
            },
            file_system_id: String::new(),
            backing: Backing::Empty,
        }
    }

    /// 파일시스템(레이어) 식별자를 지정합니다.
    pub fn with_file_system_id(mut self, id: impl Into<String>) -> Self {
        self.file_system_id = id.into();
        self
    }

    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.path.clone(), self.file_system_id.clone())
    }
}

/// [`FileIndex`] 빌더
///
/// 같은 경로를 다시 추가하면 나중 항목이 이깁니다 (상위 레이어 우선).
#[derive(Debug, Default)]
pub struct FileIndexBuilder {
    entries: BTreeMap<String, IndexEntry>,
}

impl FileIndexBuilder {
    /// 빈 빌더
    pub fn new() -> Self {
        Self::default()
    }

    /// 항목을 추가합니다. 없는 상위 디렉토리는 함께 만들어집니다.
    pub fn add(&mut self, entry: IndexEntry) -> &mut Self {
        let mut dir = paths::parent(&entry.path).to_owned();
        loop {
            if !self.entries.contains_key(&dir) {
                let parent_entry = IndexEntry::directory(&dir)
                    .with_file_system_id(entry.file_system_id.clone());
                self.entries.insert(dir.clone(), parent_entry);
            }
            if dir == "/" {
                break;
            }
            dir = paths::parent(&dir).to_owned();
        }
        self.entries.insert(entry.path.clone(), entry);
        self
    }

    /// 경로와 그 하위 항목을 모두 제거합니다.
    pub fn remove_tree(&mut self, path: &str) -> &mut Self {
        let path = paths::clean(path);
        self.entries.remove(&path);
        self.remove_children(&path)
    }

    /// 디렉토리의 하위 항목만 제거합니다 (디렉토리 자체는 유지).
    pub fn remove_children(&mut self, dir: &str) -> &mut Self {
        let dir = paths::clean(dir);
        let prefix = if dir == "/" { dir } else { format!("{dir}/") };
        let doomed: Vec<String> = self
            .entries
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .map(|(k, _)| k.clone())
            .collect();
        for key in doomed {
            if key != "/" {
                self.entries.remove(&key);
            }
        }
        self
    }

    /// 경로가 이미 있는지 확인합니다.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(&paths::clean(path))
    }

    /// 인덱스를 완성합니다. 항목은 경로 순으로 정렬됩니다.
    pub fn build(self) -> FileIndex {
        let entries: Vec<IndexEntry> = self.entries.into_values().collect();
        let mut by_path = HashMap::with_capacity(entries.len());
        let mut by_basename: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_extension: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_mime: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            by_path.insert(entry.path.clone(), idx);
            if entry.metadata.is_dir() {
                continue;
            }
            by_basename
                .entry(paths::basename(&entry.path).to_owned())
                .or_default()
                .push(idx);
            if let Some(ext) = paths::extension(&entry.path) {
                by_extension.entry(ext.to_owned()).or_default().push(idx);
            }
            if entry.metadata.is_regular() && !entry.metadata.mime_type.is_empty() {
                by_mime
                    .entry(entry.metadata.mime_type.clone())
                    .or_default()
                    .push(idx);
            }
        }

        metrics::counter!(m::SOURCE_FILES_INDEXED_TOTAL).increment(entries.len() as u64);
        debug!(entries = entries.len(), "file index built");

        FileIndex {
            entries,
            by_path,
            by_basename,
            by_extension,
            by_mime,
        }
    }
}

/// 질의용으로 완성된 파일 인덱스 (불변)
#[derive(Debug)]
pub struct FileIndex {
    entries: Vec<IndexEntry>,
    by_path: HashMap<String, usize>,
    by_basename: HashMap<String, Vec<usize>>,
    by_extension: HashMap<String, Vec<usize>>,
    by_mime: HashMap<String, Vec<usize>>,
}

impl FileIndex {
    /// 항목 개수 (디렉토리 포함)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 경로 순으로 모든 항목을 순회합니다.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// 경로의 항목을 링크를 따라가지 않고 조회합니다.
    pub fn get(&self, path: &str) -> Option<&IndexEntry> {
        self.by_path
            .get(&paths::clean(path))
            .map(|&idx| &self.entries[idx])
    }

    /// 경로를 구성 요소 단위로 해석합니다. 중간 디렉토리와 마지막 요소의 링크를 모두 따라갑니다.
    ///
    /// 링크 고리나 끊어진 링크는 `None`입니다.
    fn resolve(&self, path: &str) -> Option<usize> {
        let mut pending: VecDeque<String> = components(&paths::clean(path));
        let mut current = String::from("/");
        let mut hops = 0usize;

        while let Some(component) = pending.pop_front() {
            let candidate = paths::join(&current, &component);
            let idx = *self.by_path.get(&candidate)?;
            let entry = &self.entries[idx];
            if entry.metadata.is_symlink() {
                hops += 1;
                if hops > MAX_LINK_DEPTH {
                    debug!(path, "symlink depth exceeded");
                    return None;
                }
                let destination = &entry.metadata.link_destination;
                let target = if destination.starts_with('/') {
                    paths::clean(destination)
                } else {
                    paths::join(&current, destination)
                };
                let mut restarted = components(&target);
                restarted.extend(pending.drain(..));
                pending = restarted;
                current = String::from("/");
            } else {
                current = candidate;
            }
        }

        self.by_path.get(&current).copied()
    }

    /// 접근 경로 하나를 위치로 바꿉니다. 디렉토리이거나 해석되지 않으면 `None`.
    fn location_for(&self, access_path: &str) -> Option<Location> {
        let access_path = paths::clean(access_path);
        let idx = self.resolve(&access_path)?;
        let entry = &self.entries[idx];
        if entry.metadata.is_dir() {
            return None;
        }
        let virtual_path = if access_path != entry.path {
            access_path
        } else {
            String::new()
        };
        Some(Location::indexed(
            entry.coordinates(),
            virtual_path,
            FileRef(idx as u64),
        ))
    }

    fn locations_for<'a>(&self, candidates: impl Iterator<Item = &'a usize>) -> Vec<Location> {
        let unique: BTreeSet<Location> = candidates
            .filter_map(|&idx| self.location_for(&self.entries[idx].path))
            .collect();
        unique.into_iter().collect()
    }

    /// 위치의 실제 경로에 해당하는 항목
    fn entry_for(&self, location: &Location) -> Result<&IndexEntry, SourceError> {
        let idx = self
            .resolve(location.real_path())
            .ok_or_else(|| SourceError::not_found(location.real_path()))?;
        Ok(&self.entries[idx])
    }
}

fn components(path: &str) -> VecDeque<String> {
    path.split('/')
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
        .collect()
}

/// [`FileIndex`] 위의 [`Resolver`] 구현
///
/// 복제 비용이 작으며 (`Arc` 공유), 여러 카탈로거가 동시에 사용할 수 있습니다.
#[derive(Debug, Clone)]
pub struct IndexResolver {
    index: Arc<FileIndex>,
}

impl IndexResolver {
    /// 인덱스로 resolver를 생성합니다.
    pub fn new(index: FileIndex) -> Self {
        Self {
            index: Arc::new(index),
        }
    }

    /// 내부 인덱스
    pub fn index(&self) -> &FileIndex {
        &self.index
    }
}

impl Resolver for IndexResolver {
    fn files_by_path(&self, paths: &[&str]) -> Result<Vec<Location>, SourceError> {
        let unique: BTreeSet<Location> = paths
            .iter()
            .filter_map(|p| self.index.location_for(p))
            .collect();
        Ok(unique.into_iter().collect())
    }

    fn files_by_glob(&self, patterns: &[&str]) -> Result<Vec<Location>, SourceError> {
        let compiled = patterns
            .iter()
            .map(|p| paths::compile_glob(p))
            .collect::<Result<Vec<_>, _>>()?;
        let matching: Vec<usize> = self
            .index
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.metadata.is_dir())
            .filter(|(_, e)| compiled.iter().any(|p| paths::glob_matches(p, &e.path)))
            .map(|(idx, _)| idx)
            .collect();
        Ok(self.index.locations_for(matching.iter()))
    }

    fn files_by_mime_type(&self, types: &[&str]) -> Result<Vec<Location>, SourceError> {
        let candidates = types
            .iter()
            .filter_map(|t| self.index.by_mime.get(*t))
            .flatten();
        Ok(self.index.locations_for(candidates))
    }

    fn files_by_extension(&self, extensions: &[&str]) -> Result<Vec<Location>, SourceError> {
        let normalized: Vec<String> = extensions
            .iter()
            .map(|e| paths::normalize_extension(e))
            .collect();
        let candidates = normalized
            .iter()
            .filter_map(|e| self.index.by_extension.get(e))
            .flatten();
        Ok(self.index.locations_for(candidates))
    }

    fn files_by_basename(&self, names: &[&str]) -> Result<Vec<Location>, SourceError> {
        let candidates = names
            .iter()
            .filter_map(|n| self.index.by_basename.get(*n))
            .flatten();
        Ok(self.index.locations_for(candidates))
    }

    fn files_by_basename_glob(&self, patterns: &[&str]) -> Result<Vec<Location>, SourceError> {
        let compiled = patterns
            .iter()
            .map(|p| paths::compile_glob(p))
            .collect::<Result<Vec<_>, _>>()?;
        let candidates = self
            .index
            .by_basename
            .iter()
            .filter(|(name, _)| compiled.iter().any(|p| p.matches(name)))
            .flat_map(|(_, idxs)| idxs.iter());
        Ok(self.index.locations_for(candidates))
    }

    fn file_contents_by_location(&self, location: &Location) -> Result<FileContents, SourceError> {
        let entry = self.index.entry_for(location)?;
        match &entry.backing {
            Backing::Disk(host_path) => {
                let file = std::fs::File::open(host_path).map_err(|e| SourceError::Io {
                    path: entry.path.clone(),
                    source: e,
                })?;
                Ok(Box::new(file))
            }
            Backing::Memory(bytes) => Ok(Box::new(Cursor::new(Arc::clone(bytes)))),
            Backing::Empty if entry.metadata.is_dir() => Err(SourceError::Io {
                path: entry.path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "cannot read contents of a directory",
                ),
            }),
            Backing::Empty => Ok(Box::new(std::io::empty())),
        }
    }

    fn file_metadata_by_location(&self, location: &Location) -> Result<FileMetadata, SourceError> {
        // 링크 항목 자체는 링크 메타데이터, 링크 디렉토리를 지나는 경로는 대상 메타데이터
        let entry = match self.index.get(location.real_path()) {
            Some(entry) => entry,
            None => self.index.entry_for(location)?,
        };
        Ok(entry.metadata.clone())
    }

    fn has_path(&self, path: &str) -> bool {
        self.index.get(path).is_some() || self.index.resolve(path).is_some()
    }

    fn relative_file_by_path(&self, base: &Location, path: &str) -> Option<Location> {
        let target = if path.starts_with('/') {
            paths::clean(path)
        } else {
            paths::join(paths::parent(base.real_path()), path)
        };
        self.index.location_for(&target)
    }

    fn all_locations(&self) -> LocationStream {
        let index = Arc::clone(&self.index);
        LocationStream::spawn(move |tx| {
            for (idx, entry) in index.entries.iter().enumerate() {
                if entry.metadata.is_dir() {
                    continue;
                }
                let location = Location::indexed(entry.coordinates(), "", FileRef(idx as u64));
                if !tx.send(location) {
                    return;
                }
            }
        })
    }
}
