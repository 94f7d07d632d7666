//! 디렉토리 소스 인덱싱
//!
//! 호스트 디렉토리를 `walkdir`로 순회하여 [`FileIndex`]를 만듭니다.
//! 링크는 따라가지 않고 링크 항목 그대로 기록하며, 해석은 질의 시점에 합니다.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::SourceError;
use crate::index::{FileIndex, FileIndexBuilder, IndexEntry};
use crate::metadata::FileMetadata;
use crate::mime;

/// 디렉토리 트리를 인덱싱합니다.
///
/// 읽을 수 없는 항목은 경고 후 건너뜁니다. 루트 자체에 접근할 수 없으면 에러입니다.
pub fn index_directory(root: &Path) -> Result<FileIndex, SourceError> {
    let mut builder = FileIndexBuilder::new();
    walk_into(root, "", &mut builder)?;
    Ok(builder.build())
}

/// 디렉토리 트리를 빌더에 추가합니다. 이미지 레이어 인덱싱에서도 사용합니다.
pub(crate) fn walk_into(
    root: &Path,
    file_system_id: &str,
    builder: &mut FileIndexBuilder,
) -> Result<(), SourceError> {
    let root_md = std::fs::metadata(root).map_err(|e| SourceError::Io {
        path: root.display().to_string(),
        source: e,
    })?;
    if !root_md.is_dir() {
        return Err(SourceError::Unsupported(format!(
            "not a directory: {}",
            root.display()
        )));
    }

    let mut indexed = 0usize;
    for item in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable path");
                continue;
            }
        };
        let Some(path) = source_path(root, item.path()) else {
            continue;
        };
        let md = match item.metadata() {
            Ok(md) => md,
            Err(e) => {
                warn!(path = %item.path().display(), error = %e, "failed to read metadata");
                continue;
            }
        };

        let link = if md.file_type().is_symlink() {
            match std::fs::read_link(item.path()) {
                Ok(dest) => Some(link_destination(root, &dest)),
                Err(e) => {
                    warn!(path = %item.path().display(), error = %e, "failed to read link");
                    continue;
                }
            }
        } else {
            None
        };

        let mut metadata = FileMetadata::from_fs(&md, link);
        if metadata.is_regular() {
            metadata.mime_type = sniff_file(item.path());
        }
        builder.add(
            IndexEntry::on_disk(&path, metadata, item.path().to_path_buf())
                .with_file_system_id(file_system_id),
        );
        indexed += 1;
    }

    debug!(root = %root.display(), indexed, "directory walked");
    Ok(())
}

/// 호스트 경로를 소스 경로(`/` 기준)로 바꿉니다.
fn source_path(root: &Path, host: &Path) -> Option<String> {
    let relative = host.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(format!("/{}", parts.join("/")))
}

/// 링크 대상을 소스 경로 의미로 바꿉니다.
///
/// 루트 안을 가리키는 호스트 절대 경로는 루트 접두사를 제거합니다.
/// 그 밖의 절대 경로는 소스 루트 기준 경로로 취급합니다.
fn link_destination(root: &Path, dest: &Path) -> String {
    if dest.is_absolute() {
        if let Some(inside) = source_path(root, dest) {
            return inside;
        }
    }
    dest.to_string_lossy().into_owned()
}

fn sniff_file(path: &Path) -> String {
    let mut header = Vec::with_capacity(mime::SNIFF_LEN);
    let result = std::fs::File::open(path)
        .and_then(|f| f.take(mime::SNIFF_LEN as u64).read_to_end(&mut header));
    match result {
        Ok(_) => mime::sniff(&header).to_owned(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "mime detection skipped");
            String::new()
        }
    }
}

/// 절대 경로로 정규화합니다. 실패하면 입력을 그대로 씁니다.
pub(crate) fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
