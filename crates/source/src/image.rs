//! 이미지 레이어 스쿼시 인덱싱
//!
//! 이미 풀려 있는 레이어 디렉토리들을 아래에서 위 순서로 겹쳐 하나의 뷰를 만듭니다.
//! 각 파일의 파일시스템 식별자는 그 파일을 마지막으로 제공한 레이어의 ID입니다.
//!
//! # whiteout
//!
//! - `.wh.<name>`: 아래 레이어의 `<name>`(하위 트리 포함)을 지움
//! - `.wh..wh..opq`: 같은 디렉토리의 아래 레이어 내용을 모두 지움

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::directory::{absolute, walk_into};
use crate::error::SourceError;
use crate::index::{FileIndex, FileIndexBuilder};
use crate::paths;

/// whiteout 파일 접두사
pub const WHITEOUT_PREFIX: &str = ".wh.";
/// opaque 디렉토리 표식
pub const OPAQUE_WHITEOUT: &str = ".wh..wh..opq";

/// 풀려 있는 이미지 레이어 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// 레이어 식별자 (digest)
    pub id: String,
    /// 레이어 내용이 풀린 호스트 디렉토리
    pub root: PathBuf,
}

impl Layer {
    /// 식별자와 디렉토리로 레이어를 만듭니다.
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            root: root.into(),
        }
    }

    /// 디렉토리 경로에서 결정적인 식별자를 만들어 레이어를 생성합니다.
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        let root = absolute(&root.into());
        let digest = blake3::hash(root.to_string_lossy().as_bytes());
        Self {
            id: format!("blake3:{}", digest.to_hex()),
            root,
        }
    }
}

#[derive(Debug)]
enum Whiteout {
    Entry(String),
    Opaque(String),
}

/// 레이어들을 순서대로 겹쳐 인덱싱합니다 (첫 레이어가 가장 아래).
pub fn squash_layers(layers: &[Layer]) -> Result<FileIndex, SourceError> {
    if layers.is_empty() {
        return Err(SourceError::Unsupported(
            "image source requires at least one layer".to_owned(),
        ));
    }

    let mut builder = FileIndexBuilder::new();
    for layer in layers {
        let whiteouts = find_whiteouts(&layer.root);
        for whiteout in &whiteouts {
            match whiteout {
                Whiteout::Entry(path) => {
                    builder.remove_tree(path);
                }
                Whiteout::Opaque(dir) => {
                    builder.remove_children(dir);
                }
            }
        }

        walk_into(&layer.root, &layer.id, &mut builder)?;

        // 표식 파일 자체는 결과 뷰에 남지 않음
        for marker in marker_paths(&layer.root) {
            builder.remove_tree(&marker);
        }
        debug!(layer = %layer.id, whiteouts = whiteouts.len(), "layer squashed");
    }
    Ok(builder.build())
}

fn find_whiteouts(root: &Path) -> Vec<Whiteout> {
    let mut found = Vec::new();
    for marker in marker_paths(root) {
        let dir = paths::parent(&marker).to_owned();
        let name = paths::basename(&marker);
        if name == OPAQUE_WHITEOUT {
            found.push(Whiteout::Opaque(dir));
        } else if let Some(target) = name.strip_prefix(WHITEOUT_PREFIX) {
            found.push(Whiteout::Entry(paths::join(&dir, target)));
        }
    }
    found
}

/// 레이어 안 whiteout 표식 파일의 소스 경로 목록
fn marker_paths(root: &Path) -> Vec<String> {
    let mut markers = Vec::new();
    for item in WalkDir::new(root).follow_links(false) {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable layer path");
                continue;
            }
        };
        let name = item.file_name().to_string_lossy();
        if !name.starts_with(WHITEOUT_PREFIX) {
            continue;
        }
        if let Ok(relative) = item.path().strip_prefix(root) {
            markers.push(paths::clean(&relative.to_string_lossy()));
        }
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexResolver;
    use crate::resolver::Resolver;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    #[test]
    fn upper_layer_wins_and_records_layer_id() {
        let lower = tempfile::tempdir().unwrap();
        let upper = tempfile::tempdir().unwrap();
        write(lower.path(), "etc/os-release", "ID=old\n");
        write(upper.path(), "etc/os-release", "ID=new\n");

        let index = squash_layers(&[
            Layer::new("sha256:lower", lower.path()),
            Layer::new("sha256:upper", upper.path()),
        ])
        .unwrap();
        assert_eq!(index.get("/etc/os-release").unwrap().file_system_id, "sha256:upper");
    }

    #[test]
    fn whiteout_removes_lower_file() {
        let lower = tempfile::tempdir().unwrap();
        let upper = tempfile::tempdir().unwrap();
        write(lower.path(), "app/go.mod", "module a\n");
        write(lower.path(), "app/keep.txt", "keep\n");
        write(upper.path(), "app/.wh.go.mod", "");

        let resolver = IndexResolver::new(
            squash_layers(&[
                Layer::new("l1", lower.path()),
                Layer::new("l2", upper.path()),
            ])
            .unwrap(),
        );
        assert!(!resolver.has_path("/app/go.mod"));
        assert!(!resolver.has_path("/app/.wh.go.mod"));
        assert!(resolver.has_path("/app/keep.txt"));
    }

    #[test]
    fn opaque_directory_hides_lower_contents() {
        let lower = tempfile::tempdir().unwrap();
        let upper = tempfile::tempdir().unwrap();
        write(lower.path(), "opt/old.txt", "old\n");
        write(upper.path(), "opt/.wh..wh..opq", "");
        write(upper.path(), "opt/new.txt", "new\n");

        let resolver = IndexResolver::new(
            squash_layers(&[
                Layer::new("l1", lower.path()),
                Layer::new("l2", upper.path()),
            ])
            .unwrap(),
        );
        assert!(!resolver.has_path("/opt/old.txt"));
        assert!(resolver.has_path("/opt/new.txt"));
        assert_eq!(resolver.files_by_glob(&["/opt/*"]).unwrap().len(), 1);
    }

    #[test]
    fn no_layers_is_unsupported() {
        assert!(matches!(
            squash_layers(&[]),
            Err(SourceError::Unsupported(_))
        ));
    }

    #[test]
    fn layer_from_dir_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Layer::from_dir(dir.path()).id, Layer::from_dir(dir.path()).id);
    }
}
