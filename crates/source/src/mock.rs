//! 테스트용 메모리 resolver
//!
//! 디스크 없이 경로와 내용만으로 [`IndexResolver`]를 만듭니다.
//! 카탈로거 단위 테스트에서 소스 대신 사용합니다.
//!
//! ```
//! use strata_source::{MockResolver, Resolver};
//!
//! let resolver = MockResolver::new()
//!     .file("/app/go.mod", "module example.com/app\n")
//!     .symlink("/current", "/app/go.mod")
//!     .build();
//! assert!(resolver.has_path("/current"));
//! ```

use crate::index::{FileIndexBuilder, IndexEntry, IndexResolver};

/// 메모리 resolver 빌더
#[derive(Debug, Default)]
pub struct MockResolver {
    builder: FileIndexBuilder,
    layer: String,
}

impl MockResolver {
    /// 빈 빌더
    pub fn new() -> Self {
        Self::default()
    }

    /// 같은 내용의 파일 여러 개를 가진 resolver (경로가 곧 내용)
    pub fn from_paths(paths: &[&str]) -> IndexResolver {
        paths
            .iter()
            .fold(Self::new(), |mock, p| mock.file(p, p.as_bytes().to_vec()))
            .build()
    }

    /// 이후 추가하는 항목의 파일시스템 식별자를 지정합니다.
    pub fn layer(mut self, id: impl Into<String>) -> Self {
        self.layer = id.into();
        self
    }

    /// 일반 파일을 추가합니다.
    pub fn file(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        let entry = IndexEntry::in_memory(path, contents).with_file_system_id(self.layer.clone());
        self.builder.add(entry);
        self
    }

    /// MIME 타입을 직접 지정한 일반 파일을 추가합니다.
    pub fn file_with_mime(mut self, path: &str, contents: impl Into<Vec<u8>>, mime: &str) -> Self {
        let mut entry =
            IndexEntry::in_memory(path, contents).with_file_system_id(self.layer.clone());
        entry.metadata.mime_type = mime.to_owned();
        self.builder.add(entry);
        self
    }

    /// 심볼릭 링크를 추가합니다.
    pub fn symlink(mut self, path: &str, destination: &str) -> Self {
        let entry = IndexEntry::symlink(path, destination).with_file_system_id(self.layer.clone());
        self.builder.add(entry);
        self
    }

    /// 빈 디렉토리를 추가합니다.
    pub fn dir(mut self, path: &str) -> Self {
        let entry = IndexEntry::directory(path).with_file_system_id(self.layer.clone());
        self.builder.add(entry);
        self
    }

    /// resolver를 완성합니다.
    pub fn build(self) -> IndexResolver {
        IndexResolver::new(self.builder.build())
    }
}
