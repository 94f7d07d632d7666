//! 파일 내용 카탈로거
//!
//! glob 패턴에 맞는 파일 중 크기 제한 이하인 일반 파일의 내용을 UTF-8 문자열로 기록합니다.

use std::collections::BTreeMap;

use strata_source::{Coordinates, Resolver, read_to_string};
use tracing::{debug, warn};

use crate::error::CatalogError;

/// glob 기반 내용 수집기
#[derive(Debug, Clone)]
pub struct FileContentsCataloger {
    globs: Vec<String>,
    max_size: usize,
}

impl FileContentsCataloger {
    /// 패턴과 최대 크기로 생성합니다.
    pub fn new(globs: Vec<String>, max_size: usize) -> Self {
        Self { globs, max_size }
    }

    /// 패턴에 맞는 파일의 내용을 좌표별로 모읍니다.
    ///
    /// # Errors
    ///
    /// 잘못된 glob 패턴이면 `CatalogError::Source`
    pub fn catalog(
        &self,
        resolver: &dyn Resolver,
    ) -> Result<BTreeMap<Coordinates, String>, CatalogError> {
        let mut results = BTreeMap::new();
        if self.globs.is_empty() {
            return Ok(results);
        }

        let patterns: Vec<&str> = self.globs.iter().map(String::as_str).collect();
        for location in resolver.files_by_glob(&patterns)? {
            let coordinates = location.coordinates().clone();
            if results.contains_key(&coordinates) {
                continue;
            }
            match resolver.file_metadata_by_location(&location) {
                Ok(md) if !md.is_regular() => continue,
                Ok(md) if md.size > self.max_size as u64 => {
                    debug!(path = %location.real_path(), size = md.size, "file too large for contents capture");
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %location.real_path(), error = %e, "failed to read file metadata");
                    continue;
                }
            }
            match read_to_string(resolver, &location, self.max_size) {
                Ok(body) => {
                    results.insert(coordinates, body);
                }
                Err(e) => warn!(path = %location.real_path(), error = %e, "failed to read file contents"),
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use strata_source::MockResolver;

    use super::*;

    #[test]
    fn captures_matching_files_under_limit() {
        let resolver = MockResolver::new()
            .file("/etc/app.conf", "key = value\n")
            .file("/etc/big.conf", "x".repeat(100))
            .file("/etc/other.txt", "ignored")
            .build();
        let cataloger = FileContentsCataloger::new(vec!["**/*.conf".to_owned()], 50);
        let results = cataloger.catalog(&resolver).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[&Coordinates::new("/etc/app.conf", "")], "key = value\n");
    }

    #[test]
    fn no_globs_means_nothing() {
        let resolver = MockResolver::from_paths(&["/a"]);
        let results = FileContentsCataloger::new(Vec::new(), 1024)
            .catalog(&resolver)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn invalid_glob_is_an_error() {
        let resolver = MockResolver::from_paths(&["/a"]);
        let result = FileContentsCataloger::new(vec!["[oops".to_owned()], 1024).catalog(&resolver);
        assert!(result.is_err());
    }
}
