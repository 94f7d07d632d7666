//! 파일 메타데이터 카탈로거

use std::collections::BTreeMap;

use strata_source::{Coordinates, FileMetadata, Location, Resolver};
use tracing::warn;

/// 위치별 [`FileMetadata`] 수집기
#[derive(Debug, Clone, Default)]
pub struct FileMetadataCataloger;

impl FileMetadataCataloger {
    /// 생성합니다.
    pub fn new() -> Self {
        Self
    }

    /// 주어진 위치(없으면 모든 위치)의 메타데이터를 좌표별로 모읍니다.
    pub fn catalog(
        &self,
        resolver: &dyn Resolver,
        locations: Option<Vec<Location>>,
    ) -> BTreeMap<Coordinates, FileMetadata> {
        let locations: Box<dyn Iterator<Item = Location>> = match locations {
            Some(list) => Box::new(list.into_iter()),
            None => Box::new(resolver.all_locations()),
        };

        let mut results = BTreeMap::new();
        for location in locations {
            match resolver.file_metadata_by_location(&location) {
                Ok(md) => {
                    results.insert(location.coordinates().clone(), md);
                }
                Err(e) => {
                    warn!(path = %location.real_path(), error = %e, "failed to read file metadata");
                }
            }
        }
        results
    }
}
