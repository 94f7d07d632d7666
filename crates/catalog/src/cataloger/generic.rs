//! 파일 파서 기반 범용 카탈로거
//!
//! [`GenericCataloger`]는 선택 규칙으로 후보 파일을 찾고, 각 파일 내용을
//! [`FileParser`]에 넘긴 뒤 결과에 출처(`found_by`, 위치, `evident-by` 관계)를 채웁니다.
//! 파일 하나의 파싱 실패는 경고 후 건너뛰며 나머지 파일은 계속 처리합니다.

use std::collections::HashMap;
use std::sync::Arc;

use strata_source::{Location, Resolver, read_contents};
use tracing::{debug, warn};

use super::{Cataloger, CatalogerOutput};
use crate::error::CatalogError;
use crate::pkg::Package;
use crate::relationship::Relationship;

/// 파일 하나를 파싱하는 형식별 파서
pub trait FileParser: Send + Sync {
    /// 파일 내용을 파싱합니다.
    ///
    /// # Arguments
    ///
    /// - `resolver`: 주변 파일 조회용 (예: go.mod 옆의 go.sum)
    /// - `location`: 파싱 대상 위치 (에러 메시지와 출처용)
    /// - `contents`: 파일 내용
    fn parse(
        &self,
        resolver: &dyn Resolver,
        location: &Location,
        contents: &[u8],
    ) -> Result<CatalogerOutput, CatalogError>;
}

/// 후보 파일 선택 규칙
#[derive(Debug, Clone)]
pub enum FileSelector {
    /// 경로 glob 패턴
    Globs(&'static [&'static str]),
    /// 내용 기반 MIME 타입
    MimeTypes(&'static [&'static str]),
}

impl FileSelector {
    fn select(&self, resolver: &dyn Resolver) -> Result<Vec<Location>, CatalogError> {
        let mut locations = match self {
            Self::Globs(patterns) => resolver.files_by_glob(patterns)?,
            Self::MimeTypes(types) => resolver.files_by_mime_type(types)?,
        };
        locations.sort();
        locations.dedup();
        Ok(locations)
    }
}

/// 파서 하나를 감싼 카탈로거
#[derive(Clone)]
pub struct GenericCataloger {
    name: String,
    selector: FileSelector,
    parser: Arc<dyn FileParser>,
    max_file_size: usize,
}

impl GenericCataloger {
    /// 새 카탈로거를 만듭니다.
    pub fn new(
        name: impl Into<String>,
        selector: FileSelector,
        parser: impl FileParser + 'static,
        max_file_size: usize,
    ) -> Self {
        Self {
            name: name.into(),
            selector,
            parser: Arc::new(parser),
            max_file_size,
        }
    }
}

impl std::fmt::Debug for GenericCataloger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericCataloger")
            .field("name", &self.name)
            .field("selector", &self.selector)
            .field("max_file_size", &self.max_file_size)
            .finish()
    }
}

impl Cataloger for GenericCataloger {
    fn name(&self) -> &str {
        &self.name
    }

    fn catalog(&self, resolver: &dyn Resolver) -> Result<CatalogerOutput, CatalogError> {
        let mut packages = Vec::new();
        let mut relationships = Vec::new();

        for location in self.selector.select(resolver)? {
            let contents = match read_contents(resolver, &location, self.max_file_size) {
                Ok(c) => c,
                Err(e) => {
                    warn!(cataloger = %self.name, path = %location.real_path(), error = %e, "failed to read file, skipping");
                    continue;
                }
            };

            let (found, rels) = match self.parser.parse(resolver, &location, &contents) {
                Ok(output) => output,
                Err(e) => {
                    warn!(cataloger = %self.name, path = %location.real_path(), error = %e, "failed to parse file, skipping");
                    continue;
                }
            };

            debug!(
                cataloger = %self.name,
                path = %location.real_path(),
                packages = found.len(),
                "parsed file"
            );

            for pkg in found {
                let pkg = pkg.found_by(self.name.as_str()).with_location(location.clone());
                relationships.push(Relationship::evident_by(&pkg, location.coordinates()));
                packages.push(pkg);
            }
            relationships.extend(rels);
        }

        Ok((packages, relationships))
    }
}

/// 같은 파일에서 나온 패키지 사이의 `dependency-of` 관계를 만듭니다.
///
/// `dependencies_of`는 패키지가 의존하는 `(이름, 버전)` 목록을 돌려줍니다.
/// 버전이 없으면 이름이 정확히 하나의 패키지로 해석될 때만 간선을 만듭니다.
pub fn dependency_relationships<F>(packages: &[Package], dependencies_of: F) -> Vec<Relationship>
where
    F: Fn(&Package) -> Vec<(String, Option<String>)>,
{
    let mut by_name: HashMap<&str, Vec<&Package>> = HashMap::new();
    for pkg in packages {
        by_name.entry(pkg.name.as_str()).or_default().push(pkg);
    }

    let mut relationships = Vec::new();
    for dependent in packages {
        for (name, version) in dependencies_of(dependent) {
            let Some(candidates) = by_name.get(name.as_str()) else {
                continue;
            };
            let resolved: Vec<&&Package> = match &version {
                Some(v) => candidates.iter().filter(|p| &p.version == v).collect(),
                None => candidates.iter().collect(),
            };
            if let [dependency] = resolved.as_slice() {
                if dependency.id() != dependent.id() {
                    relationships.push(Relationship::dependency_of(dependency, dependent));
                }
            }
        }
    }
    relationships
}
