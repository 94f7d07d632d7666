//! 중복 제거 패키지 카탈로그
//!
//! [`Catalog`]는 모든 카탈로거의 패키지 관찰을 모으는 유일한 공유 가변 상태입니다.
//! `add`는 내부 잠금 아래에서 ID 계산과 병합을 한 번에 수행하므로, 같은 ID로
//! 해석되는 두 동시 호출이 모두 새 항목을 만드는 일은 없습니다.
//!
//! 출력 순서는 삽입 순서가 아니라 [`Catalog::sorted`]의
//! `(이름, 버전, 종류, ID)` 순서를 따릅니다.

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use metrics::counter;
use strata_core::metrics as m;
use tracing::debug;

use super::package::Package;
use super::types::{Language, PackageType};

#[derive(Debug, Default)]
struct Inner {
    by_id: HashMap<String, Package>,
    /// 실제 경로와 가상 경로 -> 패키지 ID
    by_path: HashMap<String, BTreeSet<String>>,
}

impl Inner {
    fn index_paths(&mut self, pkg: &Package) {
        for location in pkg.locations.iter() {
            for path in [location.real_path(), location.virtual_path()] {
                if path.is_empty() {
                    continue;
                }
                self.by_path
                    .entry(path.to_owned())
                    .or_default()
                    .insert(pkg.id().to_owned());
            }
        }
    }
}

/// 패키지 카탈로그
#[derive(Debug, Default)]
pub struct Catalog {
    inner: RwLock<Inner>,
}

impl Catalog {
    /// 빈 카탈로그를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 패키지 목록으로 카탈로그를 만듭니다.
    pub fn from_packages(packages: impl IntoIterator<Item = Package>) -> Self {
        let catalog = Self::new();
        catalog.add_all(packages);
        catalog
    }

    // 각 연산이 끝날 때 상태가 일관되므로 poison은 무시합니다.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// 패키지를 추가하거나 같은 ID의 기존 항목에 병합하고 ID를 반환합니다.
    ///
    /// 병합은 위치, `found_by`, 라이선스, CPE의 합집합입니다. PURL과 언어는 비어 있는
    /// 쪽을 채우고, 둘 다 있으면 사전순으로 앞선 값을 씁니다. 메타데이터는 처음 관찰된
    /// 값을 유지합니다.
    pub fn add(&self, mut pkg: Package) -> String {
        pkg.refresh_id();
        let id = pkg.id().to_owned();
        counter!(m::CATALOG_PACKAGES_ADDED_TOTAL).increment(1);

        let mut inner = self.write();
        inner.index_paths(&pkg);
        match inner.by_id.get_mut(&id) {
            Some(existing) => {
                if existing.metadata.is_some()
                    && pkg.metadata.is_some()
                    && existing.metadata != pkg.metadata
                {
                    debug!(
                        package = %existing,
                        id = %id,
                        kept = existing.metadata_type_name(),
                        dropped = pkg.metadata_type_name(),
                        "metadata diverges between duplicate observations, keeping first"
                    );
                }
                if existing.metadata.is_none() {
                    existing.metadata = pkg.metadata.take();
                }
                existing.locations.merge(&pkg.locations);
                existing.found_by.extend(pkg.found_by);
                union_sorted(&mut existing.licenses, pkg.licenses);
                union_sorted(&mut existing.cpes, pkg.cpes);
                if !pkg.purl.is_empty() && (existing.purl.is_empty() || pkg.purl < existing.purl) {
                    existing.purl = pkg.purl;
                }
                if pkg.language != Language::Unknown
                    && (existing.language == Language::Unknown
                        || pkg.language.as_str() < existing.language.as_str())
                {
                    existing.language = pkg.language;
                }
                counter!(m::CATALOG_PACKAGES_MERGED_TOTAL).increment(1);
            }
            None => {
                inner.by_id.insert(id.clone(), pkg);
            }
        }
        id
    }

    /// 여러 패키지를 추가합니다.
    pub fn add_all(&self, packages: impl IntoIterator<Item = Package>) {
        for pkg in packages {
            self.add(pkg);
        }
    }

    /// ID로 패키지를 찾습니다.
    pub fn package(&self, id: &str) -> Option<Package> {
        self.read().by_id.get(id).cloned()
    }

    /// 고유 패키지 수
    pub fn len(&self) -> usize {
        self.read().by_id.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.read().by_id.is_empty()
    }

    /// `(이름, 버전, 종류, ID)` 순으로 정렬된 패키지 목록
    pub fn sorted(&self) -> Vec<Package> {
        let mut packages: Vec<Package> = self.read().by_id.values().cloned().collect();
        sort_packages(&mut packages);
        packages
    }

    /// 주어진 경로(실제 또는 가상)에서 관찰된 패키지 (정렬됨)
    pub fn packages_by_path(&self, path: &str) -> Vec<Package> {
        let inner = self.read();
        let mut packages: Vec<Package> = inner
            .by_path
            .get(path)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect();
        sort_packages(&mut packages);
        packages
    }

    /// 지정한 종류의 패키지만 정렬해서 돌려줍니다. 빈 목록이면 전부입니다.
    pub fn enumerate(&self, types: &[PackageType]) -> Vec<Package> {
        let mut packages: Vec<Package> = self
            .read()
            .by_id
            .values()
            .filter(|p| types.is_empty() || types.contains(&p.package_type))
            .cloned()
            .collect();
        sort_packages(&mut packages);
        packages
    }
}

fn union_sorted(existing: &mut Vec<String>, incoming: Vec<String>) {
    existing.extend(incoming);
    existing.sort();
    existing.dedup();
}

fn sort_packages(packages: &mut [Package]) {
    packages.sort_by(|a, b| {
        (&a.name, &a.version, a.package_type, a.id())
            .cmp(&(&b.name, &b.version, b.package_type, b.id()))
    });
}
