//! 아티팩트 관계
//!
//! 관계는 아티팩트 ID 사이의 방향성 있는 간선이며, 그래프는 평평한 간선 목록입니다.
//! 순환이 허용되고 참조 무결성은 검증하지 않습니다.
//! 출력 순서는 [`sort_relationships`]가 한 번에 정합니다.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use strata_source::Coordinates;

use crate::pkg::{Catalog, Package};

/// 관계 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    /// 부모 패키지가 소유한 파일에서 자식 패키지가 발견됨
    OwnershipByFileOverlap,
    /// 부모 아티팩트가 자식 아티팩트를 포함함
    Contains,
    /// 부모가 자식의 의존성
    DependencyOf,
    /// 부모 패키지의 근거가 자식 파일
    EvidentBy,
}

impl RelationshipType {
    /// 직렬화 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OwnershipByFileOverlap => "ownership-by-file-overlap",
            Self::Contains => "contains",
            Self::DependencyOf => "dependency-of",
            Self::EvidentBy => "evident-by",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 방향성 있는 관계 간선
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// 부모 아티팩트 ID
    pub from: String,
    /// 자식 아티팩트 ID
    pub to: String,
    /// 관계 종류
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    /// 부가 데이터
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Relationship {
    /// 새 관계를 만듭니다.
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: RelationshipType) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            data: None,
        }
    }

    /// 패키지 -> 근거 파일 간선
    pub fn evident_by(pkg: &Package, file: &Coordinates) -> Self {
        Self::new(pkg.id(), file.id(), RelationshipType::EvidentBy)
    }

    /// 의존성 -> 의존하는 쪽 간선
    pub fn dependency_of(dependency: &Package, dependent: &Package) -> Self {
        Self::new(dependency.id(), dependent.id(), RelationshipType::DependencyOf)
    }

    /// 부가 데이터를 붙입니다.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// `(부모, 자식, 종류 문자열, 데이터)` 사전순으로 정렬하고 완전히 같은 간선을 제거합니다.
///
/// 데이터는 JSON 텍스트로 비교하며, 데이터가 없는 간선이 앞에 옵니다.
pub fn sort_relationships(relationships: &mut Vec<Relationship>) {
    relationships.sort_by_cached_key(|r| {
        (
            r.from.clone(),
            r.to.clone(),
            r.kind.as_str(),
            r.data.as_ref().map(serde_json::Value::to_string),
        )
    });
    relationships.dedup();
}

/// 다른 패키지의 위치를 소유 파일로 기록한 패키지에서 `ownership-by-file-overlap` 간선을 만듭니다.
///
/// 간선 데이터에는 겹치는 파일 경로가 정렬되어 들어갑니다. 자기 자신으로의 간선은 만들지 않습니다.
pub fn ownership_by_file_overlap(catalog: &Catalog) -> Vec<Relationship> {
    let packages = catalog.sorted();
    let mut overlaps: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();

    for owner in &packages {
        let Some(metadata) = &owner.metadata else {
            continue;
        };
        for path in metadata.owned_files() {
            for child in catalog.packages_by_path(path) {
                if child.id() == owner.id() {
                    continue;
                }
                overlaps
                    .entry((owner.id().to_owned(), child.id().to_owned()))
                    .or_default()
                    .insert(path.to_owned());
            }
        }
    }

    overlaps
        .into_iter()
        .map(|((from, to), files)| {
            Relationship::new(from, to, RelationshipType::OwnershipByFileOverlap)
                .with_data(serde_json::json!({ "files": files }))
        })
        .collect()
}
