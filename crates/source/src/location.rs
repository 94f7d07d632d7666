//! 파일 위치 모델
//!
//! - [`Coordinates`]: 하나의 파일시스템(레이어) 스냅샷 안에서 파일을 식별
//! - [`Location`]: 파일이 관찰된 경로 하나 (실제 경로 + 가상 경로)
//! - [`LocationSet`]: 중복 없는 위치 집합
//!
//! 가상 경로는 심볼릭 링크나 아카이브 항목처럼 파일이 *주소 지정된* 경로이며,
//! 실제로 존재하는 경로(`real_path`)와 다를 수 있습니다.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// 파일 좌표 -- 실제 경로와 파일시스템(레이어) 식별자
///
/// 두 필드가 모두 같을 때만 같은 좌표입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinates {
    /// 소스 루트 기준 실제 경로
    #[serde(rename = "path")]
    pub real_path: String,
    /// 파일이 속한 파일시스템 또는 레이어 식별자
    #[serde(rename = "layerID", default, skip_serializing_if = "String::is_empty")]
    pub file_system_id: String,
}

impl Coordinates {
    /// 새 좌표를 생성합니다.
    pub fn new(real_path: impl Into<String>, file_system_id: impl Into<String>) -> Self {
        Self {
            real_path: real_path.into(),
            file_system_id: file_system_id.into(),
        }
    }

    /// 좌표에서 결정적인 아티팩트 ID를 계산합니다.
    ///
    /// 같은 좌표는 실행마다 같은 ID를 가집니다.
    pub fn id(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"coordinates\0");
        hasher.update(self.real_path.as_bytes());
        hasher.update(b"\0");
        hasher.update(self.file_system_id.as_bytes());
        hasher.finalize().to_hex()[..16].to_owned()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file_system_id.is_empty() {
            write!(f, "RealPath={:?}", self.real_path)
        } else {
            write!(
                f,
                "RealPath={:?} Layer={:?}",
                self.real_path, self.file_system_id
            )
        }
    }
}

/// 인덱스 내부 파일 참조
///
/// 위치를 만든 인덱스 안에서만 의미가 있으며, 위치의 동일성에는 참여하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileRef(pub(crate) u64);

impl FileRef {
    /// 참조 번호를 반환합니다.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// 파일이 관찰된 위치
///
/// 생성 후에는 변경할 수 없습니다. 집합/중복 제거 목적의 동일성은
/// `(real_path, virtual_path, file_system_id)` 세 값으로만 정해집니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(flatten)]
    coordinates: Coordinates,
    #[serde(rename = "accessPath", default, skip_serializing_if = "String::is_empty")]
    virtual_path: String,
    #[serde(skip)]
    file_ref: Option<FileRef>,
}

impl Location {
    /// 실제 경로만으로 위치를 생성합니다.
    pub fn new(real_path: impl Into<String>) -> Self {
        Self::from_coordinates(Coordinates::new(real_path, ""))
    }

    /// 실제 경로와 파일시스템 식별자로 위치를 생성합니다.
    pub fn with_layer(real_path: impl Into<String>, file_system_id: impl Into<String>) -> Self {
        Self::from_coordinates(Coordinates::new(real_path, file_system_id))
    }

    /// 가상 경로를 가진 위치를 생성합니다.
    pub fn new_virtual(real_path: impl Into<String>, virtual_path: impl Into<String>) -> Self {
        Self {
            coordinates: Coordinates::new(real_path, ""),
            virtual_path: virtual_path.into(),
            file_ref: None,
        }
    }

    /// 좌표로부터 위치를 생성합니다.
    pub fn from_coordinates(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            virtual_path: String::new(),
            file_ref: None,
        }
    }

    /// 인덱스 참조와 가상 경로를 지정해 위치를 생성합니다.
    pub(crate) fn indexed(
        coordinates: Coordinates,
        virtual_path: impl Into<String>,
        file_ref: FileRef,
    ) -> Self {
        Self {
            coordinates,
            virtual_path: virtual_path.into(),
            file_ref: Some(file_ref),
        }
    }

    /// 좌표
    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// 실제 경로
    pub fn real_path(&self) -> &str {
        &self.coordinates.real_path
    }

    /// 가상 경로 (없으면 빈 문자열)
    pub fn virtual_path(&self) -> &str {
        &self.virtual_path
    }

    /// 파일시스템(레이어) 식별자
    pub fn file_system_id(&self) -> &str {
        &self.coordinates.file_system_id
    }

    /// 호출자가 이 파일에 접근한 경로 (가상 경로가 있으면 가상 경로)
    pub fn access_path(&self) -> &str {
        if self.virtual_path.is_empty() {
            &self.coordinates.real_path
        } else {
            &self.virtual_path
        }
    }

    /// 인덱스 내부 참조
    pub fn file_ref(&self) -> Option<FileRef> {
        self.file_ref
    }

    fn key(&self) -> (&str, &str, &str) {
        (
            &self.coordinates.real_path,
            &self.virtual_path,
            &self.coordinates.file_system_id,
        )
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location<{}", self.coordinates)?;
        if !self.virtual_path.is_empty() && self.virtual_path != self.coordinates.real_path {
            write!(f, " VirtualPath={:?}", self.virtual_path)?;
        }
        write!(f, ">")
    }
}

impl From<Coordinates> for Location {
    fn from(coordinates: Coordinates) -> Self {
        Self::from_coordinates(coordinates)
    }
}

/// 중복 없는 위치 집합
///
/// 삽입 순서는 의미가 없으며, 읽을 때 항상 정렬된 순서로 돌려줍니다.
/// 이미 있는 위치를 다시 넣으면 처음 기록된 값(내부 참조 포함)이 유지됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationSet {
    set: BTreeSet<Location>,
}

impl LocationSet {
    /// 빈 집합을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 위치를 추가합니다. 새로 추가되었으면 `true`를 반환합니다.
    pub fn add(&mut self, location: Location) -> bool {
        self.set.insert(location)
    }

    /// 다른 집합의 모든 위치를 합칩니다.
    pub fn merge(&mut self, other: &LocationSet) {
        for location in &other.set {
            if !self.set.contains(location) {
                self.set.insert(location.clone());
            }
        }
    }

    /// 위치를 제거합니다.
    pub fn remove(&mut self, location: &Location) -> bool {
        self.set.remove(location)
    }

    /// 위치 포함 여부
    pub fn contains(&self, location: &Location) -> bool {
        self.set.contains(location)
    }

    /// 위치 개수
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// 정렬된 순서로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.set.iter()
    }

    /// 정렬된 위치 목록을 반환합니다.
    pub fn to_vec(&self) -> Vec<Location> {
        self.set.iter().cloned().collect()
    }

    /// 정렬된 좌표 목록을 반환합니다 (중복 좌표는 하나로).
    pub fn coordinates(&self) -> Vec<Coordinates> {
        let unique: BTreeSet<&Coordinates> = self.set.iter().map(Location::coordinates).collect();
        unique.into_iter().cloned().collect()
    }
}

impl FromIterator<Location> for LocationSet {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        Self {
            set: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LocationSet {
    type Item = Location;
    type IntoIter = std::collections::btree_set::IntoIter<Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.set.into_iter()
    }
}

impl<'a> IntoIterator for &'a LocationSet {
    type Item = &'a Location;
    type IntoIter = std::collections::btree_set::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.set.iter()
    }
}
