//! 발견된 패키지
//!
//! 패키지 ID는 무작위 값이 아니라 동일성 필드(이름, 버전, 종류,
//! 동일성에 참여하는 메타데이터)에서 결정적으로 계산됩니다. 같은 입력으로
//! 다시 실행하면 같은 ID가 나오므로 관계 참조가 실행 간에 안정적입니다.

use std::collections::BTreeSet;
use std::fmt;

use strata_source::{Location, LocationSet};

use super::metadata::Metadata;
use super::purl::Purl;
use super::types::{Language, PackageType};

/// 발견된 소프트웨어 단위
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    id: String,
    /// 패키지 이름
    pub name: String,
    /// 패키지 버전
    pub version: String,
    /// 패키지 종류
    pub package_type: PackageType,
    /// 언어
    pub language: Language,
    /// 선언된 라이선스
    pub licenses: Vec<String>,
    /// CPE 목록
    pub cpes: Vec<String>,
    /// Package URL
    pub purl: String,
    /// 이 패키지를 찾은 카탈로거 이름
    pub found_by: BTreeSet<String>,
    /// 패키지가 관찰된 위치
    pub locations: LocationSet,
    /// 생태계별 메타데이터
    pub metadata: Option<Metadata>,
}

impl Package {
    /// 이름, 버전, 종류로 패키지를 만듭니다.
    ///
    /// 언어는 종류에서 추정하고 PURL은 종류 규칙으로 채웁니다.
    pub fn new(name: impl Into<String>, version: impl Into<String>, ty: PackageType) -> Self {
        let name = name.into();
        let version = version.into();
        let purl = Purl::for_package(ty, &name, &version)
            .map(|p| p.to_string())
            .unwrap_or_default();
        let mut pkg = Self {
            id: String::new(),
            name,
            version,
            package_type: ty,
            language: Language::from_package_type(ty),
            licenses: Vec::new(),
            cpes: Vec::new(),
            purl,
            found_by: BTreeSet::new(),
            locations: LocationSet::new(),
            metadata: None,
        };
        pkg.refresh_id();
        pkg
    }

    /// 찾은 카탈로거를 기록합니다.
    pub fn found_by(mut self, cataloger: impl Into<String>) -> Self {
        self.found_by.insert(cataloger.into());
        self
    }

    /// 위치를 추가합니다.
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.add(location);
        self
    }

    /// 메타데이터를 설정하고 ID를 다시 계산합니다.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self.refresh_id();
        self
    }

    /// PURL을 덮어씁니다.
    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.purl = purl.into();
        self
    }

    /// 라이선스를 설정합니다.
    pub fn with_licenses(mut self, licenses: Vec<String>) -> Self {
        self.licenses = licenses;
        self
    }

    /// CPE를 설정합니다.
    pub fn with_cpes(mut self, cpes: Vec<String>) -> Self {
        self.cpes = cpes;
        self
    }

    /// 결정적 ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 현재 필드로 ID를 다시 계산합니다.
    ///
    /// 공개 필드를 직접 바꾼 뒤에는 호출해야 합니다. [`Catalog::add`](super::Catalog::add)는
    /// 항상 다시 계산합니다.
    pub fn refresh_id(&mut self) {
        self.id = self.compute_id();
    }

    fn compute_id(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"package\0");
        for field in [self.name.as_str(), self.version.as_str(), self.package_type.as_str()] {
            hasher.update(field.as_bytes());
            hasher.update(b"\0");
        }
        if let Some(metadata) = &self.metadata {
            for (key, value) in metadata.identity() {
                hasher.update(key.as_bytes());
                hasher.update(b"=");
                hasher.update(value.as_bytes());
                hasher.update(b"\0");
            }
        }
        hasher.finalize().to_hex()[..16].to_owned()
    }

    /// 메타데이터 태그 이름. 메타데이터가 없으면 빈 문자열입니다.
    pub fn metadata_type_name(&self) -> &'static str {
        self.metadata
            .as_ref()
            .map(|m| m.metadata_type().as_str())
            .unwrap_or("")
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.version, self.package_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::metadata::{GolangBinMetadata, NpmPackageLockMetadata, RpmMetadata};

    #[test]
    fn same_fields_give_same_id() {
        let a = Package::new("github.com/x/y", "v1.2.3", PackageType::GoModule)
            .with_location(Location::new("/app/go.mod"));
        let b = Package::new("github.com/x/y", "v1.2.3", PackageType::GoModule)
            .found_by("other")
            .with_location(Location::new("/vendor/lib/go.sum"));
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id().len(), 16);
    }

    #[test]
    fn type_participates_in_identity() {
        let a = Package::new("left-pad", "1.0.0", PackageType::Npm);
        let b = Package::new("left-pad", "1.0.0", PackageType::Gem);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn field_boundaries_are_unambiguous() {
        let a = Package::new("ab", "c", PackageType::Npm);
        let b = Package::new("a", "bc", PackageType::Npm);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn architecture_participates_in_identity() {
        let amd64 = Package::new("bash", "5.1", PackageType::Rpm).with_metadata(Metadata::Rpm(
            RpmMetadata {
                architecture: "x86_64".to_owned(),
                ..Default::default()
            },
        ));
        let arm64 = Package::new("bash", "5.1", PackageType::Rpm).with_metadata(Metadata::Rpm(
            RpmMetadata {
                architecture: "aarch64".to_owned(),
                ..Default::default()
            },
        ));
        assert_ne!(amd64.id(), arm64.id());
    }

    #[test]
    fn non_identity_metadata_does_not_change_id() {
        let plain = Package::new("lodash", "4.17.21", PackageType::Npm);
        let with_meta = plain
            .clone()
            .with_metadata(Metadata::NpmPackageLock(NpmPackageLockMetadata {
                resolved: "https://registry.npmjs.org/lodash".to_owned(),
                integrity: "sha512-x".to_owned(),
            }));
        assert_eq!(plain.id(), with_meta.id());
    }

    #[test]
    fn go_binary_main_module_participates() {
        let meta = |main: &str| {
            Metadata::GolangBin(GolangBinMetadata {
                architecture: "amd64".to_owned(),
                main_module: main.to_owned(),
                ..Default::default()
            })
        };
        let a = Package::new("golang.org/x/net", "v0.1.0", PackageType::GoModule)
            .with_metadata(meta("example.com/a"));
        let b = Package::new("golang.org/x/net", "v0.1.0", PackageType::GoModule)
            .with_metadata(meta("example.com/b"));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn new_fills_language_and_purl() {
        let pkg = Package::new("serde", "1.0.0", PackageType::RustCrate);
        assert_eq!(pkg.language, Language::Rust);
        assert_eq!(pkg.purl, "pkg:cargo/serde@1.0.0");
        assert_eq!(pkg.metadata_type_name(), "");
    }

    #[test]
    fn refresh_after_direct_mutation() {
        let mut pkg = Package::new("serde", "1.0.0", PackageType::RustCrate);
        let before = pkg.id().to_owned();
        pkg.version = "1.0.1".to_owned();
        assert_eq!(pkg.id(), before);
        pkg.refresh_id();
        assert_ne!(pkg.id(), before);
    }
}
