//! 생태계별 패키지 메타데이터
//!
//! [`Metadata`]는 알려진 메타데이터 형태의 닫힌 집합입니다. 스키마 생성과
//! 직렬화가 모든 형태를 정적으로 열거할 수 있도록 [`MetadataType`] 태그를 가집니다.
//! 새 생태계를 추가하려면 여기에 변형을 등록해야 합니다.
//!
//! 메타데이터는 중복 제거에 참여하지 않습니다. 예외는 [`Metadata::identity`]가
//! 돌려주는 값(아키텍처, epoch, release, 메인 모듈)뿐입니다.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::Schema;
use serde::{Deserialize, Serialize};

use crate::file::FileDigest;

// ─── OS 패키지 ────────────────────────────────────────────────────

/// Arch Linux 패키지 파일 항목
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AlpmFileRecord {
    /// 경로
    pub path: String,
    /// 다이제스트
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub digests: Vec<FileDigest>,
}

/// Arch Linux (alpm) 설치 데이터베이스 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlpmMetadata {
    pub base_package: String,
    pub package: String,
    pub version: String,
    pub description: String,
    pub architecture: String,
    pub size: u64,
    pub packager: String,
    pub url: String,
    pub validation: String,
    pub reason: i32,
    #[serde(default)]
    pub files: Vec<AlpmFileRecord>,
    #[serde(default)]
    pub backup: Vec<AlpmFileRecord>,
}

/// Alpine 패키지 파일 항목
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApkFileRecord {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_gid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<FileDigest>,
}

/// Alpine (apk) 설치 데이터베이스 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApkMetadata {
    pub package: String,
    pub origin_package: String,
    pub maintainer: String,
    pub version: String,
    pub license: String,
    pub architecture: String,
    pub url: String,
    pub description: String,
    pub size: u64,
    pub installed_size: u64,
    #[serde(default)]
    pub pull_dependencies: Vec<String>,
    #[serde(default)]
    pub provides: Vec<String>,
    pub pull_checksum: String,
    pub git_commit_of_apk_port: String,
    #[serde(default)]
    pub files: Vec<ApkFileRecord>,
}

/// Debian 패키지 파일 항목
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DpkgFileRecord {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<FileDigest>,
    #[serde(default)]
    pub is_config_file: bool,
}

/// Debian (dpkg) status 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DpkgMetadata {
    pub package: String,
    pub source: String,
    pub version: String,
    pub source_version: String,
    pub architecture: String,
    pub maintainer: String,
    pub installed_size: u64,
    #[serde(default)]
    pub files: Vec<DpkgFileRecord>,
}

/// RPM 파일 항목
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RpmFileRecord {
    pub path: String,
    pub mode: u32,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<FileDigest>,
    pub user_name: String,
    pub group_name: String,
    pub flags: String,
}

/// RPM 데이터베이스 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RpmMetadata {
    pub name: String,
    pub version: String,
    pub epoch: Option<i32>,
    pub architecture: String,
    pub release: String,
    pub source_rpm: String,
    pub size: u64,
    pub vendor: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub modularity_label: String,
    #[serde(default)]
    pub files: Vec<RpmFileRecord>,
}

/// Gentoo portage 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortageMetadata {
    pub installed_size: u64,
    #[serde(default)]
    pub files: Vec<AlpmFileRecord>,
}

/// Nix store 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NixStoreMetadata {
    pub output_hash: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Microsoft KB 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct KbPackageMetadata {
    pub product_id: String,
    pub kb: String,
}

// ─── 바이너리 ─────────────────────────────────────────────────────

/// 바이너리 분류기 매치 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BinaryMetadata {
    /// 매치한 분류기 이름과 위치
    #[serde(default)]
    pub matches: Vec<BinaryClassifierMatch>,
}

/// 분류기 매치 하나
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BinaryClassifierMatch {
    pub classifier: String,
    pub path: String,
}

/// Go 바이너리 빌드 정보 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GolangBinMetadata {
    /// 빌드 설정 (메인 모듈에만 기록)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub go_build_settings: BTreeMap<String, String>,
    /// 컴파일한 Go 버전
    pub go_compiled_version: String,
    /// 대상 아키텍처
    pub architecture: String,
    /// 모듈 h1 다이제스트
    #[serde(default, skip_serializing_if = "String::is_empty", rename = "h1Digest")]
    pub h1_digest: String,
    /// 메인 모듈 경로
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub main_module: String,
}

// ─── 언어 생태계 ──────────────────────────────────────────────────

/// go.mod / go.sum 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GolangModMetadata {
    #[serde(default, skip_serializing_if = "String::is_empty", rename = "h1Digest")]
    pub h1_digest: String,
}

/// 설치된 package.json 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NpmPackageJsonMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub homepage: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub private: bool,
}

/// package-lock.json 항목 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NpmPackageLockMetadata {
    #[serde(default)]
    pub resolved: String,
    #[serde(default)]
    pub integrity: String,
}

/// Cargo.lock 항목 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RustCargoMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub checksum: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Python 설치 패키지 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PythonPackageMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    pub author_email: String,
    pub platform: String,
    pub site_packages_root_path: String,
    #[serde(default)]
    pub top_level_packages: Vec<String>,
}

/// Pipfile.lock 항목 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PythonPipfileLockMetadata {
    #[serde(default)]
    pub hashes: Vec<String>,
    pub index: String,
}

/// Java 아카이브 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JavaMetadata {
    pub virtual_path: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub manifest: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pom_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pom_artifact_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub digest: Vec<FileDigest>,
}

/// Ruby gem 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GemMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub homepage: String,
}

/// composer.json / composer.lock 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PhpComposerJsonMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub source: BTreeMap<String, String>,
    #[serde(default)]
    pub dist: BTreeMap<String, String>,
    #[serde(default)]
    pub require: BTreeMap<String, String>,
    #[serde(default, rename = "type")]
    pub package_type: String,
}

/// pubspec.lock 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DartPubMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub hosted_url: String,
    #[serde(default)]
    pub vcs_url: String,
}

/// .NET deps.json 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DotnetDepsMetadata {
    pub name: String,
    pub version: String,
    pub path: String,
    pub sha512: String,
    pub hash_path: String,
}

/// Podfile.lock 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CocoapodsMetadata {
    pub checksum: String,
}

/// conanfile.txt 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConanMetadata {
    #[serde(rename = "ref")]
    pub reference: String,
}

/// conan.lock 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConanLockMetadata {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub package_id: String,
    #[serde(default)]
    pub prev: String,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub context: String,
}

/// Haskell stack/cabal 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HackageMetadata {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkg_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_url: Option<String>,
}

/// mix.lock 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MixLockMetadata {
    pub name: String,
    pub version: String,
    pub pkg_hash: String,
    pub pkg_hash_ext: String,
}

/// rebar.lock 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RebarLockMetadata {
    pub name: String,
    pub version: String,
    pub pkg_hash: String,
    pub pkg_hash_ext: String,
}

// ─── 닫힌 집합 ────────────────────────────────────────────────────

/// 메타데이터 형태의 닫힌 집합
///
/// 직렬화 시 `metadataType` 태그와 `metadata` 본문으로 나뉩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "metadataType", content = "metadata")]
pub enum Metadata {
    #[serde(rename = "AlpmMetadata")]
    Alpm(AlpmMetadata),
    #[serde(rename = "ApkMetadata")]
    Apk(ApkMetadata),
    #[serde(rename = "BinaryMetadata")]
    Binary(BinaryMetadata),
    #[serde(rename = "CocoapodsMetadata")]
    Cocoapods(CocoapodsMetadata),
    #[serde(rename = "ConanMetadata")]
    Conan(ConanMetadata),
    #[serde(rename = "ConanLockMetadata")]
    ConanLock(ConanLockMetadata),
    #[serde(rename = "DartPubMetadata")]
    DartPub(DartPubMetadata),
    #[serde(rename = "DotnetDepsMetadata")]
    DotnetDeps(DotnetDepsMetadata),
    #[serde(rename = "DpkgMetadata")]
    Dpkg(DpkgMetadata),
    #[serde(rename = "GemMetadata")]
    Gem(GemMetadata),
    #[serde(rename = "GolangBinMetadata")]
    GolangBin(GolangBinMetadata),
    #[serde(rename = "GolangModMetadata")]
    GolangMod(GolangModMetadata),
    #[serde(rename = "HackageMetadata")]
    Hackage(HackageMetadata),
    #[serde(rename = "JavaMetadata")]
    Java(JavaMetadata),
    #[serde(rename = "KbPackageMetadata")]
    KbPackage(KbPackageMetadata),
    #[serde(rename = "MixLockMetadata")]
    MixLock(MixLockMetadata),
    #[serde(rename = "NixStoreMetadata")]
    NixStore(NixStoreMetadata),
    #[serde(rename = "NpmPackageJsonMetadata")]
    NpmPackageJson(NpmPackageJsonMetadata),
    #[serde(rename = "NpmPackageLockMetadata")]
    NpmPackageLock(NpmPackageLockMetadata),
    #[serde(rename = "PhpComposerJsonMetadata")]
    PhpComposerJson(PhpComposerJsonMetadata),
    #[serde(rename = "PortageMetadata")]
    Portage(PortageMetadata),
    #[serde(rename = "PythonPackageMetadata")]
    PythonPackage(PythonPackageMetadata),
    #[serde(rename = "PythonPipfileLockMetadata")]
    PythonPipfileLock(PythonPipfileLockMetadata),
    #[serde(rename = "RebarLockMetadata")]
    RebarLock(RebarLockMetadata),
    #[serde(rename = "RpmMetadata")]
    Rpm(RpmMetadata),
    #[serde(rename = "RustCargoMetadata")]
    RustCargo(RustCargoMetadata),
}

impl Metadata {
    /// 판별 태그
    pub fn metadata_type(&self) -> MetadataType {
        match self {
            Self::Alpm(_) => MetadataType::Alpm,
            Self::Apk(_) => MetadataType::Apk,
            Self::Binary(_) => MetadataType::Binary,
            Self::Cocoapods(_) => MetadataType::Cocoapods,
            Self::Conan(_) => MetadataType::Conan,
            Self::ConanLock(_) => MetadataType::ConanLock,
            Self::DartPub(_) => MetadataType::DartPub,
            Self::DotnetDeps(_) => MetadataType::DotnetDeps,
            Self::Dpkg(_) => MetadataType::Dpkg,
            Self::Gem(_) => MetadataType::Gem,
            Self::GolangBin(_) => MetadataType::GolangBin,
            Self::GolangMod(_) => MetadataType::GolangMod,
            Self::Hackage(_) => MetadataType::Hackage,
            Self::Java(_) => MetadataType::Java,
            Self::KbPackage(_) => MetadataType::KbPackage,
            Self::MixLock(_) => MetadataType::MixLock,
            Self::NixStore(_) => MetadataType::NixStore,
            Self::NpmPackageJson(_) => MetadataType::NpmPackageJson,
            Self::NpmPackageLock(_) => MetadataType::NpmPackageLock,
            Self::PhpComposerJson(_) => MetadataType::PhpComposerJson,
            Self::Portage(_) => MetadataType::Portage,
            Self::PythonPackage(_) => MetadataType::PythonPackage,
            Self::PythonPipfileLock(_) => MetadataType::PythonPipfileLock,
            Self::RebarLock(_) => MetadataType::RebarLock,
            Self::Rpm(_) => MetadataType::Rpm,
            Self::RustCargo(_) => MetadataType::RustCargo,
        }
    }

    /// 태그 없이 본문만 JSON 값으로 바꿉니다.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Alpm(m) => serde_json::to_value(m),
            Self::Apk(m) => serde_json::to_value(m),
            Self::Binary(m) => serde_json::to_value(m),
            Self::Cocoapods(m) => serde_json::to_value(m),
            Self::Conan(m) => serde_json::to_value(m),
            Self::ConanLock(m) => serde_json::to_value(m),
            Self::DartPub(m) => serde_json::to_value(m),
            Self::DotnetDeps(m) => serde_json::to_value(m),
            Self::Dpkg(m) => serde_json::to_value(m),
            Self::Gem(m) => serde_json::to_value(m),
            Self::GolangBin(m) => serde_json::to_value(m),
            Self::GolangMod(m) => serde_json::to_value(m),
            Self::Hackage(m) => serde_json::to_value(m),
            Self::Java(m) => serde_json::to_value(m),
            Self::KbPackage(m) => serde_json::to_value(m),
            Self::MixLock(m) => serde_json::to_value(m),
            Self::NixStore(m) => serde_json::to_value(m),
            Self::NpmPackageJson(m) => serde_json::to_value(m),
            Self::NpmPackageLock(m) => serde_json::to_value(m),
            Self::PhpComposerJson(m) => serde_json::to_value(m),
            Self::Portage(m) => serde_json::to_value(m),
            Self::PythonPackage(m) => serde_json::to_value(m),
            Self::PythonPipfileLock(m) => serde_json::to_value(m),
            Self::RebarLock(m) => serde_json::to_value(m),
            Self::Rpm(m) => serde_json::to_value(m),
            Self::RustCargo(m) => serde_json::to_value(m),
        }
    }

    /// 패키지 동일성에 참여하는 메타데이터 값 (키 순서 고정)
    ///
    /// 같은 이름/버전/종류라도 이 값이 다르면 다른 패키지입니다.
    pub fn identity(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Rpm(m) => vec![
                ("arch", m.architecture.clone()),
                ("epoch", m.epoch.map(|e| e.to_string()).unwrap_or_default()),
                ("release", m.release.clone()),
            ],
            Self::Dpkg(m) => vec![("arch", m.architecture.clone())],
            Self::Apk(m) => vec![("arch", m.architecture.clone())],
            Self::Alpm(m) => vec![("arch", m.architecture.clone())],
            Self::GolangBin(m) => vec![
                ("arch", m.architecture.clone()),
                ("main", m.main_module.clone()),
            ],
            _ => Vec::new(),
        }
    }

    /// 패키지 관리자가 소유한다고 기록한 파일 경로 (OS 패키지만)
    pub fn owned_files(&self) -> Vec<&str> {
        match self {
            Self::Dpkg(m) => m.files.iter().map(|f| f.path.as_str()).collect(),
            Self::Rpm(m) => m.files.iter().map(|f| f.path.as_str()).collect(),
            Self::Apk(m) => m.files.iter().map(|f| f.path.as_str()).collect(),
            Self::Alpm(m) => m.files.iter().map(|f| f.path.as_str()).collect(),
            Self::Portage(m) => m.files.iter().map(|f| f.path.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

/// 메타데이터 판별 태그
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataType {
    Alpm,
    Apk,
    Binary,
    Cocoapods,
    Conan,
    ConanLock,
    DartPub,
    DotnetDeps,
    Dpkg,
    Gem,
    GolangBin,
    GolangMod,
    Hackage,
    Java,
    KbPackage,
    MixLock,
    NixStore,
    NpmPackageJson,
    NpmPackageLock,
    PhpComposerJson,
    Portage,
    PythonPackage,
    PythonPipfileLock,
    RebarLock,
    Rpm,
    RustCargo,
}

impl MetadataType {
    /// 모든 메타데이터 태그
    pub const ALL: [MetadataType; 26] = [
        Self::Alpm,
        Self::Apk,
        Self::Binary,
        Self::Cocoapods,
        Self::Conan,
        Self::ConanLock,
        Self::DartPub,
        Self::DotnetDeps,
        Self::Dpkg,
        Self::Gem,
        Self::GolangBin,
        Self::GolangMod,
        Self::Hackage,
        Self::Java,
        Self::KbPackage,
        Self::MixLock,
        Self::NixStore,
        Self::NpmPackageJson,
        Self::NpmPackageLock,
        Self::PhpComposerJson,
        Self::Portage,
        Self::PythonPackage,
        Self::PythonPipfileLock,
        Self::RebarLock,
        Self::Rpm,
        Self::RustCargo,
    ];

    /// 직렬화 태그이자 스키마 정의 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alpm => "AlpmMetadata",
            Self::Apk => "ApkMetadata",
            Self::Binary => "BinaryMetadata",
            Self::Cocoapods => "CocoapodsMetadata",
            Self::Conan => "ConanMetadata",
            Self::ConanLock => "ConanLockMetadata",
            Self::DartPub => "DartPubMetadata",
            Self::DotnetDeps => "DotnetDepsMetadata",
            Self::Dpkg => "DpkgMetadata",
            Self::Gem => "GemMetadata",
            Self::GolangBin => "GolangBinMetadata",
            Self::GolangMod => "GolangModMetadata",
            Self::Hackage => "HackageMetadata",
            Self::Java => "JavaMetadata",
            Self::KbPackage => "KbPackageMetadata",
            Self::MixLock => "MixLockMetadata",
            Self::NixStore => "NixStoreMetadata",
            Self::NpmPackageJson => "NpmPackageJsonMetadata",
            Self::NpmPackageLock => "NpmPackageLockMetadata",
            Self::PhpComposerJson => "PhpComposerJsonMetadata",
            Self::Portage => "PortageMetadata",
            Self::PythonPackage => "PythonPackageMetadata",
            Self::PythonPipfileLock => "PythonPipfileLockMetadata",
            Self::RebarLock => "RebarLockMetadata",
            Self::Rpm => "RpmMetadata",
            Self::RustCargo => "RustCargoMetadata",
        }
    }

    /// 태그 문자열로 찾습니다.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// 이 형태의 스키마를 생성기에 등록하고 참조 스키마를 돌려줍니다.
    pub fn subschema(&self, generator: &mut SchemaGenerator) -> Schema {
        match self {
            Self::Alpm => generator.subschema_for::<AlpmMetadata>(),
            Self::Apk => generator.subschema_for::<ApkMetadata>(),
            Self::Binary => generator.subschema_for::<BinaryMetadata>(),
            Self::Cocoapods => generator.subschema_for::<CocoapodsMetadata>(),
            Self::Conan => generator.subschema_for::<ConanMetadata>(),
            Self::ConanLock => generator.subschema_for::<ConanLockMetadata>(),
            Self::DartPub => generator.subschema_for::<DartPubMetadata>(),
            Self::DotnetDeps => generator.subschema_for::<DotnetDepsMetadata>(),
            Self::Dpkg => generator.subschema_for::<DpkgMetadata>(),
            Self::Gem => generator.subschema_for::<GemMetadata>(),
            Self::GolangBin => generator.subschema_for::<GolangBinMetadata>(),
            Self::GolangMod => generator.subschema_for::<GolangModMetadata>(),
            Self::Hackage => generator.subschema_for::<HackageMetadata>(),
            Self::Java => generator.subschema_for::<JavaMetadata>(),
            Self::KbPackage => generator.subschema_for::<KbPackageMetadata>(),
            Self::MixLock => generator.subschema_for::<MixLockMetadata>(),
            Self::NixStore => generator.subschema_for::<NixStoreMetadata>(),
            Self::NpmPackageJson => generator.subschema_for::<NpmPackageJsonMetadata>(),
            Self::NpmPackageLock => generator.subschema_for::<NpmPackageLockMetadata>(),
            Self::PhpComposerJson => generator.subschema_for::<PhpComposerJsonMetadata>(),
            Self::Portage => generator.subschema_for::<PortageMetadata>(),
            Self::PythonPackage => generator.subschema_for::<PythonPackageMetadata>(),
            Self::PythonPipfileLock => generator.subschema_for::<PythonPipfileLockMetadata>(),
            Self::RebarLock => generator.subschema_for::<RebarLockMetadata>(),
            Self::Rpm => generator.subschema_for::<RpmMetadata>(),
            Self::RustCargo => generator.subschema_for::<RustCargoMetadata>(),
        }
    }
}

impl fmt::Display for MetadataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
