//! package-lock.json 파서
//!
//! [`PackageLockParser`]는 NPM lockfile을 파싱합니다. v2/v3의 `packages` 맵을 우선 읽고,
//! 없으면 v1의 중첩 `dependencies` 트리를 읽습니다.
//!
//! # package-lock.json v3 형식 예시
//!
//! ```json
//! {
//!   "name": "my-app",
//!   "lockfileVersion": 3,
//!   "packages": {
//!     "": { "name": "my-app", "version": "1.0.0" },
//!     "node_modules/lodash": { "version": "4.17.21", "resolved": "...", "integrity": "sha512-..." }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use strata_source::{Location, Resolver};

use crate::cataloger::{CatalogerOutput, FileParser, dependency_relationships};
use crate::error::CatalogError;
use crate::pkg::metadata::{Metadata, NpmPackageLockMetadata};
use crate::pkg::{Package, PackageType};

/// package-lock.json 파서
#[derive(Debug, Clone, Default)]
pub struct PackageLockParser;

/// package-lock.json 구조 (파싱용)
#[derive(Deserialize)]
struct LockFile {
    #[serde(default)]
    packages: BTreeMap<String, LockEntry>,
    /// v1 형식
    #[serde(default)]
    dependencies: BTreeMap<String, LegacyEntry>,
}

/// v2/v3 `packages` 항목 (파싱용)
#[derive(Deserialize)]
struct LockEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    resolved: Option<String>,
    #[serde(default)]
    integrity: Option<String>,
    #[serde(default)]
    link: bool,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "optionalDependencies")]
    optional_dependencies: BTreeMap<String, String>,
}

/// v1 `dependencies` 항목 (파싱용)
#[derive(Deserialize)]
struct LegacyEntry {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    resolved: Option<String>,
    #[serde(default)]
    integrity: Option<String>,
    #[serde(default)]
    requires: BTreeMap<String, String>,
    #[serde(default)]
    dependencies: BTreeMap<String, LegacyEntry>,
}

impl FileParser for PackageLockParser {
    fn parse(
        &self,
        _resolver: &dyn Resolver,
        location: &Location,
        contents: &[u8],
    ) -> Result<CatalogerOutput, CatalogError> {
        let lock: LockFile = serde_json::from_slice(contents)
            .map_err(|e| CatalogError::parse(location.real_path(), e))?;

        // (패키지, 의존하는 이름 목록)
        let mut found: Vec<(Package, Vec<String>)> = Vec::new();
        if lock.packages.is_empty() {
            collect_legacy(&lock.dependencies, &mut found);
        } else {
            for (key, entry) in &lock.packages {
                // 루트 패키지는 키가 빈 문자열
                if key.is_empty() || entry.link {
                    continue;
                }
                let Some(version) = entry.version.as_deref() else {
                    continue;
                };
                let name = entry
                    .name
                    .clone()
                    .unwrap_or_else(|| extract_package_name(key).to_owned());
                let pkg = npm_package(name, version, &entry.resolved, &entry.integrity)
                    .with_licenses(entry.license.iter().cloned().collect());
                let deps = entry
                    .dependencies
                    .keys()
                    .chain(entry.optional_dependencies.keys())
                    .cloned()
                    .collect();
                found.push((pkg, deps));
            }
        }

        let packages: Vec<Package> = found.iter().map(|(p, _)| p.clone()).collect();
        let requires: BTreeMap<&str, &Vec<String>> =
            found.iter().map(|(p, d)| (p.id(), d)).collect();
        let relationships = dependency_relationships(&packages, |p| {
            requires
                .get(p.id())
                .map(|deps| deps.iter().map(|d| (d.clone(), None)).collect())
                .unwrap_or_default()
        });

        Ok((packages, relationships))
    }
}

fn npm_package(
    name: String,
    version: &str,
    resolved: &Option<String>,
    integrity: &Option<String>,
) -> Package {
    Package::new(name, version, PackageType::Npm).with_metadata(Metadata::NpmPackageLock(
        NpmPackageLockMetadata {
            resolved: resolved.clone().unwrap_or_default(),
            integrity: integrity.clone().unwrap_or_default(),
        },
    ))
}

fn collect_legacy(entries: &BTreeMap<String, LegacyEntry>, out: &mut Vec<(Package, Vec<String>)>) {
    for (name, entry) in entries {
        if let Some(version) = entry.version.as_deref() {
            let pkg = npm_package(name.clone(), version, &entry.resolved, &entry.integrity);
            out.push((pkg, entry.requires.keys().cloned().collect()));
        }
        collect_legacy(&entry.dependencies, out);
    }
}

/// "node_modules/@scope/name" 또는 "node_modules/name" 에서 패키지명 추출
fn extract_package_name(key: &str) -> &str {
    match key.rfind("node_modules/") {
        Some(pos) => &key[pos + "node_modules/".len()..],
        None => key,
    }
}
