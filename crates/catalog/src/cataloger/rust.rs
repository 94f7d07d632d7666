//! Cargo.lock 파서
//!
//! # Cargo.lock 형식 예시
//!
//! ```toml
//! version = 3
//!
//! [[package]]
//! name = "serde"
//! version = "1.0.197"
//! source = "registry+https://github.com/rust-lang/crates.io-index"
//! checksum = "3fb1c873..."
//! dependencies = ["serde_derive"]
//! ```
//!
//! `dependencies` 항목은 `이름`, `이름 버전`, `이름 버전 (소스)` 중 하나입니다.
//! 같은 이름의 크레이트가 여러 버전 잠겨 있을 때만 버전이 붙습니다.

use serde::Deserialize;
use strata_source::{Location, Resolver};

use super::{CatalogerOutput, FileParser, FileSelector, GenericCataloger, dependency_relationships};
use crate::error::CatalogError;
use crate::pkg::metadata::{Metadata, RustCargoMetadata};
use crate::pkg::{Package, PackageType};

/// Cargo.lock 카탈로거 이름
pub const RUST_CARGO_LOCK_CATALOGER: &str = "rust-cargo-lock-cataloger";

/// Cargo.lock 파서
#[derive(Debug, Clone, Default)]
pub struct CargoLockParser;

/// Cargo.lock 구조 (파싱용)
#[derive(Deserialize)]
struct CargoLockFile {
    #[serde(default)]
    package: Vec<CargoLockEntry>,
}

/// Cargo.lock `[[package]]` 항목 (파싱용)
#[derive(Deserialize)]
struct CargoLockEntry {
    name: String,
    version: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    checksum: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
}

/// 의존성 항목을 `(이름, 버전)`으로 나눕니다.
fn split_dependency(spec: &str) -> (String, Option<String>) {
    let mut parts = spec.split_whitespace();
    let name = parts.next().unwrap_or_default().to_owned();
    (name, parts.next().map(str::to_owned))
}

impl FileParser for CargoLockParser {
    fn parse(
        &self,
        _resolver: &dyn Resolver,
        location: &Location,
        contents: &[u8],
    ) -> Result<CatalogerOutput, CatalogError> {
        let text = std::str::from_utf8(contents)
            .map_err(|e| CatalogError::parse(location.real_path(), e))?;
        let lock: CargoLockFile =
            toml::from_str(text).map_err(|e| CatalogError::parse(location.real_path(), e))?;

        let packages: Vec<Package> = lock
            .package
            .into_iter()
            .map(|entry| {
                let metadata = RustCargoMetadata {
                    name: entry.name.clone(),
                    version: entry.version.clone(),
                    source: entry.source.unwrap_or_default(),
                    checksum: entry.checksum.unwrap_or_default(),
                    dependencies: entry.dependencies,
                };
                Package::new(entry.name, entry.version, PackageType::RustCrate)
                    .with_metadata(Metadata::RustCargo(metadata))
            })
            .collect();

        let relationships = dependency_relationships(&packages, |pkg| match &pkg.metadata {
            Some(Metadata::RustCargo(m)) => {
                m.dependencies.iter().map(|d| split_dependency(d)).collect()
            }
            _ => Vec::new(),
        });

        Ok((packages, relationships))
    }
}

/// Cargo.lock 카탈로거를 생성합니다.
pub fn rust_cargo_lock_cataloger(max_file_size: usize) -> GenericCataloger {
    GenericCataloger::new(
        RUST_CARGO_LOCK_CATALOGER,
        FileSelector::Globs(&["**/Cargo.lock"]),
        CargoLockParser,
        max_file_size,
    )
}

#[cfg(test)]
mod tests {
    use strata_source::MockResolver;

    use super::*;
    use crate::cataloger::Cataloger;
    use crate::relationship::RelationshipType;

    const SAMPLE_CARGO_LOCK: &str = r#"
version = 3

[[package]]
name = "app"
version = "0.1.0"
dependencies = [
 "serde",
 "syn 2.0.48",
]

[[package]]
name = "serde"
version = "1.0.197"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "3fb1c873e1b9b056a4dc4c0c198b24c3ffa059243875552b2bd0933b1aee4ce2"

[[package]]
name = "syn"
version = "1.0.109"
source = "registry+https://github.com/rust-lang/crates.io-index"

[[package]]
name = "syn"
version = "2.0.48"
source = "registry+https://github.com/rust-lang/crates.io-index"
"#;

    fn parse(contents: &str) -> Result<CatalogerOutput, CatalogError> {
        let resolver = MockResolver::new().build();
        CargoLockParser.parse(&resolver, &Location::new("/Cargo.lock"), contents.as_bytes())
    }

    #[test]
    fn parses_packages() {
        let (packages, _) = parse(SAMPLE_CARGO_LOCK).unwrap();
        assert_eq!(packages.len(), 4);

        let serde = packages.iter().find(|p| p.name == "serde").unwrap();
        assert_eq!(serde.purl, "pkg:cargo/serde@1.0.197");
        match &serde.metadata {
            Some(Metadata::RustCargo(m)) => {
                assert!(m.checksum.starts_with("3fb1c873"));
                assert!(m.source.starts_with("registry+"));
            }
            other => panic!("unexpected metadata {other:?}"),
        }
    }

    #[test]
    fn versioned_dependency_picks_exact_crate() {
        let (packages, relationships) = parse(SAMPLE_CARGO_LOCK).unwrap();
        let app = packages.iter().find(|p| p.name == "app").unwrap();
        let syn2 = packages
            .iter()
            .find(|p| p.name == "syn" && p.version == "2.0.48")
            .unwrap();

        assert_eq!(relationships.len(), 2);
        assert!(relationships.iter().all(|r| r.kind == RelationshipType::DependencyOf));
        assert!(relationships.iter().all(|r| r.to == app.id()));
        assert!(relationships.iter().any(|r| r.from == syn2.id()));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        assert!(matches!(
            parse("[[package]\nname = "),
            Err(CatalogError::Parse { .. })
        ));
    }

    #[test]
    fn split_dependency_forms() {
        assert_eq!(split_dependency("serde"), ("serde".to_owned(), None));
        assert_eq!(
            split_dependency("syn 2.0.48 (registry+https://x)"),
            ("syn".to_owned(), Some("2.0.48".to_owned()))
        );
    }

    #[test]
    fn cataloger_finds_nested_lockfiles() {
        let resolver = MockResolver::new()
            .file("/src/tool/Cargo.lock", SAMPLE_CARGO_LOCK)
            .build();
        let (packages, relationships) = rust_cargo_lock_cataloger(1024 * 1024)
            .catalog(&resolver)
            .unwrap();
        assert_eq!(packages.len(), 4);
        assert!(packages.iter().all(|p| p.found_by.contains(RUST_CARGO_LOCK_CATALOGER)));
        // evident-by 4개 + dependency-of 2개
        assert_eq!(relationships.len(), 6);
    }
}
