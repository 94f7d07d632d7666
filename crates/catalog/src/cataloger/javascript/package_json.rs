//! package.json 파서
//!
//! 설치된 패키지(`node_modules/*/package.json`)나 프로젝트 매니페스트에서
//! 패키지 하나를 만듭니다. 이름이나 버전이 없는 매니페스트는 건너뜁니다.

use serde::Deserialize;
use serde_json::Value;
use strata_source::{Location, Resolver};

use crate::cataloger::{CatalogerOutput, FileParser};
use crate::error::CatalogError;
use crate::pkg::metadata::{Metadata, NpmPackageJsonMetadata};
use crate::pkg::{Package, PackageType};

/// package.json 파서
#[derive(Debug, Clone, Default)]
pub struct PackageJsonParser;

#[derive(Deserialize)]
struct Manifest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    author: Option<Value>,
    #[serde(default)]
    homepage: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    repository: Option<Value>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    license: Option<Value>,
    #[serde(default)]
    licenses: Vec<Value>,
}

/// 문자열 또는 `{ "name": .., "email": .., "url": .. }` 형태의 author
fn author_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            let field = |k: &str| map.get(k).and_then(Value::as_str).unwrap_or_default();
            let mut out = field("name").to_owned();
            let email = field("email");
            if !email.is_empty() {
                out.push_str(&format!(" <{email}>"));
            }
            let url = field("url");
            if !url.is_empty() {
                out.push_str(&format!(" ({url})"));
            }
            out.trim().to_owned()
        }
        _ => String::new(),
    }
}

/// 문자열 또는 `{ "type"|"url": .. }` 형태에서 값을 꺼냅니다.
fn string_or_field(value: &Value, key: &str) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned),
        _ => None,
    }
}

impl FileParser for PackageJsonParser {
    fn parse(
        &self,
        _resolver: &dyn Resolver,
        location: &Location,
        contents: &[u8],
    ) -> Result<CatalogerOutput, CatalogError> {
        let manifest: Manifest = serde_json::from_slice(contents)
            .map_err(|e| CatalogError::parse(location.real_path(), e))?;
        if manifest.name.is_empty() || manifest.version.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let mut licenses: Vec<String> = manifest
            .license
            .iter()
            .chain(manifest.licenses.iter())
            .filter_map(|v| string_or_field(v, "type"))
            .collect();
        licenses.dedup();

        let metadata = NpmPackageJsonMetadata {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            author: manifest.author.as_ref().map(author_string).unwrap_or_default(),
            homepage: manifest.homepage,
            description: manifest.description,
            url: manifest
                .repository
                .as_ref()
                .and_then(|v| string_or_field(v, "url"))
                .unwrap_or_default(),
            private: manifest.private,
        };

        let pkg = Package::new(manifest.name, manifest.version, PackageType::Npm)
            .with_licenses(licenses)
            .with_metadata(Metadata::NpmPackageJson(metadata));
        Ok((vec![pkg], Vec::new()))
    }
}
