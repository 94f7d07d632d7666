//! SBOM -> JSON 문서 모델 변환
//!
//! 출력 순서는 여기서 한 번 정해집니다.
//!
//! - 패키지: [`Catalog::sorted`](crate::pkg::Catalog::sorted)
//! - 관계: `(부모, 자식, 종류)`
//! - 파일, 비밀: 실제 경로
//!
//! 소스를 기술할 수 없으면 경고만 남기고 빈 소스로 문서를 만듭니다.

pub mod model;

use tracing::warn;

use strata_source::{Coordinates, FileMetadata, Scheme, SourceDescription};

use crate::error::CatalogError;
use crate::pkg::Package;
use crate::relationship::Relationship;
use crate::sbom::{Descriptor, FileArtifacts, Sbom};

/// 문서 스키마 버전
pub const JSON_SCHEMA_VERSION: &str = "1.0.0";

/// 스키마 버전의 공개 URL
pub fn schema_url(version: &str) -> String {
    format!("https://raw.githubusercontent.com/strata-sbom/strata/main/schema/json/schema-{version}.json")
}

/// SBOM을 출력 문서 모델로 바꿉니다.
pub fn to_format_model(sbom: &Sbom) -> model::Document {
    let source = to_source_model(&sbom.source).unwrap_or_else(|e| {
        warn!(error = %e, "unable to create source object, using empty source");
        model::Source::default()
    });

    model::Document {
        artifacts: sbom.catalog.sorted().iter().map(to_package_model).collect(),
        artifact_relationships: to_relationship_models(&sbom.relationships),
        files: to_file_models(&sbom.files),
        secrets: to_secrets_models(&sbom.files),
        source,
        distro: model::LinuxRelease::default(),
        descriptor: to_descriptor_model(&sbom.descriptor),
        schema: model::Schema {
            version: JSON_SCHEMA_VERSION.to_owned(),
            url: schema_url(JSON_SCHEMA_VERSION),
        },
    }
}

/// 패키지 하나를 모델로 바꿉니다. 위치는 좌표 순으로 정렬됩니다.
pub fn to_package_model(pkg: &Package) -> model::Package {
    let mut locations: Vec<model::Coordinates> = pkg
        .locations
        .coordinates()
        .iter()
        .map(model::Coordinates::from)
        .collect();
    locations.sort();
    locations.dedup();

    let metadata = pkg.metadata.as_ref().and_then(|m| match m.to_value() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(package = %pkg, error = %e, "failed to encode package metadata");
            None
        }
    });

    model::Package {
        id: pkg.id().to_owned(),
        name: pkg.name.clone(),
        version: pkg.version.clone(),
        package_type: pkg.package_type.as_str().to_owned(),
        found_by: pkg.found_by.iter().cloned().collect(),
        locations,
        licenses: pkg.licenses.clone(),
        language: pkg.language.as_str().to_owned(),
        cpes: pkg.cpes.clone(),
        purl: pkg.purl.clone(),
        metadata_type: pkg.metadata_type_name().to_owned(),
        metadata,
    }
}

fn to_relationship_models(relationships: &[Relationship]) -> Vec<model::Relationship> {
    let mut result: Vec<model::Relationship> = relationships
        .iter()
        .map(|r| model::Relationship {
            parent: r.from.clone(),
            child: r.to.clone(),
            kind: r.kind.as_str().to_owned(),
            metadata: r.data.clone(),
        })
        .collect();
    result.sort_by(|a, b| {
        (a.parent.as_str(), a.child.as_str(), a.kind.as_str())
            .cmp(&(b.parent.as_str(), b.child.as_str(), b.kind.as_str()))
    });
    result
}

fn to_file_models(files: &FileArtifacts) -> Vec<model::File> {
    // coordinates()는 (경로, 레이어) 순으로 정렬되어 있음
    files
        .coordinates()
        .iter()
        .map(|coordinates| model::File {
            id: coordinates.id(),
            location: model::Coordinates::from(coordinates),
            metadata: files
                .metadata
                .get(coordinates)
                .map(|m| to_file_metadata_entry(coordinates, m)),
            contents: files.contents.get(coordinates).cloned().unwrap_or_default(),
            digests: files.digests.get(coordinates).cloned().unwrap_or_default(),
        })
        .collect()
}

/// 권한 비트를 8진수 자릿수 그대로 읽은 정수로 바꿉니다 (0o755 -> 755).
pub fn octal_mode(mode: u32) -> Option<u64> {
    format!("{mode:o}").parse().ok()
}

fn to_file_metadata_entry(
    coordinates: &Coordinates,
    metadata: &FileMetadata,
) -> model::FileMetadataEntry {
    let mode = octal_mode(metadata.mode).unwrap_or_else(|| {
        warn!(path = %coordinates.real_path, mode = metadata.mode, "invalid mode in file catalog");
        0
    });
    model::FileMetadataEntry {
        mode,
        file_type: metadata.file_type.as_str().to_owned(),
        link_destination: metadata.link_destination.clone(),
        user_id: metadata.user_id,
        group_id: metadata.group_id,
        mime_type: metadata.mime_type.clone(),
    }
}

fn to_secrets_models(files: &FileArtifacts) -> Vec<model::Secrets> {
    // BTreeMap 순회 순서가 곧 (경로, 레이어) 순서
    files
        .secrets
        .iter()
        .map(|(coordinates, secrets)| model::Secrets {
            location: model::Coordinates::from(coordinates),
            secrets: secrets.clone(),
        })
        .collect()
}

fn to_descriptor_model(descriptor: &Descriptor) -> model::Descriptor {
    model::Descriptor {
        name: descriptor.name.clone(),
        version: descriptor.version.clone(),
        configuration: descriptor.configuration.clone(),
    }
}

/// 소스 설명을 모델로 바꿉니다.
///
/// # Errors
///
/// 알 수 없는 스킴이면 `CatalogError::UnsupportedSource`
pub fn to_source_model(source: &SourceDescription) -> Result<model::Source, CatalogError> {
    let target = match source.scheme {
        Scheme::Image => {
            let image = source.image.clone().unwrap_or_default();
            serde_json::to_value(image).map_err(|e| CatalogError::Serialization(e.to_string()))?
        }
        Scheme::Directory | Scheme::File => serde_json::Value::String(source.path.clone()),
        Scheme::Unknown => {
            return Err(CatalogError::UnsupportedSource {
                scheme: source.scheme.to_string(),
            });
        }
    };
    Ok(model::Source {
        id: source.id.clone(),
        kind: source.scheme.as_str().to_owned(),
        target,
    })
}
