//! 출력 문서의 JSON Schema 생성
//!
//! 문서 모델에서 스키마를 만들고, 알려진 모든 메타데이터 형태를 `$defs`에 등록한 뒤
//! `Package.metadata`를 `anyOf: [null, $ref...]`로 바꿉니다.
//!
//! 같은 버전의 스키마 파일은 한 번 공개되면 바뀌면 안 됩니다. [`write`]는 내용이 같으면
//! 아무것도 하지 않고, 다르면 `SchemaConflict`를 돌려줍니다.

use std::path::{Path, PathBuf};

use schemars::r#gen::SchemaSettings;
use serde_json::{Map, Value, json};
use tracing::info;

use crate::error::CatalogError;
use crate::format::JSON_SCHEMA_VERSION;
use crate::format::model::Document;
use crate::pkg::MetadataType;

fn serialization(e: serde_json::Error) -> CatalogError {
    CatalogError::Serialization(e.to_string())
}

/// 현재 버전의 문서 스키마를 만듭니다.
pub fn generate() -> Result<Value, CatalogError> {
    let mut generator = SchemaSettings::draft2019_09().into_generator();

    let mut refs: Vec<(&'static str, Value)> = Vec::with_capacity(MetadataType::ALL.len());
    for ty in MetadataType::ALL {
        let reference = serde_json::to_value(ty.subschema(&mut generator)).map_err(serialization)?;
        refs.push((ty.as_str(), reference));
    }
    refs.sort_by(|a, b| a.0.cmp(b.0));

    let root = generator.into_root_schema_for::<Document>();
    let mut schema = serde_json::to_value(root).map_err(serialization)?;
    let Some(object) = schema.as_object_mut() else {
        return Err(CatalogError::Serialization(
            "schema root is not an object".to_owned(),
        ));
    };

    // 참조 경로(#/$defs/)와 정의 키를 맞춤
    if let Some(definitions) = object.remove("definitions") {
        object.insert("$defs".to_owned(), definitions);
    }

    let mut any_of = vec![json!({ "type": "null" })];
    any_of.extend(refs.into_iter().map(|(_, reference)| reference));

    let package = object
        .get_mut("$defs")
        .and_then(|defs| defs.get_mut("Package"))
        .and_then(|pkg| pkg.get_mut("properties"))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| {
            CatalogError::Serialization("schema is missing Package properties".to_owned())
        })?;
    let mut metadata = Map::new();
    metadata.insert("anyOf".to_owned(), Value::Array(any_of));
    package.insert("metadata".to_owned(), Value::Object(metadata));

    Ok(schema)
}

/// 스키마를 2칸 들여쓰기 JSON 텍스트로 직렬화합니다 (끝에 개행 포함).
pub fn render(schema: &Value) -> Result<String, CatalogError> {
    let mut text = serde_json::to_string_pretty(schema).map_err(serialization)?;
    text.push('\n');
    Ok(text)
}

/// 버전별 스키마 파일 이름
pub fn file_name(version: &str) -> String {
    format!("schema-{version}.json")
}

/// 현재 버전 스키마를 `dir`에 씁니다.
///
/// # Errors
///
/// - 같은 이름의 파일이 다른 내용으로 있으면 `CatalogError::SchemaConflict`
/// - 디렉토리 생성, 읽기, 쓰기 실패 시 `CatalogError::Io`
pub fn write(dir: &Path) -> Result<PathBuf, CatalogError> {
    let text = render(&generate()?)?;
    write_text(dir, JSON_SCHEMA_VERSION, &text)
}

fn write_text(dir: &Path, version: &str, text: &str) -> Result<PathBuf, CatalogError> {
    let path = dir.join(file_name(version));
    let io = |e: std::io::Error| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    };

    if path.exists() {
        let existing = std::fs::read_to_string(&path).map_err(io)?;
        if existing == text {
            info!(path = %path.display(), "schema unchanged");
            return Ok(path);
        }
        return Err(CatalogError::SchemaConflict {
            path: path.display().to_string(),
        });
    }

    std::fs::create_dir_all(dir).map_err(io)?;
    std::fs::write(&path, text).map_err(io)?;
    info!(path = %path.display(), version, "schema written");
    Ok(path)
}
