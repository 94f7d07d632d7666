//! JSON 출력 문서 모델
//!
//! 인코더가 그대로 직렬화하는 형태입니다. 목록 필드는 비어 있어도 `null`이 아니라 `[]`로
//! 직렬화됩니다. 스키마 생성도 이 타입에서 출발합니다.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::file::FileDigest;
use crate::sbom::SearchResult;

/// 최상위 문서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// 패키지 (정렬됨)
    pub artifacts: Vec<Package>,
    /// 관계 (부모, 자식, 종류 순 정렬)
    pub artifact_relationships: Vec<Relationship>,
    /// 파일 (실제 경로 순 정렬)
    #[serde(default)]
    pub files: Vec<File>,
    /// 비밀 탐지 결과 (실제 경로 순 정렬)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<Secrets>,
    /// 스캔 대상
    pub source: Source,
    /// 리눅스 배포판 정보
    #[serde(default)]
    pub distro: LinuxRelease,
    /// 실행 기술자
    pub descriptor: Descriptor,
    /// 문서 스키마
    pub schema: Schema,
}

/// 파일 좌표
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    /// 실제 경로
    pub path: String,
    /// 레이어 식별자
    #[serde(rename = "layerID", default, skip_serializing_if = "String::is_empty")]
    pub layer_id: String,
}

impl From<&strata_source::Coordinates> for Coordinates {
    fn from(c: &strata_source::Coordinates) -> Self {
        Self {
            path: c.real_path.clone(),
            layer_id: c.file_system_id.clone(),
        }
    }
}

/// 패키지
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub package_type: String,
    pub found_by: Vec<String>,
    pub locations: Vec<Coordinates>,
    pub licenses: Vec<String>,
    pub language: String,
    pub cpes: Vec<String>,
    pub purl: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub metadata_type: String,
    /// 스키마에서는 알려진 메타데이터 형태의 anyOf로 대체됨
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// 관계
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Relationship {
    pub parent: String,
    pub child: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// 파일 하나
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct File {
    pub id: String,
    pub location: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadataEntry>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contents: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub digests: Vec<FileDigest>,
}

/// 파일 메타데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadataEntry {
    /// 8진수 자릿수를 10진 정수로 읽은 값 (0o755 -> 755)
    pub mode: u64,
    #[serde(rename = "type")]
    pub file_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link_destination: String,
    #[serde(rename = "userID")]
    pub user_id: u32,
    #[serde(rename = "groupID")]
    pub group_id: u32,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// 위치별 비밀 탐지 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Secrets {
    pub location: Coordinates,
    pub secrets: Vec<SearchResult>,
}

/// 스캔 대상
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Source {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// 디렉토리/파일은 경로 문자열, 이미지는 이미지 메타데이터 객체
    pub target: serde_json::Value,
}

/// 리눅스 배포판 정보 (os-release)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinuxRelease {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pretty_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub id_like: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, rename = "versionID", skip_serializing_if = "String::is_empty")]
    pub version_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version_codename: String,
    #[serde(default, rename = "homeURL", skip_serializing_if = "String::is_empty")]
    pub home_url: String,
    #[serde(default, rename = "cpeName", skip_serializing_if = "String::is_empty")]
    pub cpe_name: String,
}

/// 실행 기술자
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Descriptor {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub configuration: serde_json::Value,
}

/// 문서 스키마 식별
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Schema {
    pub version: String,
    pub url: String,
}
