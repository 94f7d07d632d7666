//! SBOM 집계
//!
//! [`Sbom`]은 한 번의 실행 결과 전체(카탈로그, 관계, 파일 분석 결과, 소스 설명,
//! 실행 기술자)를 담는 불변 스냅샷입니다. 조립 후에는 변경하지 않으며,
//! 출력 인코더는 읽기만 합니다.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strata_source::{Coordinates, FileMetadata, SourceDescription};

use crate::file::FileDigest;
use crate::pkg::Catalog;
use crate::relationship::{Relationship, sort_relationships};

/// 도구 이름
pub const TOOL_NAME: &str = "strata";

/// 실행 기술자 -- 어떤 도구가 어떤 설정으로 만들었는지
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Descriptor {
    /// 도구 이름
    pub name: String,
    /// 도구 버전
    pub version: String,
    /// 실행 설정
    pub configuration: serde_json::Value,
}

impl Descriptor {
    /// 이 크레이트 버전으로 기술자를 만듭니다.
    pub fn new(configuration: serde_json::Value) -> Self {
        Self {
            name: TOOL_NAME.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            configuration,
        }
    }
}

impl Default for Descriptor {
    fn default() -> Self {
        Self::new(serde_json::Value::Null)
    }
}

/// 비밀 탐지 결과 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// 탐지 규칙 이름
    pub classification: String,
    /// 줄 번호 (1부터)
    pub line_number: u64,
    /// 줄 안 오프셋
    pub line_offset: u64,
    /// 파일 안 바이트 오프셋
    pub seek_position: u64,
    /// 일치 길이
    pub length: u64,
    /// 일치 값 (마스킹 여부는 생산자 책임)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// 파일 분석 결과 (위치 좌표 기준)
#[derive(Debug, Clone, Default)]
pub struct FileArtifacts {
    /// 파일 메타데이터
    pub metadata: BTreeMap<Coordinates, FileMetadata>,
    /// 파일 다이제스트
    pub digests: BTreeMap<Coordinates, Vec<FileDigest>>,
    /// 기록한 파일 내용
    pub contents: BTreeMap<Coordinates, String>,
    /// 비밀 탐지 결과
    pub secrets: BTreeMap<Coordinates, Vec<SearchResult>>,
}

impl FileArtifacts {
    /// 분석 결과가 있는 모든 좌표 (정렬됨)
    pub fn coordinates(&self) -> Vec<Coordinates> {
        let mut all: Vec<Coordinates> = self
            .metadata
            .keys()
            .chain(self.digests.keys())
            .chain(self.contents.keys())
            .cloned()
            .collect();
        all.sort();
        all.dedup();
        all
    }
}

/// 실행 결과 스냅샷
#[derive(Debug)]
pub struct Sbom {
    /// 패키지 카탈로그
    pub catalog: Catalog,
    /// 관계 (정렬됨)
    pub relationships: Vec<Relationship>,
    /// 파일 분석 결과
    pub files: FileArtifacts,
    /// 스캔 대상 설명
    pub source: SourceDescription,
    /// 실행 기술자
    pub descriptor: Descriptor,
}

impl Sbom {
    /// 구성 요소로 스냅샷을 조립합니다. 관계는 여기서 정렬됩니다.
    pub fn new(
        catalog: Catalog,
        mut relationships: Vec<Relationship>,
        files: FileArtifacts,
        source: SourceDescription,
        descriptor: Descriptor,
    ) -> Self {
        sort_relationships(&mut relationships);
        Self {
            catalog,
            relationships,
            files,
            source,
            descriptor,
        }
    }
}
