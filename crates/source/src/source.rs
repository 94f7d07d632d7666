//! 스캔 대상 소스
//!
//! [`Source`]는 스캔 대상(디렉토리, 단일 파일, 풀린 이미지 레이어)을 나타내며
//! 해당 종류의 resolver와 출력용 [`SourceDescription`]을 만듭니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::directory::{absolute, index_directory};
use crate::error::SourceError;
use crate::excluding::{ExcludingResolver, exclude_globs};
use crate::image::{Layer, squash_layers};
use crate::index::IndexResolver;
use crate::resolver::Resolver;
use crate::single_file::index_file;

/// 소스 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// 디렉토리 트리
    Directory,
    /// 단일 파일
    File,
    /// 컨테이너 이미지
    Image,
    /// 알 수 없음 (출력 모델로 변환할 수 없음)
    Unknown,
}

impl Scheme {
    /// 문자열 표현
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
            Self::Image => "image",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 이미지 소스 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// 사용자가 입력한 이미지 이름
    pub user_input: String,
    /// 레이어 구성에서 계산한 이미지 식별자
    #[serde(rename = "imageID")]
    pub image_id: String,
    /// 아래에서 위 순서의 레이어 digest
    pub layers: Vec<String>,
    /// 태그 목록
    #[serde(default)]
    pub tags: Vec<String>,
    /// 저장소 digest 목록
    #[serde(default)]
    pub repo_digests: Vec<String>,
}

/// 출력 문서에 기록되는 소스 설명
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescription {
    /// 종류와 대상에서 결정적으로 계산한 ID
    pub id: String,
    /// 소스 종류
    pub scheme: Scheme,
    /// 디렉토리/파일 경로 (이미지는 입력 이름)
    pub path: String,
    /// 이미지 메타데이터 (이미지 소스만)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageMetadata>,
}

impl SourceDescription {
    /// 종류와 대상으로 설명을 만듭니다.
    pub fn new(scheme: Scheme, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: source_id(scheme, &path),
            scheme,
            path,
            image: None,
        }
    }
}

fn source_id(scheme: Scheme, target: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(scheme.as_str().as_bytes());
    hasher.update(b"\0");
    hasher.update(target.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// 스캔 대상
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// 디렉토리 트리
    Directory {
        /// 절대 경로
        path: PathBuf,
    },
    /// 단일 파일
    File {
        /// 절대 경로
        path: PathBuf,
    },
    /// 풀린 이미지 레이어
    Image {
        /// 사용자 입력 이름
        name: String,
        /// 아래에서 위 순서의 레이어
        layers: Vec<Layer>,
    },
}

impl Source {
    /// 경로의 종류(디렉토리/파일)를 판별해 소스를 만듭니다.
    pub fn detect(target: &Path) -> Result<Self, SourceError> {
        let md = std::fs::metadata(target).map_err(|e| SourceError::Io {
            path: target.display().to_string(),
            source: e,
        })?;
        let path = absolute(target);
        if md.is_dir() {
            Ok(Self::Directory { path })
        } else if md.is_file() {
            Ok(Self::File { path })
        } else {
            Err(SourceError::Unsupported(format!(
                "neither a directory nor a regular file: {}",
                target.display()
            )))
        }
    }

    /// 이미지 소스를 만듭니다.
    pub fn image(name: impl Into<String>, layers: Vec<Layer>) -> Result<Self, SourceError> {
        if layers.is_empty() {
            return Err(SourceError::Unsupported(
                "image source requires at least one layer".to_owned(),
            ));
        }
        Ok(Self::Image {
            name: name.into(),
            layers,
        })
    }

    /// 소스 종류
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::Directory { .. } => Scheme::Directory,
            Self::File { .. } => Scheme::File,
            Self::Image { .. } => Scheme::Image,
        }
    }

    /// 출력용 설명
    pub fn describe(&self) -> SourceDescription {
        match self {
            Self::Directory { path } | Self::File { path } => {
                SourceDescription::new(self.scheme(), path.display().to_string())
            }
            Self::Image { name, layers } => {
                let digests: Vec<String> = layers.iter().map(|l| l.id.clone()).collect();
                let image_id = format!(
                    "blake3:{}",
                    blake3::hash(digests.join("\n").as_bytes()).to_hex()
                );
                let mut description = SourceDescription::new(Scheme::Image, name.clone());
                description.image = Some(ImageMetadata {
                    user_input: name.clone(),
                    image_id,
                    layers: digests,
                    tags: Vec::new(),
                    repo_digests: Vec::new(),
                });
                description
            }
        }
    }

    /// 소스를 인덱싱해 resolver를 만듭니다. 파일을 순회하므로 blocking 작업입니다.
    pub fn resolver(&self) -> Result<IndexResolver, SourceError> {
        let index = match self {
            Self::Directory { path } => index_directory(path)?,
            Self::File { path } => index_file(path)?,
            Self::Image { layers, .. } => squash_layers(layers)?,
        };
        info!(
            scheme = %self.scheme(),
            entries = index.len(),
            "source indexed"
        );
        Ok(IndexResolver::new(index))
    }

    /// 제외 glob을 적용한 resolver를 만듭니다. 패턴이 없으면 제외 없이 그대로입니다.
    pub fn excluding_resolver(
        &self,
        exclude: &[String],
    ) -> Result<Arc<dyn Resolver>, SourceError> {
        let resolver = self.resolver()?;
        if exclude.is_empty() {
            return Ok(Arc::new(resolver));
        }
        let exclude_fn = exclude_globs(exclude)?;
        Ok(Arc::new(ExcludingResolver::new(resolver, exclude_fn)))
    }
}
