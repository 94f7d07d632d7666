//! 파일 해석 trait
//!
//! [`Resolver`]는 소스 종류(디렉토리, 단일 파일, 이미지 레이어)와 무관하게
//! 파일을 질의하고 읽는 읽기 전용 능력 집합입니다. 여러 카탈로거가 같은
//! 인스턴스를 동시에 읽으므로 `Send + Sync`이며 내부 변경을 노출하지 않습니다.
//!
//! # 계약
//!
//! - 경로 질의는 소스 루트 기준이며, 일치하는 항목이 없으면 에러가 아니라 빈 목록입니다.
//! - 목록 질의는 순서를 보장하지 않습니다. 순서가 필요한 호출자가 정렬합니다.
//! - 내용/메타데이터 조회는 위치가 해석되지 않으면 `NotFound`로 실패합니다.

use std::io::Read;
use std::sync::Arc;

use crate::error::SourceError;
use crate::location::Location;
use crate::metadata::FileMetadata;
use crate::stream::LocationStream;

/// 파일 내용 바이트 스트림
pub type FileContents = Box<dyn Read + Send>;

/// 소스 파일 질의 능력
pub trait Resolver: Send + Sync {
    /// 정확한 경로로 찾습니다. 심볼릭 링크는 대상까지 따라갑니다.
    fn files_by_path(&self, paths: &[&str]) -> Result<Vec<Location>, SourceError>;

    /// 셸 glob 패턴으로 찾습니다 (`**`는 디렉토리 경계를 넘음).
    fn files_by_glob(&self, patterns: &[&str]) -> Result<Vec<Location>, SourceError>;

    /// 내용 기반 MIME 타입으로 찾습니다.
    fn files_by_mime_type(&self, types: &[&str]) -> Result<Vec<Location>, SourceError>;

    /// 확장자로 찾습니다 (`json`, `.json` 모두 허용).
    fn files_by_extension(&self, extensions: &[&str]) -> Result<Vec<Location>, SourceError>;

    /// 파일 이름(basename)으로 찾습니다.
    fn files_by_basename(&self, names: &[&str]) -> Result<Vec<Location>, SourceError>;

    /// 파일 이름 glob 패턴으로 찾습니다.
    fn files_by_basename_glob(&self, patterns: &[&str]) -> Result<Vec<Location>, SourceError>;

    /// 위치의 파일 내용을 엽니다.
    fn file_contents_by_location(&self, location: &Location) -> Result<FileContents, SourceError>;

    /// 위치의 파일 메타데이터를 조회합니다.
    fn file_metadata_by_location(&self, location: &Location) -> Result<FileMetadata, SourceError>;

    /// 내용을 해석하지 않고 경로 존재 여부만 확인합니다.
    fn has_path(&self, path: &str) -> bool;

    /// `base`가 있는 디렉토리를 기준으로 `path`를 해석합니다.
    fn relative_file_by_path(&self, base: &Location, path: &str) -> Option<Location>;

    /// 모든 위치를 한 번 열거합니다.
    fn all_locations(&self) -> LocationStream;
}

impl<R: Resolver + ?Sized> Resolver for Arc<R> {
    fn files_by_path(&self, paths: &[&str]) -> Result<Vec<Location>, SourceError> {
        (**self).files_by_path(paths)
    }

    fn files_by_glob(&self, patterns: &[&str]) -> Result<Vec<Location>, SourceError> {
        (**self).files_by_glob(patterns)
    }

    fn files_by_mime_type(&self, types: &[&str]) -> Result<Vec<Location>, SourceError> {
        (**self).files_by_mime_type(types)
    }

    fn files_by_extension(&self, extensions: &[&str]) -> Result<Vec<Location>, SourceError> {
        (**self).files_by_extension(extensions)
    }

    fn files_by_basename(&self, names: &[&str]) -> Result<Vec<Location>, SourceError> {
        (**self).files_by_basename(names)
    }

    fn files_by_basename_glob(&self, patterns: &[&str]) -> Result<Vec<Location>, SourceError> {
        (**self).files_by_basename_glob(patterns)
    }

    fn file_contents_by_location(&self, location: &Location) -> Result<FileContents, SourceError> {
        (**self).file_contents_by_location(location)
    }

    fn file_metadata_by_location(&self, location: &Location) -> Result<FileMetadata, SourceError> {
        (**self).file_metadata_by_location(location)
    }

    fn has_path(&self, path: &str) -> bool {
        (**self).has_path(path)
    }

    fn relative_file_by_path(&self, base: &Location, path: &str) -> Option<Location> {
        (**self).relative_file_by_path(base, path)
    }

    fn all_locations(&self) -> LocationStream {
        (**self).all_locations()
    }
}

/// 위치의 내용을 최대 `max_size` 바이트까지 읽습니다.
///
/// 파일이 더 크면 `Io` 에러(`InvalidData`)를 돌려줍니다.
pub fn read_contents(
    resolver: &dyn Resolver,
    location: &Location,
    max_size: usize,
) -> Result<Vec<u8>, SourceError> {
    let reader = resolver.file_contents_by_location(location)?;
    let limit = u64::try_from(max_size).unwrap_or(u64::MAX).saturating_add(1);
    let mut buf = Vec::new();
    reader
        .take(limit)
        .read_to_end(&mut buf)
        .map_err(|e| SourceError::Io {
            path: location.real_path().to_owned(),
            source: e,
        })?;
    if buf.len() > max_size {
        return Err(SourceError::Io {
            path: location.real_path().to_owned(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("file larger than {max_size} bytes"),
            ),
        });
    }
    Ok(buf)
}

/// 위치의 내용을 UTF-8 문자열로 읽습니다 (손상된 바이트는 대체 문자로).
pub fn read_to_string(
    resolver: &dyn Resolver,
    location: &Location,
    max_size: usize,
) -> Result<String, SourceError> {
    let bytes = read_contents(resolver, location, max_size)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
