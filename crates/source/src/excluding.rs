//! 경로 제외 resolver
//!
//! [`ExcludingResolver`]는 임의의 [`Resolver`]를 감싸 제외 조건을 만족하는
//! 실제 경로를 보이지 않게 합니다. 제외된 경로는 호출자 입장에서 처음부터
//! 없던 경로와 구분되지 않습니다 (목록에서 빠지고, 직접 조회는 `NotFound`).
//!
//! 심볼릭 링크를 거쳐 제외된 파일에 닿는 위치도 숨깁니다. 위치의 접근 경로를
//! 내부 resolver로 해석한 실제 경로가 제외 대상이면 그 위치는 없는 것으로 봅니다.

use std::sync::Arc;

use crate::error::SourceError;
use crate::location::Location;
use crate::metadata::FileMetadata;
use crate::paths;
use crate::resolver::{FileContents, Resolver};
use crate::stream::LocationStream;

/// 실제 경로를 받아 제외 여부를 돌려주는 조건
pub type ExcludeFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// 제외 조건을 적용하는 resolver 데코레이터
pub struct ExcludingResolver<R> {
    inner: Arc<R>,
    exclude: ExcludeFn,
}

impl<R: Resolver> ExcludingResolver<R> {
    /// 감쌀 resolver와 제외 조건으로 생성합니다.
    pub fn new(inner: R, exclude: ExcludeFn) -> Self {
        Self {
            inner: Arc::new(inner),
            exclude,
        }
    }

    /// 감싼 resolver
    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn excluded(&self, path: &str) -> bool {
        (self.exclude)(path)
    }

    fn hidden(&self, location: &Location) -> bool {
        hides(self.inner.as_ref(), &self.exclude, location)
    }

    fn visible(&self, locations: Vec<Location>) -> Vec<Location> {
        locations
            .into_iter()
            .filter(|l| !self.excluded(l.real_path()))
            .collect()
    }
}

/// 위치 자체 또는 링크를 따라간 대상이 제외되면 `true`
fn hides<R: Resolver + ?Sized>(inner: &R, exclude: &ExcludeFn, location: &Location) -> bool {
    if exclude(location.real_path()) {
        return true;
    }
    // 끊어진 링크나 디렉토리는 해석 결과가 없으며 자기 경로만으로 판단
    inner
        .files_by_path(&[location.access_path()])
        .map(|resolved| resolved.iter().any(|l| exclude(l.real_path())))
        .unwrap_or(false)
}

impl<R> std::fmt::Debug for ExcludingResolver<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExcludingResolver").finish_non_exhaustive()
    }
}

impl<R: Resolver + 'static> Resolver for ExcludingResolver<R> {
    fn files_by_path(&self, paths: &[&str]) -> Result<Vec<Location>, SourceError> {
        Ok(self.visible(self.inner.files_by_path(paths)?))
    }

    fn files_by_glob(&self, patterns: &[&str]) -> Result<Vec<Location>, SourceError> {
        Ok(self.visible(self.inner.files_by_glob(patterns)?))
    }

    fn files_by_mime_type(&self, types: &[&str]) -> Result<Vec<Location>, SourceError> {
        Ok(self.visible(self.inner.files_by_mime_type(types)?))
    }

    fn files_by_extension(&self, extensions: &[&str]) -> Result<Vec<Location>, SourceError> {
        Ok(self.visible(self.inner.files_by_extension(extensions)?))
    }

    fn files_by_basename(&self, names: &[&str]) -> Result<Vec<Location>, SourceError> {
        Ok(self.visible(self.inner.files_by_basename(names)?))
    }

    fn files_by_basename_glob(&self, patterns: &[&str]) -> Result<Vec<Location>, SourceError> {
        Ok(self.visible(self.inner.files_by_basename_glob(patterns)?))
    }

    fn file_contents_by_location(&self, location: &Location) -> Result<FileContents, SourceError> {
        if self.hidden(location) {
            return Err(SourceError::not_found(location.real_path()));
        }
        self.inner.file_contents_by_location(location)
    }

    fn file_metadata_by_location(&self, location: &Location) -> Result<FileMetadata, SourceError> {
        if self.hidden(location) {
            return Err(SourceError::not_found(location.real_path()));
        }
        self.inner.file_metadata_by_location(location)
    }

    fn has_path(&self, path: &str) -> bool {
        let clean = paths::clean(path);
        if self.excluded(path) || self.excluded(&clean) {
            return false;
        }
        self.inner.has_path(path) && !self.hidden(&Location::new(clean))
    }

    fn relative_file_by_path(&self, base: &Location, path: &str) -> Option<Location> {
        self.inner
            .relative_file_by_path(base, path)
            .filter(|l| !self.excluded(l.real_path()))
    }

    fn all_locations(&self) -> LocationStream {
        let exclude = Arc::clone(&self.exclude);
        let inner = Arc::clone(&self.inner);
        self.inner
            .all_locations()
            .filter(move |l| !hides(inner.as_ref(), &exclude, l))
    }
}

/// glob 패턴 목록으로 제외 조건을 만듭니다.
///
/// `./`로 시작하는 패턴은 소스 루트 기준 절대 패턴(`/`)으로 바꿉니다.
pub fn exclude_globs(patterns: &[String]) -> Result<ExcludeFn, SourceError> {
    let compiled = patterns
        .iter()
        .map(|p| {
            let normalized = match p.strip_prefix("./") {
                Some(rest) => format!("/{rest}"),
                None => p.clone(),
            };
            paths::compile_glob(&normalized)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Arc::new(move |path: &str| {
        compiled.iter().any(|p| paths::glob_matches(p, path))
    }))
}
