//! 소스 내부 경로 유틸리티
//!
//! 소스 경로는 항상 `/`로 시작하는 절대 경로이며 `/`로 구분합니다.

use glob::{MatchOptions, Pattern};

use crate::error::SourceError;

/// glob 질의에 사용하는 매칭 옵션 (`*`는 `/`를 넘지 않고, `**`만 넘음)
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// 경로를 정규화합니다: 선행 `/` 보장, `.`/`..`/중복 구분자 제거.
pub fn clean(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for comp in path.split('/') {
        match comp {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("/{}", parts.join("/"))
}

/// 부모 디렉토리 (`/`의 부모는 `/`)
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(pos) => &path[..pos],
    }
}

/// 디렉토리와 하위 경로를 합칩니다.
pub fn join(dir: &str, rest: &str) -> String {
    clean(&format!("{dir}/{rest}"))
}

/// 마지막 경로 요소
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// 마지막 `.` 이후 확장자 (점 포함). 점 파일(`.bashrc`)은 확장자가 없습니다.
pub fn extension(path: &str) -> Option<&str> {
    let name = basename(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(pos) => Some(&name[pos..]),
    }
}

/// 확장자 질의 값을 `.ext` 형태로 맞춥니다.
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_owned()
    } else {
        format!(".{ext}")
    }
}

/// glob 패턴을 컴파일합니다.
pub fn compile_glob(pattern: &str) -> Result<Pattern, SourceError> {
    Pattern::new(pattern).map_err(|e| SourceError::InvalidPattern {
        pattern: pattern.to_owned(),
        reason: e.to_string(),
    })
}

/// 소스 경로가 패턴과 맞는지 확인합니다. 선행 `/` 유무와 관계없이 매칭합니다.
pub fn glob_matches(pattern: &Pattern, path: &str) -> bool {
    pattern.matches_with(path, GLOB_OPTIONS)
        || pattern.matches_with(path.trim_start_matches('/'), GLOB_OPTIONS)
}
