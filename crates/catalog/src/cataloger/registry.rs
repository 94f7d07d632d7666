//! 카탈로거 레지스트리와 이름 기반 선택
//!
//! [`CatalogerRegistry`]는 적용 범위(이미지 / 디렉토리)별 카탈로거 목록을 설정으로부터
//! 명시적으로 구성합니다. 전역 등록 상태는 없으므로 테스트마다 독립된 레지스트리를 만들 수 있습니다.
//!
//! # 선택 규칙
//!
//! 패턴과 이름 모두 끝의 `-cataloger`를 떼고 비교합니다. 패턴이 이름 안에서 `-` 또는
//! 문자열 경계로 구분된 단어로 나타나야 일치합니다.
//!
//! ```
//! use strata_catalog::cataloger::registry::has_full_word;
//!
//! assert!(has_full_word("go", "go-mod"));
//! assert!(!has_full_word("go", "gopher"));
//! assert!(!has_full_word("cataloger", "go-mod"));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use strata_source::Scheme;
use tracing::info;

use super::golang::{go_mod_file_cataloger, go_module_binary_cataloger};
use super::javascript::{javascript_lock_cataloger, javascript_package_cataloger};
use super::rust::rust_cargo_lock_cataloger;
use super::Cataloger;
use crate::config::CatalogerConfig;
use crate::error::CatalogError;

const CATALOGER_SUFFIX: &str = "-cataloger";
const ALL_PATTERN: &str = "all";

/// 카탈로거 적용 범위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// 컨테이너 이미지
    Image,
    /// 디렉토리, 단일 파일
    Directory,
    /// 이미지와 디렉토리의 합집합
    All,
}

impl Scope {
    /// 소스 종류에 맞는 범위를 고릅니다.
    pub fn for_scheme(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Image => Self::Image,
            Scheme::Directory | Scheme::File => Self::Directory,
            Scheme::Unknown => Self::All,
        }
    }

    /// 문자열 표현
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Directory => "directory",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "directory" | "dir" | "file" => Ok(Self::Directory),
            "all" => Ok(Self::All),
            other => Err(CatalogError::Config {
                field: "scope".to_owned(),
                reason: format!("unknown scope '{other}' (expected image, directory or all)"),
            }),
        }
    }
}

/// 범위별 카탈로거 목록
#[derive(Clone, Default)]
pub struct CatalogerRegistry {
    image: Vec<Arc<dyn Cataloger>>,
    directory: Vec<Arc<dyn Cataloger>>,
}

impl CatalogerRegistry {
    /// 기본 카탈로거로 레지스트리를 구성합니다.
    pub fn new(config: &CatalogerConfig) -> Self {
        let max = config.max_file_size;
        let mut registry = Self::empty();

        registry.register(Scope::All, go_module_binary_cataloger(max));
        registry.register(Scope::Image, javascript_package_cataloger(max));
        registry.register(Scope::Directory, go_mod_file_cataloger(max));
        registry.register(Scope::Directory, javascript_lock_cataloger(max));
        registry.register(Scope::Directory, rust_cargo_lock_cataloger(max));
        registry
    }

    /// 빈 레지스트리
    pub fn empty() -> Self {
        Self::default()
    }

    /// 카탈로거를 범위에 등록합니다. `Scope::All`은 양쪽 모두에 등록합니다.
    pub fn register(&mut self, scope: Scope, cataloger: impl Cataloger + 'static) {
        self.register_arc(scope, Arc::new(cataloger));
    }

    /// 공유 카탈로거를 범위에 등록합니다.
    pub fn register_arc(&mut self, scope: Scope, cataloger: Arc<dyn Cataloger>) {
        match scope {
            Scope::Image => self.image.push(cataloger),
            Scope::Directory => self.directory.push(cataloger),
            Scope::All => {
                self.image.push(Arc::clone(&cataloger));
                self.directory.push(cataloger);
            }
        }
    }

    /// 범위에 적용 가능한 카탈로거 (등록 순서, `All`은 이름 기준 중복 제거)
    pub fn catalogers(&self, scope: Scope) -> Vec<Arc<dyn Cataloger>> {
        match scope {
            Scope::Image => self.image.clone(),
            Scope::Directory => self.directory.clone(),
            Scope::All => {
                let mut seen = HashSet::new();
                self.image
                    .iter()
                    .chain(self.directory.iter())
                    .filter(|c| seen.insert(c.name().to_owned()))
                    .cloned()
                    .collect()
            }
        }
    }

    /// 범위의 카탈로거를 이름 패턴으로 거릅니다.
    pub fn select(&self, scope: Scope, patterns: &[String]) -> Vec<Arc<dyn Cataloger>> {
        select_catalogers(self.catalogers(scope), patterns)
    }
}

impl fmt::Debug for CatalogerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |list: &[Arc<dyn Cataloger>]| -> Vec<String> {
            list.iter().map(|c| c.name().to_owned()).collect()
        };
        f.debug_struct("CatalogerRegistry")
            .field("image", &names(&self.image))
            .field("directory", &names(&self.directory))
            .finish()
    }
}

/// 이름 패턴으로 카탈로거를 고릅니다.
///
/// 패턴이 없거나 `all`이 있으면 전부 선택합니다. 일치하는 것이 없어도 에러가 아닙니다.
pub fn select_catalogers(
    catalogers: Vec<Arc<dyn Cataloger>>,
    patterns: &[String],
) -> Vec<Arc<dyn Cataloger>> {
    if patterns.is_empty() || patterns.iter().any(|p| p == ALL_PATTERN) {
        return catalogers;
    }

    let partials: Vec<&str> = patterns
        .iter()
        .map(|p| strip_suffix(p))
        .filter(|p| !p.is_empty())
        .collect();

    catalogers
        .into_iter()
        .filter(|c| {
            let name = strip_suffix(c.name());
            let keep = partials.iter().any(|p| has_full_word(p, name));
            if !keep {
                info!(cataloger = %c.name(), "skipping cataloger");
            }
            keep
        })
        .collect()
}

fn strip_suffix(name: &str) -> &str {
    name.strip_suffix(CATALOGER_SUFFIX).unwrap_or(name)
}

/// `partial`이 `target` 안에 `-`로 구분된 온전한 단어로 나타나는지 확인합니다.
///
/// 빈 문자열과 `cataloger`는 어떤 것과도 일치하지 않습니다.
pub fn has_full_word(partial: &str, target: &str) -> bool {
    if partial.is_empty() || partial == "cataloger" {
        return false;
    }
    target.match_indices(partial).any(|(start, _)| {
        let end = start + partial.len();
        let left = start == 0 || target.as_bytes()[start - 1] == b'-';
        let right = end == target.len() || target.as_bytes()[end] == b'-';
        left && right
    })
}
