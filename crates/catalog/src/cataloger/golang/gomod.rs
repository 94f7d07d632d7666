//! go.mod / go.sum 파서
//!
//! `go.mod`의 `require`, `replace`, `exclude` 지시어로 모듈 목록을 만들고, 같은
//! 디렉토리의 `go.sum`에서 `h1:` 다이제스트를 채웁니다. `go.sum` 파일 자체는 옆에 있는
//! `go.mod`가 언급하지 않는 모듈만 내보냅니다.
//!
//! # go.mod 예시
//!
//! ```text
//! module example.com/app
//!
//! go 1.21
//!
//! require (
//!     github.com/x/y v1.2.3
//!     golang.org/x/net v0.17.0 // indirect
//! )
//!
//! replace github.com/old/mod => github.com/new/mod v1.0.0
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use strata_source::{Location, Resolver, paths, read_to_string};
use tracing::warn;

use crate::cataloger::{CatalogerOutput, FileParser};
use crate::error::CatalogError;
use crate::pkg::metadata::{GolangModMetadata, Metadata};
use crate::pkg::{Package, PackageType};

/// 모듈 경로와 버전
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleVersion {
    /// 모듈 경로
    pub path: String,
    /// 버전 (replace 왼쪽처럼 생략될 수 있음)
    pub version: Option<String>,
}

/// `replace` 지시어
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace {
    /// 대체 대상
    pub old: ModuleVersion,
    /// 대체 모듈
    pub new: ModuleVersion,
}

/// 파싱된 go.mod
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoModFile {
    /// `module` 경로
    pub module: String,
    /// `go` 버전
    pub go_version: String,
    /// `require` 목록
    pub requires: Vec<ModuleVersion>,
    /// `replace` 목록
    pub replaces: Vec<Replace>,
    /// `exclude` 목록
    pub excludes: Vec<ModuleVersion>,
}

impl GoModFile {
    /// go.mod 텍스트를 파싱합니다.
    pub fn parse(text: &str, path: &str) -> Result<Self, CatalogError> {
        let mut file = Self::default();
        let mut block: Option<String> = None;

        for (lineno, raw) in text.lines().enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            let err = |reason: &str| CatalogError::parse(path, format!("line {}: {reason}", lineno + 1));

            if let Some(verb) = &block {
                if line == ")" {
                    block = None;
                    continue;
                }
                let verb = verb.clone();
                file.directive(&verb, line).map_err(|r| err(&r))?;
                continue;
            }

            let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let rest = rest.trim();
            if rest == "(" {
                block = Some(verb.to_owned());
                continue;
            }
            file.directive(verb, rest).map_err(|r| err(&r))?;
        }

        if block.is_some() {
            return Err(CatalogError::parse(path, "unterminated block"));
        }
        Ok(file)
    }

    fn directive(&mut self, verb: &str, args: &str) -> Result<(), String> {
        let fields: Vec<String> = args.split_whitespace().map(unquote).collect();
        match verb {
            "module" => {
                self.module = fields.first().cloned().ok_or("module without path")?;
            }
            "go" => {
                self.go_version = fields.first().cloned().unwrap_or_default();
            }
            "require" | "exclude" => {
                let [path, version] = fields.as_slice() else {
                    return Err(format!("{verb} expects module path and version"));
                };
                let module = ModuleVersion {
                    path: path.clone(),
                    version: Some(version.clone()),
                };
                if verb == "require" {
                    self.requires.push(module);
                } else {
                    self.excludes.push(module);
                }
            }
            "replace" => {
                let arrow = fields
                    .iter()
                    .position(|f| f == "=>")
                    .ok_or("replace without =>")?;
                let old = module_from(&fields[..arrow]).ok_or("replace with bad left side")?;
                let new = module_from(&fields[arrow + 1..]).ok_or("replace with bad right side")?;
                self.replaces.push(Replace { old, new });
            }
            // toolchain, retract, godebug 등은 패키지 목록과 무관
            _ => {}
        }
        Ok(())
    }

    /// replace/exclude를 적용한 최종 모듈 목록 (경로 순)
    pub fn resolved_modules(&self) -> BTreeMap<String, String> {
        let mut modules: BTreeMap<String, String> = self
            .requires
            .iter()
            .map(|m| (m.path.clone(), m.version.clone().unwrap_or_default()))
            .collect();

        for replace in &self.replaces {
            let applies = match (&replace.old.version, modules.get(&replace.old.path)) {
                (Some(v), Some(current)) => v == current,
                (None, Some(_)) => true,
                (_, None) => false,
            };
            if !applies {
                continue;
            }
            modules.remove(&replace.old.path);
            // 로컬 디렉토리 대체는 버전이 없어 패키지로 기록하지 않음
            if let Some(version) = &replace.new.version {
                modules.insert(replace.new.path.clone(), version.clone());
            }
        }

        for exclude in &self.excludes {
            if modules.get(&exclude.path) == exclude.version.as_ref() {
                modules.remove(&exclude.path);
            }
        }
        modules
    }

    /// 이 파일이 언급하는 모든 모듈 경로
    pub fn mentioned_paths(&self) -> BTreeSet<&str> {
        self.requires
            .iter()
            .chain(self.excludes.iter())
            .chain(self.replaces.iter().flat_map(|r| [&r.old, &r.new]))
            .map(|m| m.path.as_str())
            .collect()
    }
}

fn module_from(fields: &[String]) -> Option<ModuleVersion> {
    match fields {
        [path] => Some(ModuleVersion {
            path: path.clone(),
            version: None,
        }),
        [path, version] => Some(ModuleVersion {
            path: path.clone(),
            version: Some(version.clone()),
        }),
        _ => None,
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn unquote(field: &str) -> String {
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
        .to_owned()
}

/// go.sum 항목: `(경로, 버전) -> h1 다이제스트`
///
/// `/go.mod` 해시만 있는 모듈은 빌드에 쓰이지 않으므로 포함하지 않습니다.
pub fn parse_go_sum(text: &str) -> BTreeMap<(String, String), String> {
    let mut entries = BTreeMap::new();
    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [path, version, digest] = fields.as_slice() else {
            continue;
        };
        if version.ends_with("/go.mod") || !digest.starts_with("h1:") {
            continue;
        }
        entries.insert(((*path).to_owned(), (*version).to_owned()), (*digest).to_owned());
    }
    entries
}

/// go.mod / go.sum 파서
#[derive(Debug, Clone)]
pub struct GoModParser {
    max_file_size: usize,
}

impl GoModParser {
    /// 옆 파일을 읽을 때 쓸 최대 크기로 생성합니다.
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    fn sibling(&self, resolver: &dyn Resolver, location: &Location, name: &str) -> Option<String> {
        let sibling = resolver.relative_file_by_path(location, name)?;
        match read_to_string(resolver, &sibling, self.max_file_size) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(path = %sibling.real_path(), error = %e, "failed to read sibling file");
                None
            }
        }
    }

    fn parse_mod(
        &self,
        resolver: &dyn Resolver,
        location: &Location,
        text: &str,
    ) -> Result<CatalogerOutput, CatalogError> {
        let file = GoModFile::parse(text, location.real_path())?;
        let digests: HashMap<(String, String), String> = self
            .sibling(resolver, location, "go.sum")
            .map(|sum| parse_go_sum(&sum).into_iter().collect())
            .unwrap_or_default();

        let packages = file
            .resolved_modules()
            .into_iter()
            .map(|(path, version)| {
                let h1_digest = digests
                    .get(&(path.clone(), version.clone()))
                    .cloned()
                    .unwrap_or_default();
                go_module(path, version, h1_digest)
            })
            .collect();
        Ok((packages, Vec::new()))
    }

    fn parse_sum(
        &self,
        resolver: &dyn Resolver,
        location: &Location,
        text: &str,
    ) -> Result<CatalogerOutput, CatalogError> {
        let listed: BTreeSet<String> = match self.sibling(resolver, location, "go.mod") {
            Some(go_mod) => GoModFile::parse(&go_mod, location.real_path())
                .map(|f| f.mentioned_paths().into_iter().map(str::to_owned).collect())
                .unwrap_or_default(),
            None => BTreeSet::new(),
        };

        let packages = parse_go_sum(text)
            .into_iter()
            .filter(|((path, _), _)| !listed.contains(path))
            .map(|((path, version), digest)| go_module(path, version, digest))
            .collect();
        Ok((packages, Vec::new()))
    }
}

fn go_module(path: String, version: String, h1_digest: String) -> Package {
    Package::new(path, version, PackageType::GoModule)
        .with_metadata(Metadata::GolangMod(GolangModMetadata { h1_digest }))
}

impl FileParser for GoModParser {
    fn parse(
        &self,
        resolver: &dyn Resolver,
        location: &Location,
        contents: &[u8],
    ) -> Result<CatalogerOutput, CatalogError> {
        let text = std::str::from_utf8(contents)
            .map_err(|e| CatalogError::parse(location.real_path(), e))?;
        if paths::basename(location.real_path()) == "go.sum" {
            self.parse_sum(resolver, location, text)
        } else {
            self.parse_mod(resolver, location, text)
        }
    }
}

#[cfg(test)]
mod tests {
    use strata_source::MockResolver;

    use super::*;

    const GO_MOD: &str = r#"module example.com/app

go 1.21

require (
	github.com/x/y v1.2.3
	github.com/old/mod v0.1.0 // indirect
	"github.com/quoted/mod" v2.0.0
	github.com/excluded/mod v1.0.0
)

require golang.org/x/net v0.17.0

replace github.com/old/mod => github.com/new/mod v1.0.0

replace github.com/quoted/mod => ../local/mod

exclude github.com/excluded/mod v1.0.0
"#;

    const GO_SUM: &str = "github.com/x/y v1.2.3 h1:abc=\n\
github.com/x/y v1.2.3/go.mod h1:modhash=\n\
github.com/only/gomod v0.0.1/go.mod h1:zzz=\n\
github.com/extra/mod v0.3.0 h1:extra=\n";

    #[test]
    fn parse_directives() {
        let file = GoModFile::parse(GO_MOD, "go.mod").unwrap();
        assert_eq!(file.module, "example.com/app");
        assert_eq!(file.go_version, "1.21");
        assert_eq!(file.requires.len(), 5);
        assert_eq!(file.replaces.len(), 2);
        assert_eq!(file.excludes.len(), 1);
        assert_eq!(file.requires[2].path, "github.com/quoted/mod");
    }

    #[test]
    fn resolved_modules_apply_replace_and_exclude() {
        let modules = GoModFile::parse(GO_MOD, "go.mod").unwrap().resolved_modules();
        let names: Vec<&str> = modules.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["github.com/new/mod", "github.com/x/y", "golang.org/x/net"]
        );
        assert_eq!(modules["github.com/new/mod"], "v1.0.0");
    }

    #[test]
    fn versioned_replace_only_matches_that_version() {
        let text = "module m\nrequire a.com/x v1.0.0\nreplace a.com/x v2.0.0 => b.com/x v2.0.0\n";
        let modules = GoModFile::parse(text, "go.mod").unwrap().resolved_modules();
        assert_eq!(modules.get("a.com/x").map(String::as_str), Some("v1.0.0"));
        assert!(!modules.contains_key("b.com/x"));
    }

    #[test]
    fn unterminated_block_is_error() {
        let err = GoModFile::parse("module m\nrequire (\n a.com/x v1\n", "go.mod").unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn bad_require_is_error() {
        assert!(GoModFile::parse("require a.com/x\n", "go.mod").is_err());
    }

    #[test]
    fn go_sum_skips_go_mod_hashes() {
        let entries = parse_go_sum(GO_SUM);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[&("github.com/x/y".to_owned(), "v1.2.3".to_owned())],
            "h1:abc="
        );
    }

    #[test]
    fn go_mod_uses_sibling_digests() {
        let resolver = MockResolver::new()
            .file("/app/go.mod", GO_MOD)
            .file("/app/go.sum", GO_SUM)
            .build();
        let location = resolver.files_by_path(&["/app/go.mod"]).unwrap().remove(0);
        let (packages, _) = GoModParser::new(1024 * 1024)
            .parse(&resolver, &location, GO_MOD.as_bytes())
            .unwrap();

        let xy = packages.iter().find(|p| p.name == "github.com/x/y").unwrap();
        assert_eq!(
            xy.metadata,
            Some(Metadata::GolangMod(GolangModMetadata {
                h1_digest: "h1:abc=".to_owned()
            }))
        );
        assert_eq!(xy.purl, "pkg:golang/github.com/x/y@v1.2.3");
    }

    #[test]
    fn go_sum_with_sibling_go_mod_emits_unlisted_only() {
        let resolver = MockResolver::new()
            .file("/app/go.mod", GO_MOD)
            .file("/app/go.sum", GO_SUM)
            .build();
        let location = resolver.files_by_path(&["/app/go.sum"]).unwrap().remove(0);
        let (packages, _) = GoModParser::new(1024 * 1024)
            .parse(&resolver, &location, GO_SUM.as_bytes())
            .unwrap();
        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["github.com/extra/mod"]);
    }

    #[test]
    fn standalone_go_sum_emits_everything() {
        let resolver = MockResolver::new().file("/vendor/lib/go.sum", GO_SUM).build();
        let location = resolver.files_by_path(&["/vendor/lib/go.sum"]).unwrap().remove(0);
        let (packages, _) = GoModParser::new(1024 * 1024)
            .parse(&resolver, &location, GO_SUM.as_bytes())
            .unwrap();
        assert_eq!(packages.len(), 2);
    }
}
