//! Package URL 생성
//!
//! `pkg:<type>/<namespace>/<name>@<version>?<qualifiers>#<subpath>` 형식을 만듭니다.
//! 각 경로 세그먼트와 값은 비예약 문자(`A-Z a-z 0-9 . - _ ~`)를 제외하고
//! 퍼센트 인코딩됩니다. 한정자는 키 순으로 정렬됩니다.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use super::types::PackageType;

/// Package URL 빌더
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Purl {
    ty: String,
    namespace: Vec<String>,
    name: String,
    version: String,
    qualifiers: BTreeMap<String, String>,
    subpath: String,
}

impl Purl {
    /// 타입과 이름으로 PURL을 시작합니다.
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// 네임스페이스를 `/` 단위로 나누어 설정합니다.
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
        self
    }

    /// 버전을 설정합니다. 빈 버전은 출력에서 생략됩니다.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// 한정자를 추가합니다. 값이 비어 있으면 무시합니다.
    pub fn qualifier(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.qualifiers.insert(key.to_ascii_lowercase(), value);
        }
        self
    }

    /// 하위 경로를 설정합니다.
    pub fn subpath(mut self, subpath: impl Into<String>) -> Self {
        self.subpath = subpath.into();
        self
    }

    /// 패키지 종류 규칙에 따라 이름을 네임스페이스와 이름으로 나눠 PURL을 만듭니다.
    ///
    /// PURL 타입이 없는 종류(`binary` 등)는 `None`입니다.
    pub fn for_package(ty: PackageType, name: &str, version: &str) -> Option<Self> {
        let purl_type = ty.purl_type();
        if purl_type.is_empty() || name.is_empty() {
            return None;
        }

        let purl = match ty {
            PackageType::GoModule | PackageType::PhpComposer => match name.rsplit_once('/') {
                Some((namespace, leaf)) => Self::new(purl_type, leaf).namespace(namespace),
                None => Self::new(purl_type, name),
            },
            PackageType::Npm => match name.strip_prefix('@').and_then(|n| n.split_once('/')) {
                Some((scope, leaf)) => Self::new(purl_type, leaf).namespace(&format!("@{scope}")),
                None => Self::new(purl_type, name),
            },
            PackageType::JavaArchive | PackageType::JenkinsPlugin => {
                match name.split_once(':') {
                    Some((group, artifact)) => Self::new(purl_type, artifact).namespace(group),
                    None => Self::new(purl_type, name),
                }
            }
            _ => Self::new(purl_type, name),
        };
        Some(purl.version(version))
    }
}

impl fmt::Display for Purl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pkg:{}/", self.ty.to_ascii_lowercase())?;
        for segment in &self.namespace {
            write!(f, "{}/", escape(segment))?;
        }
        f.write_str(&escape(&self.name))?;
        if !self.version.is_empty() {
            write!(f, "@{}", escape(&self.version))?;
        }
        for (i, (key, value)) in self.qualifiers.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={}", escape(value))?;
        }
        if !self.subpath.is_empty() {
            f.write_char('#')?;
            let segments: Vec<String> = self
                .subpath
                .split('/')
                .filter(|s| !s.is_empty() && *s != "." && *s != "..")
                .map(escape)
                .collect();
            f.write_str(&segments.join("/"))?;
        }
        Ok(())
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purl(ty: PackageType, name: &str, version: &str) -> String {
        Purl::for_package(ty, name, version).unwrap().to_string()
    }

    #[test]
    fn golang_splits_namespace() {
        assert_eq!(
            purl(PackageType::GoModule, "github.com/x/y", "v1.2.3"),
            "pkg:golang/github.com/x/y@v1.2.3"
        );
    }

    #[test]
    fn npm_scope_is_encoded() {
        assert_eq!(
            purl(PackageType::Npm, "@scope/name", "1.0.0"),
            "pkg:npm/%40scope/name@1.0.0"
        );
        assert_eq!(purl(PackageType::Npm, "lodash", "4.17.21"), "pkg:npm/lodash@4.17.21");
    }

    #[test]
    fn cargo_purl() {
        assert_eq!(purl(PackageType::RustCrate, "serde", "1.0.0"), "pkg:cargo/serde@1.0.0");
    }

    #[test]
    fn empty_version_is_omitted() {
        assert_eq!(purl(PackageType::RustCrate, "serde", ""), "pkg:cargo/serde");
    }

    #[test]
    fn qualifiers_are_sorted_and_escaped() {
        let p = Purl::new("rpm", "bash")
            .namespace("redhat")
            .version("5.1-2")
            .qualifier("epoch", "1")
            .qualifier("arch", "x86_64")
            .qualifier("distro", "");
        assert_eq!(p.to_string(), "pkg:rpm/redhat/bash@5.1-2?arch=x86_64&epoch=1");
    }

    #[test]
    fn version_special_chars_are_escaped() {
        assert_eq!(
            purl(PackageType::GoModule, "github.com/a/b", "v2.0.0+incompatible"),
            "pkg:golang/github.com/a/b@v2.0.0%2Bincompatible"
        );
    }

    #[test]
    fn maven_group_becomes_namespace() {
        assert_eq!(
            purl(PackageType::JavaArchive, "org.apache:commons", "1.0"),
            "pkg:maven/org.apache/commons@1.0"
        );
    }

    #[test]
    fn subpath_drops_dot_segments() {
        let p = Purl::new("golang", "y").namespace("github.com/x").subpath("./cmd/../tool");
        assert_eq!(p.to_string(), "pkg:golang/github.com/x/y#cmd/tool");
    }

    #[test]
    fn binary_has_no_purl() {
        assert!(Purl::for_package(PackageType::Binary, "busybox", "1.36").is_none());
    }
}
