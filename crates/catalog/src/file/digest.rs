//! 파일 다이제스트 카탈로거
//!
//! 일반 파일의 내용을 한 번 스트리밍으로 읽으면서 설정된 모든 알고리즘의
//! 다이제스트를 동시에 계산합니다.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use metrics::counter;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use strata_core::metrics as m;
use strata_source::{Coordinates, Location, Resolver};
use tracing::{debug, warn};

use crate::error::CatalogError;

/// 다이제스트 알고리즘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-512
    Sha512,
}

impl DigestAlgorithm {
    /// 알고리즘 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// 대소문자와 하이픈을 무시하고 이름을 해석합니다 (`SHA-256`, `sha256`).
    pub fn from_str_loose(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "sha256" => Some(Self::Sha256),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 계산된 다이제스트 하나
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct FileDigest {
    /// 알고리즘 이름
    pub algorithm: String,
    /// 소문자 16진수 값
    pub value: String,
}

enum Hasher {
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Hasher {
    fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            DigestAlgorithm::Sha512 => Self::Sha512(Sha512::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
        }
    }

    fn finish(self) -> String {
        match self {
            Self::Sha256(h) => to_hex(&h.finalize()),
            Self::Sha512(h) => to_hex(&h.finalize()),
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// 리더를 끝까지 읽어 알고리즘별 다이제스트를 계산합니다.
///
/// 결과는 인자로 받은 알고리즘 순서를 따릅니다.
pub fn digests_of(
    mut reader: impl Read,
    algorithms: &[DigestAlgorithm],
) -> std::io::Result<Vec<FileDigest>> {
    let mut hashers: Vec<(DigestAlgorithm, Hasher)> =
        algorithms.iter().map(|a| (*a, Hasher::new(*a))).collect();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        for (_, hasher) in &mut hashers {
            hasher.update(&buf[..n]);
        }
    }
    Ok(hashers
        .into_iter()
        .map(|(algorithm, hasher)| FileDigest {
            algorithm: algorithm.as_str().to_owned(),
            value: hasher.finish(),
        })
        .collect())
}

/// 위치별 다이제스트 카탈로거
#[derive(Debug, Clone)]
pub struct FileDigestsCataloger {
    algorithms: Vec<DigestAlgorithm>,
}

impl FileDigestsCataloger {
    /// 계산할 알고리즘으로 생성합니다. 중복 알고리즘은 하나로 합칩니다.
    pub fn new(algorithms: &[DigestAlgorithm]) -> Self {
        let mut algorithms = algorithms.to_vec();
        algorithms.sort();
        algorithms.dedup();
        Self { algorithms }
    }

    /// 주어진 위치(없으면 모든 위치)의 일반 파일 다이제스트를 계산합니다.
    ///
    /// 읽을 수 없는 파일은 경고 후 건너뜁니다.
    pub fn catalog(
        &self,
        resolver: &dyn Resolver,
        locations: Option<Vec<Location>>,
    ) -> Result<BTreeMap<Coordinates, Vec<FileDigest>>, CatalogError> {
        let mut results = BTreeMap::new();
        if self.algorithms.is_empty() {
            return Ok(results);
        }

        let locations: Box<dyn Iterator<Item = Location>> = match locations {
            Some(list) => Box::new(list.into_iter()),
            None => Box::new(resolver.all_locations()),
        };

        for location in locations {
            let coordinates = location.coordinates().clone();
            if results.contains_key(&coordinates) {
                continue;
            }
            match resolver.file_metadata_by_location(&location) {
                Ok(md) if md.is_regular() => {}
                Ok(_) => {
                    debug!(path = %location.real_path(), "skipping digest of non-regular file");
                    continue;
                }
                Err(e) => {
                    warn!(path = %location.real_path(), error = %e, "failed to read file metadata");
                    continue;
                }
            }

            let digests = resolver
                .file_contents_by_location(&location)
                .map_err(CatalogError::from)
                .and_then(|reader| {
                    digests_of(reader, &self.algorithms).map_err(|e| CatalogError::Io {
                        path: location.real_path().to_owned(),
                        source: e,
                    })
                });
            match digests {
                Ok(digests) => {
                    counter!(m::FILE_DIGESTS_TOTAL).increment(1);
                    results.insert(coordinates, digests);
                }
                Err(e) => {
                    warn!(path = %location.real_path(), error = %e, "failed to digest file");
                }
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use strata_source::MockResolver;

    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn from_str_loose_accepts_variants() {
        assert_eq!(DigestAlgorithm::from_str_loose("SHA256"), Some(DigestAlgorithm::Sha256));
        assert_eq!(DigestAlgorithm::from_str_loose("sha-512"), Some(DigestAlgorithm::Sha512));
        assert_eq!(DigestAlgorithm::from_str_loose("md5"), None);
    }

    #[test]
    fn known_vectors() {
        let digests = digests_of(&b"abc"[..], &[DigestAlgorithm::Sha256]).unwrap();
        assert_eq!(digests[0].value, ABC_SHA256);
        let empty = digests_of(&b""[..], &[DigestAlgorithm::Sha256]).unwrap();
        assert_eq!(empty[0].value, EMPTY_SHA256);
    }

    #[test]
    fn sha512_length() {
        let digests = digests_of(&b"abc"[..], &[DigestAlgorithm::Sha512]).unwrap();
        assert_eq!(digests[0].algorithm, "sha512");
        assert_eq!(digests[0].value.len(), 128);
    }

    #[test]
    fn catalogs_regular_files_only() {
        let resolver = MockResolver::new()
            .file("/etc/abc", "abc")
            .symlink("/etc/link", "/etc/abc")
            .build();
        let cataloger = FileDigestsCataloger::new(&[DigestAlgorithm::Sha256]);
        let results = cataloger.catalog(&resolver, None).unwrap();
        assert_eq!(results.len(), 1);
        let digests = &results[&Coordinates::new("/etc/abc", "")];
        assert_eq!(digests[0].value, ABC_SHA256);
    }

    #[test]
    fn explicit_locations_limit_the_scan() {
        let resolver = MockResolver::from_paths(&["/a", "/b"]);
        let cataloger = FileDigestsCataloger::new(&[DigestAlgorithm::Sha256, DigestAlgorithm::Sha256]);
        let results = cataloger
            .catalog(&resolver, Some(vec![Location::new("/a")]))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.values().next().unwrap().len(), 1);
    }

    #[test]
    fn missing_location_is_skipped() {
        let resolver = MockResolver::from_paths(&["/a"]);
        let cataloger = FileDigestsCataloger::new(&[DigestAlgorithm::Sha256]);
        let results = cataloger
            .catalog(&resolver, Some(vec![Location::new("/missing")]))
            .unwrap();
        assert!(results.is_empty());
    }
}
