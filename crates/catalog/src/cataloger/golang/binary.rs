//! Go 바이너리 카탈로거 파서
//!
//! 빌드 정보의 의존 모듈을 먼저, 메인 모듈을 마지막에 내보냅니다.
//! 아키텍처는 `GOARCH` 빌드 설정을 우선하고, 없으면 실행 파일 헤더(ELF/PE/Mach-O)에서 읽습니다.

use std::collections::BTreeMap;

use strata_source::{Location, Resolver};

use super::buildinfo::{BuildInfo, read_build_info};
use crate::cataloger::{CatalogerOutput, FileParser};
use crate::error::CatalogError;
use crate::pkg::metadata::{GolangBinMetadata, Metadata};
use crate::pkg::{Package, PackageType};

/// 버전 정보가 없는 메인 모듈의 버전
pub const DEVEL_VERSION: &str = "(devel)";

/// Go 바이너리 파서
#[derive(Debug, Clone, Default)]
pub struct GoBinaryParser;

impl FileParser for GoBinaryParser {
    fn parse(
        &self,
        _resolver: &dyn Resolver,
        location: &Location,
        contents: &[u8],
    ) -> Result<CatalogerOutput, CatalogError> {
        let Some(info) = read_build_info(contents, location.real_path())? else {
            return Ok((Vec::new(), Vec::new()));
        };
        let arch = match info.setting("GOARCH") {
            Some(arch) => arch.to_owned(),
            None => goarch_from_header(contents).unwrap_or_default(),
        };
        Ok((build_packages(&info, &arch), Vec::new()))
    }
}

/// 빌드 정보에서 패키지 목록을 만듭니다.
///
/// 경로 없는 의존 모듈은 건너뛰고, replace된 모듈은 대체 모듈로 기록합니다.
/// 빌드 설정은 메인 모듈에만 붙습니다.
pub fn build_packages(info: &BuildInfo, arch: &str) -> Vec<Package> {
    let mut packages = Vec::new();

    for dep in &info.deps {
        let module = dep.replace.as_deref().unwrap_or(dep);
        if module.path.is_empty() {
            continue;
        }
        let metadata = GolangBinMetadata {
            go_compiled_version: info.go_version.clone(),
            architecture: arch.to_owned(),
            h1_digest: module.sum.clone(),
            main_module: info.main.path.clone(),
            ..Default::default()
        };
        packages.push(
            Package::new(module.path.as_str(), module.version.as_str(), PackageType::GoModule)
                .with_metadata(Metadata::GolangBin(metadata)),
        );
    }

    let main_path = if info.main.path.is_empty() {
        info.path.as_str()
    } else {
        info.main.path.as_str()
    };
    if main_path.is_empty() {
        return packages;
    }

    let mut version = if info.main.version.is_empty() {
        DEVEL_VERSION.to_owned()
    } else {
        info.main.version.clone()
    };
    if version == DEVEL_VERSION {
        if let Some(pseudo) = pseudo_version(info) {
            version = pseudo;
        }
    }

    let settings: BTreeMap<String, String> = info.settings.iter().cloned().collect();
    let metadata = GolangBinMetadata {
        go_build_settings: settings,
        go_compiled_version: info.go_version.clone(),
        architecture: arch.to_owned(),
        h1_digest: info.main.sum.clone(),
        main_module: main_path.to_owned(),
    };
    packages.push(
        Package::new(main_path, version, PackageType::GoModule)
            .with_metadata(Metadata::GolangBin(metadata)),
    );
    packages
}

/// VCS 빌드 설정에서 `v0.0.0-<UTC 시각>-<리비전 12자>` 의사 버전을 만듭니다.
fn pseudo_version(info: &BuildInfo) -> Option<String> {
    let revision = info.setting("vcs.revision")?;
    let time = info.setting("vcs.time")?;
    if revision.len() < 12 || !time.ends_with('Z') {
        return None;
    }
    let stamp: String = time.chars().take(19).filter(char::is_ascii_digit).collect();
    if stamp.len() != 14 {
        return None;
    }
    Some(format!("v0.0.0-{stamp}-{}", &revision[..12]))
}

/// 실행 파일 헤더에서 GOARCH 이름을 추정합니다.
///
/// 알려진 ELF/Mach-O 머신은 GOARCH 이름으로, 그 외와 PE는 머신 번호(10진수)로 돌려줍니다.
pub fn goarch_from_header(data: &[u8]) -> Option<String> {
    if data.starts_with(b"\x7fELF") {
        return elf_arch(data);
    }
    if data.starts_with(b"MZ") {
        return pe_arch(data);
    }
    macho_arch(data)
}

fn u16_at(data: &[u8], offset: usize, little: bool) -> Option<u16> {
    let bytes: [u8; 2] = data.get(offset..offset + 2)?.try_into().ok()?;
    Some(if little {
        u16::from_le_bytes(bytes)
    } else {
        u16::from_be_bytes(bytes)
    })
}

fn u32_at(data: &[u8], offset: usize, little: bool) -> Option<u32> {
    let bytes: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
    Some(if little {
        u32::from_le_bytes(bytes)
    } else {
        u32::from_be_bytes(bytes)
    })
}

fn elf_arch(data: &[u8]) -> Option<String> {
    let is_64 = *data.get(4)? == 2;
    let little = *data.get(5)? == 1;
    let machine = u16_at(data, 18, little)?;
    let arch = match machine {
        3 => "386",
        62 => "amd64",
        40 => "arm",
        183 => "arm64",
        8 => match (is_64, little) {
            (true, true) => "mips64le",
            (true, false) => "mips64",
            (false, true) => "mipsle",
            (false, false) => "mips",
        },
        20 => "ppc",
        21 => "ppc64",
        22 => "s390x",
        243 => "riscv64",
        258 => "loong64",
        other => return Some(other.to_string()),
    };
    Some(arch.to_owned())
}

fn pe_arch(data: &[u8]) -> Option<String> {
    let offset = usize::try_from(u32_at(data, 0x3c, true)?).ok()?;
    if data.get(offset..offset + 4)? != b"PE\0\0" {
        return None;
    }
    u16_at(data, offset + 4, true).map(|m| m.to_string())
}

fn macho_arch(data: &[u8]) -> Option<String> {
    let little = match data.get(..4)? {
        [0xce | 0xcf, 0xfa, 0xed, 0xfe] => true,
        [0xfe, 0xed, 0xfa, 0xce | 0xcf] => false,
        _ => return None,
    };
    let cpu = u32_at(data, 4, little)?;
    let arch = match cpu {
        7 => "386",
        0x0100_0007 => "amd64",
        12 => "arm",
        0x0100_000c => "arm64",
        18 => "ppc",
        0x0100_0012 => "ppc64",
        other => return Some(other.to_string()),
    };
    Some(arch.to_owned())
}

#[cfg(test)]
mod tests {
    use strata_source::MockResolver;

    use super::super::buildinfo::tests::{MODINFO, build_blob};
    use super::super::buildinfo::Module;
    use super::*;

    fn metadata(pkg: &Package) -> &GolangBinMetadata {
        match &pkg.metadata {
            Some(Metadata::GolangBin(m)) => m,
            other => panic!("unexpected metadata {other:?}"),
        }
    }

    fn elf_header(machine: u16) -> Vec<u8> {
        let mut data = vec![0u8; 64];
        data[..4].copy_from_slice(b"\x7fELF");
        data[4] = 2;
        data[5] = 1;
        data[18..20].copy_from_slice(&machine.to_le_bytes());
        data
    }

    #[test]
    fn empty_build_info_has_no_packages() {
        assert!(build_packages(&BuildInfo::default(), "").is_empty());
    }

    #[test]
    fn dep_without_path_is_skipped() {
        let info = BuildInfo {
            deps: vec![
                Module {
                    path: "github.com/adrg/xdg".to_owned(),
                    ..Default::default()
                },
                Module {
                    version: "v0.2.1".to_owned(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let packages = build_packages(&info, "");
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].purl, "pkg:golang/github.com/adrg/xdg");
        assert_eq!(metadata(&packages[0]), &GolangBinMetadata::default());
    }

    #[test]
    fn main_module_is_last_with_settings() {
        let info = BuildInfo::parse_modinfo(MODINFO).unwrap();
        let packages = build_packages(&info, "amd64");
        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["github.com/x/y", "golang.org/x/term", "example.com/app"]);

        let main = packages.last().unwrap();
        assert_eq!(main.version, DEVEL_VERSION);
        assert_eq!(metadata(main).go_build_settings["GOOS"], "linux");
        assert!(metadata(&packages[0]).go_build_settings.is_empty());
        assert_eq!(metadata(&packages[0]).main_module, "example.com/app");
    }

    #[test]
    fn replace_directive_wins() {
        let info = BuildInfo::parse_modinfo(MODINFO).unwrap();
        let packages = build_packages(&info, "amd64");
        let term = &packages[1];
        assert_eq!(term.version, "v0.2.0");
        assert_eq!(metadata(term).h1_digest, "h1:new=");
    }

    #[test]
    fn path_without_main_module_becomes_main() {
        let info = BuildInfo {
            path: "github.com/a/b/c".to_owned(),
            settings: vec![("GOARCH".to_owned(), "amd64".to_owned())],
            ..Default::default()
        };
        let packages = build_packages(&info, "amd64");
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].version, DEVEL_VERSION);
        assert_eq!(metadata(&packages[0]).main_module, "github.com/a/b/c");
    }

    #[test]
    fn devel_version_becomes_pseudo_version() {
        let info = BuildInfo {
            main: Module {
                path: "github.com/strata-sbom/strata".to_owned(),
                version: DEVEL_VERSION.to_owned(),
                ..Default::default()
            },
            settings: vec![
                (
                    "vcs.revision".to_owned(),
                    "41bc6bb410352845f22766e27dd48ba93aa825a4".to_owned(),
                ),
                ("vcs.time".to_owned(), "2022-10-14T19:54:57Z".to_owned()),
            ],
            ..Default::default()
        };
        let packages = build_packages(&info, "amd64");
        assert_eq!(packages[0].version, "v0.0.0-20221014195457-41bc6bb41035");
    }

    #[test]
    fn elf_machines() {
        assert_eq!(goarch_from_header(&elf_header(62)).as_deref(), Some("amd64"));
        assert_eq!(goarch_from_header(&elf_header(21)).as_deref(), Some("ppc64"));
        assert_eq!(goarch_from_header(&elf_header(40)).as_deref(), Some("arm"));
        assert_eq!(goarch_from_header(&elf_header(9999)).as_deref(), Some("9999"));
    }

    #[test]
    fn pe_machine_is_decimal() {
        let mut data = vec![0u8; 0x100];
        data[..2].copy_from_slice(b"MZ");
        data[0x3c..0x40].copy_from_slice(&0x80u32.to_le_bytes());
        data[0x80..0x84].copy_from_slice(b"PE\0\0");
        data[0x84..0x86].copy_from_slice(&0x8664u16.to_le_bytes());
        assert_eq!(goarch_from_header(&data), Some(0x8664.to_string()));
    }

    #[test]
    fn macho_arm64() {
        let mut data = vec![0u8; 32];
        data[..4].copy_from_slice(&[0xcf, 0xfa, 0xed, 0xfe]);
        data[4..8].copy_from_slice(&0x0100_000cu32.to_le_bytes());
        assert_eq!(goarch_from_header(&data).as_deref(), Some("arm64"));
    }

    #[test]
    fn unknown_header_has_no_arch() {
        assert_eq!(goarch_from_header(b"#!/bin/sh\n"), None);
    }

    #[test]
    fn parser_uses_header_arch_when_setting_missing() {
        let modinfo = "mod\texample.com/app\tv1.0.0\t\n";
        let blob = build_blob(&elf_header(183), "go1.21.0", modinfo);
        let resolver = MockResolver::new().file("/bin/app", blob.clone()).build();
        let location = Location::new("/bin/app");
        let (packages, _) = GoBinaryParser.parse(&resolver, &location, &blob).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(metadata(&packages[0]).architecture, "arm64");
        assert_eq!(metadata(&packages[0]).go_compiled_version, "go1.21.0");
    }

    #[test]
    fn non_go_binary_yields_nothing() {
        let resolver = MockResolver::new().build();
        let (packages, _) = GoBinaryParser
            .parse(&resolver, &Location::new("/bin/ls"), &elf_header(62))
            .unwrap();
        assert!(packages.is_empty());
    }
}
