//! Go 바이너리에 내장된 빌드 정보 읽기
//!
//! Go 1.18 이상은 `\xff Go buildinf:` 헤더 뒤에 버전 문자열과 모듈 정보 문자열을
//! varint 길이 접두어로 직접 기록합니다 (플래그 비트 `0x2`). 그 이전의 포인터 형식은
//! 지원하지 않습니다.
//!
//! 모듈 정보는 줄 단위 텍스트입니다.
//!
//! ```text
//! path    example.com/app/cmd/tool
//! mod     example.com/app (devel)
//! dep     github.com/x/y  v1.2.3  h1:abc=
//! =>      github.com/z/y  v1.2.4  h1:def=
//! build   GOARCH=amd64
//! ```

use crate::error::CatalogError;

/// 빌드 정보 헤더 매직
pub const BUILDINFO_MAGIC: &[u8] = b"\xff Go buildinf:";

const HEADER_LEN: usize = 32;
const ALIGN: usize = 16;
const FLAG_INLINE_STRINGS: u8 = 0x2;
const SENTINEL_LEN: usize = 16;

/// 모듈 하나
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    /// 모듈 경로
    pub path: String,
    /// 버전
    pub version: String,
    /// `h1:` 다이제스트
    pub sum: String,
    /// replace 지시어로 대체된 모듈
    pub replace: Option<Box<Module>>,
}

/// 파싱된 빌드 정보
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildInfo {
    /// 컴파일러 버전 (`go1.21.0`)
    pub go_version: String,
    /// 메인 패키지 경로
    pub path: String,
    /// 메인 모듈
    pub main: Module,
    /// 의존 모듈 (기록 순서)
    pub deps: Vec<Module>,
    /// 빌드 설정 (기록 순서)
    pub settings: Vec<(String, String)>,
}

impl BuildInfo {
    /// 빌드 설정 값을 찾습니다.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 모듈 정보 텍스트를 파싱합니다. 버전은 호출자가 채웁니다.
    pub fn parse_modinfo(text: &str) -> Result<Self, String> {
        let mut info = Self::default();
        // 마지막으로 추가된 모듈: replace 줄(`=>`)의 대상
        let mut last: Option<LastModule> = None;

        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            let (kind, rest) = line.split_once('\t').unwrap_or((line, ""));
            match kind {
                "go" => info.go_version = rest.to_owned(),
                "path" => info.path = rest.to_owned(),
                "mod" => {
                    info.main = parse_module(rest)?;
                    last = Some(LastModule::Main);
                }
                "dep" => {
                    info.deps.push(parse_module(rest)?);
                    last = Some(LastModule::Dep);
                }
                "=>" => {
                    let replacement = Box::new(parse_module(rest)?);
                    let target = match last.take() {
                        Some(LastModule::Main) => &mut info.main,
                        Some(LastModule::Dep) => match info.deps.last_mut() {
                            Some(dep) => dep,
                            None => return Err("replacement without module".to_owned()),
                        },
                        None => return Err("replacement without module".to_owned()),
                    };
                    target.replace = Some(replacement);
                }
                "build" => {
                    let (key, value) = parse_setting(rest)?;
                    info.settings.push((key, value));
                }
                _ => {}
            }
        }
        Ok(info)
    }
}

enum LastModule {
    Main,
    Dep,
}

fn parse_module(rest: &str) -> Result<Module, String> {
    let mut fields = rest.split('\t');
    let path = fields.next().unwrap_or_default().to_owned();
    if path.is_empty() && rest.is_empty() {
        return Err("module line without fields".to_owned());
    }
    Ok(Module {
        path,
        version: fields.next().unwrap_or_default().to_owned(),
        sum: fields.next().unwrap_or_default().to_owned(),
        replace: None,
    })
}

fn parse_setting(rest: &str) -> Result<(String, String), String> {
    let (key, value) = if let Some(quoted) = rest.strip_prefix('"') {
        let end = quoted.find('"').ok_or("unterminated quoted build key")?;
        let value = quoted[end + 1..]
            .strip_prefix('=')
            .ok_or("build setting without '='")?;
        (&quoted[..end], value)
    } else {
        rest.split_once('=').ok_or("build setting without '='")?
    };
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Ok((key.to_owned(), value.to_owned()))
}

fn read_uvarint(data: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, byte) in data.iter().take(10).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

fn read_string(data: &[u8]) -> Option<(&[u8], usize)> {
    let (len, n) = read_uvarint(data)?;
    let len = usize::try_from(len).ok()?;
    let end = n.checked_add(len)?;
    data.get(n..end).map(|s| (s, end))
}

/// 모듈 정보 문자열 앞뒤의 16바이트 표지를 벗깁니다.
fn strip_sentinels(modinfo: &[u8]) -> &[u8] {
    if modinfo.len() >= 2 * SENTINEL_LEN + 1 && modinfo[modinfo.len() - SENTINEL_LEN - 1] == b'\n' {
        &modinfo[SENTINEL_LEN..modinfo.len() - SENTINEL_LEN]
    } else {
        modinfo
    }
}

/// 바이너리 안의 빌드 정보 헤더 위치를 찾습니다 (16바이트 정렬).
pub fn find_header(data: &[u8]) -> Option<usize> {
    let mut offset = 0;
    while offset + HEADER_LEN <= data.len() {
        let window = &data[offset..];
        let pos = window
            .windows(BUILDINFO_MAGIC.len())
            .position(|w| w == BUILDINFO_MAGIC)?;
        let candidate = offset + pos;
        if candidate % ALIGN == 0 && candidate + HEADER_LEN <= data.len() {
            return Some(candidate);
        }
        offset = candidate + 1;
    }
    None
}

/// 실행 파일 바이트에서 빌드 정보를 읽습니다.
///
/// 헤더가 없으면 `Ok(None)`입니다 (Go 바이너리가 아님).
pub fn read_build_info(data: &[u8], path: &str) -> Result<Option<BuildInfo>, CatalogError> {
    let Some(start) = find_header(data) else {
        return Ok(None);
    };
    let flags = data[start + BUILDINFO_MAGIC.len() + 1];
    if flags & FLAG_INLINE_STRINGS == 0 {
        return Err(CatalogError::parse(
            path,
            "unsupported buildinfo format (go < 1.18)",
        ));
    }

    let body = &data[start + HEADER_LEN..];
    let (version, used) =
        read_string(body).ok_or_else(|| CatalogError::parse(path, "truncated go version"))?;
    let (modinfo, _) = read_string(&body[used..])
        .ok_or_else(|| CatalogError::parse(path, "truncated module info"))?;

    let text = String::from_utf8_lossy(strip_sentinels(modinfo));
    let mut info = BuildInfo::parse_modinfo(&text).map_err(|e| CatalogError::parse(path, e))?;
    info.go_version = String::from_utf8_lossy(version).into_owned();
    Ok(Some(info))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn uvarint(mut n: usize, out: &mut Vec<u8>) {
        while n >= 0x80 {
            out.push((n as u8) | 0x80);
            n >>= 7;
        }
        out.push(n as u8);
    }

    /// 테스트용 Go 1.18+ 빌드 정보 블롭을 만듭니다.
    pub(crate) fn build_blob(prefix: &[u8], version: &str, modinfo: &str) -> Vec<u8> {
        let mut data = prefix.to_vec();
        while data.len() % ALIGN != 0 {
            data.push(0);
        }
        data.extend_from_slice(BUILDINFO_MAGIC);
        data.push(8); // pointer size
        data.push(FLAG_INLINE_STRINGS);
        data.resize(data.len() + (HEADER_LEN - BUILDINFO_MAGIC.len() - 2), 0);

        let mut wrapped = vec![0xAAu8; SENTINEL_LEN];
        wrapped.extend_from_slice(modinfo.as_bytes());
        wrapped.extend_from_slice(&[0xBBu8; SENTINEL_LEN]);

        uvarint(version.len(), &mut data);
        data.extend_from_slice(version.as_bytes());
        uvarint(wrapped.len(), &mut data);
        data.extend_from_slice(&wrapped);
        data
    }

    pub(crate) const MODINFO: &str = "path\texample.com/app/cmd/tool\n\
mod\texample.com/app\t(devel)\t\n\
dep\tgithub.com/x/y\tv1.2.3\th1:abc=\n\
dep\tgolang.org/x/term\tv0.1.0\th1:old=\n\
=>\tgolang.org/x/term\tv0.2.0\th1:new=\n\
build\t-compiler=gc\n\
build\t\"-ldflags\"=\"-s -w\"\n\
build\tGOARCH=amd64\n\
build\tGOOS=linux\n";

    #[test]
    fn parse_modinfo_lines() {
        let info = BuildInfo::parse_modinfo(MODINFO).unwrap();
        assert_eq!(info.path, "example.com/app/cmd/tool");
        assert_eq!(info.main.path, "example.com/app");
        assert_eq!(info.main.version, "(devel)");
        assert_eq!(info.deps.len(), 2);
        let term = &info.deps[1];
        assert_eq!(term.replace.as_ref().unwrap().version, "v0.2.0");
        assert_eq!(info.setting("GOARCH"), Some("amd64"));
        assert_eq!(info.setting("-ldflags"), Some("-s -w"));
    }

    #[test]
    fn orphan_replacement_is_error() {
        assert!(BuildInfo::parse_modinfo("=>\ta\tv1\t\n").is_err());
    }

    #[test]
    fn read_inline_buildinfo() {
        let blob = build_blob(b"\x7fELF some code", "go1.21.0", MODINFO);
        let info = read_build_info(&blob, "/bin/tool").unwrap().unwrap();
        assert_eq!(info.go_version, "go1.21.0");
        assert_eq!(info.main.path, "example.com/app");
        assert_eq!(info.deps[0].sum, "h1:abc=");
    }

    #[test]
    fn no_header_means_not_go() {
        assert!(read_build_info(b"\x7fELF plain binary", "/bin/ls").unwrap().is_none());
    }

    #[test]
    fn unaligned_magic_is_ignored() {
        let mut data = vec![0u8; 3];
        data.extend_from_slice(BUILDINFO_MAGIC);
        data.resize(128, 0);
        assert!(find_header(&data).is_none());
    }

    #[test]
    fn pointer_format_is_unsupported() {
        let mut blob = build_blob(b"", "go1.16", MODINFO);
        blob[BUILDINFO_MAGIC.len() + 1] = 0;
        let err = read_build_info(&blob, "/bin/old").unwrap_err();
        assert!(err.to_string().contains("go < 1.18"));
    }

    #[test]
    fn truncated_strings_are_errors() {
        let blob = build_blob(b"", "go1.21.0", MODINFO);
        let cut = &blob[..HEADER_LEN + 4];
        assert!(read_build_info(cut, "/bin/cut").is_err());
    }

    #[test]
    fn uvarint_multi_byte() {
        assert_eq!(read_uvarint(&[0xac, 0x02]), Some((300, 2)));
        assert_eq!(read_uvarint(&[0x80]), None);
    }
}
