//! 내용 기반 MIME 타입 판별
//!
//! 파일 앞부분의 매직 바이트로 판별합니다. 카탈로거가 실제로 질의하는
//! 실행 파일/아카이브 타입 위주이며, 나머지는 텍스트 여부로만 구분합니다.

/// 판별에 사용하는 앞부분 크기
pub const SNIFF_LEN: usize = 512;

/// 리눅스 실행 파일
pub const EXECUTABLE: &str = "application/x-executable";
/// 공유 라이브러리 (PIE 실행 파일 포함)
pub const SHARED_LIB: &str = "application/x-sharedlib";
/// Mach-O 바이너리
pub const MACH_BINARY: &str = "application/x-mach-binary";
/// PE 바이너리
pub const DOS_EXEC: &str = "application/x-dosexec";

/// 실행 파일로 취급하는 MIME 타입 목록
pub const EXECUTABLE_TYPES: &[&str] = &[EXECUTABLE, SHARED_LIB, MACH_BINARY, DOS_EXEC];

const MAGIC: &[(&[u8], &str)] = &[
    (b"\x1f\x8b", "application/gzip"),
    (b"PK\x03\x04", "application/zip"),
    (b"BZh", "application/x-bzip2"),
    (b"\xfd7zXZ\x00", "application/x-xz"),
    (b"\x28\xb5\x2f\xfd", "application/zstd"),
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"%PDF-", "application/pdf"),
    (b"MZ", DOS_EXEC),
    (b"\xfe\xed\xfa\xce", MACH_BINARY),
    (b"\xfe\xed\xfa\xcf", MACH_BINARY),
    (b"\xce\xfa\xed\xfe", MACH_BINARY),
    (b"\xcf\xfa\xed\xfe", MACH_BINARY),
    (b"\xca\xfe\xba\xbe", MACH_BINARY),
];

/// 앞부분 바이트로 MIME 타입을 판별합니다. 빈 입력은 빈 문자열을 돌려줍니다.
pub fn sniff(header: &[u8]) -> &'static str {
    if header.is_empty() {
        return "";
    }

    if header.starts_with(b"\x7fELF") {
        return elf_kind(header);
    }

    if header.len() > 262 && &header[257..262] == b"ustar" {
        return "application/x-tar";
    }

    for (magic, mime) in MAGIC {
        if header.starts_with(magic) {
            return mime;
        }
    }

    // 잘린 멀티바이트 문자는 텍스트로 인정
    match std::str::from_utf8(header) {
        Ok(text) if !text.contains('\0') => "text/plain",
        Err(e) if e.error_len().is_none() && !header[..e.valid_up_to()].contains(&0) => {
            "text/plain"
        }
        _ => "application/octet-stream",
    }
}

/// ELF 헤더의 e_type으로 실행 파일과 공유 객체를 구분합니다.
fn elf_kind(header: &[u8]) -> &'static str {
    if header.len() < 18 {
        return "application/octet-stream";
    }
    let little_endian = header[5] == 1;
    let e_type = if little_endian {
        u16::from_le_bytes([header[16], header[17]])
    } else {
        u16::from_be_bytes([header[16], header[17]])
    };
    match e_type {
        2 => EXECUTABLE,
        3 => SHARED_LIB,
        1 => "application/x-object",
        4 => "application/x-coredump",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elf_header(e_type: u16) -> Vec<u8> {
        let mut h = vec![0u8; 64];
        h[..4].copy_from_slice(b"\x7fELF");
        h[4] = 2; // 64-bit
        h[5] = 1; // little endian
        h[16..18].copy_from_slice(&e_type.to_le_bytes());
        h
    }

    #[test]
    fn detects_elf_executable_and_shared_object() {
        assert_eq!(sniff(&elf_header(2)), EXECUTABLE);
        assert_eq!(sniff(&elf_header(3)), SHARED_LIB);
    }

    #[test]
    fn detects_archives() {
        assert_eq!(sniff(b"\x1f\x8b\x08\x00"), "application/gzip");
        assert_eq!(sniff(b"PK\x03\x04rest"), "application/zip");
    }

    #[test]
    fn detects_text() {
        assert_eq!(sniff(b"module github.com/x/y\n"), "text/plain");
    }

    #[test]
    fn truncated_utf8_is_still_text() {
        // "é" = C3 A9, 마지막 바이트가 잘림
        assert_eq!(sniff(b"caf\xc3"), "text/plain");
    }

    #[test]
    fn binary_garbage_is_octet_stream() {
        assert_eq!(sniff(&[0x00, 0xff, 0x10, 0x80]), "application/octet-stream");
    }

    #[test]
    fn empty_input_has_no_type() {
        assert_eq!(sniff(&[]), "");
    }
}
