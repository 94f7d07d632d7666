//! 파일 메타데이터
//!
//! resolver가 위치별로 돌려주는 POSIX 모드, 파일 종류, 링크 대상, 소유자, MIME 타입입니다.

use serde::{Deserialize, Serialize};

/// 파일 종류
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// 심볼릭 링크
    SymbolicLink,
    /// 하드 링크
    HardLink,
    /// 디렉토리
    Directory,
    /// 소켓
    Socket,
    /// 블록 장치
    BlockDevice,
    /// 문자 장치
    CharacterDevice,
    /// 명명된 파이프
    #[serde(rename = "FIFONode")]
    Fifo,
    /// 일반 파일
    RegularFile,
    /// 그 외 (해석할 수 없는 항목)
    IrregularFile,
    /// 알 수 없음
    #[default]
    Unknown,
}

impl FileType {
    /// 출력 형식에서 사용하는 문자열 표현
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SymbolicLink => "SymbolicLink",
            Self::HardLink => "HardLink",
            Self::Directory => "Directory",
            Self::Socket => "Socket",
            Self::BlockDevice => "BlockDevice",
            Self::CharacterDevice => "CharacterDevice",
            Self::Fifo => "FIFONode",
            Self::RegularFile => "RegularFile",
            Self::IrregularFile => "IrregularFile",
            Self::Unknown => "Unknown",
        }
    }

    /// `std::fs::FileType`에서 변환합니다.
    pub fn from_std(ft: std::fs::FileType) -> Self {
        if ft.is_symlink() {
            return Self::SymbolicLink;
        }
        if ft.is_dir() {
            return Self::Directory;
        }
        if ft.is_file() {
            return Self::RegularFile;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if ft.is_socket() {
                return Self::Socket;
            }
            if ft.is_block_device() {
                return Self::BlockDevice;
            }
            if ft.is_char_device() {
                return Self::CharacterDevice;
            }
            if ft.is_fifo() {
                return Self::Fifo;
            }
        }
        Self::IrregularFile
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 위치별 파일 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// 권한 비트 (setuid/setgid/sticky 포함, 종류 비트 제외)
    pub mode: u32,
    /// 파일 종류
    #[serde(rename = "type")]
    pub file_type: FileType,
    /// 링크 대상 (심볼릭 링크만)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link_destination: String,
    /// 소유자 UID
    pub user_id: u32,
    /// 소유 그룹 GID
    pub group_id: u32,
    /// 바이트 크기
    pub size: u64,
    /// 내용 기반 MIME 타입
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
}

impl FileMetadata {
    /// 파일시스템 메타데이터에서 생성합니다. MIME 타입은 호출자가 채웁니다.
    pub fn from_fs(md: &std::fs::Metadata, link_destination: Option<String>) -> Self {
        let (mode, user_id, group_id) = unix_fields(md);
        Self {
            mode,
            file_type: FileType::from_std(md.file_type()),
            link_destination: link_destination.unwrap_or_default(),
            user_id,
            group_id,
            size: md.len(),
            mime_type: String::new(),
        }
    }

    /// 일반 파일 여부
    pub fn is_regular(&self) -> bool {
        self.file_type == FileType::RegularFile
    }

    /// 디렉토리 여부
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    /// 심볼릭 링크 여부
    pub fn is_symlink(&self) -> bool {
        self.file_type == FileType::SymbolicLink
    }
}

#[cfg(unix)]
fn unix_fields(md: &std::fs::Metadata) -> (u32, u32, u32) {
    use std::os::unix::fs::MetadataExt;
    (md.mode() & 0o7777, md.uid(), md.gid())
}

#[cfg(not(unix))]
fn unix_fields(md: &std::fs::Metadata) -> (u32, u32, u32) {
    let mode = if md.permissions().readonly() { 0o444 } else { 0o644 };
    (mode, 0, 0)
}
