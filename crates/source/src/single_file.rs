//! 단일 파일 소스 인덱싱
//!
//! 파일 하나를 `/<파일 이름>` 경로로 가진 인덱스를 만듭니다.

use std::path::Path;

use crate::error::SourceError;
use crate::index::{FileIndex, FileIndexBuilder, IndexEntry};
use crate::metadata::FileMetadata;
use crate::mime;

/// 파일 하나를 인덱싱합니다.
pub fn index_file(path: &Path) -> Result<FileIndex, SourceError> {
    let io_err = |e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    };
    let md = std::fs::metadata(path).map_err(io_err)?;
    if !md.is_file() {
        return Err(SourceError::Unsupported(format!(
            "not a regular file: {}",
            path.display()
        )));
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| SourceError::Unsupported(format!("no file name: {}", path.display())))?;

    let mut metadata = FileMetadata::from_fs(&md, None);
    let header = read_header(path).map_err(io_err)?;
    metadata.mime_type = mime::sniff(&header).to_owned();

    let mut builder = FileIndexBuilder::new();
    builder.add(IndexEntry::on_disk(
        &format!("/{name}"),
        metadata,
        path.to_path_buf(),
    ));
    Ok(builder.build())
}

fn read_header(path: &Path) -> std::io::Result<Vec<u8>> {
    use std::io::Read;
    let mut header = Vec::with_capacity(mime::SNIFF_LEN);
    std::fs::File::open(path)?
        .take(mime::SNIFF_LEN as u64)
        .read_to_end(&mut header)?;
    Ok(header)
}
