//! Go 생태계 카탈로거
//!
//! - `go-mod-file-cataloger`: go.mod / go.sum
//! - `go-module-binary-cataloger`: 실행 파일에 내장된 빌드 정보

pub mod binary;
pub mod buildinfo;
pub mod gomod;

use strata_source::mime::EXECUTABLE_TYPES;

use super::{FileSelector, GenericCataloger};

pub use binary::GoBinaryParser;
pub use gomod::GoModParser;

/// go.mod / go.sum 카탈로거 이름
pub const GO_MOD_FILE_CATALOGER: &str = "go-mod-file-cataloger";
/// Go 바이너리 카탈로거 이름
pub const GO_MODULE_BINARY_CATALOGER: &str = "go-module-binary-cataloger";

/// go.mod / go.sum 카탈로거를 생성합니다.
pub fn go_mod_file_cataloger(max_file_size: usize) -> GenericCataloger {
    GenericCataloger::new(
        GO_MOD_FILE_CATALOGER,
        FileSelector::Globs(&["**/go.mod", "**/go.sum"]),
        GoModParser::new(max_file_size),
        max_file_size,
    )
}

/// Go 바이너리 카탈로거를 생성합니다.
pub fn go_module_binary_cataloger(max_file_size: usize) -> GenericCataloger {
    GenericCataloger::new(
        GO_MODULE_BINARY_CATALOGER,
        FileSelector::MimeTypes(EXECUTABLE_TYPES),
        GoBinaryParser,
        max_file_size,
    )
}
