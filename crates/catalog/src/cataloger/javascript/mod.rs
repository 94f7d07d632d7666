//! JavaScript 생태계 카탈로거
//!
//! - `javascript-lock-cataloger`: package-lock.json
//! - `javascript-package-cataloger`: 설치된 package.json

pub mod lock;
pub mod package_json;

use super::{FileSelector, GenericCataloger};

pub use lock::PackageLockParser;
pub use package_json::PackageJsonParser;

/// package-lock.json 카탈로거 이름
pub const JAVASCRIPT_LOCK_CATALOGER: &str = "javascript-lock-cataloger";
/// package.json 카탈로거 이름
pub const JAVASCRIPT_PACKAGE_CATALOGER: &str = "javascript-package-cataloger";

/// package-lock.json 카탈로거를 생성합니다.
pub fn javascript_lock_cataloger(max_file_size: usize) -> GenericCataloger {
    GenericCataloger::new(
        JAVASCRIPT_LOCK_CATALOGER,
        FileSelector::Globs(&["**/package-lock.json"]),
        PackageLockParser,
        max_file_size,
    )
}

/// package.json 카탈로거를 생성합니다.
pub fn javascript_package_cataloger(max_file_size: usize) -> GenericCataloger {
    GenericCataloger::new(
        JAVASCRIPT_PACKAGE_CATALOGER,
        FileSelector::Globs(&["**/package.json"]),
        PackageJsonParser,
        max_file_size,
    )
}
