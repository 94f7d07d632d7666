//! 파일 분석 카탈로거
//!
//! 패키지와 별개로 위치별 파일 사실(메타데이터, 다이제스트, 내용)을 좌표 기준으로 수집합니다.
//! SBOM 조립 단계는 이 결과를 읽기만 합니다.

pub mod contents;
pub mod digest;
pub mod metadata;

pub use contents::FileContentsCataloger;
pub use digest::{DigestAlgorithm, FileDigest, FileDigestsCataloger, digests_of};
pub use metadata::FileMetadataCataloger;
