//! 스캔 흐름 -- 소스 인덱싱부터 SBOM 조립까지
//!
//! ```text
//! Source --> (excluding) Resolver --> CatalogerRegistry::select --> run_catalogers
//!                  |                                                     |
//!                  +--> file catalogers (metadata / digests / contents)  +--> ownership overlap
//!                                          |                                      |
//!                                          +---------------> Sbom <---------------+
//! ```
//!
//! 카탈로거 실패는 [`ScanOutput::failures`]에 모이고 SBOM은 성공한 결과로 만들어집니다.

use std::sync::Arc;

use strata_source::{Resolver, Source, SourceDescription};
use tracing::{debug, info};

use crate::cataloger::{Cataloger, CatalogerRegistry, Scope};
use crate::config::CatalogerConfig;
use crate::error::CatalogError;
use crate::file::{FileContentsCataloger, FileDigestsCataloger, FileMetadataCataloger};
use crate::orchestrator::{CatalogerFailure, run_catalogers};
use crate::relationship::ownership_by_file_overlap;
use crate::sbom::{Descriptor, FileArtifacts, Sbom};

/// 스캔 결과
#[derive(Debug)]
pub struct ScanOutput {
    /// 조립된 SBOM
    pub sbom: Sbom,
    /// 실패한 카탈로거 (이름순)
    pub failures: Vec<CatalogerFailure>,
}

/// 스캐너
///
/// 설정과 레지스트리를 가지고 소스를 스캔합니다. 상태가 없으므로 여러 소스에 재사용할 수 있습니다.
pub struct Scanner {
    config: CatalogerConfig,
    registry: CatalogerRegistry,
    descriptor: Descriptor,
}

impl Scanner {
    /// 빌더를 생성합니다.
    pub fn builder() -> ScannerBuilder {
        ScannerBuilder::new()
    }

    /// 설정 참조
    pub fn config(&self) -> &CatalogerConfig {
        &self.config
    }

    /// 레지스트리 참조
    pub fn registry(&self) -> &CatalogerRegistry {
        &self.registry
    }

    /// 범위에서 설정 패턴으로 선택되는 카탈로거
    pub fn selected(&self, scope: Scope) -> Vec<Arc<dyn Cataloger>> {
        self.registry.select(scope, &self.config.catalogers)
    }

    /// 소스를 인덱싱하고 스캔합니다.
    ///
    /// # Errors
    ///
    /// 소스 인덱싱 실패, 잘못된 제외 패턴, 파일 분석 실패.
    /// 카탈로거 실패는 에러가 아니라 [`ScanOutput::failures`]에 기록됩니다.
    pub async fn scan(&self, source: Source) -> Result<ScanOutput, CatalogError> {
        let description = source.describe();
        let scope = Scope::for_scheme(source.scheme());
        let exclude = self.config.exclude.clone();

        let resolver = tokio::task::spawn_blocking(move || source.excluding_resolver(&exclude))
            .await
            .map_err(|e| join_error("source indexing", e))??;

        self.scan_resolver(resolver, scope, description).await
    }

    /// 이미 만든 resolver를 스캔합니다.
    pub async fn scan_resolver(
        &self,
        resolver: Arc<dyn Resolver>,
        scope: Scope,
        description: SourceDescription,
    ) -> Result<ScanOutput, CatalogError> {
        let catalogers = self.selected(scope);
        info!(
            source = %description.path,
            scheme = %description.scheme,
            scope = %scope,
            catalogers = catalogers.len(),
            "scan started"
        );

        let run = run_catalogers(Arc::clone(&resolver), catalogers, self.config.parallelism).await;

        let mut relationships = run.relationships;
        let overlap = ownership_by_file_overlap(&run.catalog);
        debug!(relationships = overlap.len(), "ownership overlap computed");
        relationships.extend(overlap);

        let config = self.config.clone();
        let files = tokio::task::spawn_blocking(move || catalog_files(resolver.as_ref(), &config))
            .await
            .map_err(|e| join_error("file cataloging", e))??;

        let sbom = Sbom::new(
            run.catalog,
            relationships,
            files,
            description,
            self.descriptor.clone(),
        );
        info!(
            packages = sbom.catalog.len(),
            relationships = sbom.relationships.len(),
            failures = run.failures.len(),
            "scan finished"
        );

        Ok(ScanOutput {
            sbom,
            failures: run.failures,
        })
    }
}

/// 설정에 따라 파일 카탈로거를 실행합니다.
fn catalog_files(
    resolver: &dyn Resolver,
    config: &CatalogerConfig,
) -> Result<FileArtifacts, CatalogError> {
    let mut files = FileArtifacts::default();
    if config.file_metadata {
        files.metadata = FileMetadataCataloger::new().catalog(resolver, None);
    }
    if !config.digests.is_empty() {
        files.digests = FileDigestsCataloger::new(&config.digests).catalog(resolver, None)?;
    }
    if !config.contents_globs.is_empty() {
        files.contents =
            FileContentsCataloger::new(config.contents_globs.clone(), config.max_contents_size)
                .catalog(resolver)?;
    }
    debug!(
        metadata = files.metadata.len(),
        digests = files.digests.len(),
        contents = files.contents.len(),
        "file cataloging finished"
    );
    Ok(files)
}

fn join_error(stage: &str, e: tokio::task::JoinError) -> CatalogError {
    CatalogError::Io {
        path: stage.to_owned(),
        source: std::io::Error::other(format!("background task failed: {e}")),
    }
}

/// [`Scanner`] 빌더
#[derive(Default)]
pub struct ScannerBuilder {
    config: Option<CatalogerConfig>,
    registry: Option<CatalogerRegistry>,
    configuration: Option<serde_json::Value>,
}

impl ScannerBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 카탈로그 설정을 지정합니다.
    pub fn config(mut self, config: CatalogerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 레지스트리를 지정합니다. 없으면 설정으로 기본 레지스트리를 만듭니다.
    pub fn registry(mut self, registry: CatalogerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// 기술자에 기록할 설정 값을 지정합니다. 없으면 카탈로그 설정을 기록합니다.
    pub fn configuration(mut self, value: serde_json::Value) -> Self {
        self.configuration = Some(value);
        self
    }

    /// 스캐너를 빌드합니다.
    ///
    /// # Errors
    ///
    /// 설정 검증 실패 시 `CatalogError::Config`
    pub fn build(self) -> Result<Scanner, CatalogError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let configuration = match self.configuration {
            Some(value) => value,
            None => serde_json::to_value(&config)
                .map_err(|e| CatalogError::Serialization(e.to_string()))?,
        };
        let registry = self
            .registry
            .unwrap_or_else(|| CatalogerRegistry::new(&config));

        Ok(Scanner {
            config,
            registry,
            descriptor: Descriptor::new(configuration),
        })
    }
}

#[cfg(test)]
mod tests {
    use strata_source::{MockResolver, Scheme};

    use super::*;
    use crate::config::CatalogerConfigBuilder;
    use crate::relationship::RelationshipType;

    const GO_MOD: &str = "module example.com/app\n\ngo 1.21\n\nrequire github.com/x/y v1.2.3\n";
    const GO_SUM: &str = "github.com/x/y v1.2.3 h1:abc=\ngithub.com/x/y v1.2.3/go.mod h1:def=\n";

    fn resolver() -> Arc<dyn Resolver> {
        Arc::new(
            MockResolver::new()
                .file("/app/go.mod", GO_MOD)
                .file("/vendor/lib/go.sum", GO_SUM)
                .build(),
        )
    }

    fn description() -> SourceDescription {
        SourceDescription::new(Scheme::Directory, "/")
    }

    #[tokio::test]
    async fn same_module_from_two_files_merges() {
        let scanner = Scanner::builder().build().unwrap();
        let output = scanner
            .scan_resolver(resolver(), Scope::Directory, description())
            .await
            .unwrap();

        let packages = output.sbom.catalog.sorted();
        assert_eq!(packages.len(), 1);
        let paths: Vec<&str> = packages[0].locations.iter().map(|l| l.real_path()).collect();
        assert_eq!(paths, vec!["/app/go.mod", "/vendor/lib/go.sum"]);
        assert!(output.failures.is_empty());
        assert!(
            output
                .sbom
                .relationships
                .iter()
                .any(|r| r.kind == RelationshipType::EvidentBy)
        );
    }

    #[tokio::test]
    async fn selection_narrows_catalogers() {
        let config = CatalogerConfigBuilder::new()
            .catalogers(vec!["rust".to_owned()])
            .build()
            .unwrap();
        let scanner = Scanner::builder().config(config).build().unwrap();
        let output = scanner
            .scan_resolver(resolver(), Scope::Directory, description())
            .await
            .unwrap();
        assert!(output.sbom.catalog.is_empty());
    }

    #[tokio::test]
    async fn file_artifacts_follow_config() {
        let config = CatalogerConfigBuilder::new()
            .file_metadata(false)
            .digests(Vec::new())
            .contents_globs(vec!["**/go.mod".to_owned()])
            .build()
            .unwrap();
        let scanner = Scanner::builder().config(config).build().unwrap();
        let output = scanner
            .scan_resolver(resolver(), Scope::Directory, description())
            .await
            .unwrap();

        let files = &output.sbom.files;
        assert!(files.metadata.is_empty());
        assert!(files.digests.is_empty());
        assert_eq!(files.contents.len(), 1);
    }

    #[test]
    fn invalid_config_fails_build() {
        let config = CatalogerConfig {
            parallelism: 0,
            ..Default::default()
        };
        assert!(Scanner::builder().config(config).build().is_err());
    }

    #[test]
    fn descriptor_records_configuration() {
        let scanner = Scanner::builder().build().unwrap();
        assert_eq!(scanner.descriptor.configuration["parallelism"], 4);
    }
}
