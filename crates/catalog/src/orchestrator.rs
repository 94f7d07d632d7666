//! 카탈로거 병렬 실행
//!
//! 선택된 카탈로거를 각각 blocking 스레드에서 실행하고, 결과 패키지를 공유
//! [`Catalog`]에 병합합니다. 동시 실행 수는 세마포어로 제한합니다.
//!
//! # 실패 격리
//!
//! 카탈로거 하나의 에러나 패닉은 [`CatalogerFailure`]로 기록되고 실행은 계속됩니다.
//! 실패한 카탈로거의 부분 결과는 병합하지 않습니다.
//!
//! ```text
//! catalogers --> Semaphore(parallelism) --> spawn_blocking(catalog) --> Catalog::add_all
//!                                                    |
//!                                          error / panic --> failures
//! ```

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, gauge, histogram};
use serde::Serialize;
use strata_core::metrics as m;
use strata_source::Resolver;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cataloger::Cataloger;
use crate::error::CatalogError;
use crate::pkg::Catalog;
use crate::relationship::{Relationship, sort_relationships};

/// 카탈로거 하나의 실패 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogerFailure {
    /// 카탈로거 이름
    pub cataloger: String,
    /// 실패 사유 (에러 또는 패닉 메시지)
    pub reason: String,
}

impl From<CatalogerFailure> for CatalogError {
    fn from(failure: CatalogerFailure) -> Self {
        CatalogError::CatalogerFailure {
            cataloger: failure.cataloger,
            reason: failure.reason,
        }
    }
}

/// 카탈로깅 실행 결과
#[derive(Debug, Default)]
pub struct CatalogRun {
    /// 병합된 카탈로그
    pub catalog: Catalog,
    /// 카탈로거가 낸 관계 (정렬, 중복 제거됨)
    pub relationships: Vec<Relationship>,
    /// 실패한 카탈로거 (이름순)
    pub failures: Vec<CatalogerFailure>,
}

impl CatalogRun {
    /// 실패 없이 끝났는지 여부
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

type TaskOutcome = (String, Duration, Result<(usize, Vec<Relationship>), String>);

/// 카탈로거들을 최대 `parallelism`개씩 동시에 실행합니다.
///
/// 결과 순서는 완료 순서와 무관합니다. 패키지 순서는 [`Catalog::sorted`],
/// 관계 순서는 [`sort_relationships`]가 정합니다.
pub async fn run_catalogers(
    resolver: Arc<dyn Resolver>,
    catalogers: Vec<Arc<dyn Cataloger>>,
    parallelism: usize,
) -> CatalogRun {
    let run_id = Uuid::new_v4();
    let catalog = Arc::new(Catalog::new());
    let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));

    info!(%run_id, catalogers = catalogers.len(), parallelism, "cataloging started");

    let mut tasks: JoinSet<TaskOutcome> = JoinSet::new();
    for cataloger in catalogers {
        let resolver = Arc::clone(&resolver);
        let catalog = Arc::clone(&catalog);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let name = cataloger.name().to_owned();
            // 세마포어는 닫지 않으므로 acquire는 실패하지 않음
            let _permit = semaphore.acquire_owned().await.ok();
            let started = Instant::now();

            let joined = tokio::task::spawn_blocking(move || {
                let (packages, relationships) = cataloger.catalog(resolver.as_ref())?;
                let found = packages.len();
                catalog.add_all(packages);
                Ok::<_, CatalogError>((found, relationships))
            })
            .await;

            let outcome = match joined {
                Ok(Ok(output)) => Ok(output),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(join_failure_reason(e)),
            };
            (name, started.elapsed(), outcome)
        });
    }

    let mut relationships = Vec::new();
    let mut failures = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        let (name, elapsed, outcome) = match joined {
            Ok(result) => result,
            // 바깥 태스크는 패닉하지 않음. 런타임 종료로 취소된 경우만 여기에 옴
            Err(e) => {
                warn!(%run_id, error = %e, "cataloger task aborted");
                continue;
            }
        };

        histogram!(m::CATALOGER_DURATION_SECONDS, m::LABEL_CATALOGER => name.clone())
            .record(elapsed.as_secs_f64());

        match outcome {
            Ok((found, rels)) => {
                counter!(m::CATALOGER_RUNS_TOTAL, m::LABEL_CATALOGER => name.clone(), m::LABEL_RESULT => "success")
                    .increment(1);
                debug!(
                    %run_id,
                    cataloger = %name,
                    packages = found,
                    relationships = rels.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "cataloger finished"
                );
                relationships.extend(rels);
            }
            Err(reason) => {
                counter!(m::CATALOGER_RUNS_TOTAL, m::LABEL_CATALOGER => name.clone(), m::LABEL_RESULT => "failure")
                    .increment(1);
                counter!(m::CATALOGER_FAILURES_TOTAL, m::LABEL_CATALOGER => name.clone())
                    .increment(1);
                warn!(%run_id, cataloger = %name, error = %reason, "cataloger failed, continuing");
                failures.push(CatalogerFailure {
                    cataloger: name,
                    reason,
                });
            }
        }
    }

    failures.sort_by(|a, b| a.cataloger.cmp(&b.cataloger));
    sort_relationships(&mut relationships);

    let catalog = Arc::try_unwrap(catalog)
        .unwrap_or_else(|shared| Catalog::from_packages(shared.sorted()));
    gauge!(m::CATALOG_PACKAGES).set(catalog.len() as f64);

    info!(
        %run_id,
        packages = catalog.len(),
        relationships = relationships.len(),
        failures = failures.len(),
        "cataloging finished"
    );

    CatalogRun {
        catalog,
        relationships,
        failures,
    }
}

/// 패닉 payload에서 메시지를 꺼냅니다.
fn join_failure_reason(error: JoinError) -> String {
    if !error.is_panic() {
        return format!("task cancelled: {error}");
    }
    let payload: Box<dyn Any + Send> = error.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned());
    format!("panicked: {message}")
}
