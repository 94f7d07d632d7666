//! 전체 위치 지연 열거
//!
//! [`LocationStream`]은 백그라운드 스레드(생산자)가 bounded 채널로 위치를 흘려 보내고,
//! 호출자가 `Iterator`로 필요한 만큼만 소비하는 구조입니다.
//!
//! # 종료 보장
//!
//! - 소비자가 스트림을 drop하면 수신 측이 먼저 닫히고, 생산자의 다음 `send`가
//!   실패하면서 생산자가 멈춥니다.
//! - `Drop`은 수신 측을 닫은 뒤 생산자 스레드를 join하므로, 스트림이 사라진 뒤에
//!   남아 있는 스레드는 없습니다.

use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::thread::JoinHandle;

use tracing::{error, warn};

use crate::location::Location;

/// 생산자-소비자 사이 채널 용량
pub const CHANNEL_CAPACITY: usize = 128;

type Predicate = Box<dyn Fn(&Location) -> bool + Send>;

/// 생산자 측 송신 핸들
pub struct LocationSender {
    tx: SyncSender<Location>,
}

impl LocationSender {
    /// 위치 하나를 보냅니다. 소비자가 떠났으면 `false`를 반환하며,
    /// 생산자는 즉시 생산을 멈춰야 합니다.
    pub fn send(&self, location: Location) -> bool {
        self.tx.send(location).is_ok()
    }
}

/// 한 번만 소비할 수 있는 전체 위치 열거
///
/// 다시 열거하려면 resolver의 `all_locations()`를 다시 호출해야 합니다.
pub struct LocationStream {
    rx: Option<Receiver<Location>>,
    producer: Option<JoinHandle<()>>,
    filters: Vec<Predicate>,
}

impl LocationStream {
    /// 백그라운드 생산자를 시작합니다.
    pub fn spawn<F>(producer: F) -> Self
    where
        F: FnOnce(LocationSender) + Send + 'static,
    {
        let (tx, rx) = sync_channel(CHANNEL_CAPACITY);
        let sender = LocationSender { tx };
        match std::thread::Builder::new()
            .name("strata-locations".to_owned())
            .spawn(move || producer(sender))
        {
            Ok(handle) => Self {
                rx: Some(rx),
                producer: Some(handle),
                filters: Vec::new(),
            },
            Err(e) => {
                error!(error = %e, "failed to spawn location producer thread");
                Self::empty()
            }
        }
    }

    /// 이미 알고 있는 위치 목록을 열거합니다.
    pub fn from_locations(locations: Vec<Location>) -> Self {
        Self::spawn(move |tx| {
            for location in locations {
                if !tx.send(location) {
                    return;
                }
            }
        })
    }

    /// 빈 스트림
    pub fn empty() -> Self {
        Self {
            rx: None,
            producer: None,
            filters: Vec::new(),
        }
    }

    /// 조건을 만족하는 위치만 남기는 스트림으로 바꿉니다.
    ///
    /// 버퍼링 없이 원소 단위로 걸러내며, 생산자와 종료 보장은 그대로 유지됩니다.
    pub fn filter<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Location) -> bool + Send + 'static,
    {
        self.filters.push(Box::new(predicate));
        self
    }

    fn accepts(&self, location: &Location) -> bool {
        self.filters.iter().all(|keep| keep(location))
    }
}

impl Iterator for LocationStream {
    type Item = Location;

    fn next(&mut self) -> Option<Location> {
        loop {
            let location = self.rx.as_ref()?.recv().ok()?;
            if self.accepts(&location) {
                return Some(location);
            }
        }
    }
}

impl Drop for LocationStream {
    fn drop(&mut self) {
        // 수신 측을 먼저 닫아야 send에 막힌 생산자가 깨어납니다.
        drop(self.rx.take());
        if let Some(handle) = self.producer.take() {
            if handle.join().is_err() {
                warn!("location producer thread panicked");
            }
        }
    }
}

impl std::fmt::Debug for LocationStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationStream")
            .field("active", &self.rx.is_some())
            .field("filters", &self.filters.len())
            .finish()
    }
}
