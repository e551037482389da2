//! 백그라운드 작업 실행기
//!
//! 작업 하나를 별도 스레드에서 실행하고, 진행률과 완료 이벤트를 하나의 채널로 UI 스레드에 전달한다.
//! 같은 채널을 쓰므로 이벤트는 발생 순서대로 도착하고 완료 이벤트는 항상 마지막이다.

use crate::models::CancelToken;
use crate::utils::error::{Result, ZipperError};
use std::any::Any;
use std::sync::mpsc::{self, Receiver, RecvError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use tracing::{error, info};

/// 작업이 UI 로 보내는 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerEvent<T> {
    /// 0-100
    Progress(u8),
    /// 성공 결과 또는 사람이 읽을 수 있는 에러 설명
    Finished(std::result::Result<T, String>),
}

/// 이벤트 수신자 (UI)
pub trait OperationListener<T> {
    fn on_progress(&mut self, percent: u8);
    fn on_finished(&mut self, result: std::result::Result<T, String>);
}

impl<T> OperationListener<T> for Vec<RunnerEvent<T>> {
    fn on_progress(&mut self, percent: u8) {
        self.push(RunnerEvent::Progress(percent));
    }

    fn on_finished(&mut self, result: std::result::Result<T, String>) {
        self.push(RunnerEvent::Finished(result));
    }
}

/// 작업 스레드 안에서 쓰는 핸들
pub struct JobContext<T> {
    tx: Sender<RunnerEvent<T>>,
    cancel: CancelToken,
}

impl<T> JobContext<T> {
    pub fn progress(&self, percent: u8) {
        let _ = self.tx.send(RunnerEvent::Progress(percent.min(100)));
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

struct ActiveJob<T> {
    label: String,
    rx: Receiver<RunnerEvent<T>>,
    handle: Option<JoinHandle<()>>,
    cancel: CancelToken,
}

/// 실행 슬롯 하나를 가진 작업 실행기
pub struct OperationRunner<T> {
    name: &'static str,
    active: Option<ActiveJob<T>>,
}

impl<T: Send + 'static> OperationRunner<T> {
    pub fn new(name: &'static str) -> Self {
        Self { name, active: None }
    }

    /// 시작된 작업의 완료 이벤트가 아직 전달되지 않았으면 true
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// 작업 시작. 이미 실행 중이면 `Busy`
    pub fn start<F>(&mut self, label: impl Into<String>, job: F) -> Result<()>
    where
        F: FnOnce(&JobContext<T>) -> Result<T> + Send + 'static,
    {
        if self.is_busy() {
            return Err(ZipperError::Busy);
        }

        let label = label.into();
        let (tx, rx) = mpsc::channel::<RunnerEvent<T>>();
        let cancel = CancelToken::new();
        let ctx = JobContext {
            tx,
            cancel: cancel.clone(),
        };
        let runner_name = self.name;
        let job_label = label.clone();

        let handle = thread::Builder::new()
            .name(format!("zipper-{}", runner_name))
            .spawn(move || {
                let result = job(&ctx).map_err(|e| {
                    error!(runner = runner_name, job = %job_label, error = %e, "job failed");
                    e.to_string()
                });
                let _ = ctx.tx.send(RunnerEvent::Finished(result));
            })?;

        info!(runner = self.name, job = %label, "job started");
        self.active = Some(ActiveJob {
            label,
            rx,
            handle: Some(handle),
            cancel,
        });
        Ok(())
    }

    /// 실행 중인 작업에 취소 요청
    pub fn cancel(&self) -> bool {
        match &self.active {
            Some(job) => {
                job.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// 대기 중인 이벤트를 막지 않고 모두 꺼낸다
    fn drain(&mut self) -> Vec<RunnerEvent<T>> {
        let mut events = Vec::new();
        let Some(job) = &self.active else {
            return events;
        };

        loop {
            match job.rx.try_recv() {
                Ok(RunnerEvent::Progress(p)) => events.push(RunnerEvent::Progress(p)),
                Ok(RunnerEvent::Finished(result)) => {
                    events.push(RunnerEvent::Finished(result));
                    self.finish_job();
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    let reason = self.finish_job().unwrap_or_else(|| {
                        "worker thread stopped without a result".to_string()
                    });
                    events.push(RunnerEvent::Finished(Err(reason)));
                    break;
                }
            }
        }
        events
    }

    /// 대기 중인 이벤트를 막지 않고 리스너에 전달 (UI 루프에서 호출)
    pub fn poll(&mut self, listener: &mut dyn OperationListener<T>) -> usize {
        let events = self.drain();
        let count = events.len();
        for event in events {
            dispatch(listener, event);
        }
        count
    }

    /// 완료될 때까지 막으면서 이벤트를 전달 (배치 모드/테스트)
    pub fn wait(&mut self, listener: &mut dyn OperationListener<T>) {
        loop {
            let Some(job) = &self.active else {
                return;
            };
            match job.rx.recv() {
                Ok(RunnerEvent::Progress(p)) => listener.on_progress(p),
                Ok(RunnerEvent::Finished(result)) => {
                    self.finish_job();
                    listener.on_finished(result);
                    return;
                }
                Err(RecvError) => {
                    let reason = self.finish_job().unwrap_or_else(|| {
                        "worker thread stopped without a result".to_string()
                    });
                    listener.on_finished(Err(reason));
                    return;
                }
            }
        }
    }

    /// 슬롯을 비우고 스레드를 정리한다. 스레드가 패닉했다면 그 메시지를 반환
    fn finish_job(&mut self) -> Option<String> {
        let mut job = self.active.take()?;
        let handle = job.handle.take()?;
        match handle.join() {
            Ok(()) => {
                info!(runner = self.name, job = %job.label, "job finished");
                None
            }
            Err(payload) => {
                let reason = format!("worker thread panicked: {}", panic_message(payload.as_ref()));
                error!(runner = self.name, job = %job.label, "{}", reason);
                Some(reason)
            }
        }
    }
}

fn dispatch<T>(listener: &mut dyn OperationListener<T>, event: RunnerEvent<T>) {
    match event {
        RunnerEvent::Progress(p) => listener.on_progress(p),
        RunnerEvent::Finished(result) => listener.on_finished(result),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::time::{Duration, Instant};

    fn drain_until_done<T: Send + 'static>(runner: &mut OperationRunner<T>) -> Vec<RunnerEvent<T>> {
        let mut events = Vec::new();
        let started = Instant::now();
        while runner.is_busy() {
            events.extend(runner.drain());
            assert!(started.elapsed() < Duration::from_secs(10), "runner did not finish");
            thread::sleep(Duration::from_millis(1));
        }
        events
    }

    #[test]
    fn test_events_arrive_in_order_with_completion_last() {
        let mut runner = OperationRunner::<u32>::new("test");
        runner
            .start("count", |ctx| {
                for p in [10, 20, 50, 100] {
                    ctx.progress(p);
                }
                Ok(7)
            })
            .unwrap();

        let events = drain_until_done(&mut runner);
        assert_eq!(
            events,
            vec![
                RunnerEvent::Progress(10),
                RunnerEvent::Progress(20),
                RunnerEvent::Progress(50),
                RunnerEvent::Progress(100),
                RunnerEvent::Finished(Ok(7)),
            ]
        );
        assert!(!runner.is_busy());
    }

    #[test]
    fn test_second_start_while_busy_is_rejected() {
        let gate = Arc::new(Barrier::new(2));
        let mut runner = OperationRunner::<()>::new("test");
        let worker_gate = Arc::clone(&gate);
        runner
            .start("blocked", move |_| {
                worker_gate.wait();
                Ok(())
            })
            .unwrap();

        let second_ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = Arc::clone(&second_ran);
        let result = runner.start("second", move |_| {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        });
        assert!(matches!(result, Err(ZipperError::Busy)));
        assert!(runner.is_busy());

        gate.wait();
        let mut events = Vec::new();
        runner.wait(&mut events);
        assert_eq!(events, vec![RunnerEvent::Finished(Ok(()))]);
        assert!(!second_ran.load(std::sync::atomic::Ordering::SeqCst));

        // 완료 후에는 다시 시작 가능
        runner.start("third", |_| Ok(())).unwrap();
        runner.wait(&mut Vec::new());
    }

    #[test]
    fn test_error_is_reported_as_final_event() {
        let mut runner = OperationRunner::<()>::new("test");
        runner
            .start("failing", |ctx| {
                ctx.progress(30);
                Err(ZipperError::Busy)
            })
            .unwrap();

        let mut events = Vec::new();
        runner.wait(&mut events);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], RunnerEvent::Progress(30));
        assert_eq!(
            events[1],
            RunnerEvent::Finished(Err(ZipperError::Busy.to_string()))
        );
    }

    #[test]
    fn test_panicking_job_still_completes() {
        let mut runner = OperationRunner::<()>::new("test");
        runner
            .start("panics", |_| -> Result<()> { panic!("boom") })
            .unwrap();

        let events = drain_until_done(&mut runner);
        match events.last() {
            Some(RunnerEvent::Finished(Err(reason))) => assert!(reason.contains("boom")),
            other => panic!("unexpected final event: {:?}", other),
        }
    }

    #[test]
    fn test_cancel_reaches_job() {
        let gate = Arc::new(Barrier::new(2));
        let worker_gate = Arc::clone(&gate);
        let mut runner = OperationRunner::<()>::new("test");
        runner
            .start("cancellable", move |ctx| {
                worker_gate.wait();
                if ctx.cancel_token().is_cancelled() {
                    return Err(ZipperError::Cancelled);
                }
                Ok(())
            })
            .unwrap();

        assert!(runner.cancel());
        gate.wait();
        let mut events = Vec::new();
        runner.wait(&mut events);
        assert_eq!(
            events,
            vec![RunnerEvent::Finished(Err("Operation cancelled".to_string()))]
        );
        assert!(!runner.cancel());
    }

    #[test]
    fn test_poll_without_job_is_noop() {
        let mut runner = OperationRunner::<()>::new("idle");
        let mut events = Vec::new();
        assert_eq!(runner.poll(&mut events), 0);
        assert!(events.is_empty());
    }
}
