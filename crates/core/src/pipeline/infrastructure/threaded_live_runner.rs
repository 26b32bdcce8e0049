use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::frame_source::FrameSource;
use crate::pipeline::live_preview::{DetectionTicket, LivePreview};
use crate::pipeline::overlay_sink::OverlaySink;
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;

type SendError = Box<dyn std::error::Error + Send + Sync>;
type DetectionJob = (DetectionTicket, Frame);
type DetectionResult = (DetectionTicket, Result<Vec<FaceRegion>, String>);

/// Drives a [`LivePreview`] from a polling timer.
///
/// Layout: `timer → driver [frame, render, deliver] ⇄ detection worker`
///
/// The driver owns the preview and never waits on detection. At most one
/// detection request is in flight; ticks that find the worker busy repaint
/// with the last applied regions. A worker still busy when the run ends is
/// detached; its result would be stale anyway.
pub struct ThreadedLiveRunner {
    interval: Duration,
}

/// A running live preview. Dropping it stops the driver without waiting.
pub struct LiveRunHandle {
    stop_tx: Sender<()>,
    handle: JoinHandle<Result<LivePreview, SendError>>,
}

impl LiveRunHandle {
    /// Stops the run. The sink has received a cleared overlay when this
    /// returns.
    pub fn stop(self) -> Result<LivePreview, Box<dyn std::error::Error>> {
        let _ = self.stop_tx.try_send(());
        self.join()
    }

    /// Waits until the frame source is exhausted.
    pub fn join(self) -> Result<LivePreview, Box<dyn std::error::Error>> {
        let LiveRunHandle { stop_tx, handle } = self;
        let result = handle.join();
        drop(stop_tx);
        match result {
            Ok(Ok(preview)) => Ok(preview),
            Ok(Err(e)) => Err(e.to_string().into()),
            Err(_) => Err("live driver thread panicked".into()),
        }
    }
}

impl ThreadedLiveRunner {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub fn start(
        &self,
        preview: LivePreview,
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        sink: Box<dyn OverlaySink>,
    ) -> LiveRunHandle {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let interval = self.interval;
        let handle = std::thread::spawn(move || {
            let (job_tx, job_rx) = crossbeam_channel::bounded::<DetectionJob>(1);
            let (result_tx, result_rx) = crossbeam_channel::bounded::<DetectionResult>(1);
            let worker = spawn_worker(detector, job_rx, result_tx);

            let outcome = run_driver(preview, source, sink, &job_tx, &result_rx, &stop_rx, interval);

            drop(job_tx);
            drop(result_rx);
            if worker.is_finished() {
                if worker.join().is_err() {
                    log::error!("Detection worker panicked");
                }
            } else {
                log::debug!("Detaching busy detection worker");
            }
            outcome
        });
        LiveRunHandle { stop_tx, handle }
    }
}

fn spawn_worker(
    mut detector: Box<dyn FaceDetector>,
    job_rx: Receiver<DetectionJob>,
    result_tx: Sender<DetectionResult>,
) -> JoinHandle<Box<dyn FaceDetector>> {
    std::thread::spawn(move || {
        for (ticket, frame) in job_rx {
            let result = detector.detect(&frame).map_err(|e| e.to_string());
            if result_tx.send((ticket, result)).is_err() {
                break;
            }
        }
        detector
    })
}

fn run_driver(
    mut preview: LivePreview,
    mut source: Box<dyn FrameSource>,
    mut sink: Box<dyn OverlaySink>,
    job_tx: &Sender<DetectionJob>,
    result_rx: &Receiver<DetectionResult>,
    stop_rx: &Receiver<()>,
    interval: Duration,
) -> Result<LivePreview, SendError> {
    let ticker = crossbeam_channel::tick(interval);
    let mut in_flight = false;
    preview.start();

    let outcome: Result<(), SendError> = loop {
        crossbeam_channel::select! {
            recv(stop_rx) -> _ => break Ok(()),
            recv(result_rx) -> msg => match msg {
                Ok((ticket, result)) => {
                    in_flight = false;
                    let regions = result.unwrap_or_else(|e| {
                        log::warn!("Live detection failed: {e}");
                        Vec::new()
                    });
                    preview.accept(ticket, regions);
                }
                Err(_) => break Err("detection worker exited".into()),
            },
            recv(ticker) -> _ => {
                let frame = match source.next_frame() {
                    Ok(Some(frame)) => frame,
                    Ok(None) => break Ok(()),
                    Err(e) => break Err(e.to_string().into()),
                };
                if !in_flight {
                    if let Some(ticket) = preview.begin_detection() {
                        in_flight = job_tx.send((ticket, frame.clone())).is_ok();
                    }
                }
                let overlay = preview.render(&frame);
                if let Err(e) = sink.deliver(overlay) {
                    break Err(e.to_string().into());
                }
            }
        }
    };

    preview.stop();
    let delivered = sink.deliver(preview.overlay());
    outcome?;
    delivered.map_err(|e| -> SendError { e.to_string().into() })?;
    Ok(preview)
}
