use crate::detection::domain::face_detector::FaceDetector;
use crate::obfuscation::domain::effect_mode::EffectMode;
use crate::obfuscation::infrastructure::live_overlay_renderer::LiveOverlayRenderer;
use crate::obfuscation::infrastructure::overlay::Overlay;
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;

/// Stamp attached to one live detection request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct DetectionTicket {
    generation: u64,
}

impl DetectionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Counters for one live run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiveStats {
    pub ticks: usize,
    pub accepted: usize,
    pub discarded: usize,
}

/// Tick-driven live obfuscation.
///
/// Holds the overlay, the most recent regions and a generation counter.
/// Every detection request gets a ticket; a result is only applied if its
/// ticket is newer than the last applied one, so a slow request can never
/// overwrite a newer overlay. Stopping invalidates every outstanding ticket.
pub struct LivePreview {
    overlay: Overlay,
    renderer: LiveOverlayRenderer,
    regions: Vec<FaceRegion>,
    issued: u64,
    applied: u64,
    running: bool,
    stats: LiveStats,
}

impl LivePreview {
    pub fn new(renderer: LiveOverlayRenderer, overlay_size: (u32, u32)) -> Self {
        Self {
            overlay: Overlay::new(overlay_size.0, overlay_size.1),
            renderer,
            regions: Vec::new(),
            issued: 0,
            applied: 0,
            running: false,
            stats: LiveStats::default(),
        }
    }

    pub fn start(&mut self) {
        self.discard_outstanding();
        self.running = true;
        self.stats = LiveStats::default();
        log::info!("Live preview started");
    }

    /// Stops the preview and clears the overlay. Results of requests issued
    /// before this call are discarded.
    pub fn stop(&mut self) {
        self.discard_outstanding();
        self.running = false;
        self.overlay.clear();
        log::info!(
            "Live preview stopped after {} tick(s), {} result(s) applied, {} discarded",
            self.stats.ticks,
            self.stats.accepted,
            self.stats.discarded
        );
    }

    fn discard_outstanding(&mut self) {
        self.issued += 1;
        self.applied = self.issued;
        self.regions.clear();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn regions(&self) -> &[FaceRegion] {
        &self.regions
    }

    pub fn stats(&self) -> LiveStats {
        self.stats
    }

    pub fn effect(&self) -> EffectMode {
        self.renderer.effect()
    }

    pub fn set_effect(&mut self, effect: EffectMode) {
        self.renderer.set_effect(effect);
    }

    /// Resizes the overlay to match the displayed video.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.overlay.resize(width, height);
    }

    /// Issues a ticket for a new detection request, or `None` when stopped.
    pub fn begin_detection(&mut self) -> Option<DetectionTicket> {
        if !self.running {
            return None;
        }
        self.issued += 1;
        Some(DetectionTicket {
            generation: self.issued,
        })
    }

    /// Applies a detection result. Returns `false` if it was stale.
    pub fn accept(&mut self, ticket: DetectionTicket, regions: Vec<FaceRegion>) -> bool {
        if !self.running || ticket.generation <= self.applied {
            log::debug!("Discarding stale detection result (gen {})", ticket.generation);
            self.stats.discarded += 1;
            return false;
        }
        self.applied = ticket.generation;
        self.regions = regions;
        self.stats.accepted += 1;
        true
    }

    /// Repaints the overlay from the current regions and `frame`.
    pub fn render(&mut self, frame: &Frame) -> &Overlay {
        self.overlay.clear();
        if self.running {
            let commands = self
                .renderer
                .render(frame, &self.regions, self.overlay.size());
            self.overlay.apply(&commands);
            self.stats.ticks += 1;
        }
        &self.overlay
    }

    /// One synchronous tick: detect on `frame`, apply the result, repaint.
    ///
    /// A detector error counts as zero faces.
    pub fn tick(&mut self, frame: &Frame, detector: &mut dyn FaceDetector) -> &Overlay {
        if let Some(ticket) = self.begin_detection() {
            let regions = detector.detect(frame).unwrap_or_else(|e| {
                log::warn!("Live detection failed: {e}");
                Vec::new()
            });
            self.accept(ticket, regions);
        }
        self.render(frame)
    }
}
