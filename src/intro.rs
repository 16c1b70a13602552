// Intro page controller: scroll pipeline, name gate, resize debounce,
// overscroll guard and the riddle deep link.

use crate::effects::{DomOp, Effects, ElementRole};
use crate::error::EngineError;
use crate::gate::{Gate, GateOutcome};
use crate::scheduler::{FrameLoop, Scheduler, TimerId};
use crate::scroll::ScrollPipeline;
use crate::types::*;

/// Every element the intro page needs. Setup is aborted if any is missing.
pub const REQUIRED_ELEMENTS: [ElementRole; 7] = [
    ElementRole::Parallax,
    ElementRole::Hero,
    ElementRole::ClueboxContainer,
    ElementRole::Cluebox,
    ElementRole::PasswordInput,
    ElementRole::SubmitButton,
    ElementRole::Message,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntroTimer {
    /// Viewport stopped changing size.
    ResizeSettled,
    /// Success message has been read: go to the next page.
    Redirect,
    /// `#riddle` link: bring the cluebox into view.
    RevealRiddle,
}

/// Frame-rate logger for local development.
#[derive(Debug)]
pub struct FpsMeter {
    frames: u32,
    window_start: Timestamp,
}

impl FpsMeter {
    pub fn new(now: Timestamp) -> Self {
        FpsMeter {
            frames: 0,
            window_start: now,
        }
    }

    /// Count a frame. Once per second logs and returns the rate.
    pub fn frame(&mut self, now: Timestamp) -> Option<u32> {
        self.frames += 1;
        let elapsed = now.millis_since(self.window_start);
        if elapsed < 1000.0 {
            return None;
        }
        let fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
        log::info!("FPS: {}", fps);
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}

/// Controller of the intro page.
#[derive(Debug)]
pub struct IntroController {
    config: IntroConfig,
    scroll: ScrollPipeline,
    gate: Gate,
    effects: Effects,
    timers: Scheduler<IntroTimer>,
    scroll_frame: FrameLoop,
    resize_timer: Option<TimerId>,
    pending_viewport: Option<ViewportSize>,
    metrics: ScrollMetrics,
    touch_start_y: f64,
    fps: Option<FpsMeter>,
    now: Timestamp,
    prevent_default: bool,
}

impl IntroController {
    /// Check the page has every required element. Missing ones are logged
    /// individually and setup is refused.
    pub fn new(config: IntroConfig, elements: Vec<ElementRole>) -> Result<Self, EngineError> {
        let effects = Effects::new(elements);
        let missing: Vec<String> = REQUIRED_ELEMENTS
            .iter()
            .filter(|role| !effects.has(**role))
            .map(|role| {
                log::error!("Element not found: {}", role.selector());
                role.selector().to_string()
            })
            .collect();
        if !missing.is_empty() {
            log::error!("Failed to initialize some elements");
            return Err(EngineError::MissingElements(missing));
        }

        Ok(IntroController {
            scroll: ScrollPipeline::new(
                config.parallax.clone(),
                config.fade.clone(),
                ViewportSize {
                    width: 0.0,
                    height: 0.0,
                },
            ),
            gate: Gate::new(config.gate.clone()),
            effects,
            timers: Scheduler::new(),
            scroll_frame: FrameLoop::Idle,
            resize_timer: None,
            pending_viewport: None,
            metrics: ScrollMetrics::default(),
            touch_start_y: 0.0,
            fps: None,
            now: Timestamp::default(),
            prevent_default: false,
            config,
        })
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn scroll(&self) -> &ScrollPipeline {
        &self.scroll
    }

    /// Page load: initial styling, next-page prefetch, riddle link, dev meter.
    pub fn start(&mut self, start: IntroStart, now: Timestamp) -> Update {
        self.advance(now);
        self.scroll.set_viewport(start.viewport);
        self.metrics = start.metrics;
        self.scroll.update(&self.metrics, &mut self.effects);

        let url = self.gate.next_page().to_string();
        self.effects.push(DomOp::Prefetch { url });

        if start.hash == "#riddle" {
            let delay = self.config.timing.riddle_scroll_delay_ms;
            self.timers.schedule(now, delay, IntroTimer::RevealRiddle);
        }
        if matches!(start.hostname.as_str(), "localhost" | "127.0.0.1") {
            self.fps = Some(FpsMeter::new(now));
        }
        self.finish()
    }

    pub fn dispatch(&mut self, event: IntroEvent, now: Timestamp) -> Update {
        self.advance(now);
        match event {
            IntroEvent::Scroll => {
                if !self.scroll_frame.is_pending() {
                    self.scroll_frame.request();
                }
            }
            IntroEvent::Resize { width, height } => {
                self.pending_viewport = Some(ViewportSize { width, height });
                let delay = self.config.timing.resize_debounce_ms;
                self.timers
                    .reschedule(&mut self.resize_timer, now, delay, IntroTimer::ResizeSettled);
            }
            IntroEvent::TouchStart { y } => self.touch_start_y = y,
            IntroEvent::TouchMove {
                y,
                scroll_y,
                scroll_height,
            } => {
                let max_scroll = scroll_height - self.scroll.viewport().height;
                let at_top = scroll_y <= 0.0 && y > self.touch_start_y;
                let at_bottom = scroll_y >= max_scroll && y < self.touch_start_y;
                self.prevent_default = at_top || at_bottom;
            }
            IntroEvent::Submit { value } => self.submit(&value),
            IntroEvent::KeyPress { key, value } => {
                if key == "Enter" {
                    self.submit(&value);
                }
            }
            IntroEvent::Unload => self.shutdown(),
        }
        self.finish()
    }

    /// Timer tick: fire every timer due at `now`. A pending scroll frame
    /// waits for the next animation frame.
    pub fn tick(&mut self, now: Timestamp, metrics: ScrollMetrics) -> Update {
        self.advance(now);
        self.metrics = metrics;
        self.fire_due(now);
        self.finish()
    }

    /// Animation frame: fire due timers, run a pending scroll update and
    /// count the frame.
    pub fn frame(&mut self, now: Timestamp, metrics: ScrollMetrics) -> Update {
        self.advance(now);
        self.metrics = metrics;
        self.fire_due(now);
        if self.scroll_frame.take() {
            self.scroll.update(&self.metrics, &mut self.effects);
        }
        if let Some(fps) = self.fps.as_mut() {
            fps.frame(now);
        }
        self.finish()
    }

    fn fire_due(&mut self, now: Timestamp) {
        while let Some((id, timer)) = self.timers.pop_due(now) {
            if self.resize_timer == Some(id) {
                self.resize_timer = None;
            }
            self.fire(timer);
        }
    }

    fn submit(&mut self, value: &str) {
        if let Some(GateOutcome::Correct) = self.gate.submit(value, &mut self.effects) {
            log::debug!("gate opened");
            let delay = self.config.timing.message_delay_ms;
            self.timers.schedule(self.now, delay, IntroTimer::Redirect);
        }
    }

    fn fire(&mut self, timer: IntroTimer) {
        match timer {
            IntroTimer::ResizeSettled => {
                if let Some(viewport) = self.pending_viewport.take() {
                    self.scroll.set_viewport(viewport);
                }
                self.scroll.update(&self.metrics, &mut self.effects);
            }
            IntroTimer::Redirect => {
                let url = self.gate.next_page().to_string();
                self.effects.push(DomOp::Navigate { url });
            }
            IntroTimer::RevealRiddle => {
                self.effects.push(DomOp::ScrollIntoView {
                    target: ElementRole::ClueboxContainer,
                });
            }
        }
    }

    /// Drop the pending scroll frame and resize timer.
    fn shutdown(&mut self) {
        self.scroll_frame.cancel();
        if let Some(id) = self.resize_timer.take() {
            self.timers.cancel(id);
        }
        self.pending_viewport = None;
        self.fps = None;
    }

    fn advance(&mut self, now: Timestamp) {
        if now > self.now {
            self.now = now;
        }
    }

    fn finish(&mut self) -> Update {
        Update {
            ops: self.effects.drain(),
            prevent_default: std::mem::take(&mut self.prevent_default),
            wants_frame: self.scroll_frame.is_pending() || self.fps.is_some(),
            next_timer_ms: self.timers.next_due().map(|due| due.as_millis()),
        }
    }
}
