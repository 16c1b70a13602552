// Wheel gallery physics: input deltas move a target angle, a smoothing loop
// eases the displayed angle toward it, and release inertia keeps the target
// moving with geometrically decaying velocity.
//
// Per frame the inertia loop runs first and delegates that frame's single
// smoothing step, so target/velocity/current are written in a fixed order.

use crate::effects::{css_number, DomOp, Effects, ElementRole};
use crate::scheduler::FrameLoop;
use crate::types::{Timestamp, WheelSettings};

/// Rotation state of the wheel, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelRotation {
    pub current: f64,
    pub target: f64,
    /// Degrees per frame, applied to `target` by inertia.
    pub velocity: f64,
    pub is_interacting: bool,
}

#[derive(Debug, Clone, Copy)]
struct TouchSample {
    x: f64,
    time: Timestamp,
}

/// Wheel/touch driven rotation of the `.banner .slider` element.
#[derive(Debug)]
pub struct WheelPhysics {
    settings: WheelSettings,
    rotation: WheelRotation,
    touch: Option<TouchSample>,
    smoothing: FrameLoop,
    inertia: FrameLoop,
    attached: bool,
}

impl WheelPhysics {
    pub fn new(settings: WheelSettings) -> Self {
        WheelPhysics {
            settings,
            rotation: WheelRotation::default(),
            touch: None,
            smoothing: FrameLoop::Idle,
            inertia: FrameLoop::Idle,
            attached: false,
        }
    }

    pub fn rotation(&self) -> &WheelRotation {
        &self.rotation
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// A smoothing or inertia frame is pending.
    pub fn is_animating(&self) -> bool {
        self.smoothing.is_pending() || self.inertia.is_pending()
    }

    /// Zero the rotation for a fresh visit to the wheel view.
    pub fn reset(&mut self, effects: &mut Effects) {
        self.rotation = WheelRotation::default();
        self.touch = None;
        self.smoothing.cancel();
        self.inertia.cancel();
        effects.set_style(ElementRole::Slider, "animation", "none");
        effects.set_style(ElementRole::Slider, "transform", slider_transform(0.0));
    }

    /// Bind gesture listeners, replacing any set bound earlier.
    /// Returns false if the banner or slider is missing.
    pub fn attach(&mut self, effects: &mut Effects) -> bool {
        if !effects.has(ElementRole::Banner) || !effects.has(ElementRole::Slider) {
            return false;
        }
        self.detach(effects);
        effects.push(DomOp::BindWheelListeners);
        self.attached = true;
        self.touch = None;
        log::debug!("wheel listeners attached");
        true
    }

    /// Remove the bound listeners and cancel pending frames. No-op when
    /// nothing is bound.
    pub fn detach(&mut self, effects: &mut Effects) {
        if !self.attached {
            return;
        }
        effects.push(DomOp::UnbindWheelListeners);
        self.attached = false;
        self.touch = None;
        self.rotation.is_interacting = false;
        self.smoothing.cancel();
        self.inertia.cancel();
        log::debug!("wheel listeners detached");
    }

    /// Mouse wheel input. Returns true if the event was consumed.
    pub fn on_wheel(&mut self, delta_x: f64, delta_y: f64, effects: &mut Effects) -> bool {
        if !self.attached {
            return false;
        }
        let delta = if delta_y != 0.0 { delta_y } else { delta_x };
        self.rotation.target -= delta * self.settings.rotation_speed;
        self.rotation.velocity = -delta * self.settings.wheel_velocity_scale;
        self.rotation.is_interacting = true;
        self.smoothing_step(effects);
        true
    }

    /// The wheel went quiet: let the smoothing loop settle. A touch in
    /// progress keeps the interaction alive.
    pub fn end_wheel_interaction(&mut self) {
        if self.touch.is_none() {
            self.rotation.is_interacting = false;
        }
    }

    pub fn on_touch_start(&mut self, x: f64, now: Timestamp) -> bool {
        if !self.attached {
            return false;
        }
        self.rotation.is_interacting = true;
        self.rotation.velocity = 0.0;
        self.inertia.cancel();
        self.touch = Some(TouchSample { x, time: now });
        true
    }

    /// Horizontal drag. Returns true if the event was consumed.
    pub fn on_touch_move(&mut self, x: f64, now: Timestamp, effects: &mut Effects) -> bool {
        if !self.attached {
            return false;
        }
        let Some(last) = self.touch else {
            return true;
        };
        let delta = x - last.x;
        // Two samples in the same millisecond would divide by zero.
        let elapsed = now.millis_since(last.time).max(1.0);

        self.rotation.target += delta * self.settings.touch_gain;
        self.rotation.velocity = delta / elapsed * self.settings.frame_ms;
        self.touch = Some(TouchSample { x, time: now });
        self.smoothing_step(effects);
        true
    }

    /// Release: hand the current velocity to the inertia loop.
    pub fn on_touch_end(&mut self, effects: &mut Effects) -> bool {
        if !self.attached {
            return false;
        }
        self.touch = None;
        self.rotation.is_interacting = false;
        self.inertia_step(effects);
        true
    }

    /// Run this animation frame's pending loop work.
    pub fn frame(&mut self, effects: &mut Effects) {
        let inertia_due = self.inertia.take();
        let smoothing_due = self.smoothing.take();
        if inertia_due && self.inertia_step(effects) {
            return;
        }
        if smoothing_due {
            self.smoothing_step(effects);
        }
    }

    /// Ease `current` toward `target` and write the transform. Keeps the loop
    /// scheduled while away from the target or under interaction.
    fn smoothing_step(&mut self, effects: &mut Effects) {
        let rot = &mut self.rotation;
        rot.current += (rot.target - rot.current) * self.settings.smooth_factor;
        effects.set_style(ElementRole::Slider, "transform", slider_transform(rot.current));

        if (rot.target - rot.current).abs() > self.settings.settle_epsilon || rot.is_interacting {
            self.smoothing.request();
        } else {
            self.smoothing.cancel();
        }
    }

    /// One inertia frame. Returns false (and goes idle) once velocity has decayed.
    fn inertia_step(&mut self, effects: &mut Effects) -> bool {
        if self.rotation.velocity.abs() <= self.settings.inertia_threshold {
            self.inertia.cancel();
            return false;
        }
        self.rotation.target += self.rotation.velocity;
        self.rotation.velocity *= self.settings.inertia_damping;
        self.smoothing_step(effects);
        self.inertia.request();
        true
    }
}

fn slider_transform(degrees: f64) -> String {
    format!(
        "translateX(-50%) perspective(1000px) translateY(20%) rotateY({}deg)",
        css_number(degrees)
    )
}
