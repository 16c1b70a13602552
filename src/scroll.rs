// Intro page scroll pipeline: scroll position -> background parallax,
// hero fade and cluebox reveal.

use crate::effects::{css_number, Effects, ElementRole};
use crate::types::{FadeSettings, ParallaxSettings, ScrollMetrics, ViewportSize};

/// Scroll-driven styling of the intro page.
#[derive(Debug)]
pub struct ScrollPipeline {
    parallax: ParallaxSettings,
    fade: FadeSettings,
    viewport: ViewportSize,
    cluebox_visible: bool,
    parallax_frame: u64,
}

impl ScrollPipeline {
    pub fn new(parallax: ParallaxSettings, fade: FadeSettings, viewport: ViewportSize) -> Self {
        ScrollPipeline {
            parallax,
            fade,
            viewport,
            cluebox_visible: false,
            parallax_frame: 0,
        }
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    pub fn is_cluebox_visible(&self) -> bool {
        self.cluebox_visible
    }

    fn is_desktop(&self) -> bool {
        self.viewport.width > self.parallax.breakpoint
    }

    /// Apply every scroll-driven style for the given measurements.
    pub fn update(&mut self, metrics: &ScrollMetrics, effects: &mut Effects) {
        self.update_parallax(metrics, effects);
        self.update_hero_opacity(metrics, effects);
        self.update_cluebox(metrics, effects);
    }

    fn update_parallax(&mut self, metrics: &ScrollMetrics, effects: &mut Effects) {
        let frame = self.parallax_frame;
        self.parallax_frame += 1;
        // Low-density screens only redraw the background every other frame.
        if frame % 2 == 0 && metrics.device_pixel_ratio < 2.0 {
            return;
        }
        effects.set_style(
            ElementRole::Parallax,
            "transform",
            parallax_transform(metrics.scroll_y, self.viewport.width, &self.parallax),
        );
    }

    fn update_hero_opacity(&self, metrics: &ScrollMetrics, effects: &mut Effects) {
        let opacity = hero_opacity(metrics.scroll_y, metrics.hero_height, &self.fade);
        effects.set_style(ElementRole::Hero, "opacity", css_number(opacity));
    }

    fn update_cluebox(&mut self, metrics: &ScrollMetrics, effects: &mut Effects) {
        let ratio = if self.is_desktop() {
            self.fade.cluebox_trigger_desktop
        } else {
            self.fade.cluebox_trigger_mobile
        };
        let trigger = metrics.cluebox_offset_top - self.viewport.height * ratio;
        let show = metrics.scroll_y > trigger;
        if show == self.cluebox_visible {
            return;
        }
        self.cluebox_visible = show;
        effects.set_style(
            ElementRole::ClueboxContainer,
            "opacity",
            if show { "1" } else { "0" },
        );
        if show {
            effects.add_class(ElementRole::Cluebox, "visible");
        } else {
            effects.remove_class(ElementRole::Cluebox, "visible");
        }
    }
}

/// Desktop: vertical offset. Mobile: horizontal offset clamped to one screen width.
/// Rounded to 0.1px.
pub fn parallax_transform(scroll_y: f64, viewport_width: f64, settings: &ParallaxSettings) -> String {
    if viewport_width > settings.breakpoint {
        let offset = round_tenth(scroll_y * settings.speed_desktop);
        format!("translate3d(0, {}px, 0)", css_number(offset))
    } else {
        let raw = (scroll_y * settings.speed_mobile).clamp(-viewport_width, 0.0);
        format!("translate3d({}px, 0, 0)", css_number(round_tenth(raw)))
    }
}

/// Opaque until `hero_start` of the hero height, transparent from `hero_end`,
/// linear in between.
pub fn hero_opacity(scroll_y: f64, hero_height: f64, fade: &FadeSettings) -> f64 {
    let start = hero_height * fade.hero_start;
    let end = hero_height * fade.hero_end;
    if scroll_y >= end {
        0.0
    } else if scroll_y > start {
        1.0 - (scroll_y - start) / (end - start)
    } else {
        1.0
    }
}

/// `Math.round(x * 10) / 10`, rounding halves up like JS.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
