// Double-buffered backdrop: the new image goes onto the hidden layer, which
// then fades in while the visible one fades out.

use crate::effects::{css_number, Effects, ElementRole};
use crate::types::BgLayer;

/// Swaps the blurred backdrop image without a hard cut.
#[derive(Debug)]
pub struct Crossfader {
    active: BgLayer,
    opacity: f64,
}

impl Crossfader {
    pub fn new(opacity: f64) -> Self {
        Crossfader {
            active: BgLayer::Primary,
            opacity,
        }
    }

    pub fn active(&self) -> BgLayer {
        self.active
    }

    /// Show `src` on the backdrop.
    ///
    /// Without the alternate layer the primary layer is updated in place
    /// (a hard cut, but never a blank frame). Without either layer this is a no-op.
    pub fn crossfade(&mut self, src: &str, effects: &mut Effects) {
        if !effects.has(ElementRole::BlurBackground) {
            return;
        }
        let image = format!("url('{}')", src);

        if !effects.has(ElementRole::BlurBackgroundAlt) {
            effects.set_style(ElementRole::BlurBackground, "background-image", image);
            effects.set_style(ElementRole::BlurBackground, "opacity", css_number(self.opacity));
            self.active = BgLayer::Primary;
            return;
        }

        let incoming = self.active.other();
        effects.set_style(incoming.role(), "background-image", image);
        effects.set_style(incoming.role(), "opacity", css_number(self.opacity));
        effects.set_style(self.active.role(), "opacity", "0");
        self.active = incoming;
    }
}
