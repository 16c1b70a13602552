// keepsake_engine: Rust/WASM engine behind the keepsake pages.
// All behaviour lives here; the page scripts only forward events and frame
// ticks as JSON and apply the DOM ops that come back.

mod controller;
mod crossfade;
mod effects;
mod error;
mod fragment;
mod gate;
mod intro;
mod ring;
mod rotator;
mod scheduler;
mod scroll;
mod types;
mod wheel;

use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

pub use controller::ViewController;
pub use crossfade::Crossfader;
pub use effects::{DomOp, Effects, ElementRole};
pub use error::EngineError;
pub use fragment::Fragment;
pub use gate::{evaluate, Gate, GateOutcome};
pub use intro::{FpsMeter, IntroController, REQUIRED_ELEMENTS};
pub use ring::{CarouselRing, CENTER_SLOT};
pub use rotator::{Rotator, TransitionLock};
pub use scheduler::{FrameLoop, Scheduler, TimerId};
pub use scroll::{hero_opacity, parallax_transform, ScrollPipeline};
pub use types::*;
pub use wheel::{WheelPhysics, WheelRotation};

/// Install the panic hook and console logger.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Fails only if a logger is already installed.
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Info);
}

fn to_js_error(err: EngineError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Blank input means "all defaults".
fn parse_config<T: DeserializeOwned + Default>(json: &str) -> Result<T, EngineError> {
    if json.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))
}

fn parse_event<T: DeserializeOwned>(json: &str) -> Result<T, EngineError> {
    serde_json::from_str(json).map_err(|e| EngineError::InvalidEvent(e.to_string()))
}

fn to_json(update: &Update) -> Result<String, EngineError> {
    Ok(serde_json::to_string(update)?)
}

// =============================================================================
// Carousel page
// =============================================================================

/// Carousel page engine exposed to JavaScript.
///
/// Every call returns an `Update` as JSON:
/// `{ "ops": [...], "prevent_default": bool, "wants_frame": bool, "next_timer_ms": number|null }`.
#[wasm_bindgen]
pub struct CarouselEngine {
    inner: ViewController,
}

#[wasm_bindgen]
impl CarouselEngine {
    /// Create the engine from a `CarouselConfig` (blank for defaults) and the
    /// `PageLayout` the page script collected.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, layout_json: &str) -> Result<CarouselEngine, JsValue> {
        Self::from_json(config_json, layout_json).map_err(to_js_error)
    }

    /// Restore from `location.hash` and paint the initial backdrop.
    pub fn start(&mut self, hash: &str, now_ms: f64) -> Result<String, JsValue> {
        to_json(&self.inner.start(hash, Timestamp::from_millis(now_ms))).map_err(to_js_error)
    }

    /// Handle one `CarouselEvent`.
    pub fn dispatch(&mut self, event_json: &str, now_ms: f64) -> Result<String, JsValue> {
        self.dispatch_json(event_json, now_ms).map_err(to_js_error)
    }

    /// Fire due timers. Call when `next_timer_ms` comes due.
    pub fn tick(&mut self, now_ms: f64) -> Result<String, JsValue> {
        to_json(&self.inner.tick(Timestamp::from_millis(now_ms))).map_err(to_js_error)
    }

    /// One animation frame. Call from `requestAnimationFrame` while
    /// `wants_frame` is set.
    pub fn frame(&mut self, now_ms: f64) -> Result<String, JsValue> {
        to_json(&self.inner.frame(Timestamp::from_millis(now_ms))).map_err(to_js_error)
    }

    /// Fragment for the current state, without the `#`.
    pub fn fragment(&self) -> String {
        self.inner.fragment().to_string()
    }
}

impl CarouselEngine {
    pub fn from_json(config_json: &str, layout_json: &str) -> Result<CarouselEngine, EngineError> {
        let config: CarouselConfig = parse_config(config_json)?;
        let layout: PageLayout = serde_json::from_str(layout_json)
            .map_err(|e| EngineError::InvalidLayout(e.to_string()))?;
        Ok(CarouselEngine {
            inner: ViewController::new(config, layout)?,
        })
    }

    pub fn dispatch_json(&mut self, event_json: &str, now_ms: f64) -> Result<String, EngineError> {
        let event: CarouselEvent = parse_event(event_json)?;
        to_json(&self.inner.dispatch(event, Timestamp::from_millis(now_ms)))
    }

    pub fn controller(&self) -> &ViewController {
        &self.inner
    }
}

// =============================================================================
// Intro page
// =============================================================================

/// Intro page engine exposed to JavaScript. Same `Update` JSON as
/// [`CarouselEngine`].
#[wasm_bindgen]
pub struct IntroEngine {
    inner: IntroController,
}

#[wasm_bindgen]
impl IntroEngine {
    /// Create the engine from an `IntroConfig` (blank for defaults) and the
    /// JSON array of element roles found on the page. Fails, after logging
    /// each missing selector, if any required element is absent.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, elements_json: &str) -> Result<IntroEngine, JsValue> {
        Self::from_json(config_json, elements_json).map_err(to_js_error)
    }

    /// Initial styling from an `IntroStart` snapshot.
    pub fn start(&mut self, start_json: &str, now_ms: f64) -> Result<String, JsValue> {
        self.start_json(start_json, now_ms).map_err(to_js_error)
    }

    /// Handle one `IntroEvent`.
    pub fn dispatch(&mut self, event_json: &str, now_ms: f64) -> Result<String, JsValue> {
        self.dispatch_json(event_json, now_ms).map_err(to_js_error)
    }

    /// Timer tick with fresh `ScrollMetrics`.
    pub fn tick(&mut self, now_ms: f64, metrics_json: &str) -> Result<String, JsValue> {
        self.tick_json(now_ms, metrics_json).map_err(to_js_error)
    }

    /// Animation frame with fresh `ScrollMetrics`.
    pub fn frame(&mut self, now_ms: f64, metrics_json: &str) -> Result<String, JsValue> {
        self.frame_json(now_ms, metrics_json).map_err(to_js_error)
    }
}

impl IntroEngine {
    pub fn from_json(config_json: &str, elements_json: &str) -> Result<IntroEngine, EngineError> {
        let config: IntroConfig = parse_config(config_json)?;
        let elements: Vec<ElementRole> = serde_json::from_str(elements_json)
            .map_err(|e| EngineError::InvalidLayout(e.to_string()))?;
        Ok(IntroEngine {
            inner: IntroController::new(config, elements)?,
        })
    }

    pub fn start_json(&mut self, start_json: &str, now_ms: f64) -> Result<String, EngineError> {
        let start: IntroStart = parse_event(start_json)?;
        to_json(&self.inner.start(start, Timestamp::from_millis(now_ms)))
    }

    pub fn dispatch_json(&mut self, event_json: &str, now_ms: f64) -> Result<String, EngineError> {
        let event: IntroEvent = parse_event(event_json)?;
        to_json(&self.inner.dispatch(event, Timestamp::from_millis(now_ms)))
    }

    pub fn tick_json(&mut self, now_ms: f64, metrics_json: &str) -> Result<String, EngineError> {
        let metrics: ScrollMetrics = parse_event(metrics_json)?;
        to_json(&self.inner.tick(Timestamp::from_millis(now_ms), metrics))
    }

    pub fn frame_json(&mut self, now_ms: f64, metrics_json: &str) -> Result<String, EngineError> {
        let metrics: ScrollMetrics = parse_event(metrics_json)?;
        to_json(&self.inner.frame(Timestamp::from_millis(now_ms), metrics))
    }

    pub fn controller(&self) -> &IntroController {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = r#"{
        "elements": ["carousel", "list", "next_button", "prev_button",
                     "blur_background", "blur_background_alt", "banner", "slider"],
        "items": [
            {"id": "1", "image_src": "pageimages/one.png"},
            {"id": "2", "image_src": "pageimages/two.png"},
            {"id": "3", "image_src": "pageimages/three.png"}
        ],
        "continue_targets": ["wheel", "poetry"],
        "back_sources": ["wheel", "poetry"]
    }"#;

    #[test]
    fn carousel_engine_creation_works() {
        let engine = CarouselEngine::from_json("", LAYOUT);
        assert!(engine.is_ok());
    }

    #[test]
    fn carousel_engine_round_trips_json() {
        let mut engine = CarouselEngine::from_json(r#"{"rotation_ms": 500}"#, LAYOUT).unwrap();
        let json = engine.dispatch_json(r#"{"type":"Next"}"#, 0.0).unwrap();
        let update: Update = serde_json::from_str(&json).unwrap();
        assert!(update.ops.contains(&DomOp::MoveHeadToTail));
        assert_eq!(update.next_timer_ms, Some(500.0));
        assert_eq!(engine.controller().ring().center_id(), Some(&ItemId::from("3")));
    }

    #[test]
    fn carousel_engine_rejects_bad_input() {
        assert!(matches!(
            CarouselEngine::from_json("{not json", LAYOUT),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            CarouselEngine::from_json("", r#"{"elements": ["nope"]}"#),
            Err(EngineError::InvalidLayout(_))
        ));

        let mut engine = CarouselEngine::from_json("", LAYOUT).unwrap();
        assert!(matches!(
            engine.dispatch_json(r#"{"type":"Teleport"}"#, 0.0),
            Err(EngineError::InvalidEvent(_))
        ));
    }

    #[test]
    fn intro_engine_gate_flow() {
        let elements = serde_json::to_string(&REQUIRED_ELEMENTS).unwrap();
        let mut engine = IntroEngine::from_json("", &elements).unwrap();
        engine
            .start_json(r#"{"viewport": {"width": 1024, "height": 768}}"#, 0.0)
            .unwrap();

        let json = engine
            .dispatch_json(r#"{"type":"Submit","value":"Valhalla Meridius"}"#, 100.0)
            .unwrap();
        let update: Update = serde_json::from_str(&json).unwrap();
        assert_eq!(update.next_timer_ms, Some(1600.0));
        assert!(engine.controller().gate().is_open());

        let json = engine.tick_json(1600.0, r#"{"scroll_y": 0}"#).unwrap();
        let update: Update = serde_json::from_str(&json).unwrap();
        assert!(update.ops.contains(&DomOp::Navigate {
            url: "carouselpage.html".into()
        }));
    }

    #[test]
    fn intro_engine_scroll_waits_for_frame() {
        let elements = serde_json::to_string(&REQUIRED_ELEMENTS).unwrap();
        let mut engine = IntroEngine::from_json("", &elements).unwrap();
        engine
            .start_json(r#"{"viewport": {"width": 1280, "height": 800}}"#, 0.0)
            .unwrap();
        engine.dispatch_json(r#"{"type":"Scroll"}"#, 1.0).unwrap();

        let metrics = r#"{"scroll_y": 600, "device_pixel_ratio": 2}"#;
        let update: Update = serde_json::from_str(&engine.tick_json(5.0, metrics).unwrap()).unwrap();
        assert!(update.ops.is_empty());
        let update: Update = serde_json::from_str(&engine.frame_json(16.0, metrics).unwrap()).unwrap();
        assert!(update.ops.contains(&DomOp::SetStyle {
            target: ElementRole::Parallax,
            property: "transform".into(),
            value: "translate3d(0, -240px, 0)".into()
        }));
    }

    #[test]
    fn intro_engine_refuses_incomplete_page() {
        assert!(matches!(
            IntroEngine::from_json("", r#"["hero", "message"]"#),
            Err(EngineError::MissingElements(_))
        ));
    }
}
