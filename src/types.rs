// Strong typing over strings. Newtypes for timestamps and item ids, enums for
// views and button discriminators, serde-backed configuration with defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::effects::{DomOp, ElementRole};

/// Timestamp in microseconds. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_micros(us: u64) -> Self {
        Timestamp(us)
    }

    /// From a JS clock reading (`performance.now()` / `Date.now()`), clamped at zero.
    pub fn from_millis(ms: f64) -> Self {
        if ms.is_finite() && ms > 0.0 {
            Timestamp((ms * 1000.0).round() as u64)
        } else {
            Timestamp(0)
        }
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_millis(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub fn after_millis(&self, ms: u64) -> Self {
        Timestamp(self.0.saturating_add(ms.saturating_mul(1000)))
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn millis_since(&self, earlier: Timestamp) -> f64 {
        self.0.saturating_sub(earlier.0) as f64 / 1000.0
    }
}

/// Carousel item identifier, the value of the item's `data-item` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId(id.to_string())
    }
}

/// Which view of the carousel page is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Carousel,
    Detail,
    Wheel,
    Poetry,
}

/// Carousel rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    /// Class the stylesheet animates for this direction.
    pub fn class(self) -> &'static str {
        match self {
            Direction::Next => "next",
            Direction::Prev => "prev",
        }
    }
}

/// Full-screen scene reachable from the detail view. Parsed from the
/// `data-target` of continue buttons and the `data-from` of back buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scene {
    Wheel,
    Poetry,
}

impl Scene {
    pub fn parse(value: &str) -> Option<Scene> {
        match value {
            "wheel" => Some(Scene::Wheel),
            "poetry" => Some(Scene::Poetry),
            _ => None,
        }
    }

    pub fn view(self) -> ViewState {
        match self {
            Scene::Wheel => ViewState::Wheel,
            Scene::Poetry => ViewState::Poetry,
        }
    }

    /// Root container class that displays this scene.
    pub fn class(self) -> &'static str {
        match self {
            Scene::Wheel => "showImage1wheel",
            Scene::Poetry => "showPoetryScroll",
        }
    }
}

/// One of the two stacked backdrop layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BgLayer {
    #[default]
    Primary,
    Alt,
}

impl BgLayer {
    pub fn other(self) -> BgLayer {
        match self {
            BgLayer::Primary => BgLayer::Alt,
            BgLayer::Alt => BgLayer::Primary,
        }
    }

    pub fn role(self) -> ElementRole {
        match self {
            BgLayer::Primary => ElementRole::BlurBackground,
            BgLayer::Alt => ElementRole::BlurBackgroundAlt,
        }
    }
}

// =============================================================================
// Page layout (reported by JS once at startup)
// =============================================================================

/// A carousel item as found in the markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpec {
    pub id: ItemId,
    /// `src` of the item's image, used for the backdrop.
    #[serde(default)]
    pub image_src: Option<String>,
}

/// Elements the plumbing found on the page, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageLayout {
    #[serde(default)]
    pub elements: Vec<ElementRole>,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    /// `data-target` of each `.continue-btn`.
    #[serde(default)]
    pub continue_targets: Vec<String>,
    /// `data-from` of each `.back-btn`.
    #[serde(default)]
    pub back_sources: Vec<String>,
}

// =============================================================================
// Configuration
// =============================================================================

/// Carousel page configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Must match the CSS rotation transition.
    #[serde(default = "default_rotation_ms")]
    pub rotation_ms: u64,
    /// Wait before binding wheel listeners after entering the wheel view.
    #[serde(default = "default_wheel_settle_ms")]
    pub wheel_settle_ms: u64,
    /// Poetry background reveal and back-to-detail delays.
    #[serde(default = "default_short_settle_ms")]
    pub short_settle_ms: u64,
    /// Replay delay for transitions restored from the fragment.
    #[serde(default = "default_short_settle_ms")]
    pub restore_delay_ms: u64,
    #[serde(default = "default_wheel_image")]
    pub wheel_image: String,
    #[serde(default = "default_poetry_image")]
    pub poetry_image: String,
    /// Item centered when returning from the wheel view.
    #[serde(default = "default_wheel_return_item")]
    pub wheel_return_item: ItemId,
    /// Item centered when returning from the poetry view.
    #[serde(default = "default_poetry_return_item")]
    pub poetry_return_item: ItemId,
    #[serde(default = "default_backdrop_opacity")]
    pub backdrop_opacity: f64,
    #[serde(default)]
    pub wheel: WheelSettings,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        CarouselConfig {
            rotation_ms: default_rotation_ms(),
            wheel_settle_ms: default_wheel_settle_ms(),
            short_settle_ms: default_short_settle_ms(),
            restore_delay_ms: default_short_settle_ms(),
            wheel_image: default_wheel_image(),
            poetry_image: default_poetry_image(),
            wheel_return_item: default_wheel_return_item(),
            poetry_return_item: default_poetry_return_item(),
            backdrop_opacity: default_backdrop_opacity(),
            wheel: WheelSettings::default(),
        }
    }
}

fn default_rotation_ms() -> u64 {
    700
}

fn default_wheel_settle_ms() -> u64 {
    500
}

fn default_short_settle_ms() -> u64 {
    100
}

fn default_wheel_image() -> String {
    "pageimages/image1.PNG".to_string()
}

fn default_poetry_image() -> String {
    "pageimages/poemimage.png".to_string()
}

fn default_wheel_return_item() -> ItemId {
    ItemId::from("2")
}

fn default_poetry_return_item() -> ItemId {
    ItemId::from("3")
}

fn default_backdrop_opacity() -> f64 {
    0.3
}

/// Wheel physics tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelSettings {
    /// Degrees of target change per unit of wheel delta.
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f64,
    /// Velocity recorded per unit of wheel delta.
    #[serde(default = "default_wheel_velocity_scale")]
    pub wheel_velocity_scale: f64,
    /// Degrees of target change per pixel of horizontal drag.
    #[serde(default = "default_touch_gain")]
    pub touch_gain: f64,
    /// Frame length used to normalise touch velocity.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    /// Fraction of the remaining distance covered per frame.
    #[serde(default = "default_smooth_factor")]
    pub smooth_factor: f64,
    /// Smoothing goes idle once `|target - current|` is at or below this.
    #[serde(default = "default_threshold")]
    pub settle_epsilon: f64,
    /// Velocity multiplier applied each inertia frame.
    #[serde(default = "default_inertia_damping")]
    pub inertia_damping: f64,
    /// Inertia stops once `|velocity|` is at or below this.
    #[serde(default = "default_threshold")]
    pub inertia_threshold: f64,
    /// Quiet period after the last wheel event that ends the interaction.
    #[serde(default = "default_wheel_idle_ms")]
    pub wheel_idle_ms: u64,
}

impl Default for WheelSettings {
    fn default() -> Self {
        WheelSettings {
            rotation_speed: default_rotation_speed(),
            wheel_velocity_scale: default_wheel_velocity_scale(),
            touch_gain: default_touch_gain(),
            frame_ms: default_frame_ms(),
            smooth_factor: default_smooth_factor(),
            settle_epsilon: default_threshold(),
            inertia_damping: default_inertia_damping(),
            inertia_threshold: default_threshold(),
            wheel_idle_ms: default_wheel_idle_ms(),
        }
    }
}

fn default_rotation_speed() -> f64 {
    0.15
}

fn default_wheel_velocity_scale() -> f64 {
    0.3
}

fn default_touch_gain() -> f64 {
    0.5
}

fn default_frame_ms() -> f64 {
    16.0
}

fn default_smooth_factor() -> f64 {
    0.1
}

fn default_threshold() -> f64 {
    0.1
}

fn default_inertia_damping() -> f64 {
    0.95
}

fn default_wheel_idle_ms() -> u64 {
    150
}

// =============================================================================
// Intro page configuration
// =============================================================================

/// Intro page configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IntroConfig {
    #[serde(default)]
    pub parallax: ParallaxSettings,
    #[serde(default)]
    pub fade: FadeSettings,
    #[serde(default)]
    pub timing: IntroTiming,
    #[serde(default)]
    pub gate: GateSettings,
}

/// Background parallax speeds (pixels of offset per pixel scrolled).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxSettings {
    #[serde(default = "default_speed_desktop")]
    pub speed_desktop: f64,
    #[serde(default = "default_speed_mobile")]
    pub speed_mobile: f64,
    /// Viewports at or below this width use the mobile layout.
    #[serde(default = "default_breakpoint")]
    pub breakpoint: f64,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        ParallaxSettings {
            speed_desktop: default_speed_desktop(),
            speed_mobile: default_speed_mobile(),
            breakpoint: default_breakpoint(),
        }
    }
}

fn default_speed_desktop() -> f64 {
    -0.4
}

fn default_speed_mobile() -> f64 {
    -0.55
}

fn default_breakpoint() -> f64 {
    768.0
}

/// Hero fade range and cluebox reveal points, as fractions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FadeSettings {
    /// Fraction of hero height where the fade starts.
    #[serde(default = "default_hero_start")]
    pub hero_start: f64,
    /// Fraction of hero height where the hero is fully transparent.
    #[serde(default = "default_hero_end")]
    pub hero_end: f64,
    /// Fraction of viewport height above the cluebox at which it appears.
    #[serde(default = "default_cluebox_trigger_desktop")]
    pub cluebox_trigger_desktop: f64,
    #[serde(default = "default_cluebox_trigger_mobile")]
    pub cluebox_trigger_mobile: f64,
}

impl Default for FadeSettings {
    fn default() -> Self {
        FadeSettings {
            hero_start: default_hero_start(),
            hero_end: default_hero_end(),
            cluebox_trigger_desktop: default_cluebox_trigger_desktop(),
            cluebox_trigger_mobile: default_cluebox_trigger_mobile(),
        }
    }
}

fn default_hero_start() -> f64 {
    0.2
}

fn default_hero_end() -> f64 {
    0.7
}

fn default_cluebox_trigger_desktop() -> f64 {
    0.5
}

fn default_cluebox_trigger_mobile() -> f64 {
    0.6
}

/// Intro page delays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroTiming {
    /// Between the success message and the redirect.
    #[serde(default = "default_message_delay_ms")]
    pub message_delay_ms: u64,
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    /// Before scrolling to the riddle on a `#riddle` link.
    #[serde(default = "default_riddle_scroll_delay_ms")]
    pub riddle_scroll_delay_ms: u64,
}

impl Default for IntroTiming {
    fn default() -> Self {
        IntroTiming {
            message_delay_ms: default_message_delay_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
            riddle_scroll_delay_ms: default_riddle_scroll_delay_ms(),
        }
    }
}

fn default_message_delay_ms() -> u64 {
    1500
}

fn default_resize_debounce_ms() -> u64 {
    250
}

fn default_riddle_scroll_delay_ms() -> u64 {
    500
}

/// Text and colour shown for one gate outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateMessage {
    pub text: String,
    pub color: String,
}

impl GateMessage {
    fn new(text: &str, color: &str) -> Self {
        GateMessage {
            text: text.to_string(),
            color: color.to_string(),
        }
    }
}

/// The name gate in front of the carousel page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSettings {
    #[serde(default = "default_secret")]
    pub secret: String,
    #[serde(default = "default_next_page")]
    pub next_page: String,
    #[serde(default = "default_correct_message")]
    pub correct: GateMessage,
    #[serde(default = "default_empty_message")]
    pub empty: GateMessage,
    #[serde(default = "default_incorrect_message")]
    pub incorrect: GateMessage,
}

impl Default for GateSettings {
    fn default() -> Self {
        GateSettings {
            secret: default_secret(),
            next_page: default_next_page(),
            correct: default_correct_message(),
            empty: default_empty_message(),
            incorrect: default_incorrect_message(),
        }
    }
}

fn default_secret() -> String {
    "Valhalla Meridius".to_string()
}

fn default_next_page() -> String {
    "carouselpage.html".to_string()
}

fn default_correct_message() -> GateMessage {
    GateMessage::new("That is the name!!", "#7dd3c0")
}

fn default_empty_message() -> GateMessage {
    GateMessage::new("Where is the name?", "#bababaff")
}

fn default_incorrect_message() -> GateMessage {
    GateMessage::new("That is not the name...", "#ff6b6b")
}

/// Inner window size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

/// Layout measurements the scroll pipeline reads each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScrollMetrics {
    /// `window.pageYOffset`
    pub scroll_y: f64,
    /// `.hero-section` offsetHeight
    #[serde(default)]
    pub hero_height: f64,
    /// `.cluebox-container` offsetTop
    #[serde(default)]
    pub cluebox_offset_top: f64,
    /// `window.devicePixelRatio`
    #[serde(default = "default_pixel_ratio")]
    pub device_pixel_ratio: f64,
}

fn default_pixel_ratio() -> f64 {
    1.0
}

/// Page-load snapshot for the intro page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroStart {
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub hostname: String,
    pub viewport: ViewportSize,
    #[serde(default)]
    pub metrics: ScrollMetrics,
}

// =============================================================================
// Events and results crossing the JS boundary
// =============================================================================

/// Input forwarded by the carousel page plumbing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CarouselEvent {
    /// `#next` clicked.
    Next,
    /// `#prev` clicked.
    Prev,
    /// A `.seeMore` button clicked.
    SeeMore,
    /// `#back` clicked (detail → carousel).
    Back,
    /// The `.continue-btn` at `index` (document order) clicked.
    Continue { index: usize },
    /// The `.back-btn` at `index` (document order) clicked.
    Return { index: usize },
    /// `wheel` on the banner.
    Wheel {
        #[serde(default)]
        delta_x: f64,
        #[serde(default)]
        delta_y: f64,
    },
    /// `touchstart` on the banner, first touch point.
    TouchStart { x: f64, y: f64 },
    /// `touchmove` on the banner, first touch point.
    TouchMove { x: f64, y: f64 },
    /// `touchend` on the banner.
    TouchEnd,
    /// `visibilitychange` on the document.
    Visibility { hidden: bool },
}

/// Input forwarded by the intro page plumbing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IntroEvent {
    /// `scroll` on the window.
    Scroll,
    /// `resize` or `orientationchange` on the window.
    Resize { width: f64, height: f64 },
    /// `touchstart` on the document.
    TouchStart { y: f64 },
    /// `touchmove` on the document, with the scroll position and
    /// `documentElement.scrollHeight` at that moment.
    TouchMove {
        y: f64,
        scroll_y: f64,
        scroll_height: f64,
    },
    /// Submit button clicked with the current input value.
    Submit { value: String },
    /// `keypress` in the input.
    KeyPress { key: String, value: String },
    /// `beforeunload`
    Unload,
}

/// Result of one call into an engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Update {
    pub ops: Vec<DomOp>,
    /// The plumbing should call `preventDefault()` on the native event.
    pub prevent_default: bool,
    /// A frame loop is pending: request another animation frame.
    pub wants_frame: bool,
    /// When the next timer is due, in the caller's clock.
    pub next_timer_ms: Option<f64>,
}
