// Carousel page state machine: carousel / detail / wheel / poetry views,
// ring rotation, backdrop crossfades and fragment deep links.
//
// Every entry point takes the caller's clock and returns the DOM ops to apply.
// Settle delays are timers on the internal scheduler, fired from `tick`;
// wheel loops step only from `frame`.

use crate::crossfade::Crossfader;
use crate::effects::{DomOp, Effects, ElementRole};
use crate::error::EngineError;
use crate::fragment::Fragment;
use crate::ring::CarouselRing;
use crate::rotator::Rotator;
use crate::scheduler::{Scheduler, TimerId};
use crate::types::*;
use crate::wheel::WheelPhysics;

/// Deferred work of the carousel page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CarouselTimer {
    /// Rotation transition finished: unlock, crossfade, record.
    RotationSettled,
    /// Wheel view settled: reset rotation and bind gesture listeners.
    AttachWheel,
    /// Poetry view settled: show its fixed background.
    RevealPoetryBackground,
    EnterDetail,
    /// Replay of a scene entry restored from the fragment.
    EnterScene(Scene),
    /// No wheel input for a while.
    WheelIdle,
}

/// Top-level controller of the carousel page.
#[derive(Debug)]
pub struct ViewController {
    config: CarouselConfig,
    view: ViewState,
    ring: CarouselRing,
    rotator: Rotator,
    wheel: WheelPhysics,
    crossfader: Crossfader,
    effects: Effects,
    timers: Scheduler<CarouselTimer>,
    scene_timer: Option<TimerId>,
    wheel_idle: Option<TimerId>,
    continue_targets: Vec<Option<Scene>>,
    back_sources: Vec<Option<Scene>>,
    now: Timestamp,
    prevent_default: bool,
    restored: bool,
}

impl ViewController {
    pub fn new(config: CarouselConfig, layout: PageLayout) -> Result<Self, EngineError> {
        let mut seen = std::collections::HashSet::new();
        for item in &layout.items {
            if !seen.insert(item.id.clone()) {
                return Err(EngineError::InvalidLayout(format!(
                    "duplicate data-item {:?}",
                    item.id.as_str()
                )));
            }
        }

        let continue_targets = parse_discriminators(&layout.continue_targets, "data-target");
        let back_sources = parse_discriminators(&layout.back_sources, "data-from");

        Ok(ViewController {
            view: ViewState::Carousel,
            ring: CarouselRing::new(layout.items),
            rotator: Rotator::new(),
            wheel: WheelPhysics::new(config.wheel.clone()),
            crossfader: Crossfader::new(config.backdrop_opacity),
            effects: Effects::new(layout.elements),
            timers: Scheduler::new(),
            scene_timer: None,
            wheel_idle: None,
            continue_targets,
            back_sources,
            now: Timestamp::default(),
            prevent_default: false,
            restored: false,
            config,
        })
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn ring(&self) -> &CarouselRing {
        &self.ring
    }

    pub fn wheel(&self) -> &WheelPhysics {
        &self.wheel
    }

    pub fn is_rotating(&self) -> bool {
        self.rotator.is_locked()
    }

    /// Fragment describing the current view and center item.
    pub fn fragment(&self) -> Fragment {
        let center = self
            .ring
            .center_id()
            .cloned()
            .unwrap_or_else(|| ItemId::from("1"));
        Fragment::for_view(self.view, center)
    }

    /// Page load: restore from the fragment, then show the center backdrop.
    pub fn start(&mut self, hash: &str, now: Timestamp) -> Update {
        self.advance(now);
        self.restore_from_hash(hash);
        self.crossfade_center();
        self.finish()
    }

    /// Handle one input event.
    pub fn dispatch(&mut self, event: CarouselEvent, now: Timestamp) -> Update {
        self.advance(now);
        match event {
            CarouselEvent::Next => self.rotate(Direction::Next),
            CarouselEvent::Prev => self.rotate(Direction::Prev),
            CarouselEvent::SeeMore => self.show_detail(),
            CarouselEvent::Back => self.hide_detail(),
            CarouselEvent::Continue { index } => {
                match self.continue_targets.get(index).copied().flatten() {
                    Some(scene) => self.show_scene(scene),
                    None => log::debug!("continue button {} has no target", index),
                }
            }
            CarouselEvent::Return { index } => match self.back_sources.get(index).copied().flatten() {
                Some(scene) => self.return_from(scene),
                None => log::debug!("back button {} has no source", index),
            },
            CarouselEvent::Wheel { delta_x, delta_y } => {
                if self.wheel_view_active() && self.wheel.on_wheel(delta_x, delta_y, &mut self.effects) {
                    self.prevent_default = true;
                    let idle_ms = self.config.wheel.wheel_idle_ms;
                    self.timers
                        .reschedule(&mut self.wheel_idle, now, idle_ms, CarouselTimer::WheelIdle);
                }
            }
            CarouselEvent::TouchStart { x, .. } => {
                if self.wheel_view_active() {
                    self.wheel.on_touch_start(x, now);
                }
            }
            CarouselEvent::TouchMove { x, .. } => {
                if self.wheel_view_active() {
                    self.prevent_default = self.wheel.on_touch_move(x, now, &mut self.effects);
                }
            }
            CarouselEvent::TouchEnd => {
                if self.wheel_view_active() {
                    self.wheel.on_touch_end(&mut self.effects);
                }
            }
            CarouselEvent::Visibility { hidden } => {
                if hidden {
                    self.effects.remove_class(ElementRole::Slider, "auto-rotate");
                }
            }
        }
        self.finish()
    }

    /// Timer tick: fire every timer due at `now`. Animation loops are left alone.
    pub fn tick(&mut self, now: Timestamp) -> Update {
        self.advance(now);
        self.fire_due(now);
        self.finish()
    }

    /// Animation frame: fire due timers, then step each wheel loop once.
    pub fn frame(&mut self, now: Timestamp) -> Update {
        self.advance(now);
        self.fire_due(now);
        if self.wheel.is_animating() {
            self.wheel.frame(&mut self.effects);
        }
        self.finish()
    }

    fn fire_due(&mut self, now: Timestamp) {
        while let Some((id, timer)) = self.timers.pop_due(now) {
            if self.scene_timer == Some(id) {
                self.scene_timer = None;
            }
            if self.wheel_idle == Some(id) {
                self.wheel_idle = None;
            }
            self.fire(timer);
        }
    }

    /// Animated single-step rotation, ignored while one is in flight.
    pub fn rotate(&mut self, direction: Direction) {
        if self
            .rotator
            .begin(direction, &mut self.ring, &mut self.effects)
        {
            let delay = self.config.rotation_ms;
            self.timers
                .schedule(self.now, delay, CarouselTimer::RotationSettled);
        }
    }

    /// Instantly center `id` (restore and scene exits only).
    pub fn navigate_to_item(&mut self, id: &ItemId) {
        if !self.ring.navigate_to(id, &mut self.effects) {
            log::debug!("item {} not in carousel", id);
        }
        self.crossfade_center();
    }

    pub fn show_detail(&mut self) {
        self.cancel_scene_timer();
        self.view = ViewState::Detail;
        self.effects.remove_class(ElementRole::Carousel, "next");
        self.effects.remove_class(ElementRole::Carousel, "prev");
        self.effects.add_class(ElementRole::Carousel, "showDetail");
        self.update_hash();
    }

    pub fn hide_detail(&mut self) {
        self.cancel_scene_timer();
        self.view = ViewState::Carousel;
        self.effects.remove_class(ElementRole::Carousel, "showDetail");
        self.update_hash();
    }

    /// Enter the wheel or poetry view.
    pub fn show_scene(&mut self, scene: Scene) {
        log::debug!("entering {:?} view", scene);
        self.view = scene.view();
        self.effects.remove_class(ElementRole::Carousel, "showDetail");
        self.effects.add_class(ElementRole::Carousel, scene.class());
        let image = match scene {
            Scene::Wheel => self.config.wheel_image.clone(),
            Scene::Poetry => self.config.poetry_image.clone(),
        };
        self.crossfader.crossfade(&image, &mut self.effects);
        self.update_hash();

        let (delay, timer) = match scene {
            Scene::Wheel => (self.config.wheel_settle_ms, CarouselTimer::AttachWheel),
            Scene::Poetry => (
                self.config.short_settle_ms,
                CarouselTimer::RevealPoetryBackground,
            ),
        };
        self.schedule_scene(delay, timer);
    }

    /// Leave the wheel or poetry view for the detail view of its item.
    pub fn return_from(&mut self, scene: Scene) {
        log::debug!("leaving {:?} view", scene);
        self.effects.remove_class(ElementRole::Carousel, scene.class());
        self.cancel_scene_timer();
        let item = match scene {
            Scene::Wheel => {
                self.wheel.detach(&mut self.effects);
                if let Some(idle) = self.wheel_idle.take() {
                    self.timers.cancel(idle);
                }
                self.config.wheel_return_item.clone()
            }
            Scene::Poetry => self.config.poetry_return_item.clone(),
        };
        self.navigate_to_item(&item);
        let delay = self.config.short_settle_ms;
        self.schedule_scene(delay, CarouselTimer::EnterDetail);
    }

    /// Re-derive the page state from `location.hash`. Only the first call
    /// has any effect; unrecognised fragments leave the default state.
    pub fn restore_from_hash(&mut self, hash: &str) {
        if self.restored {
            return;
        }
        self.restored = true;

        let Some(fragment) = Fragment::parse(hash) else {
            if !hash.is_empty() {
                log::debug!("ignoring fragment {:?}", hash);
            }
            return;
        };
        log::debug!("restoring {}", fragment);

        let delay = self.config.restore_delay_ms;
        match fragment {
            Fragment::Carousel(id) => self.navigate_to_item(&id),
            Fragment::Detail(id) => {
                self.navigate_to_item(&id);
                self.schedule_scene(delay, CarouselTimer::EnterDetail);
            }
            Fragment::Wheel => {
                let item = self.config.wheel_return_item.clone();
                self.navigate_to_item(&item);
                self.schedule_scene(delay, CarouselTimer::EnterScene(Scene::Wheel));
            }
            Fragment::Poetry => {
                let item = self.config.poetry_return_item.clone();
                self.navigate_to_item(&item);
                self.schedule_scene(delay, CarouselTimer::EnterScene(Scene::Poetry));
            }
        }
    }

    fn fire(&mut self, timer: CarouselTimer) {
        match timer {
            CarouselTimer::RotationSettled => {
                self.rotator.finish(&mut self.effects);
                self.crossfade_center();
                self.update_hash();
            }
            CarouselTimer::AttachWheel => {
                if self.view == ViewState::Wheel {
                    self.wheel.reset(&mut self.effects);
                    self.wheel.attach(&mut self.effects);
                }
            }
            CarouselTimer::RevealPoetryBackground => {
                if self.view == ViewState::Poetry {
                    self.effects
                        .set_style(ElementRole::FixedBackground, "display", "block");
                }
            }
            CarouselTimer::EnterDetail => self.show_detail(),
            CarouselTimer::EnterScene(scene) => self.show_scene(scene),
            CarouselTimer::WheelIdle => self.wheel.end_wheel_interaction(),
        }
    }

    /// View transitions share one slot: scheduling one replaces any pending.
    fn schedule_scene(&mut self, delay_ms: u64, timer: CarouselTimer) {
        self.timers
            .reschedule(&mut self.scene_timer, self.now, delay_ms, timer);
    }

    fn cancel_scene_timer(&mut self) {
        if let Some(pending) = self.scene_timer.take() {
            self.timers.cancel(pending);
        }
    }

    fn wheel_view_active(&self) -> bool {
        self.view == ViewState::Wheel && self.wheel.is_attached()
    }

    fn crossfade_center(&mut self) {
        let src = self
            .ring
            .center()
            .and_then(|item| item.image_src.clone());
        if let Some(src) = src {
            self.crossfader.crossfade(&src, &mut self.effects);
        }
    }

    fn update_hash(&mut self) {
        let fragment = self.fragment().to_string();
        self.effects.push(DomOp::SetHash { fragment });
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
            wants_frame: self.wheel.is_animating(),
            next_timer_ms: self.timers.next_due().map(|due| due.as_millis()),
        }
    }
}

fn parse_discriminators(values: &[String], attribute: &str) -> Vec<Option<Scene>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let scene = Scene::parse(value);
            if scene.is_none() {
                log::warn!(
                    "button {} has unrecognised {}={:?}; it will do nothing",
                    index,
                    attribute,
                    value
                );
            }
            scene
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ELEMENTS: [ElementRole; 10] = [
        ElementRole::Carousel,
        ElementRole::List,
        ElementRole::NextButton,
        ElementRole::PrevButton,
        ElementRole::BackButton,
        ElementRole::BlurBackground,
        ElementRole::BlurBackgroundAlt,
        ElementRole::Banner,
        ElementRole::Slider,
        ElementRole::FixedBackground,
    ];

    fn layout() -> PageLayout {
        PageLayout {
            elements: ALL_ELEMENTS.to_vec(),
            items: (1..=5)
                .map(|n| ItemSpec {
                    id: ItemId::new(n.to_string()),
                    image_src: Some(format!("pageimages/item{}.png", n)),
                })
                .collect(),
            continue_targets: vec!["wheel".into(), "poetry".into(), "mystery".into()],
            back_sources: vec!["wheel".into(), "poetry".into()],
        }
    }

    fn controller() -> ViewController {
        ViewController::new(CarouselConfig::default(), layout()).unwrap()
    }

    fn ms(ms: f64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn hashes(update: &Update) -> Vec<String> {
        update
            .ops
            .iter()
            .filter_map(|op| match op {
                DomOp::SetHash { fragment } => Some(fragment.clone()),
                _ => None,
            })
            .collect()
    }

    fn moves(update: &Update) -> usize {
        update
            .ops
            .iter()
            .filter(|op| matches!(op, DomOp::MoveHeadToTail | DomOp::MoveTailToHead))
            .count()
    }

    fn has_op(update: &Update, op: &DomOp) -> bool {
        update.ops.contains(op)
    }

    #[test]
    fn rotation_settles_after_transition() {
        let mut ctl = controller();
        ctl.start("", ms(0.0));

        let update = ctl.dispatch(CarouselEvent::Next, ms(10.0));
        assert_eq!(moves(&update), 1);
        assert!(hashes(&update).is_empty());
        assert_eq!(update.next_timer_ms, Some(710.0));
        assert!(ctl.is_rotating());

        let early = ctl.tick(ms(700.0));
        assert!(early.ops.is_empty());

        let settled = ctl.tick(ms(710.0));
        assert!(!ctl.is_rotating());
        assert_eq!(hashes(&settled), vec!["carousel-3".to_string()]);
        assert!(has_op(
            &settled,
            &DomOp::SetStyle {
                target: ElementRole::NextButton,
                property: "pointer-events".into(),
                value: "auto".into()
            }
        ));
        assert!(settled.ops.iter().any(|op| matches!(
            op,
            DomOp::SetStyle { property, value, .. }
                if property == "background-image" && value == "url('pageimages/item3.png')"
        )));
    }

    #[test]
    fn rotations_during_transition_are_dropped() {
        let mut ctl = controller();
        ctl.dispatch(CarouselEvent::Prev, ms(0.0));
        for t in [50.0, 100.0, 300.0, 699.0] {
            let update = ctl.dispatch(CarouselEvent::Next, ms(t));
            assert_eq!(moves(&update), 0);
            assert!(update.ops.is_empty());
        }
        assert_eq!(ctl.timers.len(), 1);
        assert_eq!(ctl.ring().center_id(), Some(&ItemId::from("1")));

        ctl.tick(ms(700.0));
        let update = ctl.dispatch(CarouselEvent::Next, ms(701.0));
        assert_eq!(moves(&update), 1);
        assert_eq!(ctl.ring().center_id(), Some(&ItemId::from("2")));
    }

    #[test]
    fn detail_round_trip() {
        let mut ctl = controller();
        let update = ctl.dispatch(CarouselEvent::SeeMore, ms(0.0));
        assert_eq!(ctl.view(), ViewState::Detail);
        assert_eq!(hashes(&update), vec!["detail-2".to_string()]);
        assert!(has_op(
            &update,
            &DomOp::AddClass {
                target: ElementRole::Carousel,
                class: "showDetail".into()
            }
        ));

        let update = ctl.dispatch(CarouselEvent::Back, ms(10.0));
        assert_eq!(ctl.view(), ViewState::Carousel);
        assert_eq!(hashes(&update), vec!["carousel-2".to_string()]);
    }

    #[test]
    fn wheel_view_binds_listeners_after_settle() {
        let mut ctl = controller();
        ctl.dispatch(CarouselEvent::SeeMore, ms(0.0));
        let update = ctl.dispatch(CarouselEvent::Continue { index: 0 }, ms(100.0));
        assert_eq!(ctl.view(), ViewState::Wheel);
        assert_eq!(hashes(&update), vec!["wheel".to_string()]);
        assert!(update.ops.iter().any(|op| matches!(
            op,
            DomOp::SetStyle { value, .. } if value == "url('pageimages/image1.PNG')"
        )));
        assert!(!ctl.wheel().is_attached());

        // Input before the listeners exist is not ours to handle.
        let early = ctl.dispatch(CarouselEvent::Wheel { delta_x: 0.0, delta_y: 50.0 }, ms(200.0));
        assert!(!early.prevent_default);

        let settled = ctl.tick(ms(600.0));
        assert!(ctl.wheel().is_attached());
        assert!(has_op(&settled, &DomOp::BindWheelListeners));

        let spun = ctl.dispatch(CarouselEvent::Wheel { delta_x: 0.0, delta_y: 50.0 }, ms(610.0));
        assert!(spun.prevent_default);
        assert!(spun.wants_frame);
        assert!((ctl.wheel().rotation().target + 7.5).abs() < 1e-9);
    }

    #[test]
    fn wheel_goes_idle_after_quiet_period() {
        let mut ctl = controller();
        ctl.show_scene(Scene::Wheel);
        ctl.tick(ms(500.0));
        ctl.dispatch(CarouselEvent::Wheel { delta_x: 0.0, delta_y: 20.0 }, ms(510.0));

        let mut t = 510.0;
        let mut update = ctl.frame(ms(t));
        while update.wants_frame || update.next_timer_ms.is_some() {
            t += 16.0;
            update = ctl.frame(ms(t));
            assert!(t < 10_000.0, "wheel never settled");
        }
        assert!(!ctl.wheel().rotation().is_interacting);
        assert!((ctl.wheel().rotation().current + 3.0).abs() <= 0.1);
    }

    #[test]
    fn timer_ticks_do_not_step_the_wheel() {
        let mut ctl = controller();
        ctl.show_scene(Scene::Wheel);
        ctl.tick(ms(500.0));
        ctl.dispatch(CarouselEvent::Wheel { delta_x: 0.0, delta_y: 100.0 }, ms(600.0));
        let after_input = ctl.wheel().rotation().current;

        // Wheel idle timer, plus a repeated call at the same instant.
        ctl.tick(ms(750.0));
        ctl.tick(ms(750.0));
        assert_eq!(ctl.wheel().rotation().current, after_input);

        let frame = ctl.frame(ms(766.0));
        assert!(frame.wants_frame);
        let once = ctl.wheel().rotation().current;
        assert!(once < after_input);
        let expected = after_input + (ctl.wheel().rotation().target - after_input) * 0.1;
        assert!((once - expected).abs() < 1e-9);
    }

    #[test]
    fn back_from_wheel_detaches_and_recenters() {
        let mut ctl = controller();
        ctl.dispatch(CarouselEvent::Next, ms(0.0));
        ctl.tick(ms(700.0));
        ctl.dispatch(CarouselEvent::Continue { index: 0 }, ms(800.0));
        ctl.tick(ms(1300.0));
        ctl.dispatch(CarouselEvent::TouchStart { x: 0.0, y: 0.0 }, ms(1310.0));
        ctl.dispatch(CarouselEvent::TouchMove { x: 40.0, y: 0.0 }, ms(1326.0));

        let update = ctl.dispatch(CarouselEvent::Return { index: 0 }, ms(1400.0));
        assert!(has_op(&update, &DomOp::UnbindWheelListeners));
        assert!(has_op(
            &update,
            &DomOp::RemoveClass {
                target: ElementRole::Carousel,
                class: "showImage1wheel".into()
            }
        ));
        assert_eq!(moves(&update), 1);
        assert!(!update.wants_frame);
        assert_eq!(ctl.ring().center_id(), Some(&ItemId::from("2")));
        assert!(hashes(&update).is_empty());

        // Touch input after leaving is ignored.
        let stray = ctl.dispatch(CarouselEvent::TouchMove { x: 90.0, y: 0.0 }, ms(1450.0));
        assert!(!stray.prevent_default);

        let update = ctl.tick(ms(1500.0));
        assert_eq!(ctl.view(), ViewState::Detail);
        assert_eq!(hashes(&update), vec!["detail-2".to_string()]);
    }

    #[test]
    fn quick_exit_cancels_pending_wheel_attach() {
        let mut ctl = controller();
        ctl.dispatch(CarouselEvent::Continue { index: 0 }, ms(0.0));
        ctl.dispatch(CarouselEvent::Return { index: 0 }, ms(450.0));
        let update = ctl.tick(ms(600.0));
        assert!(!has_op(&update, &DomOp::BindWheelListeners));
        assert!(!ctl.wheel().is_attached());
        assert_eq!(ctl.view(), ViewState::Detail);
    }

    #[test]
    fn reentering_wheel_before_detail_settles_keeps_wheel() {
        let mut ctl = controller();
        ctl.dispatch(CarouselEvent::Continue { index: 0 }, ms(0.0));
        ctl.tick(ms(500.0));
        ctl.dispatch(CarouselEvent::Return { index: 0 }, ms(1000.0));
        ctl.dispatch(CarouselEvent::Continue { index: 0 }, ms(1050.0));

        let update = ctl.tick(ms(1100.0));
        assert_eq!(ctl.view(), ViewState::Wheel);
        assert!(hashes(&update).is_empty());
        assert!(!has_op(
            &update,
            &DomOp::AddClass {
                target: ElementRole::Carousel,
                class: "showDetail".into()
            }
        ));

        let settled = ctl.tick(ms(1550.0));
        assert!(has_op(&settled, &DomOp::BindWheelListeners));
        assert!(ctl.wheel().is_attached());
        let spun = ctl.dispatch(CarouselEvent::Wheel { delta_x: 0.0, delta_y: 40.0 }, ms(1600.0));
        assert!(spun.prevent_default);
    }

    #[test]
    fn user_navigation_overrides_pending_restore() {
        let mut ctl = controller();
        ctl.start("#detail-3", ms(0.0));
        ctl.dispatch(CarouselEvent::Continue { index: 1 }, ms(50.0));
        ctl.tick(ms(100.0));
        assert_eq!(ctl.view(), ViewState::Poetry);

        let mut ctl = controller();
        ctl.start("#wheel", ms(0.0));
        ctl.dispatch(CarouselEvent::SeeMore, ms(50.0));
        ctl.dispatch(CarouselEvent::Back, ms(60.0));
        let update = ctl.tick(ms(600.0));
        assert_eq!(ctl.view(), ViewState::Carousel);
        assert!(update.ops.is_empty());
        assert_eq!(ctl.timers.len(), 0);
    }

    #[test]
    fn poetry_reveals_background_and_returns_to_item_three() {
        let mut ctl = controller();
        let update = ctl.dispatch(CarouselEvent::Continue { index: 1 }, ms(0.0));
        assert_eq!(ctl.view(), ViewState::Poetry);
        assert_eq!(hashes(&update), vec!["poetry".to_string()]);

        let reveal = ctl.tick(ms(100.0));
        assert!(has_op(
            &reveal,
            &DomOp::SetStyle {
                target: ElementRole::FixedBackground,
                property: "display".into(),
                value: "block".into()
            }
        ));

        ctl.dispatch(CarouselEvent::Return { index: 1 }, ms(200.0));
        assert_eq!(ctl.ring().center_id(), Some(&ItemId::from("3")));
        let update = ctl.tick(ms(300.0));
        assert_eq!(hashes(&update), vec!["detail-3".to_string()]);
    }

    #[test]
    fn unknown_button_discriminators_do_nothing() {
        let mut ctl = controller();
        assert_eq!(ctl.continue_targets[2], None);
        let update = ctl.dispatch(CarouselEvent::Continue { index: 2 }, ms(0.0));
        assert!(update.ops.is_empty());
        let update = ctl.dispatch(CarouselEvent::Return { index: 9 }, ms(0.0));
        assert!(update.ops.is_empty());
        assert_eq!(ctl.view(), ViewState::Carousel);
    }

    #[test]
    fn hash_round_trips() {
        for hash in ["carousel-3", "detail-1", "wheel", "poetry"] {
            let mut ctl = controller();
            let mut written = hashes(&ctl.start(&format!("#{}", hash), ms(0.0)));
            written.extend(hashes(&ctl.tick(ms(100.0))));
            written.extend(hashes(&ctl.tick(ms(600.0))));

            assert_eq!(ctl.fragment().to_string(), hash);
            if let Some(last) = written.last() {
                assert_eq!(last, hash);
            }
        }
    }

    #[test]
    fn restore_centers_before_entering_view() {
        let mut ctl = controller();
        let update = ctl.start("#wheel", ms(0.0));
        assert_eq!(ctl.view(), ViewState::Carousel);
        assert_eq!(ctl.ring().center_id(), Some(&ItemId::from("2")));
        assert!(hashes(&update).is_empty());

        ctl.tick(ms(100.0));
        assert_eq!(ctl.view(), ViewState::Wheel);
        ctl.tick(ms(600.0));
        assert!(ctl.wheel().is_attached());
    }

    #[test]
    fn restore_happens_once_and_ignores_garbage() {
        let mut ctl = controller();
        ctl.start("#riddle", ms(0.0));
        assert_eq!(ctl.fragment().to_string(), "carousel-2");

        ctl.restore_from_hash("#carousel-4");
        assert_eq!(ctl.ring().center_id(), Some(&ItemId::from("2")));
    }

    #[test]
    fn missing_elements_degrade_to_noops() {
        let mut bare = layout();
        bare.elements = vec![ElementRole::Carousel];
        let mut ctl = ViewController::new(CarouselConfig::default(), bare).unwrap();

        let update = ctl.dispatch(CarouselEvent::Next, ms(0.0));
        assert!(update.ops.is_empty());
        assert!(!ctl.is_rotating());

        ctl.dispatch(CarouselEvent::Continue { index: 0 }, ms(0.0));
        let update = ctl.tick(ms(500.0));
        assert!(update.ops.is_empty());
        assert!(!ctl.wheel().is_attached());
    }

    #[test]
    fn hidden_page_stops_auto_rotation() {
        let mut ctl = controller();
        let update = ctl.dispatch(CarouselEvent::Visibility { hidden: true }, ms(0.0));
        assert_eq!(
            update.ops,
            vec![DomOp::RemoveClass {
                target: ElementRole::Slider,
                class: "auto-rotate".into()
            }]
        );
        assert!(ctl
            .dispatch(CarouselEvent::Visibility { hidden: false }, ms(0.0))
            .ops
            .is_empty());
    }

    #[test]
    fn duplicate_item_ids_are_rejected() {
        let mut dup = layout();
        dup.items[1].id = ItemId::from("1");
        assert!(matches!(
            ViewController::new(CarouselConfig::default(), dup),
            Err(EngineError::InvalidLayout(_))
        ));
    }
}
