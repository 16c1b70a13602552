// DOM operations: the only way the engine touches the page.
// JS applies them in order; ops aimed at elements the page lacks are dropped here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Fixed element roles of the two pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRole {
    // Carousel page.
    /// `.carousel`
    Carousel,
    /// `.carousel .list`
    List,
    /// `#next`
    NextButton,
    /// `#prev`
    PrevButton,
    /// `#back`
    BackButton,
    /// `.blur-background`
    BlurBackground,
    /// `.blur-background-alt`
    BlurBackgroundAlt,
    /// `.banner`
    Banner,
    /// `.banner .slider`
    Slider,
    /// `.poetryscrollpage .fixed-background`
    FixedBackground,

    // Intro page.
    /// `.background-image`
    Parallax,
    /// `.hero-section`
    Hero,
    /// `.cluebox-container`
    ClueboxContainer,
    /// `.cluebox`
    Cluebox,
    /// `#passwordInput`
    PasswordInput,
    /// `#submitBtn`
    SubmitButton,
    /// `#message`
    Message,
}

impl ElementRole {
    /// Selector the plumbing resolves this role with.
    pub fn selector(self) -> &'static str {
        match self {
            ElementRole::Carousel => ".carousel",
            ElementRole::List => ".carousel .list",
            ElementRole::NextButton => "#next",
            ElementRole::PrevButton => "#prev",
            ElementRole::BackButton => "#back",
            ElementRole::BlurBackground => ".blur-background",
            ElementRole::BlurBackgroundAlt => ".blur-background-alt",
            ElementRole::Banner => ".banner",
            ElementRole::Slider => ".banner .slider",
            ElementRole::FixedBackground => ".poetryscrollpage .fixed-background",
            ElementRole::Parallax => ".background-image",
            ElementRole::Hero => ".hero-section",
            ElementRole::ClueboxContainer => ".cluebox-container",
            ElementRole::Cluebox => ".cluebox",
            ElementRole::PasswordInput => "#passwordInput",
            ElementRole::SubmitButton => "#submitBtn",
            ElementRole::Message => "#message",
        }
    }
}

/// A single DOM mutation for the plumbing to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum DomOp {
    AddClass { target: ElementRole, class: String },
    RemoveClass { target: ElementRole, class: String },
    SetStyle {
        target: ElementRole,
        property: String,
        value: String,
    },
    SetText { target: ElementRole, text: String },
    SetDisabled { target: ElementRole, disabled: bool },
    ScrollIntoView { target: ElementRole },
    /// Append the list's first item to its end.
    MoveHeadToTail,
    /// Prepend the list's last item to its start.
    MoveTailToHead,
    /// Bind wheel/touchstart/touchmove/touchend on the banner.
    BindWheelListeners,
    /// Remove exactly the handlers bound by the last `BindWheelListeners`.
    UnbindWheelListeners,
    /// Write `window.location.hash`.
    SetHash { fragment: String },
    /// Assign `window.location.href`.
    Navigate { url: String },
    /// Append a `<link rel="prefetch">`.
    Prefetch { url: String },
}

impl DomOp {
    /// Element the op needs, `None` for window/document level ops.
    pub fn target(&self) -> Option<ElementRole> {
        match self {
            DomOp::AddClass { target, .. }
            | DomOp::RemoveClass { target, .. }
            | DomOp::SetStyle { target, .. }
            | DomOp::SetText { target, .. }
            | DomOp::SetDisabled { target, .. }
            | DomOp::ScrollIntoView { target } => Some(*target),
            DomOp::MoveHeadToTail | DomOp::MoveTailToHead => Some(ElementRole::List),
            DomOp::BindWheelListeners | DomOp::UnbindWheelListeners => Some(ElementRole::Banner),
            DomOp::SetHash { .. } | DomOp::Navigate { .. } | DomOp::Prefetch { .. } => None,
        }
    }
}

/// Effect sink shared by the engine components during one call.
#[derive(Debug, Default)]
pub struct Effects {
    present: HashSet<ElementRole>,
    ops: Vec<DomOp>,
}

impl Effects {
    pub fn new(present: impl IntoIterator<Item = ElementRole>) -> Self {
        Effects {
            present: present.into_iter().collect(),
            ops: Vec::new(),
        }
    }

    pub fn has(&self, role: ElementRole) -> bool {
        self.present.contains(&role)
    }

    /// Queue an op. Returns false (and drops it) when its element is absent.
    pub fn push(&mut self, op: DomOp) -> bool {
        match op.target() {
            Some(role) if !self.has(role) => {
                log::trace!("dropping {:?}: {} not on page", op, role.selector());
                false
            }
            _ => {
                self.ops.push(op);
                true
            }
        }
    }

    pub fn add_class(&mut self, target: ElementRole, class: &str) {
        self.push(DomOp::AddClass {
            target,
            class: class.to_string(),
        });
    }

    pub fn remove_class(&mut self, target: ElementRole, class: &str) {
        self.push(DomOp::RemoveClass {
            target,
            class: class.to_string(),
        });
    }

    pub fn set_style(&mut self, target: ElementRole, property: &str, value: impl Into<String>) {
        self.push(DomOp::SetStyle {
            target,
            property: property.to_string(),
            value: value.into(),
        });
    }

    pub fn ops(&self) -> &[DomOp] {
        &self.ops
    }

    /// Hand the queued ops to the caller.
    pub fn drain(&mut self) -> Vec<DomOp> {
        std::mem::take(&mut self.ops)
    }
}

/// Format a number the way JS string conversion does for the values we write
/// (no trailing `.0`, no negative zero).
pub fn css_number(value: f64) -> String {
    format!("{}", value + 0.0)
}
