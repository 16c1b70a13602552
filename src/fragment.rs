// URL fragment grammar for deep links into the carousel page:
//   carousel-<itemId> | detail-<itemId> | wheel | poetry

use std::fmt;

use crate::types::{ItemId, ViewState};

/// A recognised location fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Carousel(ItemId),
    Detail(ItemId),
    Wheel,
    Poetry,
}

impl Fragment {
    /// Parse `location.hash`, with or without the leading `#`.
    /// Anything outside the grammar yields `None`.
    pub fn parse(hash: &str) -> Option<Fragment> {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        match hash {
            "" => None,
            "wheel" => Some(Fragment::Wheel),
            "poetry" => Some(Fragment::Poetry),
            _ => {
                if let Some(rest) = hash.strip_prefix("carousel-") {
                    item_segment(rest).map(Fragment::Carousel)
                } else if let Some(rest) = hash.strip_prefix("detail-") {
                    item_segment(rest).map(Fragment::Detail)
                } else {
                    None
                }
            }
        }
    }

    /// Fragment describing `view` with `center` in the middle slot.
    pub fn for_view(view: ViewState, center: ItemId) -> Fragment {
        match view {
            ViewState::Carousel => Fragment::Carousel(center),
            ViewState::Detail => Fragment::Detail(center),
            ViewState::Wheel => Fragment::Wheel,
            ViewState::Poetry => Fragment::Poetry,
        }
    }
}

/// The id is the text up to the next `-`.
fn item_segment(rest: &str) -> Option<ItemId> {
    let id = rest.split('-').next().unwrap_or_default();
    if id.is_empty() {
        None
    } else {
        Some(ItemId::from(id))
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Carousel(id) => write!(f, "carousel-{}", id),
            Fragment::Detail(id) => write!(f, "detail-{}", id),
            Fragment::Wheel => f.write_str("wheel"),
            Fragment::Poetry => f.write_str("poetry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_each_form() {
        assert_eq!(
            Fragment::parse("#carousel-3"),
            Some(Fragment::Carousel(ItemId::from("3")))
        );
        assert_eq!(
            Fragment::parse("detail-1"),
            Some(Fragment::Detail(ItemId::from("1")))
        );
        assert_eq!(Fragment::parse("#wheel"), Some(Fragment::Wheel));
        assert_eq!(Fragment::parse("poetry"), Some(Fragment::Poetry));
    }

    #[test]
    fn ignores_unrecognised_fragments() {
        for hash in ["", "#", "#riddle", "carousel-", "detail", "wheel-2", "Poetry"] {
            assert_eq!(Fragment::parse(hash), None, "{:?}", hash);
        }
    }

    #[test]
    fn extra_segments_are_dropped() {
        assert_eq!(
            Fragment::parse("carousel-4-old"),
            Some(Fragment::Carousel(ItemId::from("4")))
        );
    }

    proptest! {
        #[test]
        fn item_fragments_round_trip(id in "[A-Za-z0-9_]{1,6}", detail in any::<bool>()) {
            let fragment = if detail {
                Fragment::Detail(ItemId::new(id))
            } else {
                Fragment::Carousel(ItemId::new(id))
            };
            prop_assert_eq!(Fragment::parse(&fragment.to_string()), Some(fragment));
        }
    }
}
