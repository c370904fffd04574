//! Viewport visibility observation.
//!
//! A vertical-only take on `IntersectionObserver`: a target is reported once
//! when it moves from not-visible to visible, where visible means it
//! intersects the (margin-adjusted) viewport with at least `threshold` of its
//! height.

use crate::dom::{Document, ElementId};
use crate::utils::error::{SiteError, SiteResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Margins applied to the viewport before intersecting, in px.
///
/// Positive values grow the viewport, negative values shrink it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    /// Parse CSS margin shorthand: one to four `px` (or unitless zero) values.
    pub fn parse(input: &str) -> SiteResult<Self> {
        let values = input
            .split_whitespace()
            .map(|part| parse_px(part).ok_or_else(|| margin_error(input, &format!("'{}' is not a px length", part))))
            .collect::<SiteResult<Vec<f64>>>()?;

        match values.as_slice() {
            [all] => Ok(Self::uniform(*all)),
            [vertical, horizontal] => Ok(Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(margin_error(input, "expected one to four values")),
        }
    }

    pub fn uniform(px: f64) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }
}

fn parse_px(part: &str) -> Option<f64> {
    let number = part.strip_suffix("px").unwrap_or(part);
    let value: f64 = number.parse().ok()?;
    // Only zero may omit the unit.
    if number.len() == part.len() && value != 0.0 {
        return None;
    }
    value.is_finite().then_some(value)
}

fn margin_error(input: &str, message: &str) -> SiteError {
    SiteError::RootMargin {
        input: input.to_string(),
        message: message.to_string(),
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

impl std::str::FromStr for RootMargin {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RootMargin::parse(s)
    }
}

impl Serialize for RootMargin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RootMargin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RootMargin::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Observer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl ObserverOptions {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            root_margin: RootMargin::default(),
        }
    }

    pub fn with_root_margin(mut self, root_margin: RootMargin) -> Self {
        self.root_margin = root_margin;
        self
    }
}

/// Fraction of the element's height inside the margin-adjusted viewport.
///
/// Zero-height elements count as fully visible while their edge sits inside
/// the viewport.
pub fn intersection_ratio(doc: &dyn Document, element: ElementId, margin: &RootMargin) -> f64 {
    let scroll = doc.scroll_y();
    let root_top = scroll - margin.top;
    let root_bottom = scroll + doc.viewport_height() + margin.bottom;

    let top = doc.offset_top(element);
    let height = doc.offset_height(element);
    let bottom = top + height;

    if root_bottom < root_top || bottom < root_top || top > root_bottom {
        return 0.0;
    }
    if height <= 0.0 {
        return 1.0;
    }

    let overlap = bottom.min(root_bottom) - top.max(root_top);
    (overlap / height).clamp(0.0, 1.0)
}

/// Whether `element` currently counts as visible under `options`.
pub fn is_visible(doc: &dyn Document, element: ElementId, options: &ObserverOptions) -> bool {
    let ratio = intersection_ratio(doc, element, &options.root_margin);
    ratio > 0.0 && ratio >= options.threshold
}

#[derive(Debug, Clone, Copy)]
struct Target {
    element: ElementId,
    visible: bool,
}

/// Tracks a set of elements and reports when they become visible.
#[derive(Debug)]
pub struct VisibilityObserver {
    options: ObserverOptions,
    targets: Vec<Target>,
}

impl VisibilityObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    pub fn observe(&mut self, element: ElementId) {
        if !self.is_observing(element) {
            self.targets.push(Target {
                element,
                visible: false,
            });
        }
    }

    pub fn unobserve(&mut self, element: ElementId) {
        self.targets.retain(|t| t.element != element);
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.targets.iter().any(|t| t.element == element)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Re-evaluates every target and returns the ones that just became
    /// visible, in observation order.
    pub fn take_records(&mut self, doc: &dyn Document) -> Vec<ElementId> {
        let options = self.options;
        let mut entered = Vec::new();
        for target in &mut self.targets {
            let visible = is_visible(doc, target.element, &options);
            if visible && !target.visible {
                entered.push(target.element);
            }
            target.visible = visible;
        }
        entered
    }
}

/// Explicit run-once flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnceGuard {
    fired: bool,
}

impl OnceGuard {
    /// Returns true exactly once.
    pub fn try_fire(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, Page};
    use assert_matches::assert_matches;

    fn page_with_box(top: f64, height: f64) -> (Page, ElementId) {
        let page = Page::from_elements(
            800.0,
            vec![
                ElementSpec::new("div").class("box").layout(top, height),
                ElementSpec::new("footer").layout(4000.0, 200.0),
            ],
        );
        let element = page.query_selector(".box").unwrap();
        (page, element)
    }

    #[test]
    fn test_root_margin_shorthand() {
        let margin = RootMargin::parse("0px 0px -100px 0px").unwrap();
        assert_eq!(margin.bottom, -100.0);
        assert_eq!(margin.top, 0.0);

        let margin = RootMargin::parse("10px 20px").unwrap();
        assert_eq!((margin.top, margin.right, margin.bottom, margin.left), (10.0, 20.0, 10.0, 20.0));

        assert_eq!(RootMargin::parse("0").unwrap(), RootMargin::default());
        assert_matches!(RootMargin::parse("10"), Err(SiteError::RootMargin { .. }));
        assert_matches!(RootMargin::parse("1px 2px 3px 4px 5px"), Err(SiteError::RootMargin { .. }));
        assert_matches!(RootMargin::parse(""), Err(SiteError::RootMargin { .. }));
        assert_matches!(RootMargin::parse("10em"), Err(SiteError::RootMargin { .. }));
    }

    #[test]
    fn test_root_margin_display_parses_back() {
        let margin = RootMargin::parse("0px 0px -100px 0px").unwrap();
        assert_eq!(margin.to_string().parse::<RootMargin>().unwrap(), margin);
    }

    #[test]
    fn test_intersection_ratio() {
        let (page, element) = page_with_box(700.0, 200.0);
        let none = RootMargin::default();
        assert_eq!(intersection_ratio(&page, element, &none), 0.5);

        let shrunk = RootMargin::parse("0px 0px -100px 0px").unwrap();
        assert_eq!(intersection_ratio(&page, element, &shrunk), 0.0);

        page.set_scroll_y(300.0);
        assert_eq!(intersection_ratio(&page, element, &shrunk), 1.0);

        page.set_scroll_y(850.0);
        assert_eq!(intersection_ratio(&page, element, &none), 0.25);
    }

    #[test]
    fn test_zero_height_element() {
        let (page, element) = page_with_box(400.0, 0.0);
        assert_eq!(intersection_ratio(&page, element, &RootMargin::default()), 1.0);
        page.set_scroll_y(500.0);
        assert_eq!(intersection_ratio(&page, element, &RootMargin::default()), 0.0);
    }

    #[test]
    fn test_threshold_gates_visibility() {
        let (page, element) = page_with_box(700.0, 200.0);
        assert!(is_visible(&page, element, &ObserverOptions::new(0.5)));
        assert!(!is_visible(&page, element, &ObserverOptions::new(0.6)));
    }

    #[test]
    fn test_reports_each_entry_transition() {
        let (page, element) = page_with_box(1200.0, 200.0);
        let mut observer = VisibilityObserver::new(ObserverOptions::new(0.5));
        observer.observe(element);
        observer.observe(element);
        assert_eq!(observer.len(), 1);

        assert!(observer.take_records(&page).is_empty());

        page.set_scroll_y(600.0);
        assert_eq!(observer.take_records(&page), vec![element]);
        // Still visible: no new record.
        assert!(observer.take_records(&page).is_empty());

        page.set_scroll_y(0.0);
        assert!(observer.take_records(&page).is_empty());
        page.set_scroll_y(600.0);
        assert_eq!(observer.take_records(&page), vec![element]);

        observer.unobserve(element);
        assert!(observer.is_empty());
    }

    #[test]
    fn test_once_guard() {
        let mut guard = OnceGuard::default();
        assert!(!guard.has_fired());
        assert!(guard.try_fire());
        assert!(!guard.try_fire());
        assert!(guard.has_fired());
    }
}
