//! The Benji's Deli homepage as an in-memory page.
//!
//! Element ids and classes match the live site markup so every behavior
//! mounts against it. Layout is a fixed single-column desktop layout.

use crate::dom::{Document, ElementId, ElementSpec, Page};
use crate::utils::error::SiteResult;
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

/// Section anchors in nav order
pub const SECTIONS: [(&str, &str); 4] = [
    ("menu", "The Classics"),
    ("story", "Our Story"),
    ("catering", "Catering"),
    ("visit", "Visit Us"),
];

const CLASSICS: [(&str, usize); 8] = [
    ("Corned Beef on Rye", 5),
    ("Reuben", 5),
    ("Pastrami Melt", 4),
    ("Matzo Ball Soup", 3),
    ("Chopped Liver", 2),
    ("Brisket Platter", 4),
    ("Potato Latkes", 3),
    ("Black & White Cookie", 1),
];

const STATS: [(&str, &str); 4] = [
    ("1963", "Established"),
    ("63", "Years on Center Street"),
    ("12000", "Sandwiches a month"),
    ("3", "Generations"),
];

const CARD_HEIGHT: f64 = 420.0;
const CARDS_PER_ROW: usize = 4;

/// The storefront page plus quick access to the elements a visitor pokes at.
pub struct Storefront {
    page: Arc<Page>,
}

impl Storefront {
    pub fn new(viewport_height: f64) -> Self {
        let page = Page::from_elements(viewport_height, storefront_elements());
        Self { page: Arc::new(page) }
    }

    pub fn page(&self) -> &Arc<Page> {
        &self.page
    }

    pub fn document(&self) -> Arc<dyn Document> {
        self.page.clone()
    }

    pub fn menu_button(&self) -> Option<ElementId> {
        self.page.query_selector(".mobile-menu-btn")
    }

    /// Desktop nav links, in [`SECTIONS`] order
    pub fn nav_links(&self) -> Vec<ElementId> {
        self.page.query_selector_all(".nav-links a")
    }

    pub fn pickle_ratings(&self) -> Vec<ElementId> {
        self.page.query_selector_all(".pickle-rating")
    }

    /// Current visible state of everything the behaviors touch.
    pub fn snapshot(&self) -> StorefrontSnapshot {
        let page = &self.page;
        let style = |css: &str, property: &str| {
            page.query_selector(css)
                .and_then(|element| page.style(element, property))
        };
        let text = |css: &str| {
            page.query_selector(css)
                .map(|element| page.text(element))
                .unwrap_or_default()
        };

        let fading = page.query_selector_all(".fade-in");
        let revealed = fading
            .iter()
            .filter(|&&element| page.has_class(element, "visible"))
            .count();

        let stats = page
            .query_selector_all(".stat")
            .into_iter()
            .map(|stat| {
                let value = page
                    .query_selector_all_within(Some(stat), ".stat-number")
                    .first()
                    .map(|&n| page.text(n))
                    .unwrap_or_default();
                let label = page
                    .query_selector_all_within(Some(stat), ".stat-label")
                    .first()
                    .map(|&l| page.text(l))
                    .unwrap_or_default();
                StatSnapshot { label, value }
            })
            .collect();

        let tipped_pickles = page
            .query_selector_all(".pickle")
            .into_iter()
            .filter(|&p| page.style(p, "transform").as_deref() == Some(crate::constants::PICKLE_HOVER_TRANSFORM))
            .count();

        StorefrontSnapshot {
            scroll_y: page.scroll_y(),
            document_height: page.document_height(),
            ticket: text("#ticketNumber"),
            ticket_transform: style("#ticketNumber", "transform"),
            open_sign: text("#openSign .open-text"),
            open_sign_background: style("#openSign", "background"),
            nav_shadow: style(".main-nav", "box-shadow"),
            menu_open: page
                .query_selector(".mobile-menu")
                .is_some_and(|menu| page.has_class(menu, "active")),
            revealed,
            reveal_targets: fading.len(),
            stats,
            tipped_pickles,
            hero_transform: style(".hero-bg", "transform"),
        }
    }
}

impl Default for Storefront {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_HEIGHT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatSnapshot {
    pub label: String,
    pub value: String,
}

/// What a visitor would see, flattened for printing or JSON output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorefrontSnapshot {
    pub scroll_y: f64,
    pub document_height: f64,
    pub ticket: String,
    pub ticket_transform: Option<String>,
    pub open_sign: String,
    pub open_sign_background: Option<String>,
    pub nav_shadow: Option<String>,
    pub menu_open: bool,
    pub revealed: usize,
    pub reveal_targets: usize,
    pub stats: Vec<StatSnapshot>,
    pub tipped_pickles: usize,
    pub hero_transform: Option<String>,
}

impl StorefrontSnapshot {
    /// Pretty-printed JSON, as the headless preview prints it
    pub fn to_json(&self) -> SiteResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn storefront_elements() -> Vec<ElementSpec> {
    let nav_links = |class: &str, top: f64| {
        ElementSpec::new("ul").class(class).layout(top, 0.0).children(
            SECTIONS
                .iter()
                .map(|(id, label)| ElementSpec::new("a").attr("href", &format!("#{}", id)).text(label)),
        )
    };

    let cards = CLASSICS.iter().enumerate().map(|(index, (name, pickles))| {
        let top = 1000.0 + (index / CARDS_PER_ROW) as f64 * (CARD_HEIGHT + 40.0);
        ElementSpec::new("article")
            .class("classic-card")
            .layout(top, CARD_HEIGHT)
            .child(ElementSpec::new("h3").text(name).layout(top + 260.0, 40.0))
            .child(
                ElementSpec::new("div")
                    .class("pickle-rating")
                    .layout(top + 320.0, 30.0)
                    .children((0..*pickles).map(|_| ElementSpec::new("span").class("pickle").text("🥒"))),
            )
    });

    let stats = STATS.iter().map(|(count, label)| {
        ElementSpec::new("div")
            .class("stat")
            .layout(3000.0, 120.0)
            .child(
                ElementSpec::new("span")
                    .class("stat-number")
                    .attr("data-count", count)
                    .text("0")
                    .layout(3000.0, 80.0),
            )
            .child(ElementSpec::new("span").class("stat-label").text(label).layout(3080.0, 40.0))
    });

    let info_blocks = ["Hours", "Location", "Parking"].map(|title| {
        ElementSpec::new("div")
            .class("info-block")
            .layout(4140.0, 300.0)
            .child(ElementSpec::new("h4").text(title).layout(4160.0, 40.0))
    });

    vec![
        ElementSpec::new("div")
            .class("specials-banner")
            .layout(0.0, 40.0)
            .text("Today's special: hot corned beef on rye with a cup of matzo ball soup"),
        ElementSpec::new("nav")
            .class("main-nav")
            .layout(40.0, 80.0)
            .child(ElementSpec::new("a").class("logo").attr("href", "#top").text("Benji's"))
            .child(nav_links("nav-links", 40.0))
            .child(
                ElementSpec::new("button")
                    .class("mobile-menu-btn")
                    .layout(60.0, 40.0)
                    .children((0..3).map(|_| ElementSpec::new("span"))),
            ),
        ElementSpec::new("div")
            .class("mobile-menu")
            .layout(120.0, 0.0)
            .child(nav_links("mobile-nav-links", 120.0)),
        ElementSpec::new("section")
            .id("top")
            .class("hero")
            .layout(120.0, 760.0)
            .child(ElementSpec::new("div").class("hero-bg").layout(120.0, 760.0))
            .child(
                ElementSpec::new("div")
                    .class("now-serving")
                    .layout(420.0, 120.0)
                    .child(ElementSpec::new("span").id("ticketNumber").text("00").layout(440.0, 80.0)),
            )
            .child(
                ElementSpec::new("div")
                    .id("openSign")
                    .class("open-sign")
                    .layout(580.0, 50.0)
                    .child(ElementSpec::new("span").class("open-text").text("OPEN")),
            )
            .child(ElementSpec::new("a").class("btn").attr("href", "#menu").text("See the Menu")),
        ElementSpec::new("section")
            .id("menu")
            .layout(880.0, 1100.0)
            .child(ElementSpec::new("div").class("section-header").layout(900.0, 80.0).text("The Classics"))
            .children(cards),
        ElementSpec::new("section")
            .id("story")
            .layout(1980.0, 1220.0)
            .child(ElementSpec::new("div").class("section-header").layout(2000.0, 80.0).text("Our Story"))
            .child(
                ElementSpec::new("div")
                    .class("story-container")
                    .layout(2120.0, 820.0)
                    .child(ElementSpec::new("figure").class("polaroid").layout(2160.0, 320.0))
                    .child(ElementSpec::new("figure").class("polaroid").layout(2520.0, 320.0)),
            )
            .child(ElementSpec::new("div").class("stats").layout(3000.0, 120.0).children(stats)),
        ElementSpec::new("section")
            .id("catering")
            .layout(3200.0, 800.0)
            .child(ElementSpec::new("div").class("section-header").layout(3220.0, 80.0).text("Catering"))
            .child(ElementSpec::new("div").class("catering-showcase").layout(3340.0, 560.0)),
        ElementSpec::new("section")
            .id("visit")
            .layout(4000.0, 600.0)
            .child(ElementSpec::new("div").class("section-header").layout(4020.0, 80.0).text("Visit Us"))
            .children(info_blocks),
        ElementSpec::new("footer").layout(4600.0, 240.0).text("Est. 1963 · Milwaukee, WI"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_storefront_markup() {
        let store = Storefront::default();
        let page = store.page();

        assert!(page.element_by_id("ticketNumber").is_some());
        assert!(page.element_by_id("openSign").is_some());
        assert_eq!(store.nav_links().len(), SECTIONS.len());
        assert_eq!(page.query_selector_all(".mobile-menu-btn span").len(), 3);
        assert_eq!(page.query_selector_all(".classic-card").len(), CLASSICS.len());
        assert_eq!(page.query_selector_all(".stat-number[data-count]").len(), 4);
        assert_eq!(store.pickle_ratings().len(), CLASSICS.len());
        assert_eq!(page.query_selector_all(".pickle").len(), 27);
        assert_eq!(page.document_height(), 4840.0);

        for (id, _) in SECTIONS {
            assert!(page.element_by_id(id).is_some(), "missing section #{}", id);
        }
    }

    #[test]
    fn test_fresh_snapshot() {
        let snapshot = Storefront::default().snapshot();
        assert_eq!(snapshot.ticket, "00");
        assert_eq!(snapshot.open_sign, "OPEN");
        assert_eq!(snapshot.nav_shadow, None);
        assert!(!snapshot.menu_open);
        assert_eq!(snapshot.reveal_targets, 0);
        assert_eq!(snapshot.stats.len(), 4);
        assert_eq!(snapshot.stats[0], StatSnapshot {
            label: "Established".to_string(),
            value: "0".to_string(),
        });
    }

    #[test]
    fn test_snapshot_json() {
        let json = Storefront::default().snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ticket"], "00");
        assert_eq!(value["menu_open"], false);
        assert_eq!(value["document_height"], 4840.0);
        assert_eq!(value["stats"][0]["label"], "Established");
        assert!(value["nav_shadow"].is_null());
    }
}
