//! Terminal preview of the storefront.
//!
//! The interactive mode draws a live status board with crossterm and turns
//! key presses into page events. The headless mode scrolls the page from
//! top to bottom on a timer and reports what a visitor would have ended up
//! seeing.

use crate::behaviors::PageEvent;
use crate::config::SiteConfig;
use crate::dom::{Document, ElementId};
use crate::hours::Clock;
use crate::site::Site;
use crate::storefront::{Storefront, StorefrontSnapshot, SECTIONS};
use crate::utils::error::SiteResult;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

const SCROLL_STEP: f64 = 80.0;
const FRAME_INTERVAL: Duration = Duration::from_millis(100);
const TOUR_STEP_INTERVAL: Duration = Duration::from_millis(250);
const TOUR_SCROLL_STEP: f64 = 120.0;
const KEY_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub seed: u64,
    /// Stop on our own after this long; the interactive preview otherwise
    /// runs until quit.
    pub duration: Option<Duration>,
    pub viewport_height: f64,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            seed: 1963,
            duration: None,
            viewport_height: crate::storefront::DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

/// What a key press asks the preview to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKey {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    ToggleMenu,
    TogglePickles,
    Section(usize),
    Quit,
}

impl PreviewKey {
    pub fn from_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Self> {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            return Some(Self::Quit);
        }
        match code {
            KeyCode::Up | KeyCode::Char('k') => Some(Self::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Self::ScrollDown),
            KeyCode::PageUp => Some(Self::PageUp),
            KeyCode::PageDown | KeyCode::Char(' ') => Some(Self::PageDown),
            KeyCode::Home | KeyCode::Char('g') => Some(Self::Top),
            KeyCode::Char('m') => Some(Self::ToggleMenu),
            KeyCode::Char('p') => Some(Self::TogglePickles),
            KeyCode::Char(c @ '1'..='4') => Some(Self::Section(c as usize - '1' as usize)),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            _ => None,
        }
    }
}

/// A mounted storefront plus the visitor's pointer state.
pub struct Preview {
    storefront: Storefront,
    site: Site,
    hovering: Option<ElementId>,
}

impl Preview {
    /// Builds the page and mounts the site; needs a running tokio runtime.
    pub fn mount(config: &SiteConfig, clock: Arc<dyn Clock>, options: &PreviewOptions) -> Self {
        let storefront = Storefront::new(options.viewport_height);
        let site = Site::mount(
            storefront.document(),
            config,
            clock,
            fastrand::Rng::with_seed(options.seed),
        );
        Self {
            storefront,
            site,
            hovering: None,
        }
    }

    pub fn storefront(&self) -> &Storefront {
        &self.storefront
    }

    pub fn snapshot(&self) -> StorefrontSnapshot {
        self.storefront.snapshot()
    }

    /// Applies one key; returns false once the visitor asked to quit.
    pub fn apply(&mut self, key: PreviewKey) -> bool {
        let page = Arc::clone(self.storefront.page());
        let viewport = page.viewport_height();
        match key {
            PreviewKey::ScrollUp => {
                self.scroll_by(-SCROLL_STEP);
            }
            PreviewKey::ScrollDown => {
                self.scroll_by(SCROLL_STEP);
            }
            PreviewKey::PageUp => {
                self.scroll_by(-viewport);
            }
            PreviewKey::PageDown => {
                self.scroll_by(viewport);
            }
            PreviewKey::Top => {
                self.scroll_by(-page.scroll_y());
            }
            PreviewKey::ToggleMenu => {
                if let Some(button) = self.storefront.menu_button() {
                    self.site.dispatch(PageEvent::Click(button));
                }
            }
            PreviewKey::TogglePickles => self.toggle_pickles(),
            PreviewKey::Section(index) => {
                if let Some(&link) = self.storefront.nav_links().get(index) {
                    let before = page.scroll_y();
                    self.site.dispatch(PageEvent::Click(link));
                    // The smooth scroll lands at once here, so behaviors
                    // still need to hear about it.
                    if page.scroll_y() != before {
                        self.site.dispatch(PageEvent::Scroll);
                    }
                }
            }
            PreviewKey::Quit => return false,
        }
        true
    }

    /// Scrolls the page and lets the behaviors react. Returns whether the
    /// position actually changed.
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        let page = self.storefront.page();
        let before = page.scroll_y();
        let after = page.set_scroll_y(before + delta);
        if after != before {
            self.site.dispatch(PageEvent::Scroll);
        }
        after != before
    }

    // Hovers the first rating on screen, or leaves the one being hovered.
    fn toggle_pickles(&mut self) {
        if let Some(rating) = self.hovering.take() {
            self.site.dispatch(PageEvent::MouseLeave(rating));
            return;
        }

        let page = self.storefront.page();
        let top = page.scroll_y();
        let bottom = top + page.viewport_height();
        let on_screen = self.storefront.pickle_ratings().into_iter().find(|&rating| {
            let y = page.offset_top(rating);
            y >= top && y < bottom
        });
        if let Some(rating) = on_screen {
            self.site.dispatch(PageEvent::MouseEnter(rating));
            self.hovering = Some(rating);
        }
    }
}

/// Scrolls from top to bottom, one step per tick, then lingers until
/// `duration` has passed.
pub async fn run_headless(
    config: &SiteConfig,
    clock: Arc<dyn Clock>,
    options: &PreviewOptions,
    duration: Duration,
) -> StorefrontSnapshot {
    let mut preview = Preview::mount(config, clock, options);
    let deadline = Instant::now() + duration;
    let mut ticker = time::interval_at(Instant::now() + TOUR_STEP_INTERVAL, TOUR_STEP_INTERVAL);

    loop {
        tokio::select! {
            _ = time::sleep_until(deadline) => break,
            _ = ticker.tick() => {
                preview.scroll_by(TOUR_SCROLL_STEP);
            }
        }
    }

    let snapshot = preview.snapshot();
    tracing::info!(
        scroll_y = snapshot.scroll_y,
        revealed = snapshot.revealed,
        ticket = %snapshot.ticket,
        "headless tour finished"
    );
    snapshot
}

/// Restores the terminal even when the preview bails out early.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Runs the live preview until `q` or the optional duration runs out.
pub async fn run_interactive(config: &SiteConfig, clock: Arc<dyn Clock>, options: &PreviewOptions) -> SiteResult<()> {
    let _guard = TerminalGuard::enter()?;
    let (_, rows) = terminal::size()?;
    let viewport = options.viewport_height.min(f64::from(rows) * 20.0).max(200.0);
    let options = PreviewOptions {
        viewport_height: viewport,
        ..options.clone()
    };

    let mut preview = Preview::mount(config, clock, &options);
    let mut keys = spawn_key_reader();
    let mut frames = time::interval(FRAME_INTERVAL);
    let deadline = options.duration.map(|d| Instant::now() + d);

    let mut stdout = io::stdout();
    loop {
        tokio::select! {
            _ = frames.tick() => draw(&mut stdout, &preview.snapshot())?,
            key = keys.recv() => match key {
                Some(key) => {
                    if !preview.apply(key) {
                        break;
                    }
                }
                None => break,
            },
            _ = sleep_until_opt(deadline) => break,
        }
    }
    Ok(())
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

// crossterm's event reading blocks, so it lives on its own thread.
fn spawn_key_reader() -> mpsc::Receiver<PreviewKey> {
    let (tx, rx) = mpsc::channel(32);
    std::thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(KEY_POLL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!("key polling failed: {}", e);
                    break;
                }
            }
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(key) = PreviewKey::from_key(key.code, key.modifiers) {
                if tx.blocking_send(key).is_err() {
                    break;
                }
            }
        }
    });
    rx
}

fn draw(out: &mut impl Write, snapshot: &StorefrontSnapshot) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, (color, line)) in render_lines(snapshot).into_iter().enumerate() {
        queue!(
            out,
            cursor::MoveTo(0, row as u16),
            SetForegroundColor(color),
            Print(line),
            ResetColor
        )?;
    }
    out.flush()
}

/// The status board, one colored line per row.
pub fn render_lines(snapshot: &StorefrontSnapshot) -> Vec<(Color, String)> {
    let sign_color = if snapshot.open_sign == "OPEN" {
        Color::Green
    } else {
        Color::Red
    };
    let progress = if snapshot.document_height > 0.0 {
        (snapshot.scroll_y / snapshot.document_height * 100.0).round()
    } else {
        0.0
    };

    let mut lines = vec![
        (Color::Yellow, "Benji's Deli & Restaurant · Est. 1963".to_string()),
        (Color::DarkGrey, "↑/↓ scroll  1-4 sections  m menu  p pickles  q quit".to_string()),
        (Color::Reset, String::new()),
        (Color::White, format!("Now serving   {}", snapshot.ticket)),
        (sign_color, format!("Sign          {}", snapshot.open_sign)),
        (
            Color::White,
            format!("Scroll        {:.0}px ({}%)", snapshot.scroll_y, progress),
        ),
        (
            Color::White,
            format!(
                "Nav shadow    {}",
                snapshot.nav_shadow.as_deref().unwrap_or("-")
            ),
        ),
        (
            Color::White,
            format!("Menu          {}", if snapshot.menu_open { "open" } else { "closed" }),
        ),
        (
            Color::White,
            format!("Revealed      {}/{}", snapshot.revealed, snapshot.reveal_targets),
        ),
        (
            Color::White,
            format!(
                "Hero          {}",
                snapshot.hero_transform.as_deref().unwrap_or("-")
            ),
        ),
        (Color::Green, format!("Pickles       {} tipped", snapshot.tipped_pickles)),
        (Color::Reset, String::new()),
    ];
    lines.extend(
        snapshot
            .stats
            .iter()
            .map(|stat| (Color::Cyan, format!("{:>8}  {}", stat.value, stat.label))),
    );
    lines.push((Color::Reset, String::new()));
    lines.extend(
        SECTIONS
            .iter()
            .enumerate()
            .map(|(i, (_, label))| (Color::DarkGrey, format!("[{}] {}", i + 1, label))),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hours::FixedClock;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn clock(hour: u32) -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            NaiveDate::from_ymd_opt(2026, 10, 14)
                .unwrap()
                .and_hms_opt(hour, 30, 0)
                .unwrap(),
        ))
    }

    #[test]
    fn test_key_mapping() {
        let none = KeyModifiers::NONE;
        assert_eq!(PreviewKey::from_key(KeyCode::Up, none), Some(PreviewKey::ScrollUp));
        assert_eq!(PreviewKey::from_key(KeyCode::Char('j'), none), Some(PreviewKey::ScrollDown));
        assert_eq!(PreviewKey::from_key(KeyCode::Char('m'), none), Some(PreviewKey::ToggleMenu));
        assert_eq!(PreviewKey::from_key(KeyCode::Char('3'), none), Some(PreviewKey::Section(2)));
        assert_eq!(PreviewKey::from_key(KeyCode::Char('5'), none), None);
        assert_eq!(
            PreviewKey::from_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(PreviewKey::Quit)
        );
        assert_eq!(PreviewKey::from_key(KeyCode::Char('c'), none), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_drive_the_page() {
        let mut preview = Preview::mount(&SiteConfig::default(), clock(12), &PreviewOptions::default());

        assert!(preview.apply(PreviewKey::ToggleMenu));
        assert!(preview.snapshot().menu_open);
        preview.apply(PreviewKey::ToggleMenu);
        assert!(!preview.snapshot().menu_open);

        preview.apply(PreviewKey::ScrollDown);
        let snapshot = preview.snapshot();
        assert_eq!(snapshot.scroll_y, 80.0);
        assert_eq!(snapshot.nav_shadow.as_deref(), Some(crate::constants::NAV_SHADOW_SCROLLED));
        assert_eq!(snapshot.hero_transform.as_deref(), Some("translateY(24px)"));

        preview.apply(PreviewKey::Top);
        assert_eq!(preview.snapshot().scroll_y, 0.0);
        assert!(!preview.apply(PreviewKey::Quit));
    }

    #[tokio::test(start_paused = true)]
    async fn test_section_keys_jump_below_header() {
        let mut preview = Preview::mount(&SiteConfig::default(), clock(12), &PreviewOptions::default());

        preview.apply(PreviewKey::Section(0));
        // #menu at 880 minus nav 80, banner 40 and 20 extra
        assert_eq!(preview.snapshot().scroll_y, 740.0);
        assert!(preview.snapshot().revealed > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pickle_toggle_hovers_rating_on_screen() {
        let mut preview = Preview::mount(&SiteConfig::default(), clock(12), &PreviewOptions::default());

        // Nothing rated is on screen at the top.
        preview.apply(PreviewKey::TogglePickles);
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(preview.snapshot().tipped_pickles, 0);

        preview.scroll_by(900.0);
        preview.apply(PreviewKey::TogglePickles);
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(preview.snapshot().tipped_pickles, 5);

        preview.apply(PreviewKey::TogglePickles);
        assert_eq!(preview.snapshot().tipped_pickles, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_headless_tour_reaches_the_footer() {
        let snapshot = run_headless(
            &SiteConfig::default(),
            clock(22),
            &PreviewOptions::default(),
            Duration::from_secs(15),
        )
        .await;

        assert_eq!(snapshot.scroll_y, snapshot.document_height - 800.0);
        assert_eq!(snapshot.open_sign, "CLOSED");
        assert_eq!(snapshot.revealed, snapshot.reveal_targets);
        let values: Vec<&str> = snapshot.stats.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, ["1963", "63", "12000", "3"]);
        assert_eq!(snapshot.ticket.len(), 2);
    }

    #[test]
    fn test_render_lines() {
        let snapshot = StorefrontSnapshot {
            scroll_y: 484.0,
            document_height: 4840.0,
            ticket: "42".to_string(),
            ticket_transform: None,
            open_sign: "CLOSED".to_string(),
            open_sign_background: Some("#c41e3a".to_string()),
            nav_shadow: None,
            menu_open: true,
            revealed: 3,
            reveal_targets: 20,
            stats: Vec::new(),
            tipped_pickles: 0,
            hero_transform: None,
        };
        let lines = render_lines(&snapshot);
        let text: Vec<&str> = lines.iter().map(|(_, l)| l.as_str()).collect();

        assert!(text.contains(&"Now serving   42"));
        assert!(text.contains(&"Scroll        484px (10%)"));
        assert!(text.contains(&"Menu          open"));
        assert!(text.contains(&"Revealed      3/20"));
        assert!(text.contains(&"[4] Visit Us"));
        assert!(lines.iter().any(|(color, line)| *color == Color::Red && line.ends_with("CLOSED")));
    }
}
