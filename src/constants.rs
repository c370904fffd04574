// Ticket flip timing
pub const TICKET_START_DELAY_MS: u64 = 1500;
pub const TICKET_FLIP_DURATION_MS: u64 = 800;
pub const TICKET_FLIP_STEPS_MIN: usize = 8;
pub const TICKET_FLIP_STEPS_MAX: usize = 13;
pub const TICKET_JUMP_MIN: u8 = 1;
pub const TICKET_JUMP_MAX: u8 = 4;
pub const TICKET_NEXT_DELAY_MIN_MS: u64 = 1500;
pub const TICKET_NEXT_DELAY_MAX_MS: u64 = 3500;
pub const TICKET_OVERSHOOT_MS: u64 = 100;
pub const TICKET_OVERSHOOT_SCALE: f64 = 1.1;
pub const TICKET_MODULUS: u8 = 100;
pub const TICKET_TRANSITION: &str = "transform 0.08s ease, opacity 0.08s ease";

// Flip jitter ranges (purely cosmetic)
pub const JITTER_SCALE_MIN: f64 = 0.7;
pub const JITTER_SCALE_SPAN: f64 = 0.3;
pub const JITTER_OFFSET_SPAN: f64 = 4.0;
pub const JITTER_OPACITY_MIN: f64 = 0.6;
pub const JITTER_OPACITY_SPAN: f64 = 0.4;

// Stat counters
pub const COUNTER_DURATION_MS: u64 = 2000;
pub const COUNTER_STEPS: u32 = 60;
pub const COUNTER_THRESHOLD: f64 = 0.5;

// Scroll reveal
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_SELECTOR: &str =
    ".classic-card, .section-header, .story-container, .catering-showcase, .info-block, .polaroid";
pub const REVEAL_BOTTOM_MARGIN: f64 = -100.0;
pub const REVEAL_STAGGER_GROUPS: usize = 4;

// Sticky nav
pub const NAV_DEFAULT_BANNER_HEIGHT: f64 = 40.0;
pub const NAV_SHADOW_SCROLLED: &str = "0 4px 20px rgba(43, 24, 16, 0.15)";
pub const NAV_SHADOW_TOP: &str = "0 4px 20px rgba(43, 24, 16, 0.1)";

// Open sign
pub const OPEN_STATUS_REFRESH_MS: u64 = 60_000;
pub const OPEN_SIGN_OPEN_COLOR: &str = "#6b8e23";
pub const OPEN_SIGN_CLOSED_COLOR: &str = "#c41e3a";

// Smooth scroll
pub const ANCHOR_EXTRA_OFFSET: f64 = 20.0;

// Pickle rating hover
pub const PICKLE_STAGGER_MS: u64 = 50;
pub const PICKLE_HOVER_TRANSFORM: &str = "scale(1.3) rotate(10deg)";
pub const PICKLE_REST_TRANSFORM: &str = "scale(1) rotate(0deg)";
pub const PICKLE_TRANSITION: &str = "transform 0.2s ease";

// Hero parallax
pub const PARALLAX_FACTOR: f64 = 0.3;
