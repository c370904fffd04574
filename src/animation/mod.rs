mod stats;
mod ticket;

pub use stats::{animate_counter, parse_count, StatTween};
pub use ticket::{format_ticket, Advance, FlipFrame, FlipPlan, FlipPlayer, Jitter, TicketFlipAnimator};
