use crate::config::TicketSettings;
use crate::constants::*;
use crate::dom::{Document, ElementId};
use crate::schedule::RepeatingTask;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

/// Zero-pads a ticket number to two digits.
pub fn format_ticket(number: u8) -> String {
    format!("{:02}", number)
}

/// Cosmetic distortion applied to the number while it flips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    pub scale_y: f64,
    pub offset_y: f64,
    pub opacity: f64,
}

impl Jitter {
    pub const NEUTRAL: Jitter = Jitter {
        scale_y: 1.0,
        offset_y: 0.0,
        opacity: 1.0,
    };

    fn random(rng: &mut fastrand::Rng) -> Self {
        Self {
            scale_y: JITTER_SCALE_MIN + rng.f64() * JITTER_SCALE_SPAN,
            offset_y: (rng.f64() - 0.5) * JITTER_OFFSET_SPAN,
            opacity: JITTER_OPACITY_MIN + rng.f64() * JITTER_OPACITY_SPAN,
        }
    }

    pub fn transform(&self) -> String {
        format!("scaleY({}) translateY({}px)", self.scale_y, self.offset_y)
    }
}

/// One intermediate value shown during a flip
#[derive(Debug, Clone, PartialEq)]
pub struct FlipFrame {
    pub text: String,
    pub jitter: Jitter,
}

/// Everything needed to play one flip toward `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlipPlan {
    pub target: u8,
    pub frames: Vec<FlipFrame>,
    pub frame_interval: Duration,
}

/// Result of one [`TicketFlipAnimator::advance`]
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    pub previous: u8,
    pub jump: u8,
    pub current: u8,
    pub flip: FlipPlan,
    /// Delay from the start of this advance to the next one
    pub next_delay: Duration,
}

/// The "now serving" number that flips forward forever.
pub struct TicketFlipAnimator {
    doc: Arc<dyn Document>,
    element: ElementId,
    current: u8,
    rng: fastrand::Rng,
    settings: TicketSettings,
}

impl TicketFlipAnimator {
    /// Shows a random starting number on `#ticketNumber`.
    ///
    /// Returns `None` when the page has no ticket display.
    pub fn mount(doc: Arc<dyn Document>, settings: TicketSettings, mut rng: fastrand::Rng) -> Option<Self> {
        let Some(element) = doc.element_by_id("ticketNumber") else {
            tracing::debug!("no #ticketNumber element, ticket counter disabled");
            return None;
        };

        let current = rng.u8(0..TICKET_MODULUS);
        doc.set_text(element, &format_ticket(current));
        doc.set_style(element, "transition", TICKET_TRANSITION);
        tracing::debug!(current, "ticket counter mounted");

        Some(Self {
            doc,
            element,
            current,
            rng,
            settings,
        })
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Moves the number forward by a random jump and plans the flip to it.
    pub fn advance(&mut self) -> Advance {
        let previous = self.current;
        let jump = self.rng.u8(self.settings.jump_min..=self.settings.jump_max);
        self.current = ((previous as u16 + jump as u16) % TICKET_MODULUS as u16) as u8;

        let flip = self.plan_flip(self.current);
        let next_delay = Duration::from_millis(
            self.rng
                .u64(self.settings.next_delay_min_ms..=self.settings.next_delay_max_ms),
        );

        Advance {
            previous,
            jump,
            current: self.current,
            flip,
            next_delay,
        }
    }

    /// Random frames shown before landing on `target`.
    pub fn plan_flip(&mut self, target: u8) -> FlipPlan {
        let steps = self
            .rng
            .usize(self.settings.flip_steps_min..=self.settings.flip_steps_max);
        let frames = (0..steps)
            .map(|_| FlipFrame {
                text: format_ticket(self.rng.u8(0..TICKET_MODULUS)),
                jitter: Jitter::random(&mut self.rng),
            })
            .collect();

        FlipPlan {
            target,
            frames,
            frame_interval: self.settings.flip_duration() / steps.max(1) as u32,
        }
    }

    /// Starts the endless flip loop; the first advance comes after the start delay.
    pub fn spawn(self) -> JoinHandle<()> {
        let start_delay = self.settings.start_delay();
        RepeatingTask::spawn(start_delay, self, |animator| {
            let advance = animator.advance();
            tracing::trace!(
                previous = advance.previous,
                jump = advance.jump,
                current = advance.current,
                "ticket advance"
            );

            let flip = FlipPlayer {
                doc: Arc::clone(&animator.doc),
                element: animator.element,
                overshoot: animator.settings.overshoot(),
                overshoot_scale: animator.settings.overshoot_scale,
            };
            async move {
                flip.play(advance.flip).await;
                advance.next_delay
            }
        })
    }
}

/// Writes a planned flip to the document, frame by frame.
pub struct FlipPlayer {
    pub doc: Arc<dyn Document>,
    pub element: ElementId,
    pub overshoot: Duration,
    pub overshoot_scale: f64,
}

impl FlipPlayer {
    /// The first frame shows immediately, each later one a frame interval
    /// after the previous, and the target one interval after the last frame.
    pub async fn play(&self, plan: FlipPlan) {
        for (index, frame) in plan.frames.iter().enumerate() {
            if index > 0 {
                time::sleep(plan.frame_interval).await;
            }
            self.show(&frame.text, &frame.jitter);
        }
        if !plan.frames.is_empty() {
            time::sleep(plan.frame_interval).await;
        }

        self.show(&format_ticket(plan.target), &Jitter::NEUTRAL);
        self.doc.set_style(
            self.element,
            "transform",
            &format!("scaleY({})", self.overshoot_scale),
        );
        time::sleep(self.overshoot).await;
        self.doc.set_style(self.element, "transform", "scaleY(1)");
    }

    fn show(&self, text: &str, jitter: &Jitter) {
        self.doc.set_text(self.element, text);
        self.doc.set_style(self.element, "transform", &jitter.transform());
        self.doc
            .set_style(self.element, "opacity", &jitter.opacity.to_string());
    }
}
