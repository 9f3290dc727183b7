//! Floating signal badge.
//!
//! The badge floats above every screen and shows whichever signal currently
//! has priority. It is a three-state machine:
//!
//! ```text
//!             signal appears            tap
//!   Hidden ─────────────────▶ Collapsed ◀────▶ Expanded
//!     ▲                           │                │
//!     └───── signal cleared ──────┴────────────────┘
//! ```
//!
//! Pointer input is in terminal cells. A press on the badge starts a
//! gesture; moves drag the badge without changing its state; the release
//! decides between tap and drag by how far the pointer ever got from the
//! press point.

use crate::api::{ManualSignal, Monitor, SignalKind};
use ratatui::layout::{Position, Rect, Size};
use rust_decimal::Decimal;

/// Badge footprint when collapsed.
pub const COLLAPSED_SIZE: Size = Size::new(16, 3);
/// Info panel footprint when expanded.
pub const EXPANDED_SIZE: Size = Size::new(34, 7);

/// Where the shown signal came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalSource {
    /// Pushed by an admin or mentor.
    Manual,
    /// Computed for one of the user's monitors.
    Monitor { name: String },
}

/// The signal the badge reflects.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSignal {
    pub source: SignalSource,
    pub symbol: String,
    pub kind: SignalKind,
    pub price: Option<Decimal>,
    pub message: Option<String>,
}

impl From<&ManualSignal> for ActiveSignal {
    fn from(signal: &ManualSignal) -> Self {
        Self {
            source: SignalSource::Manual,
            symbol: signal.symbol.clone(),
            kind: signal.kind,
            price: signal.price,
            message: signal.message.clone(),
        }
    }
}

impl From<&Monitor> for ActiveSignal {
    fn from(monitor: &Monitor) -> Self {
        Self {
            source: SignalSource::Monitor {
                name: monitor.name.clone(),
            },
            symbol: monitor.config.symbol.clone(),
            kind: monitor.signal(),
            price: monitor.last_price,
            message: None,
        }
    }
}

/// Pick the signal to show.
///
/// A manual signal wins outright. Otherwise the selected monitor's signal is
/// used, but only while that monitor is running and has something to say.
pub fn resolve_active_signal(
    manual: Option<&ManualSignal>,
    selected: Option<&Monitor>,
) -> Option<ActiveSignal> {
    if let Some(manual) = manual {
        return Some(manual.into());
    }
    selected
        .filter(|m| m.is_running() && m.signal().is_actionable())
        .map(ActiveSignal::from)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    #[default]
    Hidden,
    Collapsed,
    Expanded,
}

/// How a finished gesture was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    Drag,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    at: Position,
    origin: Position,
    /// Largest Manhattan distance from `at` seen so far.
    travel: u32,
}

#[derive(Debug, Clone)]
pub struct Overlay {
    phase: OverlayPhase,
    signal: Option<ActiveSignal>,
    position: Position,
    bounds: Rect,
    press: Option<Press>,
    tap_threshold: u16,
}

impl Overlay {
    /// A hidden badge parked in the bottom-right corner of the first
    /// bounds it is given.
    pub fn new(tap_threshold: u16) -> Self {
        Self {
            phase: OverlayPhase::Hidden,
            signal: None,
            position: Position::new(u16::MAX, u16::MAX),
            bounds: Rect::default(),
            press: None,
            tap_threshold,
        }
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    pub fn signal(&self) -> Option<&ActiveSignal> {
        self.signal.as_ref()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some()
    }

    pub fn size(&self) -> Size {
        match self.phase {
            OverlayPhase::Expanded => EXPANDED_SIZE,
            _ => COLLAPSED_SIZE,
        }
    }

    /// Screen area covered by the badge, or None while hidden.
    pub fn area(&self) -> Option<Rect> {
        if self.phase == OverlayPhase::Hidden {
            return None;
        }
        let size = self.size();
        Some(
            Rect::new(self.position.x, self.position.y, size.width, size.height)
                .intersection(self.bounds),
        )
    }

    /// Feed the currently resolved signal.
    pub fn set_signal(&mut self, signal: Option<ActiveSignal>) {
        match signal {
            Some(signal) if signal.kind.is_actionable() => {
                if self.phase == OverlayPhase::Hidden {
                    tracing::debug!(symbol = %signal.symbol, kind = %signal.kind, "overlay shown");
                    self.phase = OverlayPhase::Collapsed;
                    self.clamp();
                }
                self.signal = Some(signal);
            }
            _ => {
                if self.phase != OverlayPhase::Hidden {
                    tracing::debug!("overlay hidden");
                }
                self.phase = OverlayPhase::Hidden;
                self.signal = None;
                self.press = None;
            }
        }
    }

    /// Keyboard equivalent of a tap.
    pub fn toggle(&mut self) {
        self.phase = match self.phase {
            OverlayPhase::Hidden => return,
            OverlayPhase::Collapsed => OverlayPhase::Expanded,
            OverlayPhase::Expanded => OverlayPhase::Collapsed,
        };
        self.clamp();
    }

    /// Screen size changed.
    pub fn resize(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.clamp();
    }

    /// Start a gesture if `at` hits the badge. Returns whether it did.
    pub fn pointer_down(&mut self, at: Position) -> bool {
        let hit = self.area().is_some_and(|area| area.contains(at));
        if hit {
            self.press = Some(Press {
                at,
                origin: self.position,
                travel: 0,
            });
        }
        hit
    }

    /// Follow the pointer during a gesture. Returns whether a gesture is live.
    pub fn pointer_move(&mut self, at: Position) -> bool {
        let Some(press) = self.press.as_mut() else {
            return false;
        };
        press.travel = press.travel.max(manhattan(press.at, at));
        self.position = offset(press.origin, press.at, at);
        true
    }

    /// Finish a gesture.
    pub fn pointer_up(&mut self, at: Position) -> Option<Gesture> {
        self.pointer_move(at);
        let press = self.press.take()?;

        if press.travel < u32::from(self.tap_threshold) {
            self.position = press.origin;
            self.toggle();
            Some(Gesture::Tap)
        } else {
            self.clamp();
            Some(Gesture::Drag)
        }
    }

    /// Keep the whole badge on screen.
    fn clamp(&mut self) {
        let size = self.size();
        let max_x = self.bounds.right().saturating_sub(size.width).max(self.bounds.x);
        let max_y = self.bounds.bottom().saturating_sub(size.height).max(self.bounds.y);
        self.position = Position::new(
            self.position.x.clamp(self.bounds.x, max_x),
            self.position.y.clamp(self.bounds.y, max_y),
        );
    }
}

fn manhattan(a: Position, b: Position) -> u32 {
    u32::from(a.x.abs_diff(b.x)) + u32::from(a.y.abs_diff(b.y))
}

/// `origin` moved by the pointer's displacement from `from` to `to`.
fn offset(origin: Position, from: Position, to: Position) -> Position {
    let shift = |o: u16, f: u16, t: u16| {
        let moved = i32::from(o) + i32::from(t) - i32::from(f);
        moved.clamp(0, i32::from(u16::MAX)) as u16
    };
    Position::new(
        shift(origin.x, from.x, to.x),
        shift(origin.y, from.y, to.y),
    )
}
