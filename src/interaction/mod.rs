//! Pointer interaction on the calendar grid.
//!
//! [`InteractionStateMachine`] turns press, move and release events into a
//! live preview of new dates; [`InteractionController`] wraps it with the
//! event cache and the store the finished change is written to.

mod controller;
mod feedback;
mod handles;
mod machine;
mod state;

pub use controller::{CommitError, InteractionController};
pub use feedback::{FeedbackCue, FeedbackSink, NoFeedback};
pub use handles::{bar_rect, press_target, BarMetrics, HandleRects, HANDLE_SIZE};
pub use machine::{CommitRequest, GestureOutcome, InteractionStateMachine, MoveOutcome, PressTarget};
pub use state::{GestureMode, GestureState};
