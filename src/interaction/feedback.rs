/// Advisory cues for haptics or selection feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCue {
    GestureStarted,
    ThresholdCrossed,
    CommitSucceeded,
}

/// Receives feedback cues. Delivery is best effort; nothing depends on it.
pub trait FeedbackSink {
    fn notify(&mut self, cue: FeedbackCue);
}

/// Sink that drops every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl FeedbackSink for NoFeedback {
    fn notify(&mut self, _cue: FeedbackCue) {}
}

impl<F: FnMut(FeedbackCue)> FeedbackSink for F {
    fn notify(&mut self, cue: FeedbackCue) {
        self(cue)
    }
}
