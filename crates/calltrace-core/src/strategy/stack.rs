//! Call stack with an explicit flow state

/// Phase of the current flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Active { depth: usize },
}

/// What a push or pop did to the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// First frame of a new flow
    Opened,
    /// Frame pushed on top of an active flow (new depth)
    Nested(usize),
    /// Frame popped, flow still active (remaining depth)
    Unwound(usize),
    /// Last frame popped, the flow drained
    Drained,
    /// Pop on an empty stack
    Underflow,
}

/// LIFO stack of in-flight operation names
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: Vec<String>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operation: impl Into<String>) -> Transition {
        self.frames.push(operation.into());
        match self.frames.len() {
            1 => Transition::Opened,
            depth => Transition::Nested(depth),
        }
    }

    /// Pop the innermost frame, returning the transition and the frame name
    pub fn pop(&mut self) -> (Transition, Option<String>) {
        match self.frames.pop() {
            None => (Transition::Underflow, None),
            Some(frame) if self.frames.is_empty() => (Transition::Drained, Some(frame)),
            Some(frame) => (Transition::Unwound(self.frames.len()), Some(frame)),
        }
    }

    pub fn state(&self) -> FlowState {
        match self.frames.len() {
            0 => FlowState::Idle,
            depth => FlowState::Active { depth },
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_idle(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn top(&self) -> Option<&str> {
        self.frames.last().map(|s| s.as_str())
    }
}
