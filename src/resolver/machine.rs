use std::fmt;

use super::error::{StateError, StateResult};

/// A stage of resolution that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveStage {
    Content,
    Theme,
    Animations,
}

impl ResolveStage {
    /// The event recorded when this stage succeeds.
    pub fn completion(self) -> ResolveEvent {
        match self {
            Self::Content => ResolveEvent::NormalizeGlobs,
            Self::Theme => ResolveEvent::MergeTheme,
            Self::Animations => ResolveEvent::CompileAnimations,
        }
    }
}

impl fmt::Display for ResolveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Content => "content",
            Self::Theme => "theme",
            Self::Animations => "animations",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveState {
    #[default]
    Start,
    GlobsNormalized,
    ThemeMerged,
    AnimationsCompiled,
    Resolved,
    Failed(ResolveStage),
}

impl ResolveState {
    /// The stage that runs next from this state, if any.
    pub fn pending_stage(self) -> Option<ResolveStage> {
        match self {
            Self::Start => Some(ResolveStage::Content),
            Self::GlobsNormalized => Some(ResolveStage::Theme),
            Self::ThemeMerged => Some(ResolveStage::Animations),
            Self::AnimationsCompiled | Self::Resolved | Self::Failed(_) => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveEvent {
    NormalizeGlobs,
    MergeTheme,
    CompileAnimations,
    Finish,
    Fail(ResolveStage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: ResolveState,
    pub event: ResolveEvent,
    pub to: ResolveState,
}

impl StateTransition {
    pub fn new(from: ResolveState, event: ResolveEvent, to: ResolveState) -> Self {
        Self { from, event, to }
    }
}

/// Linear resolution lifecycle:
/// `Start -> GlobsNormalized -> ThemeMerged -> AnimationsCompiled -> Resolved`,
/// or `Failed(stage)` from whichever stage was running.
#[derive(Debug)]
pub struct ResolveMachine {
    state: ResolveState,
    transition_history: Vec<StateTransition>,
}

impl ResolveMachine {
    pub fn new() -> Self {
        Self {
            state: ResolveState::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> ResolveState {
        self.state
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }

    pub fn can_transition(&self, event: ResolveEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: ResolveEvent) -> Option<ResolveState> {
        use ResolveEvent::*;
        match (self.state, event) {
            (ResolveState::Start, NormalizeGlobs) => Some(ResolveState::GlobsNormalized),
            (ResolveState::GlobsNormalized, MergeTheme) => Some(ResolveState::ThemeMerged),
            (ResolveState::ThemeMerged, CompileAnimations) => {
                Some(ResolveState::AnimationsCompiled)
            }
            (ResolveState::AnimationsCompiled, Finish) => Some(ResolveState::Resolved),
            (state, Fail(stage)) if state.pending_stage() == Some(stage) => {
                Some(ResolveState::Failed(stage))
            }
            _ => None,
        }
    }

    pub fn transition(&mut self, event: ResolveEvent) -> StateResult<ResolveState> {
        tracing::debug!(from = ?self.state, event = ?event, "request resolve transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid resolve transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        self.transition_history
            .push(StateTransition::new(self.state, event, next));
        self.state = next;
        Ok(self.state)
    }
}

impl Default for ResolveMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResolveMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResolveState::{:?}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = ResolveMachine::new();
        assert!(machine.can_transition(ResolveEvent::NormalizeGlobs));
        assert!(machine.can_transition(ResolveEvent::Fail(ResolveStage::Content)));
        assert!(!machine.can_transition(ResolveEvent::MergeTheme));
        assert!(!machine.can_transition(ResolveEvent::Fail(ResolveStage::Theme)));

        machine
            .transition(ResolveEvent::NormalizeGlobs)
            .expect("start -> globs normalized should transition");

        assert!(machine.can_transition(ResolveEvent::MergeTheme));
        assert!(machine.can_transition(ResolveEvent::Fail(ResolveStage::Theme)));
        assert!(!machine.can_transition(ResolveEvent::Finish));
    }

    #[test]
    fn transition_records_history_with_ordered_entries() {
        let mut machine = ResolveMachine::new();
        for stage in [
            ResolveStage::Content,
            ResolveStage::Theme,
            ResolveStage::Animations,
        ] {
            machine
                .transition(stage.completion())
                .expect("stage completion should transition");
        }
        machine
            .transition(ResolveEvent::Finish)
            .expect("finish should transition");

        assert_eq!(machine.state(), ResolveState::Resolved);
        assert!(machine.state().is_terminal());
        assert_eq!(
            machine.history(),
            [
                StateTransition::new(
                    ResolveState::Start,
                    ResolveEvent::NormalizeGlobs,
                    ResolveState::GlobsNormalized
                ),
                StateTransition::new(
                    ResolveState::GlobsNormalized,
                    ResolveEvent::MergeTheme,
                    ResolveState::ThemeMerged
                ),
                StateTransition::new(
                    ResolveState::ThemeMerged,
                    ResolveEvent::CompileAnimations,
                    ResolveState::AnimationsCompiled
                ),
                StateTransition::new(
                    ResolveState::AnimationsCompiled,
                    ResolveEvent::Finish,
                    ResolveState::Resolved
                ),
            ]
        );
    }

    #[test]
    fn failure_is_terminal() {
        let mut machine = ResolveMachine::new();
        machine
            .transition(ResolveEvent::NormalizeGlobs)
            .expect("content should complete");
        let state = machine
            .transition(ResolveEvent::Fail(ResolveStage::Theme))
            .expect("theme failure should transition");

        assert_eq!(state, ResolveState::Failed(ResolveStage::Theme));
        assert!(state.is_terminal());
        assert!(!machine.can_transition(ResolveEvent::MergeTheme));
        assert!(!machine.can_transition(ResolveEvent::Fail(ResolveStage::Animations)));
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_history() {
        let mut machine = ResolveMachine::new();

        let err = machine
            .transition(ResolveEvent::Finish)
            .expect_err("start -> finish should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: ResolveState::Start,
                event: ResolveEvent::Finish
            }
        ));
        assert_eq!(machine.state(), ResolveState::Start);
        assert!(machine.history().is_empty());
    }
}
