//! Service layer that moves stories to a named workflow state.

use crate::story::{
    domain::{
        ReleaseNote, StoryDomainError, StoryId, StoryRecord, StoryReferenceExtractor, StoryUpdate,
        WorkflowStateId,
    },
    ports::{StoryTracker, TrackerError},
};
use futures::future::{join_all, try_join_all};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// How a batch reacts when work for one story fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// The first failure aborts the batch and is returned to the caller.
    #[default]
    FailFast,
    /// Failures are recorded per story and the rest of the batch continues.
    BestEffort,
}

/// Request to move a set of stories to one workflow state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    story_ids: Vec<StoryId>,
    target_state: String,
    release_note: Option<ReleaseNote>,
    mode: BatchMode,
}

impl TransitionRequest {
    /// Creates a fail-fast request without description changes.
    #[must_use]
    pub fn new(story_ids: impl IntoIterator<Item = StoryId>, target_state: impl Into<String>) -> Self {
        Self {
            story_ids: story_ids.into_iter().collect(),
            target_state: target_state.into(),
            release_note: None,
            mode: BatchMode::default(),
        }
    }

    /// Appends release info to each story description.
    #[must_use]
    pub fn with_release_note(mut self, release_note: ReleaseNote) -> Self {
        self.release_note = Some(release_note);
        self
    }

    /// Sets the batch failure mode.
    #[must_use]
    pub fn with_mode(mut self, mode: BatchMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Request to move every story referenced in a release body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    body: String,
    target_state: String,
    release_url: String,
    update_description: bool,
}

impl ReleaseRequest {
    /// Creates a release request that leaves descriptions untouched.
    #[must_use]
    pub fn new(
        body: impl Into<String>,
        target_state: impl Into<String>,
        release_url: impl Into<String>,
    ) -> Self {
        Self {
            body: body.into(),
            target_state: target_state.into(),
            release_url: release_url.into(),
            update_description: false,
        }
    }

    /// Sets whether release info is appended to story descriptions.
    #[must_use]
    pub fn with_description_update(mut self, update_description: bool) -> Self {
        self.update_description = update_description;
        self
    }
}

/// Story that reached the requested state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionedStory {
    /// Story identifier.
    pub id: StoryId,
    /// Story name as reported after the update.
    pub name: String,
    /// Workflow state the story is now in.
    pub state_name: String,
}

/// Why a story was left out of a batch without failing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The tracker has no story with this id.
    NotFound,
    /// The story's workflow has no state with the requested name.
    WorkflowStateNotFound {
        /// Requested state name.
        state: String,
    },
}

/// Story left untouched by a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStory {
    /// Story identifier.
    pub id: StoryId,
    /// Reason the story was skipped.
    pub reason: SkipReason,
}

/// Outcome of a transition batch.
#[derive(Debug, Default)]
pub struct TransitionReport {
    transitioned: Vec<TransitionedStory>,
    skipped: Vec<SkippedStory>,
    failed: Vec<(StoryId, TransitionError)>,
}

impl TransitionReport {
    /// Returns the stories that were moved and verified.
    #[must_use]
    pub fn transitioned(&self) -> &[TransitionedStory] {
        &self.transitioned
    }

    /// Returns the stories that were skipped.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedStory] {
        &self.skipped
    }

    /// Returns per-story failures. Always empty for [`BatchMode::FailFast`].
    #[must_use]
    pub fn failed(&self) -> &[(StoryId, TransitionError)] {
        &self.failed
    }

    /// Returns the ids of transitioned stories.
    #[must_use]
    pub fn transitioned_ids(&self) -> Vec<StoryId> {
        self.transitioned.iter().map(|story| story.id).collect()
    }

    /// Returns the names of transitioned stories.
    #[must_use]
    pub fn transitioned_names(&self) -> Vec<String> {
        self.transitioned
            .iter()
            .map(|story| story.name.clone())
            .collect()
    }
}

/// Errors raised while transitioning stories.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The tracker accepted the update but reports a different state.
    #[error(
        "transition failed for story {story}: requested workflow state {expected}, tracker reports {actual}"
    )]
    VerificationFailure {
        /// Story that failed verification.
        story: StoryId,
        /// Requested workflow state.
        expected: WorkflowStateId,
        /// Workflow state reported after the update.
        actual: WorkflowStateId,
    },

    /// Domain value construction failed.
    #[error(transparent)]
    Domain(#[from] StoryDomainError),

    /// Tracker call failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Result type for transition operations.
pub type TransitionResult<T> = Result<T, TransitionError>;

struct PlannedUpdate {
    story: StoryId,
    state_name: String,
    update: StoryUpdate,
}

enum StateResolution {
    Resolved(PlannedUpdate),
    Missing,
}

/// Runs one future per story and pairs each result with its story.
///
/// In [`BatchMode::FailFast`] the first error drops the remaining futures and
/// is returned; otherwise every story gets its own result.
async fn fan_out<T, F>(
    mode: BatchMode,
    work: impl IntoIterator<Item = (StoryId, F)>,
) -> TransitionResult<Vec<(StoryId, TransitionResult<T>)>>
where
    F: Future<Output = TransitionResult<T>>,
{
    match mode {
        BatchMode::FailFast => {
            try_join_all(
                work.into_iter()
                    .map(|(id, task)| async move { task.await.map(|value| (id, Ok(value))) }),
            )
            .await
        }
        BatchMode::BestEffort => Ok(join_all(
            work.into_iter()
                .map(|(id, task)| async move { (id, task.await) }),
        )
        .await),
    }
}

/// Story transition orchestration service.
#[derive(Clone)]
pub struct TransitionService<T>
where
    T: StoryTracker,
{
    tracker: Arc<T>,
}

impl<T> TransitionService<T>
where
    T: StoryTracker,
{
    /// Creates a transition service over the given tracker.
    #[must_use]
    pub const fn new(tracker: Arc<T>) -> Self {
        Self { tracker }
    }

    /// Moves the requested stories to the target state.
    ///
    /// Stories the tracker does not know and stories whose workflow lacks the
    /// target state are reported as skipped. Every applied update is checked
    /// against the state the tracker reports back.
    ///
    /// # Errors
    ///
    /// In [`BatchMode::FailFast`], returns the first [`TransitionError`] hit
    /// by any story in the batch, including
    /// [`TransitionError::VerificationFailure`].
    pub async fn transition(
        &self,
        request: TransitionRequest,
    ) -> TransitionResult<TransitionReport> {
        let mut report = TransitionReport::default();
        if request.story_ids.is_empty() {
            warn!("no stories to transition");
            return Ok(report);
        }
        debug!(stories = ?request.story_ids, target = %request.target_state, "transitioning stories");

        let loaded = fan_out(
            request.mode,
            request
                .story_ids
                .iter()
                .map(|&id| (id, self.load_story(id))),
        )
        .await?;
        let mut stories = Vec::new();
        for (id, outcome) in loaded {
            match outcome {
                Ok(Some(story)) => stories.push(story),
                Ok(None) => {
                    warn!(story = %id, "could not locate story");
                    report.skipped.push(SkippedStory {
                        id,
                        reason: SkipReason::NotFound,
                    });
                }
                Err(err) => report.failed.push((id, err)),
            }
        }

        let resolved = fan_out(
            request.mode,
            stories
                .iter()
                .map(|story| (story.id, self.resolve_target(story, &request))),
        )
        .await?;
        let mut planned = Vec::new();
        for (id, outcome) in resolved {
            match outcome {
                Ok(StateResolution::Resolved(update)) => planned.push(update),
                Ok(StateResolution::Missing) => {
                    error!(story = %id, state = %request.target_state, "workflow state not found");
                    report.skipped.push(SkippedStory {
                        id,
                        reason: SkipReason::WorkflowStateNotFound {
                            state: request.target_state.clone(),
                        },
                    });
                }
                Err(err) => report.failed.push((id, err)),
            }
        }

        let applied = fan_out(
            request.mode,
            planned.iter().map(|update| (update.story, self.apply(update))),
        )
        .await?;
        for (id, outcome) in applied {
            match outcome {
                Ok(story) => report.transitioned.push(story),
                Err(err) => {
                    warn!(story = %id, error = %err, "story transition failed");
                    report.failed.push((id, err));
                }
            }
        }

        debug!(names = ?report.transitioned_names(), "transition batch finished");
        Ok(report)
    }

    /// Moves every story referenced in a release body to the release state.
    ///
    /// Returns the names of the stories that were moved.
    ///
    /// # Errors
    ///
    /// Returns the first [`TransitionError`] hit by the batch.
    pub async fn release_stories(
        &self,
        extractor: &StoryReferenceExtractor,
        request: ReleaseRequest,
    ) -> TransitionResult<Vec<String>> {
        let story_ids = extractor.extract(&request.body);
        debug!(stories = ?story_ids, "story ids found in release");
        if story_ids.is_empty() {
            warn!("no stories were found in the release");
            return Ok(Vec::new());
        }

        let mut transition = TransitionRequest::new(story_ids, request.target_state);
        if request.update_description {
            transition = transition.with_release_note(ReleaseNote::new(request.release_url));
        }
        let report = self.transition(transition).await?;
        Ok(report.transitioned_names())
    }

    async fn load_story(&self, id: StoryId) -> TransitionResult<Option<StoryRecord>> {
        Ok(self.tracker.fetch_story(id).await?)
    }

    async fn resolve_target(
        &self,
        story: &StoryRecord,
        request: &TransitionRequest,
    ) -> TransitionResult<StateResolution> {
        let workflow = self.tracker.fetch_workflow(story.workflow_id).await?;
        let Some(state) = workflow.state_named(&request.target_state) else {
            return Ok(StateResolution::Missing);
        };

        let mut update = StoryUpdate::to_state(state.id);
        if let Some(note) = &request.release_note
            && let Some(description) = note.amend(&story.description)?
        {
            update = update.with_description(description);
        }
        Ok(StateResolution::Resolved(PlannedUpdate {
            story: story.id,
            state_name: state.name.clone(),
            update,
        }))
    }

    async fn apply(&self, planned: &PlannedUpdate) -> TransitionResult<TransitionedStory> {
        let updated = self
            .tracker
            .update_story(planned.story, &planned.update)
            .await?;
        let expected = planned.update.workflow_state_id;
        if updated.workflow_state_id != expected {
            return Err(TransitionError::VerificationFailure {
                story: planned.story,
                expected,
                actual: updated.workflow_state_id,
            });
        }
        info!(story = %planned.story, state = %planned.state_name, "story transitioned");
        Ok(TransitionedStory {
            id: planned.story,
            name: updated.name,
            state_name: planned.state_name.clone(),
        })
    }
}
