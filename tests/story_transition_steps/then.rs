//! Then steps for story transition BDD scenarios.

use super::world::StoryTransitionWorld;
use rstest_bdd_macros::then;
use storygate::{
    event::{domain::EventError, services::DispatchError},
    story::{domain::StoryId, services::TransitionError},
};

fn dispatch_result(
    world: &StoryTransitionWorld,
) -> Result<&Result<Vec<StoryId>, DispatchError>, eyre::Report> {
    world
        .last_dispatch_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing dispatch result"))
}

#[then("the dispatch reports story {story_id:u64}")]
fn dispatch_reports_story(world: &StoryTransitionWorld, story_id: u64) -> Result<(), eyre::Report> {
    match dispatch_result(world)? {
        Ok(updated) if updated == &vec![StoryId::new(story_id)] => Ok(()),
        other => Err(eyre::eyre!("expected [{story_id}], got {other:?}")),
    }
}

#[then("no story is reported as updated")]
fn no_story_updated(world: &StoryTransitionWorld) -> Result<(), eyre::Report> {
    match dispatch_result(world)? {
        Ok(updated) if updated.is_empty() => Ok(()),
        other => Err(eyre::eyre!("expected no updates, got {other:?}")),
    }
}

#[then(r#"story {story_id:u64} is in state "{state}""#)]
fn story_is_in_state(
    world: &StoryTransitionWorld,
    story_id: u64,
    state: String,
) -> Result<(), eyre::Report> {
    let expected = StoryTransitionWorld::state_id(&state)?;
    let story = world
        .tracker
        .story(StoryId::new(story_id))?
        .ok_or_else(|| eyre::eyre!("story {story_id} missing"))?;

    if story.workflow_state_id != expected {
        return Err(eyre::eyre!(
            "expected story {story_id} in {state} ({expected}), found {}",
            story.workflow_state_id
        ));
    }
    Ok(())
}

#[then("the dispatch fails verification for story {story_id:u64}")]
fn dispatch_fails_verification(
    world: &StoryTransitionWorld,
    story_id: u64,
) -> Result<(), eyre::Report> {
    let result = dispatch_result(world)?;
    if !matches!(
        result,
        Err(DispatchError::Transition(TransitionError::VerificationFailure { story, .. }))
            if *story == StoryId::new(story_id)
    ) {
        return Err(eyre::eyre!(
            "expected verification failure for {story_id}, got {result:?}"
        ));
    }
    Ok(())
}

#[then("the dispatch fails with an invalid event error")]
fn dispatch_fails_with_invalid_event(world: &StoryTransitionWorld) -> Result<(), eyre::Report> {
    let result = dispatch_result(world)?;
    if !matches!(
        result,
        Err(DispatchError::Event(EventError::InvalidEventOrAction { .. }))
    ) {
        return Err(eyre::eyre!(
            "expected InvalidEventOrAction error, got {result:?}"
        ));
    }
    Ok(())
}
