//! In-memory integration tests for pull request event dispatch.

use super::helpers::{
    Backends, FEATURE_QA, IN_DEVELOPMENT, QA_LOGIN, TEST_FAIL, backends, pull_request_event,
};
use rstest::rstest;
use storygate::{
    event::services::DispatchError,
    review::domain::{CommitSnapshot, ReviewRecord, ReviewState},
    story::{domain::StoryId, services::TransitionError},
};

fn timestamp(raw: &str) -> Result<chrono::DateTime<chrono::Utc>, eyre::Report> {
    Ok(raw.parse()?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn opened_pull_request_moves_gated_story_to_feature_qa(
    backends: Result<Backends, eyre::Report>,
) -> Result<(), eyre::Report> {
    let backends = backends?;
    backends.add_story(500, &[1])?;
    backends.set_reviews(1, Vec::new())?;

    let updated = backends
        .dispatcher()?
        .dispatch("pull_request", &pull_request_event("opened", "sc-500 Checkout"))
        .await?;

    eyre::ensure!(updated == vec![StoryId::new(500)], "unexpected updates {updated:?}");
    eyre::ensure!(backends.state_of(500)? == FEATURE_QA, "story 500 not in feature QA");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn qa_rejection_on_one_of_two_pull_requests_fails_the_story(
    backends: Result<Backends, eyre::Report>,
) -> Result<(), eyre::Report> {
    let backends = backends?;
    let commit = CommitSnapshot::new("Checkout totals", Some(timestamp("2024-03-01T10:00:00Z")?));
    backends.add_story(600, &[1, 2])?;
    backends.set_reviews(
        1,
        vec![
            ReviewRecord::new(QA_LOGIN, ReviewState::Approved)
                .published(timestamp("2024-03-02T10:00:00Z")?)
                .with_latest_commit(commit.clone()),
        ],
    )?;
    backends.set_reviews(
        2,
        vec![
            ReviewRecord::new(QA_LOGIN, ReviewState::ChangesRequested)
                .published(timestamp("2024-03-02T11:00:00Z")?)
                .with_latest_commit(commit),
        ],
    )?;

    let updated = backends
        .dispatcher()?
        .dispatch(
            "pull_request_review",
            &pull_request_event("submitted", "sc-600 Checkout"),
        )
        .await?;

    eyre::ensure!(updated == vec![StoryId::new(600)], "unexpected updates {updated:?}");
    eyre::ensure!(backends.state_of(600)? == TEST_FAIL, "story 600 not in test fail");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mismatched_update_response_fails_with_verification_error(
    backends: Result<Backends, eyre::Report>,
) -> Result<(), eyre::Report> {
    let backends = backends?;
    backends.add_story(700, &[3])?;
    backends.set_reviews(3, Vec::new())?;
    backends
        .tracker
        .ignore_updates_for(StoryId::new(700), IN_DEVELOPMENT)?;

    let result = backends
        .dispatcher()?
        .dispatch("pull_request", &pull_request_event("opened", "sc-700"))
        .await;

    match result {
        Err(DispatchError::Transition(TransitionError::VerificationFailure { story, .. })) => {
            eyre::ensure!(story == StoryId::new(700), "wrong story {story}");
        }
        other => eyre::bail!("expected verification failure, got {other:?}"),
    }
    eyre::ensure!(
        backends.state_of(700)? == IN_DEVELOPMENT,
        "story 700 should keep its state"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn synchronize_with_wip_commit_leaves_story_alone(
    backends: Result<Backends, eyre::Report>,
) -> Result<(), eyre::Report> {
    let backends = backends?;
    backends.add_story(900, &[1])?;
    backends.set_reviews(
        1,
        vec![
            ReviewRecord::new(QA_LOGIN, ReviewState::ChangesRequested)
                .published(timestamp("2024-03-01T09:00:00Z")?)
                .with_latest_commit(CommitSnapshot::new(
                    "WIP address QA feedback",
                    Some(timestamp("2024-03-01T10:00:00Z")?),
                )),
        ],
    )?;

    let updated = backends
        .dispatcher()?
        .dispatch("pull_request", &pull_request_event("synchronize", "sc-900"))
        .await?;

    eyre::ensure!(updated.is_empty(), "unexpected updates {updated:?}");
    eyre::ensure!(backends.state_of(900)? == IN_DEVELOPMENT, "story 900 moved");
    Ok(())
}
