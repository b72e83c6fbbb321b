//! In-memory integration tests for release-driven transitions.

use super::helpers::{Backends, DONE, backends};
use rstest::rstest;
use storygate::story::{
    domain::{StoryId, StoryReferenceExtractor},
    services::{ReleaseRequest, TransitionService},
};

const RELEASE_URL: &str = "https://github.com/acme/shop/releases/tag/v1.2.0";

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn release_moves_referenced_stories_and_stamps_descriptions(
    backends: Result<Backends, eyre::Report>,
) -> Result<(), eyre::Report> {
    let backends = backends?;
    backends.add_story(11, &[])?;
    backends.add_story(12, &[])?;
    let service = TransitionService::new(backends.tracker.clone());
    let extractor = StoryReferenceExtractor::standard()?;
    let request = ReleaseRequest::new("- sc-11 cart\n- sc-12 totals\n- sc-404 gone", "Done", RELEASE_URL)
        .with_description_update(true);

    let names = service.release_stories(&extractor, request).await?;

    eyre::ensure!(
        names == vec!["Story 11".to_owned(), "Story 12".to_owned()],
        "unexpected names {names:?}"
    );
    for id in [11, 12] {
        eyre::ensure!(backends.state_of(id)? == DONE, "story {id} not done");
        let story = backends
            .tracker
            .story(StoryId::new(id))?
            .ok_or_else(|| eyre::eyre!("story {id} missing"))?;
        eyre::ensure!(
            story.description.contains(RELEASE_URL),
            "story {id} lacks release info"
        );
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn release_without_description_update_keeps_descriptions(
    backends: Result<Backends, eyre::Report>,
) -> Result<(), eyre::Report> {
    let backends = backends?;
    backends.add_story(21, &[])?;
    let service = TransitionService::new(backends.tracker.clone());
    let extractor = StoryReferenceExtractor::standard()?;

    service
        .release_stories(&extractor, ReleaseRequest::new("ch-21", "Done", RELEASE_URL))
        .await?;

    let story = backends
        .tracker
        .story(StoryId::new(21))?
        .ok_or_else(|| eyre::eyre!("story 21 missing"))?;
    eyre::ensure!(story.description.is_empty(), "description was amended");
    eyre::ensure!(backends.state_of(21)? == DONE, "story 21 not done");
    Ok(())
}
