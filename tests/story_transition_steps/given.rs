//! Given steps for story transition BDD scenarios.

use super::world::{IN_DEVELOPMENT, StoryTransitionWorld, WORKFLOW};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use storygate::{
    review::domain::{PullRequestLocator, ReviewRecord, ReviewState},
    story::domain::{LinkedPullRequest, StoryBranch, StoryId, StoryRecord},
};

fn pr_url(number: u64) -> String {
    format!("https://github.com/acme/shop/pull/{number}")
}

fn add_branch(
    world: &StoryTransitionWorld,
    story_id: u64,
    pull_requests: &[u64],
) -> Result<(), eyre::Report> {
    let id = StoryId::new(story_id);
    let mut story = world.tracker.story(id)?.unwrap_or_else(|| StoryRecord {
        id,
        name: format!("Story {story_id}"),
        description: String::new(),
        workflow_id: WORKFLOW,
        workflow_state_id: IN_DEVELOPMENT,
        branches: Vec::new(),
    });
    story.branches.push(StoryBranch::new(
        format!("sc-{story_id}-{}", story.branches.len()),
        pull_requests
            .iter()
            .map(|&number| LinkedPullRequest::open(number, pr_url(number)))
            .collect(),
    ));
    world
        .tracker
        .insert_story(story)
        .wrap_err("store scenario story")
}

fn store_reviews(world: &StoryTransitionWorld, number: u64) -> Result<(), eyre::Report> {
    let reviews = world
        .pending_reviews
        .iter()
        .filter(|(pr, _)| *pr == number)
        .map(|(_, review)| review.clone())
        .collect();
    let locator = PullRequestLocator::new("acme", "shop", number)?;
    world
        .code_host
        .set_reviews(locator, reviews)
        .wrap_err("store scenario reviews")
}

#[given("story {story_id:u64} has a branch with open pull request {number:u64}")]
fn story_has_branch(
    world: &mut StoryTransitionWorld,
    story_id: u64,
    number: u64,
) -> Result<(), eyre::Report> {
    add_branch(world, story_id, &[number])
}

#[given("story {story_id:u64} has a branch with open pull requests {first:u64} and {second:u64}")]
fn story_has_branch_with_two_pull_requests(
    world: &mut StoryTransitionWorld,
    story_id: u64,
    first: u64,
    second: u64,
) -> Result<(), eyre::Report> {
    add_branch(world, story_id, &[first, second])
}

#[given("pull request {number:u64} has no reviews")]
fn pull_request_has_no_reviews(
    world: &mut StoryTransitionWorld,
    number: u64,
) -> Result<(), eyre::Report> {
    store_reviews(world, number)
}

#[given(r#"pull request {number:u64} has a review with state "{state}" by "{author}""#)]
fn pull_request_has_review(
    world: &mut StoryTransitionWorld,
    number: u64,
    state: String,
    author: String,
) -> Result<(), eyre::Report> {
    let review_state: ReviewState = serde_json::from_value(serde_json::Value::String(state))
        .wrap_err("parse review state")?;
    world
        .pending_reviews
        .push((number, ReviewRecord::new(author, review_state)));
    store_reviews(world, number)
}

#[given("the tracker ignores updates to story {story_id:u64}")]
fn tracker_ignores_updates(
    world: &mut StoryTransitionWorld,
    story_id: u64,
) -> Result<(), eyre::Report> {
    world
        .tracker
        .ignore_updates_for(StoryId::new(story_id), IN_DEVELOPMENT)
        .wrap_err("configure tracker override")
}
