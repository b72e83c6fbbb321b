//! When steps for story transition BDD scenarios.

use super::world::{StoryTransitionWorld, run_async};
use rstest_bdd_macros::when;
use serde_json::json;

#[when(r#"a "{event}" event with action "{action}" references "{reference}""#)]
fn dispatch_event(
    world: &mut StoryTransitionWorld,
    event: String,
    action: String,
    reference: String,
) -> Result<(), eyre::Report> {
    let payload = json!({
        "action": action,
        "repository": { "full_name": "acme/shop" },
        "pull_request": {
            "number": 1,
            "title": format!("{reference} scenario change"),
            "body": "",
            "head": { "ref": "feature/scenario" }
        }
    });
    let dispatcher = world.dispatcher()?;
    let result = run_async(dispatcher.dispatch(&event, &payload));
    world.last_dispatch_result = Some(result);
    Ok(())
}
