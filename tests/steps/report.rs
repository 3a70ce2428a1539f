//! Step definitions that check the outcome, the report and the artifacts

use crate::common::world::HttpDiffWorld;
use cucumber::then;

#[then(expr = "the outcome should be {string}")]
async fn then_outcome(world: &mut HttpDiffWorld, label: String) {
    let outcome = world.outcome.as_ref().expect("No comparison outcome");
    assert_eq!(outcome.label(), label, "Output was:\n{}", world.output);
}

#[then(expr = "the exit code should be {int}")]
async fn then_exit_code(world: &mut HttpDiffWorld, code: i32) {
    assert_eq!(world.exit_code(), code);
}

#[then(expr = "the output should contain {string}")]
async fn then_output_contains(world: &mut HttpDiffWorld, text: String) {
    assert!(
        world.output.contains(&text),
        "Expected {text:?} in output:\n{}",
        world.output
    );
}

#[then(expr = "the output should not contain {string}")]
async fn then_output_lacks(world: &mut HttpDiffWorld, text: String) {
    assert!(
        !world.output.contains(&text),
        "Did not expect {text:?} in output:\n{}",
        world.output
    );
}

#[then(expr = "the output should mention target {int}")]
async fn then_output_mentions_target(world: &mut HttpDiffWorld, n: usize) {
    let prefix = format!("{n}: ");
    assert!(world.output.contains(&prefix), "Output was:\n{}", world.output);
}

#[then(expr = "{int} body file(s) should be written")]
async fn then_body_files(world: &mut HttpDiffWorld, count: usize) {
    assert_eq!(world.artifact_count(), count);
}

#[then(expr = "the configuration error should be {string}")]
async fn then_config_error(world: &mut HttpDiffWorld, message: String) {
    assert_eq!(world.config_error.as_deref(), Some(message.as_str()));
}

#[then(expr = "the JSON report should have outcome {string}")]
async fn then_json_outcome(world: &mut HttpDiffWorld, label: String) {
    let value: serde_json::Value =
        serde_json::from_str(&world.output).expect("Output is not JSON");
    assert_eq!(value["outcome"], label);
}

#[then(expr = "target {int} should have received a {word} request with body {string}")]
async fn then_target_received(world: &mut HttpDiffWorld, n: usize, method: String, body: String) {
    let requests = world
        .server(n)
        .received_requests()
        .await
        .expect("Request recording is disabled");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method.as_str(), method);
    assert_eq!(String::from_utf8_lossy(&requests[0].body), body);
}

#[then(expr = "target {int} should have received header {string} with value {string}")]
async fn then_target_received_header(
    world: &mut HttpDiffWorld,
    n: usize,
    name: String,
    value: String,
) {
    let requests = world
        .server(n)
        .received_requests()
        .await
        .expect("Request recording is disabled");
    let received = requests[0]
        .headers
        .get(name.as_str())
        .and_then(|v| v.to_str().ok());
    assert_eq!(received, Some(value.as_str()));
}
