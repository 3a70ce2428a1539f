//! Step definitions that set up the two targets and the request sent to them

use crate::common::world::{HttpDiffWorld, TargetKind};
use cucumber::{given, when};
use tracing::debug;

// === TARGET SETUP ===

#[given(expr = "both targets respond with status {int} and body {string}")]
async fn given_both_respond(world: &mut HttpDiffWorld, status: u16, body: String) {
    for n in [1, 2] {
        let stub = world.stub_mut(n);
        stub.status = status;
        stub.body = body.clone();
    }
}

#[given(expr = "target {int} responds with status {int}")]
async fn given_target_status(world: &mut HttpDiffWorld, n: usize, status: u16) {
    world.stub_mut(n).status = status;
}

#[given(expr = "target {int} responds with body {string}")]
async fn given_target_body(world: &mut HttpDiffWorld, n: usize, body: String) {
    world.stub_mut(n).body = body;
}

#[given(expr = "target {int} sends header {string} with value {string}")]
async fn given_target_header(world: &mut HttpDiffWorld, n: usize, name: String, value: String) {
    world.stub_mut(n).headers.push((name, value));
}

#[given(expr = "both targets send header {string} with value {string}")]
async fn given_both_header(world: &mut HttpDiffWorld, name: String, value: String) {
    for n in [1, 2] {
        world.stub_mut(n).headers.push((name.clone(), value.clone()));
    }
}

#[given(expr = "target {int} is unreachable")]
async fn given_target_unreachable(world: &mut HttpDiffWorld, n: usize) {
    world.kinds[HttpDiffWorld::target(n).as_usize()] = TargetKind::Unreachable;
}

#[given(expr = "only target {int} is given")]
async fn given_single_target(world: &mut HttpDiffWorld, n: usize) {
    let other = HttpDiffWorld::target(n).other();
    world.kinds[other.as_usize()] = TargetKind::Omitted;
}

// === REQUEST OPTIONS ===

#[given(expr = "I ignore headers {string}")]
async fn given_ignored_headers(world: &mut HttpDiffWorld, list: String) {
    world.ignored.push(list);
}

#[given(expr = "I use the flags {string}")]
async fn given_flags(world: &mut HttpDiffWorld, flags: String) {
    world
        .cli_flags
        .extend(flags.split_whitespace().map(str::to_string));
}

#[given(expr = "I send a {word} request with body {string}")]
async fn given_method_and_body(world: &mut HttpDiffWorld, method: String, body: String) {
    world
        .cli_flags
        .extend(["--method".to_string(), method, "--body".to_string(), body]);
}

#[given(expr = "I send the header {string}")]
async fn given_request_header(world: &mut HttpDiffWorld, header: String) {
    world.cli_flags.extend(["--header".to_string(), header]);
}

// === EXECUTION ===

#[when("I compare the targets")]
async fn when_compare(world: &mut HttpDiffWorld) {
    debug!("Comparing targets");
    world.run_comparison().await;
}
