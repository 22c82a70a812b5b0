//! Unit tests for the boundary lint.

use std::path::PathBuf;

use rstest::rstest;

use super::*;

fn lint_one(file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
    lint_sources(&[LintSource {
        file: PathBuf::from(file),
        contents: contents.to_owned(),
    }])
}

#[rstest]
#[case(
    "inbound/bus/consumer.rs",
    "use crate::domain::EventDispatcher; fn run(d: EventDispatcher) { let _ = d; }"
)]
#[case(
    "outbound/http/transport.rs",
    "use reqwest::Client; use crate::domain::ports::CallbackRequest; fn f(_: Client, _: CallbackRequest) {}"
)]
#[case(
    "domain/dispatcher.rs",
    "use fspiop::HttpMethod; fn f(inbound: HttpMethod) { let config = inbound; let _ = config; }"
)]
#[case(
    "domain/executor.rs",
    "#[cfg(test)] mod tests { #[tokio::test] async fn t() {} }"
)]
fn allowed_imports_pass(#[case] file: &str, #[case] contents: &str) {
    let result = lint_one(file, contents);
    assert!(result.is_ok(), "result: {result:?}");
}

#[rstest]
#[case(
    "domain/executor.rs",
    "use crate::outbound::http::ReqwestCallbackTransport;",
    "domain must not depend on crate::outbound"
)]
#[case(
    "domain/wiring.rs",
    "fn f() { let _ = crate::config::TranslatorSettings::default(); }",
    "domain must not depend on crate::config"
)]
#[case(
    "domain/signing_gate.rs",
    "use hmac::Mac;",
    "domain must not use the `hmac` crate"
)]
#[case(
    "domain/endpoint_resolver.rs",
    "fn f() -> reqwest::Client { reqwest::Client::new() }",
    "domain must not use the `reqwest` crate"
)]
#[case(
    "inbound/bus/channel.rs",
    "use translator::outbound::escalation::ChannelOperatorErrorPublisher;",
    "inbound must not depend on crate::outbound"
)]
#[case(
    "inbound/bus/envelope.rs",
    "use cap_std::fs::Dir;",
    "inbound must not use the `cap_std` crate"
)]
#[case(
    "outbound/escalation.rs",
    "use super::super::inbound::bus::EventSender;",
    "outbound must not depend on crate::inbound"
)]
#[case(
    "outbound/directory/static_file.rs",
    "use crate::bootstrap::Service;",
    "outbound must not depend on crate::bootstrap"
)]
fn crossings_are_reported(#[case] file: &str, #[case] contents: &str, #[case] expected: &str) {
    let Err(ArchitectureLintError::Violations(violations)) = lint_one(file, contents) else {
        panic!("expected a violation for {file}");
    };
    assert!(
        violations
            .iter()
            .any(|violation| violation.file == PathBuf::from(file) && violation.message == expected),
        "got: {violations:?}"
    );
}

#[rstest]
fn files_outside_the_layers_are_rejected() {
    let result = lint_one("main.rs", "fn main() {}");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}

#[rstest]
fn unparsable_sources_are_rejected() {
    let result = lint_one("domain/broken.rs", "fn (");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}
