//! Recorded reqres.in responses for offline runs.

use restcheck_domain::ResponseSpec;
use restcheck_infrastructure::StubTransport;

const USERS_PAGE_1: &str = include_str!("../fixtures/users_page_1.json");
const USERS_PAGE_2: &str = include_str!("../fixtures/users_page_2.json");
const USER_12: &str = include_str!("../fixtures/user_12.json");

fn recorded(body: &str) -> Result<ResponseSpec, serde_json::Error> {
    let response = ResponseSpec::json(200u16, serde_json::from_str(body)?)
        .with_header("Connection", "keep-alive");
    Ok(response)
}

/// A stub transport answering the suite's requests under `base_url`.
///
/// # Errors
///
/// Returns an error if a recorded payload is not valid JSON.
pub fn offline_transport(base_url: &str) -> Result<StubTransport, serde_json::Error> {
    let base = base_url.trim_end_matches('/');
    Ok(StubTransport::new()
        .get(format!("{base}/api/users?page=1"), recorded(USERS_PAGE_1)?)
        .get(format!("{base}/api/users?page=2"), recorded(USERS_PAGE_2)?)
        .get(format!("{base}/api/users/12"), recorded(USER_12)?))
}
