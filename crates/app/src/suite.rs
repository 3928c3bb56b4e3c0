//! The reqres.in check suite.
//!
//! Each function builds one scenario against the public demo API at
//! `https://reqres.in`. Paths are relative, so the suite also runs against
//! any base URL serving the same payloads.

use restcheck_application::{Scenario, ScenarioReport, ScenarioRunner, Step, Transport};
use restcheck_domain::Assertion;

/// `(page, first email on that page)` rows for the query parameter scenario.
pub const QUERY_PARAMETER_ROWS: [(i64, &str); 2] = [
    (1, "george.bluth@reqres.in"),
    (2, "michael.lawson@reqres.in"),
];

/// Status, content type, a header and a body field of the users page.
#[must_use]
pub fn validate_get_request() -> Scenario {
    Scenario::new("validate get request").step(
        Step::get("users page 2", "/api/users?page=2")
            .expect_status(200u16)
            .expect_field("total_pages", 2)
            .expect(Assertion::content_type("json"))
            .expect(Assertion::header("Connection", "keep-alive")),
    )
}

/// Checks written to fail against the real API, to show failure output.
#[must_use]
pub fn failure_output() -> Scenario {
    Scenario::new("failure output").step(
        Step::get("users page 2", "/api/users?page=2")
            .expect_status(400u16)
            .expect_field("total_pages", 100),
    )
}

/// First email of a users page selected by query parameter.
#[must_use]
pub fn query_parameter(row: &(i64, &str)) -> Scenario {
    let (page, email) = *row;
    Scenario::new(format!("query parameter page={page}")).step(
        Step::get("users page", "/api/users")
            .query_param("page", page)
            .expect_field("data.email[0]", email),
    )
}

/// Resource name substituted as a path segment in front of a query string.
#[must_use]
pub fn path_parameter() -> Scenario {
    Scenario::new("path parameter").step(
        Step::get("users via path parameter", "/api/{path_parameter}?page=2")
            .path_param("path_parameter", "users")
            .expect_status(200u16),
    )
}

/// The user count from one response is the user id of the next request.
#[must_use]
pub fn pass_parameters_between_steps() -> Scenario {
    Scenario::new("pass parameters between steps")
        .step(Step::get("count users", "/api/users?page=2").bind("total", "total"))
        .step(
            Step::get("last user", "/api/users/{total}")
                .path_var("total", "total")
                .expect_field("data.first_name", "Rachel"),
        )
}

/// Every fixed scenario, in run order.
#[must_use]
pub fn scenarios() -> Vec<Scenario> {
    vec![
        validate_get_request(),
        failure_output(),
        path_parameter(),
        pass_parameters_between_steps(),
    ]
}

/// Runs the whole suite: the fixed scenarios, then one scenario per query
/// parameter row.
pub async fn run_suite<T: Transport>(runner: &ScenarioRunner<T>) -> Vec<ScenarioReport> {
    let mut reports = runner.run_all(&scenarios()).await;
    reports.extend(runner.run_table(&QUERY_PARAMETER_ROWS, query_parameter).await);
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use restcheck_application::scenario::ParamSource;

    #[test]
    fn test_scenario_names_are_unique() {
        let mut names: Vec<String> = scenarios().into_iter().map(|s| s.name).collect();
        names.extend(QUERY_PARAMETER_ROWS.iter().map(|row| query_parameter(row).name));
        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count);
    }

    #[test]
    fn test_chaining_scenario_references_bound_variable() {
        let scenario = pass_parameters_between_steps();
        assert_eq!(scenario.steps[0].bindings[0].variable, "total");
        assert_eq!(
            scenario.steps[1].params[0].source,
            ParamSource::Variable("total".to_string())
        );
    }

    #[test]
    fn test_failure_output_checks() {
        assert_eq!(failure_output().assertion_count(), 2);
        assert_eq!(validate_get_request().assertion_count(), 4);
    }
}
