//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or errors. Comparing parsed JSON (not raw
//! strings) avoids false negatives from field-ordering differences.

use armis_client::{
    ArmisClient, ClientConfig, CreatedPolicy, Error, HttpMethod, HttpRequest, HttpResponse, ListEntry, PolicySettings,
    ValidationError,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ArmisClient {
    ArmisClient::new(ClientConfig::new(BASE_URL, "test-key"))
}

fn cases(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_error(name: &str, err: &Error, expected: &Value) {
    match expected["kind"].as_str().unwrap() {
        "Api" => {
            let Error::Api { status, message } = err else {
                panic!("{name}: expected Api error, got {err:?}");
            };
            assert_eq!(u64::from(*status), expected["status"].as_u64().unwrap(), "{name}: status");
            assert_eq!(message, expected["message"].as_str().unwrap(), "{name}: message");
        }
        "Validation" => {
            let field = expected["field"].as_str().unwrap();
            let matched = match err.validation() {
                Some(ValidationError::Name) => field == "Name",
                Some(ValidationError::Description { .. }) => field == "Description",
                Some(ValidationError::RuleType(_)) => field == "RuleType",
                Some(ValidationError::Id) => field == "Id",
                None => false,
            };
            assert!(matched, "{name}: expected {field} validation error, got {err:?}");
        }
        other => panic!("{name}: unknown expected_error kind: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

#[test]
fn lists_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/lists.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c.build_get_lists();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_lists(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, &result.unwrap_err(), expected_error);
        } else {
            let expected: Vec<ListEntry> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: PolicySettings = serde_json::from_value(case["input"].clone()).unwrap();

        let req = match c.build_create_policy(&input) {
            Ok(req) => req,
            Err(err) => {
                assert!(case.get("expected_request").is_none(), "{name}: unexpected {err:?}");
                assert_error(name, &err, &case["expected_error"]);
                continue;
            }
        };
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_create_policy(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, &result.unwrap_err(), expected_error);
        } else {
            let expected: CreatedPolicy = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/get.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();

        let req = match c.build_get_policy(id) {
            Ok(req) => req,
            Err(err) => {
                assert_error(name, &err, &case["expected_error"]);
                continue;
            }
        };
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_policy(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, &result.unwrap_err(), expected_error);
        } else {
            let expected: PolicySettings = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// List policies
// ---------------------------------------------------------------------------

#[test]
fn list_policies_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/list_policies.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c.build_get_all_policies();
        assert_request(name, &req, &case["expected_request"]);

        if let Some(expected_error) = case.get("expected_error") {
            let err = c.parse_get_all_policies(simulated_response(&case)).unwrap_err();
            assert_error(name, &err, expected_error);
            continue;
        }

        let page = c.parse_get_policies_page(simulated_response(&case)).unwrap();
        let cursor = &case["expected_page"];
        for (field, actual) in [
            ("count", &page.count),
            ("next", &page.next),
            ("prev", &page.prev),
            ("total", &page.total),
        ] {
            assert_eq!(actual.as_ref().unwrap_or(&Value::Null), &cursor[field], "{name}: {field}");
        }

        let expected: Vec<PolicySettings> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(page.policies, expected, "{name}: page policies");
        let policies = c.parse_get_all_policies(simulated_response(&case)).unwrap();
        assert_eq!(policies, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();
        let input: PolicySettings = serde_json::from_value(case["input"].clone()).unwrap();

        let req = match c.build_update_policy(&input, id) {
            Ok(req) => req,
            Err(err) => {
                assert_error(name, &err, &case["expected_error"]);
                continue;
            }
        };
        assert_request(name, &req, &case["expected_request"]);

        let policy = c.parse_update_policy(simulated_response(&case)).unwrap();
        let expected: PolicySettings = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(policy, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();

        let req = match c.build_delete_policy(id) {
            Ok(req) => req,
            Err(err) => {
                assert_error(name, &err, &case["expected_error"]);
                continue;
            }
        };
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_delete_policy(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, &result.unwrap_err(), expected_error);
        } else {
            assert_eq!(result.unwrap(), case["expected_result"].as_bool().unwrap(), "{name}: success flag");
        }
    }
}
