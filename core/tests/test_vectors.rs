//! Verify request framing and response parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Request vectors pin the exact wire bytes, so header order and casing are
//! checked too. Response vectors cover the parser's split rules and its
//! error cases.

use sockhttp_core::response::parse_response;
use sockhttp_core::{
    get_body, get_code, get_headers, resolve, HttpRequest, ParseError, Params, ParsedResponse,
    Response,
};

fn params(value: &serde_json::Value) -> Option<Params> {
    value.as_object().map(|obj| {
        obj.iter()
            .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let url = case["url"].as_str().unwrap();

        // Verify resolve
        let target = resolve(url).unwrap();
        let expected = &case["expected_target"];
        assert_eq!(target.host, expected["host"].as_str().unwrap(), "{name}: host");
        assert_eq!(target.port as u64, expected["port"].as_u64().unwrap(), "{name}: port");
        assert_eq!(target.path, expected["path"].as_str().unwrap(), "{name}: path");

        // Verify framing
        let req = match case["method"].as_str().unwrap() {
            "GET" => HttpRequest::get(&target),
            "POST" => HttpRequest::post(&target, params(&case["params"]).as_ref()).unwrap(),
            other => panic!("{name}: unknown method: {other}"),
        };
        let wire = String::from_utf8(req.to_bytes()).unwrap();
        assert_eq!(wire, case["expected_wire"].as_str().unwrap(), "{name}: wire");

        if let Some(body) = &req.body {
            let (_, sent_body) = wire.split_once("\r\n\r\n").unwrap();
            assert_eq!(sent_body, body, "{name}: body");
            assert!(
                wire.contains(&format!("Content-length: {}\r\n", body.len())),
                "{name}: content length"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let text = case["raw"].as_str().unwrap();

        if let Some(expected_error) = case.get("expected_error") {
            let err = ParsedResponse::parse(text).unwrap_err();
            match expected_error.as_str().unwrap() {
                "MissingDelimiter" => assert_eq!(err, ParseError::MissingDelimiter, "{name}"),
                "MalformedStatusLine" => {
                    assert!(matches!(err, ParseError::MalformedStatusLine(_)), "{name}: {err:?}")
                }
                "InvalidStatusCode" => {
                    assert!(matches!(err, ParseError::InvalidStatusCode(_)), "{name}: {err:?}")
                }
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            let fallback = Response::from_error(&parse_response(text).unwrap_err());
            assert_eq!(fallback, Response::new(404, "File not found"), "{name}: fallback");
            continue;
        }

        assert_eq!(get_headers(text).unwrap(), case["expected_headers"].as_str().unwrap(), "{name}: headers");
        assert_eq!(get_body(text).unwrap(), case["expected_body"].as_str().unwrap(), "{name}: body");
        assert_eq!(
            get_code(text).unwrap() as u64,
            case["expected_code"].as_u64().unwrap(),
            "{name}: code"
        );

        let parsed = ParsedResponse::parse(text).unwrap();
        assert_eq!(parsed.status_code as u64, case["expected_code"].as_u64().unwrap(), "{name}: parsed code");
        assert_eq!(parsed.body, case["expected_body"].as_str().unwrap(), "{name}: parsed body");
    }
}
