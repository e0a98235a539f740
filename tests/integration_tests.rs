//! Integration tests for the DateTime MCP Server
//!
//! These tests drive the public server API with JSON-RPC messages, both
//! message-by-message and through the line-framed serve loop.

use serde_json::{json, Value};

use datetime_mcp_server::config::Config;
use datetime_mcp_server::mcp::server::{McpServer, ShutdownReason};
use datetime_mcp_server::mcp::types::JsonRpcResponse;

/// Helper to create a JSON-RPC request
fn make_request(id: i64, method: &str, params: Option<Value>) -> String {
    let mut request = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
    });
    if let Some(p) = params {
        request["params"] = p;
    }
    request.to_string()
}

fn new_server() -> McpServer {
    McpServer::new(&Config::from_lookup(|_| None).unwrap())
}

async fn call(server: &mut McpServer, id: i64, method: &str, params: Option<Value>) -> Value {
    let response = server
        .handle_message(&make_request(id, method, params))
        .await
        .expect("request should be answered");
    serde_json::to_value(response).unwrap()
}

async fn call_datetime(server: &mut McpServer, arguments: Value) -> Value {
    call(
        server,
        1,
        "tools/call",
        Some(json!({"name": "get_current_datetime", "arguments": arguments})),
    )
    .await
}

/// Parse the JSON report carried in a successful tool result
fn report(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

fn is_iso_millis(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 24
        && b[4] == b'-'
        && b[7] == b'-'
        && b[10] == b'T'
        && b[13] == b':'
        && b[16] == b':'
        && b[19] == b'.'
        && b[23] == b'Z'
        && [0..4, 5..7, 8..10, 11..13, 14..16, 17..19, 20..23]
            .into_iter()
            .all(|r| b[r].iter().all(u8::is_ascii_digit))
}

mod list_tools_tests {
    use super::*;

    #[tokio::test]
    async fn test_single_descriptor() {
        let mut server = new_server();
        let response = call(&mut server, 1, "tools/list", None).await;
        let tools = response["result"]["tools"].as_array().unwrap();

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "get_current_datetime");
        assert_eq!(tools[0]["description"], "Get the current date and time in various formats");
        assert_eq!(
            tools[0]["inputSchema"]["properties"]["format"]["enum"],
            json!(["iso", "locale", "unix"])
        );
        assert_eq!(tools[0]["inputSchema"]["additionalProperties"], false);
    }

    #[tokio::test]
    async fn test_list_is_idempotent() {
        let mut server = new_server();
        let first = call(&mut server, 1, "tools/list", None).await;
        call_datetime(&mut server, json!({"format": "unix"})).await;
        let second = call(&mut server, 2, "tools/list", None).await;

        assert_eq!(first["result"], second["result"]);
    }
}

mod call_tool_tests {
    use super::*;

    #[tokio::test]
    async fn test_each_format_is_echoed() {
        let mut server = new_server();
        for format in ["iso", "locale", "unix"] {
            let response = call_datetime(&mut server, json!({"format": format})).await;
            assert!(response["result"].get("isError").is_none());
            let report = report(&response);
            assert_eq!(report["format"], format);
            assert_eq!(report["timezone"], "UTC");
        }
    }

    #[tokio::test]
    async fn test_default_format_is_iso() {
        let mut server = new_server();
        for (arguments, label) in [
            (json!({}), "iso"),
            (json!({"format": "bogus"}), "bogus"),
            (Value::Null, "iso"),
        ] {
            let report = report(&call_datetime(&mut server, arguments).await);
            assert!(is_iso_millis(report["datetime"].as_str().unwrap()), "{}", report);
            assert_eq!(report["format"], label);
        }
    }

    #[tokio::test]
    async fn test_missing_arguments() {
        let mut server = new_server();
        let response = call(
            &mut server,
            1,
            "tools/call",
            Some(json!({"name": "get_current_datetime"})),
        )
        .await;
        let report = report(&response);
        assert!(is_iso_millis(report["datetime"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn test_unix_matches_timestamp() {
        let mut server = new_server();
        let report = report(&call_datetime(&mut server, json!({"format": "unix"})).await);
        let seconds: i64 = report["datetime"].as_str().unwrap().parse().unwrap();
        let millis = report["timestamp"].as_i64().unwrap();
        assert_eq!(seconds, millis.div_euclid(1000));
    }

    #[tokio::test]
    async fn test_locale_with_timezone() {
        let mut server = new_server();
        let locale = report(
            &call_datetime(&mut server, json!({"format": "locale", "timezone": "Europe/London"})).await,
        );
        let datetime = locale["datetime"].as_str().unwrap();

        assert!(!is_iso_millis(datetime));
        assert!(datetime.contains(" at "));
        assert!(datetime.ends_with(" GMT") || datetime.ends_with(" GMT+1"), "{}", datetime);
        assert_eq!(locale["timezone"], "Europe/London");
    }

    #[tokio::test]
    async fn test_lowercase_timezone() {
        let mut server = new_server();
        let response =
            call_datetime(&mut server, json!({"format": "locale", "timezone": "america/new_york"})).await;

        assert!(response["result"].get("isError").is_none());
        let report = report(&response);
        let datetime = report["datetime"].as_str().unwrap();
        assert!(datetime.ends_with(" EST") || datetime.ends_with(" EDT"), "{}", datetime);
        assert_eq!(report["timezone"], "america/new_york");
    }

    #[tokio::test]
    async fn test_invalid_timezone_is_recovered() {
        let mut server = new_server();
        let response =
            call_datetime(&mut server, json!({"format": "locale", "timezone": "Not/ARealZone"})).await;

        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["isError"], true);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Error getting date and time:"));
        assert!(text.contains("Not/ARealZone"));
    }

    #[tokio::test]
    async fn test_iso_ignores_bad_timezone() {
        let mut server = new_server();
        let response =
            call_datetime(&mut server, json!({"format": "iso", "timezone": "Not/ARealZone"})).await;
        let report = report(&response);
        assert_eq!(report["timezone"], "Not/ARealZone");
        assert!(is_iso_millis(report["datetime"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_protocol_fault() {
        let mut server = new_server();
        let response = call(
            &mut server,
            5,
            "tools/call",
            Some(json!({"name": "nonexistent_tool", "arguments": {}})),
        )
        .await;

        assert!(response.get("result").is_none());
        assert_eq!(response["id"], 5);
        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["error"]["message"], "Unknown tool: nonexistent_tool");
    }

    #[tokio::test]
    async fn test_pretty_printed_payload() {
        let mut server = new_server();
        let response = call_datetime(&mut server, json!({"format": "unix"})).await;
        let text = response["result"]["content"][0]["text"].as_str().unwrap();

        assert!(text.starts_with("{\n  \"datetime\": "));
        let keys: Vec<usize> = ["\"datetime\"", "\"format\"", "\"timezone\"", "\"timestamp\""]
            .iter()
            .map(|k| text.find(k).unwrap())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }
}

mod protocol_tests {
    use super::*;

    #[tokio::test]
    async fn test_ping() {
        let mut server = new_server();
        let response = call(&mut server, 3, "ping", None).await;
        assert_eq!(response["result"], json!({}));
    }

    #[tokio::test]
    async fn test_parse_error() {
        let mut server = new_server();
        let response = server.handle_message("{not json").await.unwrap();
        let value = serde_json::to_value(response).unwrap();
        assert!(value["id"].is_null());
        assert_eq!(value["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_notifications_are_not_answered() {
        let mut server = new_server();
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":1}}"#)
            .await;
        assert!(response.is_none());
    }
}

mod serve_loop_tests {
    use super::*;

    fn parse_lines(out: &[u8]) -> Vec<JsonRpcResponse> {
        std::str::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_session_until_end_of_input() {
        let input = [
            make_request(1, "initialize", Some(json!({"protocolVersion": "2024-11-05", "capabilities": {}}))),
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#.to_string(),
            String::new(),
            make_request(2, "tools/list", None),
            make_request(3, "tools/call", Some(json!({"name": "get_current_datetime", "arguments": {"format": "unix"}}))),
        ]
        .join("\n")
            + "\n";

        let mut server = new_server();
        let mut out: Vec<u8> = Vec::new();
        let reason = server
            .serve(input.as_bytes(), &mut out, std::future::pending::<()>())
            .await;

        assert_eq!(tokio_test::assert_ok!(reason), ShutdownReason::EndOfInput);
        assert!(server.is_initialized());

        let responses = parse_lines(&out);
        assert_eq!(responses.len(), 3);
        assert!(responses.iter().all(|r| r.error.is_none()));
        assert_eq!(
            responses[1].result.as_ref().unwrap()["tools"][0]["name"],
            "get_current_datetime"
        );
    }

    #[tokio::test]
    async fn test_interrupt_stops_serving() {
        let input = make_request(1, "tools/list", None) + "\n";

        let mut server = new_server();
        let mut out: Vec<u8> = Vec::new();
        let reason = server
            .serve(input.as_bytes(), &mut out, std::future::ready(()))
            .await;

        assert_eq!(tokio_test::assert_ok!(reason), ShutdownReason::Interrupted);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_fault_does_not_stop_serving() {
        let input = [
            "garbage".to_string(),
            make_request(1, "tools/call", Some(json!({"name": "nope"}))),
            make_request(2, "ping", None),
        ]
        .join("\n");

        let mut server = new_server();
        let mut out: Vec<u8> = Vec::new();
        tokio_test::assert_ok!(
            server
                .serve(input.as_bytes(), &mut out, std::future::pending::<()>())
                .await
        );

        let responses = parse_lines(&out);
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].error.as_ref().unwrap().code, -32700);
        assert_eq!(responses[1].error.as_ref().unwrap().code, -32601);
        assert!(responses[2].result.is_some());
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_serving() {
        let mut input = b"\xff\xfe\n".to_vec();
        input.extend_from_slice(make_request(1, "ping", None).as_bytes());
        input.push(b'\n');

        let mut server = new_server();
        let mut out: Vec<u8> = Vec::new();
        let reason = server
            .serve(input.as_slice(), &mut out, std::future::pending::<()>())
            .await;

        assert_eq!(tokio_test::assert_ok!(reason), ShutdownReason::EndOfInput);

        let responses = parse_lines(&out);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].error.as_ref().unwrap().code, -32700);
        assert!(responses[0].id.is_none());
        assert_eq!(responses[1].result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_null_id_is_answered() {
        let input = r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#.to_string() + "\n";

        let mut server = new_server();
        let mut out: Vec<u8> = Vec::new();
        tokio_test::assert_ok!(
            server
                .serve(input.as_bytes(), &mut out, std::future::pending::<()>())
                .await
        );

        let responses = parse_lines(&out);
        assert_eq!(responses.len(), 1);
        assert!(responses[0].id.is_none());
        assert!(responses[0].error.is_none());
    }
}
