use serde_json::{json, Value};
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BINARY: &str = env!("CARGO_BIN_EXE_cstools");
const API: &str = "/callosum/v1/tspublic/v1";

async fn run_cstools(server: &MockServer, cwd: &Path, args: &[&str]) -> Output {
    Command::new(BINARY)
        .args(args)
        .current_dir(cwd)
        .env("HOME", cwd)
        .env("XDG_CONFIG_HOME", cwd)
        .env("CSTOOLS_URL", server.uri())
        .env_remove("CSTOOLS_USERNAME")
        .env_remove("CSTOOLS_PASSWORD")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("Failed to execute cstools command")
}

async fn mount_list(server: &MockServer, metadata_type: &str, headers: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{}/metadata/list", API)))
        .and(query_param("type", metadata_type))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "headers": headers,
            "isLastBatch": true
        })))
        .mount(server)
        .await;
}

/// A small cluster: one liveboard, one system answer, one worksheet with a single column.
async fn mock_cluster() -> MockServer {
    let server = MockServer::start().await;

    mount_list(
        &server,
        "PINBOARD_ANSWER_BOOK",
        json!([{"id": "lb1", "name": "Sales", "authorName": "jdoe"}]),
    )
    .await;
    mount_list(
        &server,
        "QUESTION_ANSWER_BOOK",
        json!([{"id": "qa1", "name": "Answer", "authorName": "system"}]),
    )
    .await;
    mount_list(
        &server,
        "LOGICAL_TABLE",
        json!([{"id": "lt1", "name": "Orders", "type": "WORKSHEET", "authorName": "jdoe"}]),
    )
    .await;
    mount_list(
        &server,
        "USER",
        json!([{"id": "u1", "name": "jdoe", "displayName": "Jane Doe"}]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/metadata/details", API)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "storables": [{"columns": [{"header": {"id": "c1", "name": "Amount"}}]}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{}/dependency/listdependents", API)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "c1": {"QUESTION_ANSWER_BOOK": [{"id": "qa1", "name": "Answer"}]}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/security/metadata/permissions", API)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lb1": {"permissions": {
                "u1": {"shareMode": "READ_ONLY", "topLevelObjectId": "lb1"},
                "g1": {"shareMode": "MODIFY", "topLevelObjectId": "lb1"}
            }}
        })))
        .mount(&server)
        .await;

    server
}

fn read_json(path: &Path) -> Vec<Value> {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("{} should exist: {}", path.display(), e));
    serde_json::from_str(&text).unwrap()
}

mod searchable_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_gather_writes_every_file() {
        let server = mock_cluster().await;
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        let output = run_cstools(
            &server,
            dir.path(),
            &["tools", "searchable", "gather", "--directory", out.to_str().unwrap()],
        )
        .await;
        assert!(
            output.status.success(),
            "gather failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let content = read_json(&out.join("ts_metadata_object.json"));
        assert_eq!(content.len(), 3, "system content is kept when gathering");
        assert_eq!(content[0]["type"], "PINBOARD_ANSWER_BOOK");
        assert_eq!(content[2]["type"], "WORKSHEET");

        let columns = read_json(&out.join("ts_metadata_column.json"));
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0]["header"]["id"], "c1");

        let dependents = read_json(&out.join("ts_dependent_object.json"));
        assert_eq!(dependents.len(), 1);
        assert_eq!(dependents[0]["parent_guid"], "c1");
        assert_eq!(dependents[0]["type"], "QUESTION_ANSWER_BOOK");

        let sharing = read_json(&out.join("ts_sharing_access.json"));
        assert_eq!(sharing.len(), 6, "two grants for each of the three object types");
        assert!(sharing
            .iter()
            .any(|s| s["shared_to_user_guid"] == "u1" && s["shared_to_group_guid"].is_null()));
        assert!(sharing
            .iter()
            .any(|s| s["shared_to_group_guid"] == "g1" && s["shared_to_user_guid"].is_null()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_gather_skips_optional_steps() {
        let server = mock_cluster().await;
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        let output = run_cstools(
            &server,
            dir.path(),
            &[
                "tools",
                "searchable",
                "gather",
                "--directory",
                out.to_str().unwrap(),
                "--skip-permissions",
                "--skip-dependents",
            ],
        )
        .await;
        assert!(output.status.success());

        assert!(out.join("ts_metadata_object.json").exists());
        assert!(out.join("ts_metadata_column.json").exists());
        assert!(!out.join("ts_dependent_object.json").exists());
        assert!(!out.join("ts_sharing_access.json").exists());
    }
}

mod created_objects_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_json_excludes_system_content() {
        let server = mock_cluster().await;
        let dir = tempfile::tempdir().unwrap();

        let output = run_cstools(
            &server,
            dir.path(),
            &["tools", "created-objects", "list", "--format", "json"],
        )
        .await;
        assert!(output.status.success());

        let content: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
        let ids: Vec<&str> = content.iter().filter_map(|r| r["id"].as_str()).collect();
        assert_eq!(ids, vec!["lb1", "lt1"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_with_system_content() {
        let server = mock_cluster().await;
        let dir = tempfile::tempdir().unwrap();

        let output = run_cstools(
            &server,
            dir.path(),
            &["tools", "created-objects", "list", "--include-system", "--format", "json"],
        )
        .await;
        assert!(output.status.success());

        let content: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(content.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_server_error_fails_command() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/metadata/list", API)))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let output = run_cstools(&server, dir.path(), &["tools", "created-objects", "list"]).await;

        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
    }
}

mod user_search_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_find_user_by_name() {
        let server = mock_cluster().await;
        let dir = tempfile::tempdir().unwrap();

        let output = run_cstools(
            &server,
            dir.path(),
            &["tools", "user-search", "find", "jdoe", "--format", "json"],
        )
        .await;
        assert!(output.status.success());

        let users: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(users[0]["displayName"], "Jane Doe");
    }
}
