//! Subcommand execution.

use anyhow::{Context, Result};
use serde_json::Value;

use buildll_client::{BuildllClient, ContentUpdate};
use buildll_core::ClientConfig;

use crate::args::Command;

/// Run `command` against a client built from `config` and return its JSON output.
pub async fn run(command: &Command, config: ClientConfig) -> Result<Value> {
    let client = BuildllClient::new(config)?;

    let output = match command {
        Command::Get { id, server: false } => serde_json::to_value(client.get_content(id).await?)?,
        Command::Get { id, server: true } => serde_json::to_value(client.get_content_server(id).await?)?,
        Command::Batch { ids } => serde_json::to_value(client.get_batch_content(ids).await?)?,
        Command::Update { id, data, token } => {
            let patch: Value = serde_json::from_str(data).context("--data must be valid JSON")?;
            client.update_content(id, patch, token).await?
        }
        Command::UpdateBatch { file, token } => {
            let raw = std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
            let updates: Vec<ContentUpdate> =
                serde_json::from_str(&raw).context("update file must be a JSON array of {contentId, data}")?;
            client.update_batch_content(updates, token).await?
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use serde_json::json;
    use tempfile::NamedTempFile;

    fn config(server: &MockServer) -> ClientConfig {
        ClientConfig {
            base_url: Some(server.base_url()),
            public_api_key: Some("pk_cli".into()),
            ..ClientConfig::for_site("s1")
        }
    }

    fn tmp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("tmp file");
        std::io::Write::write_all(&mut file, contents.as_bytes()).expect("write tmp");
        file
    }

    #[tokio::test]
    async fn test_get_prints_section() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/content/hero").header("x-buildll-key", "pk_cli");
                then.status(200).json_body(json!({"id": "hero", "data": {"title": "A"}}));
            })
            .await;

        let output = run(&Command::Get { id: "hero".into(), server: false }, config(&server)).await.unwrap();
        mock.assert_async().await;
        assert_eq!(output, json!({"id": "hero", "data": {"title": "A"}}));
    }

    #[tokio::test]
    async fn test_get_missing_section_is_null() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/content/ghost");
                then.status(404);
            })
            .await;

        let output = run(&Command::Get { id: "ghost".into(), server: false }, config(&server)).await.unwrap();
        assert_eq!(output, Value::Null);
    }

    #[tokio::test]
    async fn test_get_server_without_key_fails() {
        let server = MockServer::start_async().await;
        let result = run(&Command::Get { id: "hero".into(), server: true }, config(&server)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_batch_prints_map() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/content/batch").json_body(json!({"sectionIds": ["a", "b"]}));
                then.status(200).json_body(json!({"results": [
                    {"sectionId": "a", "content": {"id": "a", "data": {"n": 1}}},
                    {"sectionId": "b", "content": null}
                ]}));
            })
            .await;

        let command = Command::Batch { ids: vec!["b".into(), "a".into()] };
        let output = run(&command, config(&server)).await.unwrap();
        mock.assert_async().await;
        assert_eq!(output, json!({"a": {"id": "a", "data": {"n": 1}}, "b": null}));
    }

    #[tokio::test]
    async fn test_update_sends_patch() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("PUT")
                    .path("/content/hero")
                    .header("authorization", "Bearer wt")
                    .json_body(json!({"contentId": "hero", "data": {"title": "B"}}));
                then.status(200).json_body(json!({"ok": true}));
            })
            .await;

        let command = Command::Update { id: "hero".into(), data: r#"{"title":"B"}"#.into(), token: "wt".into() };
        let output = run(&command, config(&server)).await.unwrap();
        mock.assert_async().await;
        assert_eq!(output, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_data() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("PUT");
                then.status(200);
            })
            .await;

        let command = Command::Update { id: "hero".into(), data: "{not json".into(), token: "wt".into() };
        let err = run(&command, config(&server)).await.unwrap_err();
        assert!(err.to_string().contains("--data must be valid JSON"));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_update_batch_reads_file() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("PUT").path("/content/batch").header("authorization", "Bearer wt").json_body(json!({
                    "updates": [
                        {"contentId": "hero", "data": {"title": "B"}},
                        {"contentId": "footer", "data": {"text": "C"}}
                    ]
                }));
                then.status(200).json_body(json!({"updated": 2}));
            })
            .await;

        let file = tmp_file(
            r#"[{"contentId":"hero","data":{"title":"B"}},{"contentId":"footer","data":{"text":"C"}}]"#,
        );
        let command = Command::UpdateBatch { file: file.path().to_path_buf(), token: "wt".into() };
        let output = run(&command, config(&server)).await.unwrap();
        mock.assert_async().await;
        assert_eq!(output, json!({"updated": 2}));
    }

    #[tokio::test]
    async fn test_update_batch_rejects_malformed_file() {
        let server = MockServer::start_async().await;
        let file = tmp_file(r#"{"contentId":"hero"}"#);
        let command = Command::UpdateBatch { file: file.path().to_path_buf(), token: "wt".into() };

        let err = run(&command, config(&server)).await.unwrap_err();
        assert!(err.to_string().contains("update file must be a JSON array"));
    }
}
