//! MCP Server End-to-End Tests
//!
//! Drives the tool registry, resource handler and JSON-RPC server against an
//! in-memory gist service, focusing on:
//! - Tool workflows (create, edit, archive, daily notes, prompts, comments)
//! - Precondition errors raised before any remote call
//! - Cache consistency after failed remote calls
//! - Notifications interleaved with responses on the output channel

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::uninlined_format_args
)]

mod common;

use common::{FakeGists, context};
use gistpad::config::FeatureFlags;
use gistpad::mcp::{
    JsonRpcNotifier, McpServer, ResourceHandler, SharedOutput, ToolContent, ToolRegistry,
    ToolResult,
};
use gistpad::models::{DAILY_NOTES_DESCRIPTION, PROMPTS_DESCRIPTION};
use gistpad::store::Notification;
use gistpad::{ChangeNotifier, DocumentClient, Error};
use serde_json::{Value, json};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

// ============================================================================
// Test Helpers
// ============================================================================

fn text(result: &ToolResult) -> &str {
    match &result.content[0] {
        ToolContent::Text { text } => text,
    }
}

fn json_text(result: &ToolResult) -> Value {
    serde_json::from_str(text(result)).unwrap()
}

fn account() -> Arc<FakeGists> {
    Arc::new(
        FakeGists::new()
            .with_gist("notes", "Notes", &[("README.md", "# Notes\nfoo bar foo\n")])
            .with_gist(
                "pair",
                "Two files",
                &[("a.md", "alpha"), ("b.md", "beta")],
            )
            .with_gist("old", "Old stuff [Archived]", &[("old.md", "old")])
            .with_gist("daily", DAILY_NOTES_DESCRIPTION, &[("01-02-2025.md", "# 01-02-2025\n")]),
    )
}

fn registry(remote: &Arc<FakeGists>, features: FeatureFlags) -> ToolRegistry {
    let (ctx, _) = context(remote, features);
    ToolRegistry::new(ctx)
}

fn prompts_enabled() -> FeatureFlags {
    FeatureFlags {
        include_prompts: true,
        ..FeatureFlags::none()
    }
}

// ============================================================================
// Gist Tools
// ============================================================================

mod gist_tools {
    use super::*;

    #[test]
    fn test_list_gists_hides_special_gists() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        let listing = json_text(&tools.execute("list_gists", json!({})).unwrap());

        assert_eq!(listing["count"], 2);
        let ids: Vec<&str> = listing["gists"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["notes", "pair"]);
        assert_eq!(listing["gists"][0]["files"], json!(["README.md"]));
        assert_eq!(listing["gists"][0]["url"], "https://gistpad.dev/#/notes");
    }

    #[test]
    fn test_create_gist_defaults() {
        let remote = account();
        let (ctx, notifier) = context(&remote, FeatureFlags::none());
        let tools = ToolRegistry::new(Arc::clone(&ctx));
        ctx.gists.get_all(false).unwrap();

        let created = json_text(
            &tools
                .execute("create_gist", json!({ "description": "Ideas", "content": "" }))
                .unwrap(),
        );

        let id = created["id"].as_str().unwrap();
        assert_eq!(created["filename"], "README.md");
        let remote_copy = remote.remote(id).unwrap();
        assert!(!remote_copy.public);
        // Empty content is replaced with the placeholder the API accepts.
        assert_eq!(
            remote_copy.files["README.md"].content.as_deref(),
            Some(gistpad::models::EMPTY_FILE_CONTENT)
        );
        assert!(ctx.gists.find(id).unwrap().is_some());
        assert_eq!(notifier.take(), vec![Notification::ResourceListChanged]);
    }

    #[test]
    fn test_get_gist_reads_live_copy() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        let gist = json_text(&tools.execute("get_gist", json!({ "id": "pair" })).unwrap());

        assert_eq!(gist["files"][1]["filename"], "b.md");
        assert_eq!(gist["files"][1]["content"], "beta");
        assert_eq!(remote.calls(), vec!["GET /pair".to_string()]);
    }

    #[test]
    fn test_duplicate_gist_copies_files() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        let copy = json_text(&tools.execute("duplicate_gist", json!({ "id": "pair" })).unwrap());

        assert_eq!(copy["description"], "Two files (Copy)");
        let new_id = copy["new_id"].as_str().unwrap();
        let remote_copy = remote.remote(new_id).unwrap();
        assert_eq!(remote_copy.files["a.md"].content.as_deref(), Some("alpha"));
        assert_eq!(remote_copy.files["b.md"].content.as_deref(), Some("beta"));
    }

    #[test]
    fn test_delete_gist_updates_cache() {
        let remote = account();
        let (ctx, notifier) = context(&remote, FeatureFlags::none());
        let tools = ToolRegistry::new(Arc::clone(&ctx));
        ctx.gists.get_all(false).unwrap();

        let result = tools.execute("delete_gist", json!({ "id": "notes" })).unwrap();

        assert_eq!(text(&result), "Successfully deleted gist");
        assert!(remote.remote("notes").is_none());
        assert!(ctx.gists.find("notes").unwrap().is_none());
        assert_eq!(notifier.take(), vec![Notification::ResourceListChanged]);
    }

    #[test]
    fn test_unknown_gist_is_not_found() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        let err = tools
            .execute("add_gist_file", json!({ "id": "nope", "filename": "x.md", "content": "x" }))
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(err.to_string(), "Gist with ID \"nope\" not found");
    }
}

// ============================================================================
// File Tools
// ============================================================================

mod file_tools {
    use super::*;

    #[test]
    fn test_edit_loads_content_then_patches() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        let result = tools
            .execute(
                "edit_gist_file",
                json!({
                    "id": "notes",
                    "filename": "README.md",
                    "old_string": "bar",
                    "new_string": "baz"
                }),
            )
            .unwrap();

        assert_eq!(text(&result), "Successfully replaced 1 occurrence(s) in README.md");
        assert_eq!(
            remote.remote("notes").unwrap().files["README.md"].content.as_deref(),
            Some("# Notes\nfoo baz foo\n")
        );
        assert_eq!(
            remote.calls(),
            vec!["GET ".to_string(), "GET /notes".to_string(), "PATCH /notes".to_string()]
        );
    }

    #[test]
    fn test_edit_rejects_ambiguous_match() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        let args = json!({
            "id": "notes",
            "filename": "README.md",
            "old_string": "foo",
            "new_string": "qux"
        });
        let err = tools.execute("edit_gist_file", args).unwrap_err();
        assert!(err.to_string().contains("Found 2 occurrences"));
        assert_eq!(remote.count("PATCH /notes"), 0);

        let result = tools
            .execute(
                "edit_gist_file",
                json!({
                    "id": "notes",
                    "filename": "README.md",
                    "old_string": "foo",
                    "new_string": "qux",
                    "replace_all": true
                }),
            )
            .unwrap();
        assert_eq!(text(&result), "Successfully replaced 2 occurrence(s) in README.md");
    }

    #[test]
    fn test_delete_last_file_rejected_before_remote_call() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        let err = tools
            .execute("delete_gist_file", json!({ "id": "notes", "filename": "README.md" }))
            .unwrap_err();

        assert!(err.is_invalid_params());
        assert_eq!(remote.calls(), vec!["GET ".to_string()]);
    }

    #[test]
    fn test_delete_and_rename_files() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        tools
            .execute(
                "rename_gist_file",
                json!({ "id": "pair", "old_filename": "a.md", "new_filename": "c.md" }),
            )
            .unwrap();
        let renamed = remote.remote("pair").unwrap();
        assert_eq!(renamed.filenames(), vec!["b.md", "c.md"]);
        assert_eq!(renamed.files["c.md"].content.as_deref(), Some("alpha"));

        let err = tools
            .execute(
                "rename_gist_file",
                json!({ "id": "pair", "old_filename": "b.md", "new_filename": "c.md" }),
            )
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));

        tools
            .execute("delete_gist_file", json!({ "id": "pair", "filename": "b.md" }))
            .unwrap();
        assert_eq!(remote.remote("pair").unwrap().filenames(), vec!["c.md"]);
    }

    #[test]
    fn test_failed_patch_leaves_cache_untouched() {
        let remote = account();
        let (ctx, notifier) = context(&remote, FeatureFlags::none());
        let tools = ToolRegistry::new(Arc::clone(&ctx));
        let before = ctx.gists.find("pair").unwrap().unwrap();
        ctx.gists.subscribe("pair");

        remote.fail_next(502);
        let err = tools
            .execute("update_gist_file", json!({ "id": "pair", "filename": "a.md", "content": "new" }))
            .unwrap_err();

        assert!(matches!(err, Error::Remote { status: 502, .. }));
        assert_eq!(ctx.gists.find("pair").unwrap().unwrap(), before);
        assert!(notifier.events().is_empty());
    }

    #[test]
    fn test_update_file_notifies_subscribers() {
        let remote = account();
        let (ctx, notifier) = context(&remote, FeatureFlags::none());
        let tools = ToolRegistry::new(Arc::clone(&ctx));
        ctx.gists.get_all(false).unwrap();
        ctx.gists.subscribe("pair");

        tools
            .execute("update_gist_file", json!({ "id": "pair", "filename": "a.md", "content": "new" }))
            .unwrap();

        assert_eq!(
            notifier.take(),
            vec![Notification::ResourceChanged("pair".to_string())]
        );
    }
}

// ============================================================================
// Archive Tools
// ============================================================================

mod archive_tools {
    use super::*;

    #[test]
    fn test_archive_round_trip() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        tools.execute("archive_gist", json!({ "id": "notes" })).unwrap();
        assert_eq!(remote.remote("notes").unwrap().description, "Notes [Archived]");

        let archived = json_text(&tools.execute("list_archived_gists", json!({})).unwrap());
        assert_eq!(archived["count"], 2);

        tools.execute("unarchive_gist", json!({ "id": "notes" })).unwrap();
        assert_eq!(remote.remote("notes").unwrap().description, "Notes");
    }

    #[test]
    fn test_archive_preconditions() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        let err = tools.execute("archive_gist", json!({ "id": "daily" })).unwrap_err();
        assert_eq!(err.to_string(), "invalid input: Cannot archive daily notes");

        let err = tools.execute("archive_gist", json!({ "id": "old" })).unwrap_err();
        assert!(err.to_string().contains("already archived"));

        let err = tools.execute("unarchive_gist", json!({ "id": "notes" })).unwrap_err();
        assert!(err.to_string().contains("not archived"));

        assert_eq!(remote.count("PATCH /daily") + remote.count("PATCH /old"), 0);
    }
}

// ============================================================================
// Daily Note Tools
// ============================================================================

mod daily_tools {
    use super::*;

    #[test]
    fn test_todays_note_created_on_demand() {
        let remote = Arc::new(FakeGists::new());
        let tools = registry(&remote, FeatureFlags::none());

        let err = tools
            .execute("update_todays_note", json!({ "content": "x" }))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let note = tools.execute("get_todays_note", json!({})).unwrap();
        assert!(text(&note).starts_with("# "));
        assert_eq!(remote.remote_count(), 1);

        tools
            .execute("update_todays_note", json!({ "content": "- [ ] ship it" }))
            .unwrap();
        let note = tools.execute("get_todays_note", json!({})).unwrap();
        assert_eq!(text(&note), "- [ ] ship it");
        assert_eq!(remote.count("POST "), 1);
    }

    #[test]
    fn test_todays_file_added_to_existing_gist() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        tools.execute("get_todays_note", json!({})).unwrap();

        assert_eq!(remote.count("POST "), 0);
        assert_eq!(remote.count("PATCH /daily"), 1);
        let notes = json_text(&tools.execute("list_daily_notes", json!({})).unwrap());
        assert_eq!(notes["count"], 2);
    }

    #[test]
    fn test_daily_note_lookup_and_delete() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        let note = tools
            .execute("get_daily_note", json!({ "date": "01-02-2025" }))
            .unwrap();
        assert_eq!(text(&note), "# 01-02-2025\n");

        let err = tools
            .execute("get_daily_note", json!({ "date": "12-31-1999" }))
            .unwrap_err();
        assert_eq!(err.to_string(), "Requested daily note doesn't exist");

        // The only note cannot be deleted.
        let err = tools
            .execute("delete_daily_note", json!({ "date": "01-02-2025" }))
            .unwrap_err();
        assert!(err.is_invalid_params());
    }

    #[test]
    fn test_list_daily_notes_without_gist() {
        let remote = Arc::new(FakeGists::new().with_gist("x", "Other", &[("a.md", "a")]));
        let tools = registry(&remote, FeatureFlags::none());

        let notes = json_text(&tools.execute("list_daily_notes", json!({})).unwrap());
        assert_eq!(notes, json!({ "count": 0, "notes": [] }));
    }
}

// ============================================================================
// Prompt Tools
// ============================================================================

mod prompt_tools {
    use super::*;

    #[test]
    fn test_prompt_tools_disabled_by_default() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        let err = tools
            .execute("add_prompt", json!({ "name": "x", "prompt": "y" }))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid input: Unknown tool: add_prompt");
    }

    #[test]
    fn test_add_then_delete_prompt() {
        let remote = account();
        let (ctx, notifier) = context(&remote, prompts_enabled());
        let tools = ToolRegistry::new(Arc::clone(&ctx));

        tools
            .execute(
                "add_prompt",
                json!({
                    "name": "review",
                    "prompt": "Review {{code}}",
                    "description": "Code review",
                    "arguments": [{ "name": "code", "description": "The diff" }]
                }),
            )
            .unwrap();

        let prompts = ctx.gists.get_prompts().unwrap().unwrap();
        assert_eq!(prompts.description, PROMPTS_DESCRIPTION);
        assert!(prompts.files.contains_key("review.md"));
        assert_eq!(notifier.take(), vec![Notification::PromptListChanged]);

        tools
            .execute("add_prompt", json!({ "name": "plan", "prompt": "Plan it" }))
            .unwrap();
        assert_eq!(notifier.take(), vec![Notification::PromptListChanged]);
        assert_eq!(remote.count("POST "), 1);

        let err = tools
            .execute("delete_prompt", json!({ "name": "missing" }))
            .unwrap_err();
        assert_eq!(err.to_string(), "Prompt 'missing.md' not found");

        tools
            .execute("delete_prompt", json!({ "name": "review.md" }))
            .unwrap();
        let prompts = ctx.gists.get_prompts().unwrap().unwrap();
        assert_eq!(prompts.filenames(), vec!["plan.md"]);
    }

    #[test]
    fn test_blank_prompt_rejected() {
        let remote = account();
        let tools = registry(&remote, prompts_enabled());

        let err = tools
            .execute("add_prompt", json!({ "name": "  ", "prompt": "y" }))
            .unwrap_err();
        assert!(err.is_invalid_params());
        assert!(remote.calls().is_empty());
    }
}

// ============================================================================
// Comment and Star Tools
// ============================================================================

mod comment_and_star_tools {
    use super::*;

    #[test]
    fn test_comment_lifecycle() {
        let remote = account();
        let tools = registry(&remote, FeatureFlags::none());

        let err = tools
            .execute("add_gist_comment", json!({ "id": "notes", "body": "   " }))
            .unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));

        let added = json_text(
            &tools
                .execute("add_gist_comment", json!({ "id": "notes", "body": " Nice " }))
                .unwrap(),
        );
        let comment_id = added["comment_id"].as_u64().unwrap();

        let listing = json_text(
            &tools
                .execute("list_gist_comments", json!({ "id": "notes" }))
                .unwrap(),
        );
        assert_eq!(listing["count"], 1);
        assert_eq!(listing["comments"][0]["body"], "Nice");
        assert_eq!(listing["comments"][0]["user"], "octocat");

        tools
            .execute(
                "delete_gist_comment",
                json!({ "gist_id": "notes", "comment_id": comment_id }),
            )
            .unwrap();
        let listing = json_text(
            &tools
                .execute("list_gist_comments", json!({ "id": "notes" }))
                .unwrap(),
        );
        assert_eq!(listing["count"], 0);
    }

    #[test]
    fn test_star_and_unstar() {
        let remote = account();
        let (ctx, notifier) = context(&remote, FeatureFlags::none());
        let tools = ToolRegistry::new(Arc::clone(&ctx));

        let starred = json_text(&tools.execute("list_starred_gists", json!({})).unwrap());
        assert_eq!(starred["count"], 0);

        tools.execute("star_gist", json!({ "id": "notes" })).unwrap();
        let starred = json_text(&tools.execute("list_starred_gists", json!({})).unwrap());
        assert_eq!(starred["gists"][0]["id"], "notes");

        tools.execute("unstar_gist", json!({ "id": "notes" })).unwrap();
        assert!(ctx.starred.find("notes").unwrap().is_none());
        // Starred resources are not listed, so the starred store stays silent.
        assert!(notifier.events().is_empty());
    }

    #[test]
    fn test_refresh_gists() {
        let remote = account();
        let (ctx, notifier) = context(&remote, FeatureFlags::none());
        let tools = ToolRegistry::new(Arc::clone(&ctx));
        ctx.gists.get_all(false).unwrap();

        remote.edit_remotely("notes", "Changed elsewhere");
        let result = tools.execute("refresh_gists", json!({})).unwrap();

        assert_eq!(text(&result), "Gists refreshed!");
        assert_eq!(
            ctx.gists.find("notes").unwrap().unwrap().description,
            "Changed elsewhere"
        );
        assert_eq!(notifier.take(), vec![Notification::ResourceListChanged]);
    }
}

// ============================================================================
// Resources
// ============================================================================

mod resources {
    use super::*;

    #[test]
    fn test_resource_list_respects_features() {
        let remote = account();
        let (ctx, _) = context(&remote, FeatureFlags::none());
        let handler = ResourceHandler::new(ctx);

        let uris: Vec<String> = handler
            .list_resources()
            .unwrap()
            .into_iter()
            .map(|r| r.uri)
            .collect();
        // Newest first.
        assert_eq!(uris, vec!["gist:///pair", "gist:///notes"]);

        let (ctx, _) = context(
            &remote,
            FeatureFlags {
                include_archived: true,
                include_daily: true,
                ..FeatureFlags::none()
            },
        );
        let handler = ResourceHandler::new(ctx);
        assert_eq!(handler.list_resources().unwrap().len(), 4);
    }

    #[test]
    fn test_read_raw_resource() {
        let remote = account();
        let (ctx, _) = context(&remote, FeatureFlags::none());
        let handler = ResourceHandler::new(ctx);

        let content = handler.read_resource("gist:///pair/raw").unwrap();
        assert_eq!(content.text, "alpha");

        let err = handler.read_resource("gist:///missing").unwrap_err();
        assert!(matches!(err, Error::Remote { status: 404, .. }));
    }
}

// ============================================================================
// JSON-RPC Server
// ============================================================================

mod server {
    use super::*;

    fn lines(buffer: &Arc<Mutex<Vec<u8>>>) -> Vec<Value> {
        String::from_utf8(buffer.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_subscribed_edit_pushes_update_before_response() {
        let remote = account();
        let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
        let output: SharedOutput = Arc::clone(&buffer) as SharedOutput;
        let notifier = Arc::new(JsonRpcNotifier::new(Arc::clone(&output)));
        let ctx = Arc::new(gistpad::mcp::GistContext::new(
            Arc::clone(&remote) as Arc<dyn DocumentClient>,
            notifier as Arc<dyn ChangeNotifier>,
            FeatureFlags::none(),
        ));
        let server = McpServer::new(ctx).with_output(output);

        let input = [
            json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
            json!({ "jsonrpc": "2.0", "id": 2, "method": "resources/list" }),
            json!({ "jsonrpc": "2.0", "id": 3, "method": "resources/subscribe", "params": { "uri": "gist:///pair" } }),
            json!({ "jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {
                "name": "update_gist_file",
                "arguments": { "id": "pair", "filename": "a.md", "content": "changed" }
            } }),
        ]
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");

        server.serve(Cursor::new(input)).unwrap();

        let messages = lines(&buffer);
        let methods_and_ids: Vec<(Value, Value)> = messages
            .iter()
            .map(|m| (m["method"].clone(), m["id"].clone()))
            .collect();
        assert_eq!(
            methods_and_ids,
            vec![
                (Value::Null, json!(1)),
                (Value::Null, json!(2)),
                (Value::Null, json!(3)),
                (json!("notifications/resources/updated"), Value::Null),
                (Value::Null, json!(4)),
            ]
        );
        assert_eq!(messages[3]["params"]["uri"], "gist:///pair");
        assert_eq!(messages[4]["result"]["isError"], false);
    }

    #[test]
    fn test_tool_failure_reported_in_result() {
        let remote = account();
        let (ctx, _) = context(&remote, FeatureFlags::none());
        let server = McpServer::new(ctx);

        let response = server
            .handle_request(
                &json!({
                    "jsonrpc": "2.0",
                    "id": 9,
                    "method": "tools/call",
                    "params": { "name": "archive_gist", "arguments": { "id": "daily" } }
                })
                .to_string(),
            )
            .unwrap();
        let response: Value = serde_json::from_str(&response).unwrap();

        assert_eq!(response["result"]["isError"], true);
        assert_eq!(
            response["result"]["content"][0]["text"],
            "invalid input: Cannot archive daily notes"
        );
    }

    #[test]
    fn test_store_shared_with_server() {
        let remote = account();
        let (ctx, _) = context(&remote, FeatureFlags::none());
        let store = Arc::clone(&ctx.gists);
        let server = McpServer::new(Arc::clone(&ctx));

        server
            .handle_request(r#"{"jsonrpc":"2.0","id":1,"method":"resources/list"}"#)
            .unwrap();

        assert!(store.is_loaded());
        assert_eq!(remote.count("GET "), 1);
    }
}
