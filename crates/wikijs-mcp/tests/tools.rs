//! Tool pipelines against an in-memory transport and audit sink.

mod common;

use common::{CONFIRM, Harness, mutations, ok_result, page_path, unexpected};
use serde_json::{Value, json};
use wikijs_core::{GraphqlErrorPayload, UNEXPECTED_MESSAGE_BUDGET, WikiError, classify_graphql_error};

fn body(result: &wikijs_core::CallToolResult) -> Value {
    serde_json::from_str(&result.text()).unwrap()
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_read_uses_retry_budget_and_default_locale() {
    let harness = Harness::new(mutations(false, true, &[]), |op, vars| match op {
        "GetPageByPath" => {
            assert_eq!(vars["locale"], "en");
            Ok(json!({ "pages": { "singleByPath": {
                "id": 7, "path": "docs/intro", "title": "Intro", "content": "# Hi", "tags": []
            }}}))
        }
        other => unexpected(other),
    });

    let result = harness
        .call("wikijs_get_page_by_path", json!({ "path": "docs/intro" }))
        .await;

    assert!(!result.is_error());
    assert_eq!(body(&result)["id"], 7);
    let calls = harness.transport.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].options.no_retry);
}

#[tokio::test]
async fn test_view_forbidden_carries_code_and_permissions() {
    let harness = Harness::new(mutations(false, true, &[]), |_, _| {
        Err(classify_graphql_error(&GraphqlErrorPayload::with_code(
            "You are not authorized to view this page.",
            6013,
        )))
    });

    let result = harness
        .call("wikijs_get_page_by_path", json!({ "path": "secret/page" }))
        .await;

    let text = result.text();
    assert!(result.is_error());
    assert!(text.starts_with("Error: Permission Denied (Wiki.js Error 6013) while get page by path"));
    assert!(text.contains("read:pages"));
    assert!(text.contains("read:source"));
}

#[tokio::test]
async fn test_missing_page_is_not_found() {
    let harness = Harness::new(mutations(false, true, &[]), |_, _| {
        Ok(json!({ "pages": { "single": null } }))
    });

    let result = harness.call("wikijs_get_page_by_id", json!({ "id": 42 })).await;

    assert!(result.is_error());
    assert!(result.text().contains("Not Found while get page by id"));
}

#[tokio::test]
async fn test_invalid_input_lists_every_field() {
    let harness = Harness::new(mutations(false, true, &[]), |op, _| unexpected(op));

    let result = harness
        .call("wikijs_get_page_history", json!({ "id": 0, "limit": "ten" }))
        .await;

    let text = result.text();
    assert!(result.is_error());
    assert!(text.starts_with("Error: Invalid Input while get page history"));
    assert!(text.contains("id:"));
    assert!(text.contains("limit:"));
    assert!(harness.transport.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_argument_is_rejected() {
    let harness = Harness::new(mutations(false, true, &[]), |op, _| unexpected(op));

    let result = harness
        .call("wikijs_list_tags", json!({ "surprise": true }))
        .await;

    assert!(result.is_error());
    assert!(result.text().contains("Invalid Input while list tags"));
}

#[tokio::test]
async fn test_unknown_tool() {
    let harness = Harness::new(mutations(false, true, &[]), |op, _| unexpected(op));
    let result = harness.call("wikijs_nope", json!({})).await;
    assert!(result.is_error());
    assert_eq!(result.text(), "Error: Unknown tool: wikijs_nope");
}

#[tokio::test]
async fn test_upstream_stack_trace_is_cut_to_one_line() {
    let harness = Harness::new(mutations(false, true, &[]), |_, _| {
        Err(WikiError::generic(format!(
            "{}\n    at PageModel.getPage (/wiki/server/models/pages.js:412:33)\n    at async Object.single",
            "Cannot read properties of undefined ".repeat(10)
        )))
    });

    let result = harness.call("wikijs_get_page_by_id", json!({ "id": 3 })).await;

    let text = result.text();
    let headline = "Error: Failed to get page by id: ";
    assert!(result.is_error());
    assert!(text.starts_with(headline));
    assert!(!text.contains('\n'));
    assert!(!text.contains("pages.js"));
    assert!(text[headline.len()..].chars().count() <= UNEXPECTED_MESSAGE_BUDGET + "...".len());
}

#[tokio::test]
async fn test_uncoded_graphql_error_hides_trace() {
    let harness = Harness::new(mutations(false, true, &[]), |_, _| {
        Err(classify_graphql_error(&GraphqlErrorPayload {
            message: Some("Unexpected resolver failure\n    at resolve (/wiki/server/graph/resolvers/page.js:57:12)".to_string()),
            ..Default::default()
        }))
    });

    let result = harness.call("wikijs_list_tags", json!({})).await;

    assert!(result.is_error());
    assert_eq!(result.text(), "Error: Failed to list tags: Unexpected resolver failure");
}

#[tokio::test]
async fn test_page_version_maps_arguments() {
    let harness = Harness::new(mutations(false, true, &[]), |op, vars| match op {
        "GetPageVersion" => {
            assert_eq!(vars, &json!({ "pageId": 4, "versionId": 19 }));
            Ok(json!({ "pages": { "version": {
                "pageId": 4, "versionId": 19, "path": "docs/a", "content": "old body",
                "tags": ["ops"], "action": "updated"
            }}}))
        }
        other => unexpected(other),
    });

    let result = harness
        .call("wikijs_get_page_version", json!({ "id": 4, "versionId": 19 }))
        .await;

    assert!(!result.is_error(), "{}", result.text());
    let version = body(&result);
    assert_eq!(version["content"], "old body");
    assert_eq!(version["tags"], json!(["ops"]));

    let missing = Harness::new(mutations(false, true, &[]), |_, _| {
        Ok(json!({ "pages": { "version": null } }))
    });
    let result = missing
        .call("wikijs_get_page_version", json!({ "id": 4, "versionId": 20 }))
        .await;
    assert!(result.text().contains("Not Found while get page version"));
}

#[tokio::test]
async fn test_page_links_use_default_locale() {
    let harness = Harness::new(mutations(false, true, &[]), |op, vars| match op {
        "GetPageLinks" => {
            assert_eq!(vars["locale"], "en");
            Ok(json!({ "pages": { "links": [
                { "id": 1, "path": "home", "title": "Home", "links": ["docs/a", "docs/b"] }
            ]}}))
        }
        other => unexpected(other),
    });

    let result = harness.call("wikijs_get_page_links", json!({})).await;

    assert_eq!(body(&result)[0]["links"], json!(["docs/a", "docs/b"]));
}

#[tokio::test]
async fn test_search_users_requires_query() {
    let harness = Harness::new(mutations(false, true, &[]), |op, vars| match op {
        "SearchUsers" => {
            assert_eq!(vars["query"], "ada");
            Ok(json!({ "users": { "search": [
                { "id": 2, "name": "Ada", "email": "ada@example.com", "isActive": true }
            ]}}))
        }
        other => unexpected(other),
    });

    let result = harness.call("wikijs_search_users", json!({ "query": "ada" })).await;
    assert_eq!(body(&result)[0]["email"], "ada@example.com");

    let result = harness.call("wikijs_search_users", json!({ "query": "" })).await;
    assert!(result.text().contains("Invalid Input while search users"));
    assert_eq!(harness.transport.calls().len(), 1);
}

#[tokio::test]
async fn test_system_info_never_returns_infrastructure() {
    let harness = Harness::new(mutations(false, true, &[]), |op, _| match op {
        "GetSystemInfo" => Ok(json!({ "system": { "info": {
            "currentVersion": "2.5.300", "dbType": "postgres",
            "dbHost": "db.internal", "workingDirectory": "/srv/wiki"
        }}})),
        other => unexpected(other),
    });

    let result = harness.call("wikijs_get_system_info", json!({})).await;

    let text = result.text();
    assert!(text.contains("2.5.300"));
    assert!(!text.contains("db.internal"));
    assert!(!text.contains("/srv/wiki"));
}

#[tokio::test]
async fn test_navigation_and_site_config() {
    let harness = Harness::new(mutations(false, true, &[]), |op, _| match op {
        "GetNavigation" => Ok(json!({ "navigation": { "tree": [{
            "locale": "en",
            "items": [{ "id": "n1", "kind": "link", "label": "Home", "targetType": "page", "target": "/home" }]
        }]}})),
        "GetSiteConfig" => Ok(json!({ "site": { "config": {
            "title": "Team Wiki", "featurePageComments": true, "uploadMaxFileSize": 5242880
        }}})),
        other => unexpected(other),
    });

    let navigation = harness.call("wikijs_get_navigation", json!({})).await;
    assert_eq!(body(&navigation)[0]["items"][0]["label"], "Home");

    let config = harness.call("wikijs_get_site_config", json!({})).await;
    assert_eq!(body(&config)["title"], "Team Wiki");
    assert_eq!(body(&config)["uploadMaxFileSize"], 5242880);
}

#[tokio::test]
async fn test_asset_listings_default_to_root() {
    let harness = Harness::new(mutations(false, true, &[]), |op, vars| match op {
        "ListAssets" => {
            assert_eq!(vars, &json!({ "folderId": 0, "kind": "ALL" }));
            Ok(json!({ "assets": { "list": [
                { "id": 9, "filename": "logo.png", "kind": "IMAGE", "fileSize": 2048,
                  "folder": { "id": 0, "slug": "" }, "author": { "id": 1, "name": "Admin" } }
            ]}}))
        }
        "ListAssetFolders" => {
            assert_eq!(vars["parentFolderId"], 3);
            Ok(json!({ "assets": { "folders": [{ "id": 4, "slug": "diagrams", "name": "Diagrams" }] } }))
        }
        other => unexpected(other),
    });

    let assets = harness.call("wikijs_list_assets", json!({})).await;
    assert_eq!(body(&assets)[0]["filename"], "logo.png");

    let folders = harness
        .call("wikijs_list_asset_folders", json!({ "parentFolderId": 3 }))
        .await;
    assert_eq!(body(&folders)[0]["slug"], "diagrams");

    let rejected = harness.call("wikijs_list_assets", json!({ "kind": "VIDEO" })).await;
    assert!(rejected.text().contains("Invalid Input while list assets"));
}

// =============================================================================
// Gate ordering
// =============================================================================

#[tokio::test]
async fn test_disabled_mutations_touch_nothing() {
    let harness = Harness::new(mutations(false, false, &[]), |op, _| unexpected(op));

    let result = harness
        .call(
            "wikijs_delete_page",
            json!({ "id": 3, "confirm": CONFIRM }),
        )
        .await;

    assert!(result.is_error());
    assert!(result.text().starts_with("Error: Mutation Disabled:"));
    assert!(harness.transport.calls().is_empty());

    let records = harness.audit_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["operation"], "delete");
    assert_eq!(records[0]["details"]["succeeded"], false);
}

#[tokio::test]
async fn test_wrong_confirm_token_is_rejected_before_lookup() {
    let harness = Harness::new(mutations(true, false, &[]), |op, _| unexpected(op));

    let result = harness
        .call("wikijs_delete_page", json!({ "id": 3, "confirm": "guess" }))
        .await;

    assert!(result.is_error());
    assert!(result.text().contains("Invalid confirm token"));
    assert!(harness.transport.calls().is_empty());
}

#[tokio::test]
async fn test_unconfigured_token_skips_confirm_check() {
    let harness = Harness::with_token(mutations(true, true, &[]), None, |op, _| match op {
        "GetPagePath" => Ok(page_path("docs/a")),
        other => unexpected(other),
    });

    let result = harness.call("wikijs_delete_page", json!({ "id": 3 })).await;

    assert!(!result.is_error());
    assert_eq!(body(&result)["dryRun"], true);
}

#[tokio::test]
async fn test_path_outside_scope_is_rejected() {
    let harness = Harness::new(mutations(true, false, &["docs"]), |op, _| match op {
        "GetPagePath" => Ok(page_path("private/notes")),
        other => unexpected(other),
    });

    let result = harness
        .call("wikijs_delete_page", json!({ "id": 9, "confirm": CONFIRM }))
        .await;

    let text = result.text();
    assert!(result.is_error());
    assert!(text.contains("private/notes"));
    assert!(text.contains("Allowed prefixes: docs"));
    assert_eq!(harness.transport.operations(), vec!["GetPagePath"]);
}

#[tokio::test]
async fn test_move_checks_destination() {
    let harness = Harness::new(mutations(true, false, &["docs"]), |op, _| match op {
        "GetPagePath" => Ok(page_path("docs/a")),
        other => unexpected(other),
    });

    let result = harness
        .call(
            "wikijs_move_page",
            json!({ "id": 9, "destinationPath": "/archive/a/", "confirm": CONFIRM }),
        )
        .await;

    assert!(result.is_error());
    assert!(result.text().contains("'archive/a'"));
    assert_eq!(harness.transport.operations(), vec!["GetPagePath"]);
}

#[tokio::test]
async fn test_scope_prefix_needs_segment_boundary() {
    let harness = Harness::new(mutations(true, true, &["docs"]), |op, _| unexpected(op));

    let result = harness
        .call(
            "wikijs_create_page",
            json!({ "path": "docs-old/page", "title": "T", "content": "c", "confirm": CONFIRM }),
        )
        .await;

    assert!(result.is_error());
    assert!(result.text().contains("not within the allowed mutation paths"));
}

// =============================================================================
// Dry run
// =============================================================================

#[tokio::test]
async fn test_dry_run_create_previews_and_audits() {
    let harness = Harness::new(mutations(true, true, &["docs"]), |op, _| unexpected(op));

    let result = harness
        .call(
            "wikijs_create_page",
            json!({ "path": "/docs/new/", "title": "New", "content": "body", "confirm": CONFIRM }),
        )
        .await;

    assert!(!result.is_error());
    let preview = body(&result);
    assert_eq!(preview["dryRun"], true);
    assert_eq!(preview["operation"], "create");
    assert_eq!(preview["target"]["path"], "docs/new");
    assert_eq!(preview["target"]["locale"], "en");
    assert!(harness.transport.calls().is_empty());

    let records = harness.audit_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["operation"], "create");
    assert_eq!(records[0]["details"]["dryRun"], true);
}

#[tokio::test]
async fn test_dry_run_comment_preview_is_truncated() {
    let harness = Harness::new(mutations(true, true, &[]), |op, _| match op {
        "GetPagePath" => Ok(page_path("docs/a")),
        other => unexpected(other),
    });

    let long = "x".repeat(250);
    let result = harness
        .call(
            "wikijs_create_comment",
            json!({ "pageId": 4, "content": long, "confirm": CONFIRM }),
        )
        .await;

    let preview = body(&result);
    assert_eq!(preview["operation"], "create_comment");
    assert_eq!(preview["target"]["path"], "docs/a");
    assert_eq!(preview["target"]["contentPreview"].as_str().unwrap().len(), 100);
}

// =============================================================================
// Real writes
// =============================================================================

#[tokio::test]
async fn test_update_resolves_path_then_mutates_without_retry() {
    let harness = Harness::new(mutations(true, false, &["docs"]), |op, vars| match op {
        "GetPagePath" => Ok(page_path("docs/a")),
        "UpdatePage" => {
            assert_eq!(vars["tags"], json!([]));
            Ok(json!({ "pages": { "update": {
                "responseResult": ok_result(),
                "page": { "id": 5, "path": "docs/a", "title": "A", "updatedAt": "2024-01-01" }
            }}}))
        }
        other => unexpected(other),
    });

    let result = harness
        .call(
            "wikijs_update_page",
            json!({ "id": 5, "content": "new", "confirm": CONFIRM }),
        )
        .await;

    assert!(!result.is_error(), "{}", result.text());
    let calls = harness.transport.calls();
    assert_eq!(harness.transport.operations(), vec!["GetPagePath", "UpdatePage"]);
    assert!(!calls[0].options.no_retry);
    assert!(calls[1].options.no_retry);

    let records = harness.audit_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["details"]["dryRun"], false);
    assert_eq!(records[0]["details"]["succeeded"], true);
    assert_eq!(records[0]["details"]["id"], 5);
    assert_eq!(records[0]["details"]["path"], "docs/a");
}

#[tokio::test]
async fn test_create_sends_defaults() {
    let harness = Harness::new(mutations(true, false, &[]), |op, vars| match op {
        "CreatePage" => {
            assert_eq!(vars["editor"], "markdown");
            assert_eq!(vars["locale"], "en");
            assert_eq!(vars["isPublished"], true);
            assert_eq!(vars["isPrivate"], false);
            assert_eq!(vars["description"], "");
            assert_eq!(vars["tags"], json!([]));
            Ok(json!({ "pages": { "create": {
                "responseResult": ok_result(),
                "page": { "id": 11, "path": "guide", "title": "Guide", "updatedAt": null }
            }}}))
        }
        other => unexpected(other),
    });

    let result = harness
        .call(
            "wikijs_create_page",
            json!({ "path": "guide", "title": "Guide", "content": "c", "confirm": CONFIRM }),
        )
        .await;

    assert!(!result.is_error(), "{}", result.text());
    assert_eq!(body(&result)["page"]["id"], 11);
    assert_eq!(harness.audit_records()[0]["details"]["id"], 11);
}

#[tokio::test]
async fn test_failed_response_result_is_classified() {
    let harness = Harness::new(mutations(true, false, &[]), |op, _| match op {
        "GetPagePath" => Ok(page_path("docs/a")),
        "DeletePage" => Ok(json!({ "pages": { "delete": { "responseResult": {
            "succeeded": false, "errorCode": 6010, "slug": "PageDeleteForbidden",
            "message": "You are not authorized to delete this page."
        }}}})),
        other => unexpected(other),
    });

    let result = harness
        .call("wikijs_delete_page", json!({ "id": 2, "confirm": CONFIRM }))
        .await;

    let text = result.text();
    assert!(result.is_error());
    assert!(text.contains("Permission Denied (Wiki.js Error 6010) while delete page"));
    assert!(text.contains("delete:pages"));

    let details = &harness.audit_records()[0]["details"];
    assert_eq!(details["succeeded"], false);
    assert_eq!(details["errorCode"], 6010);
}

#[tokio::test]
async fn test_transport_failure_on_write_is_audited() {
    let harness = Harness::new(mutations(true, false, &[]), |op, _| match op {
        "DeleteTag" => Err(WikiError::transient("Wiki.js server error (HTTP 502)", Some(502))),
        other => unexpected(other),
    });

    let result = harness
        .call("wikijs_delete_tag", json!({ "id": 1, "confirm": CONFIRM }))
        .await;

    assert!(result.is_error());
    assert!(result.text().contains("Wiki.js Server Error while delete tag"));
    assert_eq!(harness.transport.calls().len(), 1);

    let records = harness.audit_records();
    assert_eq!(records[0]["operation"], "deleteTag");
    assert_eq!(records[0]["details"]["succeeded"], false);
    assert!(records[0]["details"]["error"].as_str().unwrap().contains("502"));
}

#[tokio::test]
async fn test_audit_never_carries_confirm_token() {
    let harness = Harness::new(mutations(true, true, &[]), |op, _| unexpected(op));

    harness
        .call(
            "wikijs_update_tag",
            json!({ "id": 1, "tag": "t", "title": "T", "confirm": CONFIRM }),
        )
        .await;
    harness
        .call("wikijs_delete_tag", json!({ "id": 1, "confirm": "wrong" }))
        .await;

    let lines = harness.audit.lines();
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert!(!line.contains(CONFIRM));
        assert!(!line.contains("wrong\""));
    }
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let harness = Harness::new(mutations(false, true, &[]), |op, vars| match op {
        "GetComment" => Ok(json!({ "comments": { "single": {
            "id": vars["id"], "content": format!("comment {}", vars["id"])
        }}})),
        other => unexpected(other),
    });

    let calls = (1..=8).map(|id| harness.call("wikijs_get_comment", json!({ "id": id })));
    let results = futures::future::join_all(calls).await;

    for (index, result) in results.iter().enumerate() {
        assert!(!result.is_error(), "{}", result.text());
        assert_eq!(body(result)["id"], index as i64 + 1);
    }
    assert_eq!(harness.transport.calls().len(), 8);
}
