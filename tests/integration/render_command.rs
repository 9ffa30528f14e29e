//! End-to-end tests for the `render` command.
//!
//! All of these render to a `.dot` target, which makes the renderer write the
//! graph source directly instead of invoking Graphviz. The assertions run
//! against the DOT text.

use predicates::prelude::*;
use serde_json::json;

use crate::common::TestProject;
use depviz::test_utils::DescriptorFixture;

fn app_tree() -> serde_json::Value {
    json!({
        "group": "org.example", "artifact": "app", "version": "1.0.0",
        "children": [
            {
                "group": "org.example", "artifact": "core", "version": "1.0.0",
                "scope": "compile",
                "parent": { "group": "org.example", "artifact": "app", "version": "1.0.0" },
                "children": []
            },
            {
                "group": "junit", "artifact": "junit", "version": "4.13",
                "scope": "test",
                "children": []
            }
        ]
    })
}

#[test]
fn test_render_tree_to_dot() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();

    project
        .depviz()
        .args(["render", "app.json", "--target", "graph.dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dependency graph exported to:"));

    let dot = project.read("graph.dot");
    assert!(dot.contains("digraph \"dependencies\" {"));
    assert!(dot.contains("label=\"Dependency graph\";"));
    assert!(dot.contains("rankdir=TB;"));

    // The root gets the grey fill, plain dependencies keep the white default
    assert!(dot.contains(
        "\"org.example:app:1.0.0\" [label=\"org.example:app:1.0.0:jar\", fillcolor=\"#DDDDDD\"];"
    ));
    assert!(dot.contains("\"org.example:core:1.0.0\" [label=\"org.example:core:1.0.0:jar\"];"));

    // compile edges are unlabeled, every other scope is written out
    assert!(dot.contains("\"org.example:app:1.0.0\" -> \"org.example:core:1.0.0\";"));
    assert!(dot.contains("\"org.example:app:1.0.0\" -> \"junit:junit:4.13\" [label=\"test\"];"));
}

#[test]
fn test_omitted_nodes_hidden_by_default() {
    let project = TestProject::new().unwrap();
    let tree = json!({
        "group": "org.example", "artifact": "app", "version": "1.0.0",
        "children": [
            {
                "group": "org.example", "artifact": "dup", "version": "2.0.0",
                "state": "omitted-for-conflict",
                "children": []
            }
        ]
    });
    project.write_tree("app.json", &tree).unwrap();

    project
        .depviz()
        .args(["render", "app.json", "--target", "graph.dot"])
        .assert()
        .success();

    assert!(!project.read("graph.dot").contains("org.example:dup:2.0.0"));

    // Still hidden when scope cascading is off
    project
        .depviz()
        .args(["render", "app.json", "--cascade=false", "--target", "plain.dot"])
        .assert()
        .success();

    assert!(!project.read("plain.dot").contains("org.example:dup:2.0.0"));
}

#[test]
fn test_omitted_nodes_drawn_dashed_when_requested() {
    let project = TestProject::new().unwrap();
    let tree = json!({
        "group": "org.example", "artifact": "app", "version": "1.0.0",
        "children": [
            {
                "group": "org.example", "artifact": "dup", "version": "2.0.0",
                "state": "omitted-for-conflict",
                "children": []
            }
        ]
    });
    project.write_tree("app.json", &tree).unwrap();

    project
        .depviz()
        .args(["render", "app.json", "--target", "graph.dot", "--hide-omitted=false"])
        .assert()
        .success();

    let dot = project.read("graph.dot");
    assert!(dot.contains("\"org.example:dup:2.0.0\""));
    assert!(dot.contains("style=dashed, color=\"#A9A9A9\""));
}

#[test]
fn test_label_flags_shorten_node_labels() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();

    project
        .depviz()
        .args([
            "render",
            "app.json",
            "--target",
            "graph.dot",
            "--hide-group-id",
            "--hide-version",
            "--hide-type",
        ])
        .assert()
        .success();

    let dot = project.read("graph.dot");
    assert!(dot.contains("\"org.example:app:1.0.0\" [label=\"app\", fillcolor=\"#DDDDDD\"];"));
    assert!(dot.contains("\"org.example:core:1.0.0\" [label=\"core\"];"));
}

#[test]
fn test_hide_scopes_drops_matching_subtrees() {
    let project = TestProject::new().unwrap();
    let tree = json!({
        "group": "org.example", "artifact": "app", "version": "1.0.0",
        "children": [
            {
                "group": "org.example", "artifact": "svc", "version": "1.0.0",
                "scope": "test",
                "children": [
                    {
                        "group": "org.example", "artifact": "leaf", "version": "1.0.0",
                        "scope": "compile",
                        "children": []
                    }
                ]
            }
        ]
    });
    project.write_tree("app.json", &tree).unwrap();

    project
        .depviz()
        .args(["render", "app.json", "--target", "graph.dot", "--hide-scopes", "test"])
        .assert()
        .success();

    let dot = project.read("graph.dot");
    assert!(!dot.contains("org.example:svc:1.0.0"));
    // leaf was only reachable through the hidden test dependency
    assert!(!dot.contains("org.example:leaf:1.0.0"));
}

#[test]
fn test_cascade_pushes_test_scope_down() {
    let project = TestProject::new().unwrap();
    let tree = json!({
        "group": "org.example", "artifact": "app", "version": "1.0.0",
        "children": [
            {
                "group": "org.example", "artifact": "mid", "version": "1.0.0",
                "scope": "test",
                "children": [
                    {
                        "group": "org.example", "artifact": "leaf", "version": "1.0.0",
                        "scope": "compile",
                        "children": []
                    }
                ]
            }
        ]
    });
    project.write_tree("app.json", &tree).unwrap();

    project
        .depviz()
        .args(["render", "app.json", "--target", "graph.dot"])
        .assert()
        .success();
    assert!(
        project
            .read("graph.dot")
            .contains("\"org.example:mid:1.0.0\" -> \"org.example:leaf:1.0.0\" [label=\"test\"];")
    );

    project
        .depviz()
        .args(["render", "app.json", "--target", "plain.dot", "--cascade=false"])
        .assert()
        .success();
    assert!(
        project
            .read("plain.dot")
            .contains("\"org.example:mid:1.0.0\" -> \"org.example:leaf:1.0.0\";")
    );
}

#[test]
fn test_hide_transitive_keeps_direct_dependencies_only() {
    let project = TestProject::new().unwrap();
    let tree = json!({
        "group": "org.example", "artifact": "app", "version": "1.0.0",
        "children": [
            {
                "group": "org.example", "artifact": "core", "version": "1.0.0",
                "children": [
                    {
                        "group": "org.example", "artifact": "deep", "version": "1.0.0",
                        "children": []
                    }
                ]
            }
        ]
    });
    project.write_tree("app.json", &tree).unwrap();

    project
        .depviz()
        .args(["render", "app.json", "--target", "graph.dot", "--hide-transitive"])
        .assert()
        .success();

    let dot = project.read("graph.dot");
    assert!(dot.contains("org.example:core:1.0.0"));
    assert!(!dot.contains("org.example:deep:1.0.0"));
}

#[test]
fn test_multiple_trees_merge_on_shared_coordinates() {
    let project = TestProject::new().unwrap();
    let app = json!({
        "group": "org.example", "artifact": "app", "version": "1.0.0",
        "children": [
            { "group": "org.example", "artifact": "shared", "version": "1.0.0", "children": [] }
        ]
    });
    // lib declared shared 2.0.0 but conflict mediation picked 1.0.0
    let lib = json!({
        "group": "org.example", "artifact": "lib", "version": "1.0.0",
        "children": [
            { "group": "org.example", "artifact": "shared", "version": "1.0.0", "children": [] },
            {
                "group": "org.example", "artifact": "shared", "version": "2.0.0",
                "state": "omitted-for-conflict",
                "children": []
            }
        ]
    });
    project.write_tree("app.json", &app).unwrap();
    project.write_tree("lib.json", &lib).unwrap();

    project
        .depviz()
        .args(["render", "app.json", "lib.json", "--target", "graph.dot"])
        .assert()
        .success();

    let dot = project.read("graph.dot");
    // One node statement for the shared coordinate, one edge from each root
    assert_eq!(dot.matches("\"org.example:shared:1.0.0\" [").count(), 1);
    assert!(dot.contains("\"org.example:app:1.0.0\" -> \"org.example:shared:1.0.0\";"));
    assert!(dot.contains("\"org.example:lib:1.0.0\" -> \"org.example:shared:1.0.0\";"));
    assert!(!dot.contains("org.example:shared:2.0.0"));

    // The conflict loser stays hidden when scope cascading is off
    project
        .depviz()
        .args(["render", "app.json", "lib.json", "--cascade=false", "--target", "plain.dot"])
        .assert()
        .success();

    let plain = project.read("plain.dot");
    assert_eq!(plain.matches("\"org.example:shared:1.0.0\" [").count(), 1);
    assert!(!plain.contains("org.example:shared:2.0.0"));
}

#[test]
fn test_config_file_in_working_directory_is_picked_up() {
    let project = TestProject::new().unwrap();
    let tree = json!({
        "group": "org.example", "artifact": "app", "version": "1.0.0",
        "children": [
            {
                "group": "org.example", "artifact": "dup", "version": "2.0.0",
                "state": "omitted-for-duplicate",
                "children": []
            }
        ]
    });
    project.write_tree("app.json", &tree).unwrap();
    project
        .write_config("depviz.toml", "label = \"Team Graph\"\nhide-omitted = false\n")
        .unwrap();

    project
        .depviz()
        .args(["render", "app.json", "--target", "graph.dot"])
        .assert()
        .success();

    let dot = project.read("graph.dot");
    assert!(dot.contains("label=\"Team Graph\";"));
    assert!(dot.contains("org.example:dup:2.0.0"));
}

#[test]
fn test_explicit_config_flag() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();
    project
        .write_config("custom.toml", "direction = \"LR\"\n")
        .unwrap();

    project
        .depviz()
        .args(["render", "app.json", "--target", "graph.dot", "--config", "custom.toml"])
        .assert()
        .success();

    assert!(project.read("graph.dot").contains("rankdir=LR;"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();

    project
        .depviz()
        .args(["render", "app.json", "--target", "graph.dot", "--config", "absent.toml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_descriptor_url_becomes_href() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();
    project
        .seed_descriptor(&DescriptorFixture::with_url(
            "org.example",
            "core",
            "1.0.0",
            "https://core.example",
        ))
        .unwrap();

    project
        .depviz()
        .args(["render", "app.json", "--target", "graph.dot", "--repository", "repository"])
        .assert()
        .success();

    assert!(project.read("graph.dot").contains("href=\"https://core.example\""));
}

#[test]
fn test_color_rule_matches_descriptor_property() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();
    project
        .seed_descriptor(&DescriptorFixture::with_properties(
            "org.example",
            "core",
            "1.0.0",
            &[("team", "platform")],
        ))
        .unwrap();

    project
        .depviz()
        .args([
            "render",
            "app.json",
            "--target",
            "graph.dot",
            "--repository",
            "repository",
            "--color",
            "team=platform:#336699",
        ])
        .assert()
        .success();

    let dot = project.read("graph.dot");
    assert!(
        dot.contains("\"org.example:core:1.0.0\" [label=\"org.example:core:1.0.0:jar\", fillcolor=\"#336699\"];")
    );
}

#[test]
fn test_invalid_color_rule_fails() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();

    project
        .depviz()
        .args(["render", "app.json", "--target", "graph.dot", "--color", "nonsense"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missing_tree_file_fails() {
    let project = TestProject::new().unwrap();

    project
        .depviz()
        .args(["render", "absent.json", "--target", "graph.dot"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_verbose_logs_tree_loading() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();

    project
        .depviz()
        .args(["render", "app.json", "--target", "graph.dot", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded dependency tree"));
}
