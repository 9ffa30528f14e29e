//! End-to-end tests for the `report` command.
//!
//! The tests that need a layout tool run a stub executable via
//! `--dot-command`; the multi-module tests render to `--format dot` and
//! assert on the graph source directly.

use predicates::prelude::*;
use serde_json::json;

use crate::common::TestProject;

fn app_tree() -> serde_json::Value {
    json!({
        "group": "org.example", "artifact": "app", "version": "1.0.0",
        "children": [
            {
                "group": "org.example", "artifact": "lib", "version": "1.0.0",
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

fn lib_tree() -> serde_json::Value {
    json!({
        "group": "org.example", "artifact": "lib", "version": "1.0.0",
        "children": [
            {
                "group": "junit", "artifact": "junit", "version": "4.13",
                "scope": "test",
                "children": []
            }
        ]
    })
}

#[cfg(unix)]
#[test]
fn test_report_writes_page_with_embedded_map() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();
    let dot = project.install_fake_dot().unwrap();

    project
        .depviz()
        .args(["report", "app.json", "--output-dir", "site"])
        .args(["--dot-command", dot.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dependency report written to:"));

    let page = project.read("site/dependency-graph.html");
    assert!(page.contains("<img src=\"dependency-graph.png\" usemap=\"#dependencies\" border=\"0\">"));
    assert!(page.contains("<map id=\"dependencies\" name=\"dependencies\">"));
    assert!(page.contains("<title>Dependency graph</title>"));

    assert!(project.exists("site/dependency-graph.png"));
    assert!(project.exists("site/dependency-graph.png.map"));
    // The intermediate DOT file is cleaned up unless --keep-dot is given
    assert!(!project.exists("site/dependency-graph.dot"));
}

#[cfg(unix)]
#[test]
fn test_report_map_can_be_disabled() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();
    let dot = project.install_fake_dot().unwrap();

    project
        .depviz()
        .args(["report", "app.json", "--output-dir", "site", "--map=false"])
        .args(["--dot-command", dot.to_str().unwrap()])
        .assert()
        .success();

    let page = project.read("site/dependency-graph.html");
    assert!(page.contains("<img src=\"dependency-graph.png\" border=\"0\">"));
    assert!(!page.contains("usemap"));
    assert!(!page.contains("<map"));
    assert!(!project.exists("site/dependency-graph.png.map"));
}

#[cfg(unix)]
#[test]
fn test_report_keep_dot_leaves_graph_source_behind() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();
    let dot = project.install_fake_dot().unwrap();

    project
        .depviz()
        .args(["report", "app.json", "--output-dir", "site", "--keep-dot"])
        .args(["--dot-command", dot.to_str().unwrap()])
        .assert()
        .success();

    assert!(project.exists("site/dependency-graph.dot"));
    assert!(
        project
            .read("site/dependency-graph.dot")
            .contains("digraph \"dependencies\" {")
    );
}

#[cfg(unix)]
#[test]
fn test_report_layout_failure_keeps_dot_for_diagnosis() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();
    let dot = project
        .install_script(
            "failing-dot",
            "#!/bin/sh\necho 'syntax error in graph' >&2\nexit 1\n",
        )
        .unwrap();

    project
        .depviz()
        .args(["report", "app.json", "--output-dir", "site"])
        .args(["--dot-command", dot.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"));

    // No partial image or map, but the DOT source survives
    assert!(!project.exists("site/dependency-graph.png"));
    assert!(!project.exists("site/dependency-graph.png.map"));
    assert!(project.exists("site/dependency-graph.dot"));
    assert!(!project.exists("site/dependency-graph.html"));
}

#[cfg(unix)]
#[test]
fn test_report_missing_map_output_removes_partial_image() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();
    // Honors the image `-o` but never writes the cmapx map, then exits 0
    let script = concat!(
        "#!/bin/sh\n",
        "prev=\"\"\n",
        "for arg in \"$@\"; do\n",
        "  if [ \"$prev\" = \"-o\" ]; then\n",
        "    case \"$arg\" in\n",
        "      *.map) ;;\n",
        "      *) printf 'stub' > \"$arg\" ;;\n",
        "    esac\n",
        "  fi\n",
        "  prev=\"$arg\"\n",
        "done\n",
        "exit 0\n"
    );
    let dot = project.install_script("mapless-dot", script).unwrap();

    project
        .depviz()
        .args(["report", "app.json", "--output-dir", "site"])
        .args(["--dot-command", dot.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("map file"));

    // The half-written image goes with the map so nothing partial survives
    assert!(!project.exists("site/dependency-graph.png"));
    assert!(!project.exists("site/dependency-graph.html"));
    assert!(project.exists("site/dependency-graph.dot"));
}

#[test]
fn test_report_multi_module_hides_external_dependencies() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();
    project.write_tree("lib.json", &lib_tree()).unwrap();

    project
        .depviz()
        .args(["report", "app.json", "lib.json", "--output-dir", "site", "--format", "dot"])
        .assert()
        .success();

    let dot = project.read("site/dependency-graph.dot");
    assert!(dot.contains("\"org.example:app:1.0.0\""));
    assert!(dot.contains("\"org.example:lib:1.0.0\""));
    assert!(dot.contains("\"org.example:app:1.0.0\" -> \"org.example:lib:1.0.0\";"));
    // junit is external to the aggregated build and aggregation hides it
    assert!(!dot.contains("junit"));
}

#[test]
fn test_report_roots_link_to_sibling_pages() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();
    project.write_tree("lib.json", &lib_tree()).unwrap();

    project
        .depviz()
        .args(["report", "app.json", "lib.json", "--output-dir", "site", "--format", "dot"])
        .assert()
        .success();

    let dot = project.read("site/dependency-graph.dot");
    assert!(dot.contains("href=\"app.html\""));
    assert!(dot.contains("href=\"lib.html\""));
}

#[test]
fn test_report_single_module_keeps_external_dependencies() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();

    project
        .depviz()
        .args(["report", "app.json", "--output-dir", "site", "--format", "dot"])
        .assert()
        .success();

    let dot = project.read("site/dependency-graph.dot");
    assert!(dot.contains("\"junit:junit:4.13\""));

    let page = project.read("site/dependency-graph.html");
    assert!(page.contains("<img src=\"dependency-graph.dot\" border=\"0\">"));
}

#[test]
fn test_report_honors_label_from_config_file() {
    let project = TestProject::new().unwrap();
    project.write_tree("app.json", &app_tree()).unwrap();
    project
        .write_config("depviz.toml", "label = \"Reactor Overview\"\n")
        .unwrap();

    project
        .depviz()
        .args(["report", "app.json", "--output-dir", "site", "--format", "dot"])
        .assert()
        .success();

    assert!(project.read("site/dependency-graph.dot").contains("label=\"Reactor Overview\";"));
    assert!(
        project
            .read("site/dependency-graph.html")
            .contains("<title>Reactor Overview</title>")
    );
}
