use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn assetref(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("assetref"));
    cmd.env_remove("ASSETREF_ROOT")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(root);
    cmd
}

#[test]
fn find_stylesheet_helper_in_partial() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("app/views/layouts/_header.html.erb"),
        "<%= stylesheet_link_tag 'main' %>\n",
    );
    write_file(&temp.path().join("public/stylesheets/main.css"), "body {}\n");

    let assert = assetref(temp.path())
        .arg("--format")
        .arg("jsonl")
        .arg("find")
        .arg("public/stylesheets/main.css")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["path"], "app/views/layouts/_header.html.erb");
    assert_eq!(items[0]["line"], 1);
    assert_eq!(items[0]["text"], "<%= stylesheet_link_tag 'main' %>");
    assert_eq!(items[0]["target"], "public/stylesheets/main.css");
}

#[test]
fn find_background_image_in_css() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("public/stylesheets/site.css"),
        "h1 {\n  background-image: \"/images/test-2.gif\";\n}\n",
    );

    assetref(temp.path())
        .arg("find")
        .arg("public/images/test-2.gif")
        .assert()
        .success()
        .stdout("public/stylesheets/site.css:2:  background-image: \"/images/test-2.gif\";\n");
}

#[test]
fn find_implicit_layout_binding() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("app/controllers/hello_controller.rb"),
        "class HelloController < ApplicationController\n  def index\n  end\nend\n",
    );

    for layout in ["hello", "application"] {
        assetref(temp.path())
            .arg("find")
            .arg(format!("app/views/layouts/{layout}.html.erb"))
            .assert()
            .success()
            .stdout(
                "app/controllers/hello_controller.rb:1:class HelloController < ApplicationController\n",
            );
    }
}

#[test]
fn find_partial_from_render_to_string() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("app/controllers/hello_controller.rb"),
        "class HelloController < ApplicationController\n  def greet\n    render_to_string(:partial => 'greeting')\n  end\nend\n",
    );
    write_file(&temp.path().join("app/views/hello/_greeting.html.erb"), "hi\n");

    assetref(temp.path())
        .arg("--format")
        .arg("files")
        .arg("find")
        .arg("app/views/hello/_greeting.html.erb")
        .assert()
        .success()
        .stdout("app/controllers/hello_controller.rb\n");
}

#[test]
fn find_unreferenced_target_exits_one() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("public/images/orphan.png"), "");
    write_file(&temp.path().join("public/index.html"), "<p>nothing</p>\n");

    assetref(temp.path())
        .arg("find")
        .arg("public/images/orphan.png")
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn find_total_counts_every_target() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("public/index.html"),
        "<img src=\"images/a.png\">\n<img src=\"images/b.png\">\n<img src=\"/images/a.png\">\n",
    );

    assetref(temp.path())
        .arg("--format")
        .arg("total")
        .arg("find")
        .arg("public/images/a.png")
        .arg("public/images/b.png")
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn find_unsupported_type_is_warned_and_skipped() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("app/models/user.rb"), "class User; end\n");

    assetref(temp.path())
        .arg("find")
        .arg("app/models/user.rb")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("unsupported file type"));
}

#[test]
fn quiet_silences_warnings() {
    let temp = tempdir().unwrap();

    assetref(temp.path())
        .arg("-q")
        .arg("find")
        .arg("app/models/user.rb")
        .assert()
        .code(1)
        .stderr("");
}

#[test]
fn missing_root_is_fatal() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("nope");

    assetref(&missing)
        .arg("find")
        .arg("public/stylesheets/main.css")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("project root not found"));
}

#[test]
fn unknown_format_is_fatal() {
    let temp = tempdir().unwrap();

    assetref(temp.path())
        .arg("--format")
        .arg("xml")
        .arg("kind")
        .arg("a.css")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown format: xml"));
}

#[test]
fn root_from_environment() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("public/index.html"),
        "<script src=\"javascripts/app.js\"></script>\n",
    );

    Command::new(assert_cmd::cargo::cargo_bin!("assetref"))
        .env("ASSETREF_ROOT", temp.path())
        .env_remove("RUST_LOG")
        .arg("--format")
        .arg("count")
        .arg("find")
        .arg("public/javascripts/app.js")
        .assert()
        .success()
        .stdout("public/index.html:1\n");
}

#[test]
fn ignore_files_are_honored_unless_disabled() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join(".ignore"), "tmp/\n");
    write_file(
        &temp.path().join("tmp/cache/page.html"),
        "<link rel=\"stylesheet\" href=\"/stylesheets/main.css\">\n",
    );

    assetref(temp.path())
        .arg("find")
        .arg("public/stylesheets/main.css")
        .assert()
        .code(1);

    assetref(temp.path())
        .arg("--no-ignore")
        .arg("--format")
        .arg("files")
        .arg("find")
        .arg("public/stylesheets/main.css")
        .assert()
        .success()
        .stdout("tmp/cache/page.html\n");
}

#[test]
fn custom_public_dir() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("web/index.html"),
        "<img src=\"/images/logo.png\">\n",
    );

    assetref(temp.path())
        .arg("--public-dir")
        .arg("web")
        .arg("--format")
        .arg("files")
        .arg("find")
        .arg("web/images/logo.png")
        .assert()
        .success()
        .stdout("web/index.html\n");
}

#[test]
fn unused_lists_only_unreferenced_targets() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("app/views/home/index.html.erb"),
        "<%= image_tag 'used.png' %>\n",
    );

    assetref(temp.path())
        .arg("--format")
        .arg("json")
        .arg("unused")
        .arg("public/images/used.png")
        .arg("public/images/spare.png")
        .arg("Gemfile")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"target\": \"public/images/spare.png\""))
        .stdout(predicate::str::contains("used.png\"").not())
        .stderr(predicate::str::contains("unsupported file type"));
}

#[test]
fn kind_reports_factory_choice() {
    let temp = tempdir().unwrap();

    assetref(temp.path())
        .arg("kind")
        .arg("app/views/layouts/site.rhtml")
        .arg("app/views/users/_form.html.erb")
        .arg("lib/tasks/x.rake")
        .assert()
        .success()
        .stdout(
            "app/views/layouts/site.rhtml: layout\n\
app/views/users/_form.html.erb: partial\n\
lib/tasks/x.rake: unsupported\n",
        );
}
