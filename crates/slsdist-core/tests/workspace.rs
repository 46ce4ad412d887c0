use std::collections::BTreeSet;
use std::path::Path;

use slsdist_core::product::ProductId;
use slsdist_core::project::Project;
use slsdist_core::workspace::{products_published_in_repo, Workspace};
use tempfile::TempDir;

fn write_product(dir: &Path, name: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(
        dir.join("slsdist.toml"),
        format!(
            r#"
[product]
group = "com.example"
name = "{name}"
version = "1.0.0"
"#
        ),
    )
    .unwrap();
}

#[test]
fn load_lists_members() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("slsdist.toml"),
        "[workspace]\nmembers = [\"services/a\", \"services/b\"]\n",
    )
    .unwrap();
    write_product(&tmp.path().join("services/a"), "a");
    write_product(&tmp.path().join("services/b"), "b");

    let ws = Workspace::load(tmp.path()).unwrap();
    assert_eq!(ws.members.len(), 2);
    assert_eq!(
        ws.published_products(),
        BTreeSet::from([
            ProductId::new("com.example", "a"),
            ProductId::new("com.example", "b"),
        ])
    );
}

#[test]
fn load_fails_for_member_without_config() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("slsdist.toml"),
        "[workspace]\nmembers = [\"missing\"]\n",
    )
    .unwrap();
    assert!(Workspace::load(tmp.path()).is_err());
}

#[test]
fn discover_walks_up_from_member() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("slsdist.toml"),
        "[workspace]\nmembers = [\"a\", \"b\"]\n",
    )
    .unwrap();
    write_product(&tmp.path().join("a"), "a");
    write_product(&tmp.path().join("b"), "b");

    let ws = Workspace::discover(&tmp.path().join("a")).unwrap().unwrap();
    assert_eq!(ws.root_dir, tmp.path().canonicalize().unwrap());

    let project = Project::load(&tmp.path().join("a")).unwrap();
    let published = products_published_in_repo(&project).unwrap();
    assert!(published.contains(&ProductId::new("com.example", "b")));
}

#[test]
fn discover_from_relative_member_path() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("slsdist.toml"),
        "[workspace]\nmembers = [\"a\", \"b\"]\n",
    )
    .unwrap();
    write_product(&tmp.path().join("a"), "a");
    write_product(&tmp.path().join("b"), "b");

    let dotted = tmp.path().join("b").join("..").join("a").join(".");
    let ws = Workspace::discover(&dotted).unwrap().unwrap();
    assert_eq!(ws.root_dir, tmp.path().canonicalize().unwrap());
    assert!(ws
        .published_products()
        .contains(&ProductId::new("com.example", "b")));
}

#[test]
fn standalone_project_publishes_only_itself() {
    let tmp = TempDir::new().unwrap();
    write_product(tmp.path(), "solo");
    let project = Project::load(tmp.path()).unwrap();
    assert!(Workspace::discover(tmp.path()).unwrap().is_none());
    assert_eq!(
        products_published_in_repo(&project).unwrap(),
        BTreeSet::from([ProductId::new("com.example", "solo")])
    );
}

#[test]
fn root_with_product_is_a_member() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("slsdist.toml"),
        r#"
[product]
group = "com.example"
name = "root"
version = "1.0.0"

[workspace]
members = ["child"]
"#,
    )
    .unwrap();
    write_product(&tmp.path().join("child"), "child");

    let ws = Workspace::load(tmp.path()).unwrap();
    assert_eq!(ws.members.len(), 2);
    assert!(ws
        .published_products()
        .contains(&ProductId::new("com.example", "root")));
}
