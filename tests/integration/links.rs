use predicates::prelude::*;
use run_template::test_utils::{ReleaseFixture, database_release};

use super::run_template_cmd;

#[test]
fn test_consumed_link_resolves_manifest_and_default() {
    let fixture = database_release().unwrap();
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["consumer", manifest.to_str().unwrap(), "config/db.yml"])
        .assert()
        .success()
        .stdout("address: localhost\nport: 5432\n");
}

#[test]
fn test_job_missing_from_manifest_lists_known_jobs() {
    let fixture = database_release().unwrap();
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["ghost", manifest.to_str().unwrap(), "config/db.yml"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("could not find job ghost"))
        .stderr(predicate::str::contains(r#"["consumer", "provider"]"#));
}

#[test]
fn test_multiple_provides_is_not_implemented() {
    let fixture = database_release()
        .unwrap()
        .with_job(
            "greedy",
            "provides:\n  - name: a\n    properties: []\n  - name: b\n    properties: []\n",
        )
        .unwrap();
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["consumer", manifest.to_str().unwrap(), "config/db.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("currently only supports one provides per spec"));
}

#[test]
fn test_link_property_missing_everywhere_aborts() {
    let fixture = ReleaseFixture::new()
        .unwrap()
        .with_job(
            "consumer",
            "templates:\n  out.tera: out\nconsumes:\n  - name: db\n",
        )
        .unwrap()
        .with_template("consumer", "out.tera", "unused")
        .unwrap()
        .with_job("provider", "provides:\n  - name: db\n    properties: [password]\n")
        .unwrap()
        .with_manifest("instance_groups:\n  - name: app\n    jobs:\n      - name: consumer\n")
        .unwrap();
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["consumer", manifest.to_str().unwrap(), "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find property password"));
}

#[test]
fn test_declared_without_default_yields_placeholder() {
    let fixture = ReleaseFixture::new()
        .unwrap()
        .with_job(
            "consumer",
            "templates:\n  out.tera: out\nconsumes:\n  - name: db\n",
        )
        .unwrap()
        .with_template("consumer", "out.tera", "{{ link_p(link=\"db\", name=\"password\") }}")
        .unwrap()
        .with_job(
            "provider",
            "provides:\n  - name: db\n    properties: [password]\nproperties:\n  password:\n    description: secret\n",
        )
        .unwrap()
        .with_manifest("instance_groups:\n  - name: app\n    jobs:\n      - name: consumer\n")
        .unwrap();
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["consumer", manifest.to_str().unwrap(), "out"])
        .assert()
        .success()
        .stdout("no default value for password\n");
}

#[test]
fn test_unconsumed_links_are_not_visible() {
    let fixture = database_release()
        .unwrap()
        .with_job(
            "cache",
            "provides:\n  - name: cache\n    properties: [size]\nproperties:\n  size:\n    default: 64\n",
        )
        .unwrap()
        .with_template(
            "consumer",
            "db.yml.tera",
            "{% if has_link(name=\"cache\") %}cache{% else %}no cache{% endif %} {{ links.db.address }}",
        )
        .unwrap();
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["consumer", manifest.to_str().unwrap(), "config/db.yml"])
        .assert()
        .success()
        .stdout("no cache fake_address\n");
}

#[test]
fn test_unbound_link_reports_bound_links() {
    let fixture = database_release()
        .unwrap()
        .with_template("consumer", "db.yml.tera", "{{ link_p(link=\"cache\", name=\"size\") }}")
        .unwrap();
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["consumer", manifest.to_str().unwrap(), "config/db.yml"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Link 'cache' is not available to this job"))
        .stderr(predicate::str::contains("Bound links: db"));
}
