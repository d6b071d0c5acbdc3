use predicates::prelude::*;
use run_template::test_utils::ReleaseFixture;

use super::run_template_cmd;

fn web_release(template: &str) -> ReleaseFixture {
    ReleaseFixture::new()
        .unwrap()
        .with_job(
            "web",
            r#"
name: web
templates:
  web.yml.tera: config/web.yml
properties:
  port:
    default: 8080
  tls.enabled:
    default: false
  admin.password:
    description: required, no default
"#,
        )
        .unwrap()
        .with_template("web", "web.yml.tera", template)
        .unwrap()
        .with_manifest(
            r#"
instance_groups:
  - name: web
    jobs:
      - name: web
        properties:
          tls:
            enabled: true
          hosts: [a, b]
"#,
        )
        .unwrap()
}

#[test]
fn test_properties_merge_defaults_and_manifest() {
    let fixture = web_release(
        "{{ name }} {{ p(name=\"port\") }} {{ p(name=\"tls.enabled\") }} {{ properties.hosts | join(sep=\",\") }}",
    );
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["web", manifest.to_str().unwrap(), "config/web.yml"])
        .assert()
        .success()
        .stdout("web 8080 true a,b\n");
}

#[test]
fn test_p_without_default_fails_render() {
    let fixture = web_release("password: {{ p(name=\"admin.password\") }}");
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["web", manifest.to_str().unwrap(), "config/web.yml"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("could not find property admin.password"));
}

#[test]
fn test_p_with_inline_default() {
    let fixture = web_release("password: {{ p(name=\"admin.password\", default=\"changeme\") }}");
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["web", manifest.to_str().unwrap(), "config/web.yml"])
        .assert()
        .success()
        .stdout("password: changeme\n");
}

#[test]
fn test_unknown_template_name_lists_available() {
    let fixture = web_release("x");
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["web", manifest.to_str().unwrap(), "web.yml.tera"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config/web.yml"));
}

#[test]
fn test_syntax_error_reports_template() {
    let fixture = web_release("ok\n{% if %}\n");
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["web", manifest.to_str().unwrap(), "config/web.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template syntax error"))
        .stderr(predicate::str::contains("config/web.yml"));
}

#[test]
fn test_trailing_newline_is_not_doubled() {
    let fixture = web_release("port: {{ p(name=\"port\") }}\n");
    let manifest = fixture.manifest_path();

    run_template_cmd(&fixture, &["web", manifest.to_str().unwrap(), "config/web.yml"])
        .assert()
        .success()
        .stdout("port: 8080\n");
}
