use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn info_shows_resolved_paths() {
  let env = TestEnv::new("make site");

  env
    .sitepub_cmd()
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains("dict"))
    .stdout(predicate::str::contains("make site"))
    .stdout(predicate::str::contains(env.slot().display().to_string()));
}

#[test]
fn info_json_reports_existence() {
  let env = TestEnv::with_publish_tree("make site");

  let output = env.sitepub_cmd().args(["info", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(info["subproject"]["name"], "dict");
  assert_eq!(info["publish_tree_exists"], true);
  assert_eq!(info["slot_exists"], false);
  assert_eq!(info["output_exists"], false);
}

#[test]
fn info_text_marks_each_path_present_or_missing() {
  let env = TestEnv::with_publish_tree("make site");
  env.write_file("dict/output/index.html", "Hello");

  env
    .sitepub_cmd()
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains(format!("{} (exists)", env.output_dir().display())))
    .stdout(predicate::str::contains(format!("{} (exists)", env.publish_tree().display())))
    .stdout(predicate::str::contains(format!("{} (missing)", env.slot().display())));
}

#[test]
fn info_rejects_publish_dir_that_is_the_subproject() {
  let env = TestEnv::new("make site");

  env
    .sitepub_cmd()
    .arg("info")
    .env("SITEPUB_PUBLISH_DIR", ".")
    .assert()
    .failure()
    .stderr(predicate::str::contains("✗ Failed to resolve site layout"))
    .stderr(predicate::str::contains("overlaps subproject directory"));
}
