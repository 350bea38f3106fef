use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const DEFINITION: &str = r#"
name: Notes
objects:
  - name: Note
    properties:
      - name: id
        type: id
      - name: body
        type: text
files:
  - scope: object
    input: note.hbs
    output: "{{snakeCase object.name}}.txt"
"#;

fn workspace() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("modelgen-cli-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("temp dir");
    fs::write(dir.join("notes.yaml"), DEFINITION).expect("definition");
    fs::write(dir.join("note.hbs"), "{{object.name}}:{{#each object.properties}} {{name}}{{/each}}")
        .expect("template");
    dir
}

fn modelgen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_modelgen"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("run modelgen")
}

#[test]
fn generate_writes_object_files() {
    let dir = workspace();
    let output = modelgen(&dir, &["generate", "notes.yaml", "--output-dir", "out"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(dir.join("out/note.txt")).expect("generated"),
        "Note: id body"
    );
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn settings_file_beside_the_definition_is_used() {
    let dir = workspace();
    fs::write(dir.join("modelgen.toml"), "[render]\noutput_dir = \"from-settings\"\n")
        .expect("settings");

    let output = modelgen(&dir, &["generate", "notes.yaml"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.join("from-settings/note.txt").is_file());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_definition_exits_with_status_one() {
    let dir = workspace();
    fs::write(dir.join("broken.yaml"), "objects: []\n").expect("definition");

    let output = modelgen(&dir, &["check", "broken.yaml"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: "), "{stderr}");
    assert!(stderr.contains("in project file <broken.yaml>"), "{stderr}");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn check_with_dump_prints_the_project() {
    let dir = workspace();
    let output = modelgen(&dir, &["check", "notes.yaml", "--dump"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Project <Notes> :"));
    assert!(stdout.contains("project <Notes> is valid: 1 object(s), 1 file(s)"));
    assert!(!dir.join("note.txt").exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn context_schema_is_valid_json() {
    let dir = workspace();
    let output = modelgen(&dir, &["context-schema"]);

    assert!(output.status.success());
    let schema: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("schema is json");
    assert!(schema.get("definitions").is_some());
    let _ = fs::remove_dir_all(&dir);
}
