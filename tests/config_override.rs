use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_with_config(cfg: &PathBuf) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_calcud");
    let mut child = Command::new(exe)
        .env("CALCUD_CONFIG", cfg)
        .env_remove("CALCUD_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn calcud");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({ "id": id, "method": method, "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn config_file_overrides_pass_mark_group_and_seed_row() {
    let dir = temp_dir("calcud-config-override");
    let cfg = dir.join("calcud.json");
    std::fs::write(
        &cfg,
        json!({
            "logLevel": "warn",
            "scheme": { "passMark": 6.0 },
            "defaultGroup": { "course": "2º", "classroom": "DAW" },
            "seedBlankStudent": false
        })
        .to_string(),
    )
    .expect("write config");

    let (mut child, mut stdin, mut reader) = spawn_with_config(&cfg);

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health["studentCount"], 0);
    assert_eq!(health["group"], "2º DAW");

    let scheme = request_ok(&mut stdin, &mut reader, "2", "config.get", json!({}));
    assert_eq!(scheme["scheme"]["passMark"], 6.0);
    assert_eq!(scheme["scheme"]["examWeight"], 0.65);

    // 5.525 would pass at the default mark but not at 6.
    let preview = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "calc.preview",
        json!({ "firstExam": 5, "secondExam": 6, "bookGrade": 5, "behavior": 6 }),
    );
    assert_eq!(preview["status"], "SUSPENSO");

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn invalid_config_fails_startup() {
    let dir = temp_dir("calcud-config-invalid");
    let cfg = dir.join("calcud.json");
    std::fs::write(&cfg, r#"{ "scheme": { "examWeight": 0.9 } }"#).expect("write config");

    let status = Command::new(env!("CARGO_BIN_EXE_calcud"))
        .env("CALCUD_CONFIG", &cfg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("run calcud");
    assert!(!status.success());

    let _ = std::fs::remove_dir_all(dir);
}
