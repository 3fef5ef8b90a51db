//! End-to-end tests for the `rxt-port` binary.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// A scratch directory with no rxt.toml in it, also used as HOME so no
/// user config leaks in.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rxt_cli_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn rxt_command(name: &str, args: &[&str]) -> Command {
    let dir = scratch_dir(name);
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rxt-port"));
    cmd.args(args)
        .current_dir(&dir)
        .env("HOME", &dir)
        .env_remove("RXT_LOG");
    cmd
}

fn rxt(name: &str, args: &[&str]) -> Output {
    rxt_command(name, args).output().expect("run rxt-port")
}

fn rxt_logged(name: &str, filter: &str, args: &[&str]) -> Output {
    rxt_command(name, args)
        .env("RXT_LOG", filter)
        .output()
        .expect("run rxt-port")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn print_known_scenarios() {
    let out = rxt(
        "print",
        &["print", "0x02", "0x29", "0x0B", "0x03", "0xFFFFFFFFFFFFFFF9"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "nil\n5\ntrue\nfalse\n-1\n");
}

#[test]
fn print_unknown_tag_does_not_fail() {
    let out = rxt("unknown", &["print", "0x0D", "0x0E", "0x0F"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "Unknown value tag: 5\nUnknown value tag: 6\nUnknown value tag: 7\n"
    );
}

#[test]
fn print_negative_decimal_word() {
    let out = rxt("negative", &["print", "-7"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "-1\n");
}

#[test]
fn print_to_stderr_flag() {
    let out = rxt("stderr_flag", &["print", "--stderr", "0x0B"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "");
    assert!(stderr(&out).contains("true"));
}

#[test]
fn print_rejects_bad_word_before_output() {
    let out = rxt("bad_word", &["print", "0x02", "banana"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), "");
    assert!(stderr(&out).contains("invalid value word 'banana'"));
}

#[test]
fn config_selects_sink() {
    let dir = scratch_dir("config_sink");
    let cfg = dir.join("custom.toml");
    std::fs::write(&cfg, "[port]\nsink = \"stderr\"\n").expect("write config");
    let out = rxt(
        "config_sink",
        &["--config", cfg.to_str().expect("utf-8 path"), "print", "0x02"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "");
    assert!(stderr(&out).contains("nil"));
}

#[test]
fn discovered_config_is_used() {
    let dir = scratch_dir("discovered");
    std::fs::write(dir.join("rxt.toml"), "[port]\nsink = \"stderr\"\n").expect("write config");
    let out = rxt("discovered", &["print", "0x29"]);
    std::fs::remove_file(dir.join("rxt.toml")).ok();
    assert!(out.status.success());
    assert_eq!(stdout(&out), "");
    assert!(stderr(&out).contains('5'));
}

#[test]
fn missing_config_is_an_error() {
    let out = rxt("missing_cfg", &["--config", "/nonexistent/rxt.toml", "vectors"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("cannot read"));
}

#[test]
fn encode_integer_and_nil() {
    let out = rxt("encode_int", &["encode", "--int", "-1"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "0xfffffffffffffff9\n");

    let out = rxt("encode_nil", &["encode", "--nil"]);
    assert_eq!(stdout(&out), "0x0000000000000002\n");

    let out = rxt("encode_bool", &["encode", "--bool", "true"]);
    assert_eq!(stdout(&out), "0x000000000000000b\n");
}

#[test]
fn encode_out_of_range() {
    let out = rxt("encode_range", &["encode", "--int", "9223372036854775807"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("outside the 61-bit integer range"));
}

#[test]
fn encode_requires_a_kind() {
    let out = rxt("encode_none", &["encode"]);
    assert!(!out.status.success());
}

#[test]
fn decode_shows_fields() {
    let out = rxt("decode", &["decode", "0x29"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "0x0000000000000029  tag=integer(1)  payload=0x5  -> 5\n"
    );
}

#[test]
fn vectors_pass() {
    let out = rxt("vectors", &["vectors"]);
    assert!(out.status.success(), "stdout: {}", stdout(&out));
    assert!(stdout(&out).contains("wire format v1:"));
    assert!(stdout(&out).contains("vectors, 0 failed"));
}

#[test]
fn init_config_is_loadable() {
    let out = rxt("init_config", &["init-config"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("[port]"));
}

#[test]
fn malformed_discovered_config_warns_and_falls_back() {
    let dir = scratch_dir("malformed");
    std::fs::write(dir.join("rxt.toml"), "[port]\nsink = \"stderr\"\nbogus = [")
        .expect("write config");
    let out = rxt_logged("malformed", "warn", &["print", "0x02"]);
    std::fs::remove_file(dir.join("rxt.toml")).ok();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    // defaults apply, so the value still lands on stdout
    assert_eq!(stdout(&out), "nil\n");
    let err = stderr(&out);
    assert!(err.contains("ignoring config file"), "stderr: {err}");
    assert!(err.contains("invalid toml"), "stderr: {err}");
}

#[test]
fn closed_stdout_is_not_a_crash() {
    // enough output to overflow any pipe buffer once the reader is gone
    let words: Vec<String> = (0..4_000u64)
        .map(|i| format!("{:#x}", (i << 3) | 1))
        .collect();
    let mut args = vec!["decode"];
    args.extend(words.iter().map(String::as_str));

    let mut child = rxt_command("closed_stdout", &args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn rxt-port");
    drop(child.stdout.take());
    let mut err = String::new();
    child
        .stderr
        .take()
        .expect("piped stderr")
        .read_to_string(&mut err)
        .expect("read stderr");
    let status = child.wait().expect("wait rxt-port");

    assert!(status.success(), "status {status:?}, stderr: {err}");
    assert!(!err.contains("panicked"), "stderr: {err}");
}

#[test]
fn binary_logs_under_its_own_target() {
    let out = rxt_logged("target_cli", "rxt_cli=debug", &["vectors"]);
    assert!(out.status.success());
    assert!(stderr(&out).contains("configuration loaded"));

    let out = rxt_logged("target_lib", "rxt_port=debug", &["vectors"]);
    assert!(out.status.success());
    assert!(!stderr(&out).contains("configuration loaded"));
}
