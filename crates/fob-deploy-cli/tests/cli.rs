//! End-to-end tests driving the `fob-deploy` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PLATFORM_VARS: &[&str] = &[
    "ASTRO_ADAPTER_MODE",
    "ASTRO_OUTPUT_MODE",
    "VERCEL",
    "NETLIFY",
    "FOB_DEPLOY_TARGET",
    "FOB_DEPLOY_OUTPUT",
    "FOB_DEPLOY_ROOT",
    "RUST_LOG",
];

/// The binary, run in `dir` with no platform variables inherited.
fn fob_deploy(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fob-deploy").unwrap();
    cmd.current_dir(dir).arg("--no-color");
    for var in PLATFORM_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn install(dir: &Path, package: &str, version: &str) {
    let package_dir = dir.join("node_modules").join(package);
    fs::create_dir_all(&package_dir).unwrap();
    fs::write(
        package_dir.join("package.json"),
        format!(r#"{{ "name": "{package}", "version": "{version}", "main": "dist/index.js" }}"#),
    )
    .unwrap();
}

#[test]
fn targets_lists_every_builtin() {
    let temp = TempDir::new().unwrap();
    let mut cmd = fob_deploy(temp.path());
    cmd.arg("targets");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cloudflare"))
        .stdout(predicate::str::contains("@deno/astro-adapter"))
        .stdout(predicate::str::contains("astro-sst"))
        .stdout(predicate::str::contains("deprecated, use vercel"))
        .stdout(predicate::str::contains("[static only]"));
}

#[test]
fn detect_reads_platform_variables() {
    let temp = TempDir::new().unwrap();

    fob_deploy(temp.path())
        .arg("detect")
        .assert()
        .success()
        .stdout("node\n");

    fob_deploy(temp.path())
        .arg("detect")
        .env("VERCEL", "1")
        .assert()
        .success()
        .stdout("vercel\n");

    fob_deploy(temp.path())
        .args(["detect", "--json"])
        .env("NETLIFY", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""target": "netlify""#));
}

#[test]
fn detect_ignores_adapter_override() {
    let temp = TempDir::new().unwrap();
    fob_deploy(temp.path())
        .arg("detect")
        .env("ASTRO_ADAPTER_MODE", "deno")
        .assert()
        .success()
        .stdout("node\n");
}

#[test]
fn resolve_builtin_runs_config_setup() {
    let temp = TempDir::new().unwrap();
    install(temp.path(), "@astrojs/node", "9.1.0");

    fob_deploy(temp.path())
        .args(["resolve", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""outcome": "builtin""#))
        .stdout(predicate::str::contains(r#""integration": "@astrojs/node""#))
        .stdout(predicate::str::contains(r#""version": "9.1.0""#))
        .stdout(predicate::str::contains(r#""mode": "standalone""#));
}

#[test]
fn resolve_uses_config_options_and_register() {
    let temp = TempDir::new().unwrap();
    install(temp.path(), "astro-railway-adapter", "0.2.0");
    fs::write(
        temp.path().join("fob-deploy.toml"),
        r#"
target = "railway"

[options.railway]
region = "eu-west"

[register]
railway = "astro-railway-adapter"
"#,
    )
    .unwrap();

    fob_deploy(temp.path())
        .args(["resolve", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""outcome": "custom""#))
        .stdout(predicate::str::contains(r#""integration": "astro-railway-adapter""#))
        .stdout(predicate::str::contains(r#""region": "eu-west""#));
}

#[test]
fn env_override_beats_config_target() {
    let temp = TempDir::new().unwrap();
    install(temp.path(), "@astrojs/cloudflare", "12.0.0");
    fs::write(temp.path().join("fob-deploy.toml"), "target = \"deno\"\n").unwrap();

    fob_deploy(temp.path())
        .arg("resolve")
        .env("ASTRO_ADAPTER_MODE", "cloudflare")
        .assert()
        .success()
        .stdout("@astrojs/cloudflare\n");
}

#[test]
fn unknown_target_falls_back_to_node_with_warning() {
    let temp = TempDir::new().unwrap();
    install(temp.path(), "@astrojs/node", "9.1.0");

    fob_deploy(temp.path())
        .args(["resolve", "company-platform"])
        .assert()
        .success()
        .stdout("@astrojs/node\n")
        .stderr(predicate::str::contains("company-platform"))
        .stderr(predicate::str::contains("register"));
}

#[test]
fn missing_adapter_package_fails_with_install_command() {
    let temp = TempDir::new().unwrap();

    fob_deploy(temp.path())
        .args(["resolve", "vercel"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pnpm add @astrojs/vercel"));
}

#[test]
fn missing_config_file_is_an_error() {
    let temp = TempDir::new().unwrap();

    fob_deploy(temp.path())
        .args(["resolve", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}

#[test]
fn output_selection() {
    let temp = TempDir::new().unwrap();

    fob_deploy(temp.path())
        .args(["output", "node"])
        .assert()
        .success()
        .stdout("static\n");

    fob_deploy(temp.path())
        .args(["output", "node", "--mode", "server"])
        .assert()
        .success()
        .stdout("server\n");

    fob_deploy(temp.path())
        .args(["output", "vercel-static", "--mode", "server"])
        .assert()
        .success()
        .stdout("static\n");

    fob_deploy(temp.path())
        .args(["output", "node", "--mode", "hybrid"])
        .assert()
        .success()
        .stdout("static\n");

    fob_deploy(temp.path())
        .args(["output", "deno"])
        .env("ASTRO_OUTPUT_MODE", "server")
        .assert()
        .success()
        .stdout("server\n");
}

#[test]
fn output_mode_from_config_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("fob-deploy.toml"), "output = \"server\"\n").unwrap();

    fob_deploy(temp.path())
        .arg("output")
        .assert()
        .success()
        .stdout("server\n");
}

#[test]
fn env_output_mode_beats_config_file() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("fob-deploy.toml"),
        "target = \"deno\"\noutput = \"static\"\n",
    )
    .unwrap();

    fob_deploy(temp.path())
        .arg("output")
        .env("ASTRO_OUTPUT_MODE", "server")
        .assert()
        .success()
        .stdout("server\n");

    fob_deploy(temp.path())
        .args(["output", "--mode", "static"])
        .env("ASTRO_OUTPUT_MODE", "server")
        .assert()
        .success()
        .stdout("static\n");
}

#[test]
fn edge_flag_is_not_accepted() {
    let temp = TempDir::new().unwrap();

    fob_deploy(temp.path())
        .args(["detect", "--edge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--edge"));
}
