//! Tests against the real process environment. They mutate global state, so
//! every test is serialized.

use fob_deploy::{
    adapter, factory_fn, output, AdapterOptions, Error, Integration, OutputMode, Runtime,
    ADAPTER_ENV_VAR, OUTPUT_MODE_ENV_VAR,
};
use serial_test::serial;

const PLATFORM_VARS: &[&str] = &[ADAPTER_ENV_VAR, OUTPUT_MODE_ENV_VAR, "VERCEL", "NETLIFY"];

/// Clears the platform variables on creation and again on drop.
struct EnvGuard;

impl EnvGuard {
    fn new() -> Self {
        clear();
        Self
    }

    fn set(&self, key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) };
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        clear();
    }
}

fn clear() {
    for key in PLATFORM_VARS {
        unsafe { std::env::remove_var(key) };
    }
}

#[test]
#[serial]
fn current_runtime_reads_process_env() {
    let env = EnvGuard::new();
    env.set(ADAPTER_ENV_VAR, "netlify");

    let runtime = Runtime::current();
    assert_eq!(runtime.get_env(ADAPTER_ENV_VAR).as_deref(), Some("netlify"));
    assert_eq!(runtime.get_env("FOB_DEPLOY_SURELY_UNSET_VAR"), None);
}

#[tokio::test]
#[serial]
async fn adapter_honours_env_override_for_custom_targets() {
    let env = EnvGuard::new();
    env.set(ADAPTER_ENV_VAR, "railway");

    let options = AdapterOptions::new().register(
        "railway",
        factory_fn(|_| Ok(Integration::new("railway-adapter"))),
    );
    let integration = adapter(None, &options).await.unwrap();
    assert_eq!(integration.name(), "railway-adapter");
}

#[tokio::test]
#[serial]
async fn adapter_reports_missing_builtin_package() {
    let env = EnvGuard::new();
    env.set("VERCEL", "1");

    let err = adapter(None, &AdapterOptions::new()).await.unwrap_err();
    match err {
        Error::MissingDependency { package, remedy } => {
            assert_eq!(package, "@astrojs/vercel");
            assert_eq!(remedy, "pnpm add @astrojs/vercel");
        }
        other => panic!("expected MissingDependency, got {other:?}"),
    }
}

#[test]
#[serial]
fn output_reads_env_mode() {
    let env = EnvGuard::new();
    assert_eq!(output(None, None), OutputMode::Static);

    env.set(OUTPUT_MODE_ENV_VAR, "server");
    assert_eq!(output(Some("node"), None), OutputMode::Server);
    assert_eq!(output(Some("vercel-static"), None), OutputMode::Static);
    assert_eq!(output(Some("node"), Some(OutputMode::Hybrid)), OutputMode::Static);
}

#[test]
#[serial]
fn output_uses_env_target_for_static_only_aliases() {
    let env = EnvGuard::new();
    env.set(ADAPTER_ENV_VAR, "netlify-static");
    env.set(OUTPUT_MODE_ENV_VAR, "server");

    assert_eq!(output(None, Some(OutputMode::Server)), OutputMode::Static);
}
