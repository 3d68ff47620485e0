//! Auto-detection of the deployment platform from runtime signals.

use std::fmt;

use tracing::debug;

use crate::env::Runtime;
use crate::target::BuiltinTarget;

/// User agent reported by Cloudflare Workers and Pages Functions.
pub const CLOUDFLARE_USER_AGENT: &str = "Cloudflare-Workers";

/// Signal that decided a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// `VERCEL=1`
    VercelEnv,
    /// `EdgeRuntime` global
    EdgeRuntimeGlobal,
    /// `Netlify` global
    NetlifyGlobal,
    /// `NETLIFY=true`
    NetlifyEnv,
    /// `navigator.userAgent === "Cloudflare-Workers"`
    CloudflareUserAgent,
    /// `Deno` global
    DenoGlobal,
    /// Nothing matched
    Fallback,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::VercelEnv => "VERCEL=1",
            Self::EdgeRuntimeGlobal => "EdgeRuntime global",
            Self::NetlifyGlobal => "Netlify global",
            Self::NetlifyEnv => "NETLIFY=true",
            Self::CloudflareUserAgent => "navigator.userAgent",
            Self::DenoGlobal => "Deno global",
            Self::Fallback => "default",
        };
        f.write_str(text)
    }
}

/// Result of [`Detector::detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub target: BuiltinTarget,
    pub signal: Signal,
}

/// Platform detector.
///
/// Checks run in a fixed order and the first match wins. Platform env vars
/// come before runtime-identity globals.
///
/// 1. `VERCEL=1` → `vercel`
/// 2. `EdgeRuntime` global → `vercel-edge` (edge detection only)
/// 3. `Netlify` global → `netlify-edge` (edge detection only)
/// 4. `NETLIFY=true` → `netlify`
/// 5. user agent `Cloudflare-Workers` → `cloudflare`
/// 6. `Deno` global → `deno`
/// 7. otherwise → `node`
#[derive(Debug, Clone, Copy, Default)]
pub struct Detector {
    detect_edge: bool,
}

impl Detector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also distinguish edge runtimes (`vercel-edge`, `netlify-edge`).
    ///
    /// The edge signals are JS runtime globals, so this only has an effect
    /// with a [`Runtime`] built by an embedder that reports them.
    ///
    /// # Examples
    ///
    /// ```
    /// use fob_deploy::{BuiltinTarget, Detector, Runtime};
    ///
    /// let runtime = Runtime::builder()
    ///     .process_env(Vec::<(String, String)>::new())
    ///     .netlify_global()
    ///     .build();
    /// assert_eq!(Detector::new().detect(&runtime).target, BuiltinTarget::Node);
    /// assert_eq!(
    ///     Detector::new().with_edge_detection(true).detect(&runtime).target,
    ///     BuiltinTarget::NetlifyEdge
    /// );
    /// ```
    pub fn with_edge_detection(mut self, enabled: bool) -> Self {
        self.detect_edge = enabled;
        self
    }

    /// Run the checks in order against `runtime`; the first match wins.
    pub fn detect(&self, runtime: &Runtime) -> Detection {
        let detection = self.run_checks(runtime);
        debug!(
            target_id = detection.target.id(),
            signal = %detection.signal,
            "detected deployment target"
        );
        detection
    }

    fn run_checks(&self, runtime: &Runtime) -> Detection {
        let found = |target, signal| Detection { target, signal };

        if runtime.get_env("VERCEL").as_deref() == Some("1") {
            return found(BuiltinTarget::Vercel, Signal::VercelEnv);
        }

        if self.detect_edge {
            if runtime.has_edge_runtime() {
                return found(BuiltinTarget::VercelEdge, Signal::EdgeRuntimeGlobal);
            }
            if runtime.has_netlify_global() {
                return found(BuiltinTarget::NetlifyEdge, Signal::NetlifyGlobal);
            }
        }

        if runtime.get_env("NETLIFY").as_deref() == Some("true") {
            return found(BuiltinTarget::Netlify, Signal::NetlifyEnv);
        }

        if runtime.user_agent() == Some(CLOUDFLARE_USER_AGENT) {
            return found(BuiltinTarget::Cloudflare, Signal::CloudflareUserAgent);
        }

        if runtime.has_deno_global() {
            return found(BuiltinTarget::Deno, Signal::DenoGlobal);
        }

        found(BuiltinTarget::DEFAULT, Signal::Fallback)
    }
}

/// Detect the platform of a runtime with edge detection disabled.
pub fn detect_target(runtime: &Runtime) -> BuiltinTarget {
    Detector::new().detect(runtime).target
}
