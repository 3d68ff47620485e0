//! Built-in deployment targets.

use std::fmt;

use serde_json::{json, Map, Value};

/// Deployment targets shipped with fob-deploy.
///
/// Deprecated aliases (`netlify-edge`, `netlify-static`, `vercel-edge`,
/// `vercel-static`) stay resolvable and route to the same package as their
/// replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTarget {
    Cloudflare,
    Deno,
    Netlify,
    NetlifyEdge,
    NetlifyStatic,
    Sst,
    Vercel,
    VercelEdge,
    VercelStatic,
    Node,
}

impl BuiltinTarget {
    /// Every built-in, in listing order.
    pub const ALL: [BuiltinTarget; 10] = [
        Self::Cloudflare,
        Self::Deno,
        Self::Netlify,
        Self::NetlifyEdge,
        Self::NetlifyStatic,
        Self::Sst,
        Self::Vercel,
        Self::VercelEdge,
        Self::VercelStatic,
        Self::Node,
    ];

    /// The fallback target for unrecognized identifiers.
    pub const DEFAULT: BuiltinTarget = Self::Node;

    /// Look up a built-in by exact, case-sensitive identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|target| target.id() == id)
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Cloudflare => "cloudflare",
            Self::Deno => "deno",
            Self::Netlify => "netlify",
            Self::NetlifyEdge => "netlify-edge",
            Self::NetlifyStatic => "netlify-static",
            Self::Sst => "sst",
            Self::Vercel => "vercel",
            Self::VercelEdge => "vercel-edge",
            Self::VercelStatic => "vercel-static",
            Self::Node => "node",
        }
    }

    /// Adapter package backing this target.
    pub fn package(self) -> &'static str {
        match self {
            Self::Cloudflare => "@astrojs/cloudflare",
            Self::Deno => "@deno/astro-adapter",
            Self::Netlify | Self::NetlifyEdge | Self::NetlifyStatic => "@astrojs/netlify",
            Self::Sst => "astro-sst",
            Self::Vercel | Self::VercelEdge | Self::VercelStatic => "@astrojs/vercel",
            Self::Node => "@astrojs/node",
        }
    }

    /// Options applied underneath the caller's options.
    pub fn default_options(self) -> Map<String, Value> {
        let defaults = match self {
            Self::Deno => json!({ "port": 4321 }),
            Self::Node => json!({ "mode": "standalone" }),
            _ => json!({}),
        };
        match defaults {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// The current target a deprecated alias routes to.
    pub fn replacement(self) -> Option<Self> {
        match self {
            Self::NetlifyEdge | Self::NetlifyStatic => Some(Self::Netlify),
            Self::VercelEdge | Self::VercelStatic => Some(Self::Vercel),
            _ => None,
        }
    }

    pub fn is_deprecated(self) -> bool {
        self.replacement().is_some()
    }

    /// Aliases that only ever produced pre-rendered output.
    pub fn is_static_only(self) -> bool {
        matches!(self, Self::NetlifyStatic | Self::VercelStatic)
    }
}

impl fmt::Display for BuiltinTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for target in BuiltinTarget::ALL {
            assert_eq!(BuiltinTarget::from_id(target.id()), Some(target));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(BuiltinTarget::from_id("Vercel"), None);
        assert_eq!(BuiltinTarget::from_id(" node"), None);
        assert_eq!(BuiltinTarget::from_id("vercel"), Some(BuiltinTarget::Vercel));
    }

    #[test]
    fn aliases_share_package_with_replacement() {
        for target in BuiltinTarget::ALL {
            if let Some(replacement) = target.replacement() {
                assert_eq!(target.package(), replacement.package());
                assert!(!replacement.is_deprecated());
            }
        }
    }

    #[test]
    fn default_overlays() {
        assert_eq!(
            Value::Object(BuiltinTarget::Node.default_options()),
            json!({ "mode": "standalone" })
        );
        assert_eq!(
            Value::Object(BuiltinTarget::Deno.default_options()),
            json!({ "port": 4321 })
        );
        assert!(BuiltinTarget::Vercel.default_options().is_empty());
    }

    #[test]
    fn only_static_aliases_are_static_only() {
        let static_only: Vec<_> = BuiltinTarget::ALL
            .into_iter()
            .filter(|t| t.is_static_only())
            .collect();
        assert_eq!(
            static_only,
            vec![BuiltinTarget::NetlifyStatic, BuiltinTarget::VercelStatic]
        );
    }
}
