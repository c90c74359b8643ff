//! Canonical documentation-slug normalization.
//!
//! Maps a raw function identifier to the canonical reference-page slug via
//! an ordered list of rewrite rules. Each rule is a (pattern, rewrite) pair
//! plus a literal-exception table; a rule only rewrites on a successful
//! match and non-matching input passes through unchanged to the next rule.
//! The whole pipeline is stateless and total.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Vectorized suffix: optional verb, interface/pointer/matrix markers, an
/// arity (optionally `xN`), normalized/unsigned markers, a scalar-type tag
/// and an optional trailing vector marker.
static VECTOR_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^gl(\w+?)[ILP]?(?:Matrix)?\d+(x\d+)?N?u?(?:[bsifd]|i64)_?v?$").expect("valid regex")
});

/// Looser second pass: handles the query-verb variant (`Get`/`Getn`) and
/// names whose only arity is the scalar tag; the vector marker here must be
/// a plain lowercase `v`.
static LOOSE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^gl(?:(Get)n?)?(\w+?)[ILP]?\d*N?u?(?:[bsifd]|i64)v$").expect("valid regex")
});

/// Named-object variant: `glClearNamedFramebuffer` and friends collapse to
/// the unnamed verb.
static NAMED_VARIANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^gl(\w+?)?Named([A-Z]\w*)$").expect("valid regex"));

/// One step of the pipeline: a pattern, its rewrite, and the literal inputs
/// whose hand-picked slug overrides the regex-derived one.
pub struct RewriteRule {
    name: &'static str,
    pattern: &'static Regex,
    rewrite: fn(&Captures) -> String,
    exceptions: &'static [(&'static str, &'static str)],
}

impl RewriteRule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply this rule alone. Returns `None` when the pattern does not
    /// match; the exception table is consulted only on a match.
    pub fn apply(&self, input: &str) -> Option<String> {
        let caps = self.pattern.captures(input)?;
        if let Some((_, slug)) = self.exceptions.iter().find(|(raw, _)| *raw == input) {
            return Some((*slug).to_string());
        }
        Some((self.rewrite)(&caps))
    }
}

fn strip_to_verb(caps: &Captures) -> String {
    format!("gl{}", &caps[1])
}

fn join_two_groups(caps: &Captures) -> String {
    format!("gl{}{}", caps.get(1).map_or("", |m| m.as_str()), &caps[2])
}

/// Ordered rewrite pipeline from raw function names to documentation slugs.
pub struct NameNormalizer {
    rules: Vec<RewriteRule>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl NameNormalizer {
    pub fn new() -> Self {
        Self {
            rules: vec![
                RewriteRule {
                    name: "vector-suffix",
                    pattern: &VECTOR_SUFFIX,
                    rewrite: strip_to_verb,
                    exceptions: &[],
                },
                RewriteRule {
                    name: "loose-suffix",
                    pattern: &LOOSE_SUFFIX,
                    rewrite: join_two_groups,
                    exceptions: &[("glScissorIndexedv", "glScissorIndexed")],
                },
                RewriteRule {
                    name: "named-variant",
                    pattern: &NAMED_VARIANT,
                    rewrite: join_two_groups,
                    exceptions: &[],
                },
            ],
        }
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Map a raw function name to its canonical slug. Always returns a
    /// string; input that matches no rule comes back unchanged.
    pub fn normalize(&self, raw: &str) -> String {
        self.rules
            .iter()
            .fold(raw.to_string(), |name, rule| rule.apply(&name).unwrap_or(name))
    }
}

static DEFAULT_NORMALIZER: LazyLock<NameNormalizer> = LazyLock::new(NameNormalizer::new);

/// Normalize with the default pipeline.
pub fn normalize(raw: &str) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}
