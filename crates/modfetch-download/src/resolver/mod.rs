//! Request resolution.
//!
//! Expands user patterns into the ordered list of modules to fetch, using
//! the `ModuleGraphPort` abstraction.

use indexmap::IndexMap;

use modfetch_core::config::MODULES_ENV;
use modfetch_core::{
    FetchError, ListOptions, ModuleContext, ModuleGraphPort, ModuleKey, Notice,
};

/// One module to report on, in resolution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRequest {
    /// Resolved (path, version), after following any replacement.
    pub key: ModuleKey,
    /// Resolution failure; such requests are reported but never fetched.
    pub error: Option<FetchError>,
}

impl ModuleRequest {
    /// Whether this request should be handed to the fetch pipeline.
    pub const fn is_schedulable(&self) -> bool {
        self.error.is_none()
    }
}

/// Output of [`resolve_requests`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Distinct modules in first-seen order.
    pub requests: Vec<ModuleRequest>,
    /// Diagnostics that are not errors.
    pub notices: Vec<Notice>,
}

/// Resolve `patterns` into the modules to download.
///
/// - Module mode off is a `Configuration` error
/// - No patterns outside a module root is a `Usage` error
/// - No patterns inside a module root means `all`
/// - Patterns naming the main module produce a notice and are dropped
/// - The main module and directory replacements are silently skipped
/// - Modules with an equal resolved key are coalesced (first one wins)
pub async fn resolve_requests(
    graph: &dyn ModuleGraphPort,
    ctx: &ModuleContext,
    patterns: &[String],
) -> Result<Resolution, FetchError> {
    if ctx.mode.is_off() {
        return Err(FetchError::configuration(format!(
            "modules disabled by {MODULES_ENV}=off"
        )));
    }

    let mut notices = Vec::new();
    let patterns = if patterns.is_empty() {
        if !ctx.has_mod_root() {
            return Err(FetchError::usage(
                "no modules specified (see 'modfetch download --help')",
            ));
        }
        vec!["all".to_string()]
    } else if let Some(main) = &ctx.main {
        let mut kept = Vec::with_capacity(patterns.len());
        for arg in patterns {
            if main.is_named_by(arg) {
                tracing::info!(
                    target: "modfetch.download",
                    argument = %arg,
                    "skipping main module argument"
                );
                notices.push(Notice::new(format!(
                    "skipping argument {arg} that resolves to the main module"
                )));
            } else {
                kept.push(arg.clone());
            }
        }
        kept
    } else {
        patterns.to_vec()
    };

    if patterns.is_empty() {
        return Ok(Resolution {
            requests: Vec::new(),
            notices,
        });
    }

    let descriptors = graph.list_modules(&patterns, ListOptions::default()).await;
    let listed = descriptors.len();

    let mut requests: IndexMap<ModuleKey, ModuleRequest> = IndexMap::new();
    for desc in descriptors {
        if desc.is_nothing_to_fetch() {
            continue;
        }
        let key = desc.key();
        let error = desc
            .resolved()
            .error
            .as_ref()
            .map(|message| FetchError::resolution(key.to_string(), message.clone()));
        requests
            .entry(key.clone())
            .or_insert(ModuleRequest { key, error });
    }

    tracing::debug!(
        target: "modfetch.download",
        listed,
        requests = requests.len(),
        "resolved download requests"
    );

    Ok(Resolution {
        requests: requests.into_values().collect(),
        notices,
    })
}
