//! `clientid resolve` command.

use std::sync::Arc;

use crate::adapters::live::bridge::StaticHostBridge;
use crate::cid::{CidService, ScopeRequest};
use crate::config::CidConfig;
use crate::consent::Consent;
use crate::context::{Document, ServiceContext};
use crate::origin::parse_document_url;

/// How the document relates to an embedding host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMode {
    /// Not embedded.
    Detached,
    /// Embedded; the host answers with this id, or has none.
    Embedded(Option<String>),
}

impl HostMode {
    /// Interprets the `--embedded` / `--host-cid` flags.
    #[must_use]
    pub fn from_flags(embedded: bool, host_cid: Option<&str>) -> Self {
        match (embedded, host_cid) {
            (_, Some(cid)) => Self::Embedded(Some(cid.to_string())),
            (true, None) => Self::Embedded(None),
            (false, None) => Self::Detached,
        }
    }

    fn bridge(self) -> StaticHostBridge {
        match self {
            Self::Detached => StaticHostBridge::detached(),
            Self::Embedded(cid) => StaticHostBridge::embedded(cid),
        }
    }
}

/// Resolves one identifier against the live store and waits for it to persist.
///
/// Consent is taken as already given: invoking the command is the consent.
///
/// # Errors
///
/// Returns an error string for an invalid scope or URL, or when an embedding
/// host has no identifier.
pub fn run(
    config: &CidConfig,
    scope: &str,
    url: &str,
    create: bool,
    cookie_name: Option<&str>,
    host: HostMode,
) -> Result<Option<String>, String> {
    let url = parse_document_url(url).map_err(|e| e.to_string())?;
    let document = Document { url, viewport: config.viewport };
    let ctx = ServiceContext::live(config, document, Box::new(host.bridge()));
    let service = CidService::new(Arc::new(ctx));

    let request = ScopeRequest {
        scope: scope.to_string(),
        create_if_missing: create,
        cookie_name: cookie_name.map(String::from),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?;
    runtime.block_on(async {
        let id = service.resolve(request, Consent::granted(), None).await;
        service.flush().await;
        id.map_err(|e| e.to_string())
    })
}
