use vendorhub_auth::{Capabilities, Principal};

/// Caller identity for a request, inserted by exactly one gate middleware.
///
/// Handlers never resolve identity themselves; they read this and ask
/// [`crate::authz`] whether it carries the capability they need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn capabilities(&self) -> Capabilities {
        self.principal.capabilities()
    }
}
