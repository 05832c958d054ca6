use serde::Serialize;
use thiserror::Error;

/// Why a search submission was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchBlocked {
    #[error("Join the community or skip the gate before searching")]
    CommunityGate,

    #[error("Indexing {name} for the first time, search will be available when it finishes")]
    FirstIndexNotReady { name: String },

    #[error("Server is down")]
    ServerDown,
}

/// Blocking panel drawn over the base view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Overlay {
    CommunityGate,
    FirstIndexNotReady { name: String },
}

/// Non-blocking notice shown above the base view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Banner {
    NoSourcesConnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BaseView {
    Landing,
    Results,
}

/// Everything needed to decide what the user sees
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Screen {
    pub overlay: Option<Overlay>,
    pub banner: Option<Banner>,
    pub base: BaseView,
}
