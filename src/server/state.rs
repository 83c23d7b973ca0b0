use crate::settings::Settings;

/// Shared state for the relay server.
#[derive(Clone)]
pub(crate) struct ServerState {
    pub(crate) settings: Settings,
}
