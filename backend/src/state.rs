use std::sync::Arc;

use crate::{
    config::Config,
    repositories::{AttendanceSource, FrappeAuth, FrappeClient, SourceError, SourceProvider},
    services::EditWindow,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sources: Arc<dyn SourceProvider>,
}

impl AppState {
    pub fn new(config: Config, sources: Arc<dyn SourceProvider>) -> Self {
        Self { config, sources }
    }

    /// State wired to the Frappe instance named in `config`.
    pub fn from_config(config: Config) -> Result<Self, SourceError> {
        let client = FrappeClient::new(&config.frappe)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn edit_window(&self) -> EditWindow {
        self.config.edit_window()
    }

    pub fn source_for(&self, auth: &FrappeAuth) -> Arc<dyn AttendanceSource> {
        self.sources.source_for(auth)
    }
}
