use tracing::warn;

use crate::content::{AssetCatalog, AssetSource};
use crate::world::{
    load_next_level, reload_current_level, Level, LevelError, LevelNaming, LevelSession,
    SessionStore,
};

/// Owns the active level and the session that chose it.
///
/// Every successful load replaces the level in one piece and, when a store is
/// attached, persists the session. Failed loads keep the previous level.
pub struct LevelDirector {
    catalog: AssetCatalog,
    source: Box<dyn AssetSource>,
    naming: LevelNaming,
    session: LevelSession,
    store: Option<SessionStore>,
    level: Option<Level>,
}

impl LevelDirector {
    pub fn new(
        catalog: AssetCatalog,
        source: Box<dyn AssetSource>,
        naming: LevelNaming,
        session: LevelSession,
        store: Option<SessionStore>,
    ) -> Self {
        Self {
            catalog,
            source,
            naming,
            session,
            store,
            level: None,
        }
    }

    /// Resumes the saved level if there is one and it still loads, otherwise
    /// advances to the next level.
    pub fn start(&mut self) -> Result<(), LevelError> {
        if self.session.has_level() {
            match self.reload_level() {
                Ok(()) => return Ok(()),
                Err(error) => warn!(
                    level_index = self.session.current_index(),
                    error = %error,
                    "saved_level_unavailable"
                ),
            }
        }
        self.next_level()
    }

    /// On failure the previous level stays installed. The session still points
    /// at it unless the error is `NoLevels`, which resets it.
    pub fn next_level(&mut self) -> Result<(), LevelError> {
        let level = load_next_level(
            &mut self.session,
            &self.catalog,
            self.source.as_ref(),
            &self.naming,
        )?;
        self.install(level);
        Ok(())
    }

    pub fn reload_level(&mut self) -> Result<(), LevelError> {
        let level = reload_current_level(
            &self.session,
            &self.catalog,
            self.source.as_ref(),
            &self.naming,
        )?;
        self.install(level);
        Ok(())
    }

    fn install(&mut self, level: Level) {
        self.level = Some(level);
        let Some(store) = &self.store else {
            return;
        };
        if let Err(error) = store.save(&self.session) {
            warn!(error = %error, "session_save_failed");
        }
    }

    pub fn session(&self) -> LevelSession {
        self.session
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.level.as_mut()
    }
}
