use std::sync::Arc;

use crate::config::GameConfig;
use crate::services::game_flow::GameFlowService;
use crate::services::games::GameRegistry;
use crate::ws::hub::GameSessionRegistry;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// All live games; each owns its serialization point.
    pub games: Arc<GameRegistry>,
    /// Websocket sessions per game, for broadcasting.
    pub hub: Arc<GameSessionRegistry>,
    /// Command application service.
    pub flow: Arc<GameFlowService>,
}

impl AppState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            games: Arc::new(GameRegistry::new(config)),
            hub: Arc::new(GameSessionRegistry::new()),
            flow: Arc::new(GameFlowService::default()),
        }
    }

}
