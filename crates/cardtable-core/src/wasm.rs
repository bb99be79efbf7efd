//! WebAssembly bindings for the Cardtable state mirror.
//!
//! Everything crosses the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::actions::UserAction;
use crate::card::CardId;
use crate::config::GameConfig;
use crate::dispatcher::{ActionDispatcher, OpenCatalog};
use crate::events::RawEvent;
use crate::game::GameStateMachine;
use crate::player::PlayerId;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed session wrapper
#[wasm_bindgen]
pub struct WasmGame {
    game: GameStateMachine,
    dispatcher: ActionDispatcher<OpenCatalog>,
}

#[wasm_bindgen]
impl WasmGame {
    /// Seat the local player. `config_json` may be empty for the default variant.
    #[wasm_bindgen(constructor)]
    pub fn new(local_id: PlayerId, local_name: &str, config_json: &str) -> Result<WasmGame, JsValue> {
        let config = if config_json.trim().is_empty() {
            GameConfig::default()
        } else {
            GameConfig::from_json(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };

        Ok(WasmGame {
            game: GameStateMachine::new(local_id, local_name, config),
            dispatcher: ActionDispatcher::new(OpenCatalog),
        })
    }

    /// Apply one wire event, returns notifications JSON or error
    #[wasm_bindgen(js_name = applyEvent)]
    pub fn apply_event(&mut self, event_json: &str) -> Result<String, JsValue> {
        let raw: RawEvent = serde_json::from_str(event_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid event JSON: {}", e)))?;
        let event = raw
            .decode()
            .map_err(|e| JsValue::from_str(&format!("Invalid event payload: {}", e)))?;

        match self.game.apply_event(&event) {
            Ok(notifications) => {
                Ok(serde_json::to_string(&notifications).unwrap_or_else(|_| "[]".to_string()))
            }
            Err(e) => Err(JsValue::from_str(&format!("Event dropped: {}", e))),
        }
    }

    /// Validate an action on a selection of local card ids, returns intents JSON
    #[wasm_bindgen]
    pub fn dispatch(&self, action_json: &str, selection_json: &str) -> Result<String, JsValue> {
        let action: UserAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;
        let ids: Vec<CardId> = serde_json::from_str(selection_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid selection: {}", e)))?;

        let selection = self.game.select(&ids);
        match self.dispatcher.dispatch(&action, &selection, &self.game) {
            Ok(intents) => Ok(serde_json::to_string(&intents).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Action refused: {}", e))),
        }
    }

    /// Get the whole mirrored state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.game).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen(js_name = getLocalId)]
    pub fn get_local_id(&self) -> PlayerId {
        self.game.local_id()
    }

    /// Get a specific player's state as JSON
    #[wasm_bindgen(js_name = getPlayer)]
    pub fn get_player(&self, player: PlayerId) -> String {
        match self.game.player(player) {
            Some(p) => serde_json::to_string(p).unwrap_or_else(|_| "{}".to_string()),
            None => "null".to_string(),
        }
    }
}
