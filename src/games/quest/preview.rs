//! Stage handed over by the level editor through `localStorage`.

use super::stage::StageData;

/// Storage key the editor writes the stage JSON under.
pub const PREVIEW_KEY: &str = "editorPreviewStage";

/// Parse an editor payload. Failures are reported and yield `None`, which
/// sends the session to the hub instead.
pub fn parse(payload: Option<&str>) -> Option<StageData> {
    let json = payload?;
    match StageData::from_json(json) {
        Ok(data) => Some(data),
        Err(e) => {
            crate::console::warn(&format!("preview stage rejected: {e}"));
            None
        }
    }
}

/// Read the payload from browser storage.
#[cfg(target_arch = "wasm32")]
pub fn load() -> Option<StageData> {
    let storage = web_sys::window()?.local_storage().ok()??;
    let payload = storage.get_item(PREVIEW_KEY).ok()?;
    parse(payload.as_deref())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load() -> Option<StageData> {
    None
}
