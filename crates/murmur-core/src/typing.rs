//! Typing transcripts into the focused window via virtual keyboard simulation.

use anyhow::Result;
use enigo::{Enigo, Keyboard, Settings};

/// Type `text` at the current cursor position.
pub fn type_at_cursor(text: &str) -> Result<()> {
    let mut enigo = Enigo::new(&Settings::default())
        .map_err(|e| anyhow::anyhow!("Failed to initialize virtual keyboard: {e}"))?;
    enigo
        .text(text)
        .map_err(|e| anyhow::anyhow!("Failed to type text at cursor: {e}"))?;
    Ok(())
}
