//! Text output seam: clipboard copy and cursor typing.
//!
//! Both operations are fallible and independently reported by the
//! transcription dispatcher; neither ever aborts the pipeline.

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TextOutput: Send + Sync {
    /// Copy text to the system clipboard.
    async fn copy(&self, text: &str) -> Result<()>;

    /// Write text at the active cursor position.
    async fn type_at_cursor(&self, text: &str) -> Result<()>;
}

/// Production implementation over the system clipboard and virtual keyboard.
pub struct SystemTextOutput;

#[async_trait]
impl TextOutput for SystemTextOutput {
    #[cfg(feature = "clipboard")]
    async fn copy(&self, text: &str) -> Result<()> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || crate::clipboard::copy_to_clipboard(&text)).await?
    }

    #[cfg(not(feature = "clipboard"))]
    async fn copy(&self, _text: &str) -> Result<()> {
        anyhow::bail!("murmur was built without clipboard support")
    }

    #[cfg(feature = "typing")]
    async fn type_at_cursor(&self, text: &str) -> Result<()> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || crate::typing::type_at_cursor(&text)).await?
    }

    #[cfg(not(feature = "typing"))]
    async fn type_at_cursor(&self, _text: &str) -> Result<()> {
        anyhow::bail!("murmur was built without typing support")
    }
}
