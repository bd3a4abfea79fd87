//! Copying download links to the system clipboard (`arboard`)

use anyhow::{bail, Context, Result};
use arboard::Clipboard;

/// Put a download link on the clipboard.
///
/// A new clipboard handle is opened per copy; on headless Linux there is no
/// display server and this fails.
pub fn copy_link(url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        bail!("Nothing to copy");
    }

    let mut clipboard = Clipboard::new().context("Clipboard unavailable")?;
    clipboard
        .set_text(url.to_string())
        .with_context(|| format!("Failed to copy {}", url))?;
    tracing::debug!("Copied link {}", url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_link_is_rejected() {
        let err = copy_link("   ").unwrap_err();
        assert_eq!(err.to_string(), "Nothing to copy");
    }
}
