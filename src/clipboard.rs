use arboard::Clipboard as ArboardClipboard;

/// Destination of the picker's copy shortcut.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// The system clipboard.
#[derive(Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        let mut cb = ArboardClipboard::new()?;
        cb.set_text(text.to_string())?;
        Ok(())
    }
}
