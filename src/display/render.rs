use anyhow::Result;

/// Writes a human-readable rendition of `self` to a writer.
pub trait Render {
    fn render(&self, f: &mut impl std::io::Write) -> Result<()>;

    /// The rendition as a string.
    fn render_to_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.render(&mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
