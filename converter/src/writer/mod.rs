//! JSON Lines output.

use crate::error::WriteResult;
use crate::models::NormalizedRecord;
use std::io::Write;

/// Writes one compact JSON object per record, each followed by `\n`.
///
/// Non-ASCII text is written as-is. The writer never flushes on its own;
/// call [`JsonlWriter::flush`] once the run is over.
pub struct JsonlWriter<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        JsonlWriter { writer, written: 0 }
    }

    pub fn write_record(&mut self, record: &NormalizedRecord) -> WriteResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Records written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn flush(&mut self) -> WriteResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
