/*!
 * Record sinks: route classified rows to their output stream
 */

use crate::error::Result;
use crate::types::{BlockRow, Record, Stream, TreeRow};

/// Destination of the records produced by the walkers
pub trait RecordSink {
    /// Append a record to its stream, preserving call order
    fn emit(&mut self, record: Record) -> Result<()>;

    /// Flush everything written so far
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn emit(&mut self, record: Record) -> Result<()> {
        (**self).emit(record)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Sink keeping every stream in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub directories: Vec<TreeRow>,
    pub files: Vec<TreeRow>,
    pub blocks: Vec<BlockRow>,
    /// Stream of every record in global emission order
    pub order: Vec<Stream>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree rows of both streams in emission order
    pub fn tree_rows(&self) -> Vec<&TreeRow> {
        let mut directories = self.directories.iter();
        let mut files = self.files.iter();

        self.order
            .iter()
            .filter_map(|stream| match stream {
                Stream::Directories => directories.next(),
                Stream::Files => files.next(),
                Stream::Blocks => None,
            })
            .collect()
    }
}

impl RecordSink for MemorySink {
    fn emit(&mut self, record: Record) -> Result<()> {
        self.order.push(record.stream());
        match record {
            Record::Directory(row) => self.directories.push(row),
            Record::File(row) => self.files.push(row),
            Record::Block(row) => self.blocks.push(row),
        }
        Ok(())
    }
}
