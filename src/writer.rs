/*!
 * CSV writer implementation for dagdump
 */

use std::fs::File;
use std::io::{self, Write};

use csv::{Writer, WriterBuilder};

use crate::config::OutputPaths;
use crate::error::{CrawlError, Result};
use crate::sink::RecordSink;
use crate::types::{BlockRow, Record, TreeRow};

/// Sink writing the three streams to CSV files
pub struct CsvSink<W: Write = File> {
    directories: Writer<W>,
    files: Writer<W>,
    blocks: Writer<W>,
}

impl CsvSink<File> {
    /// Create (or truncate) the three output files and write their headers
    pub fn create(paths: &OutputPaths) -> Result<Self> {
        Self::from_writers(
            File::create(&paths.directories)?,
            File::create(&paths.files)?,
            File::create(&paths.blocks)?,
        )
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap arbitrary writers and write the headers
    pub fn from_writers(directories: W, files: W, blocks: W) -> Result<Self> {
        let mut directories = Self::open(directories);
        let mut files = Self::open(files);
        let mut blocks = Self::open(blocks);

        // Headers go out even if the stream stays empty
        directories.write_record(TreeRow::HEADERS)?;
        files.write_record(TreeRow::HEADERS)?;
        blocks.write_record(BlockRow::HEADERS)?;

        Ok(Self {
            directories,
            files,
            blocks,
        })
    }

    fn open(inner: W) -> Writer<W> {
        WriterBuilder::new().has_headers(false).from_writer(inner)
    }

    /// Flush and hand back the underlying writers
    pub fn into_inner(self) -> Result<(W, W, W)> {
        let unwrap = |writer: Writer<W>| {
            writer.into_inner().map_err(|e| {
                CrawlError::Io(io::Error::new(e.error().kind(), e.error().to_string()))
            })
        };

        Ok((
            unwrap(self.directories)?,
            unwrap(self.files)?,
            unwrap(self.blocks)?,
        ))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn emit(&mut self, record: Record) -> Result<()> {
        match record {
            Record::Directory(row) => self.directories.serialize(row)?,
            Record::File(row) => self.files.serialize(row)?,
            Record::Block(row) => self.blocks.serialize(row)?,
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.directories.flush()?;
        self.files.flush()?;
        self.blocks.flush()?;
        Ok(())
    }
}
