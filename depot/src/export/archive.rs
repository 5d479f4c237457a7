//! Shared zip assembly for the zip-based exporters.
//!
//! Entry metadata is pinned (fixed timestamp, fixed permissions) and callers
//! add entries in a fixed table order, so two exports of identical data
//! produce byte-identical archives. Entry bodies are streamed, keeping peak
//! memory independent of database size.

use crate::error::Result;
use std::io::{Read, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub struct ArchiveBuilder<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> ArchiveBuilder<W> {
    pub fn new(writer: W) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(6))
            .unix_permissions(0o644)
            .last_modified_time(zip::DateTime::default());
        Self {
            zip: ZipWriter::new(writer),
            options,
        }
    }

    /// Add an entry from an in-memory buffer.
    pub fn add_bytes(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.zip.start_file(name.to_string(), self.options)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    /// Add an entry by streaming from a reader.
    pub fn add_reader(&mut self, name: &str, reader: &mut impl Read) -> Result<u64> {
        self.zip.start_file(name.to_string(), self.options)?;
        let copied = std::io::copy(reader, &mut self.zip)?;
        Ok(copied)
    }

    /// Add an entry whose body is produced by a writer callback.
    pub fn add_entry_with<F>(&mut self, name: &str, body: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        self.zip.start_file(name.to_string(), self.options)?;
        body(&mut self.zip)?;
        Ok(())
    }

    /// Finalize the archive and return the underlying writer.
    pub fn finish(self) -> Result<W> {
        Ok(self.zip.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn build(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut archive = ArchiveBuilder::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            archive.add_bytes(name, data).unwrap();
        }
        archive.finish().unwrap().into_inner()
    }

    #[test]
    fn test_identical_input_identical_bytes() {
        let entries: &[(&str, &[u8])] = &[("a.csv", b"x,y\n1,2\n"), ("b.csv", b"z\n3\n")];
        assert_eq!(build(entries), build(entries));
    }

    #[test]
    fn test_entries_readable() {
        let bytes = build(&[("hello.txt", b"hello")]);
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entry = archive.by_name("hello.txt").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "hello");
    }

    #[test]
    fn test_streamed_entry() {
        let mut archive = ArchiveBuilder::new(Cursor::new(Vec::new()));
        let copied = archive
            .add_reader("data.bin", &mut Cursor::new(vec![7u8; 1024]))
            .unwrap();
        assert_eq!(copied, 1024);
        archive.finish().unwrap();
    }
}
