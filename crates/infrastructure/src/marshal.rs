//! Writer-facing marshal entry points
//!
//! Each call marshals the records, encodes the whole document into memory
//! and only then writes it to the sink with a single `write_all`. A failed
//! call leaves the sink untouched.

use std::io::Write;

use tracing::debug;

use jsonapi_application::{DescriptorRegistry, DocumentEncoder, Marshaler};
use jsonapi_domain::{ApiExtras, Document, Record};

use crate::config::EncoderConfig;
use crate::error::EncodeResult;
use crate::serialization::JsonDocumentEncoder;

/// Marshals records and writes the encoded documents to a sink.
#[derive(Debug, Clone)]
pub struct DocumentWriter<'r> {
    marshaler: Marshaler<'r>,
    encoder: JsonDocumentEncoder,
}

impl Default for DocumentWriter<'static> {
    fn default() -> Self {
        Self::new(DescriptorRegistry::global(), EncoderConfig::default())
    }
}

impl<'r> DocumentWriter<'r> {
    /// Creates a writer over `registry` with the given layout.
    #[must_use]
    pub const fn new(registry: &'r DescriptorRegistry, config: EncoderConfig) -> Self {
        Self {
            marshaler: Marshaler::new(registry),
            encoder: JsonDocumentEncoder::new(config),
        }
    }

    /// Marshals `record` as a single-resource document.
    ///
    /// # Errors
    ///
    /// Returns an error if marshaling, encoding or writing fails.
    pub fn write_one<W>(
        &self,
        writer: &mut W,
        record: &dyn Record,
        extras: &ApiExtras,
    ) -> EncodeResult<()>
    where
        W: Write + ?Sized,
    {
        let payload = self.marshaler.marshal_one(record, extras)?;
        self.write_document(writer, &Document::One(payload))
    }

    /// Marshals `records` as a multi-resource document.
    ///
    /// # Errors
    ///
    /// Returns an error if marshaling, encoding or writing fails.
    pub fn write_many<W>(
        &self,
        writer: &mut W,
        records: &[&dyn Record],
        extras: &ApiExtras,
    ) -> EncodeResult<()>
    where
        W: Write + ?Sized,
    {
        let payload = self.marshaler.marshal_many(records, extras)?;
        self.write_document(writer, &Document::Many(payload))
    }

    fn write_document<W>(&self, writer: &mut W, document: &Document) -> EncodeResult<()>
    where
        W: Write + ?Sized,
    {
        let bytes = self.encoder.encode(document)?;
        writer.write_all(&bytes)?;
        debug!(bytes = bytes.len(), "document written");
        Ok(())
    }
}

/// Writes `record` as a single-resource document.
///
/// # Errors
///
/// Returns an error if marshaling, encoding or writing fails; nothing is
/// written in that case unless the sink itself failed.
pub fn marshal_one_payload<W>(writer: &mut W, record: &dyn Record) -> EncodeResult<()>
where
    W: Write + ?Sized,
{
    DocumentWriter::default().write_one(writer, record, &ApiExtras::new())
}

/// Writes `record` as a single-resource document with links configured by
/// `configure`.
///
/// # Errors
///
/// Returns an error if marshaling, encoding or writing fails.
pub fn marshal_one_payload_with_extras<W, F>(
    writer: &mut W,
    record: &dyn Record,
    configure: F,
) -> EncodeResult<()>
where
    W: Write + ?Sized,
    F: FnOnce(&mut ApiExtras),
{
    let mut extras = ApiExtras::new();
    configure(&mut extras);
    DocumentWriter::default().write_one(writer, record, &extras)
}

/// Writes `records` as a multi-resource document.
///
/// # Errors
///
/// Returns an error if marshaling, encoding or writing fails.
pub fn marshal_many_payload<W>(writer: &mut W, records: &[&dyn Record]) -> EncodeResult<()>
where
    W: Write + ?Sized,
{
    DocumentWriter::default().write_many(writer, records, &ApiExtras::new())
}

/// Writes `records` as a multi-resource document with links configured by
/// `configure`.
///
/// # Errors
///
/// Returns an error if marshaling, encoding or writing fails.
pub fn marshal_many_payload_with_extras<W, F>(
    writer: &mut W,
    records: &[&dyn Record],
    configure: F,
) -> EncodeResult<()>
where
    W: Write + ?Sized,
    F: FnOnce(&mut ApiExtras),
{
    let mut extras = ApiExtras::new();
    configure(&mut extras);
    DocumentWriter::default().write_many(writer, records, &extras)
}
