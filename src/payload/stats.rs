//! Dataset statistics payloads.
//!
//! A statistics artifact's URI points at a directory tree with one
//! subdirectory per data split. Inside a split the statistics live either
//! in a raw binary proto file (`FeatureStats.pb`) or as the first record
//! of a TFRecord container (`stats_tfrecord`). This module decodes both,
//! including the TFRecord framing with its masked CRC32C checksums.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use prost::{Enumeration, Message};
use tracing::warn;

use crate::error::{Error, Result};

/// File name of the raw binary proto payload inside a split directory.
pub const FEATURE_STATS_FILE: &str = "FeatureStats.pb";
/// File name of the TFRecord container payload inside a split directory.
pub const STATS_TFRECORD_FILE: &str = "stats_tfrecord";

/// Largest accepted record payload; guards against corrupt length words.
const MAX_RECORD_LEN: u64 = 1 << 30;

/// Statistics over a collection of datasets.
#[derive(Clone, PartialEq, Message)]
pub struct DatasetFeatureStatisticsList {
    /// One entry per dataset, usually one per data split
    #[prost(message, repeated, tag = "1")]
    pub datasets: Vec<DatasetFeatureStatistics>,
}

/// Statistics over one dataset.
#[derive(Clone, PartialEq, Message)]
pub struct DatasetFeatureStatistics {
    /// Dataset name
    #[prost(string, tag = "1")]
    pub name: String,
    /// Number of examples in the dataset
    #[prost(uint64, tag = "2")]
    pub num_examples: u64,
    /// Per-feature statistics
    #[prost(message, repeated, tag = "3")]
    pub features: Vec<FeatureNameStatistics>,
    /// Weighted example count, when example weights were applied
    #[prost(double, tag = "4")]
    pub weighted_num_examples: f64,
}

/// Statistics for one named feature.
#[derive(Clone, PartialEq, Message)]
pub struct FeatureNameStatistics {
    /// Feature name
    #[prost(string, tag = "1")]
    pub name: String,
    /// Value type as a raw enum number; see [`Self::feature_kind`]
    #[prost(enumeration = "FeatureType", tag = "2")]
    pub feature_type: i32,
}

impl FeatureNameStatistics {
    /// Value type of the feature; unknown numbers fall back to `Int`.
    #[must_use]
    pub fn feature_kind(&self) -> FeatureType {
        FeatureType::try_from(self.feature_type).unwrap_or(FeatureType::Int)
    }
}

/// Value type of a feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum FeatureType {
    /// Integer-valued feature
    Int = 0,
    /// Float-valued feature
    Float = 1,
    /// String-valued feature
    String = 2,
    /// Opaque bytes feature
    Bytes = 3,
    /// Nested struct feature
    Struct = 4,
}

/// CRC32C, bitwise over the reversed Castagnoli polynomial.
fn crc32c(bytes: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in bytes {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0x82f6_3b78 & mask);
        }
    }
    !crc
}

/// The rotated-and-offset CRC32C the TFRecord format stores.
fn masked_crc(bytes: &[u8]) -> u32 {
    crc32c(bytes).rotate_right(15).wrapping_add(0xa282_ead8)
}

/// Append one framed record to a TFRecord stream.
///
/// The frame is a little-endian length word, its masked CRC32C, the
/// payload bytes, and the payload's masked CRC32C.
///
/// # Errors
///
/// Returns [`Error::Io`] when the underlying writer fails.
pub fn write_tfrecord<W: Write>(writer: &mut W, record: &[u8]) -> Result<()> {
    let length = record.len() as u64;
    let length_bytes = length.to_le_bytes();
    writer.write_all(&length_bytes)?;
    writer.write_all(&masked_crc(&length_bytes).to_le_bytes())?;
    writer.write_all(record)?;
    writer.write_all(&masked_crc(record).to_le_bytes())?;
    Ok(())
}

/// Iterator over the records of a TFRecord stream.
///
/// Yields each record's payload bytes after checking both frame
/// checksums. A clean end of input at a record boundary ends the
/// iterator; input that stops mid-record yields an [`Error::Io`] and a
/// checksum mismatch yields an [`Error::StatsPayload`].
#[derive(Debug)]
pub struct TfRecordReader<R: Read> {
    reader: R,
}

impl<R: Read> TfRecordReader<R> {
    /// Wrap a byte stream.
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the 8-byte length word, or detect a clean end of input.
    fn read_length(&mut self) -> Result<Option<u64>> {
        let mut buf = [0u8; 8];
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.reader.read(&mut buf[filled..])?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "record length cut short",
                )
                .into());
            }
            filled += n;
        }
        let mut crc = [0u8; 4];
        self.reader.read_exact(&mut crc)?;
        if u32::from_le_bytes(crc) != masked_crc(&buf) {
            return Err(Error::StatsPayload(
                "record length checksum mismatch".to_string(),
            ));
        }
        Ok(Some(u64::from_le_bytes(buf)))
    }
}

impl TfRecordReader<BufReader<File>> {
    /// Open a TFRecord file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: Read> Iterator for TfRecordReader<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let length = match self.read_length() {
            Ok(Some(length)) => length,
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };
        if length > MAX_RECORD_LEN {
            return Some(Err(Error::StatsPayload(format!(
                "record length {length} exceeds the {MAX_RECORD_LEN} byte limit"
            ))));
        }
        let Ok(length) = usize::try_from(length) else {
            return Some(Err(Error::StatsPayload(format!(
                "record length {length} does not fit in memory"
            ))));
        };

        let mut record = vec![0u8; length];
        if let Err(e) = self.reader.read_exact(&mut record) {
            return Some(Err(e.into()));
        }
        let mut crc = [0u8; 4];
        if let Err(e) = self.reader.read_exact(&mut crc) {
            return Some(Err(e.into()));
        }
        if u32::from_le_bytes(crc) != masked_crc(&record) {
            return Some(Err(Error::StatsPayload(
                "record data checksum mismatch".to_string(),
            )));
        }
        Some(Ok(record))
    }
}

/// Read the statistics payload of one data split under a statistics
/// artifact URI.
///
/// Prefers the raw proto file and falls back to the first record of the
/// TFRecord container. When neither file exists the split has no
/// statistics; that is an expected state, logged at warn level, and
/// reported as `Ok(None)`.
///
/// # Errors
///
/// Returns [`Error::Io`] on unreadable files, [`Error::StatsPayload`] on
/// an empty or corrupt TFRecord container, and [`Error::Decode`] when the
/// payload is not a valid statistics proto.
pub fn read_stats(
    stats_uri: impl AsRef<Path>,
    split: &str,
) -> Result<Option<DatasetFeatureStatisticsList>> {
    let split_dir = stats_uri.as_ref().join(split);
    let proto_path = split_dir.join(FEATURE_STATS_FILE);
    let tfrecord_path = split_dir.join(STATS_TFRECORD_FILE);

    if proto_path.exists() {
        let bytes = std::fs::read(&proto_path)?;
        return Ok(Some(DatasetFeatureStatisticsList::decode(
            bytes.as_slice(),
        )?));
    }
    if tfrecord_path.exists() {
        let mut records = TfRecordReader::open(&tfrecord_path)?;
        let first = match records.next() {
            Some(record) => record?,
            None => {
                return Err(Error::StatsPayload(format!(
                    "no records in {}",
                    tfrecord_path.display()
                )))
            }
        };
        return Ok(Some(DatasetFeatureStatisticsList::decode(
            first.as_slice(),
        )?));
    }

    warn!(
        tfrecord = %tfrecord_path.display(),
        proto = %proto_path.display(),
        "no statistics payload found for split"
    );
    Ok(None)
}
