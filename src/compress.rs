use flate2::{read::MultiGzDecoder, write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    io::{self, Read, Write},
};

#[derive(Debug)]
pub enum CompressionError {
    /// The requested compression level is out of range for the algorithm.
    BadLevel(u8),
    /// The compression settings named an algorithm this library doesn't support.
    UnknownAlgorithm(u8),
    /// The gzip stream decompressed to more than the allowed maximum.
    ExceededSize { max: usize, actual: usize },
    /// The gzip stream was truncated, corrupted, or failed its checksum.
    Gzip(io::Error),
}

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionError::BadLevel(level) => write!(
                f,
                "Compression level {} is out of range (max {})",
                level, MAX_GZIP_LEVEL
            ),
            CompressionError::UnknownAlgorithm(algorithm) => {
                write!(f, "Unknown compression algorithm {}", algorithm)
            }
            CompressionError::ExceededSize { max, actual } => write!(
                f,
                "Decompressed size is at least {} bytes, larger than max of {} kiB",
                actual,
                (max + 1) >> 10
            ),
            CompressionError::Gzip(err) => write!(f, "gzip failure: {}", err),
        }
    }
}

impl std::error::Error for CompressionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompressionError::Gzip(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CompressionError {
    fn from(value: io::Error) -> Self {
        CompressionError::Gzip(value)
    }
}

/// The compression algorithm identifier for gzip.
pub const ALGORITHM_GZIP: u8 = 0;

/// The gzip level used when no other level is configured. Favors speed over ratio.
pub const DEFAULT_GZIP_LEVEL: u8 = 3;

/// The largest payload gzip decompression will produce unless configured otherwise: 64 MiB.
pub const DEFAULT_MAX_SIZE: usize = 1usize << 26;

const MAX_GZIP_LEVEL: u8 = 9;

/// A byte-to-byte compression transform. Decompression must be deterministic, and must fail
/// rather than return partial output when the input is truncated or corrupted.
pub trait Compressor {
    fn compress(&self, src: &[u8]) -> Result<Vec<u8>, CompressionError>;
    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>, CompressionError>;
}

/// Gzip compression at a fixed level, with a cap on how large a decompressed payload may get.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gzip {
    level: u8,
    max_size: usize,
}

impl Gzip {
    /// Create a gzip compressor with the default decompression limit. Fails if `level` is above
    /// 9.
    pub fn new(level: u8) -> Result<Self, CompressionError> {
        if level > MAX_GZIP_LEVEL {
            return Err(CompressionError::BadLevel(level));
        }
        Ok(Self {
            level,
            max_size: DEFAULT_MAX_SIZE,
        })
    }

    /// Override the largest payload decompression is allowed to produce.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for Gzip {
    fn default() -> Self {
        Self {
            level: DEFAULT_GZIP_LEVEL,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl Compressor for Gzip {
    fn compress(&self, src: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let mut enc = GzEncoder::new(
            Vec::with_capacity(src.len() / 2 + 32),
            Compression::new(self.level as u32),
        );
        enc.write_all(src)?;
        Ok(enc.finish()?)
    }

    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>, CompressionError> {
        // Concatenated members are valid gzip, so read all of them. Reading one byte past the
        // limit is enough to tell an oversized payload from one that fits exactly.
        let mut dst = Vec::with_capacity((src.len() * 2).min(self.max_size));
        MultiGzDecoder::new(src)
            .take((self.max_size as u64).saturating_add(1))
            .read_to_end(&mut dst)?;
        if dst.len() > self.max_size {
            return Err(CompressionError::ExceededSize {
                max: self.max_size,
                actual: dst.len(),
            });
        }
        Ok(dst)
    }
}

/// Compression settings for an [`Envelope`][crate::Envelope].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Compress {
    /// Don't compress by default.
    None,
    /// Compress using the given algorithm identifier and compression level.
    General {
        /// The algorithm's identifier
        algorithm: u8,
        /// The compression level
        level: u8,
    },
}

impl Compress {
    /// Create a new gzip compression setting.
    pub fn new_gzip(level: u8) -> Self {
        Compress::General {
            algorithm: ALGORITHM_GZIP,
            level,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Compress::None)
    }

    /// Build the gzip compressor these settings describe. A disabled setting still yields the
    /// default compressor, so that compressed envelopes can always be read back.
    pub fn compressor(&self) -> Result<Gzip, CompressionError> {
        match *self {
            Compress::None => Ok(Gzip::default()),
            Compress::General {
                algorithm: ALGORITHM_GZIP,
                level,
            } => Gzip::new(level),
            Compress::General { algorithm, .. } => {
                Err(CompressionError::UnknownAlgorithm(algorithm))
            }
        }
    }
}

/// Settings default to gzip at [`DEFAULT_GZIP_LEVEL`]. [`Envelope::new`][crate::Envelope::new]
/// leaves compression off instead, like the free `pack` functions.
impl std::default::Default for Compress {
    fn default() -> Self {
        Compress::General {
            algorithm: ALGORITHM_GZIP,
            level: DEFAULT_GZIP_LEVEL,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::Rng;

    #[test]
    fn roundtrip() {
        let mut rng = rand::thread_rng();
        let mut data = vec![0u8; 4096];
        rng.fill(&mut data[..2048]);
        let gzip = Gzip::default();
        let compressed = gzip.compress(&data).unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b], "missing gzip magic");
        assert!(compressed.len() < data.len());
        assert_eq!(gzip.decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn level_doesnt_matter_for_decompression() {
        let data = b"the same bytes, over and over, the same bytes, over and over".repeat(8);
        let fast = Gzip::new(1).unwrap().compress(&data).unwrap();
        let best = Gzip::new(9).unwrap().compress(&data).unwrap();
        assert_eq!(Gzip::default().decompress(&fast).unwrap(), data);
        assert_eq!(Gzip::default().decompress(&best).unwrap(), data);
    }

    #[test]
    fn multi_member() {
        let gzip = Gzip::default();
        let mut stream = gzip.compress(b"hello, ").unwrap();
        stream.extend(gzip.compress(b"world").unwrap());
        assert_eq!(gzip.decompress(&stream).unwrap(), b"hello, world");
    }

    #[test]
    fn truncated() {
        let gzip = Gzip::default();
        let data = b"truncate me, truncate me, truncate me".repeat(4);
        let compressed = gzip.compress(&data).unwrap();
        for len in [compressed.len() / 2, compressed.len() - 4] {
            let err = gzip.decompress(&compressed[..len]).unwrap_err();
            assert!(matches!(err, CompressionError::Gzip(_)), "len {}: {}", len, err);
        }
    }

    #[test]
    fn corrupted() {
        let gzip = Gzip::default();
        let mut compressed = gzip.compress(b"some bytes to be corrupted").unwrap();
        let last = compressed.len() - 5;
        compressed[last] ^= 0xFF;
        gzip.decompress(&compressed).unwrap_err();
        gzip.decompress(b"definitely not gzip").unwrap_err();
    }

    #[test]
    fn size_limit() {
        let gzip = Gzip::default().with_max_size(1024);
        let compressed = gzip.compress(&vec![0u8; 1024]).unwrap();
        assert_eq!(gzip.decompress(&compressed).unwrap().len(), 1024);

        let compressed = gzip.compress(&vec![0u8; 1025]).unwrap();
        let err = gzip.decompress(&compressed).unwrap_err();
        assert!(
            matches!(err, CompressionError::ExceededSize { max: 1024, actual: 1025 }),
            "{}",
            err
        );
    }

    #[test]
    fn size_limit_default() {
        assert_eq!(Gzip::default().max_size(), DEFAULT_MAX_SIZE);
        assert_eq!(Gzip::new(1).unwrap().max_size(), DEFAULT_MAX_SIZE);
        assert_eq!(Compress::new_gzip(6).compressor().unwrap().max_size(), DEFAULT_MAX_SIZE);
    }

    #[test]
    fn bad_level() {
        assert!(matches!(Gzip::new(10), Err(CompressionError::BadLevel(10))));
        assert_eq!(Gzip::new(9).unwrap().level(), 9);
    }

    #[test]
    fn settings() {
        assert_eq!(Compress::default(), Compress::new_gzip(DEFAULT_GZIP_LEVEL));
        assert!(Compress::default().is_enabled());
        assert!(!Compress::None.is_enabled());
        assert_eq!(Compress::None.compressor().unwrap(), Gzip::default());
        assert_eq!(Compress::new_gzip(6).compressor().unwrap().level(), 6);
        let unknown = Compress::General {
            algorithm: 1,
            level: 3,
        };
        assert!(matches!(
            unknown.compressor(),
            Err(CompressionError::UnknownAlgorithm(1))
        ));
    }

    #[test]
    fn settings_serde() {
        let json = serde_json::to_string(&Compress::new_gzip(5)).unwrap();
        assert_eq!(json, r#"{"General":{"algorithm":0,"level":5}}"#);
        let back: Compress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Compress::new_gzip(5));
        let none: Compress = serde_json::from_str(r#""None""#).unwrap();
        assert_eq!(none, Compress::None);
        serde_json::from_str::<Compress>(r#"{"General":{"algorithm":0,"level":5,"x":1}}"#)
            .unwrap_err();
    }
}
