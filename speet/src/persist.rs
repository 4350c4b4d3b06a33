//! Binary sketch files.
//!
//! Layout: the 8 byte magic `SPEETSKT`, a little-endian `u32` format version,
//! then a bincode encoded `SketchRecord`. Hashes are written in ascending
//! order so identical sketches produce identical files.

use crate::error::{Result, SketchError};
use crate::minhash::{ScaledMinHash, SketchParams};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub const MAGIC: &[u8; 8] = b"SPEETSKT";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SketchRecord {
    scaled: u64,
    ksize: u64,
    name: String,
    hashes: Vec<u64>,
}

impl ScaledMinHash {
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<()> {
        let record = SketchRecord {
            scaled: self.scaled(),
            ksize: self.ksize() as u64,
            name: self.name().to_string(),
            hashes: self.hashes().iter().copied().sorted().collect(),
        };
        writer.write_all(MAGIC)?;
        writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
        bincode::serialize_into(&mut *writer, &record)?;
        Ok(())
    }

    pub fn load<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(SketchError::InvalidFormat("missing sketch header".to_string()));
        }
        let mut version = [0u8; 4];
        reader.read_exact(&mut version)?;
        let version = u32::from_le_bytes(version);
        if version != FORMAT_VERSION {
            return Err(SketchError::UnsupportedVersion(version));
        }

        // bincode's slice reader checks lengths against the remaining input, so a
        // corrupt length prefix fails instead of allocating.
        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        let record: SketchRecord = bincode::deserialize(&body)?;
        let ksize = usize::try_from(record.ksize)
            .map_err(|_| SketchError::InvalidFormat(format!("ksize {} too large", record.ksize)))?;
        let params = SketchParams::new(record.scaled, ksize);
        ScaledMinHash::from_parts(params, record.name, record.hashes)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::load(&mut reader)
    }
}
