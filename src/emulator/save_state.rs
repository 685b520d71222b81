// Snapshot functionality
//
// Serializes and deserializes the emulator snapshot record: a packed
// little-endian stream with a fixed magic, the CPU register file, the
// 2 KiB of work RAM, and a length-prefixed reserved extension block for
// future PPU/APU state. Loads tolerate both a missing and a non-empty
// extension.
//
// Layout:
//
// ```text
// Offset  Size  Field
// 0       8     Magic "NESSAVE\0"
// 8       1     Version (1)
// 9       5     A, X, Y, SP, P
// 14      2     PC (little-endian)
// 16      8     Total CPU cycles (little-endian)
// 24      2048  Work RAM
// 2072    4     Extension length N (little-endian; optional)
// 2076    N     Extension bytes (skipped on load)
// ```

use std::fmt;
use std::io::{self, Read, Write};

/// Snapshot magic bytes
const SNAPSHOT_MAGIC: [u8; 8] = *b"NESSAVE\0";

/// Current snapshot format version
const SNAPSHOT_VERSION: u8 = 1;

/// Work RAM size captured in the snapshot
const RAM_SIZE: usize = 2048;

/// Errors that can occur during snapshot operations
#[derive(Debug)]
pub enum SnapshotError {
    /// I/O error from the underlying reader/writer
    Io(io::Error),

    /// The stream does not start with the snapshot magic
    BadMagic,

    /// The snapshot was written by an unknown format version
    UnsupportedVersion(u8),

    /// The stream ended before the fixed-size fields
    Truncated,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "I/O error: {}", e),
            SnapshotError::BadMagic => write!(f, "Not a snapshot file (bad magic)"),
            SnapshotError::UnsupportedVersion(v) => {
                write!(f, "Unsupported snapshot version {}", v)
            }
            SnapshotError::Truncated => write!(f, "Snapshot data is truncated"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            SnapshotError::Truncated
        } else {
            SnapshotError::Io(e)
        }
    }
}

/// One complete snapshot record
///
/// Captured from the emulator, written to a stream, and parsed back in
/// full before any emulator state is touched, so a corrupt stream leaves
/// the core untouched.
pub(crate) struct Snapshot {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub status: u8,
    pub pc: u16,
    pub cycles: u64,
    pub ram: Vec<u8>,
    /// Reserved extension payload (ignored on load)
    pub extension: Vec<u8>,
}

impl Snapshot {
    /// Serialize the snapshot in the packed little-endian layout
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), SnapshotError> {
        writer.write_all(&SNAPSHOT_MAGIC)?;
        writer.write_all(&[SNAPSHOT_VERSION])?;
        writer.write_all(&[self.a, self.x, self.y, self.sp, self.status])?;
        writer.write_all(&self.pc.to_le_bytes())?;
        writer.write_all(&self.cycles.to_le_bytes())?;

        debug_assert_eq!(self.ram.len(), RAM_SIZE);
        writer.write_all(&self.ram)?;

        writer.write_all(&(self.extension.len() as u32).to_le_bytes())?;
        writer.write_all(&self.extension)?;

        Ok(())
    }

    /// Parse a snapshot from the packed little-endian layout
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, SnapshotError> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if magic != SNAPSHOT_MAGIC {
            return Err(SnapshotError::BadMagic);
        }

        let mut version = [0u8; 1];
        reader.read_exact(&mut version)?;
        if version[0] != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(version[0]));
        }

        let mut registers = [0u8; 5];
        reader.read_exact(&mut registers)?;

        let mut pc_bytes = [0u8; 2];
        reader.read_exact(&mut pc_bytes)?;

        let mut cycle_bytes = [0u8; 8];
        reader.read_exact(&mut cycle_bytes)?;

        let mut ram = vec![0u8; RAM_SIZE];
        reader.read_exact(&mut ram)?;

        // The extension trailer is optional; an empty or absent block is
        // a valid version-1 snapshot.
        let mut len_bytes = [0u8; 4];
        let extension = match reader.read_exact(&mut len_bytes) {
            Ok(()) => {
                let len = u32::from_le_bytes(len_bytes) as usize;
                let mut extension = vec![0u8; len];
                reader.read_exact(&mut extension)?;
                extension
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Snapshot {
            a: registers[0],
            x: registers[1],
            y: registers[2],
            sp: registers[3],
            status: registers[4],
            pc: u16::from_le_bytes(pc_bytes),
            cycles: u64::from_le_bytes(cycle_bytes),
            ram,
            extension,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> Snapshot {
        let mut ram = vec![0u8; RAM_SIZE];
        ram[0] = 0x11;
        ram[2047] = 0x99;
        Snapshot {
            a: 0x7E,
            x: 0x01,
            y: 0x02,
            sp: 0xF0,
            status: 0x24,
            pc: 0xC123,
            cycles: 123_456_789,
            ram,
            extension: Vec::new(),
        }
    }

    #[test]
    fn test_roundtrip() {
        let snapshot = sample_snapshot();
        let mut buffer = Vec::new();
        snapshot.write_to(&mut buffer).unwrap();

        let parsed = Snapshot::read_from(&buffer[..]).unwrap();

        assert_eq!(parsed.a, 0x7E);
        assert_eq!(parsed.pc, 0xC123);
        assert_eq!(parsed.cycles, 123_456_789);
        assert_eq!(parsed.ram[0], 0x11);
        assert_eq!(parsed.ram[2047], 0x99);
        assert!(parsed.extension.is_empty());
    }

    #[test]
    fn test_save_load_save_is_byte_identical() {
        let snapshot = sample_snapshot();
        let mut first = Vec::new();
        snapshot.write_to(&mut first).unwrap();

        let parsed = Snapshot::read_from(&first[..]).unwrap();
        let mut second = Vec::new();
        parsed.write_to(&mut second).unwrap();

        assert_eq!(first, second, "save -> load -> save must be stable");
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut buffer = Vec::new();
        sample_snapshot().write_to(&mut buffer).unwrap();
        buffer[0] = b'X';

        assert!(matches!(
            Snapshot::read_from(&buffer[..]),
            Err(SnapshotError::BadMagic)
        ));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let mut buffer = Vec::new();
        sample_snapshot().write_to(&mut buffer).unwrap();
        buffer[8] = 99;

        assert!(matches!(
            Snapshot::read_from(&buffer[..]),
            Err(SnapshotError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_truncated_stream_rejected() {
        let mut buffer = Vec::new();
        sample_snapshot().write_to(&mut buffer).unwrap();
        buffer.truncate(100);

        assert!(matches!(
            Snapshot::read_from(&buffer[..]),
            Err(SnapshotError::Truncated)
        ));
    }

    #[test]
    fn test_missing_extension_tolerated() {
        let mut buffer = Vec::new();
        sample_snapshot().write_to(&mut buffer).unwrap();
        // Drop the 4-byte extension length trailer entirely
        buffer.truncate(buffer.len() - 4);

        let parsed = Snapshot::read_from(&buffer[..]).unwrap();
        assert!(parsed.extension.is_empty());
    }

    #[test]
    fn test_nonempty_extension_skipped() {
        let mut snapshot = sample_snapshot();
        snapshot.extension = vec![0xAA; 64];

        let mut buffer = Vec::new();
        snapshot.write_to(&mut buffer).unwrap();

        let parsed = Snapshot::read_from(&buffer[..]).unwrap();
        assert_eq!(parsed.extension.len(), 64, "Extension carried through");
    }
}
