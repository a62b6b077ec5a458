//! The POSIX `cksum(1)` checksum.
//!
//! CRC-32 with polynomial 0x04C11DB7, processed most significant bit first
//! from a zero register. After the data, the byte length is fed through the
//! CRC least significant byte first (only as many bytes as it needs), and
//! the result is complemented.

use std::io::{self, Read};

const POLY: u32 = 0x04C1_1DB7;

const CRC_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u32) << 24;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

#[inline]
fn step(crc: u32, byte: u8) -> u32 {
    (crc << 8) ^ CRC_TABLE[((crc >> 24) ^ u32::from(byte)) as usize]
}

/// Incremental `cksum` state.
#[derive(Debug, Clone, Default)]
pub struct Cksum {
    crc: u32,
    len: u64,
}

impl Cksum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.crc = data.iter().fold(self.crc, |crc, &byte| step(crc, byte));
        self.len += data.len() as u64;
    }

    /// Bytes consumed so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The checksum over everything consumed so far.
    pub fn value(&self) -> u32 {
        let mut crc = self.crc;
        let mut remaining = self.len;
        while remaining != 0 {
            crc = step(crc, (remaining & 0xff) as u8);
            remaining >>= 8;
        }
        !crc
    }
}

/// Checksum a reader until EOF, returning the checksum and the byte count.
pub fn cksum<R: Read + ?Sized>(reader: &mut R) -> io::Result<(u32, u64)> {
    let mut state = Cksum::new();
    let mut buf = [0u8; 32 * 1024];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => state.update(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok((state.value(), state.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    fn sum(data: &[u8]) -> (u32, u64) {
        cksum(&mut Cursor::new(data)).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sum(b""), (4294967295, 0));
    }

    #[test]
    fn test_reference_values() {
        assert_eq!(sum(b"123456789"), (930766865, 9));
        assert_eq!(sum(b"abc"), (1219131554, 3));
        assert_eq!(sum(b"hello world"), (1135714720, 11));
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let data: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
        let mut state = Cksum::new();
        for chunk in data.chunks(777) {
            state.update(chunk);
        }
        assert_eq!((state.value(), state.len()), sum(&data));
    }

    proptest! {
        #[test]
        fn test_split_point_does_not_matter(
            data in prop::collection::vec(any::<u8>(), 0..2048),
            split in any::<prop::sample::Index>(),
        ) {
            let at = split.index(data.len() + 1);
            let mut state = Cksum::new();
            state.update(&data[..at]);
            state.update(&data[at..]);
            prop_assert_eq!((state.value(), state.len()), sum(&data));
        }
    }

    #[test]
    fn test_read_error_propagates() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "broken"))
            }
        }
        assert!(cksum(&mut Broken).is_err());
    }
}
