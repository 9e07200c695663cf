//! Stack memory window renderer.

use crate::bridge::Bridge;
use crate::error::Error;

/// Bytes read below the stack pointer on every refresh.
pub const WINDOW_BYTES: usize = 48;
/// Bytes per rendered row.
pub const ROW_BYTES: usize = 8;
/// Glyph shown for bytes outside the printable range.
pub const PLACEHOLDER: char = '·';

/// One row of the stack dump: 8 bytes plus their printable-ascii view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRow {
    pub address: u64,
    pub bytes: Vec<u8>,
    pub ascii: Vec<char>,
}

/// Read and format the stack window. Pure per call, nothing survives a refresh.
pub fn read_window(bridge: &mut dyn Bridge) -> Result<Vec<StackRow>, Error> {
    let sp = bridge.stack_pointer()?;
    let data = bridge.read_memory(sp, WINDOW_BYTES)?;

    Ok(data
        .chunks(ROW_BYTES)
        .enumerate()
        .map(|(row, chunk)| StackRow {
            address: sp + (row * ROW_BYTES) as u64,
            bytes: chunk.to_vec(),
            ascii: chunk.iter().map(|&b| glyph(b)).collect(),
        })
        .collect())
}

/// Printable character for a byte strictly inside the ascii graphic range.
pub fn glyph(b: u8) -> char {
    if b > 0x20 && b < 0x7f {
        b as char
    } else {
        PLACEHOLDER
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bridge::testing::MockBridge;

    #[test]
    fn test_glyph_boundaries() {
        struct TestCase {
            byte: u8,
            expected: char,
        }
        let test_cases = [
            TestCase {
                byte: 0x00,
                expected: PLACEHOLDER,
            },
            TestCase {
                byte: 0x20,
                expected: PLACEHOLDER,
            },
            TestCase {
                byte: 0x21,
                expected: '!',
            },
            TestCase {
                byte: b'H',
                expected: 'H',
            },
            TestCase {
                byte: 0x7e,
                expected: '~',
            },
            TestCase {
                byte: 0x7f,
                expected: PLACEHOLDER,
            },
            TestCase {
                byte: 0xff,
                expected: PLACEHOLDER,
            },
        ];

        for tc in test_cases {
            assert_eq!(glyph(tc.byte), tc.expected, "byte {:#04x}", tc.byte);
        }
    }

    #[test]
    fn test_window_shape() {
        let sp = 0xbeff_e5a0;
        let mut bridge = MockBridge {
            sp,
            ..Default::default()
        };
        let mut window = *b"Hello!\x00\xff";
        let mut data = vec![];
        for _ in 0..WINDOW_BYTES / ROW_BYTES {
            data.extend_from_slice(&window);
            window[0] = window[0].wrapping_add(1);
        }
        bridge.put_memory(sp, &data);

        let rows = read_window(&mut bridge).unwrap();

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].address, sp);
        assert_eq!(rows[1].address, sp + 8);
        assert_eq!(rows[5].address, sp + 40);
        assert_eq!(rows[0].bytes, b"Hello!\x00\xff".to_vec());
        assert_eq!(
            rows[0].ascii.iter().collect::<String>(),
            "Hello!··",
        );
        assert_eq!(
            rows[1].ascii.iter().collect::<String>(),
            "Iello!··",
        );
    }

    #[test]
    fn test_read_failure_propagates() {
        let mut bridge = MockBridge {
            sp: 0x1000,
            ..Default::default()
        };
        assert!(read_window(&mut bridge).is_err());
    }
}
