// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Write as _;

use crate::{BufferError, ByteBuffer};

pub mod hexdump_constants {
    pub const BYTES_PER_ROW: usize = 16;
    pub const BYTES_PER_GROUP: usize = 8;
    pub const MIN_ADDRESS_DIGITS: usize = 4;
    pub const NON_PRINTABLE: char = '.';
}

use hexdump_constants::*;

/// Number of hex digits needed to print `address`, never less than
/// [`MIN_ADDRESS_DIGITS`].
#[must_use]
pub fn address_width(address: usize) -> usize {
    let significant_bits = usize::BITS - address.leading_zeros();
    let digits = significant_bits.div_ceil(4) as usize;
    digits.max(MIN_ADDRESS_DIGITS)
}

impl ByteBuffer {
    /// Render the content as a canonical hex dump into the scratch buffer and return a
    /// read only view of it. For `"Hello, hexdump!!\x01"` the output is:
    ///
    /// ```text
    /// 0000: 48 65 6c 6c 6f 2c 20 68  65 78 64 75 6d 70 21 21  Hello, hexdump!!
    /// 0010: 01                                                .
    /// ```
    ///
    /// - Each row holds 16 bytes, as two hex digits followed by a space, with an extra
    ///   space after the 8th byte.
    /// - Missing columns on the last row are padded, so the ASCII gutter always lines
    ///   up. Non printable bytes show up as `.` in the gutter.
    /// - The address prefix is zero padded to the significant hex digits of the last
    ///   row's address, with a floor of 4 digits.
    /// - Every row ends with `\n`. An empty buffer renders as an empty dump.
    ///
    /// The scratch buffer is reused by the next call.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] if the scratch buffer can't grow.
    pub fn hexdump(&mut self) -> Result<&ByteBuffer, BufferError> {
        let last_row_address = self.size.saturating_sub(1) / BYTES_PER_ROW * BYTES_PER_ROW;
        let width = address_width(last_row_address);

        let scratch = self.scratch.get_or_insert_with(Box::default);
        scratch.resize(0)?;

        let content = self.data.get(..self.size).unwrap_or_default();
        for (row_index, row) in content.chunks(BYTES_PER_ROW).enumerate() {
            let mut line = String::with_capacity(width + 2 + BYTES_PER_ROW * 4 + 3);

            _ = write!(line, "{:0width$x}: ", row_index * BYTES_PER_ROW);

            for column in 0..BYTES_PER_ROW {
                match row.get(column) {
                    Some(byte) => _ = write!(line, "{byte:02x} "),
                    None => line.push_str("   "),
                }
                if column + 1 == BYTES_PER_GROUP {
                    line.push(' ');
                }
            }

            line.push(' ');
            line.extend(row.iter().map(|&byte| {
                if byte.is_ascii_graphic() || byte == b' ' {
                    char::from(byte)
                } else {
                    NON_PRINTABLE
                }
            }));
            line.push('\n');

            scratch.append(line.as_bytes())?;
        }

        Ok(self.scratch_mut())
    }
}
