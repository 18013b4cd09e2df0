//! Numeric parameter decoding for CSI control sequences
//!
//! Cursor movement, editing and erase controls carry at most two decimal
//! parameters in front of their final byte. These are parsed and returned to
//! the caller; nothing here moves a cursor or clears a buffer.

/// Erase scope for ED (`J`) and EL (`K`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Erase {
    /// From the cursor to the end, inclusive (parameter 0)
    ToEnd,
    /// From the start to the cursor, inclusive (parameter 1)
    ToStart,
    /// Everything (parameter 2)
    All,
}

/// Returns true if `bytes` is non-empty and made only of ASCII decimal digits.
pub fn is_all_digits(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit)
}

/// Parse a digit run into a u8, rejecting anything above 255.
fn to_u8(bytes: &[u8]) -> Option<u8> {
    if !is_all_digits(bytes) {
        return None;
    }
    // leading zeros are legal, so "0255" is 255
    bytes.iter().try_fold(0u8, |acc, &b| {
        acc.checked_mul(10)?.checked_add(b - b'0')
    })
}

/// Look for `terminator` in `bytes` and decode the number in front of it.
///
/// Returns `None` when the terminator is missing, the prefix is not all
/// digits, or the value is greater than 255.
pub fn single(bytes: &[u8], terminator: u8) -> Option<u8> {
    let i = bytes.iter().position(|&b| b == terminator)?;
    to_u8(&bytes[..i])
}

/// Decode a `line;col` pair in front of `terminator`.
///
/// Accepted forms are a bare terminator (home, `(1, 1)`), `N` (line N,
/// column 1), `;N` (line 1, column N) and `N;M`.
pub fn position(bytes: &[u8], terminator: u8) -> Option<(u8, u8)> {
    if bytes.is_empty() {
        return None;
    }
    if bytes == [terminator] {
        return Some((1, 1));
    }
    if let Some(line) = single(bytes, terminator).filter(|&n| n > 0) {
        return Some((line, 1));
    }
    if bytes[0] == b';' {
        if let Some(col) = single(&bytes[1..], terminator).filter(|&n| n > 0) {
            return Some((1, col));
        }
    }
    let mut parts = bytes.split(|&b| b == b';');
    let (Some(first), Some(second), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    // a zero line is accepted here, unlike the bare `N` form
    let line = to_u8(first)?;
    let col = single(second, terminator).filter(|&n| n > 0)?;
    Some((line, col))
}

/// Decode an erase scope of 0, 1 or 2 in front of `terminator`.
pub fn erase(bytes: &[u8], terminator: u8) -> Option<Erase> {
    match single(bytes, terminator)? {
        0 => Some(Erase::ToEnd),
        1 => Some(Erase::ToStart),
        2 => Some(Erase::All),
        _ => None,
    }
}

/// CUU Cursor Up.
pub fn cursor_up(bytes: &[u8]) -> Option<u8> {
    single(bytes, b'A')
}

/// CUD Cursor Down.
pub fn cursor_down(bytes: &[u8]) -> Option<u8> {
    single(bytes, b'B')
}

/// CUF Cursor Forward.
pub fn cursor_forward(bytes: &[u8]) -> Option<u8> {
    single(bytes, b'C')
}

/// CUB Cursor Backward.
pub fn cursor_back(bytes: &[u8]) -> Option<u8> {
    single(bytes, b'D')
}

/// CUP Cursor Position, `ESC [ Pn1 ; Pn2 H`.
pub fn cursor_position(bytes: &[u8]) -> Option<(u8, u8)> {
    position(bytes, b'H')
}

/// ED Erase in Display.
pub fn erase_display(bytes: &[u8]) -> Option<Erase> {
    erase(bytes, b'J')
}

/// EL Erase in Line.
pub fn erase_line(bytes: &[u8]) -> Option<Erase> {
    erase(bytes, b'K')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_is_all_digits() {
        assert!(is_all_digits(b"0"));
        assert!(is_all_digits(b"0123456789"));
        assert!(!is_all_digits(b""));
        assert!(!is_all_digits(b"12a"));
        assert!(!is_all_digits(b" 1"));
        assert!(!is_all_digits("١٢".as_bytes()));
    }

    #[test]
    fn test_single() {
        assert_eq!(cursor_up(b"5A"), Some(5));
        assert_eq!(cursor_up(b"0A"), Some(0));
        assert_eq!(cursor_up(b"255A"), Some(255));
        assert_eq!(cursor_up(b"0255A"), Some(255));
        assert_eq!(cursor_up(b"256A"), None);
        assert_eq!(cursor_up(b"99999A"), None);
        assert_eq!(cursor_up(b"A"), None);
        assert_eq!(cursor_up(b"5"), None);
        assert_eq!(cursor_up(b"x5A"), None);
        assert_eq!(cursor_down(b"12B"), Some(12));
        assert_eq!(cursor_forward(b"80C"), Some(80));
        assert_eq!(cursor_back(b"3D"), Some(3));
        assert_eq!(cursor_back(b"3C"), None);
    }

    #[test]
    fn test_cursor_position() {
        assert_eq!(cursor_position(b"H"), Some((1, 1)));
        assert_eq!(cursor_position(b"6H"), Some((6, 1)));
        assert_eq!(cursor_position(b";12H"), Some((1, 12)));
        assert_eq!(cursor_position(b"6;12H"), Some((6, 12)));
        assert_eq!(cursor_position(b";H"), None);
        assert_eq!(cursor_position(b""), None);
        assert_eq!(cursor_position(b"6;12;1H"), None);
        assert_eq!(cursor_position(b"0;5H"), Some((0, 5)));
        assert_eq!(cursor_position(b"0H"), None);
        assert_eq!(cursor_position(b"5;0H"), None);
        assert_eq!(cursor_position(b"300;1H"), None);
        assert_eq!(cursor_position(b"1;300H"), None);
        assert_eq!(position(b"2;3f", b'f'), Some((2, 3)));
    }

    #[test]
    fn test_erase() {
        assert_eq!(erase_display(b"0J"), Some(Erase::ToEnd));
        assert_eq!(erase_display(b"1J"), Some(Erase::ToStart));
        assert_eq!(erase_display(b"2J"), Some(Erase::All));
        assert_eq!(erase_display(b"3J"), None);
        assert_eq!(erase_display(b""), None);
        assert_eq!(erase_line(b"2K"), Some(Erase::All));
        assert_eq!(erase_line(b"2J"), None);
    }

    proptest! {
        #[test]
        fn digits_iff_ascii_digits(bytes in proptest::collection::vec(any::<u8>(), 0..16)) {
            let expected = !bytes.is_empty() && bytes.iter().all(|b| (b'0'..=b'9').contains(b));
            prop_assert_eq!(is_all_digits(&bytes), expected);
        }

        #[test]
        fn cursor_up_round_trips(n in 0u32..=255) {
            let code = format!("{n}A");
            prop_assert_eq!(cursor_up(code.as_bytes()), Some(n as u8));
        }

        #[test]
        fn cursor_up_rejects_out_of_range(n in 256u32..100_000) {
            let code = format!("{n}A");
            prop_assert_eq!(cursor_up(code.as_bytes()), None);
        }
    }
}
