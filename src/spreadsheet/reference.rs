//! Conversions between alphabetic column references and 1-based column indexes.
use regex::Regex;

/// Converts column letters to a 1-based column index (A = 1, Z = 26, AA = 27).
///
/// Letters are read as a base-26 numeral, most significant first, in either case.
/// Returns `None` ("no column") for an empty reference, for any character outside
/// A-Z, and when the index does not fit in `usize`.
pub fn column_index(reference: &str) -> Option<usize> {
    if reference.is_empty() {
        return None;
    }
    reference.bytes().try_fold(0usize, |index, byte| {
        let digit = match byte {
            b'A'..=b'Z' => byte - b'A' + 1,
            b'a'..=b'z' => byte - b'a' + 1,
            _ => return None,
        };
        index.checked_mul(26)?.checked_add(digit as usize)
    })
}

/// Converts a 1-based column index back to its letters (1 = A, 27 = AA).
/// Index 0 has no letters and yields an empty string.
pub fn column_reference(index: usize) -> String {
    let mut index = index;
    let mut letters = Vec::new();
    while index > 0 {
        index -= 1;
        letters.push((b'A' + (index % 26) as u8) as char);
        index /= 26;
    }
    letters.iter().rev().collect()
}

/// Extracts the upper-cased column letters of a cell reference ("ab12" -> "AB").
pub fn column_letters(cell_reference: &str) -> String {
    cell_reference
        .chars()
        .filter(|character| !character.is_ascii_digit())
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Splits a cell reference such as "B12" into its column letters and row label.
pub fn split_reference(cell_reference: &str) -> Option<(&str, &str)> {
    let pattern = Regex::new(r"^([A-Za-z]+)(\d+)$").expect("Hardcode regex pattern");
    let captures = pattern.captures(cell_reference)?;
    let column = captures.get(1)?.as_str();
    let row = captures.get(2)?.as_str();
    Some((column, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_values() {
        assert_eq!(column_index("A"), Some(1));
        assert_eq!(column_index("Z"), Some(26));
        assert_eq!(column_index("AA"), Some(27));
        assert_eq!(column_index("AZ"), Some(52));
        assert_eq!(column_index("XFD"), Some(16384));
        assert_eq!(column_index("xfd"), Some(16384));
    }

    #[test]
    fn no_column() {
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);
        assert_eq!(column_index("$A"), None);
        assert_eq!(column_index(&"Z".repeat(64)), None);
    }

    #[test]
    fn long_references() {
        assert_eq!(column_index("AAAA"), Some(26 * 26 * 26 + 26 * 26 + 26 + 1));
        assert_eq!(column_reference(26 * 26 * 26 + 26 * 26 + 26 + 1), "AAAA");
    }

    #[test]
    fn round_trip() {
        for index in 1..=16384 {
            let reference = column_reference(index);
            assert_eq!(column_index(&reference), Some(index), "{reference}");
        }
        assert_eq!(column_reference(0), "");
    }

    #[test]
    fn letters_of_cell_reference() {
        assert_eq!(column_letters("C7"), "C");
        assert_eq!(column_letters("ab12"), "AB");
        assert_eq!(column_letters("12"), "");
    }

    #[test]
    fn split_cell_reference() {
        assert_eq!(split_reference("B12"), Some(("B", "12")));
        assert_eq!(split_reference("aa3"), Some(("aa", "3")));
        assert_eq!(split_reference("B"), None);
        assert_eq!(split_reference("12"), None);
        assert_eq!(split_reference("B1:C2"), None);
    }
}
