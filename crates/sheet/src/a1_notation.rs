use crate::error::{Result, SheetError};

/// Convert column letters to a 0-based column index
/// A=0, B=1, ... Z=25, AA=26, AB=27, ...
///
/// The input is trimmed and uppercased first. An empty reference maps to
/// column 0; any non-letter character is rejected instead of mis-indexing.
pub fn column_index(letters: &str) -> Result<usize> {
    let letters = letters.trim().to_uppercase();
    if letters.is_empty() {
        return Ok(0);
    }

    let mut col: usize = 0;
    for b in letters.bytes() {
        if !b.is_ascii_uppercase() {
            return Err(SheetError::InvalidColumnReference(letters));
        }
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(usize::from(b - b'A') + 1))
            .ok_or_else(|| SheetError::InvalidColumnReference(letters.clone()))?;
    }

    Ok(col - 1)
}

/// Convert 0-based column index to column letters
/// 0=A, 1=B, ... 25=Z, 26=AA, 27=AB, ...
pub fn column_letters(mut col: usize) -> String {
    let mut result = String::new();
    col += 1;

    while col > 0 {
        col -= 1;
        result.insert(0, ((col % 26) as u8 + b'A') as char);
        col /= 26;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A").unwrap(), 0);
        assert_eq!(column_index("C").unwrap(), 2);
        assert_eq!(column_index("Z").unwrap(), 25);
        assert_eq!(column_index("AA").unwrap(), 26);
        assert_eq!(column_index("AH").unwrap(), 33);
        assert_eq!(column_index("AN").unwrap(), 39);
        assert_eq!(column_index("CN").unwrap(), 91);
        assert_eq!(column_index("ZZ").unwrap(), 701);
        assert_eq!(column_index("AAA").unwrap(), 702);
    }

    #[test]
    fn test_column_index_normalizes_input() {
        assert_eq!(column_index(" ah ").unwrap(), 33);
        assert_eq!(column_index("bp").unwrap(), 67);
        assert_eq!(column_index("").unwrap(), 0);
        assert_eq!(column_index("   ").unwrap(), 0);
    }

    #[test]
    fn test_column_index_errors() {
        assert!(matches!(
            column_index("??"),
            Err(SheetError::InvalidColumnReference(s)) if s == "??"
        ));
        assert!(column_index("A1").is_err());
        assert!(column_index("A B").is_err());
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(33), "AH");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }
}
