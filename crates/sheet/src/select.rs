use crate::error::{Result, SheetError};

const DETAIL: &str = "detail";

/// Pick the worksheet that holds line-item detail
///
/// Order of preference: a sheet named exactly "detail" (any case), the first
/// sheet whose name contains "detail", the second sheet, the first sheet.
pub fn select_detail_sheet(sheet_names: &[String]) -> Result<&str> {
    if let Some(name) = sheet_names
        .iter()
        .find(|name| name.to_lowercase() == DETAIL)
    {
        return Ok(name.as_str());
    }

    if let Some(name) = sheet_names
        .iter()
        .find(|name| name.to_lowercase().contains(DETAIL))
    {
        return Ok(name.as_str());
    }

    match sheet_names {
        [] => Err(SheetError::NoSheetsAvailable),
        [only] => Ok(only.as_str()),
        [_, second, ..] => Ok(second.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_exact_match_wins_over_contains() {
        let sheets = names(&["Detail Report", "DETAIL", "Summary"]);
        assert_eq!(select_detail_sheet(&sheets).unwrap(), "DETAIL");
    }

    #[test]
    fn test_contains_match() {
        let sheets = names(&["Header", "Detail Report", "Summary"]);
        assert_eq!(select_detail_sheet(&sheets).unwrap(), "Detail Report");
    }

    #[test]
    fn test_falls_back_to_second_sheet() {
        let sheets = names(&["Header", "Lines", "Summary"]);
        assert_eq!(select_detail_sheet(&sheets).unwrap(), "Lines");
    }

    #[test]
    fn test_single_sheet() {
        let sheets = names(&["Sheet1"]);
        assert_eq!(select_detail_sheet(&sheets).unwrap(), "Sheet1");
    }

    #[test]
    fn test_no_sheets() {
        assert!(matches!(
            select_detail_sheet(&[]),
            Err(SheetError::NoSheetsAvailable)
        ));
    }
}
