//! Input masking and field validation for the lookup and upload forms.

pub const POSTAL_CODE_DIGITS: usize = 8;
const POSTAL_CODE_PREFIX: usize = 5;

pub const POSTAL_CODE_HINT: &str = "Postal code must have 8 digits";
pub const HOUSE_NUMBER_HINT: &str = "House number is required";

pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Masks a postal code as `NNNNN-NNN`, keeping at most 8 digits.
pub fn mask_postal_code(value: &str) -> String {
    let digits: String = digits_only(value)
        .chars()
        .take(POSTAL_CODE_DIGITS)
        .collect();
    if digits.len() <= POSTAL_CODE_PREFIX {
        return digits;
    }
    let (head, tail) = digits.split_at(POSTAL_CODE_PREFIX);
    format!("{}-{}", head, tail)
}

pub fn sanitize_house_number(value: &str) -> String {
    digits_only(value)
}

pub fn is_postal_code_valid(value: &str) -> bool {
    digits_only(value).len() == POSTAL_CODE_DIGITS
}

pub fn is_house_number_valid(value: &str) -> bool {
    !value.is_empty()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRejection {
    NotXlsx,
    WrongName,
}

impl FileRejection {
    pub fn message(&self, required_name: &str) -> String {
        match self {
            FileRejection::NotXlsx => "Only .xlsx files are accepted".to_string(),
            FileRejection::WrongName => format!("The file must be named \"{}\"", required_name),
        }
    }
}

/// Accepts only the exact required spreadsheet name. Extension is checked
/// first so the user gets the more specific message.
pub fn check_spreadsheet_name(name: &str, required_name: &str) -> Result<(), FileRejection> {
    if !name.ends_with(".xlsx") {
        return Err(FileRejection::NotXlsx);
    }
    if name != required_name {
        return Err(FileRejection::WrongName);
    }
    Ok(())
}

/// `MM:SS`, zero padded. Minutes keep growing past 59.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_leaves_short_input_untouched() {
        assert_eq!(mask_postal_code(""), "");
        assert_eq!(mask_postal_code("6"), "6");
        assert_eq!(mask_postal_code("60876"), "60876");
    }

    #[test]
    fn mask_inserts_separator_after_fifth_digit() {
        assert_eq!(mask_postal_code("608766"), "60876-6");
        assert_eq!(mask_postal_code("60876672"), "60876-672");
    }

    #[test]
    fn mask_strips_noise_and_caps_length() {
        assert_eq!(mask_postal_code("60.876-672"), "60876-672");
        assert_eq!(mask_postal_code("abc60876672999"), "60876-672");
        assert_eq!(mask_postal_code("60876-6721"), "60876-672");
    }

    #[test]
    fn masked_output_only_contains_digits_and_one_separator() {
        for len in 0..=8 {
            let digits: String = "12345678".chars().take(len).collect();
            let masked = mask_postal_code(&digits);
            assert_eq!(digits_only(&masked), digits);
            let separators = masked.chars().filter(|c| *c == '-').count();
            assert_eq!(separators, usize::from(len > 5));
            if len > 5 {
                assert_eq!(&masked[..5], &digits[..5]);
                assert_eq!(&masked[6..], &digits[5..]);
            } else {
                assert_eq!(masked, digits);
            }
        }
    }

    #[test]
    fn postal_code_validity_counts_digits() {
        assert!(is_postal_code_valid("60876-672"));
        assert!(is_postal_code_valid("60876672"));
        assert!(!is_postal_code_valid("60876-67"));
        assert!(!is_postal_code_valid(""));
    }

    #[test]
    fn house_number_keeps_only_digits() {
        assert_eq!(sanitize_house_number("14a4 "), "144");
        assert_eq!(sanitize_house_number("s/n"), "");
        assert!(is_house_number_valid("1"));
        assert!(!is_house_number_valid(""));
    }

    #[test]
    fn spreadsheet_name_must_match_exactly() {
        let required = "enderecos_nordeste.xlsx";
        assert_eq!(check_spreadsheet_name(required, required), Ok(()));
        assert_eq!(
            check_spreadsheet_name("enderecos_nordeste.xls", required),
            Err(FileRejection::NotXlsx)
        );
        assert_eq!(
            check_spreadsheet_name("enderecos.xlsx", required),
            Err(FileRejection::WrongName)
        );
        assert_eq!(
            check_spreadsheet_name("Enderecos_Nordeste.xlsx", required),
            Err(FileRejection::WrongName)
        );
    }

    #[test]
    fn elapsed_is_zero_padded() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(9), "00:09");
        assert_eq!(format_elapsed(61), "01:01");
        assert_eq!(format_elapsed(540), "09:00");
    }
}
