use tirage_core::NamingFormat;

const GROUP_PREFIX: &str = "Groupe";

/// Display names for `number_of_groups` groups.
///
/// Trusts upstream validation: a short custom list yields fewer names, and
/// letter positions past `Z` fall back to numbers instead of panicking.
pub fn generate_group_names(
    number_of_groups: usize,
    format: NamingFormat,
    custom_names: Option<&[String]>,
) -> Vec<String> {
    match format {
        NamingFormat::Custom => custom_names
            .unwrap_or_default()
            .iter()
            .take(number_of_groups)
            .cloned()
            .collect(),
        NamingFormat::Letters => (0..number_of_groups).map(letter_name).collect(),
        NamingFormat::Numbers => (0..number_of_groups).map(number_name).collect(),
    }
}

pub(crate) fn number_name(index: usize) -> String {
    format!("{} {}", GROUP_PREFIX, index + 1)
}

fn letter_name(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => format!("{} {}", GROUP_PREFIX, char::from(b'A' + i)),
        _ => number_name(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_names() {
        assert_eq!(
            generate_group_names(5, NamingFormat::Letters, None),
            vec!["Groupe A", "Groupe B", "Groupe C", "Groupe D", "Groupe E"]
        );

        let all = generate_group_names(26, NamingFormat::Letters, None);
        assert_eq!(all.last().map(String::as_str), Some("Groupe Z"));
    }

    #[test]
    fn test_number_names() {
        assert_eq!(
            generate_group_names(3, NamingFormat::Numbers, None),
            vec!["Groupe 1", "Groupe 2", "Groupe 3"]
        );
    }

    #[test]
    fn test_custom_names_taken_verbatim() {
        let custom = vec!["Nord".to_string(), "Sud".to_string(), "Est".to_string()];
        assert_eq!(
            generate_group_names(2, NamingFormat::Custom, Some(&custom)),
            vec!["Nord", "Sud"]
        );
    }

    #[test]
    fn test_out_of_contract_inputs_do_not_panic() {
        assert!(generate_group_names(2, NamingFormat::Custom, None).is_empty());

        let names = generate_group_names(28, NamingFormat::Letters, None);
        assert_eq!(names.len(), 28);
        assert_eq!(names[26], "Groupe 27");
    }

    #[test]
    fn test_names_are_repeatable() {
        let first = generate_group_names(12, NamingFormat::Letters, None);
        let second = generate_group_names(12, NamingFormat::Letters, None);
        assert_eq!(first, second);
    }
}
