//! Column alignment for consecutive lines, as gofmt lays out struct fields
//! and keyed composite literals.

/// Pad the left column so every right column starts at the same offset.
///
/// ```
/// use mwgen_codegen::builder::align_columns;
///
/// let rows = [("next", "Service"), ("serviceName", "string")];
/// assert_eq!(
///     align_columns(&rows),
///     vec!["next        Service", "serviceName string"],
/// );
/// ```
pub fn align_columns<L, R>(rows: &[(L, R)]) -> Vec<String>
where
    L: AsRef<str>,
    R: AsRef<str>,
{
    let width = rows
        .iter()
        .map(|(left, _)| left.as_ref().chars().count())
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|(left, right)| {
            format!(
                "{:<width$} {}",
                left.as_ref(),
                right.as_ref(),
                width = width
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_keys() {
        let rows = [
            ("\"service\":", "m.serviceName,"),
            ("\"method\":", "\"Get\","),
            ("\"id\":", "id,"),
        ];
        assert_eq!(
            align_columns(&rows),
            vec![
                "\"service\": m.serviceName,",
                "\"method\":  \"Get\",",
                "\"id\":      id,",
            ]
        );
    }

    #[test]
    fn test_align_empty() {
        let rows: [(&str, &str); 0] = [];
        assert!(align_columns(&rows).is_empty());
    }
}
