use super::SObjectDescribe;

/// The built-in object holding organization details.
pub const ORGANIZATION_SOBJECT: &str = "Organization";

/// Build `SELECT f1, f2, ... FROM <sobject>`.
///
/// No guard for an empty field list: the result is `SELECT  FROM <sobject>`,
/// which the remote side rejects.
pub fn select_all_query<'a>(sobject: &str, fields: impl IntoIterator<Item = &'a str>) -> String {
    let fields = fields.into_iter().collect::<Vec<_>>().join(", ");
    format!("SELECT {} FROM {}", fields, sobject)
}

/// Query selecting every field the organization describe reported.
pub fn organization_query(describe: &SObjectDescribe) -> String {
    select_all_query(ORGANIZATION_SOBJECT, describe.field_names())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn describe_with(fields: &[&str]) -> SObjectDescribe {
        let fields: Vec<_> = fields.iter().map(|f| json!({"name": f})).collect();
        serde_json::from_value(json!({"name": "Organization", "fields": fields})).unwrap()
    }

    #[test]
    fn test_three_fields() {
        assert_eq!(
            organization_query(&describe_with(&["A", "B", "C"])),
            "SELECT A, B, C FROM Organization"
        );
    }

    #[test]
    fn test_single_field_has_no_separator() {
        assert_eq!(
            organization_query(&describe_with(&["Id"])),
            "SELECT Id FROM Organization"
        );
    }

    #[test]
    fn test_empty_field_list_passes_through() {
        assert_eq!(
            organization_query(&describe_with(&[])),
            "SELECT  FROM Organization"
        );
    }
}
