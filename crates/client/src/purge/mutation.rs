//! GraphQL purge mutation builders.

/// `mutation { _purgeQuery(queries: [a,b]) }`; names are joined verbatim in order.
pub fn purge_queries_mutation<S: AsRef<str>>(queries: &[S]) -> String {
    let names: Vec<&str> = queries.iter().map(AsRef::as_ref).collect();
    format!("mutation {{ _purgeQuery(queries: [{}]) }}", names.join(","))
}

/// Mutation field for a type purge: `post` becomes `purgePost`.
///
/// Only the first character is upper-cased; the rest is kept as written.
pub fn purge_mutation_name(type_name: &str) -> String {
    let mut chars = type_name.chars();
    match chars.next() {
        Some(first) => format!("purge{}{}", first.to_uppercase(), chars.as_str()),
        None => "purge".to_string(),
    }
}

/// `mutation { purgePost(id: ["A1"]) }`, or `mutation { purgePost }` without an id.
pub fn purge_type_mutation(type_name: &str, id: Option<&str>) -> String {
    let name = purge_mutation_name(type_name);
    match id {
        Some(id) => format!("mutation {{ {}(id: [{}]) }}", name, string_literal(id)),
        None => format!("mutation {{ {} }}", name),
    }
}

fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_query() {
        assert_eq!(purge_queries_mutation(&["allPosts"]), "mutation { _purgeQuery(queries: [allPosts]) }");
    }

    #[test]
    fn test_queries_keep_order() {
        let mutation = purge_queries_mutation(&["feed".to_string(), "allPosts".to_string(), "postById".to_string()]);
        assert_eq!(mutation, "mutation { _purgeQuery(queries: [feed,allPosts,postById]) }");
    }

    #[test]
    fn test_mutation_name_first_char_only() {
        assert_eq!(purge_mutation_name("post"), "purgePost");
        assert_eq!(purge_mutation_name("Post"), "purgePost");
        assert_eq!(purge_mutation_name("blogPost"), "purgeBlogPost");
        assert_eq!(purge_mutation_name("bLOG"), "purgeBLOG");
    }

    #[test]
    fn test_type_with_id() {
        assert_eq!(purge_type_mutation("post", Some("A1")), r#"mutation { purgePost(id: ["A1"]) }"#);
    }

    #[test]
    fn test_type_without_id() {
        let mutation = purge_type_mutation("article", None);
        assert_eq!(mutation, "mutation { purgeArticle }");
        assert!(!mutation.contains("id:"));
    }

    #[test]
    fn test_id_is_escaped() {
        assert_eq!(purge_type_mutation("user", Some(r#"a"b\c"#)), r#"mutation { purgeUser(id: ["a\"b\\c"]) }"#);
    }
}
