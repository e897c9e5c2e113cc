//! PostgREST query parameter construction.
//!
//! Parameters are returned unencoded; reqwest percent-encodes them when they
//! are attached with `RequestBuilder::query`.

use crate::search::{SEARCH_FIELDS, TicketQuery};

pub type QueryParams = Vec<(String, String)>;

fn param(key: &str, value: impl Into<String>) -> (String, String) {
    (key.to_string(), value.into())
}

/// Characters with meaning inside PostgREST logic-tree values
fn needs_quoting(value: &str) -> bool {
    value
        .chars()
        .any(|c| matches!(c, ',' | '.' | ':' | '(' | ')' | '"' | '\\') || c.is_whitespace())
}

/// Quote a value for use inside `or=(...)` when it contains reserved characters.
pub fn quote_value(value: &str) -> String {
    if !needs_quoting(value) {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Build a `*text*` ilike pattern with LIKE wildcards in `text` escaped.
pub fn ilike_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('*');
    for c in text.chars() {
        match c {
            '%' | '_' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            // PostgREST rewrites every '*' to '%', escaped or not, so a literal
            // '*' can't be expressed; '_' at least keeps it to one character.
            '*' => escaped.push('_'),
            _ => escaped.push(c),
        }
    }
    escaped.push('*');
    escaped
}

pub fn organizations_params() -> QueryParams {
    vec![param("select", "*"), param("order", "name.asc")]
}

pub fn organization_by_slug_params(slug: &str) -> QueryParams {
    vec![param("select", "*"), param("slug", format!("eq.{slug}"))]
}

pub fn ticket_list_params(query: &TicketQuery) -> QueryParams {
    let mut params = vec![
        param("select", "*"),
        param("organization_id", format!("eq.{}", query.organization_id)),
    ];

    if let Some(text) = &query.text {
        let pattern = quote_value(&ilike_pattern(text));
        let clauses: Vec<String> = SEARCH_FIELDS
            .iter()
            .map(|field| format!("{field}.ilike.{pattern}"))
            .collect();
        params.push(param("or", format!("({})", clauses.join(","))));
    }

    if let Some(status) = query.status {
        params.push(param("status", format!("eq.{}", status.as_str())));
    }

    params.push(param("order", "created_on.desc"));
    params
}
