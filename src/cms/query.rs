//! Bracket-encoded query strings for the CMS REST API.
//!
//! A JSON tree such as
//! `{"filters": {"slug": {"$eq": "about"}}, "pagination": {"page": 2}}`
//! becomes `filters[slug][$eq]=about&pagination[page]=2`. Arrays use index
//! brackets (`sort[0]=publishedAt:desc`). Keys are emitted verbatim; only values
//! are percent-encoded.

use serde_json::Value;

/// Encode a query tree. Anything other than a top-level object encodes to an
/// empty string.
pub fn encode(query: &Value) -> String {
    let Value::Object(map) = query else {
        return String::new();
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        push_pairs(key.clone(), value, &mut pairs);
    }

    pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={}", encode_value(&value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn push_pairs(prefix: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((prefix, b.to_string())),
        Value::Number(n) => out.push((prefix, n.to_string())),
        Value::String(s) => out.push((prefix, s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                push_pairs(format!("{prefix}[{index}]"), item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                push_pairs(format!("{prefix}[{key}]"), item, out);
            }
        }
    }
}

fn encode_value(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn encodes_filters_and_sort_arrays() {
        let query = json!({
            "filters": { "slug": { "$eq": "a b" } },
            "sort": ["x:desc"],
        });
        assert_eq!(encode(&query), "filters[slug][$eq]=a+b&sort[0]=x%3Adesc");
    }

    #[test]
    fn encodes_population_trees_and_pagination() {
        let query = json!({
            "locale": "id",
            "populate": {
                "blocks": {
                    "on": {
                        "sections.gallery": {
                            "populate": { "items": { "populate": { "image": { "fields": ["url", "alternativeText"] } } } }
                        }
                    }
                },
                "seo": "*",
            },
            "pagination": { "page": 2, "pageSize": 9 },
        });

        let encoded = encode(&query);
        let pairs = encoded.split('&').collect::<Vec<_>>();
        assert_eq!(
            pairs,
            vec![
                "locale=id",
                "populate[blocks][on][sections.gallery][populate][items][populate][image][fields][0]=url",
                "populate[blocks][on][sections.gallery][populate][items][populate][image][fields][1]=alternativeText",
                "populate[seo]=*",
                "pagination[page]=2",
                "pagination[pageSize]=9",
            ]
        );
    }

    #[test]
    fn skips_nulls_and_empty_containers() {
        let query = json!({ "a": null, "b": {}, "c": [], "d": true });
        assert_eq!(encode(&query), "d=true");
        assert_eq!(encode(&json!({})), "");
        assert_eq!(encode(&json!(["not", "an", "object"])), "");
    }
}
