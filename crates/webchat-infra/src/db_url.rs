//! Database URL normalization.
//!
//! Connection strings arrive in the ORM-style form `postgres://...?schema=app`.
//! libpq has no `schema` parameter, so it is rewritten into
//! `options=-c search_path=app`. Query values are re-encoded with `%20` for
//! spaces; libpq does not decode `+`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;
use webchat_types::error::ConfigError;

/// Characters left unescaped in query keys and values.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Whether `url` addresses a SQLite database.
pub fn is_sqlite_url(url: &str) -> bool {
    url.starts_with("sqlite:")
}

/// Rewrite `schema=<s>` into a libpq `search_path` option.
///
/// Parameter order is kept; a repeated key keeps its first value. SQLite URLs
/// are returned unchanged.
pub fn normalize_database_url(url: &str) -> Result<String, ConfigError> {
    if is_sqlite_url(url) {
        return Ok(url.to_string());
    }

    let mut parsed = Url::parse(url).map_err(|e| ConfigError::DatabaseUrl(e.to_string()))?;

    let mut params: Vec<(String, String)> = Vec::new();
    for (key, value) in parsed.query_pairs() {
        if !params.iter().any(|(k, _)| *k == key) {
            params.push((key.into_owned(), value.into_owned()));
        }
    }

    let schema = params
        .iter()
        .position(|(k, _)| k == "schema")
        .map(|index| params.remove(index).1);

    if let Some(schema) = schema.filter(|s| !s.is_empty()) {
        let search_path = format!("-c search_path={schema}");
        match params.iter_mut().find(|(k, _)| k == "options") {
            Some((_, options)) if !options.is_empty() => {
                *options = format!("{options} {search_path}").trim().to_string();
            }
            Some((_, options)) => *options = search_path,
            None => params.push(("options".to_string(), search_path)),
        }
    }

    if params.is_empty() {
        parsed.set_query(None);
    } else {
        let query = params
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, QUERY_ENCODE_SET),
                    utf8_percent_encode(v, QUERY_ENCODE_SET)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        parsed.set_query(Some(&query));
    }

    Ok(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_becomes_search_path() {
        let url = normalize_database_url("postgres://u:p@db:5432/app?schema=webchat").unwrap();
        assert_eq!(
            url,
            "postgres://u:p@db:5432/app?options=-c%20search_path%3Dwebchat"
        );
        assert!(!url.contains('+'));
    }

    #[test]
    fn test_schema_appends_to_existing_options() {
        let url = normalize_database_url(
            "postgresql://u@db/app?sslmode=require&options=-c%20statement_timeout%3D5000&schema=s1",
        )
        .unwrap();
        assert_eq!(
            url,
            "postgresql://u@db/app?sslmode=require&options=-c%20statement_timeout%3D5000%20-c%20search_path%3Ds1"
        );
    }

    #[test]
    fn test_without_schema_keeps_params() {
        let url = normalize_database_url("postgres://u@db/app?sslmode=disable&application_name=web+chat")
            .unwrap();
        assert_eq!(
            url,
            "postgres://u@db/app?sslmode=disable&application_name=web%20chat"
        );
    }

    #[test]
    fn test_blank_schema_is_dropped() {
        let url = normalize_database_url("postgres://u@db/app?schema=").unwrap();
        assert_eq!(url, "postgres://u@db/app");
    }

    #[test]
    fn test_no_query() {
        let url = normalize_database_url("postgres://u@db:5432/app").unwrap();
        assert_eq!(url, "postgres://u@db:5432/app");
    }

    #[test]
    fn test_sqlite_unchanged() {
        let raw = "sqlite://./data/memory.db?mode=rwc&schema=x";
        assert_eq!(normalize_database_url(raw).unwrap(), raw);
        assert!(is_sqlite_url(raw));
    }

    #[test]
    fn test_invalid_url() {
        let err = normalize_database_url("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::DatabaseUrl(_)));
    }
}
