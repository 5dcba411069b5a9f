//! URL query string encoding.

/// Parse `a=1&b=two%20words` (leading `?` optional) into ordered pairs.
///
/// `+` decodes to a space. Pairs that fail to decode are skipped.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .trim()
        .trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            let key = decode(key)?;
            let value = decode(value)?;
            (!key.is_empty()).then_some((key, value))
        })
        .collect()
}

/// Encode pairs as a query string without the leading `?`.
pub fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn decode(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(value) => Some(value.into_owned()),
        Err(error) => {
            tracing::warn!(%raw, %error, "skipping undecodable query component");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_decodes_pairs() {
        let pairs = parse_query("?etat=couvert&q=acide+sulfurique&lot=L%2F1&flag");
        assert_eq!(
            pairs,
            vec![
                ("etat".to_string(), "couvert".to_string()),
                ("q".to_string(), "acide sulfurique".to_string()),
                ("lot".to_string(), "L/1".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn empty_query_has_no_pairs() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());
    }

    #[test]
    fn encodes_reserved_characters() {
        let query = encode_query([("q", "a&b c"), ("etat", "non_couvert")]);
        assert_eq!(query, "q=a%26b%20c&etat=non_couvert");
        assert_eq!(
            parse_query(&query),
            vec![
                ("q".to_string(), "a&b c".to_string()),
                ("etat".to_string(), "non_couvert".to_string()),
            ]
        );
    }
}
