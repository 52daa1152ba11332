/// Flatten header name/value pairs into the alternating representation
/// expected by the `jsFetchFull` and `jsOpenStream` JavaScript functions.
pub(crate) fn format_headers_for_js(headers: &[(String, String)]) -> Vec<String> {
    let mut ret = Vec::with_capacity(headers.len() * 2);
    headers.iter().for_each(|(name, value)| {
        ret.push(name.clone());
        ret.push(value.clone());
    });
    ret
}

/// Parse the alternating name/value header representation received from the
/// JavaScript-side back into pairs.
///
/// A trailing name without a value is dropped.
pub(crate) fn parse_header_pairs(mut flat: Vec<String>) -> Vec<(String, String)> {
    if flat.len() % 2 != 0 {
        flat.pop();
    }
    let mut ret = Vec::with_capacity(flat.len() / 2);
    let mut iter = flat.into_iter();
    while let (Some(name), Some(value)) = (iter.next(), iter.next()) {
        ret.push((name, value));
    }
    ret
}

/// Convert a `Content-Length` value communicated by the JavaScript-side into
/// a byte count.
///
/// Negative or non-finite values are treated as an absent header.
pub(crate) fn content_length_from_js(value: Option<f64>) -> Option<u64> {
    match value {
        Some(v) if v.is_finite() && v >= 0. => Some(v as u64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_headers_for_js() {
        let headers = vec![
            ("Authorization".to_owned(), "Bearer x".to_owned()),
            ("Accept".to_owned(), "audio/mpeg".to_owned()),
        ];
        assert_eq!(
            format_headers_for_js(&headers),
            vec!["Authorization", "Bearer x", "Accept", "audio/mpeg"]
        );
        assert_eq!(format_headers_for_js(&[]), Vec::<String>::new());
    }

    #[test]
    fn test_parse_header_pairs() {
        let flat = vec![
            "Authorization".to_owned(),
            "Bearer x".to_owned(),
            "Accept".to_owned(),
            "audio/mpeg".to_owned(),
        ];
        assert_eq!(
            parse_header_pairs(flat),
            vec![
                ("Authorization".to_owned(), "Bearer x".to_owned()),
                ("Accept".to_owned(), "audio/mpeg".to_owned()),
            ]
        );
        assert_eq!(parse_header_pairs(vec![]), vec![]);
        assert_eq!(
            parse_header_pairs(vec!["Lone".to_owned()]),
            vec![],
            "a trailing name without a value should be dropped"
        );
    }

    #[test]
    fn test_content_length_from_js() {
        assert_eq!(content_length_from_js(Some(1234.)), Some(1234));
        assert_eq!(content_length_from_js(Some(0.)), Some(0));
        assert_eq!(content_length_from_js(Some(-1.)), None);
        assert_eq!(content_length_from_js(Some(f64::NAN)), None);
        assert_eq!(content_length_from_js(Some(f64::INFINITY)), None);
        assert_eq!(content_length_from_js(None), None);
    }
}
