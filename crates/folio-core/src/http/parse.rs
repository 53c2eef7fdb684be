//! Parse raw header lines collected by curl into name/value pairs.

/// Parse collected header lines into `(name, value)` pairs.
///
/// curl reports the headers of every response in a redirect chain; a new
/// status line (`HTTP/...`) starts over so only the final response is kept.
pub(crate) fn parse_headers(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line
            .get(..5)
            .is_some_and(|p| p.eq_ignore_ascii_case("HTTP/"))
        {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    headers
}
