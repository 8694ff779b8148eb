//! Request matchers that wiremock does not ship
//!
//! Rendered registrations refer to these by their full path, e.g.
//! `mockscribe::matchers::form_params([("Hello", "World")])`.

use wiremock::{Match, Request};

fn sorted_pairs<I, K, V>(pairs: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut pairs: Vec<(String, String)> = pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    pairs.sort();
    pairs
}

/// Matches requests whose form-encoded body holds exactly the expected pairs.
///
/// Pair order is ignored; duplicates count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormParamsMatcher {
    expected: Vec<(String, String)>,
}

/// Match a form-encoded body against `pairs`
pub fn form_params<I, K, V>(pairs: I) -> FormParamsMatcher
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    FormParamsMatcher {
        expected: sorted_pairs(pairs),
    }
}

impl Match for FormParamsMatcher {
    fn matches(&self, request: &Request) -> bool {
        sorted_pairs(url::form_urlencoded::parse(&request.body).into_owned()) == self.expected
    }
}

/// Matches requests whose query string holds exactly the expected pairs.
///
/// Unlike wiremock's `query_param`, extra parameters make the match fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParamsMatcher {
    expected: Vec<(String, String)>,
}

/// Match the whole query string against `pairs`, in any order
pub fn query_params<I, K, V>(pairs: I) -> QueryParamsMatcher
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    QueryParamsMatcher {
        expected: sorted_pairs(pairs),
    }
}

impl Match for QueryParamsMatcher {
    fn matches(&self, request: &Request) -> bool {
        sorted_pairs(request.url.query_pairs().into_owned()) == self.expected
    }
}

/// Matches requests carrying a header with exactly this raw value.
///
/// wiremock's `header` splits request values on `,`, so a value such as
/// `application/json, text/plain` never equals itself there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderExactMatcher {
    name: String,
    value: String,
}

/// Match a header by name (case-insensitive) and raw value (exact)
pub fn header_exact(name: impl Into<String>, value: impl Into<String>) -> HeaderExactMatcher {
    HeaderExactMatcher {
        name: name.into().to_ascii_lowercase(),
        value: value.into(),
    }
}

impl Match for HeaderExactMatcher {
    fn matches(&self, request: &Request) -> bool {
        request
            .headers
            .get_all(self.name.as_str())
            .iter()
            .any(|value| value.as_bytes() == self.value.as_bytes())
    }
}
