//! Echo of request parameters into follow-up links.

use indexmap::IndexMap;
use serde::Serialize;
use url::form_urlencoded::byte_serialize;

/// Request parameter that names the web form itself; never echoed.
pub const WEB_FORM_NAME_PARAM: &str = "web_form_name";

/// Query-string fragment rebuilt from request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteParams {
	/// `?key=value&...`, empty when nothing was echoed
	pub query: String,
	/// Separator to use when appending one more parameter
	pub delimiter: &'static str,
}

/// Encode request parameters as a query-string suffix.
///
/// Parameters keep their insertion order and the form-name parameter is
/// skipped. Keys and values are form-urlencoded.
///
/// # Examples
///
/// ```
/// use indexmap::IndexMap;
/// use reinhardt_webforms::route::make_route_string;
///
/// let mut params = IndexMap::new();
/// params.insert("web_form_name".to_string(), "signup".to_string());
/// params.insert("name".to_string(), "EV-0001".to_string());
/// params.insert("ref".to_string(), "mail".to_string());
///
/// let route = make_route_string(&params);
/// assert_eq!(route.query, "?name=EV-0001&ref=mail");
/// assert_eq!(route.delimiter, "&");
/// ```
pub fn make_route_string(params: &IndexMap<String, String>) -> RouteParams {
	let pairs: Vec<String> = params
		.iter()
		.filter(|(key, _)| key.as_str() != WEB_FORM_NAME_PARAM)
		.map(|(key, value)| format!("{}={}", encode(key), encode(value)))
		.collect();

	if pairs.is_empty() {
		return RouteParams {
			query: String::new(),
			delimiter: "?",
		};
	}

	RouteParams {
		query: format!("?{}", pairs.join("&")),
		delimiter: "&",
	}
}

fn encode(part: &str) -> String {
	byte_serialize(part.as_bytes()).collect()
}
