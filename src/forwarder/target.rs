//! Target URL construction.

use axum::http::Method;

/// Query marker that asks the backend for a machine-readable response.
pub const JSON_FORMAT_PARAM: &str = "format=json";

/// How the inbound query string is carried to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Forward the query verbatim.
    PassThrough,
    /// Forward the query with `format=json` appended.
    AppendJsonFormat,
}

impl QueryMode {
    /// Mode used by the inbound route for `method`.
    pub fn for_method(method: &Method) -> Self {
        if method == Method::GET || method == Method::HEAD {
            QueryMode::AppendJsonFormat
        } else {
            QueryMode::PassThrough
        }
    }

    /// Render the query component, including the leading `?`.
    ///
    /// An empty inbound query is treated as absent. An existing `format`
    /// parameter is left in place; the marker is appended regardless.
    pub fn render(self, query: Option<&str>) -> String {
        let query = query.filter(|q| !q.is_empty());
        match (self, query) {
            (QueryMode::PassThrough, Some(q)) => format!("?{q}"),
            (QueryMode::PassThrough, None) => String::new(),
            (QueryMode::AppendJsonFormat, Some(q)) => format!("?{q}&{JSON_FORMAT_PARAM}"),
            (QueryMode::AppendJsonFormat, None) => format!("?{JSON_FORMAT_PARAM}"),
        }
    }
}

/// Build `{origin}{mount_prefix}/{path}{query}`.
///
/// `path` is the wildcard capture, without the mount prefix and without its
/// leading slash. `query` must already be rendered by [`QueryMode::render`].
pub fn build_target_url(
    origin: &str,
    mount_prefix: &str,
    path: &str,
    query: &str,
    require_trailing_slash: bool,
) -> String {
    let mut url = format!("{origin}{mount_prefix}/{path}");
    if require_trailing_slash && !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(query);
    url
}
