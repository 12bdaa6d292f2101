//! The target application the driver is exercised against.
//!
//! | Route | Response |
//! |-------|----------|
//! | `/` | 200 `{"Hello world!": "Hello world!"}` |
//! | `/foo` | 200 `{"Another World": "Another World"}` |
//! | `/env` | 200, echo of the request (see [`target_app`]) |
//! | `/redirect` | 302 to `/landed` |
//! | `/landed` | 200 `{"landed": true}` |
//! | `/redirect_loop` | 302 to itself |
//! | `/redirect_preserve` | 307 to `/env` |
//! | `/redirect_external` | 302 to `/landed` on `localhost` (another origin) |
//! | `/errors/{code}` | `{code}` with `{"status_code": code}` |
//! | `/text` | 200 `text/plain` |
//! | anything else | 404 JSON |
//!
//! Routes answer every method.

use bytes::Bytes;
use http::header::{HeaderName, CONTENT_LENGTH, CONTENT_TYPE, HOST, LOCATION};
use http::{HeaderValue, StatusCode};
use serde_json::{json, Map, Value};

/// Content type of every JSON response.
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Host the external redirect points at.
pub const EXTERNAL_HOST: &str = "localhost";

/// Handles one request.
///
/// `/env` answers with:
///
/// ```json
/// {
///   "content_type": "application/json",
///   "content_length": "15",
///   "request_method": "POST",
///   "rack.input": "{\"some\":\"args\"}",
///   "query_string": "",
///   "headers": {"X_CUSTOM_HEADER": "v", "ACCEPT": "application/json"}
/// }
/// ```
///
/// `content_type` and `content_length` are `null` when the request has no
/// such header.
pub fn target_app(request: http::Request<Bytes>) -> http::Response<Bytes> {
    let path = request.uri().path();

    match path {
        "/" => json_response(StatusCode::OK, &json!({"Hello world!": "Hello world!"})),
        "/foo" => json_response(StatusCode::OK, &json!({"Another World": "Another World"})),
        "/env" => json_response(StatusCode::OK, &echo(&request)),
        "/redirect" => redirect(StatusCode::FOUND, "/landed"),
        "/landed" => json_response(StatusCode::OK, &json!({"landed": true})),
        "/redirect_loop" => redirect(StatusCode::FOUND, "/redirect_loop"),
        "/redirect_preserve" => redirect(StatusCode::TEMPORARY_REDIRECT, "/env"),
        "/redirect_external" => {
            let location = match request_port(&request) {
                Some(port) => format!("http://{EXTERNAL_HOST}:{port}/landed"),
                None => format!("http://{EXTERNAL_HOST}/landed"),
            };
            redirect(StatusCode::FOUND, &location)
        }
        "/text" => {
            let mut response = http::Response::new(Bytes::from_static(b"plain text, not JSON"));
            response.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            );
            response
        }
        _ => match error_status(path) {
            Some(status) => json_response(status, &json!({"status_code": status.as_u16()})),
            None => not_found(path),
        },
    }
}

fn echo(request: &http::Request<Bytes>) -> Value {
    let header = |name: HeaderName| {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map_or(Value::Null, |v| Value::String(v.to_string()))
    };

    let mut headers = Map::new();
    for name in request.headers().keys() {
        let values: Vec<&str> = request
            .headers()
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        headers.insert(env_name(name.as_str()), Value::String(values.join(", ")));
    }

    json!({
        "content_type": header(CONTENT_TYPE),
        "content_length": header(CONTENT_LENGTH),
        "request_method": request.method().as_str(),
        "rack.input": String::from_utf8_lossy(request.body()),
        "query_string": request.uri().query().unwrap_or_default(),
        "headers": headers,
    })
}

/// `x-custom-header` becomes `X_CUSTOM_HEADER`.
fn env_name(header: &str) -> String {
    header.to_ascii_uppercase().replace('-', "_")
}

fn request_port(request: &http::Request<Bytes>) -> Option<u16> {
    let from_host = request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(|host| host.rsplit_once(':'))
        .and_then(|(_, port)| port.parse().ok());
    from_host.or_else(|| request.uri().port_u16())
}

fn error_status(path: &str) -> Option<StatusCode> {
    let code = path.strip_prefix("/errors/")?.parse::<u16>().ok()?;
    StatusCode::from_u16(code).ok()
}

fn json_response(status: StatusCode, body: &Value) -> http::Response<Bytes> {
    let mut response = http::Response::new(Bytes::from(body.to_string()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
    response
}

fn redirect(status: StatusCode, location: &str) -> http::Response<Bytes> {
    let mut response = json_response(status, &json!({"location": location}));
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(LOCATION, value);
    }
    response
}

fn not_found(path: &str) -> http::Response<Bytes> {
    json_response(
        StatusCode::NOT_FOUND,
        &json!({"error": "not found", "path": path}),
    )
}
