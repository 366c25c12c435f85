use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::borrow::Cow;

pub(crate) trait ApiResponse: erased_serde::Serialize {}
erased_serde::serialize_trait_object!(ApiResponse);

/// Every handler body funnels through this one untagged enum, so a payload
/// serializes as itself and an error as the bare `{"error": ...}` object.
#[derive(serde::Serialize)]
#[serde(untagged)]
pub(crate) enum Response<'a> {
    Ok(Box<dyn erased_serde::Serialize + Send + Sync + 'static>),
    Error(EndpointError<'a>),
}

pub(crate) fn json<T>(value: T) -> Json<Response<'static>>
where
    T: ApiResponse + Send + Sync + 'static,
{
    Json(Response::Ok(Box::new(value)))
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub struct Error {
    status: StatusCode,
    body: EndpointError<'static>,
}

impl Error {
    pub fn user<S: std::fmt::Display>(message: S) -> Self {
        Error {
            status: StatusCode::BAD_REQUEST,
            body: EndpointError {
                error: message.to_string().into(),
            },
        }
    }

    pub fn internal<S: std::fmt::Display>(message: S) -> Self {
        Error {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: EndpointError {
                error: message.to_string().into(),
            },
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.body.error)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(Response::Error(self.body))).into_response()
    }
}

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Error::internal(value)
    }
}

/// The response upon encountering an error. The editor integration matches
/// on this exact shape, so the body is `{"error": "<message>"}` and nothing
/// else.
#[derive(serde::Serialize, PartialEq, Eq, Debug)]
pub struct EndpointError<'a> {
    error: Cow<'a, str>,
}
