use std::io::{self, ErrorKind, Write};
use std::net::TcpStream;

use tungstenite::accept_hdr;
use tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tungstenite::handshake::HandshakeError;
use tungstenite::http::StatusCode;
use tungstenite::{Error as WsError, WebSocket};

#[derive(Debug, Clone, PartialEq)]
pub enum OriginPolicy {
    AllowAll,
    Allowlist(Vec<String>),
}

impl OriginPolicy {
    pub fn from_allowlist(origins: Vec<String>) -> Self {
        if origins.is_empty() {
            OriginPolicy::AllowAll
        } else {
            OriginPolicy::Allowlist(origins)
        }
    }

    pub fn permits(&self, origin: Option<&str>) -> bool {
        match self {
            OriginPolicy::AllowAll => true,
            OriginPolicy::Allowlist(allowed) => {
                origin.is_some_and(|o| allowed.iter().any(|a| a == o))
            }
        }
    }
}

pub fn accept_websocket(
    stream: TcpStream,
    ws_path: &str,
    policy: &OriginPolicy,
) -> io::Result<WebSocket<TcpStream>> {
    // Kept aside so a failed handshake can still be answered over plain HTTP.
    let respond = stream.try_clone()?;

    let expected_path = ws_path.to_string();
    let policy = policy.clone();
    let callback = move |request: &Request, response: Response| {
        validate_upgrade_request(request, &expected_path, &policy)
            .map(|()| response)
            .map_err(UpgradeRejection::into_response)
    };

    match accept_hdr(stream, callback) {
        Ok(websocket) => Ok(websocket),
        // The rejection response was already written by the handshake.
        Err(HandshakeError::Failure(WsError::Http(response))) => Err(io::Error::new(
            ErrorKind::PermissionDenied,
            format!("upgrade rejected with status {}", response.status()),
        )),
        Err(e) => {
            write_bad_request(respond);
            Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("websocket handshake failed: {}", e),
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct UpgradeRejection {
    status: StatusCode,
    body: String,
}

impl UpgradeRejection {
    fn new(status: StatusCode, body: &str) -> Self {
        UpgradeRejection {
            status,
            body: body.to_string(),
        }
    }

    fn into_response(self) -> ErrorResponse {
        let mut response = ErrorResponse::new(Some(self.body));
        *response.status_mut() = self.status;
        response
    }
}

fn validate_upgrade_request(
    request: &Request,
    ws_path: &str,
    policy: &OriginPolicy,
) -> Result<(), UpgradeRejection> {
    if request.uri().path() != ws_path {
        return Err(UpgradeRejection::new(StatusCode::NOT_FOUND, "Not Found"));
    }

    let origin = request
        .headers()
        .get("Origin")
        .and_then(|value| value.to_str().ok());
    if !policy.permits(origin) {
        return Err(UpgradeRejection::new(
            StatusCode::FORBIDDEN,
            "Origin not allowed",
        ));
    }

    Ok(())
}

fn write_bad_request(mut stream: TcpStream) {
    let _ = stream.write_all(b"HTTP/1.1 400 Bad Request\r\n");
    let _ = stream.write_all(b"Content-Type: text/plain\r\n");
    let _ = stream.write_all(b"Content-Length: 11\r\n");
    let _ = stream.write_all(b"Connection: close\r\n");
    let _ = stream.write_all(b"\r\n");
    let _ = stream.write_all(b"Bad Request");
}
