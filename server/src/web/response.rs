// server/src/web/response.rs

//! The success half of the response envelope: `{success: true, message?, data}`.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<&'static str>,
  pub data: T,
}

fn respond<T: Serialize>(status: StatusCode, message: Option<&'static str>, data: T) -> HttpResponse {
  HttpResponse::build(status).json(Envelope {
    success: true,
    message,
    data,
  })
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
  respond(StatusCode::OK, None, data)
}

pub fn ok_with_message<T: Serialize>(message: &'static str, data: T) -> HttpResponse {
  respond(StatusCode::OK, Some(message), data)
}

pub fn created<T: Serialize>(message: &'static str, data: T) -> HttpResponse {
  respond(StatusCode::CREATED, Some(message), data)
}
