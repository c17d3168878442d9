use actix_web::{web, HttpResponse};

use crate::{error::StationError, station::Station};

const INDEX_HTML: &str = include_str!("index.html");

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

/// Takes a fresh reading. Blocks for the whole blink sequence when the
/// reading is out of range.
pub async fn get_data(station: web::Data<Station>) -> Result<HttpResponse, StationError> {
    let reading = station.sample().await?;
    Ok(HttpResponse::Ok().json(reading))
}

pub async fn get_log(station: web::Data<Station>) -> Result<HttpResponse, StationError> {
    let rows = station.read_log().await?;
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn clear_log(station: web::Data<Station>) -> Result<HttpResponse, StationError> {
    station.clear_log().await?;
    Ok(HttpResponse::NoContent().finish())
}
