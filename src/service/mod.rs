//service/mod.rs
pub mod image_service;

use actix_web::body::SizedStream;
use actix_web::error::ErrorInternalServerError;
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, HttpRequest, HttpResponse};
use futures::TryStreamExt;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::io;
use tokio_util::io::{ReaderStream, StreamReader};

use crate::app_state::AppState;
use crate::service::image_service::{ImageService, IMAGES_PATH};
use crate::storage::CHUNK_SIZE_BYTES;

/// Content type of the image collection document
pub const MSGPACK_CONTENT_TYPE: &str = "application/msgpack";

/// Placeholder entry in the image collection document
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ImageLink {
    pub href: String,
}

/// Image collection document
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ImageCollection {
    pub images: Vec<ImageLink>,
}

const PLACEHOLDER_IMAGE: &str = "8ee7480f-8de7-4ae5-a784-dfff7e57e611.png";

/// Run `f` with the `image` MDC key set. The key is cleared before returning,
/// so never hold it across an await point.
fn with_image_tag<T>(name: &str, f: impl FnOnce() -> T) -> T {
    log_mdc::insert("image", name);
    let out = f();
    log_mdc::remove("image");
    out
}

pub async fn upload_service(
    payload: web::Payload,
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let content_type = req.content_type().to_string();
    debug!("Upload called with content type: {:?}", content_type);

    // Feed the request body to the store as a reader, one transport chunk at a time
    let body = payload.map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()));
    let reader = StreamReader::new(body);
    tokio::pin!(reader);

    let name = app_state.image_service.upload(&mut reader, &content_type).await?;
    let location = ImageService::location(&name);
    with_image_tag(name.as_str(), || info!("Created {}", location));

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .finish())
}

pub async fn download_service(
    name: String,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    with_image_tag(&name, || debug!("Download requested"));

    let download = app_state.image_service.download(&name).await?;

    with_image_tag(&name, || {
        debug!("Streaming {} bytes as {}", download.length, download.content_type)
    });
    let stream = ReaderStream::with_capacity(download.reader, CHUNK_SIZE_BYTES);
    Ok(HttpResponse::Ok()
        .content_type(download.content_type)
        .body(SizedStream::new(download.length, stream)))
}

pub async fn list_service() -> Result<HttpResponse, Error> {
    let doc = ImageCollection {
        images: vec![ImageLink {
            href: format!("{}/{}", IMAGES_PATH, PLACEHOLDER_IMAGE),
        }],
    };

    let body = rmp_serde::to_vec_named(&doc).map_err(|e| {
        error!("Failed to encode image collection: {}", e);
        ErrorInternalServerError(e)
    })?;
    Ok(HttpResponse::Ok().content_type(MSGPACK_CONTENT_TYPE).body(body))
}
