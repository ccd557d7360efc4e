// HTTP routes for the image API
use actix_web::{get, post, web, Error, HttpRequest, HttpResponse};

use crate::app_state::AppState;
use crate::service::{download_service, list_service, upload_service};

/// Static placeholder listing of stored images, encoded as msgpack
#[get("/images")]
pub async fn list_images() -> Result<HttpResponse, Error> {
    list_service().await
}

/// Upload an image; responds 201 with the new image's location
#[post("/images")]
pub async fn upload_image(
    payload: web::Payload,
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    upload_service(payload, req, app_state).await
}

/// Stream a stored image back by name
#[get("/images/{name}")]
pub async fn download_image(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    download_service(path.into_inner(), app_state).await
}
