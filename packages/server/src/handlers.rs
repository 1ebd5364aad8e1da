//! HTTP handler functions for the statement upload API.

use actix_multipart::{Multipart, MultipartError};
use actix_web::http::{Method, header};
use actix_web::{HttpRequest, HttpResponse, web};
use bank_statement_server_models::{ApiError, ApiTransactions, PDF_CONTENT_TYPE, UPLOAD_FIELD};
use futures::StreamExt as _;

use crate::AppState;

const BAD_UPLOAD: &str = "Please upload a PDF file.";
const PROCESSING_FAILED: &str = "Error processing PDF.";

/// Reasons an upload is rejected before parsing.
#[derive(Debug, thiserror::Error)]
enum UploadError {
    #[error("multipart field `{UPLOAD_FIELD}` is missing")]
    MissingFile,

    #[error("field `{UPLOAD_FIELD}` has content type {0}, expected {PDF_CONTENT_TYPE}")]
    NotPdf(String),

    #[error("file exceeds the {0} byte upload limit")]
    TooLarge(usize),

    #[error("invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

/// `POST /upload`
///
/// Reads the `file` field, extracts its text and parses the transaction
/// table.
pub async fn upload(state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let bytes = match read_pdf_field(payload, state.max_upload_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Rejected upload: {e}");
            return HttpResponse::BadRequest()
                .json(ApiError::new(BAD_UPLOAD).with_details(e.to_string()));
        }
    };

    log::debug!("Received statement upload of {} bytes", bytes.len());

    let extractor = state.extractor.clone();
    let text_source = state.text_source.clone();
    let result = web::block(move || extractor.extract_document(text_source.as_ref(), &bytes)).await;

    match result {
        Ok(Ok(transactions)) => HttpResponse::Ok().json(ApiTransactions { transactions }),
        Ok(Err(e)) => {
            log::error!("Failed to process statement: {e}");
            HttpResponse::InternalServerError()
                .json(ApiError::new(PROCESSING_FAILED).with_details(e.to_string()))
        }
        Err(e) => {
            log::error!("Statement processing task failed: {e}");
            HttpResponse::InternalServerError()
                .json(ApiError::new(PROCESSING_FAILED).with_details(e.to_string()))
        }
    }
}

/// Fallback for every unmatched route and method.
///
/// `OPTIONS` is answered as a CORS preflight; everything else is a 404.
pub async fn fallback(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return HttpResponse::Ok()
            .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"))
            .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
            .finish();
    }

    HttpResponse::NotFound().json(ApiError::new("Not Found"))
}

/// Streams the PDF form field into memory, enforcing the size limit.
async fn read_pdf_field(mut payload: Multipart, limit: usize) -> Result<Vec<u8>, UploadError> {
    while let Some(item) = payload.next().await {
        let mut field = item?;
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(|m| m.essence_str().to_owned());
        if content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
            return Err(UploadError::NotPdf(
                content_type.unwrap_or_else(|| "none".to_owned()),
            ));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > limit {
                return Err(UploadError::TooLarge(limit));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(bytes);
    }

    Err(UploadError::MissingFile)
}
