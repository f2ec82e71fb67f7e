// src/handlers/dashboard_handlers.rs
use actix_multipart::{Field, Multipart};
use actix_web::{get, post, web, HttpResponse};
use futures::StreamExt;
use log::info;

use crate::dtos::dashboard_dtos::DashboardUpdate;
use crate::dtos::nested_form::FormError;
use crate::error::AppError;
use crate::handlers::html;
use crate::middleware::auth_extractor::AdminSession;
use crate::models::profile::Profile;
use crate::services::upload_services::UploadService;
use crate::views::UPDATE_SUCCESS_MESSAGE;
use crate::AppState;

/// Multipart field carrying the hero image.
const PROFILE_IMAGE_FIELD: &str = "profileImage";

/// A decoded dashboard form plus the public path of the stored image, if any.
struct DashboardSubmission {
    update: DashboardUpdate,
    image: Option<String>,
}

/// GET /dashboard
#[get("/dashboard")]
pub async fn dashboard(
    _admin: AdminSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let profile = state.store.fetch_or_seed().await?;
    Ok(html(state.views.dashboard(&profile, None)?))
}

/// POST /dashboard/update
/// Applies the submitted form to the stored profile.
#[post("/dashboard/update")]
pub async fn update_dashboard(
    _admin: AdminSession,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let submission = read_submission(&state.uploads, payload).await?;
    let image = submission.image.clone();

    let profile = match apply_submission(&state, submission).await {
        Ok(profile) => profile,
        Err(e) => {
            // Do not leave an image behind for an update that was not saved.
            if let Some(path) = &image {
                state.uploads.remove(path).await;
            }
            return Err(e);
        }
    };

    info!(
        "Profile updated{}",
        if image.is_some() { " with new hero image" } else { "" }
    );
    Ok(html(state.views.dashboard(&profile, Some(UPDATE_SUCCESS_MESSAGE))?))
}

async fn apply_submission(
    state: &AppState,
    submission: DashboardSubmission,
) -> Result<Profile, AppError> {
    let mut profile = state.store.fetch_or_seed().await?;
    profile.apply_update(submission.update, submission.image);
    state.store.save(&profile).await?;
    Ok(profile)
}

/// Decodes the multipart body. Any image stored along the way is removed
/// again when the rest of the body turns out to be unusable.
async fn read_submission(
    uploads: &UploadService,
    payload: Multipart,
) -> Result<DashboardSubmission, AppError> {
    let mut image: Option<String> = None;

    let decoded = match collect_fields(uploads, payload, &mut image).await {
        Ok(pairs) => DashboardUpdate::from_pairs(pairs).map_err(AppError::from),
        Err(e) => Err(e),
    };

    match decoded {
        Ok(update) => Ok(DashboardSubmission { update, image }),
        Err(e) => {
            if let Some(path) = &image {
                uploads.remove(path).await;
            }
            Err(e)
        }
    }
}

/// Walks the multipart body: text fields are collected for nested decoding,
/// the first non-empty `profileImage` file is handed to the upload service
/// and its public path written to `image`.
async fn collect_fields(
    uploads: &UploadService,
    mut payload: Multipart,
    image: &mut Option<String>,
) -> Result<Vec<(String, String)>, AppError> {
    let mut pairs: Vec<(String, String)> = Vec::new();

    while let Some(item) = payload.next().await {
        let field = item.map_err(|e| FormError::Multipart(e.to_string()))?;
        let name = field.name().unwrap_or_default().to_string();

        if name == PROFILE_IMAGE_FIELD {
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .filter(|f| !f.is_empty())
                .map(str::to_string);
            match filename {
                Some(filename) if image.is_none() => {
                    *image = uploads.accept(Some(&filename), field).await?;
                }
                _ => drain(field).await?,
            }
            continue;
        }

        if name.is_empty() {
            drain(field).await?;
            continue;
        }

        let value = read_text(field).await?;
        pairs.push((name, value));
    }

    Ok(pairs)
}

async fn read_text(mut field: Field) -> Result<String, FormError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| FormError::Multipart(e.to_string()))?;
        buf.extend_from_slice(&chunk);
    }
    let name = field.name().unwrap_or_default().to_string();
    String::from_utf8(buf).map_err(|_| FormError::Encoding(name))
}

async fn drain(mut field: Field) -> Result<(), FormError> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|e| FormError::Multipart(e.to_string()))?;
    }
    Ok(())
}
