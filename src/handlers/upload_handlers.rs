//! Image upload endpoints (multipart) and deletion.
//!
//! Files land under `UPLOAD_DIR/{products,categories,hero}` with
//! generated names; the response URL is what product/category records
//! store in their image fields.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use actix_multipart::Multipart;
use actix_web::{delete, post, web, HttpResponse};
use futures_util::TryStreamExt;
use rand::Rng;
use serde::Serialize;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::middleware::AdminUser;
use crate::models::MessageResponse;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;
const HERO_MAX_BYTES: usize = 10 * 1024 * 1024;
const MAX_FILES_PER_REQUEST: usize = 10;

/// Where an upload lands and how its filename is prefixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Products,
    Categories,
    Hero,
}

impl UploadKind {
    fn dir_name(&self) -> &'static str {
        match self {
            UploadKind::Products => "products",
            UploadKind::Categories => "categories",
            UploadKind::Hero => "hero",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            UploadKind::Products => "product",
            UploadKind::Categories => "category",
            UploadKind::Hero => "hero",
        }
    }

    fn max_bytes(&self) -> usize {
        match self {
            UploadKind::Hero => HERO_MAX_BYTES,
            _ => DEFAULT_MAX_BYTES,
        }
    }

    pub fn all_dir_names() -> [&'static str; 3] {
        ["products", "categories", "hero"]
    }
}

impl FromStr for UploadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "products" => Ok(UploadKind::Products),
            "categories" => Ok(UploadKind::Categories),
            "hero" => Ok(UploadKind::Hero),
            other => Err(format!("unknown upload kind: {other}")),
        }
    }
}

#[derive(Debug, Serialize)]
struct UploadedFile {
    url: String,
    filename: String,
}

#[derive(Debug, Serialize)]
struct SingleUploadResponse {
    success: bool,
    message: &'static str,
    data: UploadedFile,
}

#[derive(Debug, Serialize)]
struct MultiUploadResponse {
    success: bool,
    message: &'static str,
    data: MultiUploadData,
}

#[derive(Debug, Serialize)]
struct MultiUploadData {
    urls: Vec<String>,
    count: usize,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/upload")
            .service(upload_product_image)
            .service(upload_product_images)
            .service(upload_category_image)
            .service(upload_hero_image)
            .service(delete_image),
    );
}

#[post("/product")]
async fn upload_product_image(
    _admin: AdminUser,
    config: web::Data<Config>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    single_upload(&config, payload, UploadKind::Products).await
}

#[post("/products")]
async fn upload_product_images(
    _admin: AdminUser,
    config: web::Data<Config>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let saved = save_all(&config, payload, UploadKind::Products).await?;
    if saved.is_empty() {
        return Err(AppError::Validation("No files uploaded".into()));
    }

    Ok(HttpResponse::Ok().json(MultiUploadResponse {
        success: true,
        message: "Images uploaded successfully",
        data: MultiUploadData {
            count: saved.len(),
            urls: saved.into_iter().map(|f| f.url).collect(),
        },
    }))
}

#[post("/category")]
async fn upload_category_image(
    _admin: AdminUser,
    config: web::Data<Config>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    single_upload(&config, payload, UploadKind::Categories).await
}

#[post("/hero")]
async fn upload_hero_image(
    _admin: AdminUser,
    config: web::Data<Config>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    single_upload(&config, payload, UploadKind::Hero).await
}

#[delete("/{kind}/{filename}")]
async fn delete_image(
    _admin: AdminUser,
    config: web::Data<Config>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (kind_raw, filename) = path.into_inner();
    let kind: UploadKind = kind_raw
        .parse()
        .map_err(|_| AppError::Validation("Invalid image type".into()))?;

    if !is_safe_filename(&filename) {
        return Err(AppError::Validation("Invalid filename".into()));
    }

    let file_path = config.upload_dir.join(kind.dir_name()).join(&filename);
    match tokio::fs::remove_file(&file_path).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::new("Image deleted successfully"))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::NotFound("Image".into()))
        }
        Err(e) => {
            tracing::error!(path = %file_path.display(), error = %e, "image delete failed");
            Err(AppError::Internal)
        }
    }
}

async fn single_upload(
    config: &Config,
    payload: Multipart,
    kind: UploadKind,
) -> AppResult<HttpResponse> {
    let mut saved = save_all(config, payload, kind).await?;
    let file = saved.pop().ok_or_else(|| AppError::Validation("No file uploaded".into()))?;

    Ok(HttpResponse::Ok().json(SingleUploadResponse {
        success: true,
        message: "Image uploaded successfully",
        data: file,
    }))
}

/// Streams every file field to disk, enforcing the extension
/// allow-list, per-file size limit and per-request file cap.
async fn save_all(
    config: &Config,
    mut payload: Multipart,
    kind: UploadKind,
) -> AppResult<Vec<UploadedFile>> {
    let dir = config.upload_dir.join(kind.dir_name());
    let mut saved = Vec::new();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart payload: {e}")))?
    {
        let original = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(ToOwned::to_owned);
        let Some(original) = original else {
            // Non-file form field, skip.
            continue;
        };

        if saved.len() >= MAX_FILES_PER_REQUEST {
            return Err(AppError::Validation(format!(
                "At most {MAX_FILES_PER_REQUEST} files per request"
            )));
        }

        let ext = allowed_extension(&original)
            .ok_or_else(|| AppError::Validation("Only image files are allowed".into()))?;

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read failed: {e}")))?
        {
            if bytes.len() + chunk.len() > kind.max_bytes() {
                return Err(AppError::Validation(format!(
                    "File exceeds the {} MB limit",
                    kind.max_bytes() / (1024 * 1024)
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        let filename = generate_filename(kind.prefix(), &ext);
        let path = dir.join(&filename);
        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "image write failed");
            AppError::Internal
        })?;

        saved.push(UploadedFile {
            url: format!("/uploads/{}/{}", kind.dir_name(), filename),
            filename,
        });
    }

    Ok(saved)
}

/// `<prefix>-<millis>-<9 random digits>.<ext>`, multer-style.
fn generate_filename(prefix: &str, ext: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{prefix}-{millis}-{suffix:09}.{ext}")
}

fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Rejects separators and parent references so a crafted filename
/// cannot escape the upload directory.
fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains("..")
        && PathBuf::from(filename).components().count() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_allow_list() {
        assert_eq!(allowed_extension("cap.JPG").as_deref(), Some("jpg"));
        assert_eq!(allowed_extension("wallet.webp").as_deref(), Some("webp"));
        assert!(allowed_extension("malware.exe").is_none());
        assert!(allowed_extension("no-extension").is_none());
    }

    #[test]
    fn filename_traversal_rejected() {
        assert!(is_safe_filename("product-1724900000-000000001.jpg"));
        assert!(!is_safe_filename("../secret.jpg"));
        assert!(!is_safe_filename("a/b.jpg"));
        assert!(!is_safe_filename("a\\b.jpg"));
        assert!(!is_safe_filename(""));
    }

    #[test]
    fn generated_filename_shape() {
        let name = generate_filename("product", "png");
        assert!(name.starts_with("product-"));
        assert!(name.ends_with(".png"));
        assert!(is_safe_filename(&name));
    }

    #[test]
    fn upload_kind_parses_known_dirs() {
        for dir in UploadKind::all_dir_names() {
            assert!(dir.parse::<UploadKind>().is_ok());
        }
        assert!("avatars".parse::<UploadKind>().is_err());
    }

    #[test]
    fn hero_limit_is_larger() {
        assert!(UploadKind::Hero.max_bytes() > UploadKind::Products.max_bytes());
    }
}
