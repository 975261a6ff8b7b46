use std::{
    fs, io,
    path::Path,
};

use image::{DynamicImage, ImageError, ImageFormat};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

pub const AVATAR_SIZE: u32 = 125;
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("File does not have an approved extension: jpg, png")]
    Extension,
    #[error("Invalid image file: {0}")]
    Decode(ImageError),
    #[error("could not encode picture: {0}")]
    Encode(ImageError),
    #[error("could not store picture: {0}")]
    Io(#[from] io::Error),
}

impl AvatarError {
    /// Errors caused by the uploaded file itself, as opposed to the server.
    pub fn is_user_error(&self) -> bool {
        matches!(self, AvatarError::Extension | AvatarError::Decode(_))
    }
}

pub fn picture_extension(file_name: &str) -> Result<String, AvatarError> {
    Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase())
        .filter(|extension| ALLOWED_EXTENSIONS.contains(&extension.as_str()))
        .ok_or(AvatarError::Extension)
}

pub fn random_hex(len_bytes: usize) -> String {
    let mut buffer = vec![0u8; len_bytes];
    OsRng.fill_bytes(&mut buffer);
    hex::encode(buffer)
}

/// Shrinks to fit the avatar box keeping the aspect ratio; never enlarges.
pub fn fit_avatar(picture: DynamicImage) -> DynamicImage {
    if picture.width() > AVATAR_SIZE || picture.height() > AVATAR_SIZE {
        picture.thumbnail(AVATAR_SIZE, AVATAR_SIZE)
    } else {
        picture
    }
}

/// Decodes, resizes and writes an uploaded picture under `photos_dir`.
/// Returns the generated file name.
pub fn save_picture(file_name: &str, bytes: &[u8], photos_dir: &Path) -> Result<String, AvatarError> {
    let extension = picture_extension(file_name)?;
    let format = ImageFormat::from_extension(&extension).ok_or(AvatarError::Extension)?;

    let picture = image::load_from_memory(bytes).map_err(AvatarError::Decode)?;
    let picture = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(fit_avatar(picture).to_rgb8()),
        _ => fit_avatar(picture),
    };

    fs::create_dir_all(photos_dir)?;
    let picture_fn = format!("{}.{}", random_hex(8), extension);
    picture
        .save_with_format(photos_dir.join(&picture_fn), format)
        .map_err(AvatarError::Encode)?;

    Ok(picture_fn)
}

pub fn remove_picture(photos_dir: &Path, picture_fn: &str) -> Result<(), AvatarError> {
    fs::remove_file(photos_dir.join(picture_fn))?;
    Ok(())
}
