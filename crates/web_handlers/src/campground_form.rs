use actix_multipart::Multipart;
use actix_web::web::BytesMut;
use futures_util::TryStreamExt;

use campground_services::{CampgroundError, CampgroundForm};
use media_services::UploadedFile;

/// File extensions accepted for campground images.
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Returns whether the filename carries an accepted image extension.
pub fn is_image_filename(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Reads a multipart campground submission into its text fields and the
/// optional image file.
///
/// Unknown fields are discarded, so client-supplied `rating` or `author`
/// parts never make it past this point. Non-image filenames are rejected
/// outright.
pub async fn read_campground_form(
    mut payload: Multipart,
) -> Result<(CampgroundForm, Option<UploadedFile>), CampgroundError> {
    let mut name = None;
    let mut price = None;
    let mut description = None;
    let mut location = None;
    let mut image = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| CampgroundError::Validation(format!("Malformed multipart payload: {}", e)))?
    {
        let Some(field_name) = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .map(str::to_owned)
        else {
            continue;
        };

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);

        let mut data = BytesMut::new();
        while let Some(chunk) = field.try_next().await.map_err(|e| {
            CampgroundError::Validation(format!("Failed to read field {}: {}", field_name, e))
        })? {
            data.extend_from_slice(&chunk);
        }

        match field_name.as_str() {
            "image" => {
                let filename = filename.unwrap_or_default();
                // A file input left empty arrives as an empty part; that is
                // "no image", not a bad filename.
                if filename.is_empty() && data.is_empty() {
                    continue;
                }
                if !is_image_filename(&filename) {
                    return Err(CampgroundError::Validation(
                        "Only image files are allowed!".to_string(),
                    ));
                }
                image = Some(UploadedFile {
                    filename,
                    bytes: data.to_vec(),
                });
            }
            "name" => name = Some(text_field(&field_name, &data)?),
            "price" => price = Some(text_field(&field_name, &data)?),
            "description" => description = Some(text_field(&field_name, &data)?),
            "location" => location = Some(text_field(&field_name, &data)?),
            _ => {} // rating, author and anything else a client smuggles in
        }
    }

    let form = CampgroundForm {
        name: name.unwrap_or_default(),
        price: price.unwrap_or_default(),
        description: description.unwrap_or_default(),
        location: location.unwrap_or_default(),
    };

    Ok((form, image))
}

fn text_field(name: &str, data: &[u8]) -> Result<String, CampgroundError> {
    String::from_utf8(data.to_vec())
        .map_err(|_| CampgroundError::Validation(format!("Field {} is not valid UTF-8", name)))
}
