use serde::de::DeserializeOwned;
use crate::error::DescriptorError;

/// Deserialize a descriptor document, reporting the document path of the
/// node that could not be classified.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, DescriptorError> {
    let mut de = serde_json::Deserializer::from_str(src);
    let doc = serde_path_to_error::deserialize::<_, T>(&mut de).map_err(classify_error)?;
    de.end()?;
    Ok(doc)
}

pub fn from_value_with_path<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, DescriptorError> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(classify_error)
}

// Broken JSON text stays a JSON error; well-formed JSON that is not a
// descriptor is unclassifiable.
fn classify_error(err: serde_path_to_error::Error<serde_json::Error>) -> DescriptorError {
    let path = err.path().to_string();
    let inner = err.into_inner();
    if inner.is_syntax() || inner.is_eof() || inner.is_io() {
        DescriptorError::Json(inner)
    } else {
        DescriptorError::Unclassifiable { path, reason: inner.to_string() }
    }
}
