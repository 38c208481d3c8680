use std::path::Path;

use actix_files::NamedFile;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::config::Config;
use crate::error::ServiceError;

pub async fn process(req: HttpRequest, config: web::Data<Config>, file_name: web::Path<String>) -> HttpResponse {
    match open_document(&config.storage_dir, &file_name) {
        Ok(file) => file.into_response(&req),
        Err(e) => e.to_response(),
    }
}

/// Stored names are `{32 hex digits}.pdf`; anything else never reaches the filesystem.
fn open_document(storage_dir: &Path, file_name: &str) -> Result<NamedFile, ServiceError> {
    if !is_stored_name(file_name) {
        return Err(ServiceError::NotFound(format!("document {}", file_name)));
    }
    let path = storage_dir.join(file_name);
    if !path.is_file() {
        return Err(ServiceError::NotFound(format!("document {}", file_name)));
    }
    Ok(NamedFile::open(path)?)
}

fn is_stored_name(file_name: &str) -> bool {
    match file_name.strip_suffix(".pdf") {
        Some(stem) => stem.len() == 32 && stem.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_digest_names_are_served() {
        assert!(is_stored_name("0cc175b9c0f1b6a831c399e269772661.pdf"));
        assert!(!is_stored_name("../signatures.sqlite"));
        assert!(!is_stored_name("0cc175b9c0f1b6a831c399e269772661.PDF"));
        assert!(!is_stored_name("mandat.pdf"));
    }

    #[test]
    fn unknown_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_document(dir.path(), "0cc175b9c0f1b6a831c399e269772661.pdf").unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
