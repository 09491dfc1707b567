use bytes::Bytes;
use tracing::debug;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
/// Used when the browser sends a file part without a file name.
pub const DEFAULT_FILE_NAME: &str = "document.pdf";

/// The file the user picked, held until it is replaced by another pick.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSelection {
    file_name: String,
    /// As declared by the browser; always a PDF type once selected.
    media_type: String,
    bytes: Bytes,
}

impl UploadSelection {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Holds at most one pending selection. Only PDFs are accepted; anything else
/// is dropped without surfacing an error.
#[derive(Debug, Default)]
pub struct UploadController {
    selection: Option<UploadSelection>,
}

impl UploadController {
    /// Offers a picked or dropped file. Returns whether it became the selection.
    pub fn offer(&mut self, file_name: &str, media_type: Option<&str>, bytes: Bytes) -> bool {
        let Some(media_type) = media_type.filter(|m| is_pdf(m)) else {
            debug!(
                file_name,
                media_type = media_type.unwrap_or("<none>"),
                "Ignoring non-PDF upload"
            );
            return false;
        };
        if bytes.is_empty() {
            debug!(file_name, "Ignoring empty upload");
            return false;
        }
        let file_name = if file_name.trim().is_empty() {
            DEFAULT_FILE_NAME
        } else {
            file_name
        };
        self.selection = Some(UploadSelection::new(file_name, media_type, bytes));
        true
    }

    pub fn selection(&self) -> Option<&UploadSelection> {
        self.selection.as_ref()
    }

    /// Analyze is enabled only with a selection and no request in flight.
    pub fn can_analyze(&self, request_in_flight: bool) -> bool {
        self.selection.is_some() && !request_in_flight
    }
}

/// Compares the media type essence, ignoring parameters and case.
fn is_pdf(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_bytes() -> Bytes {
        Bytes::from_static(b"%PDF-1.7")
    }

    #[test]
    fn test_accepts_pdf() {
        let mut upload = UploadController::default();
        assert!(upload.offer("paper.pdf", Some("application/pdf"), pdf_bytes()));
        assert_eq!(upload.selection().unwrap().file_name(), "paper.pdf");
        assert!(upload.can_analyze(false));
    }

    #[test]
    fn test_ignores_other_media_types() {
        let mut upload = UploadController::default();
        assert!(!upload.offer("notes.txt", Some("text/plain"), pdf_bytes()));
        assert!(!upload.offer("paper.pdf", None, pdf_bytes()));
        assert!(upload.selection().is_none());
        assert!(!upload.can_analyze(false));
    }

    #[test]
    fn test_non_pdf_does_not_replace_existing_selection() {
        let mut upload = UploadController::default();
        upload.offer("first.pdf", Some("application/pdf"), pdf_bytes());
        upload.offer("image.png", Some("image/png"), Bytes::from_static(b"png"));
        assert_eq!(upload.selection().unwrap().file_name(), "first.pdf");
    }

    #[test]
    fn test_pdf_replaces_existing_selection() {
        let mut upload = UploadController::default();
        upload.offer("first.pdf", Some("application/pdf"), pdf_bytes());
        upload.offer("second.pdf", Some("Application/PDF; name=x"), pdf_bytes());
        let selection = upload.selection().unwrap();
        assert_eq!(selection.file_name(), "second.pdf");
        assert_eq!(selection.media_type(), "Application/PDF; name=x");
    }

    #[test]
    fn test_ignores_empty_file_and_names_unnamed_file() {
        let mut upload = UploadController::default();
        assert!(!upload.offer("empty.pdf", Some("application/pdf"), Bytes::new()));
        assert!(upload.offer("", Some("application/pdf"), pdf_bytes()));
        assert_eq!(upload.selection().unwrap().file_name(), DEFAULT_FILE_NAME);
    }

    #[test]
    fn test_analyze_disabled_while_in_flight() {
        let mut upload = UploadController::default();
        upload.offer("paper.pdf", Some("application/pdf"), pdf_bytes());
        assert!(!upload.can_analyze(true));
    }
}
