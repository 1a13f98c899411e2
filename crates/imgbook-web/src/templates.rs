//! Askama templates for the landing page and gallery.
//!
//! Two full-page templates cover the whole UI:
//!
//! - `index.html` - static landing page with the upload form, served while
//!   the session has no image list
//! - `gallery.html` - the uploaded images with export and reset controls,
//!   served once the session holds a list

use askama::Template;
use askama_web::WebTemplate;

/// Static landing page with the upload form.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// Gallery of the session's uploaded images.
///
/// Image references are built as `/images/{name}`; the files themselves are
/// served by the static route.
#[derive(Template, WebTemplate)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub images: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_index_renders() {
        let html = IndexTemplate.render().unwrap();
        assert!(html.contains("/upload"));
        assert!(html.contains("multipart/form-data"));
    }

    #[test]
    fn test_gallery_lists_images() {
        let html = GalleryTemplate {
            images: vec!["images-1.png".to_string(), "images-2.jpg".to_string()],
        }
        .render()
        .unwrap();
        assert!(html.contains("/images/images-1.png"));
        assert!(html.contains("/images/images-2.jpg"));
    }
}
