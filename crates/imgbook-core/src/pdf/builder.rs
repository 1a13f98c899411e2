//! Building a multi-page PDF, one A4 page per image.
//!
//! # Coordinate System
//!
//! PDF uses a bottom-left origin: (0, 0) is the bottom-left corner of the
//! page, X increases right, Y increases up. Image XObjects are placed with a
//! `cm` transform whose scale terms give the drawn width and height and
//! whose translation terms give the bottom-left corner of the image.

use lopdf::{dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};
use crate::store::ImageStore;
use super::embed::DecodedImage;

// =============================================================================
// Layout Constants
// =============================================================================

/// ISO A4 page width in points.
pub const A4_WIDTH: f32 = 595.28;

/// ISO A4 page height in points.
pub const A4_HEIGHT: f32 = 841.89;

/// Margin between page edge and image box (in points).
pub const PAGE_MARGIN: f32 = 20.0;

/// Maximum drawn image width (A4 width minus both margins).
pub const MAX_IMAGE_WIDTH: f32 = A4_WIDTH - 2.0 * PAGE_MARGIN;

/// Maximum drawn image height (A4 height minus both margins).
const MAX_IMAGE_HEIGHT: f32 = A4_HEIGHT - 2.0 * PAGE_MARGIN;

// =============================================================================
// Builder
// =============================================================================

/// Incremental PDF builder. Pages are appended in call order; [`finish`]
/// produces the serialized document.
///
/// Zero pages is a valid outcome: the page tree is written with an empty
/// `Kids` array and `Count 0`, which lopdf serializes without complaint.
///
/// [`finish`]: Self::finish
pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append one page containing the given image, fitted into the margin
    /// box and centered both ways.
    pub fn add_image_page(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let decoded = DecodedImage::from_bytes(name, bytes)?;

        #[allow(clippy::cast_precision_loss)]
        let (img_w, img_h) = (decoded.width.max(1) as f32, decoded.height.max(1) as f32);
        let scale = (MAX_IMAGE_WIDTH / img_w).min(MAX_IMAGE_HEIGHT / img_h);
        let drawn_w = img_w * scale;
        let drawn_h = img_h * scale;
        let x = PAGE_MARGIN + (MAX_IMAGE_WIDTH - drawn_w) / 2.0;
        let y = PAGE_MARGIN + (MAX_IMAGE_HEIGHT - drawn_h) / 2.0;

        let image_id = decoded.add_to_document(&mut self.doc);

        let content = format!("q {drawn_w} 0 0 {drawn_h} {x} {y} cm /Im0 Do Q");
        let content_id = self.doc.add_object(lopdf::Stream::new(
            lopdf::Dictionary::new(),
            content.into_bytes(),
        ));

        let resources_id = self.doc.add_object(dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        });

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), A4_WIDTH.into(), A4_HEIGHT.into()],
        });
        self.page_ids.push(page_id);

        Ok(())
    }

    /// Close the page tree and serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();

        #[allow(clippy::cast_possible_wrap)]
        let count = self.page_ids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut output = Vec::new();
        self.doc
            .save_to(&mut output)
            .map_err(|e| Error::PdfSave(e.to_string()))?;
        Ok(output)
    }
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a PDF from the named images in the store, one page per name in
/// list order.
///
/// An empty list yields a zero-page document. A missing file surfaces as a
/// stale-reference error before any decode work happens for that name.
pub async fn build_pdf(store: &ImageStore, names: &[String]) -> Result<Vec<u8>> {
    let mut builder = PdfBuilder::new();
    for name in names {
        let bytes = store.read(name).await?;
        builder.add_image_page(name, &bytes)?;
    }
    builder.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 100, 50]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn jpg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([60, 60, 60]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    #[test]
    fn test_zero_page_document() {
        let bytes = PdfBuilder::new().finish().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 0);
    }

    #[test]
    fn test_one_page_per_image_in_order() {
        let mut builder = PdfBuilder::new();
        builder.add_image_page("a.png", &png_bytes(10, 10)).unwrap();
        builder.add_image_page("b.jpg", &jpg_bytes(20, 5)).unwrap();
        assert_eq!(builder.page_count(), 2);

        let bytes = builder.finish().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_page_is_a4() {
        let mut builder = PdfBuilder::new();
        builder.add_image_page("a.png", &png_bytes(10, 10)).unwrap();
        let bytes = builder.finish().unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        let page_id = *pages.get(&1).unwrap();
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box.len(), 4);

        let as_f32 = |obj: &Object| match obj {
            #[allow(clippy::cast_precision_loss)]
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r,
            _ => f32::NAN,
        };
        assert!((as_f32(&media_box[2]) - A4_WIDTH).abs() < 0.01);
        assert!((as_f32(&media_box[3]) - A4_HEIGHT).abs() < 0.01);
    }

    #[test]
    fn test_invalid_image_fails() {
        let mut builder = PdfBuilder::new();
        let err = builder.add_image_page("bad.png", b"garbage").unwrap_err();
        assert!(matches!(err, Error::ImageDecode { .. }));
    }

    #[tokio::test]
    async fn test_build_pdf_missing_file_is_stale() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::create(tmp.path().join("images")).unwrap();

        let err = build_pdf(&store, &["images-1.png".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StaleReference(_)));
    }

    #[tokio::test]
    async fn test_build_pdf_empty_list() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::create(tmp.path().join("images")).unwrap();

        let bytes = build_pdf(&store, &[]).await.unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 0);
    }
}
