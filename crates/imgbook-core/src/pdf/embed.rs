//! Decoding raster images into PDF image XObjects.
//!
//! Every image is decoded to RGBA and split into an 8-bit DeviceRGB stream
//! plus a DeviceGray soft mask carrying the alpha channel. Uniform handling
//! beats format-specific passthrough here: the Image Store only ever holds
//! PNG and JPEG, and both round-trip losslessly enough for full-page
//! placement.

use lopdf::{dictionary, Document, ObjectId, Stream};

use crate::error::{Error, Result};

/// An image decoded and ready to embed.
#[derive(Debug)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    rgb: Vec<u8>,
    alpha: Vec<u8>,
}

impl DecodedImage {
    /// Decode image bytes (PNG or JPEG) into embeddable channel data.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| Error::ImageDecode {
                name: name.to_string(),
                reason: e.to_string(),
            })?
            .to_rgba8();

        let (width, height) = img.dimensions();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in img.pixels() {
            rgb.push(pixel[0]);
            rgb.push(pixel[1]);
            rgb.push(pixel[2]);
            alpha.push(pixel[3]);
        }

        Ok(Self {
            width,
            height,
            rgb,
            alpha,
        })
    }

    /// Add this image to a document as an XObject, returning its object id.
    ///
    /// The alpha channel goes in as a DeviceGray `SMask` so transparent PNG
    /// regions stay transparent on the page.
    pub fn add_to_document(self, doc: &mut Document) -> ObjectId {
        let smask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(self.width),
                "Height" => i64::from(self.height),
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            self.alpha,
        ));

        doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(self.width),
                "Height" => i64::from(self.height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "SMask" => smask_id,
            },
            self.rgb,
        ))
    }
}
