use anyhow::{anyhow, Context, Result};
use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, ImageDecoder, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};
use std::io::Cursor;
use tracing::debug;

/// Raw bytes of an image file plus a name for error messages
pub struct ImageSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// An image XObject ready to be placed on a page
struct EmbeddedImage {
    stream: Stream,
    width: u32,
    height: u32,
}

/// Build a document with one page per image. Each page is exactly the
/// image's pixel size (one pixel per point) with the image filling it.
pub fn images_to_pdf(images: &[ImageSource]) -> Result<Document> {
    if images.is_empty() {
        anyhow::bail!("No images specified");
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(images.len());

    for source in images {
        let image = embed_image(&source.bytes)
            .with_context(|| format!("Failed to embed image: {}", source.name))?;
        debug!(
            name = %source.name,
            width = image.width,
            height = image.height,
            "embedding image"
        );

        let (width, height) = (image.width as i64, image.height as i64);
        let image_id = doc.add_object(image.stream);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Integer(width),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(height),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().context("Failed to encode page content")?,
        ));

        let resources = Dictionary::from_iter(vec![(
            "XObject",
            Object::Dictionary(Dictionary::from_iter(vec![(
                "Im0",
                Object::Reference(image_id),
            )])),
        )]);
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(height),
                ]),
            ),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]);
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(kids.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    Ok(doc)
}

fn embed_image(bytes: &[u8]) -> Result<EmbeddedImage> {
    match image::guess_format(bytes).context("Unrecognized image format")? {
        ImageFormat::Jpeg => embed_jpeg(bytes),
        _ => embed_raster(bytes),
    }
}

/// JPEG data goes into the PDF untouched; only the header is decoded.
fn embed_jpeg(bytes: &[u8]) -> Result<EmbeddedImage> {
    let decoder = JpegDecoder::new(Cursor::new(bytes)).context("Invalid JPEG")?;
    let (width, height) = decoder.dimensions();
    let color_space: &[u8] = match decoder.color_type() {
        ColorType::L8 => b"DeviceGray",
        ColorType::Rgb8 => b"DeviceRGB",
        other => return Err(anyhow!("Unsupported JPEG color type: {:?}", other)),
    };

    let dict = image_dict(width, height, color_space, Some(&b"DCTDecode"[..]));
    Ok(EmbeddedImage {
        stream: Stream::new(dict, bytes.to_vec()).with_compression(false),
        width,
        height,
    })
}

/// Any other format is decoded to 8-bit RGB; alpha is dropped.
fn embed_raster(bytes: &[u8]) -> Result<EmbeddedImage> {
    let rgb = image::load_from_memory(bytes)
        .context("Failed to decode image")?
        .to_rgb8();
    let (width, height) = rgb.dimensions();

    let dict = image_dict(width, height, b"DeviceRGB", None);
    Ok(EmbeddedImage {
        stream: Stream::new(dict, rgb.into_raw()),
        width,
        height,
    })
}

fn image_dict(width: u32, height: u32, color_space: &[u8], filter: Option<&[u8]>) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    if let Some(filter) = filter {
        dict.set("Filter", Object::Name(filter.to_vec()));
    }
    dict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::sample_image;
    use crate::pdf::PdfDocument;

    fn source(name: &str, bytes: Vec<u8>) -> ImageSource {
        ImageSource {
            name: name.to_string(),
            bytes,
        }
    }

    fn media_box(doc: &Document, page: lopdf::ObjectId) -> Vec<i64> {
        doc.get_dictionary(page)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_one_page_per_image_sized_to_pixels() {
        let images = vec![
            source("a.jpg", sample_image(40, 30, ImageFormat::Jpeg)),
            source("b.png", sample_image(16, 64, ImageFormat::Png)),
        ];
        let mut doc = images_to_pdf(&images).unwrap();

        let pages: Vec<_> = doc.get_pages().into_values().collect();
        assert_eq!(pages.len(), 2);
        assert_eq!(media_box(&doc, pages[0]), vec![0, 0, 40, 30]);
        assert_eq!(media_box(&doc, pages[1]), vec![0, 0, 16, 64]);

        let bytes = PdfDocument::to_bytes(&mut doc).unwrap();
        assert_eq!(PdfDocument::from_bytes(&bytes).unwrap().page_count(), 2);
    }

    #[test]
    fn test_jpeg_is_embedded_verbatim() {
        let jpeg = sample_image(8, 8, ImageFormat::Jpeg);
        let embedded = embed_image(&jpeg).unwrap();
        assert_eq!(embedded.stream.content, jpeg);
        let filter = embedded.stream.dict.get(b"Filter").unwrap();
        assert_eq!(filter.as_name().unwrap(), b"DCTDecode");
    }

    #[test]
    fn test_png_is_converted_to_rgb() {
        let embedded = embed_image(&sample_image(5, 3, ImageFormat::Png)).unwrap();
        assert_eq!(embedded.stream.content.len(), 5 * 3 * 3);
        assert!(embedded.stream.dict.get(b"Filter").is_err());
    }

    #[test]
    fn test_no_images_is_an_error() {
        assert!(images_to_pdf(&[]).is_err());
    }

    #[test]
    fn test_bad_image_names_source() {
        let err = images_to_pdf(&[source("broken.jpg", b"nope".to_vec())]).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.jpg"));
    }
}
