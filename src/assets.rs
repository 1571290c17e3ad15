use base64::Engine;
use image::GenericImageView;
use std::io::Write;

/// Where the masthead logo comes from. Decoding happens at render time so a bad
/// logo only costs the logo, never the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoSource {
    Bytes(Vec<u8>),
    DataUri(String),
}

impl LogoSource {
    pub(crate) fn decode(&self) -> Result<ImageData, String> {
        match self {
            LogoSource::Bytes(bytes) => decode_image_bytes(bytes, None),
            LogoSource::DataUri(uri) => {
                let (mime, data) = parse_data_uri(uri)?;
                decode_image_bytes(&data, Some(&mime))
            }
        }
    }
}

/// Raster data ready to be written as a PDF image XObject.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ImageData {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) color_space: &'static str,
    pub(crate) bits_per_component: u8,
    pub(crate) filter: &'static str,
    pub(crate) data: Vec<u8>,
    pub(crate) alpha: Option<AlphaData>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AlphaData {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Vec<u8>,
}

fn decode_image_bytes(data: &[u8], mime: Option<&str>) -> Result<ImageData, String> {
    let format = match mime {
        Some(mime) if mime.contains("png") => Some(image::ImageFormat::Png),
        Some(mime) if mime.contains("jpeg") || mime.contains("jpg") => {
            Some(image::ImageFormat::Jpeg)
        }
        Some(_) => None,
        None => image::guess_format(data).ok(),
    };

    let decoded = image::load_from_memory(data).map_err(|err| err.to_string())?;
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err("image has no pixels".to_string());
    }

    // Only gray and RGB JPEGs pass through as DCT; CMYK and friends are
    // re-encoded from the decoded RGB pixels below.
    let passthrough = match format {
        Some(image::ImageFormat::Jpeg) => jpeg_source_color_type(data).and_then(dct_color_space),
        _ => None,
    };
    if let Some(color_space) = passthrough {
        return Ok(ImageData {
            width,
            height,
            color_space,
            bits_per_component: 8,
            filter: "/DCTDecode",
            data: data.to_vec(),
            alpha: None,
        });
    }

    let rgba = decoded.to_rgba8();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    let mut has_alpha = false;
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        if a != 255 {
            has_alpha = true;
        }
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let alpha = if has_alpha {
        Some(AlphaData {
            width,
            height,
            data: flate_compress(&alpha)?,
        })
    } else {
        None
    };
    Ok(ImageData {
        width,
        height,
        color_space: "/DeviceRGB",
        bits_per_component: 8,
        filter: "/FlateDecode",
        data: flate_compress(&rgb)?,
        alpha,
    })
}

fn jpeg_source_color_type(data: &[u8]) -> Option<image::ExtendedColorType> {
    use image::ImageDecoder;

    let decoder = image::codecs::jpeg::JpegDecoder::new(std::io::Cursor::new(data)).ok()?;
    Some(decoder.original_color_type())
}

fn dct_color_space(color: image::ExtendedColorType) -> Option<&'static str> {
    match color {
        image::ExtendedColorType::L8 => Some("/DeviceGray"),
        image::ExtendedColorType::Rgb8 => Some("/DeviceRGB"),
        _ => None,
    }
}

fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>), String> {
    let Some(rest) = uri.strip_prefix("data:") else {
        return Err("logo is not a data uri".to_string());
    };
    let Some((header, data_part)) = rest.split_once(',') else {
        return Err("data uri has no payload".to_string());
    };
    let mime = header
        .split(';')
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = if header.contains("base64") {
        base64::engine::general_purpose::STANDARD
            .decode(data_part.trim())
            .map_err(|err| err.to_string())?
    } else {
        data_part.as_bytes().to_vec()
    };
    Ok((mime, data))
}

fn flate_compress(data: &[u8]) -> Result<Vec<u8>, String> {
    use flate2::Compression;
    use flate2::write::ZlibEncoder;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).map_err(|err| err.to_string())?;
    encoder.finish().map_err(|err| err.to_string())
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32, alpha: u8) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, alpha]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png fixture");
    out.into_inner()
}
