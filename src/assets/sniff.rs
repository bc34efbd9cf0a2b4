// ABOUTME: Best-effort content type detection from the leading bytes of a file.
// ABOUTME: Signature table after the WHATWG MIME sniffing algorithm; unknown text falls back to text/plain.

/// Only this many leading bytes are considered.
pub const SNIFF_LEN: usize = 512;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const OCTET_STREAM: &str = "application/octet-stream";

enum Signature {
    /// Exact prefix.
    Prefix(&'static [u8], &'static str),
    /// Prefix compared under a mask; `0x00` mask bytes are wildcards.
    Masked {
        mask: &'static [u8],
        pattern: &'static [u8],
        content_type: &'static str,
    },
    /// Case-insensitive HTML tag after optional leading whitespace, followed by
    /// a space or `>`.
    Html(&'static [u8]),
    /// ISO base media file with an `mp4` brand.
    Mp4,
    /// Prefix matched after optional leading whitespace.
    AfterWhitespace(&'static [u8], &'static str),
}

const HTML: &str = "text/html; charset=utf-8";

const SIGNATURES: &[Signature] = &[
    Signature::Html(b"<!DOCTYPE HTML"),
    Signature::Html(b"<HTML"),
    Signature::Html(b"<HEAD"),
    Signature::Html(b"<SCRIPT"),
    Signature::Html(b"<IFRAME"),
    Signature::Html(b"<H1"),
    Signature::Html(b"<DIV"),
    Signature::Html(b"<FONT"),
    Signature::Html(b"<TABLE"),
    Signature::Html(b"<A"),
    Signature::Html(b"<STYLE"),
    Signature::Html(b"<TITLE"),
    Signature::Html(b"<B"),
    Signature::Html(b"<BODY"),
    Signature::Html(b"<BR"),
    Signature::Html(b"<P"),
    Signature::Html(b"<!--"),
    Signature::AfterWhitespace(b"<?xml", "text/xml; charset=utf-8"),
    Signature::Prefix(b"%PDF-", "application/pdf"),
    Signature::Prefix(b"%!PS-Adobe-", "application/postscript"),
    Signature::Prefix(b"\xFE\xFF", "text/plain; charset=utf-16be"),
    Signature::Prefix(b"\xFF\xFE", "text/plain; charset=utf-16le"),
    Signature::Prefix(b"\xEF\xBB\xBF", TEXT_PLAIN),
    Signature::Prefix(b"\x00\x00\x01\x00", "image/x-icon"),
    Signature::Prefix(b"\x00\x00\x02\x00", "image/x-icon"),
    Signature::Prefix(b"BM", "image/bmp"),
    Signature::Prefix(b"GIF87a", "image/gif"),
    Signature::Prefix(b"GIF89a", "image/gif"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WEBPVP",
        content_type: "image/webp",
    },
    Signature::Prefix(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    Signature::Prefix(b"\xFF\xD8\xFF", "image/jpeg"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"FORM\x00\x00\x00\x00AIFF",
        content_type: "audio/aiff",
    },
    Signature::Prefix(b"ID3", "audio/mpeg"),
    Signature::Prefix(b"OggS\x00", "application/ogg"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WAVE",
        content_type: "audio/wave",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00AVI ",
        content_type: "video/avi",
    },
    Signature::Prefix(b"\x1A\x45\xDF\xA3", "video/webm"),
    Signature::Mp4,
    Signature::Prefix(b"OTTO", "font/otf"),
    Signature::Prefix(b"\x00\x01\x00\x00", "font/ttf"),
    Signature::Prefix(b"ttcf", "font/collection"),
    Signature::Prefix(b"wOFF", "font/woff"),
    Signature::Prefix(b"wOF2", "font/woff2"),
    Signature::Prefix(b"\x1F\x8B\x08", "application/x-gzip"),
    Signature::Prefix(b"PK\x03\x04", "application/zip"),
    Signature::Prefix(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    Signature::Prefix(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    Signature::Prefix(b"\x00\x61\x73\x6D", "application/wasm"),
];

/// Detect the content type of `data`. Always returns a valid MIME type.
pub fn content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    SIGNATURES
        .iter()
        .find_map(|sig| sig.matches(data))
        .unwrap_or_else(|| {
            if data.iter().any(|&b| is_binary(b)) {
                OCTET_STREAM
            } else {
                TEXT_PLAIN
            }
        })
}

impl Signature {
    fn matches(&self, data: &[u8]) -> Option<&'static str> {
        match self {
            Signature::Prefix(prefix, ct) => data.starts_with(prefix).then_some(*ct),
            Signature::Masked {
                mask,
                pattern,
                content_type,
            } => {
                let head = data.get(..pattern.len())?;
                head.iter()
                    .zip(mask.iter())
                    .zip(pattern.iter())
                    .all(|((b, m), p)| b & m == *p)
                    .then_some(*content_type)
            }
            Signature::Html(tag) => {
                let rest = skip_whitespace(data);
                let head = rest.get(..tag.len())?;
                if !head.eq_ignore_ascii_case(tag) {
                    return None;
                }
                // The tag has to end here, so "<BRAND" is not "<BR".
                matches!(rest.get(tag.len()).copied(), Some(b' ' | b'>')).then_some(HTML)
            }
            Signature::AfterWhitespace(prefix, ct) => {
                skip_whitespace(data).starts_with(prefix).then_some(*ct)
            }
            Signature::Mp4 => is_mp4(data).then_some("video/mp4"),
        }
    }
}

fn skip_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|&b| !matches!(b, b'\t' | b'\n' | 0x0C | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

fn is_mp4(data: &[u8]) -> bool {
    let Some(size) = data.get(..4) else {
        return false;
    };
    let box_size = u32::from_be_bytes([size[0], size[1], size[2], size[3]]) as usize;
    if box_size < 12 || box_size % 4 != 0 || data.len() < box_size {
        return false;
    }
    if data.get(4..8) != Some(&b"ftyp"[..]) {
        return false;
    }
    // Major brand, then compatible brands after the minor version.
    (8..box_size)
        .step_by(4)
        .filter(|&i| i != 12)
        .any(|i| data.get(i..i + 3) == Some(&b"mp4"[..]))
}

fn is_binary(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_documents() {
        assert_eq!(content_type(b"<!DOCTYPE html><html>"), HTML);
        assert_eq!(content_type(b"\n  <html lang=\"en\">"), HTML);
        assert_eq!(content_type(b"<p>hi</p>"), HTML);
        assert_eq!(content_type(b"<!-- comment -->"), HTML);
    }

    #[test]
    fn tag_must_terminate() {
        assert_eq!(content_type(b"<BRAND>"), TEXT_PLAIN);
    }

    #[test]
    fn images() {
        assert_eq!(content_type(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), "image/png");
        assert_eq!(content_type(b"GIF89a\x01\x00"), "image/gif");
        assert_eq!(content_type(b"\xFF\xD8\xFF\xE0\x00\x10JFIF"), "image/jpeg");
        assert_eq!(content_type(b"RIFF\x10\x00\x00\x00WEBPVP8 "), "image/webp");
    }

    #[test]
    fn fonts_and_archives() {
        assert_eq!(content_type(b"wOF2\x00\x01"), "font/woff2");
        assert_eq!(content_type(b"\x1F\x8B\x08\x00"), "application/x-gzip");
        assert_eq!(content_type(b"PK\x03\x04\x14\x00"), "application/zip");
        assert_eq!(content_type(b"\x00asm\x01\x00\x00\x00"), "application/wasm");
    }

    #[test]
    fn mp4_by_brand() {
        let mut data = vec![0x00, 0x00, 0x00, 0x18];
        data.extend_from_slice(b"ftypisom\x00\x00\x02\x00isommp41");
        assert_eq!(content_type(&data), "video/mp4");
    }

    #[test]
    fn xml_and_pdf() {
        assert_eq!(content_type(b"  <?xml version=\"1.0\"?>"), "text/xml; charset=utf-8");
        assert_eq!(content_type(b"%PDF-1.7"), "application/pdf");
    }

    #[test]
    fn plain_text_and_binary_fallbacks() {
        assert_eq!(content_type(b"body { color: red; }"), TEXT_PLAIN);
        assert_eq!(content_type(b"const x = 1;\n"), TEXT_PLAIN);
        assert_eq!(content_type(b""), TEXT_PLAIN);
        assert_eq!(content_type(b"\x00\x01\x02\x03garbage"), OCTET_STREAM);
    }

    #[test]
    fn only_leading_bytes_are_inspected() {
        let mut data = vec![b'a'; SNIFF_LEN];
        data.push(0x00);
        assert_eq!(content_type(&data), TEXT_PLAIN);
    }
}
