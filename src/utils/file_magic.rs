/// 根据扩展名校验文件头并返回对应的 MIME 类型
///
/// 只识别学生文档允许的格式（扫描件、照片与办公文档），
/// 魔术字节不匹配或扩展名未知时返回 `None`。
///
/// # Arguments
/// * `data` - 文件内容的前几个字节
/// * `extension` - 文件扩展名（包含点号，如 ".png"）
pub fn detect_document_mime(data: &[u8], extension: &str) -> Option<&'static str> {
    if data.is_empty() {
        return None;
    }

    let (matches, mime) = match extension.to_lowercase().as_str() {
        ".png" => (
            data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            "image/png",
        ),
        ".jpg" | ".jpeg" => (data.starts_with(&[0xFF, 0xD8, 0xFF]), "image/jpeg"),
        ".webp" => (
            data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",
            "image/webp",
        ),
        ".pdf" => (data.starts_with(b"%PDF"), "application/pdf"),
        // MS Office 旧格式 (OLE Compound Document)
        ".doc" => (
            data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]),
            "application/msword",
        ),
        // MS Office 新格式 (ZIP-based OOXML)
        ".docx" => (
            data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ),
        _ => (false, ""),
    };

    matches.then_some(mime)
}

/// 取文件名的扩展名（小写，含点号）
pub fn file_extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_magic() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_document_mime(&png_header, ".png"), Some("image/png"));
        assert_eq!(detect_document_mime(&png_header, ".PNG"), Some("image/png"));
        assert_eq!(detect_document_mime(&png_header, ".jpg"), None);
    }

    #[test]
    fn test_pdf_disguised_as_image() {
        let pdf_header = b"%PDF-1.7";
        assert_eq!(detect_document_mime(pdf_header, ".pdf"), Some("application/pdf"));
        assert_eq!(detect_document_mime(pdf_header, ".jpeg"), None);
    }

    #[test]
    fn test_unknown_extension_and_empty_data() {
        assert_eq!(detect_document_mime(b"MZ\x90\x00", ".exe"), None);
        assert_eq!(detect_document_mime(&[], ".pdf"), None);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("ID Card.JPG"), Some(".jpg".to_string()));
        assert_eq!(file_extension("README"), None);
    }
}
