//! # Data URL 编解码
//!
//! 聊天消息中的图片以 `data:image/jpg;base64,<B>` 文本嵌入。
//! 编码固定使用 jpg 前缀；解码兼容 png / jpg 两种前缀，均不匹配时按纯 Base64 处理。

use base64::{Engine as _, engine::general_purpose};

use super::FitError;

pub const JPG_DATA_URL_PREFIX: &str = "data:image/jpg;base64,";
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// 将 JPEG 字节编码为 Data URL（标准字母表、带填充、不换行）。
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(encoded_len(bytes.len()));
    out.push_str(JPG_DATA_URL_PREFIX);
    general_purpose::STANDARD.encode_string(bytes, &mut out);
    out
}

/// `encode` 对 `byte_len` 字节输入产生的载荷长度。
pub fn encoded_len(byte_len: usize) -> usize {
    JPG_DATA_URL_PREFIX.len() + byte_len.div_ceil(3) * 4
}

/// 解码 Data URL，不校验解码结果是否为合法图片。
pub fn decode(payload: &str) -> Result<Vec<u8>, FitError> {
    decode_with_limit(payload, u64::MAX)
}

/// 解码 Data URL，并在解码前按长度估算拒绝超限输入。
pub fn decode_with_limit(payload: &str, max_bytes: u64) -> Result<Vec<u8>, FitError> {
    let body = strip_known_prefix(payload);

    let estimated_len = estimate_decoded_upper_bound_len(body)?;
    if estimated_len > max_bytes {
        return Err(FitError::ResourceLimit(format!(
            "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
            estimated_len as f64 / 1024.0 / 1024.0,
            max_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    general_purpose::STANDARD
        .decode(body)
        .map_err(|e| FitError::Decode(format!("Base64 解码失败：{}", e)))
}

fn strip_known_prefix(payload: &str) -> &str {
    let body = payload.strip_prefix(PNG_DATA_URL_PREFIX).unwrap_or(payload);
    body.strip_prefix(JPG_DATA_URL_PREFIX).unwrap_or(body)
}

fn estimate_decoded_upper_bound_len(body: &str) -> Result<u64, FitError> {
    let len = body.len() as u64;
    let groups = len
        .checked_add(3)
        .ok_or_else(|| FitError::ResourceLimit("Base64 输入长度溢出".to_string()))?
        / 4;

    groups
        .checked_mul(3)
        .ok_or_else(|| FitError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_uses_jpg_prefix_without_line_breaks() {
        let bytes = vec![0xABu8; 4096];
        let payload = encode(&bytes);

        assert!(payload.starts_with(JPG_DATA_URL_PREFIX));
        assert!(!payload.contains('\n'));
        assert!(!payload.contains('\r'));
        assert_eq!(payload.len(), encoded_len(bytes.len()));
    }

    #[test]
    fn encode_known_vector() {
        assert_eq!(encode(b"hello"), "data:image/jpg;base64,aGVsbG8=");
        assert_eq!(encode(&[]), JPG_DATA_URL_PREFIX);
    }

    #[test]
    fn decode_strips_png_prefix() {
        let decoded = decode("data:image/png;base64,aGVsbG8=").expect("decode failed");
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn decode_without_prefix_decodes_as_is() {
        let decoded = decode("aGVsbG8=").expect("decode failed");
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        let result = decode("data:image/jpg;base64,@@not-base64@@");
        assert!(matches!(result, Err(FitError::Decode(_))));
    }

    #[test]
    fn decode_leaves_unknown_mime_prefix_in_place() {
        // 仅识别 png / jpg 两种前缀，其他前缀会作为 Base64 正文参与解码而失败
        let result = decode("data:image/webp;base64,aGVsbG8=");
        assert!(matches!(result, Err(FitError::Decode(_))));
    }

    #[test]
    fn decode_with_limit_rejects_large_payload_before_decode() {
        let huge = format!("{}{}", JPG_DATA_URL_PREFIX, "A".repeat(4096));
        let result = decode_with_limit(&huge, 32);
        assert!(matches!(result, Err(FitError::ResourceLimit(_))));
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let payload = encode(&bytes);
            prop_assert_eq!(payload.len(), encoded_len(bytes.len()));
            prop_assert_eq!(decode(&payload).expect("round trip decode"), bytes);
        }
    }
}
