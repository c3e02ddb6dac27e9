use crate::error::AttemptError;

/// Strips trailing padding whose length is given by the final byte.
///
/// The padding bytes themselves are not inspected, so this accepts both
/// PKCS#7 and ISO 10126 padded buffers. A final byte of zero strips nothing.
pub fn unpad(data: &[u8]) -> Result<&[u8], AttemptError> {
    let Some(&last) = data.last() else {
        return Err(AttemptError::EmptyPlaintext);
    };

    let padding = usize::from(last);
    if padding > data.len() {
        return Err(AttemptError::PaddingOverflow { padding, len: data.len() });
    }

    Ok(&data[..data.len() - padding])
}
