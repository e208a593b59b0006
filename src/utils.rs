/// little endian bytes of every value, in order
pub(crate) fn floats_to_bytes<'a, I: IntoIterator<Item = &'a f64>>(values: I) -> Vec<u8> {
    let mut bytes = Vec::new();
    values
        .into_iter()
        .for_each(|value| bytes.extend_from_slice(&value.to_le_bytes()));
    bytes
}

/// inverse of `floats_to_bytes`. `None` if the length is not a multiple of 8
pub(crate) fn bytes_to_floats(bytes: &[u8]) -> Option<Vec<f64>> {
    if bytes.len() % 8 != 0 {
        return None;
    }

    let floats = bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut arr = [0; 8];
            arr.copy_from_slice(chunk);
            f64::from_le_bytes(arr)
        })
        .collect();

    Some(floats)
}
