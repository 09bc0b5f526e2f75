use rsa::BigUint;

pub trait ToBytesPadded {
    /// Returns the byte representation of `self` in big-endian byte order,
    /// left-padded with zeroes to `len` bytes.
    ///
    /// Fails if the value does not fit in `len` bytes.
    fn to_bytes_be_padded(&self, len: usize) -> Option<Vec<u8>>;
}

impl ToBytesPadded for BigUint {
    fn to_bytes_be_padded(&self, len: usize) -> Option<Vec<u8>> {
        let v = self.to_bytes_be();
        if v.len() > len {
            return None;
        }
        let mut out = vec![0u8; len - v.len()];
        out.extend_from_slice(&v);
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_width() {
        let x = BigUint::from(0x0102u32);
        assert_eq!(x.to_bytes_be_padded(4), Some(vec![0, 0, 1, 2]));
        assert_eq!(x.to_bytes_be_padded(2), Some(vec![1, 2]));
        assert_eq!(x.to_bytes_be_padded(1), None);
    }
}
