/// Low byte of the sum of `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

pub fn from_u8_to_i16(src: &[u8], dst: &mut [i16]) {
    for (i, chunk) in src.chunks(2).enumerate() {
        dst[i] = ((chunk[0] as u16) | (chunk[1] as u16) << 8) as i16;
    }
}

pub fn from_u32_to_u8(src: u32, dst: &mut [u8]) {
    let n = dst.len().min(4);
    dst[..n].copy_from_slice(&src.to_le_bytes()[..n]);
}
